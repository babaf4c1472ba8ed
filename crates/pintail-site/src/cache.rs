//! Cache documents.
//!
//! One cache document per language indexes the public metadata of every
//! page, keyed by site id. Stylesheets read it to resolve links between
//! pages without loading every source document. It is rebuilt from
//! scratch on every build.

use std::iter;

use pintail_xml::{Document, Element, ns};

use crate::directory::DirectoryId;
use crate::paths::{make_dirs, path_string};
use crate::tree::SiteTree;
use crate::{Site, SiteError};

impl Site {
    /// Write the cache document for the source language and every site
    /// language.
    ///
    /// # Errors
    ///
    /// Returns error if a cache file can't be written.
    pub fn build_cache(&self) -> Result<(), SiteError> {
        let tree = self.scan_site()?;
        make_dirs(&self.paths().tools())?;
        let langs = iter::once(None).chain(self.langs().iter().map(|l| Some(l.as_str())));
        for lang in langs {
            let path = self.paths().cache(lang);
            self.log("CACHE", &path_string(&path));
            self.cache_document(tree, lang).write_file(&path)?;
        }
        Ok(())
    }

    /// Cache document for `lang` with the fragment of every page, directory
    /// pages before subdirectories.
    pub fn cache_document(&self, tree: &SiteTree, lang: Option<&str>) -> Document {
        let mut root = Element::with_ns(ns::CACHE, "cache:cache")
            .with_attr("xmlns", ns::MALLARD)
            .with_attr("xmlns:cache", ns::CACHE)
            .with_attr("xmlns:site", ns::SITE)
            .with_attr("xmlns:pintail", ns::PINTAIL);
        for page in tree.iter_pages(DirectoryId::ROOT) {
            if let Some(fragment) = page.get_cache_data(self, lang) {
                root.children.push(fragment);
            }
        }
        Document::new(root)
    }
}
