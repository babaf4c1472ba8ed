//! Output pages.
//!
//! A [`Page`] is one output-addressable unit: a whole document or one
//! chunk of a larger document. Formats implement the trait; everything
//! derived from the page's location (site id, stage and target paths,
//! search domains) is provided.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pintail_config::Config;
use pintail_xml::Element;

use crate::directory::{DirectoryId, PageDomains};
use crate::source::Source;
use crate::tree::SiteTree;
use crate::{Site, SiteError};

/// Location data every page carries.
#[derive(Debug, Clone)]
pub struct PageBase {
    source: Rc<Source>,
    source_file: String,
}

impl PageBase {
    pub fn new(source: Rc<Source>, source_file: impl Into<String>) -> Self {
        Self {
            source,
            source_file: source_file.into(),
        }
    }

    pub fn source(&self) -> &Rc<Source> {
        &self.source
    }

    /// File name within the source.
    pub fn source_file(&self) -> &str {
        &self.source_file
    }
}

/// One output unit.
pub trait Page {
    fn base(&self) -> &PageBase;

    /// Format-defined id, unique within the directory.
    fn page_id(&self) -> &str;

    /// Value passed to stylesheets as `pintail.format`, if any.
    fn format(&self) -> Option<&'static str> {
        None
    }

    /// Whether the page is offered to the search provider.
    fn searchable(&self) -> bool {
        false
    }

    /// File name of the staged document within the stage directory.
    fn stage_file(&self) -> String {
        self.base().source_file().to_owned()
    }

    /// Produce the staged document. Must be safe to call more than once.
    fn stage_page(&self, _site: &Site) -> Result<(), SiteError> {
        Ok(())
    }

    /// Structural summary for the cache document, or `None` when the page
    /// contributes nothing.
    fn get_cache_data(&self, _site: &Site, _lang: Option<&str>) -> Option<Element> {
        None
    }

    /// Render the page to [`Page::target_path`].
    fn build_html(&self, _site: &Site, _lang: Option<&str>) -> Result<(), SiteError> {
        Ok(())
    }

    /// Local media references. Names starting with `/` are relative to
    /// the site root, others to the source directory.
    fn get_media(&self, _site: &Site) -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// Title for indexing. `hint = Some("search")` prefers a search title.
    fn get_title(&self, _site: &Site, _hint: Option<&str>, _lang: Option<&str>) -> String {
        String::new()
    }

    fn get_desc(&self, _site: &Site, _hint: Option<&str>, _lang: Option<&str>) -> String {
        String::new()
    }

    fn get_keywords(&self, _site: &Site, _hint: Option<&str>, _lang: Option<&str>) -> String {
        String::new()
    }

    /// Plain text content for indexing.
    fn get_content(&self, _site: &Site, _hint: Option<&str>, _lang: Option<&str>) -> String {
        String::new()
    }

    fn source(&self) -> &Rc<Source> {
        self.base().source()
    }

    fn source_file(&self) -> &str {
        self.base().source_file()
    }

    fn directory(&self) -> DirectoryId {
        self.source().directory()
    }

    /// Path of the owning directory, such as `/guide/`.
    fn directory_path(&self) -> &str {
        self.source().directory_path()
    }

    /// Directory holding the source file.
    fn source_path(&self) -> &Path {
        self.source().source_path()
    }

    /// Globally unique id: directory path plus page id.
    fn site_id(&self) -> String {
        format!("{}{}", self.directory_path(), self.page_id())
    }

    /// Location of the staged document for `lang`.
    fn stage_path(&self, site: &Site, lang: Option<&str>) -> PathBuf {
        site.paths()
            .stage_dir(self.directory_path(), lang)
            .join(self.stage_file())
    }

    /// Output file name, such as `index.html`.
    fn target_file(&self, site: &Site) -> String {
        format!("{}{}", self.page_id(), site.html_extension())
    }

    /// Output location for `lang`. Translations get a `.<lang>` suffix.
    fn target_path(&self, site: &Site, lang: Option<&str>) -> PathBuf {
        let dir = site.paths().target_dir(self.directory_path());
        match lang {
            Some(lang) => dir.join(format!("{}.{lang}", self.target_file(site))),
            None => dir.join(self.target_file(site)),
        }
    }

    /// Search domains for this page, or [`PageDomains::Excluded`].
    fn search_domains(&self, config: &Config, tree: &SiteTree) -> PageDomains {
        tree.directory(self.directory())
            .page_domains(config, tree, self.page_id())
    }
}
