//! Per-language views of a staged document.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use pintail_site::{Page, Site};
use pintail_xml::Document;

/// A parsed source-language document plus translations loaded on demand.
///
/// Asking the translation provider is remembered per language, including
/// a missing translation, so each language is parsed at most once.
#[derive(Debug)]
pub(crate) struct LangTrees {
    source: Rc<Document>,
    translated: RefCell<HashMap<String, Option<Rc<Document>>>>,
}

impl LangTrees {
    pub(crate) fn new(source: Document) -> Self {
        Self {
            source: Rc::new(source),
            translated: RefCell::new(HashMap::new()),
        }
    }

    /// The source-language document.
    pub(crate) fn source(&self) -> &Document {
        &self.source
    }

    /// Document for `lang` and the stage file it was read from. Falls back
    /// to the source language when no translation is available.
    pub(crate) fn get(&self, site: &Site, page: &dyn Page, lang: Option<&str>) -> (Rc<Document>, PathBuf) {
        if let Some(lang) = lang
            && let Some(doc) = self.translated(site, page, lang)
        {
            return (doc, page.stage_path(site, Some(lang)));
        }
        (Rc::clone(&self.source), page.stage_path(site, None))
    }

    fn translated(&self, site: &Site, page: &dyn Page, lang: &str) -> Option<Rc<Document>> {
        if let Some(known) = self.translated.borrow().get(lang) {
            return known.clone();
        }
        let doc = if site.translate_page(page, lang) {
            let path = page.stage_path(site, Some(lang));
            match Document::from_file(&path) {
                Ok(doc) => Some(Rc::new(doc)),
                Err(e) => {
                    tracing::warn!(page = %page.site_id(), lang, error = %e, "Could not read translation");
                    None
                }
            }
        } else {
            None
        };
        self.translated
            .borrow_mut()
            .insert(lang.to_owned(), doc.clone());
        doc
    }
}
