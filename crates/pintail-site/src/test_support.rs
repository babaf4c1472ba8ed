//! Fakes shared by the unit tests.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::Path;
use std::rc::Rc;

use pintail_config::Config;
use pintail_xml::{Element, ns};

use crate::directory::{Directory, DirectoryId};
use crate::mock::MockRunner;
use crate::page::{Page, PageBase};
use crate::paths::write_file;
use crate::registry::{PageProvider, Registry, SourceProvider};
use crate::search::SearchProvider;
use crate::source::{Source, SourceOrigin};
use crate::translation::TranslationProvider;
use crate::{BuildOptions, Site, SiteError};

/// Page backed by a `*.test` file.
///
/// A line `media: a.png b.png` in the file lists its media.
pub struct TestPage {
    base: PageBase,
    id: String,
}

impl TestPage {
    pub fn new(source: Rc<Source>, id: &str) -> Self {
        Self {
            base: PageBase::new(source, format!("{id}.test")),
            id: id.to_owned(),
        }
    }
}

impl Page for TestPage {
    fn base(&self) -> &PageBase {
        &self.base
    }

    fn page_id(&self) -> &str {
        &self.id
    }

    fn format(&self) -> Option<&'static str> {
        Some("test")
    }

    fn searchable(&self) -> bool {
        true
    }

    fn get_cache_data(&self, _site: &Site, _lang: Option<&str>) -> Option<Element> {
        Some(Element::with_ns(ns::MALLARD, "page").with_attr("id", self.site_id()))
    }

    fn build_html(&self, site: &Site, lang: Option<&str>) -> Result<(), SiteError> {
        write_file(&self.target_path(site, lang), &self.site_id())
    }

    fn get_media(&self, _site: &Site) -> BTreeSet<String> {
        let content =
            std::fs::read_to_string(self.source_path().join(self.source_file())).unwrap_or_default();
        content
            .lines()
            .filter_map(|l| l.strip_prefix("media:"))
            .flat_map(str::split_whitespace)
            .map(str::to_owned)
            .collect()
    }
}

/// Turns every `*.test` file into a [`TestPage`].
pub struct TestPageProvider;

impl PageProvider for TestPageProvider {
    fn create_pages(&self, _site: &Site, source: &Rc<Source>) -> Result<Vec<Box<dyn Page>>, SiteError> {
        Ok(source
            .files()
            .iter()
            .filter_map(|f| f.strip_suffix(".test"))
            .map(|id| Box::new(TestPage::new(Rc::clone(source), id)) as Box<dyn Page>)
            .collect())
    }
}

/// Serves named sections with a `test_path` key from that directory.
pub struct TestSourceProvider;

impl SourceProvider for TestSourceProvider {
    fn create_sources(
        &self,
        site: &Site,
        directory: &Directory,
        name: &str,
    ) -> Result<Vec<Source>, SiteError> {
        if name.starts_with('/') {
            return Ok(Vec::new());
        }
        let Some(path) = site.config().get("test_path", Some(name)) else {
            return Ok(Vec::new());
        };
        Ok(vec![Source::new(
            name,
            directory.id(),
            directory.path(),
            site.paths().topdir().join(path),
            SourceOrigin::Other("test".to_owned()),
        )])
    }
}

/// Local source for `path` with no backing files.
pub fn source_for(path: &str, id: DirectoryId) -> Rc<Source> {
    Rc::new(Source::new(
        path,
        id,
        path,
        Path::new("/nonexistent").join(path.trim_start_matches('/')),
        SourceOrigin::Local,
    ))
}

/// Write `content` to `root/rel`, creating parents.
pub fn write(root: &Path, rel: &str, content: &str) {
    write_file(&root.join(rel), content).unwrap();
}

/// Site with the test providers and a recording runner.
pub fn site_with(topdir: &Path, config: &str, options: BuildOptions) -> Site {
    let mut registry = Registry::new();
    registry
        .add_source_provider(TestSourceProvider)
        .add_page_provider(TestPageProvider);
    Site::from_config(
        topdir,
        Config::parse(config).unwrap(),
        options,
        registry,
        Box::new(MockRunner::new()),
    )
    .unwrap()
}

/// Records `(site_id, lang)` for every indexed page.
#[derive(Clone, Default)]
pub struct RecordingSearch {
    calls: Rc<RefCell<Vec<(String, Option<String>)>>>,
}

impl RecordingSearch {
    pub fn calls(&self) -> Rc<RefCell<Vec<(String, Option<String>)>>> {
        Rc::clone(&self.calls)
    }
}

impl SearchProvider for RecordingSearch {
    fn index_page(&self, _site: &Site, page: &dyn Page, lang: Option<&str>) -> Result<(), SiteError> {
        self.calls
            .borrow_mut()
            .push((page.site_id(), lang.map(str::to_owned)));
        Ok(())
    }
}

/// Translates every directory into a fixed list of languages.
pub struct StaticTranslation {
    langs: Vec<String>,
    media: bool,
}

impl StaticTranslation {
    pub fn new(langs: &[&str]) -> Self {
        Self {
            langs: langs.iter().map(|l| (*l).to_owned()).collect(),
            media: false,
        }
    }

    /// Report translated media as available.
    pub fn with_media(mut self) -> Self {
        self.media = true;
        self
    }
}

impl TranslationProvider for StaticTranslation {
    fn directory_langs(&self, _site: &Site, _directory: &Directory) -> Vec<String> {
        self.langs.clone()
    }

    fn translate_page(&self, _site: &Site, _page: &dyn Page, _lang: &str) -> bool {
        true
    }

    fn translate_media(&self, _site: &Site, _source: &Source, _name: &str, _lang: &str) -> bool {
        self.media
    }
}
