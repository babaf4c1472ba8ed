//! Extension points and the registry that holds them.
//!
//! Formats, sources, and stylesheet helpers are registered explicitly at
//! startup. Iteration order is registration order. Search and translation
//! backends are registered as named factories and picked by the
//! `search_provider` and `translation_provider` config keys.

use std::path::PathBuf;
use std::rc::Rc;

use pintail_config::Config;

use crate::directory::Directory;
use crate::git::{GitSourceProvider, GitXslProvider};
use crate::page::Page;
use crate::search::SearchProvider;
use crate::source::Source;
use crate::translation::TranslationProvider;
use crate::{Site, SiteError};

/// Contributes sources to directories.
pub trait SourceProvider {
    /// Sources for `directory` described by the config section `name`.
    ///
    /// `name` is the directory path itself, or one of the names listed in
    /// the directory's `sources` key. Return an empty list when the
    /// section isn't meant for this provider.
    fn create_sources(
        &self,
        site: &Site,
        directory: &Directory,
        name: &str,
    ) -> Result<Vec<Source>, SiteError>;
}

/// Creates pages from the files of a source.
pub trait PageProvider {
    fn create_pages(&self, site: &Site, source: &Rc<Source>) -> Result<Vec<Box<dyn Page>>, SiteError>;
}

/// Generates files in the tools directory before pages are built.
pub trait ToolsProvider {
    fn build_tools(&self, site: &Site) -> Result<(), SiteError>;
}

/// Generates stylesheets for the output site.
pub trait CssProvider {
    fn build_css(&self, site: &Site) -> Result<(), SiteError>;
}

/// What a stylesheet is being applied to.
#[derive(Clone, Copy)]
pub enum XslTarget<'a> {
    Page(&'a dyn Page),
    Directory(&'a Directory),
    Site,
}

/// Contributes extra XSLT files and parameters to every transform.
pub trait XslProvider {
    /// Stylesheets to include from generated wrapper stylesheets.
    fn xsl_files(&self, _site: &Site) -> Vec<PathBuf> {
        Vec::new()
    }

    /// Extra `(name, value)` parameters for a transform.
    fn xsl_params(
        &self,
        _site: &Site,
        _output: &str,
        _target: XslTarget<'_>,
        _lang: Option<&str>,
    ) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Builds a search provider from the site configuration.
pub type SearchFactory = Box<dyn Fn(&Config) -> Box<dyn SearchProvider>>;

/// Builds a translation provider from the site configuration.
pub type TranslationFactory = Box<dyn Fn(&Config) -> Box<dyn TranslationProvider>>;

/// Every registered extension.
#[derive(Default)]
pub struct Registry {
    sources: Vec<Box<dyn SourceProvider>>,
    pages: Vec<Box<dyn PageProvider>>,
    tools: Vec<Box<dyn ToolsProvider>>,
    css: Vec<Box<dyn CssProvider>>,
    xsl: Vec<Box<dyn XslProvider>>,
    search: Vec<(String, SearchFactory)>,
    translation: Vec<(String, TranslationFactory)>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in git source support.
    pub fn with_core() -> Self {
        let mut registry = Self::new();
        registry.add_source_provider(GitSourceProvider);
        registry.add_xsl_provider(GitXslProvider);
        registry
    }

    pub fn add_source_provider(&mut self, provider: impl SourceProvider + 'static) -> &mut Self {
        self.sources.push(Box::new(provider));
        self
    }

    pub fn add_page_provider(&mut self, provider: impl PageProvider + 'static) -> &mut Self {
        self.pages.push(Box::new(provider));
        self
    }

    pub fn add_tools_provider(&mut self, provider: impl ToolsProvider + 'static) -> &mut Self {
        self.tools.push(Box::new(provider));
        self
    }

    pub fn add_css_provider(&mut self, provider: impl CssProvider + 'static) -> &mut Self {
        self.css.push(Box::new(provider));
        self
    }

    pub fn add_xsl_provider(&mut self, provider: impl XslProvider + 'static) -> &mut Self {
        self.xsl.push(Box::new(provider));
        self
    }

    /// Register a search backend under `name`.
    pub fn register_search(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&Config) -> Box<dyn SearchProvider> + 'static,
    ) -> &mut Self {
        self.search.push((name.into(), Box::new(factory)));
        self
    }

    /// Register a translation backend under `name`.
    pub fn register_translation(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&Config) -> Box<dyn TranslationProvider> + 'static,
    ) -> &mut Self {
        self.translation.push((name.into(), Box::new(factory)));
        self
    }

    pub fn source_providers(&self) -> &[Box<dyn SourceProvider>] {
        &self.sources
    }

    pub fn page_providers(&self) -> &[Box<dyn PageProvider>] {
        &self.pages
    }

    pub fn tools_providers(&self) -> &[Box<dyn ToolsProvider>] {
        &self.tools
    }

    pub fn css_providers(&self) -> &[Box<dyn CssProvider>] {
        &self.css
    }

    pub fn xsl_providers(&self) -> &[Box<dyn XslProvider>] {
        &self.xsl
    }

    /// Instantiate the search backend registered as `name`.
    pub(crate) fn create_search(
        &self,
        name: &str,
        config: &Config,
    ) -> Result<Box<dyn SearchProvider>, SiteError> {
        self.search
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, factory)| factory(config))
            .ok_or_else(|| SiteError::UnknownProvider {
                kind: "search",
                name: name.to_owned(),
            })
    }

    /// Instantiate the translation backend registered as `name`.
    pub(crate) fn create_translation(
        &self,
        name: &str,
        config: &Config,
    ) -> Result<Box<dyn TranslationProvider>, SiteError> {
        self.translation
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, factory)| factory(config))
            .ok_or_else(|| SiteError::UnknownProvider {
                kind: "translation",
                name: name.to_owned(),
            })
    }
}
