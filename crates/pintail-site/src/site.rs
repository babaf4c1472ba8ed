//! Site orchestration.
//!
//! Provides [`Site`], which owns the configuration, the extension
//! registry, and the scanned tree, and drives every build step.
//!
//! # Lifecycle
//!
//! A site is created from a config file, then scanned once: the first call
//! to [`Site::scan_site`] builds the [`SiteTree`] and later calls return
//! the same tree. Every build step scans on demand, so steps can run in
//! any order.
//!
//! # Threading
//!
//! `Site` is single-threaded. The scanned tree, the memoized stylesheets,
//! and the language list use `OnceCell`/`RefCell` and must not be shared
//! across concurrent builds.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pintail_site::{BuildOptions, Registry, Site, SystemRunner};
//!
//! let site = Site::new(
//!     Path::new("pintail.toml"),
//!     BuildOptions::default(),
//!     Registry::with_core(),
//!     Box::new(SystemRunner),
//! )?;
//! site.run()?;
//! ```

use std::cell::{OnceCell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::iter;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use pintail_config::{CONFIG_FILENAME, Config};

use crate::directory::{Directory, DirectoryId};
use crate::filter::Filter;
use crate::page::Page;
use crate::paths::{SitePaths, copy_file, make_dirs, path_string, write_file};
use crate::process::{CommandOutput, ExternalCommand, ProcessRunner};
use crate::registry::{Registry, XslTarget};
use crate::search::SearchProvider;
use crate::source::Source;
use crate::transform::{Stylesheet, XslParams};
use crate::translation::TranslationProvider;
use crate::tree::SiteTree;
use crate::{SiteError, scan};

const SAMPLE_CONFIG: &str = include_str!("../data/sample.toml");

/// A build command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildCommand {
    /// The full pipeline.
    Build,
    /// Cache and CSS only.
    Css,
    /// Cache and JavaScript only.
    Js,
    /// Extra files only.
    Files,
    /// Cache and feeds only.
    Feeds,
}

impl BuildCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Css => "css",
            Self::Js => "js",
            Self::Files => "files",
            Self::Feeds => "feeds",
        }
    }
}

/// Command-line controlled build behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Command being run; `None` behaves like [`BuildCommand::Build`].
    pub command: Option<BuildCommand>,
    /// Local preview: relative site roots and the `[local]` config section.
    pub local: bool,
    /// Run the search provider.
    pub search: bool,
    /// Use the translation provider.
    pub translation: bool,
    /// Pull existing git checkouts.
    pub update: bool,
    pub verbose: bool,
    /// Partial-build filter entries.
    pub filter: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            command: None,
            local: false,
            search: true,
            translation: true,
            update: true,
            verbose: false,
            filter: Vec::new(),
        }
    }
}

/// A documentation site being built.
pub struct Site {
    pub(crate) config: Config,
    paths: SitePaths,
    options: BuildOptions,
    filter: Filter,
    registry: Registry,
    runner: Box<dyn ProcessRunner>,
    search_provider: Option<Box<dyn SearchProvider>>,
    translation_provider: Option<Box<dyn TranslationProvider>>,
    stylesheets: RefCell<HashMap<PathBuf, Rc<Stylesheet>>>,
    langs: OnceCell<Vec<String>>,
    root: OnceCell<SiteTree>,
}

impl Site {
    /// Load the site described by `config_file`.
    ///
    /// Runs `before_script` and `config_script`, then resolves the
    /// configured search and translation providers.
    ///
    /// # Errors
    ///
    /// Returns error if the config can't be loaded, a script fails, or a
    /// configured provider isn't registered.
    pub fn new(
        config_file: &Path,
        options: BuildOptions,
        registry: Registry,
        runner: Box<dyn ProcessRunner>,
    ) -> Result<Self, SiteError> {
        let config_file = std::path::absolute(config_file).map_err(SiteError::io(config_file))?;
        let topdir = config_file
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf);
        let config = Config::load(&config_file)?;
        Self::from_config(topdir, config, options, registry, runner)
    }

    /// Create a site from already loaded configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Site::new`], minus config loading.
    pub fn from_config(
        topdir: impl Into<PathBuf>,
        config: Config,
        options: BuildOptions,
        registry: Registry,
        runner: Box<dyn ProcessRunner>,
    ) -> Result<Self, SiteError> {
        let config = config.with_local(options.local);
        let filter = Filter::new(&options.filter);
        let mut site = Self {
            config,
            paths: SitePaths::new(topdir),
            options,
            filter,
            registry,
            runner,
            search_provider: None,
            translation_provider: None,
            stylesheets: RefCell::new(HashMap::new()),
            langs: OnceCell::new(),
            root: OnceCell::new(),
        };

        site.run_setup_scripts()?;

        if let Some(name) = site.config.get("search_provider", None) {
            site.search_provider = Some(site.registry.create_search(&name, &site.config)?);
        }
        if site.options.translation
            && let Some(name) = site.config.get("translation_provider", None)
        {
            site.translation_provider =
                Some(site.registry.create_translation(&name, &site.config)?);
        }
        Ok(site)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn paths(&self) -> &SitePaths {
        &self.paths
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }

    pub fn search_provider(&self) -> Option<&dyn SearchProvider> {
        self.search_provider.as_deref()
    }

    pub fn translation_provider(&self) -> Option<&dyn TranslationProvider> {
        self.translation_provider.as_deref()
    }

    /// The scanned tree, if [`Site::scan_site`] has run.
    pub fn tree(&self) -> Option<&SiteTree> {
        self.root.get()
    }

    /// Scan the site once and return the tree.
    ///
    /// The first call removes the previous stage tree, scans every
    /// directory, and lets the translation provider prepare each
    /// directory's languages. Later calls return the same tree.
    ///
    /// # Errors
    ///
    /// Returns error on duplicate page ids, unreadable source directories,
    /// failed clones, or errors from page providers.
    pub fn scan_site(&self) -> Result<&SiteTree, SiteError> {
        if let Some(tree) = self.root.get() {
            return Ok(tree);
        }
        self.log("SCAN", "/");
        let stage = self.paths.stage(None);
        if stage.exists() {
            std::fs::remove_dir_all(&stage).map_err(SiteError::io(&stage))?;
        }

        let scanned = scan::scan_tree(self)?;
        let tree = self.root.get_or_init(|| scanned);

        if let Some(provider) = self.translation_provider() {
            for directory in tree.iter_directories() {
                for lang in provider.directory_langs(self, directory) {
                    provider.translate_directory(self, directory, &lang);
                }
            }
        }
        Ok(tree)
    }

    /// Log a build event, such as `HTML /guide/index`.
    pub fn log(&self, tag: &str, data: &str) {
        tracing::info!(tag, "{}", self.paths.shorten(data));
    }

    /// Run an external command. A non-zero exit is logged as a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Process`] if the program can't be started.
    pub fn run_command(&self, command: &ExternalCommand) -> Result<CommandOutput, SiteError> {
        let output = self.runner.run(command)?;
        if !output.success {
            tracing::warn!(
                program = %command.program,
                code = ?output.code,
                "Command exited unsuccessfully"
            );
        }
        Ok(output)
    }

    /// Stylesheet handle for `path`, loaded once per site.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::MissingStylesheet`] if the file doesn't exist.
    pub fn stylesheet(&self, path: &Path) -> Result<Rc<Stylesheet>, SiteError> {
        let cached = self.stylesheets.borrow().get(path).map(Rc::clone);
        if let Some(stylesheet) = cached {
            return Ok(stylesheet);
        }
        let stylesheet = Rc::new(Stylesheet::load(path)?);
        self.stylesheets
            .borrow_mut()
            .insert(path.to_path_buf(), Rc::clone(&stylesheet));
        Ok(stylesheet)
    }

    /// Apply the stylesheet at `stylesheet` to `input`.
    ///
    /// # Errors
    ///
    /// Returns error if the stylesheet is missing or `xsltproc` can't run.
    pub fn transform(
        &self,
        stylesheet: &Path,
        input: &Path,
        output: Option<&Path>,
        params: &XslParams,
        xinclude: bool,
    ) -> Result<(), SiteError> {
        let stylesheet = self.stylesheet(stylesheet)?;
        self.run_command(&stylesheet.command(input, output, params, xinclude))?;
        Ok(())
    }

    /// Extension of built pages, `.html` by default.
    pub fn html_extension(&self) -> String {
        self.config
            .get("html_extension", None)
            .unwrap_or_else(|| ".html".to_owned())
    }

    /// Extension used in links between pages; defaults to the html extension.
    pub fn link_extension(&self) -> String {
        self.config
            .get("link_extension", None)
            .unwrap_or_else(|| self.html_extension())
    }

    /// Branch of the stock stylesheets.
    pub fn yelp_xsl_branch(&self) -> String {
        self.config
            .get("yelp_xsl_branch", None)
            .unwrap_or_else(|| "master".to_owned())
    }

    /// Checkout of the stock stylesheets, `tools/yelp-xsl@<branch>`.
    pub fn yelp_xsl_path(&self) -> PathBuf {
        self.paths
            .tools()
            .join(format!("yelp-xsl@{}", self.yelp_xsl_branch().replace('/', "@")))
    }

    /// Custom stylesheets to include: `custom_xsl` entries relative to the
    /// site directory, then every provider's files.
    pub fn custom_xsl(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .config
            .get_list("custom_xsl", None)
            .iter()
            .map(|x| self.paths.topdir().join(x))
            .collect();
        for provider in self.registry.xsl_providers() {
            files.extend(provider.xsl_files(self));
        }
        files
    }

    /// Whether a directory path is skipped during discovery.
    ///
    /// The working directory and `.git` directories are always skipped,
    /// plus every path in `ignore_directories`.
    pub fn is_ignored_directory(&self, path: &str) -> bool {
        if path == "/__pintail__/" || path.ends_with("/.git/") {
            return true;
        }
        self.config
            .get_list("ignore_directories", None)
            .iter()
            .any(|ignored| normalize_dir(ignored) == path)
    }

    /// Parameters for a transform of `target` into `output` (usually
    /// `html`) for `lang`.
    pub fn xsl_params(&self, output: &str, target: XslTarget<'_>, lang: Option<&str>) -> XslParams {
        let html = output == "html";
        let mut params = XslParams::new();
        if html {
            let ext = self.html_extension();
            let ext = match lang {
                Some(lang) => format!("{ext}.{lang}"),
                None => ext,
            };
            params.push("html.extension", ext);
            params.push("pintail.extension.link", self.link_extension());
        }
        params.push("mal.cache.file", path_string(&self.paths.cache(lang)));

        let site_root = match target {
            XslTarget::Page(page) => self.config.get_site_root(Some(page.directory_path())),
            XslTarget::Directory(directory) => self.config.get_site_root(Some(directory.path())),
            XslTarget::Site => self.config.get_site_root(None),
        };
        params.push("pintail.site.root", site_root);

        if let XslTarget::Page(page) = target {
            params.push("pintail.site.dir", page.directory_path());
            if html {
                let prefix = path_string(&self.paths.target_dir(page.directory_path()));
                params.push("html.output.prefix", format!("{}/", prefix.trim_end_matches('/')));
            }
            params.push("pintail.source.file", page.source_file());
        }

        let now = chrono::Local::now();
        params.push("pintail.date", now.format("%Y-%m-%d").to_string());
        params.push("pintail.time", now.format("%T").to_string());

        for provider in self.registry.xsl_providers() {
            params.extend(provider.xsl_params(self, output, target, lang));
        }

        if let XslTarget::Page(page) = target
            && let Some(format) = page.format()
        {
            params.prepend("pintail.format", format);
        }
        params
    }

    /// Languages of a directory, empty without a translation provider.
    pub fn directory_langs(&self, directory: &Directory) -> Vec<String> {
        self.translation_provider()
            .map(|p| p.directory_langs(self, directory))
            .unwrap_or_default()
    }

    /// Languages used anywhere on the site, computed once after the scan.
    pub fn langs(&self) -> &[String] {
        self.langs.get_or_init(|| {
            self.translation_provider()
                .map(|p| p.site_langs(self))
                .unwrap_or_default()
        })
    }

    /// Language the site is written in, `en` without a translation provider.
    pub fn source_lang(&self) -> String {
        self.translation_provider()
            .map_or_else(|| "en".to_owned(), |p| p.source_lang(self))
    }

    /// Whether a translation of `page` into `lang` is available.
    ///
    /// Pages outside the build filter reuse an existing translated stage
    /// file instead of asking the provider again.
    pub fn translate_page(&self, page: &dyn Page, lang: &str) -> bool {
        let Some(provider) = self.translation_provider() else {
            return false;
        };
        if !self.filter.matches_page(&page.site_id()) && page.stage_path(self, Some(lang)).exists() {
            return true;
        }
        provider.translate_page(self, page, lang)
    }

    /// Run the command from the build options, then `after_script`.
    ///
    /// Returns the elapsed time, which is also logged as `FINISH`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of any step.
    pub fn run(&self) -> Result<Duration, SiteError> {
        let start = Instant::now();
        match self.options.command.unwrap_or(BuildCommand::Build) {
            BuildCommand::Build => self.build()?,
            BuildCommand::Css => {
                self.build_cache()?;
                self.build_css()?;
            }
            BuildCommand::Js => {
                self.build_cache()?;
                self.build_js()?;
            }
            BuildCommand::Files => self.build_files()?,
            BuildCommand::Feeds => {
                self.build_cache()?;
                self.build_feeds()?;
            }
        }
        self.run_after_script()?;
        let elapsed = start.elapsed();
        self.log("FINISH", &format_elapsed(elapsed));
        Ok(elapsed)
    }

    /// The full pipeline. CSS and JavaScript are skipped for partial builds.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of any step.
    pub fn build(&self) -> Result<(), SiteError> {
        self.scan_site()?;
        self.build_cache()?;
        self.build_tools()?;
        self.build_html()?;
        self.build_media()?;
        self.build_files()?;
        self.build_feeds()?;
        self.build_search()?;
        if !self.filter.is_active() {
            self.build_css()?;
            self.build_js()?;
        }
        Ok(())
    }

    /// Build every page in the filter, in the source language and in each
    /// of its directory's languages.
    ///
    /// # Errors
    ///
    /// Returns the first error from a page build.
    pub fn build_html(&self) -> Result<(), SiteError> {
        let tree = self.scan_site()?;
        self.visit_post_order(tree, DirectoryId::ROOT, &mut |directory| {
            self.make_target_dirs(directory)?;
            let langs = self.directory_langs(directory);
            for page in tree.directory_pages(directory.id()) {
                if !self.filter.matches_page(&page.site_id()) {
                    continue;
                }
                page.build_html(self, None)?;
                for lang in &langs {
                    page.build_html(self, Some(lang))?;
                }
            }
            Ok(())
        })
    }

    /// Copy media referenced by pages into the output.
    ///
    /// Translated media come from the language's stage tree and only when
    /// the translation provider reports one. Site-rooted (`/`) media have
    /// no translated variant; list them in `extra_files` instead. Copy
    /// failures are warnings.
    ///
    /// # Errors
    ///
    /// Returns error if an output directory can't be created.
    pub fn build_media(&self) -> Result<(), SiteError> {
        let tree = self.scan_site()?;
        self.visit_post_order(tree, DirectoryId::ROOT, &mut |directory| {
            self.make_target_dirs(directory)?;
            let mut media: BTreeMap<String, Rc<Source>> = BTreeMap::new();
            for page in tree.directory_pages(directory.id()) {
                if !self.filter.matches_page(&page.site_id()) {
                    continue;
                }
                for name in page.get_media(self) {
                    media.insert(name, Rc::clone(page.source()));
                }
            }

            let langs = self.directory_langs(directory);
            let langs = iter::once(None).chain(langs.iter().map(|l| Some(l.as_str())));
            let langs: Vec<Option<&str>> = langs.collect();
            for (name, source) in &media {
                for &lang in &langs {
                    if let Some(from) = self.media_source(directory, source, name, lang) {
                        let to = self.paths.media_target(directory.path(), name, lang);
                        if let Err(e) = copy_file(&from, &to) {
                            tracing::warn!(file = %name, error = %e, "Could not copy media file");
                        }
                    }
                }
            }
            Ok(())
        })
    }

    fn media_source(
        &self,
        directory: &Directory,
        source: &Source,
        name: &str,
        lang: Option<&str>,
    ) -> Option<PathBuf> {
        let path = directory.path();
        if let Some(lang) = lang {
            let provider = self.translation_provider()?;
            if !provider.translate_media(self, source, name, lang) || name.starts_with('/') {
                return None;
            }
            self.log("MEDIA", &format!("{lang} {path}{name}"));
            return Some(self.paths.stage_dir(path, Some(lang)).join(name));
        }

        self.log("MEDIA", &format!("{path}{name}"));
        if let Some(rooted) = name.strip_prefix('/') {
            return Some(self.paths.topdir().join(rooted));
        }
        let staged = self.paths.stage_dir(path, None).join(name);
        if staged.exists() {
            Some(staged)
        } else {
            Some(source.source_path().join(name))
        }
    }

    /// Copy `extra_files` globs from every source into the output.
    ///
    /// # Errors
    ///
    /// Returns error if a file can't be copied.
    pub fn build_files(&self) -> Result<(), SiteError> {
        let tree = self.scan_site()?;
        self.visit_post_order(tree, DirectoryId::ROOT, &mut |directory| {
            let target = self.paths.target_dir(directory.path());
            make_dirs(&target)?;
            for pattern in self.config.get_merged("extra_files", Some(directory.path())) {
                for source in directory.sources() {
                    let full = source.source_path().join(&pattern);
                    let Ok(matches) = glob::glob(&full.to_string_lossy()) else {
                        tracing::warn!(pattern = %pattern, "Invalid extra_files pattern");
                        continue;
                    };
                    for file in matches.flatten() {
                        let Some(name) = file.file_name() else {
                            continue;
                        };
                        self.log(
                            "FILE",
                            &format!("{}{}", directory.path(), name.to_string_lossy()),
                        );
                        copy_file(&file, &target.join(name))?;
                    }
                }
            }
            Ok(())
        })
    }

    /// Index the site with the search provider, unless search is disabled.
    ///
    /// # Errors
    ///
    /// Returns errors from the provider.
    pub fn build_search(&self) -> Result<(), SiteError> {
        if !self.options.search {
            return Ok(());
        }
        self.scan_site()?;
        match self.search_provider() {
            Some(provider) => provider.index_site(self),
            None => Ok(()),
        }
    }

    /// Run every CSS provider.
    ///
    /// # Errors
    ///
    /// Returns errors from the providers.
    pub fn build_css(&self) -> Result<(), SiteError> {
        self.scan_site()?;
        for provider in self.registry.css_providers() {
            provider.build_css(self)?;
        }
        Ok(())
    }

    /// Walk directories children-first, calling `action` on each directory
    /// inside the filter.
    pub(crate) fn visit_post_order<'t>(
        &self,
        tree: &'t SiteTree,
        id: DirectoryId,
        action: &mut dyn FnMut(&'t Directory) -> Result<(), SiteError>,
    ) -> Result<(), SiteError> {
        let directory = tree.directory(id);
        for &sub in directory.subdirs() {
            self.visit_post_order(tree, sub, action)?;
        }
        if self.filter.matches_directory(directory.path()) {
            action(directory)?;
        }
        Ok(())
    }

    fn make_target_dirs(&self, directory: &Directory) -> Result<(), SiteError> {
        make_dirs(&self.paths.target_dir(directory.path()))
    }
}

/// Write the sample `pintail.toml` into `directory`.
///
/// # Errors
///
/// Returns [`SiteError::AlreadyExists`] if the file exists, or an I/O
/// error if it can't be written.
pub fn init_site(directory: &Path) -> Result<PathBuf, SiteError> {
    let path = directory.join(CONFIG_FILENAME);
    if path.exists() {
        return Err(SiteError::AlreadyExists(path));
    }
    write_file(&path, SAMPLE_CONFIG)?;
    Ok(path)
}

/// Ensure a configured directory path starts and ends with `/`.
fn normalize_dir(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(path);
    if !path.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Format a duration as `H:MM:SS`.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}
