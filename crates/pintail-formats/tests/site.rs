//! Whole-site scans and builds with every format registered.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use pintail_config::Config;
use pintail_formats::register_formats;
use pintail_site::{
    BuildOptions, CallLog, MockRunner, Page, Registry, SearchProvider, Site, SiteError, write_file,
};
use pintail_xml::{Document, ns};
use pretty_assertions::assert_eq;

fn write(root: &Path, rel: &str, content: &str) {
    write_file(&root.join(rel), content).unwrap();
}

fn page(id: &str, title: &str) -> String {
    format!(r#"<page xmlns="http://projectmallard.org/1.0/" id="{id}"><title>{title}</title></page>"#)
}

fn site_with_registry(dir: &Path, config: &str, mut registry: Registry) -> (Site, CallLog) {
    register_formats(&mut registry);
    let runner = MockRunner::new();
    let calls = runner.calls();
    let site = Site::from_config(
        dir,
        Config::parse(config).unwrap(),
        BuildOptions::default(),
        registry,
        Box::new(runner),
    )
    .unwrap();
    (site, calls)
}

fn site(dir: &Path, config: &str) -> (Site, CallLog) {
    site_with_registry(dir, config, Registry::with_core())
}

#[test]
fn test_root_page_ids() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.page", &page("index", "Home"));
    write(
        dir.path(),
        "about.page",
        r#"<page xmlns="http://projectmallard.org/1.0/"><title>About</title></page>"#,
    );
    let (site, _) = site(dir.path(), "");
    let tree = site.scan_site().unwrap();

    assert_eq!(tree.page_count(), 2);
    assert_eq!(tree.page_by_site_id("/about").unwrap().page_id(), "about");
    let index = tree.page_by_site_id("/index").unwrap();
    assert_eq!(index.page_id(), "index");
    assert_eq!(index.directory_path(), "/");
    assert!(index.target_path(&site, None).ends_with("__pintail__/build/index.html"));
}

#[test]
fn test_same_id_in_sibling_directories() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a/index.page", &page("index", "A"));
    write(dir.path(), "b/index.page", &page("index", "B"));
    let (site, _) = site(dir.path(), "");
    let tree = site.scan_site().unwrap();

    let a = tree.page_by_site_id("/a/index").unwrap();
    let b = tree.page_by_site_id("/b/index").unwrap();
    assert_eq!(a.get_title(&site, None, None), "A");
    assert_eq!(b.get_title(&site, None, None), "B");
}

#[test]
fn test_duplicate_id_in_one_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "guide/one.page", &page("topic", "One"));
    write(dir.path(), "guide/two.page", &page("topic", "Two"));
    let (site, _) = site(dir.path(), "");
    let err = site.scan_site().err().unwrap();
    assert!(matches!(
        err,
        SiteError::DuplicatePage { ref directory, ref page_id } if directory == "/guide/" && page_id == "topic"
    ));
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.page", &page("index", "Home"));
    let (site, calls) = site(dir.path(), "");
    let first = site.scan_site().unwrap();
    let staged = calls.count("xmllint");
    let second = site.scan_site().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(calls.count("xmllint"), staged);
}

/// Search backend recording what it was asked to index.
#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<String>>>);

impl SearchProvider for Recorder {
    fn index_page(&self, _site: &Site, page: &dyn Page, _lang: Option<&str>) -> Result<(), SiteError> {
        self.0.borrow_mut().push(page.site_id());
        Ok(())
    }
}

#[test]
fn test_search_domain_none_skips_subtree() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.page", &page("index", "Home"));
    write(dir.path(), "private/secret.page", &page("secret", "Secret"));
    write(dir.path(), "private/sub/deep.page", &page("deep", "Deep"));
    let recorder = Recorder::default();
    let mut registry = Registry::with_core();
    let handle = recorder.clone();
    registry.register_search("recorder", move |_| Box::new(handle.clone()) as Box<dyn SearchProvider>);
    let config = "[pintail]\nsearch_provider = \"recorder\"\n\n[\"/private/\"]\nsearch_domain = \"none\"\n";
    let (site, _) = site_with_registry(dir.path(), config, registry);
    site.build_search().unwrap();

    assert_eq!(*recorder.0.borrow(), vec!["/index".to_owned()]);
}

#[test]
fn test_pinned_git_checkout_with_mallard_pages() {
    let dir = tempfile::tempdir().unwrap();
    let checkout = "__pintail__/git/https:!!example.com!help.git@@main";
    write(dir.path(), &format!("{checkout}/C/index.page"), &page("index", "Upstream"));
    let config = "[\"/help/\"]\nsources = \"upstream\"\n\n\
        [upstream]\ngit_repository = \"https://example.com/help.git\"\n\
        git_branch = \"main\"\ngit_directory = \"C\"\ngit_update = \"false\"\n";
    let (site, calls) = site(dir.path(), config);
    let tree = site.scan_site().unwrap();

    assert_eq!(calls.count("git"), 0);
    let index = tree.page_by_site_id("/help/index").unwrap();
    assert_eq!(index.get_title(&site, None, None), "Upstream");
    assert!(index.stage_path(&site, None).ends_with("__pintail__/stage/help/index.page"));
}

#[test]
fn test_cache_lists_mallard_and_docbook_pages() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.page", &page("index", "Home"));
    write(
        dir.path(),
        "manual/book.xml",
        "<article><title>Manual</title><section><title>One</title></section></article>",
    );
    let (site, _) = site(dir.path(), "[\"/manual/\"]\ndocbook = \"book.xml\"\n");
    site.build_cache().unwrap();

    let cache = Document::from_file(&dir.path().join("__pintail__/tools/pintail.cache")).unwrap();
    assert!(cache.root.is(ns::CACHE, "cache"));
    let home = cache.root.find_by_id("/index").unwrap();
    assert!(home.is(ns::MALLARD, "page"));
    assert_eq!(home.attr("site:dir"), Some("/"));
    let manual = cache.root.find_by_id("/manual/index").unwrap();
    assert!(manual.is(ns::PINTAIL, "external"));
    assert_eq!(manual.child(ns::MALLARD, "title").unwrap().string_value(), "Manual");
}

#[test]
fn test_feed_from_mallard_revisions() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "news/old.page",
        r#"<page xmlns="http://projectmallard.org/1.0/" id="old"><info><revision date="2020-01-01"/></info><title>Old</title></page>"#,
    );
    write(
        dir.path(),
        "news/new.page",
        r#"<page xmlns="http://projectmallard.org/1.0/" id="new"><info><revision date="2023-05-02"/><desc>Fresh</desc></info><title>New</title></page>"#,
    );
    write(dir.path(), "news/undated.page", &page("undated", "Undated"));
    let config = "[pintail]\nsite_root = \"https://example.com/\"\n\n[\"/news/\"]\nfeed_atom = \"feed.atom\"\n";
    let (site, _) = site(dir.path(), config);
    site.build_feeds().unwrap();

    let feed = Document::from_file(&dir.path().join("__pintail__/build/news/feed.atom")).unwrap();
    let links: Vec<&str> = feed
        .root
        .children_named(ns::ATOM, "entry")
        .filter_map(|e| e.child(ns::ATOM, "link"))
        .filter_map(|l| l.attr("href"))
        .collect();
    assert_eq!(
        links,
        vec!["https://example.com/news/new.html", "https://example.com/news/old.html"]
    );
}
