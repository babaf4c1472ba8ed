//! Mallard pages.
//!
//! Every `.page` file in a source is one page. The file is staged with
//! `xmllint --xinclude`, parsed once, and its root `id` becomes the page
//! id. Translations are parsed lazily per language.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};
use std::iter;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pintail_site::{
    CssProvider, DirectoryId, ExternalCommand, Page, PageBase, PageProvider, Site, SiteError,
    Source, ToolsProvider, WrapperStylesheet, XslParams, XslProvider, XslTarget, make_dirs,
    path_string,
};
use pintail_xml::{Document, Element, ns};

use crate::css::{LOCALE_VARIABLE, css_stylesheet, write_css};
use crate::lang::LangTrees;
use crate::{ducktype, log_id};

/// Value of `pintail.format` for Mallard and Ducktype pages.
pub const MALLARD_FORMAT: &str = "mallard";

/// Stylesheet applied to every Mallard page.
const HTML_XSL: &str = "pintail-html-mallard-local.xsl";

/// Stack document written per directory in `mallard_stack_dirs` mode.
const STACK_FILE: &str = "__pintail_stack__.stack";

/// Source syntax of a Mallard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MallardSyntax {
    /// Mallard XML, `.page`.
    Xml,
    /// Ducktype, `.duck`, compiled to Mallard XML when staged.
    Ducktype,
}

impl MallardSyntax {
    /// Source file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xml => ".page",
            Self::Ducktype => ducktype::EXTENSION,
        }
    }

    fn stage_file(self, source_file: &str) -> String {
        match self {
            Self::Xml => source_file.to_owned(),
            Self::Ducktype => ducktype::stage_file(source_file),
        }
    }

    fn stage_command(self, stage: &Path, source: &Path) -> ExternalCommand {
        match self {
            Self::Xml => ExternalCommand::new("xmllint")
                .arg("--xinclude")
                .arg("-o")
                .path_arg(stage)
                .path_arg(source),
            Self::Ducktype => ducktype::compile_command(stage, source),
        }
    }
}

/// Stage `base` and return the staged path.
fn stage(site: &Site, syntax: MallardSyntax, base: &PageBase) -> Result<PathBuf, SiteError> {
    let source = base.source();
    let dir = site.paths().stage_dir(source.directory_path(), None);
    make_dirs(&dir)?;
    let staged = dir.join(syntax.stage_file(base.source_file()));
    let input = source.source_path().join(base.source_file());
    site.log("STAGE", &format!("{}{}", source.directory_path(), base.source_file()));
    site.run_command(&syntax.stage_command(&staged, &input))?;
    Ok(staged)
}

/// Remembers which `(directory, language)` stacks were already built.
///
/// Shared between the Mallard and Ducktype providers so a directory mixing
/// both syntaxes is transformed once per language.
#[derive(Debug, Clone, Default)]
pub struct StackTracker(Rc<RefCell<HashSet<(DirectoryId, Option<String>)>>>);

impl StackTracker {
    /// Record a visit, returning `true` the first time.
    fn first_visit(&self, directory: DirectoryId, lang: Option<&str>) -> bool {
        self.0
            .borrow_mut()
            .insert((directory, lang.map(str::to_owned)))
    }
}

/// A Mallard page.
pub struct MallardPage {
    base: PageBase,
    syntax: MallardSyntax,
    page_id: String,
    trees: LangTrees,
    stacks: StackTracker,
}

impl MallardPage {
    /// Stage and parse `file`.
    ///
    /// Returns `None`, with a warning, when the staged file isn't a
    /// well-formed Mallard page.
    ///
    /// # Errors
    ///
    /// Returns error if the stage directory can't be created or the stage
    /// tool can't be started.
    pub fn load(
        site: &Site,
        source: &Rc<Source>,
        file: &str,
        syntax: MallardSyntax,
        stacks: StackTracker,
    ) -> Result<Option<Self>, SiteError> {
        let base = PageBase::new(Rc::clone(source), file);
        let staged = stage(site, syntax, &base)?;
        let doc = match Document::from_file(&staged) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(file = %file, directory = %source.directory_path(), error = %e, "Skipping unreadable page");
                return Ok(None);
            }
        };
        if !doc.root.is(ns::MALLARD, "page") {
            tracing::warn!(file = %file, directory = %source.directory_path(), "Skipping file without a Mallard page element");
            return Ok(None);
        }
        let page_id = match doc.root.attr("id") {
            Some(id) => id.to_owned(),
            None => file
                .strip_suffix(syntax.extension())
                .unwrap_or(file)
                .to_owned(),
        };
        Ok(Some(Self {
            base,
            syntax,
            page_id,
            trees: LangTrees::new(doc),
            stacks,
        }))
    }

    pub fn syntax(&self) -> MallardSyntax {
        self.syntax
    }

    /// Cache fragment for `node` and its sections.
    fn node_cache(&self, node: &Element) -> Element {
        let mut ret = Element {
            name: node.name.clone(),
            namespace: node.namespace.clone(),
            attrs: node
                .attrs
                .iter()
                .filter(|(k, _)| k != "id")
                .cloned()
                .collect(),
            text: "\n".to_owned(),
            tail: "\n".to_owned(),
            children: Vec::new(),
        };
        if node.is(ns::MALLARD, "page") {
            ret.set_attr("id", self.site_id());
        } else if let Some(id) = node.attr("id") {
            ret.set_attr("id", format!("{}#{id}", self.site_id()));
        }
        ret.set_attr("site:dir", self.directory_path());

        for child in &node.children {
            if child.is(ns::MALLARD, "info") {
                ret.children.push(self.info_cache(child));
            }
            if child.is(ns::MALLARD, "title") {
                ret.children.push(child.clone());
            } else if child.is(ns::MALLARD, "section") {
                ret.children.push(self.node_cache(child));
            }
        }
        ret
    }

    /// Copy of an `info` element with relative link targets made
    /// directory-absolute.
    fn info_cache(&self, info: &Element) -> Element {
        let mut ret = Element {
            name: info.name.clone(),
            namespace: info.namespace.clone(),
            ..Element::default()
        };
        for child in &info.children {
            let mut child = child.clone();
            if child.is(ns::MALLARD, "link")
                && let Some(xref) = child.attr("xref")
                && !xref.starts_with('/')
            {
                let xref = format!("{}{xref}", self.directory_path());
                child.set_attr("xref", xref);
            }
            ret.children.push(child);
        }
        ret
    }

    /// Write the stack document including every Mallard page of the
    /// directory, returning its path.
    fn write_stack(&self, site: &Site, lang: Option<&str>) -> Result<PathBuf, SiteError> {
        let tree = site.scan_site()?;
        let mut stack = Element::with_ns(ns::MALLARD, "stack")
            .with_attr("xmlns", ns::MALLARD)
            .with_attr("xmlns:xi", ns::XINCLUDE);
        for page in tree.directory_pages(self.directory()) {
            if page.format() != Some(MALLARD_FORMAT) {
                continue;
            }
            let href = match lang {
                Some(lang) if site.translate_page(page, lang) => page.stage_path(site, Some(lang)),
                _ => page.stage_path(site, None),
            };
            stack
                .children
                .push(Element::with_ns(ns::XINCLUDE, "xi:include").with_attr("href", path_string(&href)));
        }
        let dir = site.paths().stage_dir(self.directory_path(), lang);
        make_dirs(&dir)?;
        let path = dir.join(STACK_FILE);
        Document::new(stack).write_file(&path)?;
        Ok(path)
    }
}

/// Children named `local` of the page's `info` elements.
fn info_items<'a>(root: &'a Element, local: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    root.children_named(ns::MALLARD, "info")
        .flat_map(move |info| info.children_named(ns::MALLARD, local))
}

/// Best title or desc per the search hint, falling back to `fallback`.
fn pick_text(root: &Element, local: &str, hint: Option<&str>, fallback: &[&Element]) -> String {
    let typed = |ty: &str, role: Option<&str>| -> Option<String> {
        info_items(root, local)
            .filter(|e| e.attr("type") == Some(ty) && e.attr("role") == role)
            .last()
            .map(Element::string_value)
    };
    let search = |ty: &str| -> Option<String> {
        info_items(root, local)
            .filter(|e| e.attr("type") == Some(ty))
            .last()
            .map(Element::string_value)
    };
    let preferred = if hint == Some("search") {
        search("search").or_else(|| typed("text", Some("search")))
    } else {
        None
    };
    preferred
        .or_else(|| typed("text", None))
        .or_else(|| fallback.last().map(|e| e.string_value()))
        .unwrap_or_default()
}

/// Text content of `node`, leaving out `info` elements.
fn collect_content(node: &Element, out: &mut String) {
    for child in &node.children {
        if !child.is(ns::MALLARD, "info") {
            out.push_str(&child.text);
            collect_content(child, out);
        }
        out.push_str(&child.tail);
    }
}

impl Page for MallardPage {
    fn base(&self) -> &PageBase {
        &self.base
    }

    fn page_id(&self) -> &str {
        &self.page_id
    }

    fn format(&self) -> Option<&'static str> {
        Some(MALLARD_FORMAT)
    }

    fn searchable(&self) -> bool {
        true
    }

    fn stage_file(&self) -> String {
        self.syntax.stage_file(self.source_file())
    }

    fn stage_page(&self, site: &Site) -> Result<(), SiteError> {
        stage(site, self.syntax, &self.base).map(|_| ())
    }

    fn get_cache_data(&self, site: &Site, lang: Option<&str>) -> Option<Element> {
        let (doc, href) = self.trees.get(site, self, lang);
        let mut page = self.node_cache(&doc.root);
        page.set_attr("cache:href", path_string(&href));
        Some(page)
    }

    fn build_html(&self, site: &Site, lang: Option<&str>) -> Result<(), SiteError> {
        let stacked = site.config().get_bool("mallard_stack_dirs", None) == Some(true);
        let input = if stacked {
            if !self.stacks.first_visit(self.directory(), lang) {
                return Ok(());
            }
            site.log("HTML", &log_id(lang, self.directory_path()));
            self.write_stack(site, lang)?
        } else {
            site.log("HTML", &log_id(lang, &self.site_id()));
            self.trees.get(site, self, lang).1
        };
        let stylesheet = site.paths().tools().join(HTML_XSL);
        let params = site.xsl_params("html", XslTarget::Page(self), lang);
        site.transform(&stylesheet, &input, None, &params, true)
    }

    fn get_media(&self, _site: &Site) -> BTreeSet<String> {
        let mut refs = BTreeSet::new();
        for node in self.trees.source().root.descendants() {
            if let Some(src) = node.attr("src")
                && !src.contains(':')
                && src != "#"
            {
                refs.insert(src.to_owned());
            }
            if let Some(href) = node.attr("href")
                && !href.is_empty()
                && !href.contains(':')
                && !href.starts_with('#')
            {
                refs.insert(href.to_owned());
            }
        }
        refs
    }

    fn get_title(&self, site: &Site, hint: Option<&str>, lang: Option<&str>) -> String {
        let (doc, _) = self.trees.get(site, self, lang);
        let titles: Vec<&Element> = doc.root.children_named(ns::MALLARD, "title").collect();
        pick_text(&doc.root, "title", hint, &titles)
    }

    fn get_desc(&self, site: &Site, hint: Option<&str>, lang: Option<&str>) -> String {
        let (doc, _) = self.trees.get(site, self, lang);
        let untyped: Vec<&Element> = info_items(&doc.root, "desc")
            .filter(|e| e.attr("type").is_none())
            .collect();
        pick_text(&doc.root, "desc", hint, &untyped)
    }

    fn get_keywords(&self, site: &Site, _hint: Option<&str>, lang: Option<&str>) -> String {
        let (doc, _) = self.trees.get(site, self, lang);
        info_items(&doc.root, "keywords")
            .last()
            .map(Element::string_value)
            .unwrap_or_default()
    }

    fn get_content(&self, site: &Site, _hint: Option<&str>, lang: Option<&str>) -> String {
        let (doc, _) = self.trees.get(site, self, lang);
        let mut out = String::new();
        collect_content(&doc.root, &mut out);
        out
    }
}

/// Creates a [`MallardPage`] for every file with the syntax's extension,
/// minus the source's `exclude_files`.
pub struct MallardPageProvider {
    syntax: MallardSyntax,
    stacks: StackTracker,
}

impl MallardPageProvider {
    /// Provider for `.page` files.
    pub fn new(stacks: StackTracker) -> Self {
        Self::with_syntax(MallardSyntax::Xml, stacks)
    }

    pub(crate) fn with_syntax(syntax: MallardSyntax, stacks: StackTracker) -> Self {
        Self { syntax, stacks }
    }
}

impl PageProvider for MallardPageProvider {
    fn create_pages(&self, site: &Site, source: &Rc<Source>) -> Result<Vec<Box<dyn Page>>, SiteError> {
        let exclude = site.config().get_list("exclude_files", Some(source.name()));
        let mut pages: Vec<Box<dyn Page>> = Vec::new();
        for file in source.files() {
            if !file.ends_with(self.syntax.extension()) || exclude.contains(&file) {
                continue;
            }
            if let Some(page) = MallardPage::load(site, source, &file, self.syntax, self.stacks.clone())? {
                pages.push(Box::new(page));
            }
        }
        Ok(pages)
    }
}

/// Tools, CSS, and stylesheet parameters for Mallard pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct MallardTools;

impl ToolsProvider for MallardTools {
    fn build_tools(&self, site: &Site) -> Result<(), SiteError> {
        let tools = site.paths().tools();
        let mal2html = site.yelp_xsl_path().join("xslt/mallard/html/mal2html.xsl");
        WrapperStylesheet::new()
            .import(mal2html)
            .include("pintail-html.xsl")
            .write(&tools.join("pintail-html-mallard.xsl"))?;
        WrapperStylesheet::new()
            .import("pintail-html-mallard.xsl")
            .param_from("mal.link.extension", "pintail.extension.link")
            .includes(&site.custom_xsl())
            .write(&tools.join(HTML_XSL))
    }
}

impl CssProvider for MallardTools {
    /// One stylesheet per locale found in the cache documents, generated
    /// from the first page in that locale.
    fn build_css(&self, site: &Site) -> Result<(), SiteError> {
        let cssxsl = site.paths().tools().join("pintail-css-mallard.xsl");
        css_stylesheet(site, "mallard/html/mal2html-page.xsl")
            .namespace("cache", ns::CACHE)
            .namespace("mal", ns::MALLARD)
            .raw("<xsl:output method=\"text\"/>")
            .raw("<xsl:param name=\"id\"/>")
            .raw("<xsl:param name=\"out\"/>")
            .raw("<xsl:template match=\"/\">")
            .raw("<xsl:for-each select=\"/cache:cache/mal:page[@id=$id]\">")
            .raw(LOCALE_VARIABLE)
            .raw(CSS_DOCUMENT)
            .raw("</xsl:for-each>")
            .raw("</xsl:template>")
            .write(&cssxsl)?;

        let mut seen: Vec<String> = Vec::new();
        let langs = iter::once(None).chain(site.langs().iter().map(|l| Some(l.as_str())));
        for lang in langs {
            let cache = site.paths().cache(lang);
            let doc = match Document::from_file(&cache) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(cache = %cache.display(), error = %e, "Could not read cache");
                    continue;
                }
            };
            for page in doc.root.children_named(ns::MALLARD, "page") {
                let locale = page.attr("xml:lang").unwrap_or("C");
                let Some(id) = page.attr("id") else {
                    continue;
                };
                if seen.iter().any(|s| s == locale) {
                    continue;
                }
                seen.push(locale.to_owned());
                let mut params = XslParams::new();
                params.push("id", id);
                write_css(site, &cssxsl, &cache, &format!("pintail-mallard-{locale}.css"), params)?;
            }
        }
        Ok(())
    }
}

const CSS_DOCUMENT: &str = r#"<exsl:document href="{$out}" method="text">
 <xsl:for-each select="document(@cache:href)">
  <xsl:call-template name="html.css.content"/>
 </xsl:for-each>
</exsl:document>"#;

impl XslProvider for MallardTools {
    /// `mal2html.editor_mode` from the nearest directory setting
    /// `editor_mode`.
    fn xsl_params(
        &self,
        site: &Site,
        output: &str,
        target: XslTarget<'_>,
        _lang: Option<&str>,
    ) -> Vec<(String, String)> {
        let XslTarget::Page(page) = target else {
            return Vec::new();
        };
        if output != "html" || page.format() != Some(MALLARD_FORMAT) {
            return Vec::new();
        }
        let Some(tree) = site.tree() else {
            return Vec::new();
        };
        let mut current = Some(page.directory());
        while let Some(id) = current {
            let directory = tree.directory(id);
            match site.config().get_bool("editor_mode", Some(directory.path())) {
                Some(true) => return vec![("mal2html.editor_mode".to_owned(), "1".to_owned())],
                Some(false) => return Vec::new(),
                None => current = directory.parent(),
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mallard_site, page_xml, write};
    use pintail_site::BuildOptions;
    use pretty_assertions::assert_eq;

    const GUIDE: &str = r##"<page xmlns="http://projectmallard.org/1.0/" id="guide" type="guide" style="task">
<info>
 <link type="guide" xref="index"/>
 <link type="seealso" xref="/other/page"/>
 <title type="text">Text title</title>
 <title type="text" role="search">Search title</title>
 <desc>Plain desc</desc>
 <keywords>one two</keywords>
</info>
<title>Display title</title>
<p>Intro <media src="figures/a.png"/> text.</p>
<section id="more">
 <title>More</title>
 <p>Body</p>
 <media src="http://example.com/remote.png"/>
 <link href="#top"/>
</section>
</page>"##;

    #[test]
    fn test_page_id_from_root_or_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.page", &page_xml("first", "A"));
        write(dir.path(), "b.page", r#"<page xmlns="http://projectmallard.org/1.0/"><title>B</title></page>"#);
        let site = mallard_site(dir.path(), "", BuildOptions::default());
        let tree = site.scan_site().unwrap();

        assert!(tree.page_by_site_id("/first").is_some());
        assert!(tree.page_by_site_id("/b").is_some());
        assert!(dir.path().join("__pintail__/stage/a.page").exists());
    }

    #[test]
    fn test_unparsable_and_foreign_files_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.page", "<page><p>");
        write(dir.path(), "other.page", "<article/>");
        write(dir.path(), "ok.page", &page_xml("ok", "Ok"));
        let site = mallard_site(dir.path(), "", BuildOptions::default());
        let tree = site.scan_site().unwrap();
        assert_eq!(tree.page_count(), 1);
    }

    #[test]
    fn test_exclude_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.page", &page_xml("index", "Home"));
        write(dir.path(), "draft.page", &page_xml("draft", "Draft"));
        let site = mallard_site(
            dir.path(),
            "[\"/\"]\nexclude_files = \"draft.page\"\n",
            BuildOptions::default(),
        );
        let tree = site.scan_site().unwrap();
        assert!(tree.page_by_site_id("/draft").is_none());
        assert!(tree.page_by_site_id("/index").is_some());
    }

    #[test]
    fn test_cache_data_rewrites_ids_and_links() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "docs/guide.page", GUIDE);
        let site = mallard_site(dir.path(), "", BuildOptions::default());
        let tree = site.scan_site().unwrap();
        let page = tree.page_by_site_id("/docs/guide").unwrap();
        let cache = page.get_cache_data(&site, None).unwrap();

        assert_eq!(cache.attr("id"), Some("/docs/guide"));
        assert_eq!(cache.attr("type"), Some("guide"));
        assert_eq!(cache.attr("site:dir"), Some("/docs/"));
        assert!(cache.attr("cache:href").unwrap().ends_with("__pintail__/stage/docs/guide.page"));

        let info = cache.child(ns::MALLARD, "info").unwrap();
        let xrefs: Vec<&str> = info
            .children_named(ns::MALLARD, "link")
            .filter_map(|l| l.attr("xref"))
            .collect();
        assert_eq!(xrefs, vec!["/docs/index", "/other/page"]);

        let section = cache.child(ns::MALLARD, "section").unwrap();
        assert_eq!(section.attr("id"), Some("/docs/guide#more"));
        assert_eq!(section.child(ns::MALLARD, "title").unwrap().string_value(), "More");
        assert!(section.child(ns::MALLARD, "p").is_none());
    }

    #[test]
    fn test_metadata_extraction() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "guide.page", GUIDE);
        let site = mallard_site(dir.path(), "", BuildOptions::default());
        let tree = site.scan_site().unwrap();
        let page = tree.page_by_site_id("/guide").unwrap();

        assert_eq!(page.get_title(&site, None, None), "Text title");
        assert_eq!(page.get_title(&site, Some("search"), None), "Search title");
        assert_eq!(page.get_desc(&site, None, None), "Plain desc");
        assert_eq!(page.get_keywords(&site, None, None), "one two");
        let content = page.get_content(&site, None, None);
        assert!(content.contains("Display title"));
        assert!(content.contains("Body"));
        assert!(!content.contains("Plain desc"));
    }

    #[test]
    fn test_title_falls_back_to_display_title() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.page", &page_xml("index", "Home"));
        let site = mallard_site(dir.path(), "", BuildOptions::default());
        let tree = site.scan_site().unwrap();
        let page = tree.page_by_site_id("/index").unwrap();
        assert_eq!(page.get_title(&site, Some("search"), None), "Home");
        assert_eq!(page.get_desc(&site, None, None), "");
    }

    #[test]
    fn test_media_local_references_only() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "guide.page", GUIDE);
        let site = mallard_site(dir.path(), "", BuildOptions::default());
        let tree = site.scan_site().unwrap();
        let media = tree.page_by_site_id("/guide").unwrap().get_media(&site);
        assert_eq!(media.into_iter().collect::<Vec<_>>(), vec!["figures/a.png"]);
    }

    #[test]
    fn test_build_html_transform_params() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.page", &page_xml("index", "Home"));
        write(dir.path(), "__pintail__/tools/pintail-html-mallard-local.xsl", "<xsl:stylesheet/>");
        let (site, calls) = crate::test_support::mallard_site_with_calls(
            dir.path(),
            "[\"/\"]\neditor_mode = \"true\"\n",
            BuildOptions::default(),
        );
        site.build_html().unwrap();

        let transforms: Vec<_> = calls
            .commands()
            .into_iter()
            .filter(|c| c.program == "xsltproc")
            .collect();
        assert_eq!(transforms.len(), 1);
        let args = &transforms[0].args;
        assert_eq!(args[0], "--xinclude");
        assert_eq!(&args[1..4], ["--stringparam", "pintail.format", "mallard"]);
        let editor = args.iter().position(|a| a == "mal2html.editor_mode").unwrap();
        assert_eq!(args[editor + 1], "1");
        assert!(args.last().unwrap().ends_with("__pintail__/stage/index.page"));
    }

    #[test]
    fn test_stacked_build_once_per_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.page", &page_xml("a", "A"));
        write(dir.path(), "b.page", &page_xml("b", "B"));
        write(dir.path(), "__pintail__/tools/pintail-html-mallard-local.xsl", "<xsl:stylesheet/>");
        let (site, calls) = crate::test_support::mallard_site_with_calls(
            dir.path(),
            "[pintail]\nmallard_stack_dirs = true\n",
            BuildOptions::default(),
        );
        site.build_html().unwrap();

        assert_eq!(calls.count("xsltproc"), 1);
        let stack = Document::from_file(&dir.path().join("__pintail__/stage/__pintail_stack__.stack")).unwrap();
        assert!(stack.root.is(ns::MALLARD, "stack"));
        let hrefs: Vec<&str> = stack.root.children.iter().filter_map(|c| c.attr("href")).collect();
        assert_eq!(hrefs.len(), 2);
        assert!(hrefs[0].ends_with("stage/a.page"));
    }

    #[test]
    fn test_editor_mode_inherited_and_overridden() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/index.page", &page_xml("index", "A"));
        write(dir.path(), "a/b/index.page", &page_xml("index", "B"));
        write(dir.path(), "a/c/index.page", &page_xml("index", "C"));
        let site = mallard_site(
            dir.path(),
            "[\"/a/\"]\neditor_mode = \"true\"\n\n[\"/a/c/\"]\neditor_mode = \"false\"\n",
            BuildOptions::default(),
        );
        let tree = site.scan_site().unwrap();

        let params = |id: &str| {
            let page = tree.page_by_site_id(id).unwrap();
            MallardTools.xsl_params(&site, "html", XslTarget::Page(page), None)
        };
        assert_eq!(params("/a/b/index"), vec![("mal2html.editor_mode".to_owned(), "1".to_owned())]);
        assert!(params("/a/c/index").is_empty());
    }

    #[test]
    fn test_css_per_locale() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.page", &page_xml("a", "A"));
        write(dir.path(), "b.page", &page_xml("b", "B"));
        write(dir.path(), "custom.css", "/* custom */\n");
        let (site, calls) = crate::test_support::mallard_site_with_calls(
            dir.path(),
            "[pintail]\ncustom_css = \"custom.css\"\n",
            BuildOptions::default(),
        );
        site.build_cache().unwrap();
        MallardTools.build_css(&site).unwrap();

        let css: Vec<_> = calls
            .commands()
            .into_iter()
            .filter(|c| c.program == "xsltproc")
            .collect();
        assert_eq!(css.len(), 1);
        assert!(css[0].args.contains(&"/a".to_owned()));
        let out = dir.path().join("__pintail__/build/pintail-mallard-C.css");
        assert_eq!(std::fs::read_to_string(out).unwrap(), "/* custom */\n");
        assert!(dir.path().join("__pintail__/tools/pintail-css-mallard.xsl").exists());
    }

    #[test]
    fn test_tools_wrappers() {
        let dir = tempfile::tempdir().unwrap();
        let site = mallard_site(dir.path(), "[pintail]\ncustom_xsl = \"site.xsl\"\n", BuildOptions::default());
        MallardTools.build_tools(&site).unwrap();

        let local = Document::from_file(&dir.path().join("__pintail__/tools/pintail-html-mallard-local.xsl")).unwrap();
        let hrefs: Vec<&str> = local.root.children.iter().filter_map(|c| c.attr("href")).collect();
        assert_eq!(hrefs[0], "pintail-html-mallard.xsl");
        assert!(hrefs[1].ends_with("site.xsl"));
        let param = local.root.child(ns::XSL, "param").unwrap();
        assert_eq!(param.attr("name"), Some("mal.link.extension"));

        let html = Document::from_file(&dir.path().join("__pintail__/tools/pintail-html-mallard.xsl")).unwrap();
        assert!(html.root.children[0].attr("href").unwrap().ends_with("xslt/mallard/html/mal2html.xsl"));
    }
}
