//! DocBook documents.
//!
//! A source opts in with the `docbook` key naming its main file. The
//! document is staged with `xmllint --xinclude --noent` and parsed once.
//! Structural elements down to the chunk depth become pages of their own;
//! those pages share the parsed document and differ only in which element
//! supplies their title, keywords, and content.
//!
//! Chunks without an id are given `page1`, `page2`, ... in document order,
//! skipping ids already in use, and the staged file is rewritten so the
//! transform sees the same ids.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};
use std::iter;
use std::rc::Rc;

use pintail_site::{
    CssProvider, ExternalCommand, Page, PageBase, PageProvider, Site, SiteError, Source,
    ToolsProvider, WrapperStylesheet, XslParams, XslTarget, make_dirs,
};
use pintail_xml::{Document, Element, ns};

use crate::css::{LOCALE_VARIABLE, css_stylesheet, write_css};
use crate::lang::LangTrees;
use crate::log_id;

/// Value of `pintail.format` for DocBook pages.
pub const DOCBOOK_FORMAT: &str = "docbook";

const HTML_XSL: &str = "pintail-html-docbook-local.xsl";

/// Elements that may start a chunk.
const CHUNKS: [&str; 25] = [
    "appendix",
    "article",
    "bibliography",
    "bibliodiv",
    "book",
    "chapter",
    "colophon",
    "dedication",
    "glossary",
    "glossdiv",
    "index",
    "lot",
    "part",
    "preface",
    "refentry",
    "reference",
    "sect1",
    "sect2",
    "sect3",
    "sect4",
    "sect5",
    "section",
    "setindex",
    "simplesect",
    "toc",
];

/// DocBook 4 info elements. DocBook 5 uses `info` everywhere.
const INFOS: [&str; 18] = [
    "appendixinfo",
    "articleinfo",
    "bibliographyinfo",
    "bookinfo",
    "chapterinfo",
    "glossaryinfo",
    "indexinfo",
    "partinfo",
    "prefaceinfo",
    "refentryinfo",
    "referenceinfo",
    "sect1info",
    "sect2info",
    "sect3info",
    "sect4info",
    "sect5info",
    "sectioninfo",
    "setindexinfo",
];

/// DocBook element named `local`, with or without the DocBook 5 namespace.
fn is_db(element: &Element, local: &str) -> bool {
    matches!(element.namespace.as_deref(), None | Some(ns::DOCBOOK)) && element.local_name() == local
}

fn is_chunk(element: &Element) -> bool {
    matches!(element.namespace.as_deref(), None | Some(ns::DOCBOOK))
        && CHUNKS.contains(&element.local_name())
}

fn is_info(element: &Element) -> bool {
    match element.namespace.as_deref() {
        Some(ns::DOCBOOK) => element.local_name() == "info",
        None => INFOS.contains(&element.name.as_str()),
        Some(_) => false,
    }
}

/// Give every chunk element without an id one. Returns whether anything
/// changed.
fn assign_ids(root: &mut Element) -> bool {
    let mut used: HashSet<String> = root
        .descendants()
        .flat_map(|e| [e.attr("id"), e.attr("xml:id")])
        .flatten()
        .map(str::to_owned)
        .collect();
    let mut next = 1;
    assign_chunk_ids(root, true, &mut used, &mut next)
}

fn assign_chunk_ids(node: &mut Element, is_root: bool, used: &mut HashSet<String>, next: &mut usize) -> bool {
    if !is_chunk(node) {
        return false;
    }
    let mut changed = false;
    if node.id().is_none() {
        let id = if is_root {
            "index".to_owned()
        } else {
            while used.contains(&format!("page{next}")) {
                *next += 1;
            }
            format!("page{next}")
        };
        used.insert(id.clone());
        let attr = if node.namespace.as_deref() == Some(ns::DOCBOOK) {
            "xml:id"
        } else {
            "id"
        };
        node.set_attr(attr, id);
        changed = true;
    }
    for child in &mut node.children {
        changed |= assign_chunk_ids(child, false, used, next);
    }
    changed
}

/// Chunk depth: 1, or 2 for books, unless the document sets
/// `<?db.chunk.max_depth N?>`.
fn max_depth(doc: &Document) -> usize {
    let default = if is_db(&doc.root, "book") { 2 } else { 1 };
    doc.processing_instruction("db.chunk.max_depth")
        .and_then(|pi| pi.trim().parse().ok())
        .unwrap_or(default)
}

/// Ids of the chunks below `node`, in document order.
fn collect_chunks(node: &Element, depth: usize, max_depth: usize, out: &mut Vec<String>) {
    for child in &node.children {
        if !is_chunk(child) {
            continue;
        }
        if let Some(id) = child.id() {
            out.push(id.to_owned());
        }
        if depth < max_depth {
            collect_chunks(child, depth + 1, max_depth, out);
        }
    }
}

/// The element with `id` and its depth below `node`.
fn find_chunk<'a>(node: &'a Element, id: &str, depth: usize) -> Option<(&'a Element, usize)> {
    if node.id() == Some(id) {
        return Some((node, depth));
    }
    node.children
        .iter()
        .find_map(|child| find_chunk(child, id, depth + 1))
}

fn title_of(node: &Element) -> String {
    let mut title = String::new();
    for child in &node.children {
        if is_info(child) {
            if let Some(t) = child.children.iter().filter(|c| is_db(c, "title")).last() {
                title = t.string_value();
            }
        } else if is_db(child, "title") {
            title = child.string_value();
            break;
        }
    }
    title
}

fn keywords_of(node: &Element) -> String {
    let Some(info) = node.children.iter().find(|c| is_info(c)) else {
        return String::new();
    };
    let keywords: Vec<String> = info
        .children
        .iter()
        .filter(|c| is_db(c, "keywordset"))
        .flat_map(|set| set.children.iter().filter(|k| is_db(k, "keyword")))
        .map(Element::string_value)
        .collect();
    keywords.join(", ")
}

/// Text of `node`, leaving out info elements and, when `skip_chunks` is
/// set, chunks that are pages of their own.
fn collect_content(node: &Element, skip_chunks: bool, out: &mut String) {
    if is_info(node) {
        return;
    }
    for child in &node.children {
        if skip_chunks && is_chunk(child) {
            continue;
        }
        out.push_str(&child.text);
        collect_content(child, skip_chunks, out);
        out.push_str(&child.tail);
    }
}

/// A staged DocBook document shared by all of its pages.
#[derive(Debug)]
pub struct DocBookDocument {
    base: PageBase,
    trees: LangTrees,
    max_depth: usize,
}

impl DocBookDocument {
    /// Stage, number, and parse `file`.
    ///
    /// Returns `None`, with a warning, when the staged file can't be
    /// parsed.
    ///
    /// # Errors
    ///
    /// Returns error if staging can't run or the renumbered document can't
    /// be written back.
    pub fn load(site: &Site, source: &Rc<Source>, file: &str) -> Result<Option<Rc<Self>>, SiteError> {
        let base = PageBase::new(Rc::clone(source), file);
        let Some(doc) = stage(site, &base)? else {
            return Ok(None);
        };
        let max_depth = max_depth(&doc);
        Ok(Some(Rc::new(Self {
            base,
            trees: LangTrees::new(doc),
            max_depth,
        })))
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Ids of every chunk page, in document order.
    pub fn chunk_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        collect_chunks(&self.trees.source().root, 1, self.max_depth, &mut ids);
        ids
    }
}

/// Stage the document and number its chunks, rewriting the staged file
/// when ids were added.
fn stage(site: &Site, base: &PageBase) -> Result<Option<Document>, SiteError> {
    let source = base.source();
    let dir = site.paths().stage_dir(source.directory_path(), None);
    make_dirs(&dir)?;
    let staged = dir.join(base.source_file());
    site.log("STAGE", &format!("{}{}", source.directory_path(), base.source_file()));
    site.run_command(
        &ExternalCommand::new("xmllint")
            .args(["--xinclude", "--noent", "-o"])
            .path_arg(&staged)
            .path_arg(&source.source_path().join(base.source_file())),
    )?;
    let mut doc = match Document::from_file(&staged) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(file = %base.source_file(), directory = %source.directory_path(), error = %e, "Skipping unreadable DocBook document");
            return Ok(None);
        }
    };
    if assign_ids(&mut doc.root) {
        doc.write_file(&staged)?;
    }
    Ok(Some(doc))
}

/// One output page of a DocBook document: the primary page (`index`) or
/// a chunk.
///
/// The primary page builds the HTML for the whole document and lists its
/// media; chunk pages exist for the cache, search, and the build filter.
pub struct DocBookPage {
    doc: Rc<DocBookDocument>,
    chunk: Option<String>,
}

impl DocBookPage {
    pub fn primary(doc: &Rc<DocBookDocument>) -> Self {
        Self {
            doc: Rc::clone(doc),
            chunk: None,
        }
    }

    pub fn chunk(doc: &Rc<DocBookDocument>, id: impl Into<String>) -> Self {
        Self {
            doc: Rc::clone(doc),
            chunk: Some(id.into()),
        }
    }

    pub fn is_primary(&self) -> bool {
        self.chunk.is_none()
    }

    /// Document for `lang`. Translations are looked up for the primary
    /// page, whatever page asks.
    fn document(&self, site: &Site, lang: Option<&str>) -> (Rc<Document>, std::path::PathBuf) {
        if self.is_primary() {
            self.doc.trees.get(site, self, lang)
        } else {
            self.doc.trees.get(site, &Self::primary(&self.doc), lang)
        }
    }

    /// Run `f` on the element for this page and its depth.
    fn with_node<T: Default>(&self, site: &Site, lang: Option<&str>, f: impl FnOnce(&Element, usize) -> T) -> T {
        let (doc, _) = self.document(site, lang);
        let found = match &self.chunk {
            None => Some((&doc.root, 0)),
            Some(id) => find_chunk(&doc.root, id, 0),
        };
        found.map(|(node, depth)| f(node, depth)).unwrap_or_default()
    }
}

impl Page for DocBookPage {
    fn base(&self) -> &PageBase {
        &self.doc.base
    }

    fn page_id(&self) -> &str {
        self.chunk.as_deref().unwrap_or("index")
    }

    fn format(&self) -> Option<&'static str> {
        Some(DOCBOOK_FORMAT)
    }

    fn searchable(&self) -> bool {
        true
    }

    fn stage_page(&self, site: &Site) -> Result<(), SiteError> {
        if self.is_primary() {
            stage(site, &self.doc.base)?;
        }
        Ok(())
    }

    fn get_cache_data(&self, site: &Site, lang: Option<&str>) -> Option<Element> {
        if !self.is_primary() {
            return None;
        }
        let (doc, _) = self.document(site, lang);
        let mut info = None;
        let mut title = None;
        for child in &doc.root.children {
            if is_info(child) {
                info = Some(child);
            } else if is_db(child, "title") {
                title = Some(child);
                break;
            }
        }
        let title = title.or_else(|| info.and_then(|i| i.children.iter().find(|c| is_db(c, "title"))));

        let dir = self.directory_path();
        let mut external = Element::with_ns(ns::PINTAIL, "pintail:external")
            .with_attr("id", format!("{dir}index"))
            .with_attr("site:dir", dir);
        if let Some(title) = title {
            external
                .children
                .push(Element::with_ns(ns::MALLARD, "title").with_text(title.string_value()));
        }
        Some(external)
    }

    fn build_html(&self, site: &Site, lang: Option<&str>) -> Result<(), SiteError> {
        if !self.is_primary() {
            return Ok(());
        }
        site.log("HTML", &log_id(lang, &self.site_id()));
        let (_, input) = self.document(site, lang);
        let stylesheet = site.paths().tools().join(HTML_XSL);
        let params = site.xsl_params("html", XslTarget::Page(self), lang);
        site.transform(&stylesheet, &input, None, &params, true)
    }

    fn get_media(&self, _site: &Site) -> BTreeSet<String> {
        let mut refs = BTreeSet::new();
        if !self.is_primary() {
            return refs;
        }
        let local = |value: Option<&str>| value.filter(|v| !v.contains(':')).map(str::to_owned);
        for node in self.doc.trees.source().root.descendants() {
            refs.extend(local(node.attr("fileref")));
            refs.extend(local(node.attr("xlink:href")));
            if node.namespace.is_none() && node.name == "ulink" {
                refs.extend(local(node.attr("url")));
            }
        }
        refs
    }

    fn get_title(&self, site: &Site, _hint: Option<&str>, lang: Option<&str>) -> String {
        self.with_node(site, lang, |node, _| title_of(node))
    }

    fn get_keywords(&self, site: &Site, _hint: Option<&str>, lang: Option<&str>) -> String {
        self.with_node(site, lang, |node, _| keywords_of(node))
    }

    fn get_content(&self, site: &Site, _hint: Option<&str>, lang: Option<&str>) -> String {
        let max_depth = self.doc.max_depth;
        self.with_node(site, lang, |node, depth| {
            let mut out = String::new();
            collect_content(node, depth < max_depth, &mut out);
            out
        })
    }
}

/// Documents loaded during the scan, for CSS generation.
#[derive(Debug, Clone, Default)]
pub struct DocBookDocuments(Rc<RefCell<Vec<Rc<DocBookDocument>>>>);

impl DocBookDocuments {
    fn push(&self, doc: &Rc<DocBookDocument>) {
        self.0.borrow_mut().push(Rc::clone(doc));
    }

    fn all(&self) -> Vec<Rc<DocBookDocument>> {
        self.0.borrow().clone()
    }
}

/// Creates the pages of a source's `docbook` document.
pub struct DocBookPageProvider {
    documents: DocBookDocuments,
}

impl DocBookPageProvider {
    pub fn new(documents: DocBookDocuments) -> Self {
        Self { documents }
    }
}

impl PageProvider for DocBookPageProvider {
    fn create_pages(&self, site: &Site, source: &Rc<Source>) -> Result<Vec<Box<dyn Page>>, SiteError> {
        let Some(file) = site.config().get("docbook", Some(source.name())) else {
            return Ok(Vec::new());
        };
        if !source.source_path().join(&file).is_file() {
            tracing::warn!(file = %file, directory = %source.directory_path(), "DocBook file not found");
            return Ok(Vec::new());
        }
        let Some(doc) = DocBookDocument::load(site, source, &file)? else {
            return Ok(Vec::new());
        };
        self.documents.push(&doc);
        let chunks = doc
            .chunk_ids()
            .into_iter()
            .map(|id| Box::new(DocBookPage::chunk(&doc, id)) as Box<dyn Page>);
        Ok(iter::once(Box::new(DocBookPage::primary(&doc)) as Box<dyn Page>)
            .chain(chunks)
            .collect())
    }
}

/// Tools and CSS for DocBook documents.
#[derive(Debug, Clone, Default)]
pub struct DocBookTools {
    documents: DocBookDocuments,
}

impl DocBookTools {
    pub fn new(documents: DocBookDocuments) -> Self {
        Self { documents }
    }
}

impl ToolsProvider for DocBookTools {
    fn build_tools(&self, site: &Site) -> Result<(), SiteError> {
        let tools = site.paths().tools();
        let xslt = site.yelp_xsl_path().join("xslt");
        WrapperStylesheet::new()
            .import(xslt.join("docbook/html/db2html.xsl"))
            .import(xslt.join("mallard/common/mal-link.xsl"))
            .include("pintail-html.xsl")
            .write(&tools.join("pintail-html-docbook.xsl"))?;
        WrapperStylesheet::new()
            .import("pintail-html-docbook.xsl")
            .param_from("db.chunk.extension", "pintail.extension.link")
            .includes(&site.custom_xsl())
            .write(&tools.join(HTML_XSL))
    }
}

impl CssProvider for DocBookTools {
    fn build_css(&self, site: &Site) -> Result<(), SiteError> {
        let cssxsl = site.paths().tools().join("pintail-css-docbook.xsl");
        css_stylesheet(site, "docbook/html/db2html-division.xsl")
            .raw("<xsl:output method=\"text\"/>")
            .raw("<xsl:param name=\"out\"/>")
            .raw("<xsl:template match=\"/\">")
            .raw("<xsl:for-each select=\"/*\">")
            .raw(LOCALE_VARIABLE)
            .raw("<exsl:document href=\"{$out}\" method=\"text\">")
            .raw(" <xsl:call-template name=\"html.css.content\"/>")
            .raw("</exsl:document>")
            .raw("</xsl:for-each>")
            .raw("</xsl:template>")
            .write(&cssxsl)?;

        let mut seen: Vec<String> = Vec::new();
        for doc in self.documents.all() {
            let primary = DocBookPage::primary(&doc);
            let langs = iter::once(None).chain(site.langs().iter().map(|l| Some(l.as_str())));
            for lang in langs {
                let (tree, input) = primary.document(site, lang);
                let locale = tree
                    .root
                    .attr("xml:lang")
                    .or_else(|| tree.root.attr("lang"))
                    .unwrap_or("C")
                    .to_owned();
                if seen.contains(&locale) {
                    continue;
                }
                let file = format!("pintail-docbook-{locale}.css");
                seen.push(locale);
                write_css(site, &cssxsl, &input, &file, XslParams::new())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::test_support::{mallard_site, mallard_site_with_calls, write};
    use pintail_site::BuildOptions;

    const BOOK: &str = r#"<book>
<bookinfo><title>Manual</title></bookinfo>
<chapter id="intro"><title>Introduction</title>
<para>See <ulink url="http://example.com/">the site</ulink>.</para>
<mediaobject><imageobject><imagedata fileref="figures/arch.png"/></imageobject></mediaobject>
<section><title>Details</title><para>More</para></section>
</chapter>
<chapter><title>Usage</title><para>Run it.</para></chapter>
</book>"#;

    fn book_site(dir: &std::path::Path) -> Site {
        write(dir, "manual/book.xml", BOOK);
        mallard_site(dir, "[\"/manual/\"]\ndocbook = \"book.xml\"\n", BuildOptions::default())
    }

    fn parse(xml: &str) -> Document {
        Document::parse(xml).unwrap()
    }

    #[test]
    fn test_assign_ids_skips_existing() {
        let mut doc = parse(
            r#"<book><chapter><title>A</title></chapter><chapter id="page1"/><chapter><section/></chapter></book>"#,
        );
        assert!(assign_ids(&mut doc.root));
        let ids: Vec<&str> = doc.root.descendants().filter_map(Element::id).collect();
        assert_eq!(ids, vec!["index", "page2", "page1", "page3", "page4"]);
    }

    #[test]
    fn test_assign_ids_stable_and_namespaced() {
        let mut doc = parse(
            r#"<article xmlns="http://docbook.org/ns/docbook" xml:id="art"><section><para/></section></article>"#,
        );
        assert!(assign_ids(&mut doc.root));
        let section = &doc.root.children[0];
        assert_eq!(section.attr("xml:id"), Some("page1"));
        assert_eq!(section.attr("id"), None);
        assert!(section.children[0].id().is_none());

        let mut again = parse(&doc.to_xml_string());
        assert!(!assign_ids(&mut again.root));
    }

    #[test]
    fn test_max_depth() {
        assert_eq!(max_depth(&parse("<article/>")), 1);
        assert_eq!(max_depth(&parse("<book/>")), 2);
        assert_eq!(max_depth(&parse("<?db.chunk.max_depth 3?><book/>")), 3);
        assert_eq!(max_depth(&parse("<?db.chunk.max_depth x?><article/>")), 1);
    }

    #[test]
    fn test_collect_chunks_respects_depth() {
        let doc = parse(
            r#"<book id="index"><chapter id="c1"><section id="s1"><section id="deep"/></section></chapter><chapter id="c2"/></book>"#,
        );
        let mut ids = Vec::new();
        collect_chunks(&doc.root, 1, 2, &mut ids);
        assert_eq!(ids, vec!["c1", "s1", "c2"]);

        let mut shallow = Vec::new();
        collect_chunks(&doc.root, 1, 1, &mut shallow);
        assert_eq!(shallow, vec!["c1", "c2"]);
    }

    #[test]
    fn test_title_and_keywords() {
        let doc = parse(
            r#"<chapter><chapterinfo><title>Info title</title><keywordset><keyword>a</keyword><keyword>b</keyword></keywordset></chapterinfo><title>Display</title></chapter>"#,
        );
        assert_eq!(title_of(&doc.root), "Display");
        assert_eq!(keywords_of(&doc.root), "a, b");

        let doc = parse(r#"<article xmlns="http://docbook.org/ns/docbook"><info><title>Only info</title></info><para/></article>"#);
        assert_eq!(title_of(&doc.root), "Only info");
        assert_eq!(keywords_of(&doc.root), "");
    }

    #[test]
    fn test_content_skips_info_and_chunks() {
        let doc = parse(
            r#"<article><articleinfo><title>Meta</title></articleinfo><para>Top</para><section><para>Nested</para></section></article>"#,
        );
        let mut top = String::new();
        collect_content(&doc.root, true, &mut top);
        assert_eq!(top, "Top");

        let mut all = String::new();
        collect_content(&doc.root, false, &mut all);
        assert_eq!(all, "TopNested");
    }

    #[test]
    fn test_chunks_become_pages() {
        let dir = tempfile::tempdir().unwrap();
        let site = book_site(dir.path());
        let tree = site.scan_site().unwrap();

        assert_eq!(tree.page_count(), 4);
        for id in ["/manual/index", "/manual/intro", "/manual/page1", "/manual/page2"] {
            let page = tree.page_by_site_id(id).unwrap();
            assert_eq!(page.format(), Some(DOCBOOK_FORMAT));
        }
        let usage = tree.page_by_site_id("/manual/page2").unwrap();
        assert_eq!(usage.get_title(&site, None, None), "Usage");
        let intro = tree.page_by_site_id("/manual/intro").unwrap();
        assert_eq!(intro.get_title(&site, None, None), "Introduction");
    }

    #[test]
    fn test_staged_file_keeps_assigned_ids() {
        let dir = tempfile::tempdir().unwrap();
        let site = book_site(dir.path());
        let tree = site.scan_site().unwrap();
        let index = tree.page_by_site_id("/manual/index").unwrap();
        index.stage_page(&site).unwrap();

        let staged = Document::from_file(&index.stage_path(&site, None)).unwrap();
        assert_eq!(staged.root.id(), Some("index"));
        let ids: Vec<&str> = staged
            .root
            .children
            .iter()
            .filter(|c| c.name == "chapter")
            .filter_map(Element::id)
            .collect();
        assert_eq!(ids, vec!["intro", "page2"]);
    }

    #[test]
    fn test_primary_page_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let site = book_site(dir.path());
        let tree = site.scan_site().unwrap();
        let index = tree.page_by_site_id("/manual/index").unwrap();

        assert_eq!(index.get_title(&site, None, None), "Manual");
        let media: Vec<String> = index.get_media(&site).into_iter().collect();
        assert_eq!(media, vec!["figures/arch.png"]);

        let cache = index.get_cache_data(&site, None).unwrap();
        assert_eq!(cache.name, "pintail:external");
        assert_eq!(cache.attr("id"), Some("/manual/index"));
        assert_eq!(cache.attr("site:dir"), Some("/manual/"));
        assert_eq!(cache.children[0].string_value(), "Manual");

        let chapter = tree.page_by_site_id("/manual/intro").unwrap();
        assert!(chapter.get_cache_data(&site, None).is_none());
        assert!(chapter.get_media(&site).is_empty());
    }

    #[test]
    fn test_chapter_content_leaves_out_nested_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let site = book_site(dir.path());
        let tree = site.scan_site().unwrap();
        let intro = tree.page_by_site_id("/manual/intro").unwrap();
        let content = intro.get_content(&site, None, None);
        assert!(content.contains("the site"));
        assert!(!content.contains("More"));
    }

    #[test]
    fn test_missing_docbook_file_yields_no_pages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("manual")).unwrap();
        let site = mallard_site(dir.path(), "[\"/manual/\"]\ndocbook = \"gone.xml\"\n", BuildOptions::default());
        assert_eq!(site.scan_site().unwrap().page_count(), 0);
    }

    #[test]
    fn test_build_html_only_for_primary_page() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "manual/book.xml", BOOK);
        write(dir.path(), "__pintail__/tools/pintail-html-docbook-local.xsl", "<xsl:stylesheet/>");
        let (site, calls) = mallard_site_with_calls(
            dir.path(),
            "[\"/manual/\"]\ndocbook = \"book.xml\"\n",
            BuildOptions::default(),
        );
        site.build_html().unwrap();
        let transforms: Vec<_> = calls
            .commands()
            .into_iter()
            .filter(|c| c.program == "xsltproc")
            .collect();
        assert_eq!(transforms.len(), 1);
        assert!(transforms[0].args.iter().any(|a| a.ends_with("stage/manual/book.xml")));
    }
}
