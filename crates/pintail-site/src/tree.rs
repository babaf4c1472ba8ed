//! Arena holding the scanned directory tree and its pages.
//!
//! # Architecture
//!
//! Directories and pages are stored in flat vectors and refer to each
//! other by index. This provides:
//! - O(1) path lookups via the `by_path` `HashMap`
//! - parent links without reference cycles
//! - stable, deterministic traversal order (scan order)

use std::collections::HashMap;

use crate::directory::{Directory, DirectoryId};
use crate::page::Page;

/// Index of a page in the site tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub(crate) usize);

/// The scanned site: every directory and page.
pub struct SiteTree {
    directories: Vec<Directory>,
    pages: Vec<Box<dyn Page>>,
    by_path: HashMap<String, DirectoryId>,
}

impl Default for SiteTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteTree {
    /// Create a tree holding only the root directory `/`.
    pub(crate) fn new() -> Self {
        let root = Directory::new(DirectoryId::ROOT, "/".to_owned(), None);
        Self {
            directories: vec![root],
            pages: Vec::new(),
            by_path: HashMap::from([("/".to_owned(), DirectoryId::ROOT)]),
        }
    }

    /// Add a directory below `parent` and link it as the parent's last
    /// subdirectory.
    pub(crate) fn add_directory(&mut self, path: String, parent: Option<DirectoryId>) -> DirectoryId {
        let id = DirectoryId(self.directories.len());
        self.by_path.insert(path.clone(), id);
        self.directories.push(Directory::new(id, path, parent));
        if let Some(parent) = parent {
            self.directories[parent.0].subdirs.push(id);
        }
        id
    }

    /// Add a page to `directory`.
    pub(crate) fn add_page(&mut self, directory: DirectoryId, page: Box<dyn Page>) -> PageId {
        let id = PageId(self.pages.len());
        self.pages.push(page);
        self.directories[directory.0].pages.push(id);
        id
    }

    pub(crate) fn directory_mut(&mut self, id: DirectoryId) -> &mut Directory {
        &mut self.directories[id.0]
    }

    /// The root directory `/`.
    pub fn root(&self) -> &Directory {
        &self.directories[DirectoryId::ROOT.0]
    }

    /// Directory by id. Ids are only handed out by this tree.
    pub fn directory(&self, id: DirectoryId) -> &Directory {
        &self.directories[id.0]
    }

    /// Directory by path, such as `/guide/`.
    pub fn directory_by_path(&self, path: &str) -> Option<&Directory> {
        self.by_path.get(path).map(|&id| self.directory(id))
    }

    /// Page by id.
    pub fn page(&self, id: PageId) -> &dyn Page {
        self.pages[id.0].as_ref()
    }

    /// Page by site id, such as `/guide/index`.
    pub fn page_by_site_id(&self, site_id: &str) -> Option<&dyn Page> {
        self.pages
            .iter()
            .find(|p| p.site_id() == site_id)
            .map(AsRef::as_ref)
    }

    /// Number of directories, including the root.
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every directory in pre-order: a directory before its subdirectories.
    pub fn iter_directories(&self) -> Vec<&Directory> {
        fn visit<'a>(tree: &'a SiteTree, id: DirectoryId, out: &mut Vec<&'a Directory>) {
            let dir = tree.directory(id);
            out.push(dir);
            for &sub in dir.subdirs() {
                visit(tree, sub, out);
            }
        }

        let mut out = Vec::with_capacity(self.directories.len());
        visit(self, DirectoryId::ROOT, &mut out);
        out
    }

    /// Every page below `id`: the directory's own pages, then each
    /// subdirectory's, depth first.
    pub fn iter_pages(&self, id: DirectoryId) -> Vec<&dyn Page> {
        fn visit<'a>(tree: &'a SiteTree, id: DirectoryId, out: &mut Vec<&'a dyn Page>) {
            let dir = tree.directory(id);
            out.extend(dir.pages().iter().map(|&p| tree.page(p)));
            for &sub in dir.subdirs() {
                visit(tree, sub, out);
            }
        }

        let mut out = Vec::new();
        visit(self, id, &mut out);
        out
    }

    /// Pages directly in `id`.
    pub fn directory_pages(&self, id: DirectoryId) -> impl Iterator<Item = &dyn Page> {
        self.directory(id).pages().iter().map(|&p| self.page(p))
    }
}
