//! Output directory nodes and search-domain policy.
//!
//! Directories live in the [`SiteTree`] arena and refer to each other by
//! [`DirectoryId`]. The parent link is a plain index, so parents and
//! children never own each other.

use std::cell::OnceCell;
use std::rc::Rc;

use pintail_config::Config;

use crate::source::Source;
use crate::tree::{PageId, SiteTree};

/// Index of a directory in the site tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectoryId(pub(crate) usize);

impl DirectoryId {
    /// The root directory `/`.
    pub const ROOT: Self = Self(0);
}

/// Scan lifecycle of a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Unscanned,
    Scanned,
}

/// A search domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Domain {
    /// A directory path whose pages are searched together.
    Path(String),
    /// Not indexed.
    None,
}

impl Domain {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Path(p) => p,
            Self::None => "none",
        }
    }
}

/// One entry of a directory's `search_domain` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEntry {
    /// Applies to every page in the directory.
    All(Domain),
    /// Applies only to the named page (`page_id:domain`).
    Page { page_id: String, domain: Domain },
}

/// Search domains resolved for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageDomains {
    /// The page is not indexed.
    Excluded,
    /// Domains the page is indexed into; the first is its primary domain.
    Domains(Vec<String>),
}

/// A node in the output tree.
#[derive(Debug)]
pub struct Directory {
    id: DirectoryId,
    path: String,
    parent: Option<DirectoryId>,
    pub(crate) subdirs: Vec<DirectoryId>,
    pub(crate) sources: Vec<Rc<Source>>,
    pub(crate) pages: Vec<PageId>,
    pub(crate) state: ScanState,
    search_domains: OnceCell<Vec<DomainEntry>>,
}

impl Directory {
    pub(crate) fn new(id: DirectoryId, path: String, parent: Option<DirectoryId>) -> Self {
        Self {
            id,
            path,
            parent,
            subdirs: Vec::new(),
            sources: Vec::new(),
            pages: Vec::new(),
            state: ScanState::Unscanned,
            search_domains: OnceCell::new(),
        }
    }

    pub fn id(&self) -> DirectoryId {
        self.id
    }

    /// Absolute path, starting and ending with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parent(&self) -> Option<DirectoryId> {
        self.parent
    }

    pub fn subdirs(&self) -> &[DirectoryId] {
        &self.subdirs
    }

    pub fn sources(&self) -> &[Rc<Source>] {
        &self.sources
    }

    pub fn pages(&self) -> &[PageId] {
        &self.pages
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Resolved `search_domain` entries, computed once.
    ///
    /// Keywords: `self` is this directory, `parent` the parent's primary
    /// domain (`/` at the root), `global` is `/`, `none` disables
    /// indexing. Paths starting with `/` are used as-is. Unrecognized
    /// words behave like `parent`. The default list is `parent`.
    ///
    /// The first entry always applies to every page: a list starting with
    /// a page mapping gets the parent's primary domain prepended.
    pub fn search_domains(&self, config: &Config, tree: &SiteTree) -> &[DomainEntry] {
        self.search_domains.get_or_init(|| {
            let words = config.get_list("search_domain", Some(&self.path));
            let words = if words.is_empty() {
                vec!["parent".to_owned()]
            } else {
                words
            };

            let mut entries: Vec<DomainEntry> = words
                .iter()
                .map(|word| match word.split_once(':') {
                    Some((page_id, domain)) => DomainEntry::Page {
                        page_id: page_id.to_owned(),
                        domain: self.resolve_keyword(domain, config, tree),
                    },
                    None => DomainEntry::All(self.resolve_keyword(word, config, tree)),
                })
                .collect();

            if matches!(entries.first(), Some(DomainEntry::Page { .. })) {
                entries.insert(0, DomainEntry::All(self.parent_domain(config, tree)));
            }
            entries
        })
    }

    /// The domain a search started from this directory uses by default.
    pub fn primary_domain(&self, config: &Config, tree: &SiteTree) -> Domain {
        match self.search_domains(config, tree).first() {
            Some(DomainEntry::All(domain)) => domain.clone(),
            _ => Domain::Path("/".to_owned()),
        }
    }

    /// Domains for the page `page_id` in this directory.
    ///
    /// A `none` entry that applies to the page excludes it entirely.
    pub fn page_domains(&self, config: &Config, tree: &SiteTree, page_id: &str) -> PageDomains {
        let mut domains = Vec::new();
        for entry in self.search_domains(config, tree) {
            let domain = match entry {
                DomainEntry::All(domain) => domain,
                DomainEntry::Page {
                    page_id: id,
                    domain,
                } if id == page_id => domain,
                DomainEntry::Page { .. } => continue,
            };
            match domain {
                Domain::None => return PageDomains::Excluded,
                Domain::Path(p) => domains.push(p.clone()),
            }
        }
        PageDomains::Domains(domains)
    }

    fn resolve_keyword(&self, word: &str, config: &Config, tree: &SiteTree) -> Domain {
        if word.starts_with('/') {
            return Domain::Path(word.to_owned());
        }
        match word {
            "self" => Domain::Path(self.path.clone()),
            "global" => Domain::Path("/".to_owned()),
            "none" => Domain::None,
            _ => self.parent_domain(config, tree),
        }
    }

    fn parent_domain(&self, config: &Config, tree: &SiteTree) -> Domain {
        match self.parent {
            Some(parent) => tree.directory(parent).primary_domain(config, tree),
            None => Domain::Path("/".to_owned()),
        }
    }
}
