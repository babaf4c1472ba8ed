//! Partial-build path filter.

/// Restricts which directories and pages a build pass touches.
///
/// Entries ending in `/` name a directory subtree. Other entries name a
/// single page by site id. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    entries: Vec<String>,
}

impl Filter {
    /// Build a filter from command-line arguments, adding a leading `/`
    /// where missing.
    pub fn new<S: AsRef<str>>(args: &[S]) -> Self {
        let entries = args
            .iter()
            .map(|a| {
                let a = a.as_ref();
                if a.starts_with('/') {
                    a.to_owned()
                } else {
                    format!("/{a}")
                }
            })
            .collect();
        Self { entries }
    }

    /// Whether any entries are set.
    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Normalized entries.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Whether a directory is inside the filter.
    ///
    /// A directory matches a subtree entry it lies under, and a page entry
    /// that lies under it (so the page's directory gets built).
    pub fn matches_directory(&self, path: &str) -> bool {
        !self.is_active()
            || self.entries.iter().any(|f| {
                if f.ends_with('/') {
                    path.starts_with(f.as_str())
                } else {
                    f.starts_with(path)
                }
            })
    }

    /// Whether a page is inside the filter.
    pub fn matches_page(&self, site_id: &str) -> bool {
        !self.is_active()
            || self.entries.iter().any(|f| {
                if f.ends_with('/') {
                    site_id.starts_with(f.as_str())
                } else {
                    site_id == f
                }
            })
    }
}
