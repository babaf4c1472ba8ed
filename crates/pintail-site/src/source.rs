//! Content origins feeding a directory.

use std::path::{Path, PathBuf};

use crate::directory::DirectoryId;

/// Where a source's files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// The matching directory under the site directory.
    Local,
    /// A checkout of a remote git repository.
    Git {
        repository: String,
        branch: String,
        /// Subdirectory of the checkout (`git_directory`), possibly empty.
        subdirectory: String,
    },
    /// Provided by a plugin; the string names the plugin.
    Other(String),
}

/// One origin of files for one output directory.
///
/// `name` is the config section describing the source. For a local source
/// it equals the directory path; for sources listed in `sources` it is the
/// listed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    name: String,
    directory: DirectoryId,
    directory_path: String,
    source_path: PathBuf,
    origin: SourceOrigin,
}

impl Source {
    /// Create a source for `directory` backed by `source_path`.
    pub fn new(
        name: impl Into<String>,
        directory: DirectoryId,
        directory_path: impl Into<String>,
        source_path: impl Into<PathBuf>,
        origin: SourceOrigin,
    ) -> Self {
        Self {
            name: name.into(),
            directory,
            directory_path: directory_path.into(),
            source_path: source_path.into(),
            origin,
        }
    }

    /// Config section name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning directory.
    pub fn directory(&self) -> DirectoryId {
        self.directory
    }

    /// Path of the owning directory, such as `/guide/`.
    pub fn directory_path(&self) -> &str {
        &self.directory_path
    }

    /// Absolute filesystem location of the source's files.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }

    /// Regular files in the source, sorted by name.
    ///
    /// Unreadable directories yield no files; listing failures surface
    /// earlier during subdirectory discovery.
    pub fn files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.source_path) else {
            return Vec::new();
        };
        let mut files: Vec<String> = entries
            .flatten()
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_sorted_and_regular_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.page"), "").unwrap();
        std::fs::write(dir.path().join("a.page"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let source = Source::new("/", DirectoryId::ROOT, "/", dir.path(), SourceOrigin::Local);
        assert_eq!(source.files(), vec!["a.page", "b.page"]);
    }

    #[test]
    fn test_files_missing_directory() {
        let source = Source::new(
            "/x/",
            DirectoryId::ROOT,
            "/x/",
            "/nonexistent/pintail",
            SourceOrigin::Local,
        );
        assert!(source.files().is_empty());
    }
}
