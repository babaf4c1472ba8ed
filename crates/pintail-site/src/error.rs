//! Error types for site scanning and building.

use std::path::{Path, PathBuf};

use pintail_config::ConfigError;
use pintail_xml::XmlError;

/// Error raised while scanning or building a site.
///
/// Only structural problems are errors. Degraded conditions such as a
/// failed `git pull` or a missing media file are logged as warnings and
/// the build continues.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Two pages in one directory share a page id.
    #[error("Duplicate page id {page_id} in {directory}")]
    DuplicatePage {
        /// Directory path, such as `/guide/`.
        directory: String,
        /// The colliding page id.
        page_id: String,
    },

    /// A source directory could not be listed.
    #[error("Failed to list files in {}: {source}", path.display())]
    ListDirectory {
        /// Source directory.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cloning a remote repository failed.
    #[error("Failed to clone {repository}@{branch}")]
    GitClone {
        /// Repository URL.
        repository: String,
        /// Branch name.
        branch: String,
    },

    /// An external program could not be started.
    #[error("Failed to run {program}: {source}")]
    Process {
        /// Program name.
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// File system error.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML read or parse error.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A configured provider identifier is not registered.
    #[error("Unknown {kind} provider: {name}")]
    UnknownProvider {
        /// Provider kind (`search` or `translation`).
        kind: &'static str,
        /// Configured identifier.
        name: String,
    },

    /// A hook script exited unsuccessfully.
    #[error("{script} failed with exit code {code}")]
    Script {
        /// Config key of the script (`before_script`, ...).
        script: String,
        /// Exit code, or -1 when killed by a signal.
        code: i32,
    },

    /// A transform stylesheet does not exist.
    #[error("Stylesheet not found: {}", .0.display())]
    MissingStylesheet(PathBuf),

    /// Refusing to overwrite an existing file.
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
}

impl SiteError {
    /// Build a mapper from `std::io::Error` to [`SiteError::Io`] for `path`.
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
