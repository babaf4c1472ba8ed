//! Working directory layout.
//!
//! Everything Pintail writes lives under `__pintail__` next to the config
//! file:
//!
//! ```text
//! __pintail__/
//!   stage/            staged source-language documents
//!   stage-<lang>/     staged translations
//!   build/            output site
//!   tools/            generated stylesheets and cache documents
//!   git/<slug>/       remote source checkouts
//! ```

use std::path::{Path, PathBuf};

use crate::SiteError;

/// Name of the private working directory.
pub const PINTAIL_DIR: &str = "__pintail__";

/// Derived filesystem locations for a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    topdir: PathBuf,
    pindir: PathBuf,
}

impl SitePaths {
    /// Create paths rooted at the site directory `topdir`.
    pub fn new(topdir: impl Into<PathBuf>) -> Self {
        let topdir = topdir.into();
        let pindir = topdir.join(PINTAIL_DIR);
        Self { topdir, pindir }
    }

    /// Site directory containing the config file.
    pub fn topdir(&self) -> &Path {
        &self.topdir
    }

    /// Private working directory.
    pub fn pindir(&self) -> &Path {
        &self.pindir
    }

    /// Stage root for a language.
    pub fn stage(&self, lang: Option<&str>) -> PathBuf {
        match lang {
            Some(lang) => self.pindir.join(format!("stage-{lang}")),
            None => self.pindir.join("stage"),
        }
    }

    /// Output root.
    pub fn target(&self) -> PathBuf {
        self.pindir.join("build")
    }

    /// Generated tools directory.
    pub fn tools(&self) -> PathBuf {
        self.pindir.join("tools")
    }

    /// Cache document for a language.
    pub fn cache(&self, lang: Option<&str>) -> PathBuf {
        match lang {
            Some(lang) => self.tools().join(format!("pintail-{lang}.cache")),
            None => self.tools().join("pintail.cache"),
        }
    }

    /// Root for remote checkouts.
    pub fn git(&self) -> PathBuf {
        self.pindir.join("git")
    }

    /// Source directory for a directory path under the site directory.
    pub fn source_dir(&self, dir_path: &str) -> PathBuf {
        self.topdir.join(relative(dir_path))
    }

    /// Stage directory for a directory path.
    pub fn stage_dir(&self, dir_path: &str, lang: Option<&str>) -> PathBuf {
        self.stage(lang).join(relative(dir_path))
    }

    /// Output directory for a directory path.
    pub fn target_dir(&self, dir_path: &str) -> PathBuf {
        self.target().join(relative(dir_path))
    }

    /// Output location of a media reference found in `dir_path`.
    ///
    /// `/`-prefixed references are relative to the output root, others to
    /// the directory. Translations get a `.<lang>` suffix.
    pub fn media_target(&self, dir_path: &str, media: &str, lang: Option<&str>) -> PathBuf {
        let suffix = lang.map(|l| format!(".{l}")).unwrap_or_default();
        match media.strip_prefix('/') {
            Some(rooted) => self.target().join(format!("{rooted}{suffix}")),
            None => self.target_dir(dir_path).join(format!("{media}{suffix}")),
        }
    }

    /// Shorten paths under the working directory for log output.
    pub fn shorten<'a>(&self, data: &'a str) -> &'a str {
        let topdir = self.topdir.to_string_lossy();
        let pindir = self.pindir.to_string_lossy();
        if data.starts_with(&format!("{pindir}/")) {
            data.get(topdir.len() + 1..).unwrap_or(data)
        } else {
            data
        }
    }
}

/// Strip the leading slash of a directory path.
fn relative(dir_path: &str) -> &str {
    dir_path.strip_prefix('/').unwrap_or(dir_path)
}

/// Create a directory and its parents.
///
/// # Errors
///
/// Returns [`SiteError::Io`] if the directory cannot be created.
pub fn make_dirs(path: &Path) -> Result<(), SiteError> {
    std::fs::create_dir_all(path).map_err(SiteError::io(path))
}

/// Write `content` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`SiteError::Io`] if the file cannot be written.
pub fn write_file(path: &Path, content: &str) -> Result<(), SiteError> {
    if let Some(parent) = path.parent() {
        make_dirs(parent)?;
    }
    std::fs::write(path, content).map_err(SiteError::io(path))
}

/// Copy `from` to `to`, creating parent directories of `to`.
///
/// # Errors
///
/// Returns [`SiteError::Io`] if the copy fails.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), SiteError> {
    if let Some(parent) = to.parent() {
        make_dirs(parent)?;
    }
    std::fs::copy(from, to).map_err(SiteError::io(from))?;
    Ok(())
}

/// Lossy string form of a path for stylesheet parameters and arguments.
pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> SitePaths {
        SitePaths::new("/site")
    }

    #[test]
    fn test_layout() {
        let p = paths();
        assert_eq!(p.pindir(), Path::new("/site/__pintail__"));
        assert_eq!(p.stage(None), Path::new("/site/__pintail__/stage"));
        assert_eq!(p.stage(Some("de")), Path::new("/site/__pintail__/stage-de"));
        assert_eq!(p.target(), Path::new("/site/__pintail__/build"));
        assert_eq!(
            p.cache(None),
            Path::new("/site/__pintail__/tools/pintail.cache")
        );
        assert_eq!(
            p.cache(Some("de")),
            Path::new("/site/__pintail__/tools/pintail-de.cache")
        );
        assert_eq!(p.git(), Path::new("/site/__pintail__/git"));
    }

    #[test]
    fn test_directory_locations() {
        let p = paths();
        assert_eq!(p.source_dir("/"), Path::new("/site"));
        assert_eq!(p.source_dir("/guide/"), Path::new("/site/guide/"));
        assert_eq!(
            p.stage_dir("/guide/", Some("fr")),
            Path::new("/site/__pintail__/stage-fr/guide/")
        );
        assert_eq!(
            p.target_dir("/guide/"),
            Path::new("/site/__pintail__/build/guide/")
        );
    }

    #[test]
    fn test_media_target() {
        let p = paths();
        assert_eq!(
            p.media_target("/guide/", "figures/a.png", None),
            Path::new("/site/__pintail__/build/guide/figures/a.png")
        );
        assert_eq!(
            p.media_target("/guide/", "/shared/logo.svg", Some("de")),
            Path::new("/site/__pintail__/build/shared/logo.svg.de")
        );
    }

    #[test]
    fn test_shorten() {
        let p = paths();
        assert_eq!(
            p.shorten("/site/__pintail__/tools/pintail.cache"),
            "__pintail__/tools/pintail.cache"
        );
        assert_eq!(p.shorten("/guide/index"), "/guide/index");
    }

    #[test]
    fn test_write_and_copy_create_parents() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("x/y/a.txt");
        let b = dir.path().join("z/b.txt");
        write_file(&a, "hi").unwrap();
        copy_file(&a, &b).unwrap();
        assert_eq!(std::fs::read_to_string(b).unwrap(), "hi");
    }

    #[test]
    fn test_copy_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("nope"), &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, SiteError::Io { .. }));
    }
}
