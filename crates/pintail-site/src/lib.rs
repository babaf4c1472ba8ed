//! Site model and build orchestration for Pintail.
//!
//! This crate provides:
//! - [`Site`]: configuration, scanning, and the build pipeline
//! - [`SiteTree`]: the scanned directories and pages
//! - [`Registry`]: extension points for formats, sources, search, and
//!   translation
//!
//! Document formats live in `pintail-formats` and plug in through
//! [`PageProvider`]. External tools run through a [`ProcessRunner`].
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
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
//! # Ok(())
//! # }
//! ```

mod cache;
mod directory;
mod error;
mod feeds;
mod filter;
mod git;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod page;
mod paths;
mod process;
mod registry;
mod scan;
mod script;
mod search;
mod site;
mod source;
#[cfg(test)]
mod test_support;
mod tools;
mod transform;
mod translation;
mod tree;
mod xslt;

pub use directory::{Directory, DirectoryId, Domain, DomainEntry, PageDomains, ScanState};
pub use error::SiteError;
pub use filter::Filter;
pub use git::{GitSourceProvider, GitXslProvider};
#[cfg(any(test, feature = "mock"))]
pub use mock::{CallLog, MockRunner, copy_input_to_output};
pub use page::{Page, PageBase};
pub use paths::{PINTAIL_DIR, SitePaths, copy_file, make_dirs, path_string, write_file};
pub use process::{CommandOutput, ExternalCommand, OutputMode, ProcessRunner, SystemRunner};
pub use registry::{
    CssProvider, PageProvider, Registry, SearchFactory, SourceProvider, ToolsProvider,
    TranslationFactory, XslProvider, XslTarget,
};
pub use search::SearchProvider;
pub use site::{BuildCommand, BuildOptions, Site, init_site};
pub use source::{Source, SourceOrigin};
pub use tools::YELP_XSL_REPOSITORY;
pub use transform::{Stylesheet, XslParams};
pub use translation::TranslationProvider;
pub use tree::{PageId, SiteTree};
pub use xslt::WrapperStylesheet;
