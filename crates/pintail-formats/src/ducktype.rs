//! Ducktype pages.
//!
//! Ducktype is a compact syntax for Mallard. Each `.duck` file is compiled
//! into a `.page` file in the stage and is a Mallard page from then on.

use std::path::Path;
use std::rc::Rc;

use pintail_site::{ExternalCommand, Page, PageProvider, Site, SiteError, Source};

use crate::mallard::{MallardPageProvider, MallardSyntax, StackTracker};

pub(crate) const EXTENSION: &str = ".duck";

/// Staged file name: `.duck` becomes `.page`.
pub(crate) fn stage_file(source_file: &str) -> String {
    match source_file.strip_suffix(EXTENSION) {
        Some(stem) => format!("{stem}.page"),
        None => source_file.to_owned(),
    }
}

pub(crate) fn compile_command(stage: &Path, source: &Path) -> ExternalCommand {
    ExternalCommand::new("ducktype")
        .arg("-o")
        .path_arg(stage)
        .path_arg(source)
}

/// Creates Mallard pages from `.duck` files.
pub struct DucktypePageProvider(MallardPageProvider);

impl DucktypePageProvider {
    pub fn new(stacks: StackTracker) -> Self {
        Self(MallardPageProvider::with_syntax(MallardSyntax::Ducktype, stacks))
    }
}

impl PageProvider for DucktypePageProvider {
    fn create_pages(&self, site: &Site, source: &Rc<Source>) -> Result<Vec<Box<dyn Page>>, SiteError> {
        self.0.create_pages(site, source)
    }
}
