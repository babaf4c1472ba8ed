//! Search backend contract.

use std::iter;

use crate::directory::{Directory, PageDomains};
use crate::page::Page;
use crate::{Site, SiteError};

/// An indexing backend.
///
/// Only [`SearchProvider::index_page`] is required. The provided methods
/// walk the site, honor the build filter, and skip pages that aren't
/// searchable or whose search domains exclude them.
pub trait SearchProvider {
    /// Index every directory of the site.
    fn index_site(&self, site: &Site) -> Result<(), SiteError> {
        let tree = site.scan_site()?;
        for directory in tree.iter_directories() {
            self.index_directory(site, directory)?;
        }
        Ok(())
    }

    /// Index the pages of one directory in every available language.
    fn index_directory(&self, site: &Site, directory: &Directory) -> Result<(), SiteError> {
        if !site.filter().matches_directory(directory.path()) {
            return Ok(());
        }
        let tree = site.scan_site()?;
        let dir_langs = site.directory_langs(directory);
        let langs: Vec<Option<&str>> = iter::once(None)
            .chain(dir_langs.iter().map(|l| Some(l.as_str())))
            .collect();

        for page in tree.directory_pages(directory.id()) {
            if !site.filter().matches_page(&page.site_id()) || !page.searchable() {
                continue;
            }
            if page.search_domains(site.config(), tree) == PageDomains::Excluded {
                continue;
            }
            for &lang in &langs {
                self.index_page(site, page, lang)?;
            }
        }
        Ok(())
    }

    /// Index one page in one language.
    fn index_page(&self, site: &Site, page: &dyn Page, lang: Option<&str>) -> Result<(), SiteError>;
}
