//! Directory discovery.
//!
//! Builds the [`SiteTree`] from the filesystem, registered source
//! providers, and directory sections in the configuration.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::rc::Rc;

use crate::directory::{DirectoryId, ScanState};
use crate::source::{Source, SourceOrigin};
use crate::tree::SiteTree;
use crate::{Site, SiteError};

/// Scan the whole site.
///
/// Directory sections in the config without a filesystem counterpart get
/// placeholder directories, with intermediate placeholders as needed, so
/// every configured path is reachable from the root.
pub(crate) fn scan_tree(site: &Site) -> Result<SiteTree, SiteError> {
    let mut tree = SiteTree::new();
    scan_directory(site, &mut tree, DirectoryId::ROOT)?;

    for path in site.config().get_directories() {
        if tree.directory_by_path(&path).is_some() {
            continue;
        }
        let mut parent = DirectoryId::ROOT;
        let mut current = String::from("/");
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current.push_str(part);
            current.push('/');
            parent = match tree.directory_by_path(&current) {
                Some(existing) => existing.id(),
                None => {
                    let id = tree.add_directory(current.clone(), Some(parent));
                    scan_directory(site, &mut tree, id)?;
                    id
                }
            };
        }
    }
    Ok(tree)
}

/// Populate one directory: sources, then subdirectories, then pages.
fn scan_directory(site: &Site, tree: &mut SiteTree, id: DirectoryId) -> Result<(), SiteError> {
    if tree.directory(id).state() == ScanState::Scanned {
        return Ok(());
    }
    let path = tree.directory(id).path().to_owned();

    let mut sources = Vec::new();
    let local = site.paths().source_dir(&path);
    if local.is_dir() {
        sources.push(Source::new(
            path.as_str(),
            id,
            path.as_str(),
            local,
            SourceOrigin::Local,
        ));
    }
    let names = std::iter::once(path.clone()).chain(site.config().get_list("sources", Some(&path)));
    for name in names {
        for provider in site.registry().source_providers() {
            sources.extend(provider.create_sources(site, tree.directory(id), &name)?);
        }
    }
    let sources: Vec<Rc<Source>> = sources.into_iter().map(Rc::new).collect();

    let dir = tree.directory_mut(id);
    dir.sources.clone_from(&sources);
    dir.state = ScanState::Scanned;

    let mut subdirs = BTreeSet::new();
    for source in &sources {
        subdirs.extend(list_subdirectories(source.source_path())?);
    }
    for name in subdirs {
        let subpath = format!("{path}{name}/");
        if site.is_ignored_directory(&subpath) {
            continue;
        }
        let sub = tree.add_directory(subpath, Some(id));
        scan_directory(site, tree, sub)?;
    }

    let mut page_ids = HashSet::new();
    for source in &sources {
        for provider in site.registry().page_providers() {
            for page in provider.create_pages(site, source)? {
                if !page_ids.insert(page.page_id().to_owned()) {
                    return Err(SiteError::DuplicatePage {
                        directory: path,
                        page_id: page.page_id().to_owned(),
                    });
                }
                tree.add_page(id, page);
            }
        }
    }
    Ok(())
}

/// Names of subdirectories of `path`.
fn list_subdirectories(path: &Path) -> Result<Vec<String>, SiteError> {
    let entries = std::fs::read_dir(path).map_err(|source| SiteError::ListDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect())
}
