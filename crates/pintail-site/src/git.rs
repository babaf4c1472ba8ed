//! Sources checked out from git repositories.
//!
//! A config section with `git_repository` contributes a shallow clone of
//! that repository to the directory. Clones live under `__pintail__/git/`
//! and are reused across builds; `git_update = false` pins a checkout.

use crate::directory::Directory;
use crate::paths::make_dirs;
use crate::process::ExternalCommand;
use crate::registry::{SourceProvider, XslProvider, XslTarget};
use crate::source::{Source, SourceOrigin};
use crate::{Site, SiteError};

/// Creates [`SourceOrigin::Git`] sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitSourceProvider;

impl SourceProvider for GitSourceProvider {
    fn create_sources(
        &self,
        site: &Site,
        directory: &Directory,
        name: &str,
    ) -> Result<Vec<Source>, SiteError> {
        let config = site.config();
        let Some(repository) = config.get_expanded("git_repository", Some(name))? else {
            return Ok(Vec::new());
        };
        let branch = config
            .get("git_branch", Some(name))
            .unwrap_or_else(|| "master".to_owned());
        let subdirectory = config.get("git_directory", Some(name)).unwrap_or_default();

        let gitdir = site.paths().git();
        let slug = format!("{}@@{}", repository.replace('/', "!"), branch.replace('/', "!"));
        let checkout = gitdir.join(&slug);
        let label = format!("{repository}@{branch}");

        if checkout.exists() {
            let pinned = config.get_bool("git_update", Some(name)) == Some(false);
            if site.options().update && !pinned {
                site.log("UPDATE", &label);
                let pulled = site.runner().run(
                    &ExternalCommand::new("git")
                        .args(["pull", "-q", "-r", "origin", branch.as_str()])
                        .cwd(&checkout),
                );
                match pulled {
                    Ok(output) if output.success => {}
                    Ok(_) => {
                        tracing::warn!(repository = %repository, branch = %branch, "Failed to update git checkout");
                    }
                    Err(e) => {
                        tracing::warn!(repository = %repository, branch = %branch, error = %e, "Failed to update git checkout");
                    }
                }
            }
        } else {
            site.log("CLONE", &label);
            make_dirs(&gitdir)?;
            let output = site.runner().run(
                &ExternalCommand::new("git")
                    .args(["clone", "-q", "-b", branch.as_str(), "--depth=1"])
                    .arg(repository.as_str())
                    .arg(slug)
                    .cwd(&gitdir),
            )?;
            if !output.success {
                return Err(SiteError::GitClone { repository, branch });
            }
        }

        Ok(vec![Source::new(
            name,
            directory.id(),
            directory.path(),
            checkout.join(&subdirectory),
            SourceOrigin::Git {
                repository,
                branch,
                subdirectory,
            },
        )])
    }
}

/// Passes the git origin of a page to stylesheets.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitXslProvider;

impl XslProvider for GitXslProvider {
    fn xsl_params(
        &self,
        _site: &Site,
        output: &str,
        target: XslTarget<'_>,
        _lang: Option<&str>,
    ) -> Vec<(String, String)> {
        let XslTarget::Page(page) = target else {
            return Vec::new();
        };
        if output != "html" {
            return Vec::new();
        }
        match page.source().origin() {
            SourceOrigin::Git {
                repository,
                branch,
                subdirectory,
            } => vec![
                ("pintail.git.repository".to_owned(), repository.clone()),
                ("pintail.git.branch".to_owned(), branch.clone()),
                ("pintail.git.directory".to_owned(), subdirectory.clone()),
            ],
            _ => Vec::new(),
        }
    }
}
