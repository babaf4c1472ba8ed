//! `pintail build` and the single-step commands.

use std::path::PathBuf;

use clap::Args;
use pintail_config::CONFIG_FILENAME;
use pintail_site::{BuildCommand, BuildOptions, Registry, Site, SystemRunner};

use crate::error::CliError;
use crate::output::Output;

/// Arguments shared by every build command.
#[derive(Args, Debug)]
pub(crate) struct BuildArgs {
    /// Configuration file; the site directory is its parent.
    #[arg(short, long, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    /// Build for local previewing with relative links.
    #[arg(short, long)]
    local: bool,

    /// Don't pull existing git checkouts.
    #[arg(long)]
    no_update: bool,

    /// Skip the search provider.
    #[arg(long)]
    no_search: bool,

    /// Skip the translation provider.
    #[arg(long)]
    no_translation: bool,

    /// Show build progress.
    #[arg(short, long)]
    pub(crate) verbose: bool,

    /// Limit the build to these directories (`/guide/`), pages
    /// (`/guide/intro`), or page sets (`/guide/*`).
    filter: Vec<String>,
}

impl BuildArgs {
    fn options(self, command: BuildCommand) -> (PathBuf, BuildOptions) {
        let options = BuildOptions {
            command: Some(command),
            local: self.local,
            search: !self.no_search,
            translation: !self.no_translation,
            update: !self.no_update,
            verbose: self.verbose,
            filter: self.filter,
        };
        (self.config, options)
    }

    pub(crate) fn execute(self, command: BuildCommand) -> Result<(), CliError> {
        let output = Output::new();
        let (config, options) = self.options(command);

        let mut registry = Registry::with_core();
        pintail_formats::register_formats(&mut registry);
        let site = Site::new(&config, options, registry, Box::new(SystemRunner))?;

        output.info(&format!("Site: {}", site.paths().topdir().display()));
        let elapsed = site.run()?;
        output.success(&format!(
            "{} finished in {:.1}s, output in {}",
            command.as_str(),
            elapsed.as_secs_f64(),
            site.paths().target().display()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: BuildArgs,
    }

    fn parse(argv: &[&str]) -> (PathBuf, BuildOptions) {
        let cli = TestCli::parse_from(std::iter::once("pintail").chain(argv.iter().copied()));
        cli.args.options(BuildCommand::Build)
    }

    #[test]
    fn test_defaults() {
        let (config, options) = parse(&[]);
        assert_eq!(config, PathBuf::from("pintail.toml"));
        assert!(!options.local);
        assert!(options.search);
        assert!(options.translation);
        assert!(options.update);
        assert!(options.filter.is_empty());
    }

    #[test]
    fn test_flags_and_filter() {
        let (config, options) = parse(&[
            "-c",
            "site/pintail.toml",
            "--local",
            "--no-update",
            "--no-search",
            "--no-translation",
            "-v",
            "/guide/",
            "/about/index",
        ]);
        assert_eq!(config, PathBuf::from("site/pintail.toml"));
        assert!(options.local);
        assert!(!options.search);
        assert!(!options.translation);
        assert!(!options.update);
        assert!(options.verbose);
        assert_eq!(options.filter, vec!["/guide/", "/about/index"]);
        assert_eq!(options.command, Some(BuildCommand::Build));
    }
}
