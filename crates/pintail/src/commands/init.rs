//! `pintail init` command implementation.

use std::path::PathBuf;

use clap::Args;
use pintail_site::init_site;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Site directory (default: current directory).
    directory: Option<PathBuf>,
}

impl InitArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let directory = match self.directory {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let path = init_site(&directory)?;
        Output::new().success(&format!("Created {}", path.display()));
        Ok(())
    }
}
