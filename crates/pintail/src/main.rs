//! Pintail CLI - multi-language documentation site builder.
//!
//! Provides commands for:
//! - `init`: Write a sample `pintail.toml`
//! - `build`: Build the whole site, or the pages named by a filter
//! - `css`, `js`, `files`, `feeds`: Run one step of the build

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, InitArgs};
use output::Output;
use pintail_site::BuildCommand;

/// Pintail - build documentation sites from Mallard and DocBook.
#[derive(Parser)]
#[command(name = "pintail", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a sample pintail.toml.
    Init(InitArgs),
    /// Build the site.
    Build(BuildArgs),
    /// Build only the CSS.
    Css(BuildArgs),
    /// Build only the JavaScript.
    Js(BuildArgs),
    /// Copy only the extra files.
    Files(BuildArgs),
    /// Build only the Atom feeds.
    Feeds(BuildArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Init(_) => false,
        Commands::Build(args)
        | Commands::Css(args)
        | Commands::Js(args)
        | Commands::Files(args)
        | Commands::Feeds(args) => args.verbose,
    };

    // --verbose shows build progress, otherwise RUST_LOG or warnings only
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Init(args) => args.execute(),
        Commands::Build(args) => args.execute(BuildCommand::Build),
        Commands::Css(args) => args.execute(BuildCommand::Css),
        Commands::Js(args) => args.execute(BuildCommand::Js),
        Commands::Files(args) => args.execute(BuildCommand::Files),
        Commands::Feeds(args) => args.execute(BuildCommand::Feeds),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
