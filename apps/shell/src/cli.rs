//! Command-line interface of the `pharmeco` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pharmeco")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Drive the PharmEco merchant registration wizard from the terminal")]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML). `PHECO__*` variables override it.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of configuration.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the wizard steps
    Steps {},
    /// Check every step of a draft and print the failing fields
    Validate {
        /// Draft JSON file
        draft: PathBuf,
    },
    /// Print the review summary of a draft as JSON
    Review {
        /// Draft JSON file
        draft: PathBuf,
    },
    /// Walk a draft through the wizard and submit it
    Register {
        /// Draft JSON file
        draft: PathBuf,
        /// Store the draft in the configured draft directory before submitting
        #[arg(long)]
        save: bool,
    },
}
