//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// archlint - architecture-as-code manifest validator
#[derive(Parser)]
#[command(name = "archlint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate an architecture manifest
    Validate {
        /// Workspace directory containing the manifest
        #[arg(default_value = ".")]
        workspace: PathBuf,

        /// Root locator to start resolution from
        #[arg(long)]
        root: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Active role for dataset scoping
        #[arg(long)]
        role: Option<String>,
    },

    /// Initialize a starter configuration and manifest
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        workspace: PathBuf,

        /// Force overwrite existing files
        #[arg(long)]
        force: bool,
    },
}
