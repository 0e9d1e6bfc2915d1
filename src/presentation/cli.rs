//! CLI Argument Parsing
//!
//! Global flags (--config, --force, --json, --verbose) are accepted before or
//! after the subcommand.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Selects every configured application
pub const ALL_APPS: &str = "all";

/// releasectl - deploy applications as immutable releases behind a symlink
#[derive(Parser, Debug)]
#[command(name = "releasectl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (repeatable; later files override earlier ones)
    #[arg(short, long = "config", value_name = "PATH", global = true)]
    pub config: Vec<PathBuf>,

    /// Run without taking the run lock
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Print results as JSON, one object per line
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Deploy applications whose repositories have moved
    Deploy {
        /// Application name, or "all"
        #[arg(default_value = ALL_APPS)]
        app: String,
    },

    /// Make the previous release live again and delete the current one
    Rollback {
        /// Application name, or "all"
        #[arg(default_value = ALL_APPS)]
        app: String,
    },

    /// Show deployed and latest revisions
    Status {
        /// Application name, or "all"
        #[arg(default_value = ALL_APPS)]
        app: String,
    },

    /// Validate configuration and VCS executables
    Check,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deploy { .. } => "deploy",
            Self::Rollback { .. } => "rollback",
            Self::Status { .. } => "status",
            Self::Check => "check",
        }
    }

    /// Whether this command changes release directories
    pub fn mutates(&self) -> bool {
        matches!(self, Self::Deploy { .. } | Self::Rollback { .. })
    }
}
