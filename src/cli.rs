use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use maccleaner::CleanupLevel;

#[derive(Parser)]
#[command(
    name = "maccleaner",
    about = "Find and reclaim disk space from caches, logs and Docker leftovers",
    version
)]
pub struct Cli {
    /// Look for everything under this directory instead of $HOME
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List cleanable locations and how much they hold
    Scan,

    /// Show the state of every configured location, including missing ones
    Report,

    /// List oversized folders for manual review (never deleted)
    Large {
        /// Only show folders larger than this (e.g. "500MB", "2GB")
        #[arg(long)]
        min_size: Option<String>,
    },

    /// Delete the contents of the selected locations
    Clean {
        /// Confirm the deletion. Without it, the selection is shown and nothing is removed.
        #[arg(long)]
        confirm: bool,

        /// Only clean these locations (by display name)
        #[arg(long)]
        only: Vec<String>,

        /// Leave these locations alone (by display name)
        #[arg(long)]
        skip: Vec<String>,
    },

    /// Docker cleanup
    Docker {
        #[command(subcommand)]
        command: DockerCommand,
    },
}

#[derive(Subcommand)]
pub enum DockerCommand {
    /// Is docker reachable, and how many containers and images exist
    Status,

    /// List volumes not attached to any container
    Scan,

    /// Remove dangling volumes
    Rm {
        /// Confirm the removal. Without it, the volumes are listed and nothing is removed.
        #[arg(long)]
        confirm: bool,

        /// Keep these volumes
        #[arg(long)]
        keep: Vec<String>,
    },

    /// Run a bulk prune preset
    Prune {
        /// Which preset to run; there is no default
        #[arg(long, value_enum)]
        level: LevelArg,

        /// Confirm the prune. Without it, the commands are printed and nothing runs.
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Unused,
    All,
    Volumes,
}

impl From<LevelArg> for CleanupLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Unused => CleanupLevel::Unused,
            LevelArg::All => CleanupLevel::All,
            LevelArg::Volumes => CleanupLevel::Volumes,
        }
    }
}
