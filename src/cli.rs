// src/cli.rs

//! CLI definitions for stagehand
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(author = "Stagehand Contributors")]
#[command(version)]
#[command(
    about = "Artifact promotion and channel manifest versioning for Maven-style repositories",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Promote staged artifacts into a channel
    Promote {
        /// Channel document identity as group:artifact
        #[arg(long)]
        channel: String,

        /// Target repository URL or path (must be locally accessible)
        #[arg(long)]
        target_repo: String,

        /// Artifact coordinate to promote, as
        /// group:artifact[:extension[:classifier]]:version (repeatable)
        #[arg(long = "artifact")]
        artifacts: Vec<String>,

        /// Source repository URL or path to resolve the artifacts from
        #[arg(long, conflicts_with = "bundle")]
        source_repo: Option<String>,

        /// Promotable artifact bundle (.tar.gz) carrying both the artifact
        /// list and the staging repository
        #[arg(long, conflicts_with = "artifacts")]
        bundle: Option<PathBuf>,
    },

    /// Show the streams pinned by the current channel manifest
    Streams {
        /// Channel document identity as group:artifact
        #[arg(long)]
        channel: String,

        /// Target repository URL or path
        #[arg(long)]
        target_repo: String,
    },

    /// Pack artifacts from a local repository into a promotable bundle
    Bundle {
        /// Bundle file to create
        #[arg(long)]
        output: PathBuf,

        /// Local repository containing the artifacts
        #[arg(long)]
        repository: PathBuf,

        /// Artifact coordinate to include (repeatable)
        #[arg(long = "artifact", required = true)]
        artifacts: Vec<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}
