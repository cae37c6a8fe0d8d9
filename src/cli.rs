use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "frametrim")]
#[command(
    author,
    version,
    about = "Batch frame-accurate trimming of three-camera recordings"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trim every clip listed in a manifest CSV
    Trim {
        /// Manifest CSV (defaults to batch.manifest from the config)
        manifest: Option<PathBuf>,

        /// Directory for trimmed clips (defaults to batch.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the ffmpeg commands without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Probe a video file and display its detected frame rate
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Check that ffmpeg and ffprobe are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
