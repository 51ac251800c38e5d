//! CLI commands and argument parsing

use crate::config::CompressionKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sparkify Lake: song-play star schema from JSON logs to Parquet
#[derive(Parser, Debug)]
#[command(name = "sparkify-lake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Input root (local path or cloud URL)
    /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
    #[arg(short, long, global = true, env = "SPARKIFY_INPUT")]
    pub input: Option<String>,

    /// Output root (local path or cloud URL)
    #[arg(short, long, global = true, env = "SPARKIFY_OUTPUT")]
    pub output: Option<String>,

    /// Glob for song catalog documents, relative to the input root
    #[arg(long, global = true)]
    pub song_pattern: Option<String>,

    /// Glob for activity log documents, relative to the input root
    #[arg(long, global = true)]
    pub log_pattern: Option<String>,

    /// Parquet compression codec
    #[arg(long, global = true)]
    pub compression: Option<CompressionKind>,

    /// Access key for S3-compatible stores
    #[arg(long, global = true, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// Secret key for S3-compatible stores
    #[arg(long, global = true, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// Region for S3-compatible stores
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Output format for the run summary
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Process song data then log data
    Run,

    /// Process the song catalog only (songs, artists)
    Songs,

    /// Process the activity logs only (users, time, songplays)
    ///
    /// The catalog is read from a previous `songs` run in the output root.
    Logs,

    /// Print the effective configuration with secrets redacted
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
