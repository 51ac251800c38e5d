//! Pipeline configuration
//!
//! Everything a run needs is carried in one explicit [`PipelineConfig`]:
//! where to read from, where to write to, and the credentials for both.
//! It is loaded from YAML and may be overridden from the command line.

use crate::error::{Error, Result};
use parquet::basic::Compression;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default glob for song catalog documents, relative to the source root
pub const DEFAULT_SONG_PATTERN: &str = "song_data/**/*.json";

/// Default glob for activity log documents, relative to the source root
pub const DEFAULT_LOG_PATTERN: &str = "log_data/**/*.json";

const REDACTED: &str = "********";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input location and patterns
    #[serde(default)]
    pub source: SourceConfig,

    /// Output location and file settings
    #[serde(default)]
    pub sink: SinkConfig,

    /// Object store credentials shared by source and sink
    #[serde(default)]
    pub credentials: Credentials,
}

impl PipelineConfig {
    /// Create a config for the given source and sink roots
    pub fn new(source_root: impl Into<String>, sink_root: impl Into<String>) -> Self {
        Self {
            source: SourceConfig {
                root: source_root.into(),
                ..SourceConfig::default()
            },
            sink: SinkConfig {
                root: sink_root.into(),
                ..SinkConfig::default()
            },
            credentials: Credentials::default(),
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Check that the config is complete enough to run
    pub fn validate(&self) -> Result<()> {
        if self.source.root.trim().is_empty() {
            return Err(Error::missing_field("source.root"));
        }
        if self.sink.root.trim().is_empty() {
            return Err(Error::missing_field("sink.root"));
        }
        if self.source.song_pattern.trim().is_empty() {
            return Err(Error::invalid_value("source.song_pattern", "must not be empty"));
        }
        if self.source.log_pattern.trim().is_empty() {
            return Err(Error::invalid_value("source.log_pattern", "must not be empty"));
        }
        if self.sink.row_group_size == 0 {
            return Err(Error::invalid_value("sink.row_group_size", "must be positive"));
        }
        if self.credentials.access_key_id.is_some() != self.credentials.secret_access_key.is_some()
        {
            return Err(Error::config(
                "credentials.access_key_id and credentials.secret_access_key must be set together",
            ));
        }
        Ok(())
    }

    /// Copy of this config with secrets masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.credentials.secret_access_key.is_some() {
            config.credentials.secret_access_key = Some(REDACTED.to_string());
        }
        if config.credentials.access_key_id.is_some() {
            config.credentials.access_key_id = Some(REDACTED.to_string());
        }
        config
    }
}

// ============================================================================
// Source / Sink
// ============================================================================

/// Where input documents live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Root URL or local path (e.g., `s3://udacity-dend/`)
    #[serde(default)]
    pub root: String,

    /// Glob for song catalog documents
    #[serde(default = "default_song_pattern")]
    pub song_pattern: String,

    /// Glob for activity log documents
    #[serde(default = "default_log_pattern")]
    pub log_pattern: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            song_pattern: default_song_pattern(),
            log_pattern: default_log_pattern(),
        }
    }
}

fn default_song_pattern() -> String {
    DEFAULT_SONG_PATTERN.to_string()
}

fn default_log_pattern() -> String {
    DEFAULT_LOG_PATTERN.to_string()
}

/// Where output tables are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Root URL or local path; one directory per table is created below it
    #[serde(default)]
    pub root: String,

    /// Parquet compression codec
    #[serde(default)]
    pub compression: CompressionKind,

    /// Maximum rows per Parquet row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            compression: CompressionKind::default(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_row_group_size() -> usize {
    1024 * 1024
}

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    None,
}

impl From<CompressionKind> for Compression {
    fn from(kind: CompressionKind) -> Self {
        match kind {
            CompressionKind::Snappy => Compression::SNAPPY,
            CompressionKind::Zstd => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            CompressionKind::Gzip => Compression::GZIP(parquet::basic::GzipLevel::default()),
            CompressionKind::None => Compression::UNCOMPRESSED,
        }
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// S3-style credentials
///
/// Unset fields fall back to the object store's own environment lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores (R2, MinIO)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}
