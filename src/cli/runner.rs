//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PipelineConfig;
use crate::engine::{Phase, Pipeline};
use crate::error::Result;
use serde::Serialize;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.effective_config()?;

        match self.cli.command {
            Commands::Run => self.execute(config, Phase::All).await,
            Commands::Songs => self.execute(config, Phase::SongData).await,
            Commands::Logs => self.execute(config, Phase::LogData).await,
            Commands::Config => self.output(&config.redacted()),
        }
    }

    /// Config file (or defaults) with command-line overrides applied
    pub fn effective_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        let cli = &self.cli;
        if let Some(input) = &cli.input {
            config.source.root.clone_from(input);
        }
        if let Some(output) = &cli.output {
            config.sink.root.clone_from(output);
        }
        if let Some(pattern) = &cli.song_pattern {
            config.source.song_pattern.clone_from(pattern);
        }
        if let Some(pattern) = &cli.log_pattern {
            config.source.log_pattern.clone_from(pattern);
        }
        if let Some(compression) = cli.compression {
            config.sink.compression = compression;
        }
        if let Some(key) = &cli.access_key_id {
            config.credentials.access_key_id = Some(key.clone());
        }
        if let Some(secret) = &cli.secret_access_key {
            config.credentials.secret_access_key = Some(secret.clone());
        }
        if let Some(region) = &cli.region {
            config.credentials.region = Some(region.clone());
        }

        Ok(config)
    }

    async fn execute(&self, config: PipelineConfig, phase: Phase) -> Result<()> {
        tracing::info!(
            "Starting {phase:?} from {} to {}",
            config.source.root,
            config.sink.root
        );

        let pipeline = Pipeline::from_config(config)?;
        let stats = pipeline.run_phase(phase).await?;
        self.output(&stats)
    }

    /// Print a value to stdout in the selected format
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
