use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use corticogenesis_core::{AppConfig, Result, Stage};

#[derive(Parser, Debug)]
#[command(author, version, about = "Step through the formation of the cerebral cortex", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive terminal animation.
    Live(LiveArgs),
    /// Print one stage, or all of them, without starting the terminal UI.
    Outline {
        /// Stage number (1-9) or identifier such as `plateSplitting`.
        #[arg(short, long)]
        stage: Option<Stage>,
        /// Emit the view tree as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct LiveArgs {
    /// JSON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Stage to open at: number (1-9) or identifier.
    #[arg(short, long)]
    pub stage: Option<Stage>,
    /// Start playing immediately.
    #[arg(long)]
    pub autoplay: bool,
    /// Milliseconds between automatic stage advances.
    #[arg(long)]
    pub interval_ms: Option<u64>,
    /// Write logs to this file. Logs are discarded otherwise.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl LiveArgs {
    /// Loads the config file, if any, and applies command line overrides.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_path(path)?,
            None => AppConfig::default(),
        };

        if let Some(stage) = self.stage {
            config.playback.start_stage = stage;
        }
        if self.autoplay {
            config.playback.autoplay = true;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.playback.tick_interval_ms = interval_ms;
        }

        config.validate()?;
        Ok(config)
    }
}
