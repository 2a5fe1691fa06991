mod app;
mod cli;
mod timer;
mod tui;
mod ui;

use std::{fs::File, path::Path, sync::Mutex};

use clap::Parser;
use corticogenesis_core::{outline, render, CortexError, PlaybackState, Stage};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

use crate::{
    app::App,
    cli::{Cli, Commands, LiveArgs},
    tui::Tui,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> corticogenesis_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Live(args) => run_live(args).await,
        Commands::Outline { stage, json } => {
            init_tracing(std::io::stderr, true);
            run_outline(stage, json)
        }
    }
}

async fn run_live(args: LiveArgs) -> corticogenesis_core::Result<()> {
    match &args.log_file {
        Some(path) => init_tracing(Mutex::new(open_log(path)?), false),
        None => init_tracing(std::io::sink, false),
    }

    let config = args.resolve_config()?;
    tracing::info!(
        start = config.playback.start_stage.index(),
        autoplay = config.playback.autoplay,
        interval_ms = config.playback.tick_interval_ms,
        "starting live mode"
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::new(&config, tx);
    let mut tui = Tui::enter()?;
    app.run(&mut tui.terminal, rx).await
}

fn run_outline(stage: Option<Stage>, json: bool) -> corticogenesis_core::Result<()> {
    let selected: Vec<Stage> = match stage {
        Some(stage) => vec![stage],
        None => Stage::ALL.to_vec(),
    };
    let views: Vec<_> = selected
        .into_iter()
        .map(|stage| {
            render(&PlaybackState {
                stage,
                is_playing: false,
            })
        })
        .collect();

    if json {
        let encoded = serde_json::to_string_pretty(&views)
            .map_err(|err| CortexError::msg(format!("failed to encode outline: {err}")))?;
        println!("{encoded}");
    } else {
        let text: Vec<String> = views.iter().map(outline).collect();
        print!("{}", text.join("\n"));
    }
    Ok(())
}

fn open_log(path: &Path) -> corticogenesis_core::Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| CortexError::msg(format!("cannot open log file {}: {err}", path.display())))
}

fn init_tracing<W>(writer: W, ansi: bool)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(ansi)
        .try_init();
}
