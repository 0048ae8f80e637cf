pub mod composer;
pub mod coordinator;
pub mod generation;
pub mod player;
pub mod sampling;
pub mod score;
pub mod settings;
pub mod utils;
pub mod wire;

#[cfg(test)]
mod testing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::UdpSocket;

use composer::OpenAiComposer;
use coordinator::{CoordinatorConfig, CoordinatorController};
use generation::GenerationService;
use player::{LogPlayer, OscPlayer, Player};
use sampling::{focus_listener, FocusSampler, SignalSource, SyntheticSource, WatchSource};
use settings::{Settings, SourceKind};

/// Focus-driven music generation coordinator.
#[derive(Parser, Debug)]
#[command(name = "focusynth", version, about)]
pub struct Cli {
    /// JSON settings file; defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for the synthetic focus source (overrides the settings file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log segments instead of sending them to the OSC player
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(cli: Cli) -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("focusynth starting up...");

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.seed.is_some() {
        settings.source.seed = cli.seed;
    }

    let base_dir = match cli.config.as_deref().and_then(Path::parent) {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => std::env::current_dir().context("failed to resolve working directory")?,
    };
    let system_prompt = settings.load_system_prompt(&base_dir)?;
    let api_key = settings.api_key()?;

    let composer = Arc::new(OpenAiComposer::new(&settings.composer, api_key));
    let player: Arc<dyn Player> = if cli.dry_run {
        log::info!("dry run: segments will be logged, not sent");
        Arc::new(LogPlayer)
    } else {
        let osc = OscPlayer::connect(&settings.player).await?;
        log::info!("sending segments to OSC player at {}", osc.target());
        Arc::new(osc)
    };

    let service = Arc::new(GenerationService::new(
        composer,
        player,
        system_prompt,
        settings.composer_timeout(),
    ));

    let mut controller = CoordinatorController::new();
    let listener = match settings.source.kind {
        SourceKind::Synthetic => {
            let source = SyntheticSource::new(settings.source.seed);
            controller.start(
                sampler(&settings, source),
                service,
                CoordinatorConfig::from(&settings),
            )?;
            None
        }
        SourceKind::Udp => {
            let socket = UdpSocket::bind(&settings.source.listen_address)
                .await
                .with_context(|| {
                    format!("failed to bind focus listener on {}", settings.source.listen_address)
                })?;
            let (tx, source) = WatchSource::channel();
            controller.start(
                sampler(&settings, source),
                service,
                CoordinatorConfig::from(&settings),
            )?;
            let token = controller
                .cancel_token()
                .context("coordinator started without a cancel token")?;
            Some(tokio::spawn(focus_listener(socket, tx, token)))
        }
    };

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    log::info!("shutdown requested");

    let state = controller.stop().await?;
    if let Some(handle) = listener {
        handle.await.context("focus listener task failed to join")?;
    }

    log::info!(
        "focusynth stopped after {} samples: {} segments sent, {} failed, {} skipped, {} abandoned",
        state.samples_taken,
        state.generations_succeeded,
        state.generations_failed,
        state.generations_skipped,
        state.generations_abandoned
    );
    Ok(())
}

fn sampler(settings: &Settings, source: impl SignalSource + 'static) -> FocusSampler {
    FocusSampler::new(settings.window_capacity, Box::new(source))
}
