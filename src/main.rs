//! Duel Arena - fixed-tick two-fighter platform duel
//!
//! This is the host entry point. It handles:
//! - Reading key events (`+Code` / `-Code` lines) from stdin
//! - Driving the simulation with a fixed-step accumulator
//! - Writing JSON snapshots to stdout for a presentation layer

mod config;
mod game;
mod input;
mod util;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::game::{Match, SnapshotBuilder};
use crate::input::{read_key_events, HeldKeys, KeyEvent};
use crate::util::time::{FixedStep, Timer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Duel Arena");
    info!(
        tick_hz = config.tick_hz,
        render_fps = config.render_fps,
        reset_delay_ms = config.round_reset_delay.as_millis() as u64,
        "Simulation settings"
    );

    let mut game = Match::new(config.match_config())?;

    // Spawn key event reader
    let (key_tx, key_rx) = mpsc::channel(256);
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = read_key_events(stdin, key_tx).await {
            warn!(error = %e, "Key event reader stopped");
        }
    });

    tokio::select! {
        result = run_frames(&mut game, key_rx, &config) => result?,
        _ = shutdown_signal() => {}
    }

    // Dropping the match cancels any pending round reset
    drop(game);
    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging. Logs go to stderr, stdout carries snapshots.
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Render-rate loop: drain input, run whole fixed steps, emit snapshots
async fn run_frames(
    game: &mut Match,
    mut key_rx: mpsc::Receiver<KeyEvent>,
    config: &Config,
) -> anyhow::Result<()> {
    let mut frame_interval = interval(config.frame_interval());
    frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut fixed = FixedStep::new(config.tick_hz, config.max_frame_dt);
    let mut timer = Timer::new();
    let mut keys = HeldKeys::new();
    let mut reset_held = false;
    let mut snapshots = SnapshotBuilder::new(config.snapshot_interval);
    let mut last_status = (game.score(), game.round_over());
    let mut stdout = tokio::io::stdout();

    loop {
        frame_interval.tick().await;

        // Drain input queue
        while let Ok(event) = key_rx.try_recv() {
            keys.apply(event);
        }

        let input = keys.frame();
        for _ in 0..fixed.advance(timer.lap()) {
            game.update(fixed.step(), &input);
        }

        // Restart on the press, not while held
        let reset = keys.reset();
        if reset && !reset_held {
            game.restart();
            snapshots.force_next();
        }
        reset_held = reset;

        // Knockouts and round resets always reach the renderer
        let status = (game.score(), game.round_over());
        if status != last_status {
            last_status = status;
            snapshots.force_next();
        }

        if snapshots.should_send() {
            let mut line = snapshots.encode(&game.snapshot())?;
            line.push('\n');
            stdout.write_all(line.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
