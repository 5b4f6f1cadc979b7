use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fringe_core::config::GameConfig;
use fringe_core::game::session::GamePhase;
use fringe_core::host::{Autopilot, CountingRenderer, RenderStats, TracingDisplay, TracingEffects};
use fringe_core::{Game, Host};

/// Host frame cadence. Logic runs at its own fixed rate regardless.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const STATS_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Fringe headless runner v{}", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::load_or_default();
    config.validate()?;
    info!(
        "Configuration loaded: {} Hz, frame skip {}, seed {}, {} enemies",
        config.tick_rate,
        config.max_frame_skip,
        config.seed,
        config.population.enemies()
    );

    let run_limit = match std::env::var("FRINGE_RUN_SECONDS") {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
            _ => {
                warn!("Invalid FRINGE_RUN_SECONDS '{}', running until stopped", raw);
                None
            }
        },
        Err(_) => None,
    };

    let stats = Arc::new(RenderStats::default());
    let host = Host::new(
        Autopilot::default(),
        TracingEffects,
        TracingDisplay::default(),
        CountingRenderer::new(stats.clone()),
    );

    let start = Instant::now();
    let mut game = Game::new(&config, host, start.into_std());

    let mut frames = interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_report = start;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            now = frames.tick() => {
                game.advance(now.into_std());

                if now.duration_since(last_report) >= STATS_INTERVAL {
                    last_report = now;
                    info!(
                        "tick {} | score {} | kills {} | lives {} | health {} | enemies {} | frames {}",
                        game.state().tick_count(),
                        game.score(),
                        game.kills(),
                        game.lives(),
                        game.health(),
                        game.enemies_remaining(),
                        stats.frames.load(Ordering::Relaxed),
                    );
                }

                if game.phase() != GamePhase::Playing {
                    break;
                }
                if run_limit.is_some_and(|limit| start.elapsed() >= limit) {
                    info!("Run limit reached");
                    break;
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Shutdown signal received");
                break;
            }
        }
    }

    let summary = game.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    info!(
        "Stopped after {:.1}s, {} frames rendered",
        start.elapsed().as_secs_f32(),
        stats.frames.load(Ordering::Relaxed)
    );

    Ok(())
}
