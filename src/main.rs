//! Road Dog Server - authoritative multiplayer road-network game server
//!
//! This is the main entry point for the game server. It handles:
//! - Loading the map file into the world registry
//! - Running the serialized world executor and, optionally, the automatic ticker
//! - HTTP endpoints for maps, joining, moving and ticking
//! - Static file serving for the browser client

mod app;
mod config;
mod game;
mod http;
mod util;
mod world;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::AppState;
use crate::config::{Config, LogFormat};
use crate::game::loader::load_game;
use crate::game::{Game, TickMode};
use crate::http::build_router;
use crate::util::time::init_server_time;
use crate::world::{Ticker, WorldActor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    // Initialize server time tracking
    init_server_time();

    info!("Starting Road Dog Server");
    info!("Server address: {}", config.server_addr);

    // Build the world from the map file
    let mut game = load_game(&config.map_config_path, Game::new()).with_context(|| {
        format!("loading maps from {}", config.map_config_path.display())
    })?;
    game.set_tick_rate(config.tick_period_ms)?;
    let tick_mode = game.tick_mode();
    let maps = game.catalog().clone();
    if maps.is_empty() {
        warn!(path = %config.map_config_path.display(), "Map file defines no maps");
    }

    info!(
        maps = maps.len(),
        tick_mode = ?tick_mode,
        randomize_spawn = config.randomize_spawn_points,
        "World loaded"
    );

    // Spawn the world executor
    let (actor, world) = WorldActor::new(game, config.randomize_spawn_points);
    let world_task = tokio::spawn(actor.run());

    // Drive ticks automatically when a period is configured
    let ticker = match tick_mode {
        TickMode::Automatic { period } => {
            let ticker = Ticker::new(period, world.clone());
            ticker.start()?;
            Some(ticker)
        }
        TickMode::Manual => None,
    };

    // Create application state and router
    let state = AppState::new(config.clone(), maps, world, tick_mode);
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server_addr;
    let listener = TcpListener::bind(addr).await?;

    info!(address = %addr.ip(), port = addr.port(), "Server started");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(ticker) = ticker {
        ticker.stop().await;
    }

    // The router held the last world handles; the executor drains and exits
    world_task.await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str, format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
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
