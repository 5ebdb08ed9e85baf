// Framework bootstrap for the arena server runtime.

use crate::domain::ArenaMap;
use crate::domain::tuning::{player::PlayerTuning, projectile::ProjectileTuning};
use crate::frameworks::config;
use crate::interface_adapters::net::ws_handler;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{Arena, GameEvent, WorldSettings, world_task};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::mpsc;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Everything the server needs to start one arena.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub map: ArenaMap,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub input_channel_capacity: usize,
    pub outbox_capacity: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            map: ArenaMap::default(),
            player: PlayerTuning::default(),
            projectile: ProjectileTuning::default(),
            input_channel_capacity: config::INPUT_CHANNEL_CAPACITY,
            outbox_capacity: config::OUTBOX_CAPACITY,
        }
    }
}

impl ServerSettings {
    /// Defaults overridden by environment variables, including an optional map file.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();
        settings.player.respawn_delay = config::respawn_delay(settings.player.respawn_delay);
        settings.projectile.life_time = config::projectile_life_time(settings.projectile.life_time);

        let map_path = config::arena_map_path();
        settings.map = config::load_arena_map(map_path.as_deref(), settings.player.radius)
            .map_err(|e| {
                tracing::error!(path = ?map_path, error = %e, "failed to load arena map");
                std::io::Error::other(e)
            })?;

        Ok(settings)
    }

    fn world_settings(&self) -> WorldSettings {
        WorldSettings {
            respawn_delay: self.player.respawn_delay,
            projectile_life_time: self.projectile.life_time,
            projectile_sweep_interval: self.projectile.sweep_interval,
        }
    }
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_with_settings(listener, ServerSettings::from_env()?).await
}

pub async fn run_with_settings(
    listener: tokio::net::TcpListener,
    settings: ServerSettings,
) -> Result<()> {
    let address = listener.local_addr()?;
    // build state
    let state = build_state(settings)?;
    // Start the Web Server
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state(settings: ServerSettings) -> Result<Arc<AppState>> {
    settings
        .map
        .validate(settings.player.radius)
        .map_err(|e| {
            tracing::error!(error = %e, "arena map rejected");
            std::io::Error::other(e)
        })?;

    tracing::debug!(
        width = settings.map.width,
        height = settings.map.height,
        obstacles = settings.map.obstacles.len(),
        respawn_delay_ms = settings.player.respawn_delay.as_millis(),
        projectile_life_time_ms = settings.projectile.life_time.as_millis(),
        "arena configured"
    );

    // input_tx/rx: All client inputs go to the single World Task.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(settings.input_channel_capacity);

    let world_settings = settings.world_settings();
    let arena = Arena::new(Arc::new(settings.map), settings.player);

    // Spawn the Game Loop (World Task)
    // Respawn timers only hold a weak handle; the app state keeps the channel open.
    tokio::spawn(world_task(
        input_rx,
        input_tx.downgrade(),
        arena,
        world_settings,
    ));

    Ok(Arc::new(AppState {
        input_tx,
        outbox_capacity: settings.outbox_capacity,
    }))
}
