//! Egg Timer - A countdown timer board served over HTTP
//!
//! This is the main entry point for the egg-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use egg_timer::{
    api::create_router,
    config::Config,
    services::check_sound_command_available,
    state::AppState,
    tasks::completion_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("egg_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting egg-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, sound={} {}{}",
          config.host, config.port, config.sound_command, config.sound_file,
          if config.mute { " (muted)" } else { "" });

    // A missing player only costs the completion sound
    if !config.mute {
        if let Err(e) = check_sound_command_available(&config.sound_command).await {
            warn!("{}", e);
        }
    }

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.sound_player(),
        config.sound_file.clone(),
    ));

    // Subscribe before spawning so the first completion cannot be missed
    let completions = state.completion_tx.subscribe();
    tokio::spawn(completion_task(Arc::clone(&state), completions));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers               - Show the timer board");
    info!("  POST   /timers               - Add a custom timer");
    info!("  POST   /timers/:index/toggle  - Pause or resume a timer");
    info!("  PUT    /timers/:index/status  - Set a timer's status");
    info!("  POST   /timers/:index/restart - Restart a timer");
    info!("  POST   /timers/:index/edit    - Start editing a custom timer");
    info!("  PUT    /timers/:index         - Save a custom timer's duration");
    info!("  DELETE /editing              - Stop editing");
    info!("  DELETE /timers/:index         - Remove a custom timer");
    info!("  GET    /status               - Server status");
    info!("  GET    /health               - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
