//! Interval Chime - a countdown/interval timer engine
//! 
//! This is the main entry point for the interval-chime server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use interval_chime::{
    api::create_router,
    config::Config,
    services::{FileStore, MemoryStore, NoWakeLock, SettingsStore, SystemdInhibitor, WakeLock},
    state::{AppState, Collaborators, TimerConfiguration, TimerMachine},
    tasks::wake_lock_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("interval_chime={},tower_http=info", config.log_level()))
        .init();

    info!("Starting interval-chime server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, cues={:?}, audio={:?}",
          config.host, config.port, config.cues, config.audio);

    let store: Box<dyn SettingsStore> = match &config.settings_file {
        Some(path) => Box::new(FileStore::new(path.clone())),
        None => Box::new(MemoryStore::new(config.settings.clone())),
    };

    let wake_lock: Box<dyn WakeLock> = if config.no_wake_lock {
        info!("Wake lock disabled");
        Box::new(NoWakeLock)
    } else {
        Box::new(SystemdInhibitor::new())
    };

    let machine = TimerMachine::with_policy(TimerConfiguration::default(), Arc::new(config.cues));
    let collaborators = Collaborators {
        audio: config.audio.build(),
        wake_lock,
        store,
    };

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), machine, collaborators));

    // Command-line settings win over a settings file
    if let (Some(query), Some(_)) = (&config.settings, &config.settings_file) {
        if let Err(e) = state.configure_query(query) {
            warn!("Failed to apply command-line settings: {}", e);
        }
    }
    info!("Settings: {}", state.share_query()?);

    // Start the wake lock background task
    let wake_state = Arc::clone(&state);
    tokio::spawn(async move {
        wake_lock_task(wake_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start        - Start a fresh run");
    info!("  POST /stop         - Stop the timer");
    info!("  POST /reset        - Reset the timer");
    info!("  GET  /config       - Current settings and query string");
    info!("  PUT  /config       - Update settings (JSON)");
    info!("  POST /config/query - Update settings (query string)");
    info!("  GET  /status       - Timer phase, remaining time and progress");
    info!("  GET  /health       - Health check");

    // Setup graceful shutdown
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

    state.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}
