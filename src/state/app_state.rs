//! Main application state: the timer engine and the resources it drives

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use super::{
    machine::{TickOutcome, TimerMachine},
    session::TimerSnapshot,
    settings::{SettingsUpdate, TimerConfiguration},
};
use crate::{
    error::{Result, TimerError},
    services::{
        audio::{AudioOutput, TracingAudio},
        settings_store::{MemoryStore, SettingsStore},
        wake_lock::{NoWakeLock, WakeLock, WakeLockManager},
    },
    tasks::ticker_task,
};

/// External resources injected into the engine
pub struct Collaborators {
    pub audio: Box<dyn AudioOutput>,
    pub wake_lock: Box<dyn WakeLock>,
    pub store: Box<dyn SettingsStore>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            audio: Box::new(TracingAudio),
            wake_lock: Box::new(NoWakeLock),
            store: Box::new(MemoryStore::default()),
        }
    }
}

/// Shared engine state. All mutation of the timer goes through here.
pub struct AppState {
    machine: Mutex<TimerMachine>,
    audio: Box<dyn AudioOutput>,
    wake_lock: WakeLockManager,
    store: Box<dyn SettingsStore>,
    /// Handle of the one active ticker, if running
    ticker: Mutex<Option<JoinHandle<()>>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Latest snapshot, for observers
    snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Whether the timer is running, for the wake lock task
    running_tx: watch::Sender<bool>,
}

impl AppState {
    /// Create the engine, loading any stored configuration on top of the
    /// machine's own
    pub fn new(port: u16, host: String, mut machine: TimerMachine, collaborators: Collaborators) -> Self {
        let Collaborators { audio, wake_lock, store } = collaborators;

        match store.load() {
            Ok(Some(query)) => {
                let loaded = TimerConfiguration::from_query(&query, machine.config());
                machine.configure(&SettingsUpdate::from(loaded));
                info!("Loaded stored settings: {}", query);
            }
            Ok(None) => debug!("No stored settings, using {:?}", machine.config()),
            Err(e) => warn!("Failed to load stored settings: {}", e),
        }
        if let Err(e) = store.save(&machine.config().to_query()) {
            warn!("Failed to write settings back: {}", e);
        }

        let (snapshot_tx, _) = watch::channel(machine.snapshot());
        let (running_tx, _) = watch::channel(machine.is_running());

        Self {
            machine: Mutex::new(machine),
            audio,
            wake_lock: WakeLockManager::new(wake_lock),
            store,
            ticker: Mutex::new(None),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            snapshot_tx,
            running_tx,
        }
    }

    fn machine(&self) -> Result<MutexGuard<'_, TimerMachine>> {
        self.machine
            .lock()
            .map_err(|_| TimerError::LockPoisoned("timer machine"))
    }

    /// Start a fresh run and spawn its ticker.
    ///
    /// The machine guard is held until the ticker is installed and the
    /// snapshot published, so control operations never interleave.
    pub fn start(self: &Arc<Self>) -> Result<TimerSnapshot> {
        if let Err(e) = self.audio.open() {
            warn!("Audio output unavailable, cues will be dropped: {}", e);
        }

        let mut machine = self.machine()?;
        let snapshot = machine.start();
        let ticker = tokio::spawn(ticker_task(Arc::clone(self), machine.run_id()));
        self.replace_ticker(Some(ticker))?;
        self.publish(snapshot);
        drop(machine);

        self.record_action("start");
        Ok(snapshot)
    }

    /// Stop the timer and return to idle
    pub fn stop(&self) -> Result<TimerSnapshot> {
        self.halt("stop")
    }

    /// Identical to [`AppState::stop`]
    pub fn reset(&self) -> Result<TimerSnapshot> {
        self.halt("reset")
    }

    fn halt(&self, action: &str) -> Result<TimerSnapshot> {
        let mut machine = self.machine()?;
        self.replace_ticker(None)?;
        let snapshot = machine.stop();
        self.publish(snapshot);
        drop(machine);

        self.record_action(action);
        Ok(snapshot)
    }

    /// Swap the active ticker. Callers hold the machine guard.
    fn replace_ticker(&self, next: Option<JoinHandle<()>>) -> Result<()> {
        let mut ticker = self
            .ticker
            .lock()
            .map_err(|_| TimerError::LockPoisoned("ticker handle"))?;
        if let Some(previous) = ticker.take() {
            debug!("Cancelling previous ticker");
            previous.abort();
        }
        *ticker = next;
        Ok(())
    }

    /// Apply one tick for the given run. Returns `None` when the run is over
    /// and the caller's ticker should exit.
    pub fn tick(&self, run_id: u64) -> Result<Option<TickOutcome>> {
        let outcome = {
            let mut machine = self.machine()?;
            if machine.run_id() != run_id || !machine.is_running() {
                return Ok(None);
            }
            let outcome = machine.tick();
            self.publish(outcome.snapshot);
            outcome
        };

        for tone in &outcome.cues {
            self.audio.play(tone);
        }
        Ok(Some(outcome))
    }

    /// Apply a settings change, writing the result back to the store
    pub fn configure(&self, update: &SettingsUpdate) -> Result<TimerConfiguration> {
        let (changed, config) = {
            let mut machine = self.machine()?;
            let changed = machine.configure(update);
            if changed.any() {
                self.publish(machine.snapshot());
            }
            (changed, machine.config())
        };

        if changed.any() {
            info!("Configuration changed: {}", config.to_query());
            if let Err(e) = self.store.save(&config.to_query()) {
                warn!("Failed to write settings back: {}", e);
            }
            self.record_action("configure");
        }
        Ok(config)
    }

    /// Apply settings given in query-string form
    pub fn configure_query(&self, query: &str) -> Result<TimerConfiguration> {
        let current = self.configuration()?;
        let parsed = TimerConfiguration::from_query(query, current);
        self.configure(&SettingsUpdate::from(parsed))
    }

    /// Current snapshot for rendering
    pub fn observe(&self) -> Result<TimerSnapshot> {
        Ok(self.machine()?.snapshot())
    }

    pub fn configuration(&self) -> Result<TimerConfiguration> {
        Ok(self.machine()?.config())
    }

    /// Configuration in its shareable query-string form
    pub fn share_query(&self) -> Result<String> {
        Ok(self.configuration()?.to_query())
    }

    pub fn wake_lock(&self) -> &WakeLockManager {
        &self.wake_lock
    }

    pub fn wake_lock_held(&self) -> bool {
        self.wake_lock.is_held()
    }

    /// Watch every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Watch the running flag
    pub fn subscribe_running(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Push a snapshot to observers. Callers hold the machine guard so the
    /// channels never run ahead of or behind the machine.
    fn publish(&self, snapshot: TimerSnapshot) {
        self.snapshot_tx.send_replace(snapshot);
        self.running_tx.send_if_modified(|running| {
            let modified = *running != snapshot.is_running;
            *running = snapshot.is_running;
            modified
        });
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Stop ticking and give back every held resource
    pub async fn shutdown(&self) {
        info!("Shutting down timer engine");
        if let Err(e) = self.stop() {
            warn!("Failed to stop timer during shutdown: {}", e);
        }
        self.wake_lock.ensure_released().await;
        self.audio.close();
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("machine", &self.machine)
            .field("wake_lock", &self.wake_lock)
            .field("port", &self.port)
            .field("host", &self.host)
            .finish()
    }
}
