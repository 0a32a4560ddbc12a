//! Screen/system wake-lock handling
//!
//! While the timer runs we hold one inhibitor so the machine does not idle
//! or sleep. Failing to get one is never fatal.

use std::{
    process::Stdio,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use futures::future::BoxFuture;
use tokio::{
    process::{Child, Command},
    sync::Mutex,
    time::timeout,
};
use tracing::{debug, info, warn};

use crate::error::{Result, TimerError};

/// How long a freshly spawned inhibitor must survive to count as acquired
const INHIBIT_SETTLE_TIME: Duration = Duration::from_millis(200);

/// A held wake lock
pub trait WakeLockHandle: Send + Sync {
    /// Give the lock back. Releasing twice is harmless.
    fn release(&mut self) -> BoxFuture<'_, Result<()>>;
}

/// Something that can hand out wake locks
pub trait WakeLock: Send + Sync {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn WakeLockHandle>>>;
}

/// Wake lock backed by a long-lived `systemd-inhibit` child process
#[derive(Debug, Clone)]
pub struct SystemdInhibitor {
    pub who: String,
    pub why: String,
}

impl SystemdInhibitor {
    pub fn new() -> Self {
        Self {
            who: "interval-chime".to_string(),
            why: "Interval timer is running".to_string(),
        }
    }
}

impl Default for SystemdInhibitor {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeLock for SystemdInhibitor {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn WakeLockHandle>>> {
        Box::pin(async move {
            debug!("Spawning systemd-inhibit");

            let mut child = Command::new("systemd-inhibit")
                .args(["--what=idle:sleep", "--mode=block"])
                .arg(format!("--who={}", self.who))
                .arg(format!("--why={}", self.why))
                .args(["sleep", "infinity"])
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| TimerError::WakeLock(format!("Failed to execute systemd-inhibit: {}", e)))?;

            // An inhibitor that exits right away was refused
            if let Ok(status) = timeout(INHIBIT_SETTLE_TIME, child.wait()).await {
                let status = status
                    .map_err(|e| TimerError::WakeLock(format!("Failed to wait on systemd-inhibit: {}", e)))?;
                return Err(TimerError::WakeLock(format!("systemd-inhibit exited early: {}", status)));
            }

            info!("Wake lock acquired (pid {:?})", child.id());
            Ok(Box::new(InhibitorHandle { child: Some(child) }) as Box<dyn WakeLockHandle>)
        })
    }
}

struct InhibitorHandle {
    child: Option<Child>,
}

impl WakeLockHandle for InhibitorHandle {
    fn release(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let Some(mut child) = self.child.take() else {
                return Ok(());
            };
            child
                .kill()
                .await
                .map_err(|e| TimerError::WakeLock(format!("Failed to stop systemd-inhibit: {}", e)))?;
            info!("Wake lock released");
            Ok(())
        })
    }
}

/// Wake lock that never touches the system
#[derive(Debug, Default, Clone)]
pub struct NoWakeLock;

struct InertHandle;

impl WakeLockHandle for InertHandle {
    fn release(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

impl WakeLock for NoWakeLock {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn WakeLockHandle>>> {
        Box::pin(async {
            debug!("Wake lock disabled, handing out inert handle");
            Ok(Box::new(InertHandle) as Box<dyn WakeLockHandle>)
        })
    }
}

/// Keeps at most one wake lock outstanding
pub struct WakeLockManager {
    provider: Box<dyn WakeLock>,
    handle: Mutex<Option<Box<dyn WakeLockHandle>>>,
    held: AtomicBool,
}

impl WakeLockManager {
    pub fn new(provider: Box<dyn WakeLock>) -> Self {
        Self {
            provider,
            handle: Mutex::new(None),
            held: AtomicBool::new(false),
        }
    }

    /// Whether a lock is currently held
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    /// Acquire a lock unless one is already held. Returns whether a lock is
    /// held afterwards.
    pub async fn ensure_held(&self) -> bool {
        let mut handle = self.handle.lock().await;
        if handle.is_some() {
            debug!("Wake lock already held");
            return true;
        }

        match self.provider.acquire().await {
            Ok(acquired) => {
                *handle = Some(acquired);
                self.held.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                warn!("Could not acquire wake lock, continuing without it: {}", e);
                false
            }
        }
    }

    /// Release the held lock, if any
    pub async fn ensure_released(&self) {
        let mut handle = self.handle.lock().await;
        if let Some(mut held) = handle.take() {
            self.held.store(false, Ordering::SeqCst);
            if let Err(e) = held.release().await {
                warn!("Failed to release wake lock: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for WakeLockManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WakeLockManager")
            .field("held", &self.is_held())
            .finish()
    }
}
