//! Collaborators of the timer engine
//! 
//! This module contains the cue policy and the external resources the engine
//! drives: audio output, wake locks and the settings store.

pub mod audio;
pub mod cues;
pub mod settings_store;
pub mod wake_lock;

// Re-export main types
pub use audio::{AudioBackend, AudioOutput, TerminalBell, TracingAudio};
pub use cues::{CuePolicy, CueSet, CueTrigger, Tone};
pub use settings_store::{FileStore, MemoryStore, SettingsStore};
pub use wake_lock::{NoWakeLock, SystemdInhibitor, WakeLock, WakeLockHandle, WakeLockManager};
