//! Background tasks module
//! 
//! This module contains the tasks that run alongside the engine: the
//! per-run ticker and the wake lock follower.

pub mod ticker;
pub mod wake_lock_sync;

// Re-export main functions
pub use ticker::{ticker_task, TICK_PERIOD};
pub use wake_lock_sync::wake_lock_task;
