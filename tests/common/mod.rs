//! Test doubles for the engine's collaborators

#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use futures::future::BoxFuture;
use interval_chime::{
    error::{Result, TimerError},
    services::{AudioOutput, CueSet, MemoryStore, Tone, WakeLock, WakeLockHandle},
    state::{AppState, Collaborators, TimerConfiguration, TimerMachine},
};

/// Audio output that records every tone it is asked to play
#[derive(Clone, Default)]
pub struct RecordingAudio {
    pub tones: Arc<Mutex<Vec<Tone>>>,
    pub open: Arc<AtomicBool>,
    pub closed: Arc<AtomicBool>,
}

impl RecordingAudio {
    pub fn tones(&self) -> Vec<Tone> {
        self.tones.lock().unwrap().clone()
    }

    pub fn count_hz(&self, frequency_hz: u32) -> usize {
        self.tones()
            .iter()
            .filter(|tone| tone.frequency_hz == frequency_hz)
            .count()
    }
}

impl AudioOutput for RecordingAudio {
    fn open(&self) -> Result<()> {
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn play(&self, tone: &Tone) {
        self.tones.lock().unwrap().push(*tone);
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Wake lock that counts acquisitions and releases
#[derive(Clone, Default)]
pub struct CountingWakeLock {
    pub acquired: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
    pub acquire_delay: Option<Duration>,
    pub fail: bool,
}

impl CountingWakeLock {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

struct CountingHandle {
    released: Arc<AtomicUsize>,
    done: bool,
}

impl WakeLockHandle for CountingHandle {
    fn release(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if !self.done {
                self.done = true;
                self.released.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        })
    }
}

impl WakeLock for CountingWakeLock {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn WakeLockHandle>>> {
        Box::pin(async move {
            if let Some(delay) = self.acquire_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(TimerError::WakeLock("denied".to_string()));
            }
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingHandle {
                released: Arc::clone(&self.released),
                done: false,
            }) as Box<dyn WakeLockHandle>)
        })
    }
}

pub struct Harness {
    pub state: Arc<AppState>,
    pub audio: RecordingAudio,
    pub wake_lock: CountingWakeLock,
}

pub fn harness(config: TimerConfiguration) -> Harness {
    harness_with(config, CueSet::Descending, CountingWakeLock::default())
}

pub fn harness_with(config: TimerConfiguration, cues: CueSet, wake_lock: CountingWakeLock) -> Harness {
    let audio = RecordingAudio::default();
    let collaborators = Collaborators {
        audio: Box::new(audio.clone()),
        wake_lock: Box::new(wake_lock.clone()),
        store: Box::new(MemoryStore::default()),
    };
    let machine = TimerMachine::with_policy(config, Arc::new(cues));
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), machine, collaborators));

    Harness {
        state,
        audio,
        wake_lock,
    }
}

/// Let spawned tasks run without moving the clock
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
