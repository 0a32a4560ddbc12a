//! Where the shareable settings query string lives between changes

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, info};

use crate::error::{Result, TimerError};

/// Key-value source the configuration is read from at startup and written
/// back to on every change
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, query: &str) -> Result<()>;
}

/// In-memory query string
#[derive(Debug, Default)]
pub struct MemoryStore {
    query: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            query: Mutex::new(initial),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        self.query
            .lock()
            .map(|query| query.clone())
            .map_err(|_| TimerError::LockPoisoned("settings store"))
    }

    fn save(&self, query: &str) -> Result<()> {
        let mut stored = self
            .query
            .lock()
            .map_err(|_| TimerError::LockPoisoned("settings store"))?;
        *stored = Some(query.to_string());
        Ok(())
    }
}

/// Query string kept in a one-line file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!("Loaded settings from {}", self.path.display());
                Ok(Some(contents.trim().to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No settings file at {}, using defaults", self.path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, query: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n", query))?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_returns_last_saved_query() {
        let store = MemoryStore::new(Some("countdown=5".to_string()));
        assert_eq!(store.load().unwrap().as_deref(), Some("countdown=5"));

        store.save("countdown=9").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("countdown=9"));
    }

    #[test]
    fn file_store_round_trips_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("settings"));

        assert_eq!(store.load().unwrap(), None);
        store.save("countdown=12&interval=45").unwrap();
        assert_eq!(
            store.load().unwrap().as_deref(),
            Some("countdown=12&interval=45")
        );
    }
}
