//! Saved configurations keyed by session.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::{Configuration, RawConfiguration};

/// Errors from a configuration store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored data is not a configuration.
    #[error("stored configuration is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Session name cannot be used as a key.
    #[error("invalid session name {0:?}")]
    InvalidSession(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Save and load configurations by session name.
pub trait ConfigStore {
    /// Persist `config` under `session`, replacing any previous value.
    fn save(&mut self, session: &str, config: &Configuration) -> Result<()>;

    /// Configuration saved under `session`, or `None` if there is none.
    fn load(&self, session: &str, catalog: &Catalog) -> Result<Option<Configuration>>;

    /// Forget `session`. Returns whether anything was removed.
    fn remove(&mut self, session: &str) -> Result<bool>;

    /// Load `session`, recovering to the default configuration when it is
    /// missing or unreadable.
    fn load_or_default(&self, session: &str, catalog: &Catalog) -> Configuration {
        match self.load(session, catalog) {
            Ok(Some(config)) => config,
            Ok(None) => Configuration::default(),
            Err(err) => {
                tracing::warn!(session, %err, "could not load saved configuration, using defaults");
                Configuration::default()
            }
        }
    }
}

fn check_session(session: &str) -> Result<()> {
    let valid = !session.is_empty()
        && session.len() <= 64
        && session
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidSession(session.to_string()))
    }
}

/// In-memory store holding serialized payloads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw payload, bypassing serialization. Useful for importing.
    pub fn insert_raw(&mut self, session: &str, json: impl Into<String>) -> Result<()> {
        check_session(session)?;
        self.entries.insert(session.to_string(), json.into());
        Ok(())
    }

    /// Number of saved sessions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigStore for MemoryStore {
    fn save(&mut self, session: &str, config: &Configuration) -> Result<()> {
        check_session(session)?;
        self.entries.insert(session.to_string(), config.to_json()?);
        Ok(())
    }

    fn load(&self, session: &str, catalog: &Catalog) -> Result<Option<Configuration>> {
        check_session(session)?;
        self.entries
            .get(session)
            .map(|json| Configuration::from_json(json, catalog).map_err(StoreError::from))
            .transpose()
    }

    fn remove(&mut self, session: &str) -> Result<bool> {
        check_session(session)?;
        Ok(self.entries.remove(session).is_some())
    }
}

/// Store writing one pretty-printed JSON file per session.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `dir`, created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the session files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, session: &str) -> Result<PathBuf> {
        check_session(session)?;
        Ok(self.dir.join(format!("{session}.json")))
    }
}

impl ConfigStore for JsonFileStore {
    fn save(&mut self, session: &str, config: &Configuration) -> Result<()> {
        let path = self.path(session)?;
        let json = serde_json::to_string_pretty(config)?;
        // replace atomically
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        tracing::info!(session, path = %path.display(), "configuration saved");
        Ok(())
    }

    fn load(&self, session: &str, catalog: &Catalog) -> Result<Option<Configuration>> {
        let path = self.path(session)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let raw: RawConfiguration = serde_json::from_str(&json)?;
        tracing::info!(session, path = %path.display(), "configuration loaded");
        Ok(Some(Configuration::from_raw(&raw, catalog)))
    }

    fn remove(&mut self, session: &str) -> Result<bool> {
        let path = self.path(session)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessories::{AccessorySet, HatStyle};
    use crate::catalog::Region;
    use crate::color::Rgb;

    fn sample() -> Configuration {
        let catalog = Catalog::standard();
        Configuration::default()
            .with_style(&catalog, Region::Arms, 2)
            .with_color(Rgb::new(1, 2, 3))
            .with_accessories(AccessorySet::new(Some(HatStyle::Bonnet), false, true))
    }

    #[test]
    fn memory_roundtrip() {
        let catalog = Catalog::standard();
        let mut store = MemoryStore::new();
        assert_eq!(store.load("main", &catalog).unwrap(), None);
        store.save("main", &sample()).unwrap();
        assert_eq!(store.load("main", &catalog).unwrap(), Some(sample()));
        assert_eq!(store.len(), 1);
        assert!(store.remove("main").unwrap());
        assert!(!store.remove("main").unwrap());
    }

    #[test]
    fn memory_corruption_recovers() {
        let catalog = Catalog::standard();
        let mut store = MemoryStore::new();
        store.insert_raw("broken", "{not json").unwrap();
        assert!(matches!(store.load("broken", &catalog), Err(StoreError::Malformed(_))));
        assert_eq!(store.load_or_default("broken", &catalog), Configuration::default());
        assert_eq!(store.load_or_default("absent", &catalog), Configuration::default());
    }

    #[test]
    fn session_names_are_checked() {
        let mut store = MemoryStore::new();
        for bad in ["", "../etc/passwd", "a b", "x/y"] {
            assert!(matches!(store.save(bad, &sample()), Err(StoreError::InvalidSession(_))));
        }
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::standard();
        let mut store = JsonFileStore::open(dir.path().join("saves")).unwrap();
        store.save("garage-1", &sample()).unwrap();
        assert!(store.dir().join("garage-1.json").exists());
        assert_eq!(store.load("garage-1", &catalog).unwrap(), Some(sample()));

        // a second store over the same directory sees the save
        let reopened = JsonFileStore::open(store.dir()).unwrap();
        assert_eq!(reopened.load("garage-1", &catalog).unwrap(), Some(sample()));
        assert_eq!(reopened.load("garage-2", &catalog).unwrap(), None);
        assert!(store.remove("garage-1").unwrap());
    }

    #[test]
    fn file_with_bad_content_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::standard();
        fs::write(dir.path().join("main.json"), r#"{"headStyle":"big"}"#).unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(matches!(store.load("main", &catalog), Err(StoreError::Malformed(_))));
        assert_eq!(store.load_or_default("main", &catalog), Configuration::default());
    }
}
