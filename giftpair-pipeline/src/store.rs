//! Persisted run state: the synergy score cache and the processed-bundle log.
//!
//! Both are small documents that are read whole and rewritten whole. A
//! [`Store`] is handed to the stage that needs it; nothing is global.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Pair key → synergy score.
pub type ScoreCache = BTreeMap<String, f64>;

/// Bundle names emitted by previous runs.
pub type ProcessedNames = BTreeSet<String>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed contents in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Whole-document persistence for one value.
pub trait Store<T>: Send + Sync {
    /// Read the stored value. A store that was never written yields
    /// `T::default()`.
    fn load(&self) -> StoreResult<T>;

    /// Replace the stored value.
    fn save(&self, value: &T) -> StoreResult<()>;
}

/// Pretty-printed JSON file, replaced atomically on save.
pub struct JsonFileStore<T> {
    path: PathBuf,
    _value: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<T> Store<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> StoreResult<T> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(value)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        // Write beside the target and rename over it so readers never see a
        // half-written document.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

/// In-process store, for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore<T> {
    value: Mutex<T>,
    saves: AtomicUsize,
}

impl<T> MemoryStore<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl<T> Store<T> for MemoryStore<T>
where
    T: Clone + Send,
{
    fn load(&self) -> StoreResult<T> {
        self.value
            .lock()
            .map(|v| v.clone())
            .map_err(|_| StoreError::Poisoned)
    }

    fn save(&self, value: &T) -> StoreResult<()> {
        let mut guard = self.value.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = value.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Load the processed log, resetting it when it cannot be read.
///
/// A missing log is an empty set. A malformed one is logged, replaced by an
/// empty list on disk, and read as empty.
pub fn load_processed_or_reset(store: &dyn Store<ProcessedNames>) -> ProcessedNames {
    match store.load() {
        Ok(names) => names,
        Err(err) => {
            log::warn!("processed log unreadable, starting fresh: {}", err);
            let fresh = ProcessedNames::new();
            if let Err(err) = store.save(&fresh) {
                log::error!("could not rewrite processed log: {}", err);
            }
            fresh
        }
    }
}

/// Score cache as read at the start of a scoring batch.
#[derive(Debug, Default)]
pub struct LoadedScores {
    pub scores: ScoreCache,
    /// False when the backing file exists but could not be read. The batch
    /// must not save then, or it would replace scores it never saw.
    pub writable: bool,
}

/// Load the score cache for a scoring batch.
///
/// Malformed contents read as empty and the next save replaces them. Any
/// other failure also reads as empty but leaves the file untouched.
pub fn load_scores_for_batch(store: &dyn Store<ScoreCache>) -> LoadedScores {
    match store.load() {
        Ok(scores) => LoadedScores {
            scores,
            writable: true,
        },
        Err(err @ StoreError::Malformed { .. }) => {
            log::warn!("score cache malformed, starting empty: {}", err);
            LoadedScores {
                scores: ScoreCache::new(),
                writable: true,
            }
        }
        Err(err) => {
            log::error!(
                "score cache unreadable, new scores will not be saved: {}",
                err
            );
            LoadedScores {
                scores: ScoreCache::new(),
                writable: false,
            }
        }
    }
}
