use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DataError, Result};

/// Narrow persistence interface injected into each pipeline stage
///
/// A store holds exactly one value (a whole table or a whole model artifact)
/// that is loaded and saved wholesale.
pub trait Store<T>: Send + Sync {
    /// Load the stored value
    fn load(&self) -> Result<T>;

    /// Replace the stored value
    fn save(&self, value: &T) -> Result<()>;

    /// Whether a value has been stored yet
    fn exists(&self) -> bool;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;

    /// Load the stored value, or `T::default()` when nothing is stored yet
    fn load_or_default(&self) -> Result<T>
    where
        T: Default,
    {
        if self.exists() {
            self.load()
        } else {
            Ok(T::default())
        }
    }
}

/// Store backed by a pretty-printed JSON file
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Store<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<T> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DataError::NotFound { path: self.path.display().to_string() }.into()
            } else {
                crate::error::PaceError::from(e)
            }
        })?;

        let value = serde_json::from_str(&content).map_err(|e| DataError::Malformed {
            source_name: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Loaded {}", self.path.display());
        Ok(value)
    }

    fn save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(&self.path, content)?;

        tracing::debug!("Wrote {}", self.path.display());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store for tests and embedding
pub struct MemoryStore<T> {
    value: Mutex<Option<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self { value: Mutex::new(None) }
    }

    pub fn with_value(value: T) -> Self {
        Self { value: Mutex::new(Some(value)) }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Store<T> for MemoryStore<T>
where
    T: Clone + Send,
{
    fn load(&self) -> Result<T> {
        let guard = self
            .value
            .lock()
            .map_err(|_| crate::error::PaceError::generic("memory store lock poisoned"))?;

        guard.clone().ok_or_else(|| {
            DataError::NotFound { path: self.describe() }.into()
        })
    }

    fn save(&self, value: &T) -> Result<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| crate::error::PaceError::generic("memory store lock poisoned"))?;
        *guard = Some(value.clone());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.value.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
