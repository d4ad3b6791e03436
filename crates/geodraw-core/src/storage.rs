//! Shape persistence.
//!
//! The whole collection is stored as one JSON array under [`SHAPES_KEY`] in a
//! key-value backend. Saving is best-effort: failures are logged and never
//! reach the caller, and anything unreadable loads as an empty collection.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::id::ShapeId;
use crate::shape::{Shape, ShapeKind};

/// Key under which the shape collection is stored
pub const SHAPES_KEY: &str = "geodraw-drawn-shapes";

/// Key under which hidden shapes and kinds are stored
pub const HIDDEN_KEY: &str = "geodraw-hidden-shapes";

/// Which shapes and kinds the user has hidden
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HiddenState {
    pub shapes: Vec<ShapeId>,
    pub kinds: Vec<ShapeKind>,
}

/// Get the default directory for the file store
pub fn default_storage_dir() -> PathBuf {
    // Use XDG data directory if available, otherwise fallback to ~/.local/share
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local/share")
        });
    data_dir.join("geodraw")
}

/// Where the shape collection lives
pub trait PersistencePort {
    /// Write the full collection (best-effort)
    fn save(&mut self, shapes: &[Shape]);
    /// Read the collection; empty when absent or unreadable
    fn load(&self) -> Vec<Shape>;
    /// Remove the stored collection and hidden state
    fn clear(&mut self);
    /// Write the hidden state (best-effort)
    fn save_hidden(&mut self, hidden: &HiddenState);
    /// Read the hidden state; empty when absent or unreadable
    fn load_hidden(&self) -> HiddenState;
}

/// String key-value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory backend. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value for a key
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Directory backend: one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at [`default_storage_dir`]
    pub fn open_default() -> Self {
        Self::new(default_storage_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Ensure parent directory exists
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {:?}", self.dir))?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        }
        Ok(())
    }
}

/// JSON shape collection over a key-value backend
#[derive(Debug, Clone)]
pub struct ShapeStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ShapeStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn try_save(&mut self, shapes: &[Shape]) -> Result<()> {
        let json = serde_json::to_string(shapes).context("Failed to serialize shapes")?;
        self.backend.set(SHAPES_KEY, &json)
    }

    fn try_load(&self) -> Result<Vec<Shape>> {
        let Some(raw) = self.backend.get(SHAPES_KEY)? else {
            return Ok(Vec::new());
        };
        let value: serde_json::Value =
            serde_json::from_str(&raw).context("Stored shapes are not valid JSON")?;
        let serde_json::Value::Array(items) = value else {
            warn!("stored shapes are not an array, ignoring");
            return Ok(Vec::new());
        };
        // One bad entry must not take the rest of the collection with it
        let shapes = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Shape>(item) {
                Ok(shape) => Some(shape),
                Err(e) => {
                    warn!(index, "skipping stored shape: {e}");
                    None
                }
            })
            .collect();
        Ok(shapes)
    }

    fn try_save_hidden(&mut self, hidden: &HiddenState) -> Result<()> {
        let json = serde_json::to_string(hidden).context("Failed to serialize hidden state")?;
        self.backend.set(HIDDEN_KEY, &json)
    }

    fn try_load_hidden(&self) -> Result<HiddenState> {
        let Some(raw) = self.backend.get(HIDDEN_KEY)? else {
            return Ok(HiddenState::default());
        };
        serde_json::from_str(&raw).context("Stored hidden state does not match its schema")
    }
}

impl<S: KeyValueStore> PersistencePort for ShapeStore<S> {
    fn save(&mut self, shapes: &[Shape]) {
        match self.try_save(shapes) {
            Ok(()) => debug!(count = shapes.len(), "saved shapes"),
            Err(e) => error!("failed to save shapes: {e:#}"),
        }
    }

    fn load(&self) -> Vec<Shape> {
        match self.try_load() {
            Ok(shapes) => {
                debug!(count = shapes.len(), "loaded shapes");
                shapes
            }
            Err(e) => {
                warn!("failed to load shapes, starting empty: {e:#}");
                Vec::new()
            }
        }
    }

    fn clear(&mut self) {
        for key in [SHAPES_KEY, HIDDEN_KEY] {
            match self.backend.remove(key) {
                Ok(()) => debug!(key, "cleared storage"),
                Err(e) => error!(key, "failed to clear storage: {e:#}"),
            }
        }
    }

    fn save_hidden(&mut self, hidden: &HiddenState) {
        match self.try_save_hidden(hidden) {
            Ok(()) => debug!(
                shapes = hidden.shapes.len(),
                kinds = hidden.kinds.len(),
                "saved hidden state"
            ),
            Err(e) => error!("failed to save hidden state: {e:#}"),
        }
    }

    fn load_hidden(&self) -> HiddenState {
        self.try_load_hidden().unwrap_or_else(|e| {
            warn!("failed to load hidden state, showing everything: {e:#}");
            HiddenState::default()
        })
    }
}
