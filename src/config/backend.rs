//! Durable storage for persisted settings
//!
//! Values are stored as a table of strings under `[settings]`; booleans are
//! serialized as `"0"` / `"1"` so the file stays readable by the host's own
//! config tooling.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Snapshot of every persisted setting, keyed by setting name
pub type PersistedValues = BTreeMap<String, String>;

/// Write-through storage used by [`super::ConfigStore`]
pub trait SettingsBackend {
    /// Read every stored value. A missing store is not an error.
    fn load(&self) -> Result<PersistedValues>;

    /// Replace the stored values with `values`
    fn save(&mut self, values: &PersistedValues) -> Result<()>;
}

/// On-disk layout of the settings file
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: PersistedValues,
}

/// Settings stored in a TOML file
#[derive(Debug, Clone)]
pub struct TomlFileBackend {
    path: PathBuf,
}

impl TomlFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsBackend for TomlFileBackend {
    fn load(&self) -> Result<PersistedValues> {
        if !self.path.exists() {
            return Ok(PersistedValues::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let file: SettingsFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(file.settings)
    }

    fn save(&mut self, values: &PersistedValues) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = SettingsFile {
            settings: values.clone(),
        };
        let content = toml::to_string_pretty(&file)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory settings storage
///
/// Clones share the same table, so a caller can keep a handle to inspect what
/// the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: Rc<RefCell<PersistedValues>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with values as if a previous session had saved them
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let backend = Self::default();
        backend
            .values
            .borrow_mut()
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        backend
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.values.borrow().get(name).cloned()
    }

    /// Number of completed saves
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<PersistedValues> {
        Ok(self.values.borrow().clone())
    }

    fn save(&mut self, values: &PersistedValues) -> Result<()> {
        *self.values.borrow_mut() = values.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
