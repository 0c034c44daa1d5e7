//! Plugin Configuration
//!
//! A registry of named settings with write-through persistence. Changes are
//! published to subscribers over channels which they drain once per frame,
//! so `set` never calls back into the code that triggered it.

pub mod backend;

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use backend::{MemoryBackend, PersistedValues, SettingsBackend, TomlFileBackend};

/// Anthem playback and goal counting enabled
pub const ENABLED: &str = "anthems_enabled";
/// Label of the key bound to the overlay toggle
pub const KEYBIND: &str = "anthems_keybind";
/// Fade the anthem out instead of cutting it
pub const FADE_OUT: &str = "anthems_fade_out";
/// Path of the selected anthem file
pub const WAV_PATH: &str = "anthems_wav_path";

/// Value of a single setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
}

impl SettingValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "boolean",
            SettingValue::Text(_) => "text",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            SettingValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            SettingValue::Bool(_) => None,
        }
    }

    /// String form written to durable storage
    pub fn to_persisted(&self) -> String {
        match self {
            SettingValue::Bool(true) => "1".to_string(),
            SettingValue::Bool(false) => "0".to_string(),
            SettingValue::Text(s) => s.clone(),
        }
    }

    /// Parse `raw` as a value of the same type as `self`
    fn parse_as(&self, raw: &str) -> Option<SettingValue> {
        match self {
            SettingValue::Bool(_) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Some(SettingValue::Bool(true)),
                "0" | "false" => Some(SettingValue::Bool(false)),
                _ => None,
            },
            SettingValue::Text(_) => Some(SettingValue::Text(raw.to_string())),
        }
    }

    fn same_type(&self, other: &SettingValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

/// Accepts or rejects a candidate text value
pub type Validator = fn(&str) -> bool;

/// A registered setting
#[derive(Debug, Clone)]
pub struct Setting {
    name: String,
    value: SettingValue,
    default: SettingValue,
    persisted: bool,
    description: String,
    validator: Option<Validator>,
}

impl Setting {
    /// Help text shown next to the setting's widget
    pub fn description(&self) -> &str {
        &self.description
    }

    fn accepts(&self, value: &SettingValue) -> bool {
        match (self.validator, value) {
            (Some(validator), SettingValue::Text(text)) => validator(text),
            _ => true,
        }
    }
}

/// Published after a setting's value changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingChange {
    pub name: String,
    pub old: SettingValue,
    pub new: SettingValue,
}

/// Rejected configuration operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown setting '{0}'")]
    UnknownSetting(String),
    #[error("setting '{name}' expects a {expected} value")]
    TypeMismatch { name: String, expected: &'static str },
    #[error("'{value}' is not a valid value for '{name}'")]
    InvalidValue { name: String, value: String },
    #[error("setting '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Single source of truth for plugin settings
pub struct ConfigStore {
    settings: HashMap<String, Setting>,
    backend: Box<dyn SettingsBackend>,
    /// Values read from the backend when the store was opened
    loaded: PersistedValues,
    subscribers: Vec<Sender<SettingChange>>,
}

impl ConfigStore {
    /// Open a store on `backend`, reading whatever a previous session saved
    pub fn open(backend: impl SettingsBackend + 'static) -> Self {
        let loaded = match backend.load() {
            Ok(values) => {
                debug!("Loaded {} persisted settings", values.len());
                values
            }
            Err(e) => {
                warn!("Failed to load persisted settings, using defaults: {:#}", e);
                PersistedValues::new()
            }
        };

        Self {
            settings: HashMap::new(),
            backend: Box::new(backend),
            loaded,
            subscribers: Vec::new(),
        }
    }

    /// Declare a setting. A persisted value saved earlier replaces `default`.
    pub fn register(
        &mut self,
        name: &str,
        default: impl Into<SettingValue>,
        persisted: bool,
        description: &str,
    ) -> Result<(), ConfigError> {
        self.register_setting(name, default.into(), persisted, description, None)
    }

    /// Declare a text setting whose values must pass `validator`
    pub fn register_validated(
        &mut self,
        name: &str,
        default: impl Into<SettingValue>,
        persisted: bool,
        description: &str,
        validator: Validator,
    ) -> Result<(), ConfigError> {
        self.register_setting(name, default.into(), persisted, description, Some(validator))
    }

    fn register_setting(
        &mut self,
        name: &str,
        default: SettingValue,
        persisted: bool,
        description: &str,
        validator: Option<Validator>,
    ) -> Result<(), ConfigError> {
        if self.settings.contains_key(name) {
            return Err(ConfigError::AlreadyRegistered(name.to_string()));
        }

        let mut setting = Setting {
            name: name.to_string(),
            value: default.clone(),
            default,
            persisted,
            description: description.to_string(),
            validator,
        };

        if persisted {
            if let Some(raw) = self.loaded.get(name) {
                match setting.default.parse_as(raw) {
                    Some(value) if setting.accepts(&value) => setting.value = value,
                    _ => warn!(
                        "Ignoring persisted value '{}' for {}, keeping default {}",
                        raw, name, setting.default
                    ),
                }
            }
        }

        debug!("Registered setting {} = {}", name, setting.value);
        self.settings.insert(name.to_string(), setting);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&SettingValue, ConfigError> {
        self.settings
            .get(name)
            .map(|s| &s.value)
            .ok_or_else(|| ConfigError::UnknownSetting(name.to_string()))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, ConfigError> {
        self.get(name)?
            .as_bool()
            .ok_or_else(|| ConfigError::TypeMismatch {
                name: name.to_string(),
                expected: "boolean",
            })
    }

    pub fn get_text(&self, name: &str) -> Result<&str, ConfigError> {
        self.get(name)?
            .as_text()
            .ok_or_else(|| ConfigError::TypeMismatch {
                name: name.to_string(),
                expected: "text",
            })
    }

    pub fn setting(&self, name: &str) -> Option<&Setting> {
        self.settings.get(name)
    }

    /// Change a setting's value.
    ///
    /// Unknown names are rejected rather than created. Persisted settings are
    /// written through to the backend before subscribers are notified. Setting
    /// the current value again succeeds without publishing anything.
    pub fn set(&mut self, name: &str, value: impl Into<SettingValue>) -> Result<(), ConfigError> {
        let value = value.into();

        let Some(setting) = self.settings.get_mut(name) else {
            warn!("Rejected write to unknown setting '{}'", name);
            return Err(ConfigError::UnknownSetting(name.to_string()));
        };

        if !setting.value.same_type(&value) {
            warn!(
                "Rejected {} value for {} setting '{}'",
                value.type_name(),
                setting.value.type_name(),
                name
            );
            return Err(ConfigError::TypeMismatch {
                name: name.to_string(),
                expected: setting.value.type_name(),
            });
        }

        if !setting.accepts(&value) {
            warn!("Rejected invalid value {} for '{}'", value, name);
            return Err(ConfigError::InvalidValue {
                name: name.to_string(),
                value: value.to_persisted(),
            });
        }

        if setting.value == value {
            debug!("Setting {} unchanged ({})", name, value);
            return Ok(());
        }

        let old = std::mem::replace(&mut setting.value, value.clone());
        let persisted = setting.persisted;
        info!("Setting {} changed: {} -> {}", name, old, value);

        if persisted {
            self.persist();
        }

        self.publish(SettingChange {
            name: name.to_string(),
            old,
            new: value,
        });
        Ok(())
    }

    /// Console form of [`ConfigStore::set`]; booleans accept `0/1/true/false`
    pub fn set_from_str(&mut self, name: &str, raw: &str) -> Result<(), ConfigError> {
        let setting = self.settings.get(name).ok_or_else(|| {
            warn!("Rejected write to unknown setting '{}'", name);
            ConfigError::UnknownSetting(name.to_string())
        })?;

        let value = setting
            .value
            .parse_as(raw)
            .ok_or_else(|| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw.to_string(),
            })?;

        self.set(name, value)
    }

    /// Restore a setting to its registered default
    pub fn reset_to_default(&mut self, name: &str) -> Result<(), ConfigError> {
        let default = self
            .settings
            .get(name)
            .map(|s| s.default.clone())
            .ok_or_else(|| ConfigError::UnknownSetting(name.to_string()))?;
        self.set(name, default)
    }

    /// Receive every future [`SettingChange`]
    pub fn subscribe(&mut self) -> Receiver<SettingChange> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Current values of all persisted settings in storage form
    pub fn persisted_values(&self) -> PersistedValues {
        self.settings
            .values()
            .filter(|s| s.persisted)
            .map(|s| (s.name.clone(), s.value.to_persisted()))
            .collect()
    }

    fn persist(&mut self) {
        let values = self.persisted_values();
        // The in-memory value stays authoritative even if the write fails
        if let Err(e) = self.backend.save(&values) {
            warn!("Failed to persist settings: {:#}", e);
        }
    }

    fn publish(&mut self, change: SettingChange) {
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
