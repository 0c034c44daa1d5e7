//! Overlay toggle key binding
//!
//! The controller keeps exactly one host key mapped to the overlay toggle
//! command. When the configured binding changes, the old mapping is removed
//! before the new one is installed.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Label shown and persisted when no key is bound
pub const UNBOUND_LABEL: &str = "None";

/// Keys that may toggle the overlay.
///
/// F2 and F6 open the host's own menu and console and are never offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionKey {
    F1,
    F3,
    F4,
    F5,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl FunctionKey {
    pub const ALL: [FunctionKey; 10] = [
        FunctionKey::F1,
        FunctionKey::F3,
        FunctionKey::F4,
        FunctionKey::F5,
        FunctionKey::F7,
        FunctionKey::F8,
        FunctionKey::F9,
        FunctionKey::F10,
        FunctionKey::F11,
        FunctionKey::F12,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FunctionKey::F1 => "F1",
            FunctionKey::F3 => "F3",
            FunctionKey::F4 => "F4",
            FunctionKey::F5 => "F5",
            FunctionKey::F7 => "F7",
            FunctionKey::F8 => "F8",
            FunctionKey::F9 => "F9",
            FunctionKey::F10 => "F10",
            FunctionKey::F11 => "F11",
            FunctionKey::F12 => "F12",
        }
    }

    /// Parse a key label, case-insensitive
    pub fn from_label(label: &str) -> Option<FunctionKey> {
        let upper = label.trim().to_uppercase();
        Self::ALL.into_iter().find(|key| key.label() == upper)
    }
}

impl fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The key currently associated with the toggle action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Binding {
    #[default]
    Unbound,
    Key(FunctionKey),
}

impl Binding {
    /// Every selectable binding, unbound first
    pub fn options() -> impl Iterator<Item = Binding> {
        std::iter::once(Binding::Unbound).chain(FunctionKey::ALL.into_iter().map(Binding::Key))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Binding::Unbound => UNBOUND_LABEL,
            Binding::Key(key) => key.label(),
        }
    }

    pub fn from_label(label: &str) -> Option<Binding> {
        if label.trim().eq_ignore_ascii_case(UNBOUND_LABEL) || label.trim().is_empty() {
            return Some(Binding::Unbound);
        }
        FunctionKey::from_label(label).map(Binding::Key)
    }

    pub fn key(&self) -> Option<FunctionKey> {
        match self {
            Binding::Unbound => None,
            Binding::Key(key) => Some(*key),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Binding::Key(_))
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<FunctionKey> for Binding {
    fn from(key: FunctionKey) -> Self {
        Binding::Key(key)
    }
}

/// Failures reported by the host key table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("{key} is already bound to '{command}'")]
    KeyInUse { key: FunctionKey, command: String },
    #[error("{0} is not bound")]
    NotBound(FunctionKey),
    #[error("host rejected binding for {key}: {reason}")]
    Host { key: FunctionKey, reason: String },
}

/// Key binding services provided by the host
pub trait KeyBindHost {
    /// Map `key` to `command`
    fn bind(&mut self, key: FunctionKey, command: &str) -> Result<(), BindError>;

    /// Remove whatever mapping `key` has
    fn unbind(&mut self, key: FunctionKey) -> Result<(), BindError>;
}

/// Keeps the host's key table in step with the configured binding
pub struct KeyBindController<H> {
    host: H,
    current: Binding,
    command: String,
    status: String,
}

impl<H: KeyBindHost> KeyBindController<H> {
    /// Create a controller that binds keys to `command`.
    ///
    /// The command string must stay the same for the lifetime of the plugin,
    /// otherwise mappings stored by the host are orphaned.
    pub fn new(host: H, command: impl Into<String>) -> Self {
        Self {
            host,
            current: Binding::Unbound,
            command: command.into(),
            status: String::new(),
        }
    }

    /// Adopt the binding restored at startup. Nothing is unbound since no
    /// earlier mapping exists in this process.
    pub fn initialize(&mut self, initial: Binding) {
        self.current = initial;
        match initial {
            Binding::Unbound => {
                self.status = "No toggle key bound".to_string();
            }
            Binding::Key(key) => match self.host.bind(key, &self.command) {
                Ok(()) => {
                    info!("Restored toggle keybind: {} -> {}", key, self.command);
                    self.status = format!("Toggle key set to {}", key);
                }
                Err(e) => {
                    warn!("Failed to restore toggle keybind {}: {}", key, e);
                    self.status = format!("Could not bind {}: {}", key, e);
                }
            },
        }
    }

    /// Reconcile the host key table after the configured binding changed
    /// from `old` to `new`.
    ///
    /// Stale mappings are removed before the new one is installed. Host
    /// failures are logged and reported on the status line; the current
    /// binding follows `new` either way.
    pub fn on_binding_changed(&mut self, old: Binding, new: Binding) {
        if old == new && self.current == new {
            debug!("Toggle keybind unchanged ({})", new);
            return;
        }

        let mut stale: Vec<FunctionKey> = Vec::with_capacity(2);
        for binding in [old, self.current] {
            if let Some(key) = binding.key() {
                if binding != new && !stale.contains(&key) {
                    stale.push(key);
                }
            }
        }

        for key in stale {
            match self.host.unbind(key) {
                Ok(()) => info!("Unbound old toggle keybind: {}", key),
                Err(e) => warn!("Failed to unbind old toggle keybind {}: {}", key, e),
            }
        }

        self.status = match new {
            Binding::Key(key) => match self.host.bind(key, &self.command) {
                Ok(()) => {
                    info!("Set toggle keybind: {} -> {}", key, self.command);
                    format!("Toggle key set to {}", key)
                }
                Err(e) => {
                    warn!("Failed to bind {} -> {}: {}", key, self.command, e);
                    format!("Could not bind {}: {}", key, e)
                }
            },
            Binding::Unbound => {
                info!("Toggle keybind cleared");
                "Toggle key cleared".to_string()
            }
        };

        self.current = new;
    }

    /// Remove the current mapping, e.g. when the plugin unloads
    pub fn release(&mut self) {
        if let Some(key) = self.current.key() {
            if let Err(e) = self.host.unbind(key) {
                warn!("Failed to release toggle keybind {}: {}", key, e);
            }
        }
        self.current = Binding::Unbound;
    }

    /// The toggle command when `key` is the current binding
    pub fn resolve(&self, key: FunctionKey) -> Option<&str> {
        (self.current == Binding::Key(key)).then_some(self.command.as_str())
    }

    pub fn current_binding(&self) -> Binding {
        self.current
    }

    pub fn current_binding_label(&self) -> &'static str {
        self.current.label()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

/// A request made against a [`KeyTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Bind(FunctionKey, String),
    Unbind(FunctionKey),
}

/// In-process host key table.
///
/// Refuses to overwrite a key bound to a different command and records every
/// request it receives.
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    bindings: HashMap<FunctionKey, String>,
    calls: Vec<HostCall>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` on behalf of someone else, without recording a call
    pub fn reserve(&mut self, key: FunctionKey, command: impl Into<String>) {
        self.bindings.insert(key, command.into());
    }

    /// Command mapped to `key`
    pub fn command_for(&self, key: FunctionKey) -> Option<&str> {
        self.bindings.get(&key).map(String::as_str)
    }

    /// Number of keys currently mapped to `command`
    pub fn mappings_to(&self, command: &str) -> usize {
        self.bindings.values().filter(|c| c.as_str() == command).count()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl KeyBindHost for KeyTable {
    fn bind(&mut self, key: FunctionKey, command: &str) -> Result<(), BindError> {
        self.calls.push(HostCall::Bind(key, command.to_string()));
        match self.bindings.get(&key) {
            Some(existing) if existing != command => Err(BindError::KeyInUse {
                key,
                command: existing.clone(),
            }),
            _ => {
                self.bindings.insert(key, command.to_string());
                Ok(())
            }
        }
    }

    fn unbind(&mut self, key: FunctionKey) -> Result<(), BindError> {
        self.calls.push(HostCall::Unbind(key));
        self.bindings
            .remove(&key)
            .map(|_| ())
            .ok_or(BindError::NotBound(key))
    }
}
