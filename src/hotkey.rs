//! OS-level hotkeys acting as the host key table
//!
//! Used when the plugin runs outside the game: each bound function key is
//! registered as a global hotkey and presses are turned back into the
//! command the key is bound to.

use anyhow::{anyhow, Result};
use global_hotkey::{
    hotkey::{Code, HotKey},
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::keybind::{BindError, FunctionKey, KeyBindHost};

/// Key code registered for a function key
pub fn key_code(key: FunctionKey) -> Code {
    match key {
        FunctionKey::F1 => Code::F1,
        FunctionKey::F3 => Code::F3,
        FunctionKey::F4 => Code::F4,
        FunctionKey::F5 => Code::F5,
        FunctionKey::F7 => Code::F7,
        FunctionKey::F8 => Code::F8,
        FunctionKey::F9 => Code::F9,
        FunctionKey::F10 => Code::F10,
        FunctionKey::F11 => Code::F11,
        FunctionKey::F12 => Code::F12,
    }
}

struct Registered {
    hotkey: HotKey,
    command: String,
}

/// Key table backed by global hotkeys
pub struct GlobalHotkeyHost {
    manager: GlobalHotKeyManager,
    bindings: HashMap<FunctionKey, Registered>,
}

impl GlobalHotkeyHost {
    /// Create a new hotkey host
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| anyhow!("Failed to create hotkey manager: {:?}", e))?;

        Ok(Self {
            manager,
            bindings: HashMap::new(),
        })
    }

    pub fn command_for(&self, key: FunctionKey) -> Option<&str> {
        self.bindings.get(&key).map(|r| r.command.as_str())
    }

    /// Drain pending hotkey presses into the commands bound to them
    pub fn poll_commands(&self) -> Vec<String> {
        let mut commands = Vec::new();

        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            if let Some(registered) = self.bindings.values().find(|r| r.hotkey.id() == event.id) {
                debug!("Hotkey {} pressed", event.id);
                commands.push(registered.command.clone());
            }
        }

        commands
    }
}

impl KeyBindHost for GlobalHotkeyHost {
    fn bind(&mut self, key: FunctionKey, command: &str) -> Result<(), BindError> {
        if let Some(existing) = self.bindings.get(&key) {
            if existing.command == command {
                return Ok(());
            }
            return Err(BindError::KeyInUse {
                key,
                command: existing.command.clone(),
            });
        }

        let hotkey = HotKey::new(None, key_code(key));
        self.manager.register(hotkey).map_err(|e| BindError::Host {
            key,
            reason: format!("{:?}", e),
        })?;

        info!("Registered global hotkey {} -> {}", key, command);
        self.bindings.insert(
            key,
            Registered {
                hotkey,
                command: command.to_string(),
            },
        );
        Ok(())
    }

    fn unbind(&mut self, key: FunctionKey) -> Result<(), BindError> {
        let registered = self.bindings.remove(&key).ok_or(BindError::NotBound(key))?;
        self.manager
            .unregister(registered.hotkey)
            .map_err(|e| BindError::Host {
                key,
                reason: format!("{:?}", e),
            })
    }
}

impl Drop for GlobalHotkeyHost {
    fn drop(&mut self) {
        for (key, registered) in self.bindings.drain() {
            if let Err(e) = self.manager.unregister(registered.hotkey) {
                warn!("Failed to unregister hotkey {}: {:?}", key, e);
            }
        }
    }
}
