//! Custom Player Anthems
//!
//! Plays a custom anthem when the local player scores and offers an overlay
//! window that can be toggled from the console or a bound function key.

pub mod audio;
pub mod commands;
pub mod config;
pub mod desktop;
pub mod game;
pub mod hotkey;
pub mod keybind;
pub mod overlay;
pub mod plugin;
pub mod storage;
pub mod ui;

pub use config::{ConfigError, ConfigStore, SettingValue};
pub use game::EventCounter;
pub use keybind::{Binding, FunctionKey, KeyBindController, KeyBindHost};
pub use overlay::{OverlayLifecycle, OverlayState};
pub use plugin::AnthemsPlugin;
