//! Widgets for the overlay window and the settings panel
//!
//! Rendering functions only read a [`PanelModel`] and report what the user
//! did as [`UiAction`]s. The plugin applies those after the pass, so all
//! writes go through the config store.

pub mod overlay_window;
pub mod settings_panel;
pub mod theme;

use crate::keybind::Binding;
use crate::overlay::OverlayState;

pub use overlay_window::render_overlay_window;
pub use settings_panel::render_settings_panel;

/// Something the user did in a widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    SetEnabled(bool),
    SetFadeOut(bool),
    SelectBinding(Binding),
    LoadFile(String),
    ClearSelection,
    ResetCounter,
    TestAnthem,
    ToggleWindow,
}

/// Read-only snapshot of everything the widgets display
#[derive(Debug, Clone)]
pub struct PanelModel<'a> {
    pub enabled: bool,
    pub fade_out: bool,
    pub binding: Binding,
    pub anthem_name: &'a str,
    pub goal_count: u64,
    pub status: &'a str,
    pub window: OverlayState,
    pub version: &'static str,
    pub help: SettingHelp<'a>,
}

/// Description each setting was registered with, shown as hover text
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingHelp<'a> {
    pub enabled: &'a str,
    pub keybind: &'a str,
    pub fade_out: &'a str,
    pub wav_path: &'a str,
}

/// Widget state that lives across frames
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    /// Path typed into the anthem file field
    pub path_draft: String,
}
