//! Colors shared by the plugin's windows

use egui::Color32;

/// Palette used by the overlay and settings widgets
pub struct ThemeColors;

impl ThemeColors {
    // Headings
    pub const TITLE: Color32 = Color32::from_rgb(255, 128, 0);
    pub const SECTION: Color32 = Color32::from_rgb(128, 204, 255);

    // States
    pub const ACTIVE: Color32 = Color32::from_rgb(46, 204, 113);
    pub const WARNING: Color32 = Color32::from_rgb(255, 193, 7);

    // Text colors
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 175);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(179, 179, 179);
}

/// Color for an on/off flag
pub fn flag_color(on: bool) -> Color32 {
    if on {
        ThemeColors::ACTIVE
    } else {
        ThemeColors::TEXT_SECONDARY
    }
}

/// "Enabled" / "Disabled"
pub fn flag_label(on: bool) -> &'static str {
    if on {
        "Enabled"
    } else {
        "Disabled"
    }
}
