//! The in-game overlay window

use crate::overlay::MENU_TITLE;
use crate::ui::theme::{flag_label, ThemeColors};
use crate::ui::{PanelModel, UiAction};

/// Draw the overlay window.
///
/// `open` is cleared when the user closes the window through its close box;
/// the caller forwards that to the lifecycle as a host-driven close.
pub fn render_overlay_window(
    ctx: &egui::Context,
    model: &PanelModel<'_>,
    open: &mut bool,
    actions: &mut Vec<UiAction>,
) {
    egui::Window::new(MENU_TITLE)
        .open(open)
        .resizable(true)
        .default_width(380.0)
        .show(ctx, |ui| {
            ui.colored_label(ThemeColors::TITLE, "Custom Player Anthems");
            ui.separator();
            ui.label("Play custom WAV files when YOU score goals!");

            ui.add_space(6.0);
            ui.label(format!("Selected WAV File: {}", model.anthem_name));
            ui.label(format!("Goal Counter: {}", model.goal_count));

            ui.horizontal(|ui| {
                if ui.button("Test Custom Anthem").clicked() {
                    actions.push(UiAction::TestAnthem);
                }
                if ui.button("Reset Counter").clicked() {
                    actions.push(UiAction::ResetCounter);
                }
            });

            ui.add_space(6.0);
            ui.separator();
            ui.label(format!("Custom Anthems: {}", flag_label(model.enabled)));
            ui.label(format!("Fade Out: {}", flag_label(model.fade_out)));
            ui.label(format!("Current Status: {}", model.status));
            ui.label(format!("Plugin Version: {}", model.version));

            ui.add_space(6.0);
            ui.separator();
            ui.label("Keybind Info:");
            match model.binding.key() {
                Some(key) => {
                    ui.colored_label(ThemeColors::ACTIVE, format!("Bound to: {}", key));
                    ui.label(format!("Press {} to toggle this window!", key));
                }
                None => {
                    ui.colored_label(ThemeColors::WARNING, "No F-key bound");
                    ui.label("Set one in the plugin settings");
                }
            }
        });
}
