//! Settings panel shown in the host's plugin settings

use egui::RichText;

use crate::keybind::Binding;
use crate::ui::theme::{flag_color, flag_label, ThemeColors};
use crate::ui::{PanelModel, PanelState, UiAction};

/// Render the settings panel
pub fn render_settings_panel(
    ui: &mut egui::Ui,
    model: &PanelModel<'_>,
    state: &mut PanelState,
    actions: &mut Vec<UiAction>,
) {
    ui.label(
        RichText::new("Custom Player Anthems")
            .size(20.0)
            .strong()
            .color(ThemeColors::TITLE),
    );
    ui.separator();
    ui.label("Play custom WAV files when YOU score goals!");
    ui.label("Works in Online Multiplayer, Freeplay, Custom Training, and Private Matches.");

    ui.add_space(8.0);
    section_header(ui, "Custom Player Anthems Settings");

    let mut enabled = model.enabled;
    if ui
        .checkbox(&mut enabled, "Enable Custom Anthems")
        .on_hover_text(model.help.enabled)
        .changed()
    {
        actions.push(UiAction::SetEnabled(enabled));
    }

    ui.add_space(8.0);
    render_file_selection(ui, model, state, actions);

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let mut fade_out = model.fade_out;
        if ui
            .checkbox(&mut fade_out, "Fade Out")
            .on_hover_text(model.help.fade_out)
            .changed()
        {
            actions.push(UiAction::SetFadeOut(fade_out));
        }
        ui.colored_label(ThemeColors::TEXT_MUTED, "(anthem will fade out at the end)");
    });

    ui.add_space(8.0);
    ui.separator();
    ui.label(format!("Goal Counter: {}", model.goal_count));
    ui.horizontal(|ui| {
        if ui.button("Reset Counter").clicked() {
            actions.push(UiAction::ResetCounter);
        }
        if ui.button("Test Custom Anthem").clicked() {
            actions.push(UiAction::TestAnthem);
        }
    });

    ui.add_space(8.0);
    section_header(ui, "Quick Access F-Key Binding");
    render_binding_combo(ui, model.binding, model.help.keybind, actions);
    ui.label(format!("Current Keybind: {}", model.binding.label()));
    if let Some(key) = model.binding.key() {
        ui.colored_label(
            ThemeColors::ACTIVE,
            format!("Press {} to toggle Custom Anthems window!", key),
        );
    }

    ui.add_space(8.0);
    section_header(ui, "Standalone Window Controls");
    ui.label(format!("Window Status: {}", model.window.label()));
    let label = if model.window.is_open() {
        "Close Standalone Window"
    } else {
        "Open Standalone Window"
    };
    if ui.button(label).clicked() {
        actions.push(UiAction::ToggleWindow);
    }

    ui.separator();
    ui.label(format!("Status: {}", model.status));
    ui.label(format!("Plugin Version: {}", model.version));
    ui.horizontal(|ui| {
        ui.label("Custom Anthems:");
        ui.colored_label(flag_color(model.enabled), flag_label(model.enabled));
    });
    ui.horizontal(|ui| {
        ui.label("Fade Out:");
        ui.colored_label(flag_color(model.fade_out), flag_label(model.fade_out));
    });

    ui.separator();
    ui.colored_label(ThemeColors::SECTION, "How to Use Custom Player Anthems:");
    for line in [
        "1. Enable Custom Anthems checkbox above",
        "2. Enter the path of your anthem WAV file and press Load",
        "3. Optionally enable Fade Out for smoother endings",
        "4. Your anthem will play when YOU score goals!",
        "Set an F-key binding for quick access to this window",
        "Console commands: 'togglemenu customplayeranthems', 'anthems_toggle'",
    ] {
        ui.label(format!("• {}", line));
    }
}

fn section_header(ui: &mut egui::Ui, title: &str) {
    ui.label(RichText::new(title).strong());
    ui.separator();
}

fn render_file_selection(
    ui: &mut egui::Ui,
    model: &PanelModel<'_>,
    state: &mut PanelState,
    actions: &mut Vec<UiAction>,
) {
    ui.label("Selected WAV File:").on_hover_text(model.help.wav_path);
    ui.colored_label(ThemeColors::ACTIVE, model.anthem_name);

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.path_draft)
                .hint_text("Path to a .wav file")
                .desired_width(260.0),
        );
        let can_load = !state.path_draft.trim().is_empty();
        if ui.add_enabled(can_load, egui::Button::new("Load")).clicked() {
            actions.push(UiAction::LoadFile(state.path_draft.trim().to_string()));
            state.path_draft.clear();
        }
        if ui.button("Clear Selection").clicked() {
            actions.push(UiAction::ClearSelection);
        }
    });
}

fn render_binding_combo(
    ui: &mut egui::Ui,
    current: Binding,
    help: &str,
    actions: &mut Vec<UiAction>,
) {
    let mut selected = current;
    egui::ComboBox::from_label("Custom Anthems Keybind")
        .selected_text(selected.label())
        .show_ui(ui, |ui| {
            for option in Binding::options() {
                ui.selectable_value(&mut selected, option, option.label());
            }
        })
        .response
        .on_hover_text(help);

    if selected != current {
        actions.push(UiAction::SelectBinding(selected));
    }
}
