//! Desktop host
//!
//! An eframe window standing in for the game: it owns the key table,
//! delivers key presses and simulated game events, runs console commands and
//! drives the plugin's render pass.

use eframe::egui;
use egui::RichText;
use tracing::{info, warn};

use crate::commands;
use crate::game::{BallHit, GameEvent, GameStateQuery, GoalScored, PlayerId};
use crate::hotkey::GlobalHotkeyHost;
use crate::keybind::{BindError, FunctionKey, KeyBindHost, KeyTable};
use crate::overlay::FrameFlags;
use crate::plugin::{AnthemsPlugin, ConfigurableWindow, Renderable};

/// Player controlled by this client in the simulated match
pub const LOCAL_PLAYER: PlayerId = PlayerId(1);
/// Opponent in the simulated match
pub const OPPONENT: PlayerId = PlayerId(2);

/// Simulated match: always in game, local player known
#[derive(Debug, Default)]
pub struct SimulatedMatch;

impl GameStateQuery for SimulatedMatch {
    fn is_in_game(&self) -> bool {
        true
    }

    fn local_player(&self) -> Option<PlayerId> {
        Some(LOCAL_PLAYER)
    }
}

/// Key table used by the desktop host
pub enum DesktopKeys {
    /// Keys only work while the window has focus
    Window(KeyTable),
    /// Keys work system-wide
    Global(GlobalHotkeyHost),
}

impl DesktopKeys {
    /// Global hotkeys when available, window keys otherwise
    pub fn detect(use_global: bool) -> Self {
        if !use_global {
            return DesktopKeys::Window(KeyTable::new());
        }
        match GlobalHotkeyHost::new() {
            Ok(host) => DesktopKeys::Global(host),
            Err(e) => {
                warn!("Global hotkeys unavailable, using window keys: {:#}", e);
                DesktopKeys::Window(KeyTable::new())
            }
        }
    }

    /// Commands triggered this frame
    fn pressed_commands(&self, ctx: &egui::Context) -> Vec<String> {
        match self {
            DesktopKeys::Window(table) => FunctionKey::ALL
                .into_iter()
                .filter(|key| ctx.input(|i| i.key_pressed(egui_key(*key))))
                .filter_map(|key| table.command_for(key).map(str::to_string))
                .collect(),
            DesktopKeys::Global(host) => host.poll_commands(),
        }
    }

    fn bound_keys(&self) -> Vec<(FunctionKey, String)> {
        let lookup = |key: FunctionKey| match self {
            DesktopKeys::Window(table) => table.command_for(key).map(str::to_string),
            DesktopKeys::Global(host) => host.command_for(key).map(str::to_string),
        };
        FunctionKey::ALL
            .into_iter()
            .filter_map(|key| lookup(key).map(|command| (key, command)))
            .collect()
    }
}

impl KeyBindHost for DesktopKeys {
    fn bind(&mut self, key: FunctionKey, command: &str) -> Result<(), BindError> {
        match self {
            DesktopKeys::Window(table) => table.bind(key, command),
            DesktopKeys::Global(host) => host.bind(key, command),
        }
    }

    fn unbind(&mut self, key: FunctionKey) -> Result<(), BindError> {
        match self {
            DesktopKeys::Window(table) => table.unbind(key),
            DesktopKeys::Global(host) => host.unbind(key),
        }
    }
}

fn egui_key(key: FunctionKey) -> egui::Key {
    match key {
        FunctionKey::F1 => egui::Key::F1,
        FunctionKey::F3 => egui::Key::F3,
        FunctionKey::F4 => egui::Key::F4,
        FunctionKey::F5 => egui::Key::F5,
        FunctionKey::F7 => egui::Key::F7,
        FunctionKey::F8 => egui::Key::F8,
        FunctionKey::F9 => egui::Key::F9,
        FunctionKey::F10 => egui::Key::F10,
        FunctionKey::F11 => egui::Key::F11,
        FunctionKey::F12 => egui::Key::F12,
    }
}

/// The desktop host application
pub struct DesktopHost {
    plugin: AnthemsPlugin<DesktopKeys>,
    console_input: String,
    console_log: Vec<String>,
    last_flags: FrameFlags,
}

impl DesktopHost {
    pub fn new(plugin: AnthemsPlugin<DesktopKeys>) -> Self {
        for hook in AnthemsPlugin::<DesktopKeys>::hooked_events() {
            info!("Hooked event: {}", hook);
        }
        Self {
            plugin,
            console_input: String::new(),
            console_log: Vec::new(),
            last_flags: FrameFlags::default(),
        }
    }

    /// Create eframe options for the host window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1000.0, 700.0])
                .with_min_inner_size([700.0, 450.0])
                .with_title("Custom Player Anthems - Desktop Host"),
            ..Default::default()
        }
    }

    fn run_command(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let entry = match self.plugin.execute_command(line) {
            Ok(()) => format!("> {}", line),
            Err(e) => format!("> {}  ({})", line, e),
        };
        self.console_log.push(entry);
    }

    fn render_host_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("Host").strong());
        ui.separator();

        ui.label("Simulate events");
        if ui.button("Local player scores").clicked() {
            self.plugin.on_event(GameEvent::GoalScored(GoalScored {
                scorer: Some(LOCAL_PLAYER),
                team: Some(0),
            }));
        }
        if ui.button("Opponent scores").clicked() {
            self.plugin.on_event(GameEvent::GoalScored(GoalScored {
                scorer: Some(OPPONENT),
                team: Some(1),
            }));
        }
        if ui.button("Ball hit").clicked() {
            self.plugin.on_event(GameEvent::BallHit(BallHit {
                by: Some(LOCAL_PLAYER),
            }));
        }

        ui.add_space(12.0);
        ui.label("Window flags (last frame)");
        ui.label(format!("Open: {}", self.last_flags.open));
        ui.label(format!("Block input: {}", self.last_flags.block_input));

        ui.add_space(12.0);
        ui.label("Key bindings");
        let bound = self.plugin.keybind().host().bound_keys();
        if bound.is_empty() {
            ui.label("(none)");
        }
        for (key, command) in bound {
            ui.monospace(format!("{} -> {}", key, command));
        }

        ui.add_space(12.0);
        ui.label("Console");
        let response = ui.text_edit_singleline(&mut self.console_input);
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if submitted || ui.button("Run").clicked() {
            let line = std::mem::take(&mut self.console_input);
            self.run_command(&line);
        }
        for entry in self.console_log.iter().rev().take(8) {
            ui.monospace(entry);
        }

        ui.add_space(12.0);
        ui.collapsing("Commands", |ui| {
            for (name, help) in commands::registered_commands() {
                ui.label(format!("{}: {}", name, help));
            }
        });
    }
}

impl eframe::App for DesktopHost {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Key presses go through whatever command the host has bound to them
        let pressed = self.plugin.keybind().host().pressed_commands(ctx);
        for command in pressed {
            self.run_command(&command);
        }

        egui::SidePanel::left("host")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                self.render_host_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.plugin.render_settings(ui);
            });
        });

        self.last_flags = self.plugin.render(ctx);

        if matches!(self.plugin.keybind().host(), DesktopKeys::Global(_)) {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

impl Drop for DesktopHost {
    fn drop(&mut self) {
        self.plugin.unload();
    }
}
