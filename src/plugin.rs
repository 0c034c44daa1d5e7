//! Plugin coordinator
//!
//! Holds one of each component and routes host callbacks to them. Every
//! host capability arrives through the constructor.

use crossbeam_channel::Receiver;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use crate::audio::{AnthemPlayer, AnthemSelection};
use crate::commands::{self, CommandError, ConsoleCommand};
use crate::config::{self, ConfigError, ConfigStore, Setting, SettingChange, SettingValue};
use crate::game::{
    is_local_goal, BallHit, EventCounter, GameEvent, GameStateQuery, GoalScored, BALL_HIT_HOOK,
    GOAL_SCORED_HOOK,
};
use crate::keybind::{Binding, FunctionKey, KeyBindController, KeyBindHost};
use crate::overlay::{CaptureIntent, FrameFlags, OverlayCommand, OverlayLifecycle, OverlayState};
use crate::ui::{self, PanelModel, PanelState, SettingHelp, UiAction};

pub const PLUGIN_NAME: &str = "Custom Player Anthems";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A window the host draws every frame
pub trait Renderable {
    fn menu_name(&self) -> &str;
    fn menu_title(&self) -> &str;

    /// Draw the window if open and report the flags the host reads back
    fn render(&mut self, ctx: &egui::Context) -> FrameFlags;

    fn is_active_overlay(&self) -> bool;
    fn should_block_input(&self) -> bool;

    /// The host opened the window itself
    fn on_open(&mut self);

    /// The host closed the window itself
    fn on_close(&mut self);
}

/// A panel inside the host's plugin settings
pub trait ConfigurableWindow {
    fn plugin_name(&self) -> &str;
    fn render_settings(&mut self, ui: &mut egui::Ui);
}

/// Register the plugin's settings on `config`
pub fn register_settings(config: &mut ConfigStore) -> Result<(), ConfigError> {
    config.register(
        config::ENABLED,
        true,
        true,
        "Enable/disable Custom Player Anthems",
    )?;
    config.register_validated(
        config::KEYBIND,
        Binding::Unbound.label(),
        true,
        "F-key to toggle Custom Player Anthems window",
        |raw| Binding::from_label(raw).is_some(),
    )?;
    config.register(config::FADE_OUT, true, true, "Fade the anthem out at the end")?;
    config.register(config::WAV_PATH, "", true, "Custom anthem WAV file")?;
    Ok(())
}

/// The Custom Player Anthems plugin
pub struct AnthemsPlugin<H> {
    config: ConfigStore,
    changes: Receiver<SettingChange>,
    keybind: KeyBindController<H>,
    overlay: OverlayLifecycle,
    counter: EventCounter,
    anthem: AnthemSelection,
    game: Box<dyn GameStateQuery>,
    player: Box<dyn AnthemPlayer>,
    panel: PanelState,
    status: String,
}

impl<H: KeyBindHost> AnthemsPlugin<H> {
    /// Load the plugin: register settings, restore the persisted binding and
    /// anthem selection.
    pub fn load(
        mut config: ConfigStore,
        host: H,
        game: Box<dyn GameStateQuery>,
        player: Box<dyn AnthemPlayer>,
    ) -> Result<Self, ConfigError> {
        register_settings(&mut config)?;
        let changes = config.subscribe();

        let stored_label = config.get_text(config::KEYBIND).unwrap_or_default().to_string();
        let initial_binding = Binding::from_label(&stored_label).unwrap_or_default();
        if stored_label != initial_binding.label() {
            config.set(config::KEYBIND, initial_binding.label())?;
        }
        let anthem = AnthemSelection::from_setting(config.get_text(config::WAV_PATH)?);

        let mut keybind = KeyBindController::new(host, commands::toggle_binding_command());
        keybind.initialize(initial_binding);

        info!("{} v{} loaded", PLUGIN_NAME, PLUGIN_VERSION);

        Ok(Self {
            config,
            changes,
            keybind,
            overlay: OverlayLifecycle::new(),
            counter: EventCounter::new(),
            anthem,
            game,
            player,
            panel: PanelState::default(),
            status: "Custom Player Anthems ready! Use 'anthems_toggle' to open the window."
                .to_string(),
        })
    }

    /// Hooks the plugin subscribes to once at startup
    pub fn hooked_events() -> [&'static str; 2] {
        [GOAL_SCORED_HOOK, BALL_HIT_HOOK]
    }

    /// Release host resources before the plugin is dropped
    pub fn unload(&mut self) {
        self.player.stop();
        self.keybind.release();
        info!("{} unloaded", PLUGIN_NAME);
    }

    pub fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::GoalScored(goal) => self.on_goal_scored(goal),
            GameEvent::BallHit(hit) => self.on_ball_hit(hit),
        }
    }

    fn on_goal_scored(&mut self, goal: GoalScored) {
        if !self.enabled() {
            return;
        }

        if is_local_goal(&goal, self.game.as_ref()) {
            info!("Local player scored");
            self.counter.on_qualifying_event(&self.config);
            if self.play_anthem() {
                self.status = "Custom anthem played for your goal!".to_string();
            }
        } else {
            info!("Goal scored by another player, no custom anthem");
            self.status = "Goal scored by other player".to_string();
        }
    }

    fn on_ball_hit(&mut self, hit: BallHit) {
        if !self.enabled() {
            return;
        }
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        match hit.by {
            Some(player) => info!("Ball hit by {}", player),
            None => info!("Ball hit detected"),
        }
        self.status = format!("Ball hit at {}", now);
    }

    /// A host key was pressed; toggles the overlay if it is our binding
    pub fn on_key_pressed(&mut self, key: FunctionKey) -> bool {
        if self.keybind.resolve(key).is_none() {
            return false;
        }
        self.overlay.toggle();
        true
    }

    /// Run a console command
    pub fn execute_command(&mut self, line: &str) -> Result<(), CommandError> {
        let command = commands::parse_command(line).inspect_err(|e| {
            warn!("Console command failed: {}", e);
        })?;

        match command {
            ConsoleCommand::Overlay(command) => {
                self.overlay.apply(command);
                info!("{} window {:?} command executed", PLUGIN_NAME, command);
            }
            ConsoleCommand::ResetCounter => self.reset_counter(),
            ConsoleCommand::Set { name, value } => {
                if let Err(e) = self.config.set_from_str(&name, &value) {
                    self.status = format!("Could not set {}: {}", name, e);
                    return Err(e.into());
                }
                self.sync_settings();
            }
        }
        Ok(())
    }

    /// Route pending setting changes to the components that own them
    pub fn sync_settings(&mut self) {
        while let Ok(change) = self.changes.try_recv() {
            self.apply_change(change);
        }
    }

    fn apply_change(&mut self, change: SettingChange) {
        match change.name.as_str() {
            config::KEYBIND => {
                let old = label_binding(&change.old);
                let new = label_binding(&change.new);
                self.keybind.on_binding_changed(old, new);
                self.status = self.keybind.status().to_string();

                // Store the canonical label so "f7" or "" never stays persisted
                if change.new.as_text() != Some(new.label()) {
                    if let Err(e) = self.config.set(config::KEYBIND, new.label()) {
                        warn!("Failed to normalize keybind label: {}", e);
                    }
                }
            }
            config::ENABLED => {
                let enabled = change.new.as_bool().unwrap_or(false);
                self.status = if enabled {
                    "Custom anthems enabled".to_string()
                } else {
                    "Custom anthems disabled".to_string()
                };
            }
            config::FADE_OUT => {
                let fade = change.new.as_bool().unwrap_or(false);
                self.status = if fade {
                    "Fade out enabled".to_string()
                } else {
                    "Fade out disabled".to_string()
                };
            }
            config::WAV_PATH => {
                self.anthem = AnthemSelection::from_setting(change.new.as_text().unwrap_or(""));
                self.status = if self.anthem.is_selected() {
                    format!("Loaded custom anthem: {}", self.anthem.display_name())
                } else {
                    "WAV file selection cleared".to_string()
                };
            }
            _ => {}
        }
    }

    /// Start a render pass: apply pending changes and recompute input blocking
    pub fn frame(&mut self, intent: CaptureIntent) -> FrameFlags {
        self.sync_settings();
        self.overlay.begin_frame(intent)
    }

    pub fn toggle(&mut self) -> OverlayState {
        self.overlay.toggle()
    }

    pub fn show(&mut self) -> OverlayState {
        self.overlay.show()
    }

    pub fn hide(&mut self) -> OverlayState {
        self.overlay.hide()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.write_setting(config::ENABLED, enabled.into());
    }

    pub fn set_fade_out(&mut self, fade_out: bool) {
        self.write_setting(config::FADE_OUT, fade_out.into());
    }

    pub fn select_binding(&mut self, binding: Binding) {
        self.write_setting(config::KEYBIND, binding.label().into());
    }

    /// Select the anthem file at `path`
    pub fn load_wav_file(&mut self, path: &str) {
        info!("Loading WAV file: {}", path);
        self.write_setting(config::WAV_PATH, path.trim().into());
    }

    pub fn clear_selection(&mut self) {
        self.write_setting(config::WAV_PATH, "".into());
    }

    pub fn reset_counter(&mut self) {
        self.counter.reset();
        self.status = "Goal counter reset".to_string();
    }

    /// Play the anthem on demand
    pub fn test_anthem(&mut self) {
        if self.enabled() {
            self.play_anthem();
        } else {
            self.status = "Enable custom anthems first!".to_string();
        }
    }

    fn play_anthem(&mut self) -> bool {
        let Some(path) = self.anthem.path() else {
            info!("No custom anthem file selected");
            self.status = "No custom anthem file selected".to_string();
            return false;
        };

        let fade_out = self.config.get_bool(config::FADE_OUT).unwrap_or(false);
        info!("Playing custom anthem: {}", path.display());
        match self.player.play(path, fade_out) {
            Ok(()) => {
                self.status = format!("Playing custom anthem: {}", self.anthem.display_name());
                true
            }
            Err(e) => {
                warn!("Failed to play {}: {:#}", path.display(), e);
                self.status = format!("Could not play {}: {}", self.anthem.display_name(), e);
                false
            }
        }
    }

    fn write_setting(&mut self, name: &str, value: SettingValue) {
        match self.config.set(name, value) {
            Ok(()) => self.sync_settings(),
            Err(e) => {
                warn!("Failed to update {}: {}", name, e);
                self.status = format!("Could not update {}: {}", name, e);
            }
        }
    }

    fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::SetEnabled(enabled) => self.set_enabled(enabled),
                UiAction::SetFadeOut(fade_out) => self.set_fade_out(fade_out),
                UiAction::SelectBinding(binding) => self.select_binding(binding),
                UiAction::LoadFile(path) => self.load_wav_file(&path),
                UiAction::ClearSelection => self.clear_selection(),
                UiAction::ResetCounter => self.reset_counter(),
                UiAction::TestAnthem => self.test_anthem(),
                UiAction::ToggleWindow => {
                    self.overlay.apply(OverlayCommand::Toggle);
                }
            }
        }
    }

    fn model(&self) -> PanelModel<'_> {
        PanelModel {
            enabled: self.enabled(),
            fade_out: self.config.get_bool(config::FADE_OUT).unwrap_or(false),
            binding: self.keybind.current_binding(),
            anthem_name: self.anthem.display_name(),
            goal_count: self.counter.count(),
            status: &self.status,
            window: self.overlay.state(),
            version: PLUGIN_VERSION,
            help: SettingHelp {
                enabled: self.describe(config::ENABLED),
                keybind: self.describe(config::KEYBIND),
                fade_out: self.describe(config::FADE_OUT),
                wav_path: self.describe(config::WAV_PATH),
            },
        }
    }

    fn describe(&self, name: &str) -> &str {
        self.config
            .setting(name)
            .map(Setting::description)
            .unwrap_or_default()
    }

    fn enabled(&self) -> bool {
        self.config.get_bool(config::ENABLED).unwrap_or(false)
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn keybind(&self) -> &KeyBindController<H> {
        &self.keybind
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.keybind.host_mut()
    }

    pub fn overlay(&self) -> &OverlayLifecycle {
        &self.overlay
    }

    pub fn goal_count(&self) -> u64 {
        self.counter.count()
    }

    pub fn anthem(&self) -> &AnthemSelection {
        &self.anthem
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

fn label_binding(value: &SettingValue) -> Binding {
    value
        .as_text()
        .and_then(Binding::from_label)
        .unwrap_or_default()
}

impl<H: KeyBindHost> Renderable for AnthemsPlugin<H> {
    fn menu_name(&self) -> &str {
        self.overlay.menu_name()
    }

    fn menu_title(&self) -> &str {
        self.overlay.menu_title()
    }

    fn render(&mut self, ctx: &egui::Context) -> FrameFlags {
        self.sync_settings();

        let mut actions = Vec::new();
        if self.overlay.is_open() {
            let mut open = true;
            ui::render_overlay_window(ctx, &self.model(), &mut open, &mut actions);
            if !open {
                self.overlay.notify_host_closed();
            }
        }
        self.apply_actions(actions);

        let intent = CaptureIntent {
            wants_mouse: ctx.wants_pointer_input(),
            wants_keyboard: ctx.wants_keyboard_input(),
        };
        self.overlay.begin_frame(intent)
    }

    fn is_active_overlay(&self) -> bool {
        self.overlay.is_open()
    }

    fn should_block_input(&self) -> bool {
        self.overlay.should_block_input()
    }

    fn on_open(&mut self) {
        self.overlay.notify_host_opened();
    }

    fn on_close(&mut self) {
        self.overlay.notify_host_closed();
    }
}

impl<H: KeyBindHost> ConfigurableWindow for AnthemsPlugin<H> {
    fn plugin_name(&self) -> &str {
        PLUGIN_NAME
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        self.sync_settings();

        let mut actions = Vec::new();
        let mut panel = std::mem::take(&mut self.panel);
        ui::render_settings_panel(ui, &self.model(), &mut panel, &mut actions);
        self.panel = panel;

        self.apply_actions(actions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryBackend;
    use crate::game::PlayerId;
    use crate::keybind::{HostCall, KeyTable};
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    const LOCAL: PlayerId = PlayerId(1);
    const OPPONENT: PlayerId = PlayerId(2);

    struct FixedGame;

    impl GameStateQuery for FixedGame {
        fn is_in_game(&self) -> bool {
            true
        }

        fn local_player(&self) -> Option<PlayerId> {
            Some(LOCAL)
        }
    }

    struct BrokenPlayer;

    impl AnthemPlayer for BrokenPlayer {
        fn play(&mut self, _path: &Path, _fade_out: bool) -> anyhow::Result<()> {
            anyhow::bail!("device lost")
        }

        fn stop(&mut self) {}
    }

    #[derive(Clone, Default)]
    struct RecordingPlayer {
        played: Rc<RefCell<Vec<(PathBuf, bool)>>>,
    }

    impl AnthemPlayer for RecordingPlayer {
        fn play(&mut self, path: &Path, fade_out: bool) -> anyhow::Result<()> {
            self.played.borrow_mut().push((path.to_path_buf(), fade_out));
            Ok(())
        }

        fn stop(&mut self) {}
    }

    fn plugin_with(backend: MemoryBackend) -> (AnthemsPlugin<KeyTable>, RecordingPlayer) {
        let player = RecordingPlayer::default();
        let plugin = AnthemsPlugin::load(
            ConfigStore::open(backend),
            KeyTable::new(),
            Box::new(FixedGame),
            Box::new(player.clone()),
        )
        .unwrap();
        (plugin, player)
    }

    fn plugin() -> (AnthemsPlugin<KeyTable>, RecordingPlayer) {
        plugin_with(MemoryBackend::new())
    }

    fn goal_by(player: PlayerId) -> GameEvent {
        GameEvent::GoalScored(GoalScored {
            scorer: Some(player),
            team: Some(0),
        })
    }

    fn toggle() -> String {
        commands::toggle_binding_command()
    }

    #[test]
    fn test_load_uses_defaults() {
        let (plugin, _) = plugin();
        assert!(plugin.enabled());
        assert_eq!(plugin.keybind().current_binding(), Binding::Unbound);
        assert_eq!(plugin.overlay().state(), OverlayState::Closed);
        assert_eq!(plugin.anthem().display_name(), crate::audio::NO_FILE_SELECTED);
        assert!(plugin.keybind().host().calls().is_empty());
    }

    #[test]
    fn test_load_restores_persisted_binding() {
        let backend = MemoryBackend::with_values([(config::KEYBIND, "F8")]);
        let (plugin, _) = plugin_with(backend);
        assert_eq!(plugin.keybind().current_binding_label(), "F8");
        assert_eq!(plugin.keybind().host().command_for(FunctionKey::F8), Some(toggle().as_str()));
    }

    #[test]
    fn test_binding_none_to_f7() {
        let (mut plugin, _) = plugin();
        plugin.select_binding(Binding::Key(FunctionKey::F7));

        assert_eq!(
            plugin.keybind().host().calls(),
            &[HostCall::Bind(FunctionKey::F7, toggle())]
        );
        assert_eq!(plugin.keybind().current_binding_label(), "F7");
        assert_eq!(plugin.config().get_text(config::KEYBIND).unwrap(), "F7");
    }

    #[test]
    fn test_binding_f7_to_f9_to_none() {
        let (mut plugin, _) = plugin();
        plugin.select_binding(Binding::Key(FunctionKey::F7));
        plugin.host_mut().clear_calls();

        plugin.select_binding(Binding::Key(FunctionKey::F9));
        assert_eq!(
            plugin.keybind().host().calls(),
            &[
                HostCall::Unbind(FunctionKey::F7),
                HostCall::Bind(FunctionKey::F9, toggle()),
            ]
        );
        assert_eq!(plugin.keybind().current_binding_label(), "F9");
        plugin.host_mut().clear_calls();

        plugin.select_binding(Binding::Unbound);
        assert_eq!(plugin.keybind().host().calls(), &[HostCall::Unbind(FunctionKey::F9)]);
        assert_eq!(plugin.keybind().current_binding_label(), "None");
        assert_eq!(plugin.keybind().host().mappings_to(&toggle()), 0);
    }

    #[test]
    fn test_bound_key_toggles_overlay() {
        let (mut plugin, _) = plugin();
        plugin.select_binding(Binding::Key(FunctionKey::F7));

        assert!(!plugin.on_key_pressed(FunctionKey::F9));
        assert_eq!(plugin.overlay().state(), OverlayState::Closed);

        assert!(plugin.on_key_pressed(FunctionKey::F7));
        assert_eq!(plugin.overlay().state(), OverlayState::Open);
        assert!(plugin.on_key_pressed(FunctionKey::F7));
        assert_eq!(plugin.overlay().state(), OverlayState::Closed);
    }

    #[test]
    fn test_console_set_of_keybind_reaches_host() {
        let (mut plugin, _) = plugin();
        plugin.execute_command("anthems_set anthems_keybind F10").unwrap();
        assert_eq!(plugin.keybind().current_binding_label(), "F10");
        assert_eq!(plugin.keybind().host().mappings_to(&toggle()), 1);
    }

    #[test]
    fn test_console_set_of_keybind_stores_canonical_label() {
        let backend = MemoryBackend::new();
        let (mut plugin, _) = plugin_with(backend.clone());

        plugin.execute_command("anthems_set anthems_keybind f7").unwrap();
        assert_eq!(plugin.keybind().current_binding_label(), "F7");
        assert_eq!(plugin.config().get_text(config::KEYBIND).unwrap(), "F7");
        assert_eq!(backend.value(config::KEYBIND).as_deref(), Some("F7"));
        assert_eq!(
            plugin.keybind().host().calls(),
            &[HostCall::Bind(FunctionKey::F7, toggle())]
        );
    }

    #[test]
    fn test_empty_keybind_label_is_stored_as_none() {
        let backend = MemoryBackend::new();
        let (mut plugin, _) = plugin_with(backend.clone());
        plugin.select_binding(Binding::Key(FunctionKey::F4));

        plugin.write_setting(config::KEYBIND, "".into());
        assert_eq!(plugin.keybind().current_binding(), Binding::Unbound);
        assert_eq!(plugin.config().get_text(config::KEYBIND).unwrap(), "None");
        assert_eq!(backend.value(config::KEYBIND).as_deref(), Some("None"));
        assert_eq!(plugin.keybind().host().mappings_to(&toggle()), 0);
    }

    #[test]
    fn test_load_normalizes_persisted_label() {
        let backend = MemoryBackend::with_values([(config::KEYBIND, "f8")]);
        let (plugin, _) = plugin_with(backend.clone());
        assert_eq!(plugin.config().get_text(config::KEYBIND).unwrap(), "F8");
        assert_eq!(backend.value(config::KEYBIND).as_deref(), Some("F8"));
        assert_eq!(plugin.keybind().host().mappings_to(&toggle()), 1);
    }

    #[test]
    fn test_console_set_rejects_bad_values() {
        let (mut plugin, _) = plugin();
        let result = plugin.execute_command("anthems_set anthems_keybind F2");
        assert!(matches!(result, Err(CommandError::Config(ConfigError::InvalidValue { .. }))));
        assert_eq!(plugin.keybind().current_binding(), Binding::Unbound);

        let result = plugin.execute_command("anthems_set anthems_volume 3");
        assert!(matches!(result, Err(CommandError::Config(ConfigError::UnknownSetting(_)))));
        assert!(plugin.status().starts_with("Could not set anthems_volume"));
    }

    #[test]
    fn test_console_commands_drive_lifecycle() {
        let (mut plugin, _) = plugin();
        plugin.execute_command("anthems_show").unwrap();
        assert_eq!(plugin.overlay().state(), OverlayState::Open);
        plugin.execute_command("anthems_show").unwrap();
        assert_eq!(plugin.overlay().state(), OverlayState::Open);
        plugin.execute_command(&toggle()).unwrap();
        assert_eq!(plugin.overlay().state(), OverlayState::Closed);
        plugin.execute_command("anthems_toggle").unwrap();
        plugin.execute_command("anthems_hide").unwrap();
        assert_eq!(plugin.overlay().state(), OverlayState::Closed);
    }

    #[test]
    fn test_local_goal_counts_and_plays() {
        let (mut plugin, player) = plugin();
        plugin.load_wav_file("/music/goal.wav");

        plugin.on_event(goal_by(LOCAL));

        assert_eq!(plugin.goal_count(), 1);
        assert_eq!(
            player.played.borrow().as_slice(),
            &[(PathBuf::from("/music/goal.wav"), true)]
        );
        assert_eq!(plugin.status(), "Custom anthem played for your goal!");
    }

    #[test]
    fn test_other_players_goal_is_ignored() {
        let (mut plugin, player) = plugin();
        plugin.load_wav_file("/music/goal.wav");

        plugin.on_event(goal_by(OPPONENT));
        plugin.on_event(GameEvent::GoalScored(GoalScored::default()));

        assert_eq!(plugin.goal_count(), 0);
        assert!(player.played.borrow().is_empty());
        assert_eq!(plugin.status(), "Goal scored by other player");
    }

    #[test]
    fn test_disabled_plugin_ignores_goals() {
        let (mut plugin, player) = plugin();
        plugin.load_wav_file("/music/goal.wav");
        plugin.set_enabled(false);

        plugin.on_event(goal_by(LOCAL));

        assert_eq!(plugin.goal_count(), 0);
        assert!(player.played.borrow().is_empty());
    }

    #[test]
    fn test_local_goal_without_file_still_counts() {
        let (mut plugin, player) = plugin();
        plugin.on_event(goal_by(LOCAL));
        assert_eq!(plugin.goal_count(), 1);
        assert!(player.played.borrow().is_empty());
        assert_eq!(plugin.status(), "No custom anthem file selected");
    }

    #[test]
    fn test_fade_out_setting_is_passed_to_player() {
        let (mut plugin, player) = plugin();
        plugin.load_wav_file("anthem.wav");
        plugin.set_fade_out(false);
        plugin.test_anthem();
        assert_eq!(player.played.borrow()[0], (PathBuf::from("anthem.wav"), false));
    }

    #[test]
    fn test_test_anthem_requires_enabled() {
        let (mut plugin, player) = plugin();
        plugin.load_wav_file("anthem.wav");
        plugin.set_enabled(false);
        plugin.test_anthem();
        assert!(player.played.borrow().is_empty());
        assert_eq!(plugin.status(), "Enable custom anthems first!");
    }

    #[test]
    fn test_reset_counter_command() {
        let (mut plugin, _) = plugin();
        plugin.on_event(goal_by(LOCAL));
        plugin.on_event(goal_by(LOCAL));
        plugin.set_enabled(false);
        plugin.execute_command("anthems_reset_counter").unwrap();
        assert_eq!(plugin.goal_count(), 0);
    }

    #[test]
    fn test_ball_hit_updates_status_when_enabled() {
        let (mut plugin, _) = plugin();
        plugin.on_event(GameEvent::BallHit(BallHit { by: Some(LOCAL) }));
        assert!(plugin.status().starts_with("Ball hit at "));
        assert_eq!(plugin.goal_count(), 0);
    }

    #[test]
    fn test_ball_hit_ignored_when_disabled() {
        let (mut plugin, _) = plugin();
        plugin.set_enabled(false);
        let before = plugin.status().to_string();

        plugin.on_event(GameEvent::BallHit(BallHit { by: Some(LOCAL) }));
        assert_eq!(plugin.status(), before);
    }

    #[test]
    fn test_playback_failure_reported_in_status() {
        let mut plugin = AnthemsPlugin::load(
            ConfigStore::open(MemoryBackend::new()),
            KeyTable::new(),
            Box::new(FixedGame),
            Box::new(BrokenPlayer),
        )
        .unwrap();
        plugin.load_wav_file("/music/goal.wav");

        plugin.on_event(goal_by(LOCAL));
        assert_eq!(plugin.goal_count(), 1);
        assert_eq!(plugin.status(), "Could not play goal.wav: device lost");

        plugin.test_anthem();
        assert_eq!(plugin.status(), "Could not play goal.wav: device lost");
    }

    #[test]
    fn test_clear_selection() {
        let (mut plugin, _) = plugin();
        plugin.load_wav_file("C:\\anthems\\siu.wav");
        assert_eq!(plugin.anthem().display_name(), "siu.wav");
        assert_eq!(plugin.status(), "Loaded custom anthem: siu.wav");

        plugin.clear_selection();
        assert!(!plugin.anthem().is_selected());
        assert_eq!(plugin.status(), "WAV file selection cleared");
    }

    #[test]
    fn test_frame_blocks_input_only_when_open() {
        let (mut plugin, _) = plugin();
        let intent = CaptureIntent {
            wants_mouse: true,
            wants_keyboard: false,
        };
        assert_eq!(plugin.frame(intent), FrameFlags { open: false, block_input: false });

        plugin.toggle();
        assert_eq!(plugin.frame(intent), FrameFlags { open: true, block_input: true });
        assert!(!plugin.frame(CaptureIntent::default()).block_input);
    }

    #[test]
    fn test_host_close_without_hide() {
        let (mut plugin, _) = plugin();
        plugin.show();
        plugin.on_close();
        assert_eq!(plugin.overlay().state(), OverlayState::Closed);
        assert!(!plugin.is_active_overlay());
    }

    #[test]
    fn test_ui_actions_write_through_config() {
        let backend = MemoryBackend::new();
        let (mut plugin, _) = plugin_with(backend.clone());

        plugin.apply_actions(vec![
            UiAction::SetEnabled(false),
            UiAction::SelectBinding(Binding::Key(FunctionKey::F3)),
            UiAction::LoadFile("goal.wav".to_string()),
            UiAction::ToggleWindow,
        ]);

        assert_eq!(backend.value(config::ENABLED).as_deref(), Some("0"));
        assert_eq!(backend.value(config::KEYBIND).as_deref(), Some("F3"));
        assert_eq!(backend.value(config::WAV_PATH).as_deref(), Some("goal.wav"));
        assert_eq!(plugin.keybind().current_binding_label(), "F3");
        assert!(plugin.overlay().is_open());
    }

    #[test]
    fn test_render_reports_window_state() {
        let (mut plugin, _) = plugin();
        let ctx = egui::Context::default();

        let mut flags = FrameFlags::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            flags = plugin.render(ctx);
        });
        assert!(!flags.open);

        plugin.show();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            flags = plugin.render(ctx);
        });
        assert!(flags.open);
        assert_eq!(plugin.overlay().state(), OverlayState::Open);
    }

    #[test]
    fn test_render_settings_without_interaction_changes_nothing() {
        let backend = MemoryBackend::new();
        let (mut plugin, _) = plugin_with(backend.clone());
        let ctx = egui::Context::default();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                plugin.render_settings(ui);
            });
        });

        assert_eq!(backend.save_count(), 0);
        assert_eq!(plugin.plugin_name(), PLUGIN_NAME);
    }

    #[test]
    fn test_unload_releases_binding() {
        let (mut plugin, _) = plugin();
        plugin.select_binding(Binding::Key(FunctionKey::F11));
        plugin.unload();
        assert_eq!(plugin.keybind().host().mappings_to(&toggle()), 0);
    }

    #[test]
    fn test_panel_model_carries_setting_help() {
        let (plugin, _) = plugin();
        let help = plugin.model().help;
        assert_eq!(help.enabled, "Enable/disable Custom Player Anthems");
        assert_eq!(help.keybind, "F-key to toggle Custom Player Anthems window");
        assert_eq!(help.wav_path, "Custom anthem WAV file");
    }

    #[test]
    fn test_hooked_events() {
        let hooks = AnthemsPlugin::<KeyTable>::hooked_events();
        assert!(hooks.contains(&GOAL_SCORED_HOOK));
        assert!(hooks.contains(&BALL_HIT_HOOK));
    }
}
