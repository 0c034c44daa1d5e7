//! Console commands exposed to the host

use thiserror::Error;

use crate::config::ConfigError;
use crate::overlay::{OverlayCommand, MENU_NAME};

pub const TOGGLE_COMMAND: &str = "anthems_toggle";
pub const SHOW_COMMAND: &str = "anthems_show";
pub const HIDE_COMMAND: &str = "anthems_hide";
pub const RESET_COUNTER_COMMAND: &str = "anthems_reset_counter";
pub const SET_COMMAND: &str = "anthems_set";

/// Host command that opens or closes a menu by name
pub const TOGGLEMENU: &str = "togglemenu";

/// Command the toggle key is bound to. Never changes, or bindings stored by
/// the host would point at nothing.
pub fn toggle_binding_command() -> String {
    format!("{} {}", TOGGLEMENU, MENU_NAME)
}

/// Console commands understood by the plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Overlay(OverlayCommand),
    ResetCounter,
    Set { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Every command name the plugin registers, with its help text
pub fn registered_commands() -> [(&'static str, &'static str); 5] {
    [
        (TOGGLE_COMMAND, "Toggle Custom Player Anthems window"),
        (SHOW_COMMAND, "Show Custom Player Anthems window"),
        (HIDE_COMMAND, "Hide Custom Player Anthems window"),
        (RESET_COUNTER_COMMAND, "Reset the goal counter"),
        (SET_COMMAND, "Change a Custom Player Anthems setting"),
    ]
}

/// Parse a console line
pub fn parse_command(line: &str) -> Result<ConsoleCommand, CommandError> {
    let line = line.trim();
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim_start()))
        .unwrap_or((line, ""));
    if name.is_empty() {
        return Err(CommandError::Empty);
    }
    let args: Vec<&str> = rest.split_whitespace().collect();

    match name {
        TOGGLE_COMMAND => Ok(ConsoleCommand::Overlay(OverlayCommand::Toggle)),
        SHOW_COMMAND => Ok(ConsoleCommand::Overlay(OverlayCommand::Show)),
        HIDE_COMMAND => Ok(ConsoleCommand::Overlay(OverlayCommand::Hide)),
        RESET_COUNTER_COMMAND => Ok(ConsoleCommand::ResetCounter),
        TOGGLEMENU => match args.as_slice() {
            [menu] if *menu == MENU_NAME => Ok(ConsoleCommand::Overlay(OverlayCommand::Toggle)),
            [_] => Err(CommandError::Unknown(line.trim().to_string())),
            _ => Err(CommandError::Usage("togglemenu <menu>")),
        },
        SET_COMMAND => match rest.split_once(char::is_whitespace) {
            // Everything after the setting name is the value, spacing included
            Some((setting, value)) if !value.trim().is_empty() => Ok(ConsoleCommand::Set {
                name: setting.to_string(),
                value: value.trim_start().to_string(),
            }),
            _ => Err(CommandError::Usage("anthems_set <setting> <value>")),
        },
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
