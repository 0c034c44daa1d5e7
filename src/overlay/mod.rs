//! Overlay window lifecycle
//!
//! Decides whether the overlay window is open and whether it should swallow
//! the host's input this frame. Drawing is done elsewhere; this module only
//! owns the state the host reads back.

use tracing::{debug, info};

/// Internal menu identifier the host uses for this window
pub const MENU_NAME: &str = "customplayeranthems";

/// Title shown on the overlay window
pub const MENU_TITLE: &str = "Custom Player Anthems";

/// Whether the overlay window is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

impl OverlayState {
    pub fn is_open(&self) -> bool {
        matches!(self, OverlayState::Open)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OverlayState::Closed => "CLOSED",
            OverlayState::Open => "OPEN",
        }
    }
}

/// Explicit requests to change overlay visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCommand {
    Toggle,
    Show,
    Hide,
}

/// What the host GUI layer wants to capture this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureIntent {
    pub wants_mouse: bool,
    pub wants_keyboard: bool,
}

impl CaptureIntent {
    pub fn any(&self) -> bool {
        self.wants_mouse || self.wants_keyboard
    }
}

/// Flags the host reads back after a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameFlags {
    pub open: bool,
    pub block_input: bool,
}

/// Owner of the overlay's open/closed state
#[derive(Debug, Default)]
pub struct OverlayLifecycle {
    state: OverlayState,
    block_input: bool,
}

impl OverlayLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Input blocking computed by the last frame
    pub fn should_block_input(&self) -> bool {
        self.block_input
    }

    pub fn menu_name(&self) -> &'static str {
        MENU_NAME
    }

    pub fn menu_title(&self) -> &'static str {
        MENU_TITLE
    }

    /// Flip between open and closed
    pub fn toggle(&mut self) -> OverlayState {
        let next = match self.state {
            OverlayState::Closed => OverlayState::Open,
            OverlayState::Open => OverlayState::Closed,
        };
        self.transition(next, "toggle");
        self.state
    }

    pub fn show(&mut self) -> OverlayState {
        self.transition(OverlayState::Open, "show");
        self.state
    }

    pub fn hide(&mut self) -> OverlayState {
        self.transition(OverlayState::Closed, "hide");
        self.state
    }

    pub fn apply(&mut self, command: OverlayCommand) -> OverlayState {
        match command {
            OverlayCommand::Toggle => self.toggle(),
            OverlayCommand::Show => self.show(),
            OverlayCommand::Hide => self.hide(),
        }
    }

    /// The host opened the window on its own
    pub fn notify_host_opened(&mut self) {
        self.transition(OverlayState::Open, "host opened");
    }

    /// The host closed the window on its own, e.g. through the close box
    pub fn notify_host_closed(&mut self) {
        self.transition(OverlayState::Closed, "host closed");
    }

    /// Recompute input blocking for a new frame.
    ///
    /// Capture intent changes from frame to frame, so nothing is carried over
    /// from the previous one.
    pub fn begin_frame(&mut self, intent: CaptureIntent) -> FrameFlags {
        self.block_input = self.state.is_open() && intent.any();
        self.flags()
    }

    pub fn flags(&self) -> FrameFlags {
        FrameFlags {
            open: self.state.is_open(),
            block_input: self.block_input,
        }
    }

    fn transition(&mut self, next: OverlayState, cause: &str) {
        if self.state == next {
            debug!("Overlay already {} ({})", next.label(), cause);
            return;
        }
        self.state = next;
        if !next.is_open() {
            self.block_input = false;
        }
        info!("{} window {} ({})", MENU_TITLE, next.label().to_lowercase(), cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURING: CaptureIntent = CaptureIntent {
        wants_mouse: true,
        wants_keyboard: false,
    };

    #[test]
    fn test_starts_closed() {
        let overlay = OverlayLifecycle::new();
        assert_eq!(overlay.state(), OverlayState::Closed);
        assert!(!overlay.should_block_input());
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut overlay = OverlayLifecycle::new();
        overlay.toggle();
        overlay.toggle();
        assert_eq!(overlay.state(), OverlayState::Closed);

        overlay.show();
        overlay.toggle();
        overlay.toggle();
        assert_eq!(overlay.state(), OverlayState::Open);
    }

    #[test]
    fn test_hide_is_idempotent() {
        let mut overlay = OverlayLifecycle::new();
        overlay.show();
        assert_eq!(overlay.hide(), OverlayState::Closed);
        assert_eq!(overlay.hide(), OverlayState::Closed);
    }

    #[test]
    fn test_show_is_idempotent() {
        let mut overlay = OverlayLifecycle::new();
        assert_eq!(overlay.show(), OverlayState::Open);
        assert_eq!(overlay.show(), OverlayState::Open);
    }

    #[test]
    fn test_toggle_blocks_input_only_with_capture_intent() {
        let mut overlay = OverlayLifecycle::new();
        assert_eq!(overlay.toggle(), OverlayState::Open);

        let flags = overlay.begin_frame(CAPTURING);
        assert_eq!(flags, FrameFlags { open: true, block_input: true });

        let flags = overlay.begin_frame(CaptureIntent::default());
        assert_eq!(flags, FrameFlags { open: true, block_input: false });

        let keyboard = CaptureIntent {
            wants_mouse: false,
            wants_keyboard: true,
        };
        assert!(overlay.begin_frame(keyboard).block_input);
    }

    #[test]
    fn test_closed_never_blocks_input() {
        let mut overlay = OverlayLifecycle::new();
        let flags = overlay.begin_frame(CAPTURING);
        assert_eq!(flags, FrameFlags { open: false, block_input: false });
    }

    #[test]
    fn test_host_close_is_accepted() {
        let mut overlay = OverlayLifecycle::new();
        overlay.show();
        overlay.begin_frame(CAPTURING);
        assert!(overlay.should_block_input());

        overlay.notify_host_closed();
        assert_eq!(overlay.state(), OverlayState::Closed);
        assert!(!overlay.should_block_input());

        overlay.notify_host_opened();
        assert_eq!(overlay.state(), OverlayState::Open);
    }

    #[test]
    fn test_apply_maps_commands() {
        let mut overlay = OverlayLifecycle::new();
        assert_eq!(overlay.apply(OverlayCommand::Show), OverlayState::Open);
        assert_eq!(overlay.apply(OverlayCommand::Toggle), OverlayState::Closed);
        assert_eq!(overlay.apply(OverlayCommand::Hide), OverlayState::Closed);
        assert_eq!(overlay.apply(OverlayCommand::Toggle), OverlayState::Open);
    }
}
