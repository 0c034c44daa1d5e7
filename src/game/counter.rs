//! Goal counter

use tracing::{debug, info, warn};

use crate::config::{self, ConfigStore};

/// Counts qualifying events while the plugin is enabled
#[derive(Debug, Default)]
pub struct EventCounter {
    count: u64,
}

impl EventCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Count one qualifying event if the enabled flag is set right now.
    ///
    /// Returns whether the counter moved. Saturates instead of wrapping.
    pub fn on_qualifying_event(&mut self, config: &ConfigStore) -> bool {
        let enabled = match config.get_bool(config::ENABLED) {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!("Treating counter as disabled: {}", e);
                false
            }
        };

        if !enabled {
            debug!("Counter disabled, ignoring event");
            return false;
        }

        self.count = self.count.saturating_add(1);
        debug!("Goal counter now {}", self.count);
        true
    }

    /// Always permitted, regardless of the enabled flag
    pub fn reset(&mut self) {
        self.count = 0;
        info!("Goal counter reset");
    }
}
