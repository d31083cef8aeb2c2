//! Machine configuration.
//!
//! A plain record built once and handed to the builder. Every field has a
//! serde default, so partial documents load:
//!
//! ```rust
//! use guardfsm::MachineConfig;
//!
//! let config: MachineConfig = serde_json::from_str(r#"{ "history_len": 4 }"#).unwrap();
//! assert_eq!(config.history_len, 4);
//! assert!(config.check_disjoint);
//! ```

use crate::core::DEFAULT_HISTORY_LEN;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Number of visited states kept (default: 10)
    #[serde(default = "default_history_len")]
    pub history_len: usize,

    /// Reject steps where more than one guard holds (default: true)
    ///
    /// When disabled, the first guard that holds in destination order wins
    /// and the remaining guards are not evaluated.
    #[serde(default = "default_check_disjoint")]
    pub check_disjoint: bool,

    /// Log compile diagnostics at warn level instead of debug (default: false)
    #[serde(default)]
    pub surface_warnings: bool,

    /// Pause between steps for free-running drivers, in milliseconds
    /// (default: 500). The machine itself never sleeps.
    #[serde(default = "default_sleep_interval_ms")]
    pub sleep_interval_ms: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            history_len: default_history_len(),
            check_disjoint: default_check_disjoint(),
            surface_warnings: false,
            sleep_interval_ms: default_sleep_interval_ms(),
        }
    }
}

impl MachineConfig {
    /// Sleep interval as a `Duration`.
    pub fn sleep_interval(&self) -> Duration {
        Duration::from_millis(self.sleep_interval_ms)
    }

    /// Number of visited states to keep.
    pub fn with_history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len;
        self
    }

    /// Require at most one true condition per step.
    pub fn with_check_disjoint(mut self, enabled: bool) -> Self {
        self.check_disjoint = enabled;
        self
    }

    /// Log diagnostics at `warn` instead of `debug`.
    pub fn with_surface_warnings(mut self, enabled: bool) -> Self {
        self.surface_warnings = enabled;
        self
    }

    /// Interval a driver loop should wait between steps.
    pub fn with_sleep_interval(mut self, interval: Duration) -> Self {
        self.sleep_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

// Default value functions for serde
fn default_history_len() -> usize {
    DEFAULT_HISTORY_LEN
}

fn default_check_disjoint() -> bool {
    true
}

fn default_sleep_interval_ms() -> u64 {
    500
}
