use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_settle_delay_ms() -> u64 {
    50
}

fn default_acquire_budget_ms() -> u64 {
    1_000
}

fn default_badge_duration_ms() -> u64 {
    2_000
}

fn default_theme_timeout_ms() -> u64 {
    1_500
}

fn default_tooltip_debounce_ms() -> u64 {
    300
}

/// Timings for the capture flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Wait after injecting the page agent before asking it again
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Upper bound on reading a selection through the whole strategy chain
    #[serde(default = "default_acquire_budget_ms")]
    pub acquire_budget_ms: u64,
    /// How long the "nothing selected" badge stays up
    #[serde(default = "default_badge_duration_ms")]
    pub badge_duration_ms: u64,
    #[serde(default = "default_theme_timeout_ms")]
    pub theme_timeout_ms: u64,
    #[serde(default = "default_tooltip_debounce_ms")]
    pub tooltip_debounce_ms: u64,
}

impl CaptureConfig {
    pub fn new() -> Self {
        Self {
            settle_delay_ms: env_or("SETTLE_DELAY_MS", default_settle_delay_ms()),
            acquire_budget_ms: env_or("ACQUIRE_BUDGET_MS", default_acquire_budget_ms()),
            badge_duration_ms: env_or("BADGE_DURATION_MS", default_badge_duration_ms()),
            theme_timeout_ms: env_or("THEME_TIMEOUT_MS", default_theme_timeout_ms()),
            tooltip_debounce_ms: env_or("TOOLTIP_DEBOUNCE_MS", default_tooltip_debounce_ms()),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn acquire_budget(&self) -> Duration {
        Duration::from_millis(self.acquire_budget_ms)
    }

    pub fn badge_duration(&self) -> Duration {
        Duration::from_millis(self.badge_duration_ms)
    }

    pub fn theme_timeout(&self) -> Duration {
        Duration::from_millis(self.theme_timeout_ms)
    }

    pub fn tooltip_debounce(&self) -> Duration {
        Duration::from_millis(self.tooltip_debounce_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            acquire_budget_ms: default_acquire_budget_ms(),
            badge_duration_ms: default_badge_duration_ms(),
            theme_timeout_ms: default_theme_timeout_ms(),
            tooltip_debounce_ms: default_tooltip_debounce_ms(),
        }
    }
}
