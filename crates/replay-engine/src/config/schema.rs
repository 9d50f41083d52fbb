use crate::backend::HighlightStyle;
use crate::waiter::WaitOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_command_delay_ms")]
    pub command_delay_ms: u64,
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            command_delay_ms: default_command_delay_ms(),
            wait_timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl TimingConfig {
    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.command_delay_ms)
    }

    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_millis(self.wait_timeout_ms),
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

fn default_command_delay_ms() -> u64 {
    800
}

fn default_wait_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    300
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_highlight_enabled")]
    pub enabled: bool,
    #[serde(default = "default_highlight_color")]
    pub color: String,
    #[serde(default = "default_highlight_duration_ms")]
    pub duration_ms: u64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: default_highlight_enabled(),
            color: default_highlight_color(),
            duration_ms: default_highlight_duration_ms(),
        }
    }
}

impl HighlightConfig {
    pub fn style(&self) -> HighlightStyle {
        HighlightStyle {
            color: self.color.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

fn default_highlight_enabled() -> bool {
    true
}

fn default_highlight_color() -> String {
    "yellow".to_string()
}

fn default_highlight_duration_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Command kind that carries synthetic key presses.
    #[serde(default = "default_key_command")]
    pub command: String,
    #[serde(default = "default_escape_token")]
    pub escape_token: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            command: default_key_command(),
            escape_token: default_escape_token(),
        }
    }
}

fn default_key_command() -> String {
    "XType".to_string()
}

fn default_escape_token() -> String {
    "${KEY_ESC}".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Keep executing after an `open` navigates instead of ending the run.
    #[serde(default)]
    pub continue_after_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_mask_sensitive")]
    pub mask_sensitive: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            mask_sensitive: default_mask_sensitive(),
        }
    }
}

fn default_mask_sensitive() -> bool {
    true
}
