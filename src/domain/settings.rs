use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_false")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_true")]
    pub show_target: bool,
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "minutely", "never"
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_logging_enabled: default_false(),
            console_logging_enabled: default_true(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            show_target: default_true(),
            ansi_colors: default_true(),
            rotation: default_rotation(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "bobbycar_ble".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}

/// Driver tuning knobs. Every field is defaulted so callers can deserialize
/// from partial JSON, or just take `Settings::default()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Remote-control write cadence.
    #[serde(default = "default_pacer_period_ms")]
    pub pacer_period_ms: u64,
    /// How long an ordered disconnect waits for unsubscribe confirmations
    /// before forcing the link down.
    #[serde(default = "default_disconnect_timeout_ms")]
    pub disconnect_timeout_ms: u64,
    /// How long a device scan runs before stopping on its own.
    #[serde(default = "default_scan_timeout_ms")]
    pub scan_timeout_ms: u64,

    // Logging Settings
    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pacer_period_ms: default_pacer_period_ms(),
            disconnect_timeout_ms: default_disconnect_timeout_ms(),
            scan_timeout_ms: default_scan_timeout_ms(),
            log_settings: LogSettings::default(),
        }
    }
}

fn default_pacer_period_ms() -> u64 {
    100
}
fn default_disconnect_timeout_ms() -> u64 {
    3000
}
fn default_scan_timeout_ms() -> u64 {
    5000
}

impl Settings {
    pub fn pacer_period(&self) -> Duration {
        Duration::from_millis(self.pacer_period_ms)
    }

    pub fn disconnect_timeout(&self) -> Duration {
        Duration::from_millis(self.disconnect_timeout_ms)
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.pacer_period(), Duration::from_millis(100));
        assert_eq!(settings.disconnect_timeout(), Duration::from_millis(3000));
        assert_eq!(settings.scan_timeout(), Duration::from_millis(5000));
        assert_eq!(settings.log_settings.level, "info");
    }

    #[test]
    fn test_partial_json_overrides_one_field() {
        let settings: Settings =
            serde_json::from_str(r#"{"pacer_period_ms": 50, "log_settings": {"level": "debug"}}"#)
                .unwrap();
        assert_eq!(settings.pacer_period(), Duration::from_millis(50));
        assert_eq!(settings.disconnect_timeout(), Duration::from_millis(3000));
        assert_eq!(settings.log_settings.level, "debug");
        assert!(settings.log_settings.console_logging_enabled);
    }
}
