//! Notification channel configuration.

use std::time::Duration;

use serde::Deserialize;

/// `[notifications]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    /// Upper bound on a single channel delivery, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub desktop: DesktopConfig,
    #[serde(default)]
    pub log: LogChannelConfig,
}

const fn default_timeout_ms() -> u64 {
    10_000
}

impl NotificationsConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            push: PushConfig::default(),
            desktop: DesktopConfig::default(),
            log: LogChannelConfig::default(),
        }
    }
}

/// Push relay (PushPlus-compatible) channel.
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_push_url")]
    pub url: String,
    /// Relay token. Loaded from `PUSH_TOKEN`, never from the file.
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_push_url() -> String {
    "https://www.pushplus.plus/send".into()
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_push_url(),
            token: None,
        }
    }
}

/// Desktop toast channel backed by an external notifier program.
///
/// `args` may contain `{title}`, `{message}`, `{duration_ms}` and
/// `{duration_secs}` placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct DesktopConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_desktop_program")]
    pub program: String,
    #[serde(default = "default_desktop_args")]
    pub args: Vec<String>,
    #[serde(default = "default_desktop_duration_secs")]
    pub duration_secs: u64,
}

fn default_desktop_program() -> String {
    "notify-send".into()
}

fn default_desktop_args() -> Vec<String> {
    ["-t", "{duration_ms}", "{title}", "{message}"]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_desktop_duration_secs() -> u64 {
    15
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            program: default_desktop_program(),
            args: default_desktop_args(),
            duration_secs: default_desktop_duration_secs(),
        }
    }
}

/// Structured log channel.
#[derive(Debug, Clone, Deserialize)]
pub struct LogChannelConfig {
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,
}

const fn default_log_enabled() -> bool {
    true
}

impl Default for LogChannelConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
        }
    }
}
