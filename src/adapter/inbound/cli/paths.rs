//! Path utilities for wickscan.
//!
//! Configuration lives under `~/.wickscan/config.toml`.

use std::path::PathBuf;

/// Returns the wickscan home directory (`~/.wickscan/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wickscan")
}

/// Returns the default config file path (`~/.wickscan/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
