//! Path utilities for riskwarden.
//!
//! Operator files live under `~/.riskwarden/`:
//! - `~/.riskwarden/config.toml` - settings picked up when `--config` is absent

use std::path::PathBuf;

/// Returns the riskwarden home directory (`~/.riskwarden/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".riskwarden")
}

/// Returns the default config file path (`~/.riskwarden/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_under_riskwarden_home() {
        let config = default_config();
        assert!(config.starts_with(home_dir()));
        assert!(config.to_string_lossy().contains(".riskwarden"));
    }
}
