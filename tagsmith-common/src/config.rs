//! Configuration loading for the tagsmith core
//!
//! Resolution priority (highest first):
//! 1. Explicit path handed to [`CoreConfig::load_from`]
//! 2. `TAGSMITH_CONFIG` environment variable
//! 3. Per-OS default location (`<config dir>/tagsmith/config.toml`)
//! 4. Compiled defaults
//!
//! Individual environment overrides are applied after file loading, so a
//! deployment can force offline mode without editing the config file.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming a config file
const CONFIG_ENV: &str = "TAGSMITH_CONFIG";
/// Environment override for offline mode ("1"/"true"/"yes" enables,
/// "0"/"false"/"no" disables, anything else is ignored with a warning)
const OFFLINE_ENV: &str = "TAGSMITH_OFFLINE";

/// Core configuration shared by the supervisor and its children
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Offline mode: incomplete metadata is terminal, the enricher is
    /// never contacted
    pub offline: bool,
    /// Override policy: re-fetch tags from the external source even when
    /// the file's own tags are complete
    pub override_tags: bool,
    /// Timeout applied around each external service call (milliseconds)
    pub child_request_timeout_ms: u64,
    /// Bounded mailbox capacity for every spawned actor
    pub mailbox_capacity: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            offline: false,
            override_tags: false,
            child_request_timeout_ms: 30_000,
            mailbox_capacity: 64,
        }
    }
}

impl CoreConfig {
    /// Load configuration following the documented priority order
    pub fn load() -> Result<Self> {
        let mut config = match resolve_config_path() {
            Some(path) => Self::load_from(&path)?,
            None => {
                debug!("No config file found, using compiled defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: CoreConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(OFFLINE_ENV) {
            match value.as_str() {
                "1" | "true" | "yes" => self.offline = true,
                "0" | "false" | "no" => self.offline = false,
                other => {
                    warn!(variable = OFFLINE_ENV, value = other, "Unrecognized value ignored");
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.mailbox_capacity == 0 {
            return Err(Error::Config("mailbox_capacity must be at least 1".into()));
        }
        if self.child_request_timeout_ms == 0 {
            return Err(Error::Config(
                "child_request_timeout_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Find a config file, or None to use compiled defaults
fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }

    let default = dirs::config_dir().map(|d| d.join("tagsmith").join("config.toml"))?;
    if default.exists() {
        Some(default)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = CoreConfig::default();
        assert!(!config.offline);
        assert!(!config.override_tags);
        assert_eq!(config.child_request_timeout_ms, 30_000);
        config.validate().expect("defaults must validate");
    }

    #[test]
    fn load_from_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "offline = true").unwrap();

        let config = CoreConfig::load_from(file.path()).unwrap();
        assert!(config.offline);
        assert_eq!(config.mailbox_capacity, 64);
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "offline = maybe").unwrap();

        let err = CoreConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    #[serial]
    fn offline_env_override_wins() {
        std::env::set_var(OFFLINE_ENV, "1");
        let mut config = CoreConfig::default();
        config.apply_env_overrides();
        std::env::remove_var(OFFLINE_ENV);

        assert!(config.offline);
    }

    #[test]
    #[serial]
    fn unrecognized_offline_env_value_is_ignored() {
        std::env::set_var(OFFLINE_ENV, "ture");
        let mut config = CoreConfig {
            offline: true,
            ..Default::default()
        };
        config.apply_env_overrides();
        std::env::remove_var(OFFLINE_ENV);

        // The file-configured value survives a typo in the override
        assert!(config.offline);
    }

    #[test]
    #[serial]
    fn offline_env_can_disable_a_configured_offline_mode() {
        std::env::set_var(OFFLINE_ENV, "false");
        let mut config = CoreConfig {
            offline: true,
            ..Default::default()
        };
        config.apply_env_overrides();
        std::env::remove_var(OFFLINE_ENV);

        assert!(!config.offline);
    }

    #[test]
    fn zero_mailbox_capacity_is_rejected() {
        let config = CoreConfig {
            mailbox_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
