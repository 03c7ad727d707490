use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::MonthKey;
use crate::errors::SplitError;
use crate::utils::paths::{app_data_dir, config_file_in, ensure_dir, export_dir_in, write_atomic};

/// Keys accepted by [`Config::set`], in display order.
pub const CONFIG_KEYS: [&str; 4] = ["currency_label", "admin_password", "export_dir", "last_month"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency_label: String,
    pub admin_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_month: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_label: "Rs.".into(),
            admin_password: "Khana".into(),
            export_dir: None,
            last_month: None,
        }
    }
}

impl Config {
    /// Updates one setting from its textual form. `-` clears optional values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SplitError> {
        let value = value.trim();
        match key {
            "currency_label" => {
                if value.is_empty() {
                    return Err(SplitError::Config("currency_label cannot be empty".into()));
                }
                self.currency_label = value.to_string();
            }
            "admin_password" => {
                if value.is_empty() {
                    return Err(SplitError::Config("admin_password cannot be empty".into()));
                }
                self.admin_password = value.to_string();
            }
            "export_dir" => {
                self.export_dir = match value {
                    "" | "-" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            "last_month" => {
                self.last_month = match value {
                    "" | "-" => None,
                    month => Some(
                        MonthKey::parse(month)
                            .ok_or_else(|| {
                                SplitError::Config(format!("invalid month `{month}` (use YYYY-MM)"))
                            })?
                            .key(),
                    ),
                };
            }
            other => {
                return Err(SplitError::Config(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Settings as `(key, value)` pairs for display; the password is masked.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency_label", self.currency_label.clone()),
            ("admin_password", "*".repeat(self.admin_password.chars().count())),
            (
                "export_dir",
                self.export_dir
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(default)".into()),
            ),
            (
                "last_month",
                self.last_month.clone().unwrap_or_else(|| "(current)".into()),
            ),
        ]
    }

    pub fn last_month_key(&self) -> Option<MonthKey> {
        self.last_month.as_deref().and_then(MonthKey::parse)
    }
}

/// Settings read at startup; `warning` is set when the file was unusable and
/// the defaults were substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: Config,
    pub warning: Option<String>,
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, SplitError> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, SplitError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, SplitError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    /// Reads the settings file. A missing file yields the defaults silently;
    /// one that is not UTF-8 JSON yields the defaults plus a warning.
    pub fn load(&self) -> Result<LoadedConfig, SplitError> {
        if !self.path.exists() {
            return Ok(LoadedConfig {
                config: Config::default(),
                warning: None,
            });
        }
        let bytes = fs::read(&self.path)?;
        let parsed = std::str::from_utf8(&bytes)
            .map_err(|err| err.to_string())
            .and_then(|text| serde_json::from_str::<Config>(text).map_err(|err| err.to_string()));
        match parsed {
            Ok(config) => Ok(LoadedConfig {
                config,
                warning: None,
            }),
            Err(reason) => {
                let warning = format!(
                    "{} is unreadable ({reason}); using default settings",
                    self.path.display()
                );
                tracing::warn!("{warning}");
                Ok(LoadedConfig {
                    config: Config::default(),
                    warning: Some(warning),
                })
            }
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), SplitError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Where exports go: the configured directory or `<data dir>/exports`.
    pub fn export_dir(&self, config: &Config) -> PathBuf {
        config
            .export_dir
            .clone()
            .unwrap_or_else(|| export_dir_in(&self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::paths::tmp_path;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let loaded = manager.load().unwrap();
        assert!(loaded.warning.is_none());
        let config = loaded.config;
        assert_eq!(config, Config::default());
        assert_eq!(config.currency_label, "Rs.");
        assert_eq!(manager.export_dir(&config), temp.path().join("exports"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set("currency_label", "EUR").unwrap();
        config.set("last_month", "2024-03").unwrap();
        manager.save(&config).unwrap();

        assert_eq!(manager.load().unwrap().config, config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::create_dir_all(manager.path().parent().unwrap()).unwrap();
        fs::write(manager.path(), r#"{"currency_label":"$"}"#).unwrap();

        let config = manager.load().unwrap().config;
        assert_eq!(config.currency_label, "$");
        assert_eq!(config.admin_password, "Khana");
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::create_dir_all(manager.path().parent().unwrap()).unwrap();

        let malformed: [&[u8]; 2] = [b"{oops", &[0xff, 0xfe, b'{']];
        for contents in malformed {
            fs::write(manager.path(), contents).unwrap();
            let loaded = manager.load().unwrap();
            assert_eq!(loaded.config, Config::default());
            assert!(loaded.warning.unwrap().contains("using default settings"));
        }

        manager.save(&Config::default()).unwrap();
        assert!(manager.load().unwrap().warning.is_none());
    }

    #[test]
    fn set_validates_keys_and_values() {
        let mut config = Config::default();
        assert!(config.set("colour", "red").is_err());
        assert!(config.set("last_month", "2024-13").is_err());
        assert!(config.set("admin_password", "  ").is_err());

        config.set("export_dir", "/tmp/out").unwrap();
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/out")));
        config.set("export_dir", "-").unwrap();
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn password_is_masked_in_entries() {
        let entries = Config::default().entries();
        assert_eq!(entries[1], ("admin_password", "*****".to_string()));
    }
}
