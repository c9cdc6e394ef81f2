//! Config loading, validation, and resolution.

use super::model::Config;
use crate::error::{Result, SingletonError};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(SingletonError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            SingletonError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, falling back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document as a struct; treat it as all defaults
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            SingletonError::UserError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            SingletonError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `pid_dir` must be non-empty and relative to the root
    /// - `app_name`, when present, must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.pid_dir.trim().is_empty() {
            return Err(SingletonError::UserError(
                "config validation failed: pid_dir must not be empty".to_string(),
            ));
        }

        if Path::new(&self.pid_dir).is_absolute() {
            return Err(SingletonError::UserError(format!(
                "config validation failed: pid_dir must be relative to the root (found '{}')",
                self.pid_dir
            )));
        }

        if let Some(app_name) = &self.app_name
            && app_name.trim().is_empty()
        {
            return Err(SingletonError::UserError(
                "config validation failed: app_name must not be empty when set".to_string(),
            ));
        }

        Ok(())
    }
}
