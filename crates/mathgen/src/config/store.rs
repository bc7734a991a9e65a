//! Persisted user configuration
//!
//! The saved settings live in a single TOML file named after the
//! `math-generator-config` key. An explicit path must exist when loading;
//! a discovered path falls back to defaults when nothing has been saved yet.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::Config;
use crate::error::{MathgenError, Result};

/// File name of the persisted configuration
pub const CONFIG_FILE_NAME: &str = "math-generator-config.toml";

/// Location of the persisted configuration file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    explicit: bool,
}

impl ConfigStore {
    /// Store backed by an explicit file. Loading fails if the file is missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            explicit: true,
        }
    }

    /// Use the explicit path when given, otherwise the first existing file in
    /// the default search locations, otherwise the platform default path.
    pub fn discover(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                debug!("Found config at: {}", candidate.display());
                return Self {
                    path: candidate,
                    explicit: false,
                };
            }
        }

        Self {
            path: Self::default_path(),
            explicit: false,
        }
    }

    /// `{config_dir}/mathgen/math-generator-config.toml`, or a `.mathgen`
    /// directory under home when no config dir is known.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|c| c.join("mathgen"))
            .or_else(|| dirs::home_dir().map(|h| h.join(".mathgen")))
            .unwrap_or_else(|| PathBuf::from(".mathgen"))
            .join(CONFIG_FILE_NAME)
    }

    fn search_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|c| c.join("mathgen").join(CONFIG_FILE_NAME)),
            dirs::home_dir().map(|h| h.join(".mathgen").join(CONFIG_FILE_NAME)),
            Some(PathBuf::from(CONFIG_FILE_NAME)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the configuration.
    pub fn load(&self) -> Result<Config> {
        if !self.explicit && !self.exists() {
            info!("No config file found, using defaults");
            return Ok(Config::default());
        }

        info!("Loading config from: {}", self.path.display());
        let content = fs::read_to_string(&self.path).map_err(|e| {
            MathgenError::Config(format!(
                "Failed to read config file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write the configuration, creating parent directories as needed.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        info!("Config saved to: {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join(CONFIG_FILE_NAME));

        let mut config = Config::default();
        config.provider.name = Provider::OpenAI;
        config.provider.api_key = "sk-test".to_string();
        config.provider.base_url = Some("https://gateway.example.com/v1".to_string());

        store.save(&config).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.provider.name, Provider::OpenAI);
        assert_eq!(loaded.provider.api_key, "sk-test");
        assert_eq!(
            loaded.provider.base_url,
            Some("https://gateway.example.com/v1".to_string())
        );
        assert_eq!(loaded.generation.temperature, 0.7);
    }

    #[test]
    fn test_saved_file_uses_provider_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME));

        store.save(&Config::default()).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("[provider]"));
        assert!(content.contains("name = \"deepseek\""));
        assert!(!content.contains("base_url"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("missing.toml"));

        let err = store.load().unwrap_err();
        assert!(matches!(err, MathgenError::Config(_)));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[provider\nname = ").unwrap();

        let err = ConfigStore::new(&path).load().unwrap_err();
        assert!(matches!(err, MathgenError::Config(_)));
    }

    #[test]
    fn test_discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");

        let store = ConfigStore::discover(Some(&path));
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_default_path_uses_config_file_name() {
        let path = ConfigStore::default_path();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }
}
