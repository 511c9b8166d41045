use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::playground::DEFAULT_SYSTEM_INSTRUCTIONS;
use crate::resolver::Latency;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Shortest simulated reply delay
    pub min_delay_ms: u64,
    /// Random extra delay on top of `min_delay_ms`
    pub jitter_ms: u64,
    /// Default instructions for the prompt playground
    pub system_instructions: String,
    /// Start the playground with verbose mode on
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            jitter_ms: 1000,
            system_instructions: DEFAULT_SYSTEM_INSTRUCTIONS.to_string(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn latency(&self) -> Latency {
        Latency::from_millis(self.min_delay_ms, self.jitter_ms)
    }

    /// Load from the user config directory, falling back to defaults when
    /// no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| AgentError::FileSystem {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| AgentError::FileSystem {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| AgentError::FileSystem {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| AgentError::Config {
            message: "Could not determine config directory".to_string(),
        })?;

        Ok(config_dir.join("ticketbot").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.latency().min, Duration::from_millis(1000));
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            min_delay_ms: 0,
            jitter_ms: 250,
            verbose: true,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "jitter_ms": 0 }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.jitter_ms, 0);
        assert_eq!(config.min_delay_ms, 1000);
        assert_eq!(config.system_instructions, DEFAULT_SYSTEM_INSTRUCTIONS);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(Config::load_from(&path), Err(AgentError::Serialization { .. })));
    }
}
