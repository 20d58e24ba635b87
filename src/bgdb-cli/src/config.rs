//! Configuration management for the bgdb CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Database file used when neither a flag nor the config names one
pub const DEFAULT_BIN: &str = "bgdb_clean.bin";

/// Saved defaults; every key is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub bin: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub calibration: Option<PathBuf>,
    pub ascii: Option<bool>,
}

/// Effective settings after applying flags over config over defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bin: PathBuf,
    pub out: PathBuf,
    pub calibration: Option<PathBuf>,
    pub ascii: bool,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("bgdb");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or an empty config if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save to `path`, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Copy every key set in `other` over this config
    pub fn merge(&mut self, other: Config) {
        if other.bin.is_some() {
            self.bin = other.bin;
        }
        if other.out.is_some() {
            self.out = other.out;
        }
        if other.calibration.is_some() {
            self.calibration = other.calibration;
        }
        if other.ascii.is_some() {
            self.ascii = other.ascii;
        }
    }

    /// Resolve settings; command-line values win over saved ones
    ///
    /// Without a configured output directory, files go next to the input.
    pub fn resolve(&self, flags: Config) -> Settings {
        let mut merged = self.clone();
        merged.merge(flags);

        let bin = merged.bin.unwrap_or_else(|| PathBuf::from(DEFAULT_BIN));
        let out = merged.out.unwrap_or_else(|| {
            bin.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        });

        Settings {
            bin,
            out,
            calibration: merged.calibration,
            ascii: merged.ascii.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_exists() {
        let result = Config::config_path();
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            bin: Some(PathBuf::from("/data/bgdb_clean.bin")),
            ascii: Some(true),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "bin = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_resolve_precedence() {
        let saved = Config {
            bin: Some(PathBuf::from("/data/db.bin")),
            out: Some(PathBuf::from("/data/json")),
            calibration: None,
            ascii: Some(true),
        };

        let settings = saved.resolve(Config {
            out: Some(PathBuf::from("/tmp/out")),
            ascii: Some(false),
            ..Default::default()
        });
        assert_eq!(settings.bin, PathBuf::from("/data/db.bin"));
        assert_eq!(settings.out, PathBuf::from("/tmp/out"));
        assert!(!settings.ascii);
        assert_eq!(settings.calibration, None);
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Config::default().resolve(Config::default());
        assert_eq!(settings.bin, PathBuf::from(DEFAULT_BIN));
        assert_eq!(settings.out, PathBuf::from("."));
        assert!(!settings.ascii);

        let settings = Config::default().resolve(Config {
            bin: Some(PathBuf::from("/data/db.bin")),
            ..Default::default()
        });
        assert_eq!(settings.out, PathBuf::from("/data"));
    }
}
