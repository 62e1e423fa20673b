#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STORAGE_DIR_ENV: &str = "PLUME_STORAGE_DIR";
pub const LOG_LEVEL_ENV: &str = "PLUME_LOG_LEVEL";

const DEFAULT_STORAGE_DIR: &str = "~/.local/share/plume";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_COPY_PREFIX: &str = "Copy of ";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub log_level: String,
    pub copy_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            copy_prefix: DEFAULT_COPY_PREFIX.to_string(),
        }
    }
}

/// Values given on the command line. They win over every other source.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub storage_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    /// Reads a TOML config file. A missing file is not an error.
    pub fn load_from_path(config_path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;
        Ok(Some(config))
    }

    /// `$XDG_CONFIG_HOME/plume/config.toml`, else `~/.config/plume/config.toml`.
    pub fn default_path(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        let base = env("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| expand_path(Path::new("~/.config")));
        base.join("plume").join("config.toml")
    }

    /// Layers defaults, the config file, the environment and `overrides`,
    /// in that order of precedence.
    pub fn resolve(
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let config_path = overrides
            .config_path
            .clone()
            .unwrap_or_else(|| Self::default_path(&env));
        let mut config = Self::load_from_path(&config_path)?.unwrap_or_default();

        if let Some(storage_dir) = env(STORAGE_DIR_ENV) {
            config.storage_dir = PathBuf::from(storage_dir);
        }
        if let Some(log_level) = env(LOG_LEVEL_ENV) {
            config.log_level = log_level;
        }

        if let Some(storage_dir) = overrides.storage_dir.clone() {
            config.storage_dir = storage_dir;
        }
        if let Some(log_level) = overrides.log_level.clone() {
            config.log_level = log_level;
        }

        config.storage_dir = expand_path(&config.storage_dir);
        Ok(config)
    }
}

/// Process environment lookup with blank values treated as unset.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("nope.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "copy_prefix = \"Clone of \"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(config.copy_prefix, "Clone of ");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "log_level = [").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn precedence_is_file_then_env_then_flags() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "storage_dir = \"/from/file\"\nlog_level = \"info\"\n",
        )
        .unwrap();

        let overrides = Overrides {
            config_path: Some(path.clone()),
            ..Overrides::default()
        };
        let config = Config::resolve(&overrides, env_from(&[])).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/from/file"));
        assert_eq!(config.log_level, "info");

        let env = env_from(&[(STORAGE_DIR_ENV, "/from/env"), (LOG_LEVEL_ENV, "debug")]);
        let config = Config::resolve(&overrides, &env).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/from/env"));
        assert_eq!(config.log_level, "debug");

        let overrides = Overrides {
            config_path: Some(path),
            storage_dir: Some(PathBuf::from("/from/flag")),
            log_level: None,
        };
        let config = Config::resolve(&overrides, &env).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn default_path_prefers_xdg_config_home() {
        let path = Config::default_path(env_from(&[("XDG_CONFIG_HOME", "/xdg")]));
        assert_eq!(path, PathBuf::from("/xdg/plume/config.toml"));
    }

    #[test]
    fn storage_dir_tilde_is_expanded() {
        let temp_dir = TempDir::new().unwrap();
        let overrides = Overrides {
            config_path: Some(temp_dir.path().join("absent.toml")),
            ..Overrides::default()
        };
        let config = Config::resolve(&overrides, env_from(&[])).unwrap();
        assert!(!config.storage_dir.to_string_lossy().starts_with('~'));
        assert!(config.storage_dir.ends_with(".local/share/plume"));
    }
}
