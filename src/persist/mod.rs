//! Persistence layer for console configuration.
//!
//! Provides RON-based save/load for [`ConsoleConfig`].

use std::fs;
use std::path::Path;

use bevy::log::warn;

use crate::config::ConsoleConfig;

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "console.ron";

impl ConsoleConfig {
    /// Load config from a RON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;

        ron::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
    }

    /// Save config to a RON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::Io(parent.display().to_string(), e.to_string()))?;
            }
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))
    }

    /// Load config from file, falling back to defaults if it is missing or
    /// unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    warn!("{}; using default console config", e);
                }
                Self::default()
            }
        }
    }
}

/// Errors that can occur during config operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error (path, message).
    Io(String, String),
    /// Parse error (path, message).
    Parse(String, String),
    /// Serialization error.
    Serialize(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, msg) => write!(f, "IO error for '{}': {}", path, msg),
            ConfigError::Parse(path, msg) => write!(f, "Parse error for '{}': {}", path, msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_file_roundtrip() {
        let config = ConsoleConfig::new("Ops")
            .version("2.0")
            .author("infra")
            .prompt("ops>")
            .user("alice", "secret");

        let temp = NamedTempFile::new().unwrap();
        config.save(temp.path()).unwrap();

        let loaded = ConsoleConfig::load(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_file_load_missing() {
        let result = ConsoleConfig::load("nonexistent_file.ron");
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn test_config_file_load_or_default() {
        let config = ConsoleConfig::load_or_default("nonexistent_file.ron");
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_config_parse_partial_ron() {
        let ron_content = r#"(
    name: "Shell",
    prompt: "$",
    users: {
        "alice": "secret",
    },
)"#;

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(ron_content.as_bytes()).unwrap();
        temp.flush().unwrap();

        let config = ConsoleConfig::load(temp.path()).unwrap();
        assert_eq!(config.name, "Shell");
        assert_eq!(config.prompt, "$");
        assert_eq!(config.users.get("alice").map(String::as_str), Some("secret"));
        assert_eq!(config.help_width, 20);
        assert!(config.show_header);
    }

    #[test]
    fn test_config_parse_error() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"(name: 42)").unwrap();
        temp.flush().unwrap();

        assert!(matches!(
            ConsoleConfig::load(temp.path()),
            Err(ConfigError::Parse(..))
        ));
        assert_eq!(
            ConsoleConfig::load_or_default(temp.path()),
            ConsoleConfig::default()
        );
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_CONFIG_FILE);

        ConsoleConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
