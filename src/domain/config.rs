//! # Configuration
//!
//! Manages the loading and parsing of the bot's configuration file (`config.yaml`).
//! Defines the structs for the Matrix service, command toggles, channel admission and system settings.

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl AppConfig {
    /// Read and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.commands.prefix.is_empty() {
            bail!("commands.prefix must not be empty");
        }
        Regex::new(&self.channels.pattern)
            .with_context(|| format!("Invalid channels.pattern `{}`", self.channels.pattern))?;
        Ok(())
    }
}

/// Command surface: the prefix that marks a message as a command and the feature toggles.
#[derive(Debug, Deserialize, Clone)]
pub struct CommandsConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Command name -> enabled. Absent means disabled.
    #[serde(default)]
    pub toggle: HashMap<String, bool>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            toggle: HashMap::new(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

/// Where the bot is willing to process commands.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelsConfig {
    #[serde(default = "default_true")]
    pub allow_threads: bool,
    #[serde(default = "default_true")]
    pub allow_dms: bool,
    /// Group rooms must have a name matching this pattern.
    #[serde(default = "default_channel_pattern")]
    pub pattern: String,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            allow_threads: true,
            allow_dms: true,
            pattern: default_channel_pattern(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_channel_pattern() -> String {
    "dice|roll|^bot".to_string()
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default)]
    pub log_level: Option<String>,
    /// Room that info/error notices are mirrored to.
    #[serde(default)]
    pub log_channel: Option<String>,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            log_channel: None,
            log_dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> String {
    "data".to_string()
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Other automated accounts whose messages are never treated as commands.
    #[serde(default)]
    pub ignore_senders: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
services:
  matrix:
    username: "@tavern:example.org"
    password: "hunter2"
    homeserver: "https://example.org"
"#;

    #[test]
    fn test_defaults_apply() {
        let config = AppConfig::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.commands.prefix, "!");
        assert!(config.commands.toggle.is_empty());
        assert!(config.channels.allow_dms);
        assert!(config.channels.allow_threads);
        assert_eq!(config.channels.pattern, "dice|roll|^bot");
        assert_eq!(config.system.log_dir, "data");
        assert!(config.system.log_channel.is_none());
    }

    #[test]
    fn test_toggles_and_prefix() {
        let yaml = format!(
            "{MINIMAL}commands:\n  prefix: \"%\"\n  toggle:\n    Help: true\n    Roll: false\n"
        );
        let config = AppConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config.commands.prefix, "%");
        assert_eq!(config.commands.toggle.get("Help"), Some(&true));
        assert_eq!(config.commands.toggle.get("Roll"), Some(&false));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let yaml = format!("{MINIMAL}commands:\n  prefix: \"\"\n");
        assert!(AppConfig::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let yaml = format!("{MINIMAL}channels:\n  pattern: \"(unclosed\"\n");
        assert!(AppConfig::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.services.matrix.homeserver, "https://example.org");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
