//! Configuration loader for splitwatch
//!
//! Loads the TOML file that names the target process, the polling rate,
//! and the watchers to create.

use super::defaults::{DEFAULT_LOG_LEVEL, DEFAULT_TICK_RATE};
use super::ConfigResult;
use crate::core::types::{Address, TextEncoding, ValueKind};
use crate::watcher::Watcher;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub process: ProcessConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub watch: Vec<WatchConfig>,
}

/// Target process configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Name of the process to attach to
    #[serde(default)]
    pub name: String,
}

/// Polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Ticks per second the host should poll at
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// One declared watcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Name the driving loop knows this watcher by
    pub name: String,
    /// Module the offset is relative to
    pub module: String,
    /// Byte offset from the module base, usually hex ("0x10")
    pub offset: String,
    /// Value interpretation at that location
    pub kind: WatchKind,
    /// Character count for text kinds
    #[serde(default)]
    pub length: Option<u32>,
    /// Text encoding, UTF-8 unless stated
    #[serde(default)]
    pub encoding: Option<TextEncoding>,
}

/// Value kind names accepted in the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    ISize,
    U8,
    U16,
    U32,
    U64,
    USize,
    F32,
    F64,
    Text,
}

impl WatchConfig {
    /// Builds the runtime watcher this entry declares
    pub fn build(&self) -> ConfigResult<Watcher> {
        let offset = Address::from_str(&self.offset)
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "watch '{}': bad offset '{}'",
                    self.name, self.offset
                ))
            })?
            .as_u64();
        Ok(Watcher::new(&self.module, offset, self.value_kind()?))
    }

    /// Resolves the declared kind, folding in length and encoding for text
    pub fn value_kind(&self) -> ConfigResult<ValueKind> {
        Ok(match self.kind {
            WatchKind::Bool => ValueKind::Bool,
            WatchKind::I8 => ValueKind::I8,
            WatchKind::I16 => ValueKind::I16,
            WatchKind::I32 => ValueKind::I32,
            WatchKind::I64 => ValueKind::I64,
            WatchKind::ISize => ValueKind::ISize,
            WatchKind::U8 => ValueKind::U8,
            WatchKind::U16 => ValueKind::U16,
            WatchKind::U32 => ValueKind::U32,
            WatchKind::U64 => ValueKind::U64,
            WatchKind::USize => ValueKind::USize,
            WatchKind::F32 => ValueKind::F32,
            WatchKind::F64 => ValueKind::F64,
            WatchKind::Text => ValueKind::Text {
                length: self.length.ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "watch '{}': text kind requires a length",
                        self.name
                    ))
                })?,
                encoding: self.encoding.unwrap_or_default(),
            },
        })
    }
}

/// Loads a configuration file, failing if it does not exist
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    let raw = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&raw)?;
    info!(path = %path.display(), watchers = config.watch.len(), "loaded configuration");
    Ok(config)
}

/// Loads a configuration file, falling back to defaults if it is missing
pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        info!(path = %path.display(), "no configuration file, using defaults");
        Ok(Config::default())
    }
}

/// Writes a configuration file
pub fn save_config(path: impl AsRef<Path>, config: &Config) -> ConfigResult<()> {
    let raw = toml::to_string_pretty(config)?;
    fs::write(path, raw)?;
    Ok(())
}

fn default_tick_rate() -> f64 {
    DEFAULT_TICK_RATE
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.poll.tick_rate, DEFAULT_TICK_RATE);
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert!(config.watch.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [process]
            name = "game.exe"

            [poll]
            tick_rate = 60.0

            [[watch]]
            name = "level"
            module = "game.exe"
            offset = "0x10"
            kind = "u32"
            "#,
        )
        .unwrap();

        assert_eq!(config.process.name, "game.exe");
        assert_eq!(config.poll.tick_rate, 60.0);
        assert_eq!(config.watch.len(), 1);
        assert_eq!(config.watch[0].kind, WatchKind::U32);
    }

    #[test]
    fn test_build_scalar_watcher() {
        let entry = WatchConfig {
            name: "level".to_string(),
            module: "game.exe".to_string(),
            offset: "0x10".to_string(),
            kind: WatchKind::U32,
            length: None,
            encoding: None,
        };

        let watcher = entry.build().unwrap();
        assert_eq!(watcher.module(), "game.exe");
        assert_eq!(watcher.offset(), 0x10);
        assert_eq!(watcher.kind(), ValueKind::U32);
    }

    #[test]
    fn test_build_text_watcher_defaults_to_utf8() {
        let entry = WatchConfig {
            name: "area".to_string(),
            module: "game.exe".to_string(),
            offset: "0x40".to_string(),
            kind: WatchKind::Text,
            length: Some(8),
            encoding: None,
        };

        assert_eq!(
            entry.value_kind().unwrap(),
            ValueKind::Text {
                length: 8,
                encoding: TextEncoding::Utf8,
            }
        );
    }

    #[test]
    fn test_build_text_watcher_without_length_fails() {
        let entry = WatchConfig {
            name: "area".to_string(),
            module: "game.exe".to_string(),
            offset: "0x40".to_string(),
            kind: WatchKind::Text,
            length: None,
            encoding: None,
        };

        assert!(matches!(entry.build(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_build_with_bad_offset_fails() {
        let entry = WatchConfig {
            name: "level".to_string(),
            module: "game.exe".to_string(),
            offset: "0xNOPE".to_string(),
            kind: WatchKind::U32,
            length: None,
            encoding: None,
        };

        assert!(matches!(entry.build(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_config("/definitely/not/here/splitwatch.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let config = load_or_default("/definitely/not/here/splitwatch.toml").unwrap();
        assert!(config.process.name.is_empty());
    }
}
