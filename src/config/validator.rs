//! Configuration validation

use super::loader::{Config, ConfigError, WatchKind};
use super::ConfigResult;
use std::collections::HashSet;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validates configurations before watchers are built from them
pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks every field of the configuration, reporting the first
    /// problem found
    pub fn validate(config: &Config) -> ConfigResult<()> {
        if config.process.name.is_empty() {
            return Err(ConfigError::Invalid(
                "process.name must name the process to attach to".to_string(),
            ));
        }

        if !config.poll.tick_rate.is_finite() || config.poll.tick_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "poll.tick_rate must be a positive number, got {}",
                config.poll.tick_rate
            )));
        }

        if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {:?}, got '{}'",
                LOG_LEVELS, config.logging.level
            )));
        }

        let mut names = HashSet::new();
        for entry in &config.watch {
            if entry.name.is_empty() {
                return Err(ConfigError::Invalid(
                    "every watch entry needs a name".to_string(),
                ));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate watch name '{}'",
                    entry.name
                )));
            }
            if entry.module.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "watch '{}': module must not be empty",
                    entry.name
                )));
            }
            match entry.kind {
                WatchKind::Text => {
                    if entry.length.map_or(true, |length| length == 0) {
                        return Err(ConfigError::Invalid(format!(
                            "watch '{}': text kind requires a non-zero length",
                            entry.name
                        )));
                    }
                }
                _ => {
                    if entry.length.is_some() || entry.encoding.is_some() {
                        return Err(ConfigError::Invalid(format!(
                            "watch '{}': length and encoding only apply to text kinds",
                            entry.name
                        )));
                    }
                }
            }
            // Surfaces bad offsets and kind mismatches at load time
            // instead of on the first tick.
            entry.build()?;
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    ConfigValidator::validate(config)
}
