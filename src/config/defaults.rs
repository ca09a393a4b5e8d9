//! Default configuration values for splitwatch

use super::loader::Config;

/// Ticks per second the host polls at unless configured otherwise
pub const DEFAULT_TICK_RATE: f64 = 120.0;

/// Log level used when the configuration does not specify one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Returns the default configuration: no process, no watchers, default
/// tick rate and log level
pub fn default_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = default_config();
        assert_eq!(config.poll.tick_rate, DEFAULT_TICK_RATE);
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert!(config.process.name.is_empty());
        assert!(config.watch.is_empty());
    }
}
