//! Configuration module for splitwatch
//!
//! Provides loading, validation, and defaults for the TOML file that
//! names the target process, the polling rate, and the watchers to
//! create.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, DEFAULT_LOG_LEVEL, DEFAULT_TICK_RATE};
pub use loader::{
    load_config, load_or_default, save_config, Config, ConfigError, LoggingConfig, PollConfig,
    ProcessConfig, WatchConfig, WatchKind,
};
pub use validator::{validate_config, ConfigValidator};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
