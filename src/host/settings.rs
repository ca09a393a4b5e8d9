//! User settings registry capability

/// Registry of user-modifiable settings.
pub trait SettingsRegistry {
    /// Adds a boolean setting and returns its effective value: the default
    /// if the user has not touched it, otherwise the user's choice.
    fn add_bool(&mut self, key: &str, description: &str, default_value: bool) -> bool;
}
