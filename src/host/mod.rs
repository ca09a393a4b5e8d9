//! Pass-through host capabilities consumed by the driving loop
//!
//! Everything here is a single blocking call into the environment that
//! hosts the polling loop. None of it interacts with watcher state: the
//! watcher reads memory, the driving loop decides what the observed
//! changes mean and talks to these capabilities.

mod runtime;
mod settings;
mod timer;

pub use runtime::HostRuntime;
pub use settings::SettingsRegistry;
pub use timer::{Timer, TimerState};
