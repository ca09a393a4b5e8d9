//! Timer control capability

use serde::{Deserialize, Serialize};

/// The phase the hosting timer is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    NotRunning,
    Running,
    Paused,
    Ended,
}

impl TimerState {
    /// Decodes the raw state word the host reports
    pub fn from_raw(raw: u32) -> Option<TimerState> {
        match raw {
            0 => Some(TimerState::NotRunning),
            1 => Some(TimerState::Running),
            2 => Some(TimerState::Paused),
            3 => Some(TimerState::Ended),
            _ => None,
        }
    }

    /// The raw state word for this phase
    pub fn as_raw(self) -> u32 {
        match self {
            TimerState::NotRunning => 0,
            TimerState::Running => 1,
            TimerState::Paused => 2,
            TimerState::Ended => 3,
        }
    }
}

/// Control surface of the hosting timer.
///
/// Splitting and resetting policy lives in the driving loop; this trait
/// only forwards its decisions to the host.
pub trait Timer {
    /// The state the timer currently is in
    fn state(&self) -> TimerState;

    /// Starts the timer
    fn start(&mut self);

    /// Splits the current segment
    fn split(&mut self);

    /// Resets the timer
    fn reset(&mut self);

    /// Sets a custom key/value pair for visualization
    fn set_variable(&mut self, key: &str, value: &str);

    /// Sets the game time
    fn set_game_time(&mut self, secs: i64, nanos: i32);

    /// Pauses the automatic flow of game time, without pausing the timer
    fn pause_game_time(&mut self);

    /// Resumes the automatic flow of game time
    fn resume_game_time(&mut self);
}
