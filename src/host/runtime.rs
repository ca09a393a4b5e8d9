//! Runtime environment capability

/// Surface of the environment hosting the polling loop.
pub trait HostRuntime {
    /// Sets how many times per second the polling entry point runs
    fn set_tick_rate(&mut self, ticks_per_second: f64);

    /// Prints a log message for debugging purposes
    fn print_message(&self, message: &str);

    /// Name of the operating system the host runs on, e.g. `windows`,
    /// `linux`, `macos`
    fn os(&self) -> String;

    /// Name of the architecture the host runs on, e.g. `x86`, `x86_64`,
    /// `arm`, `aarch64`
    fn arch(&self) -> String;
}
