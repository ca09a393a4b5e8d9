//! Process capability surface: liveness, module resolution, raw reads
//!
//! [`ProcessMemory`] is the seam between watchers and the operating
//! system. Each method is a single synchronous call; failure is reported
//! through the returned `WatchResult`, never by panicking across the
//! boundary. Platform backends live in cfg-gated submodules and are
//! re-exported as [`NativeProcess`] for the running target.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(windows)]
mod windows;

#[cfg(target_os = "linux")]
pub use linux::LinuxProcess;
#[cfg(target_os = "linux")]
pub use linux::LinuxProcess as NativeProcess;
#[cfg(windows)]
pub use windows::WindowsProcess;
#[cfg(windows)]
pub use windows::WindowsProcess as NativeProcess;

use crate::core::types::{Address, ProcessId, WatchError, WatchResult};
use sysinfo::{PidExt, ProcessExt, System, SystemExt};
use tracing::{debug, info};

/// Read-only view of a running process.
///
/// Watchers receive an implementation by reference on every update; they
/// never own it and never mutate the process. Liveness is a capability of
/// this layer and is queried by the driving loop, not by watchers.
pub trait ProcessMemory {
    /// Whether the process is still running and attachable
    fn is_open(&self) -> bool;

    /// Resolves a module name to its current base address.
    ///
    /// Module bases can move between attaches, so callers resolve on every
    /// tick. "Not found" and "not yet loaded" are indistinguishable here.
    fn module_address(&self, module: &str) -> WatchResult<Address>;

    /// Resolves a module name to its size in bytes
    fn module_size(&self, module: &str) -> WatchResult<u64>;

    /// Reads exactly `buf.len()` bytes at an absolute address.
    ///
    /// Either the whole buffer is filled or an error is returned; partial
    /// reads are failures.
    fn read_exact(&self, address: Address, buf: &mut [u8]) -> WatchResult<()>;
}

/// Finds the pid of the first running process with the given name
pub fn pid_of(name: &str) -> WatchResult<ProcessId> {
    let mut sys = System::new_all();
    sys.refresh_processes();

    let pid = sys
        .processes_by_name(name)
        .map(|process| process.pid().as_u32())
        .next()
        .ok_or_else(|| WatchError::ProcessNotFound(name.to_string()))?;
    debug!(name, pid, "resolved process name");
    Ok(pid)
}

/// Attaches to a process by name, returning the native backend for this
/// platform. Detach is dropping the returned value.
#[cfg(any(target_os = "linux", windows))]
pub fn attach(name: &str) -> WatchResult<NativeProcess> {
    let pid = pid_of(name)?;
    let process = NativeProcess::open(pid)?;
    info!(name, pid, "attached to process");
    Ok(process)
}
