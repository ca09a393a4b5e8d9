//! Linux process backend over the proc filesystem

use std::fs::{self, File};
use std::os::unix::fs::FileExt;
use std::path::Path;

use tracing::debug;

use super::ProcessMemory;
use crate::core::types::{Address, ProcessId, WatchError, WatchResult};

/// Read-only view of another process through `/proc`.
///
/// Raw reads go through `/proc/<pid>/mem`; module bases and sizes come
/// from `/proc/<pid>/maps`. Dropping the value detaches.
pub struct LinuxProcess {
    pid: ProcessId,
    mem: File,
}

impl LinuxProcess {
    /// Opens the process for reading.
    ///
    /// Fails if the pid does not exist or if ptrace access to it is
    /// denied. Reading the calling process itself is always permitted.
    pub fn open(pid: ProcessId) -> WatchResult<Self> {
        let mem = File::open(format!("/proc/{}/mem", pid))?;
        debug!(pid, "opened /proc mem for reading");
        Ok(LinuxProcess { pid, mem })
    }

    /// The process id this handle reads from
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Lowest mapping start and total extent of the named module.
    ///
    /// A file's segments map separately (text, rodata, data), so the base
    /// is the minimum start and the size spans to the maximum end across
    /// every mapping of that file.
    fn module_range(&self, module: &str) -> WatchResult<(u64, u64)> {
        let maps = fs::read_to_string(format!("/proc/{}/maps", self.pid))?;
        let mut start = u64::MAX;
        let mut end = 0u64;

        for line in maps.lines() {
            // Mapped files carry an absolute path in the last column;
            // anonymous and special mappings ([heap], [stack]) do not.
            let Some(idx) = line.find('/') else { continue };
            let name = line[idx..].rsplit('/').next().unwrap_or("");
            if name != module {
                continue;
            }
            let Some(range) = line.split_whitespace().next() else { continue };
            let Some((lo, hi)) = range.split_once('-') else { continue };
            let (Ok(lo), Ok(hi)) = (u64::from_str_radix(lo, 16), u64::from_str_radix(hi, 16))
            else {
                continue;
            };
            start = start.min(lo);
            end = end.max(hi);
        }

        if start == u64::MAX {
            return Err(WatchError::ModuleNotFound(module.to_string()));
        }
        Ok((start, end - start))
    }
}

impl ProcessMemory for LinuxProcess {
    fn is_open(&self) -> bool {
        Path::new(&format!("/proc/{}", self.pid)).exists()
    }

    fn module_address(&self, module: &str) -> WatchResult<Address> {
        self.module_range(module)
            .map(|(start, _)| Address::new(start))
    }

    fn module_size(&self, module: &str) -> WatchResult<u64> {
        self.module_range(module).map(|(_, size)| size)
    }

    fn read_exact(&self, address: Address, buf: &mut [u8]) -> WatchResult<()> {
        self.mem
            .read_exact_at(buf, address.as_u64())
            .map_err(|err| WatchError::read_failed(address, buf.len(), err.to_string()))
    }
}
