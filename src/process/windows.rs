//! Windows process backend over the psapi/kernel32 surface

use std::mem;
use std::ptr;

use tracing::debug;
use winapi::shared::minwindef::{DWORD, FALSE, HMODULE, LPVOID, MAX_PATH};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::ReadProcessMemory;
use winapi::um::processthreadsapi::{GetExitCodeProcess, OpenProcess};
use winapi::um::psapi::{EnumProcessModules, GetModuleBaseNameW, GetModuleInformation, MODULEINFO};
use winapi::um::winnt::{HANDLE, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};

use super::ProcessMemory;
use crate::core::types::{Address, ProcessId, WatchError, WatchResult};

const STILL_ACTIVE: DWORD = 259;

/// Read-only view of another process through a Windows handle.
///
/// The handle is opened with query and read access only; dropping the
/// value closes it.
pub struct WindowsProcess {
    handle: HANDLE,
    pid: ProcessId,
}

impl WindowsProcess {
    /// Opens the process for reading
    pub fn open(pid: ProcessId) -> WatchResult<Self> {
        let handle =
            unsafe { OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, FALSE, pid) };
        if handle.is_null() {
            return Err(WatchError::ProcessNotFound(format!("pid {}", pid)));
        }
        debug!(pid, "opened process handle for reading");
        Ok(WindowsProcess { handle, pid })
    }

    /// The process id this handle reads from
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Base address and image size of the named module, matched
    /// case-insensitively against the module's base name.
    fn find_module(&self, module: &str) -> WatchResult<(u64, u64)> {
        let mut modules: [HMODULE; 1024] = [ptr::null_mut(); 1024];
        let mut cb_needed: DWORD = 0;

        let ok = unsafe {
            EnumProcessModules(
                self.handle,
                modules.as_mut_ptr(),
                mem::size_of_val(&modules) as DWORD,
                &mut cb_needed,
            )
        };
        if ok == FALSE {
            return Err(WatchError::ModuleNotFound(module.to_string()));
        }

        let count = (cb_needed as usize / mem::size_of::<HMODULE>()).min(modules.len());
        for &module_handle in &modules[..count] {
            if module_handle.is_null() {
                continue;
            }

            let mut name: [u16; MAX_PATH] = [0; MAX_PATH];
            let len = unsafe {
                GetModuleBaseNameW(
                    self.handle,
                    module_handle,
                    name.as_mut_ptr(),
                    MAX_PATH as DWORD,
                )
            };
            if len == 0 {
                continue;
            }
            let name = String::from_utf16_lossy(&name[..len as usize]);
            if !name.eq_ignore_ascii_case(module) {
                continue;
            }

            let mut info: MODULEINFO = unsafe { mem::zeroed() };
            let ok = unsafe {
                GetModuleInformation(
                    self.handle,
                    module_handle,
                    &mut info,
                    mem::size_of::<MODULEINFO>() as DWORD,
                )
            };
            if ok == FALSE {
                return Err(WatchError::ModuleNotFound(module.to_string()));
            }
            return Ok((info.lpBaseOfDll as u64, info.SizeOfImage as u64));
        }

        Err(WatchError::ModuleNotFound(module.to_string()))
    }
}

impl ProcessMemory for WindowsProcess {
    fn is_open(&self) -> bool {
        let mut code: DWORD = 0;
        let ok = unsafe { GetExitCodeProcess(self.handle, &mut code) };
        ok != FALSE && code == STILL_ACTIVE
    }

    fn module_address(&self, module: &str) -> WatchResult<Address> {
        self.find_module(module).map(|(base, _)| Address::new(base))
    }

    fn module_size(&self, module: &str) -> WatchResult<u64> {
        self.find_module(module).map(|(_, size)| size)
    }

    fn read_exact(&self, address: Address, buf: &mut [u8]) -> WatchResult<()> {
        let mut bytes_read: usize = 0;
        let ok = unsafe {
            ReadProcessMemory(
                self.handle,
                address.as_u64() as usize as LPVOID,
                buf.as_mut_ptr() as LPVOID,
                buf.len(),
                &mut bytes_read,
            )
        };
        if ok == FALSE || bytes_read != buf.len() {
            return Err(WatchError::read_failed(
                address,
                buf.len(),
                "ReadProcessMemory failed",
            ));
        }
        Ok(())
    }
}

impl Drop for WindowsProcess {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe {
                CloseHandle(self.handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_pid_fails() {
        assert!(WindowsProcess::open(0).is_err());
    }

    #[test]
    fn test_open_self() {
        let process =
            WindowsProcess::open(std::process::id()).expect("own process must open");
        assert_eq!(process.pid(), std::process::id());
        assert!(process.is_open());
    }

    #[test]
    fn test_read_own_memory() {
        let marker: u32 = 0xDEADBEEF;
        let process = WindowsProcess::open(std::process::id()).unwrap();

        let mut buf = [0u8; 4];
        process
            .read_exact(Address::new(&marker as *const u32 as u64), &mut buf)
            .expect("reading own stack must succeed");
        assert_eq!(u32::from_le_bytes(buf), 0xDEADBEEF);
    }

    #[test]
    fn test_finds_kernel32() {
        let process = WindowsProcess::open(std::process::id()).unwrap();
        let base = process.module_address("kernel32.dll").unwrap();
        assert!(!base.is_null());
        assert!(process.module_size("kernel32.dll").unwrap() > 0);
    }
}
