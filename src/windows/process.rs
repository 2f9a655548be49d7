use std::os::windows::prelude::{AsRawHandle, FromRawHandle, OwnedHandle, RawHandle};

use winapi::{
    shared::minwindef::FALSE,
    um::{
        errhandlingapi::GetLastError,
        processthreadsapi::{GetCurrentProcess, OpenProcess},
        winnt::PROCESS_ALL_ACCESS,
    },
};

use crate::{error::DumpError, platform::AsDumpHandle};

/// A struct representing an opened process.
/// This struct owns the underlying process handle and closes it on drop.
#[derive(Debug)]
pub struct OwnedProcess {
    handle: OwnedHandle,
    pid: u32,
}

impl OwnedProcess {
    /// Opens the process with the given pid with `PROCESS_ALL_ACCESS`.
    pub fn from_pid(pid: u32) -> Result<OwnedProcess, DumpError> {
        Self::open(pid, PROCESS_ALL_ACCESS)
    }

    /// Opens the process with the given pid and the given process-specific access rights.
    pub(crate) fn open(pid: u32, access: u32) -> Result<OwnedProcess, DumpError> {
        let handle = unsafe { OpenProcess(access, FALSE, pid) };

        if handle.is_null() {
            let code = unsafe { GetLastError() };
            return Err(DumpError::ProcessAccess { pid, code });
        }

        log::debug!("opened process {pid}");
        Ok(OwnedProcess {
            handle: unsafe { OwnedHandle::from_raw_handle(handle.cast()) },
            pid,
        })
    }

    /// Returns the id of this process.
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// Returns the raw pseudo handle representing the current process.
    #[must_use]
    pub fn raw_current_handle() -> RawHandle {
        unsafe { GetCurrentProcess() }.cast()
    }
}

impl AsRawHandle for OwnedProcess {
    fn as_raw_handle(&self) -> RawHandle {
        self.handle.as_raw_handle()
    }
}

impl AsDumpHandle<RawHandle> for OwnedProcess {
    fn as_dump_handle(&self) -> RawHandle {
        self.as_raw_handle()
    }
}

impl Drop for OwnedProcess {
    fn drop(&mut self) {
        // the handle itself is closed by `OwnedHandle`
        log::debug!("closing handle of process {}", self.pid);
    }
}
