use std::{os::windows::prelude::RawHandle, ptr};

use winapi::{
    shared::minwindef::DWORD,
    um::processsnapshot::{PssCaptureSnapshot, PssFreeSnapshot, HPSS},
};

use crate::{
    error::DumpError,
    flags::{CaptureFlags, ContextFlags},
    platform::AsDumpHandle,
};

use super::OwnedProcess;

/// A point-in-time clone of a process captured with `PssCaptureSnapshot`.
///
/// The snapshot is independent of the process handle it was captured from and is freed on drop
/// on behalf of the current process.
#[derive(Debug)]
pub struct OwnedSnapshot {
    handle: HPSS,
    pid: u32,
}

unsafe impl Send for OwnedSnapshot {}
unsafe impl Sync for OwnedSnapshot {}

impl OwnedSnapshot {
    /// Captures a snapshot of the given process using [`CaptureFlags::FULL`] and [`ContextFlags::ALL`].
    pub fn capture(process: &OwnedProcess) -> Result<Self, DumpError> {
        let pid = process.pid();
        // the guard owns whatever was written to the slot, even on failure
        let (snapshot, status) = Self::capture_raw(process);
        if status != 0 {
            return Err(DumpError::SnapshotCapture { pid, code: status });
        }

        log::debug!("captured snapshot {:?} of process {}", snapshot.handle, pid);
        Ok(snapshot)
    }

    fn capture_raw(process: &OwnedProcess) -> (Self, DWORD) {
        let mut handle: HPSS = ptr::null_mut();
        let status = unsafe {
            PssCaptureSnapshot(
                process.as_dump_handle().cast(),
                CaptureFlags::FULL.bits(),
                ContextFlags::ALL.bits(),
                &mut handle,
            )
        };
        (
            Self {
                handle,
                pid: process.pid(),
            },
            status,
        )
    }

    /// Frees the snapshot and clears the slot. Returns `None` if the slot was already empty.
    fn release(&mut self) -> Option<DWORD> {
        if self.handle.is_null() {
            return None;
        }

        let status =
            unsafe { PssFreeSnapshot(OwnedProcess::raw_current_handle().cast(), self.handle) };
        self.handle = ptr::null_mut();
        Some(status)
    }

    /// Returns the id of the process this snapshot was captured from.
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }
}

impl AsDumpHandle<RawHandle> for OwnedSnapshot {
    fn as_dump_handle(&self) -> RawHandle {
        self.handle.cast()
    }
}

impl Drop for OwnedSnapshot {
    fn drop(&mut self) {
        match self.release() {
            None => {}
            Some(0) => log::debug!("freed snapshot of process {}", self.pid),
            Some(status) => log::error!(
                "failed to free snapshot of process {}, err={}",
                self.pid,
                status
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use winapi::um::winnt::{PROCESS_ALL_ACCESS, PROCESS_QUERY_LIMITED_INFORMATION};

    use super::*;
    use crate::DumpErrorKind;

    #[test]
    fn capture_without_clone_rights_fails() {
        let pid = std::process::id();
        let process = OwnedProcess::open(pid, PROCESS_QUERY_LIMITED_INFORMATION).unwrap();

        let err = OwnedSnapshot::capture(&process).unwrap_err();
        assert_eq!(err.kind(), DumpErrorKind::SnapshotCapture);
        assert_ne!(err.code(), 0);

        let (mut snapshot, status) = OwnedSnapshot::capture_raw(&process);
        assert_ne!(status, 0);
        assert!(snapshot.handle.is_null());
        assert_eq!(snapshot.release(), None);
    }

    #[test]
    fn empty_slot_is_not_freed() {
        let mut snapshot = OwnedSnapshot {
            handle: ptr::null_mut(),
            pid: 1,
        };
        assert_eq!(snapshot.release(), None);
        assert_eq!(snapshot.release(), None);
    }

    #[test]
    fn release_frees_once() {
        let pid = std::process::id();
        let process = OwnedProcess::open(pid, PROCESS_ALL_ACCESS).unwrap();

        let mut snapshot = OwnedSnapshot::capture(&process).unwrap();
        drop(process);
        assert!(!snapshot.handle.is_null());
        assert_eq!(snapshot.pid(), pid);

        assert_eq!(snapshot.release(), Some(0));
        assert!(snapshot.handle.is_null());
        assert_eq!(snapshot.release(), None);
    }
}
