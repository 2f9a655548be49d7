use std::{
    ffi::{c_void, OsStr},
    os::windows::prelude::{AsRawHandle, RawHandle},
    path::{Path, PathBuf},
    ptr,
};

use winapi::{
    shared::minwindef::{BOOL, FALSE, TRUE},
    um::errhandlingapi::GetLastError,
};

use crate::{
    dump::{dump_process, dump_process_from_snapshot},
    error::DumpError,
    platform::{DumpRequest, Platform},
    MemoryCallback,
};

mod ffi;
use ffi::{MINIDUMP_CALLBACK_INFORMATION, MINIDUMP_CALLBACK_INPUT, MINIDUMP_CALLBACK_OUTPUT};

mod process;
pub use process::*;

mod snapshot;
pub use snapshot::*;

mod file;
pub use file::*;

/// The windows implementation of [`Platform`], backed by kernel32 and dbghelp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WindowsPlatform;

impl Platform for WindowsPlatform {
    type RawHandle = RawHandle;
    type Process = OwnedProcess;
    type Snapshot = OwnedSnapshot;
    type File = OwnedDumpFile;

    fn open_process(&self, pid: u32) -> Result<OwnedProcess, DumpError> {
        OwnedProcess::from_pid(pid)
    }

    fn capture_snapshot(&self, process: &OwnedProcess, _pid: u32) -> Result<OwnedSnapshot, DumpError> {
        OwnedSnapshot::capture(process)
    }

    fn create_file(&self, path: &Path) -> Result<OwnedDumpFile, DumpError> {
        OwnedDumpFile::create(path)
    }

    fn write_dump(&self, request: &DumpRequest<'_, Self>) -> Result<(), DumpError> {
        // lives on this frame until MiniDumpWriteDump returns
        let callback = request.callback;
        let callback_info = callback.as_ref().map(|callback| MINIDUMP_CALLBACK_INFORMATION {
            CallbackRoutine: Some(memory_callback_routine),
            CallbackParam: (callback as *const MemoryCallback).cast_mut().cast(),
        });
        let callback_info_ptr = callback_info
            .as_ref()
            .map_or(ptr::null(), |info| info as *const MINIDUMP_CALLBACK_INFORMATION);

        let result = unsafe {
            ffi::MiniDumpWriteDump(
                request.source.raw_handle().cast(),
                request.pid,
                request.file.as_raw_handle().cast(),
                request.dump_type.bits(),
                ptr::null_mut(),
                ptr::null_mut(),
                callback_info_ptr,
            )
        };
        if result == FALSE {
            let code = unsafe { GetLastError() };
            return Err(DumpError::DumpWrite {
                pid: request.pid,
                path: request.path.to_path_buf(),
                code,
            });
        }
        Ok(())
    }
}

/// Trampoline handed to the dump engine, forwards each event to the [`MemoryCallback`] passed as parameter.
unsafe extern "system" fn memory_callback_routine(
    callback_param: *mut c_void,
    callback_input: *const MINIDUMP_CALLBACK_INPUT,
    callback_output: *mut MINIDUMP_CALLBACK_OUTPUT,
) -> BOOL {
    if callback_input.is_null() || callback_output.is_null() {
        return TRUE;
    }

    let callback = if callback_param.is_null() {
        MemoryCallback::new()
    } else {
        unsafe { *callback_param.cast::<MemoryCallback>() }
    };

    let callback_type = unsafe { ptr::addr_of!((*callback_input).CallbackType).read_unaligned() };
    let status_ptr = unsafe { ptr::addr_of_mut!((*callback_output).Status) };
    let mut status = unsafe { status_ptr.read_unaligned() };
    let proceed = callback.on_event(callback_type, &mut status);
    unsafe { status_ptr.write_unaligned(status) };

    if proceed {
        TRUE
    } else {
        FALSE
    }
}

/// Writes a full-memory dump of the live process with the given id to `dest/<pid>.dmp` (or `dest/filename`).
pub fn create_minidump(
    pid: u32,
    dest: impl AsRef<Path>,
    filename: Option<&OsStr>,
) -> Result<PathBuf, DumpError> {
    dump_process(&WindowsPlatform, pid, dest, filename)
}

/// Writes a full-memory dump of a snapshot of the process with the given id to `dest/<pid>.dmp` (or `dest/filename`).
pub fn create_minidump_from_snapshot(
    pid: u32,
    dest: impl AsRef<Path>,
    filename: Option<&OsStr>,
) -> Result<PathBuf, DumpError> {
    dump_process_from_snapshot(&WindowsPlatform, pid, dest, filename)
}
