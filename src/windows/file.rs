use std::{
    os::windows::prelude::{AsRawHandle, FromRawHandle, OwnedHandle, RawHandle},
    path::{Path, PathBuf},
    ptr,
};

use widestring::U16CString;
use winapi::{
    shared::winerror::ERROR_INVALID_NAME,
    um::{
        errhandlingapi::GetLastError,
        fileapi::{CreateFileW, CREATE_ALWAYS},
        handleapi::INVALID_HANDLE_VALUE,
        winnt::{FILE_ATTRIBUTE_NORMAL, GENERIC_READ, GENERIC_WRITE},
    },
};

use crate::error::DumpError;

/// The destination file of a dump.
/// This struct owns the underlying file handle and closes it on drop.
#[derive(Debug)]
pub struct OwnedDumpFile {
    handle: OwnedHandle,
    path: PathBuf,
}

impl OwnedDumpFile {
    /// Creates the file at the given path for reading and writing.
    /// An existing file is truncated.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, DumpError> {
        let path = path.as_ref();
        let wide_path = U16CString::from_os_str(path).map_err(|_| DumpError::FileCreate {
            path: path.to_path_buf(),
            code: ERROR_INVALID_NAME,
        })?;

        let handle = unsafe {
            CreateFileW(
                wide_path.as_ptr(),
                GENERIC_READ | GENERIC_WRITE,
                0,
                ptr::null_mut(),
                CREATE_ALWAYS,
                FILE_ATTRIBUTE_NORMAL,
                ptr::null_mut(),
            )
        };
        if handle == INVALID_HANDLE_VALUE {
            let code = unsafe { GetLastError() };
            return Err(DumpError::FileCreate {
                path: path.to_path_buf(),
                code,
            });
        }

        log::debug!("created dump file {}", path.display());
        Ok(Self {
            handle: unsafe { OwnedHandle::from_raw_handle(handle.cast()) },
            path: path.to_path_buf(),
        })
    }

    /// Returns the path this file was created at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRawHandle for OwnedDumpFile {
    fn as_raw_handle(&self) -> RawHandle {
        self.handle.as_raw_handle()
    }
}

impl Drop for OwnedDumpFile {
    fn drop(&mut self) {
        log::debug!("closing dump file {}", self.path.display());
    }
}
