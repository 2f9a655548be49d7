//! Error types reported by the dump workflows.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error enum for failures of the dump workflows.
///
/// Every variant carries the numeric status or error code that the platform reported at the point of failure.
#[derive(Debug, Error)]
pub enum DumpError {
    /// The target process could not be opened (unknown pid, missing privileges or denied access mask).
    #[error("failed to open process {pid}, err={code}")]
    ProcessAccess {
        /// The id of the process that was requested.
        pid: u32,
        /// The last os error reported by the platform.
        code: u32,
    },
    /// The platform refused to capture a snapshot of the target process.
    #[error("failed to capture snapshot of process {pid}, err={code}")]
    SnapshotCapture {
        /// The id of the snapshotted process.
        pid: u32,
        /// The status returned by the capture call.
        code: u32,
    },
    /// The destination file could not be created.
    #[error("failed to create dump file {}, err={code}", .path.display())]
    FileCreate {
        /// The destination path.
        path: PathBuf,
        /// The last os error reported by the platform.
        code: u32,
    },
    /// The dump engine reported a failure while writing the dump.
    ///
    /// # Note
    /// The file at `path` has already been created at this point and is left behind as a zero-byte or partial artifact.
    #[error("failed to write minidump of process {pid} to {}, err={code} ({code:#010x})", .path.display())]
    DumpWrite {
        /// The id of the dumped process.
        pid: u32,
        /// The destination path that may contain a partial dump.
        path: PathBuf,
        /// The last error reported by the dump engine.
        code: u32,
    },
}

/// The kind of a [`DumpError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DumpErrorKind {
    /// See [`DumpError::ProcessAccess`].
    ProcessAccess,
    /// See [`DumpError::SnapshotCapture`].
    SnapshotCapture,
    /// See [`DumpError::FileCreate`].
    FileCreate,
    /// See [`DumpError::DumpWrite`].
    DumpWrite,
}

impl DumpError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> DumpErrorKind {
        match self {
            Self::ProcessAccess { .. } => DumpErrorKind::ProcessAccess,
            Self::SnapshotCapture { .. } => DumpErrorKind::SnapshotCapture,
            Self::FileCreate { .. } => DumpErrorKind::FileCreate,
            Self::DumpWrite { .. } => DumpErrorKind::DumpWrite,
        }
    }

    /// Returns the numeric os code carried by this error.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::ProcessAccess { code, .. }
            | Self::SnapshotCapture { code, .. }
            | Self::FileCreate { code, .. }
            | Self::DumpWrite { code, .. } => *code,
        }
    }

    /// Returns the path of a file this error left behind, if any.
    #[must_use]
    pub fn leftover_file(&self) -> Option<&Path> {
        match self {
            Self::DumpWrite { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_write_message_contains_code() {
        let err = DumpError::DumpWrite {
            pid: 1234,
            path: PathBuf::from("1234.dmp"),
            code: 0x8007_012b,
        };
        let message = err.to_string();
        assert!(message.contains("2147942699"), "{message}");
        assert!(message.contains("0x8007012b"), "{message}");
        assert!(message.contains("1234"), "{message}");
    }

    #[test]
    fn kind_and_code() {
        let err = DumpError::ProcessAccess { pid: 9_999_999, code: 87 };
        assert_eq!(err.kind(), DumpErrorKind::ProcessAccess);
        assert_eq!(err.code(), 87);
        assert!(err.leftover_file().is_none());

        let err = DumpError::SnapshotCapture { pid: 1, code: 5 };
        assert_eq!(err.kind(), DumpErrorKind::SnapshotCapture);
        assert_eq!(err.to_string(), "failed to capture snapshot of process 1, err=5");
    }

    #[test]
    fn only_dump_write_leaves_a_file() {
        let err = DumpError::FileCreate {
            path: PathBuf::from("x.dmp"),
            code: 5,
        };
        assert!(err.leftover_file().is_none());

        let err = DumpError::DumpWrite {
            pid: 1,
            path: PathBuf::from("x.dmp"),
            code: 5,
        };
        assert_eq!(err.leftover_file(), Some(Path::new("x.dmp")));
    }
}
