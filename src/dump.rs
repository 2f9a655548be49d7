use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use stopwatch2::Stopwatch;

use crate::{
    error::DumpError,
    flags::DumpType,
    platform::{DumpRequest, DumpSource, Platform},
    MemoryCallback,
};

/// Selects which workflow is used to write a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DumpMode {
    /// Write the dump directly from the live process.
    #[default]
    Live,
    /// Capture a snapshot of the process first and write the dump from it.
    Snapshot,
}

/// Returns the path a dump of the given process is written to.
///
/// This is `dest/filename` if a file name is given and `dest/<pid>.dmp` otherwise.
#[must_use]
pub fn dump_path(pid: u32, dest: impl AsRef<Path>, filename: Option<&OsStr>) -> PathBuf {
    match filename {
        Some(filename) => dest.as_ref().join(filename),
        None => dest.as_ref().join(format!("{pid}.dmp")),
    }
}

/// Writes a full-memory dump of the given process using the given workflow.
pub fn dump<P: Platform + ?Sized>(
    platform: &P,
    mode: DumpMode,
    pid: u32,
    dest: impl AsRef<Path>,
    filename: Option<&OsStr>,
) -> Result<PathBuf, DumpError> {
    match mode {
        DumpMode::Live => dump_process(platform, pid, dest, filename),
        DumpMode::Snapshot => dump_process_from_snapshot(platform, pid, dest, filename),
    }
}

/// Writes a full-memory dump of the live process to `dest/<pid>.dmp` (or `dest/filename`) and returns that path.
///
/// # Note
/// If the dump engine fails, the destination file has already been created and is not removed
/// (see [`DumpError::leftover_file`]).
pub fn dump_process<P: Platform + ?Sized>(
    platform: &P,
    pid: u32,
    dest: impl AsRef<Path>,
    filename: Option<&OsStr>,
) -> Result<PathBuf, DumpError> {
    let mut stopwatch = Stopwatch::default();
    stopwatch.start();

    let process = platform.open_process(pid)?;
    let path = dump_path(pid, dest, filename);
    let file = platform.create_file(&path)?;

    let request = DumpRequest {
        source: DumpSource::Process(&process),
        pid,
        file: &file,
        path: &path,
        dump_type: DumpType::WITH_FULL_MEMORY,
        callback: None,
    };
    write(platform, &request)?;

    stopwatch.stop();
    log::info!(
        "wrote minidump of process {} to {} in {:?}",
        pid,
        path.display(),
        stopwatch.elapsed()
    );
    Ok(path)
}

/// Captures a snapshot of the process, writes a full-memory dump of the snapshot to `dest/<pid>.dmp`
/// (or `dest/filename`) and returns that path.
///
/// The snapshot is released after the file is closed and before the process handle is.
///
/// # Note
/// If the dump engine fails, the destination file has already been created and is not removed
/// (see [`DumpError::leftover_file`]).
pub fn dump_process_from_snapshot<P: Platform + ?Sized>(
    platform: &P,
    pid: u32,
    dest: impl AsRef<Path>,
    filename: Option<&OsStr>,
) -> Result<PathBuf, DumpError> {
    let mut stopwatch = Stopwatch::default();
    stopwatch.start();

    let process = platform.open_process(pid)?;
    let snapshot = platform.capture_snapshot(&process, pid)?;
    log::debug!("captured snapshot of process {} after {:?}", pid, stopwatch.elapsed());

    let path = dump_path(pid, dest, filename);
    let file = platform.create_file(&path)?;

    let request = DumpRequest {
        source: DumpSource::Snapshot(&snapshot),
        pid,
        file: &file,
        path: &path,
        dump_type: DumpType::WITH_FULL_MEMORY,
        callback: Some(MemoryCallback::new()),
    };
    write(platform, &request)?;

    stopwatch.stop();
    log::info!(
        "wrote minidump of snapshot of process {} to {} in {:?}",
        pid,
        path.display(),
        stopwatch.elapsed()
    );
    Ok(path)
}

fn write<P: Platform + ?Sized>(platform: &P, request: &DumpRequest<'_, P>) -> Result<(), DumpError> {
    log::debug!(
        "writing minidump of process {} from {:?} to {}",
        request.pid,
        request.source.kind(),
        request.path.display()
    );
    platform.write_dump(request).map_err(|err| {
        if let Some(path) = err.leftover_file() {
            log::warn!("dump failed, {} may be empty or incomplete", path.display());
        }
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_name_is_pid() {
        assert_eq!(dump_path(1234, ".", None), Path::new(".").join("1234.dmp"));
        assert_eq!(
            dump_path(1234, "dumps", Some(OsStr::new("app.dmp"))),
            Path::new("dumps").join("app.dmp")
        );
    }

    #[test]
    fn default_mode_is_live() {
        assert_eq!(DumpMode::default(), DumpMode::Live);
    }
}
