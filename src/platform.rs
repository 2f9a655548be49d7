use std::{fmt::Debug, path::Path};

use crate::{error::DumpError, flags::DumpType, MemoryCallback};

/// Access to the raw handle that the dump engine operates on.
pub trait AsDumpHandle<H> {
    /// Returns the underlying handle without transferring ownership.
    fn as_dump_handle(&self) -> H;
}

/// The operating system services a dump workflow is built from.
///
/// Every handle type returned from here owns its resource and releases it exactly once when dropped.
pub trait Platform {
    /// The raw handle type understood by the dump engine.
    type RawHandle: Copy + Debug;
    /// An owned handle to a process.
    type Process: AsDumpHandle<Self::RawHandle> + Debug;
    /// An owned handle to a point-in-time snapshot of a process.
    type Snapshot: AsDumpHandle<Self::RawHandle> + Debug;
    /// An owned handle to the destination file.
    type File: Debug;

    /// Opens the process with the given id with full access rights.
    fn open_process(&self, pid: u32) -> Result<Self::Process, DumpError>;

    /// Clones the address space, handle table and thread contexts of the given process.
    fn capture_snapshot(
        &self,
        process: &Self::Process,
        pid: u32,
    ) -> Result<Self::Snapshot, DumpError>;

    /// Creates the file at the given path for reading and writing, truncating an existing one.
    fn create_file(&self, path: &Path) -> Result<Self::File, DumpError>;

    /// Hands the request to the dump engine and blocks until it is done.
    fn write_dump(&self, request: &DumpRequest<'_, Self>) -> Result<(), DumpError>;
}

/// The kind of source a dump is written from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// The live process.
    Process,
    /// A snapshot of the process.
    Snapshot,
}

/// A source the dump engine can write a dump from.
#[derive(Debug)]
pub enum DumpSource<'a, P: Platform + ?Sized> {
    /// The live process.
    Process(&'a P::Process),
    /// A snapshot of the process.
    Snapshot(&'a P::Snapshot),
}

impl<P: Platform + ?Sized> Clone for DumpSource<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Platform + ?Sized> Copy for DumpSource<'_, P> {}

impl<P: Platform + ?Sized> DumpSource<'_, P> {
    /// Returns the handle the dump engine should read from.
    #[must_use]
    pub fn raw_handle(&self) -> P::RawHandle {
        match self {
            Self::Process(process) => process.as_dump_handle(),
            Self::Snapshot(snapshot) => snapshot.as_dump_handle(),
        }
    }

    /// Returns the kind of this source.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Process(_) => SourceKind::Process,
            Self::Snapshot(_) => SourceKind::Snapshot,
        }
    }
}

/// Arguments of a single dump engine invocation.
#[derive(Debug)]
pub struct DumpRequest<'a, P: Platform + ?Sized> {
    /// The handle the dump is read from.
    pub source: DumpSource<'a, P>,
    /// The id of the dumped process.
    pub pid: u32,
    /// The destination file.
    pub file: &'a P::File,
    /// The path of the destination file, used for error reporting.
    pub path: &'a Path,
    /// The minidump type flags.
    pub dump_type: DumpType,
    /// Callback the engine consults while writing, if any.
    pub callback: Option<MemoryCallback>,
}
