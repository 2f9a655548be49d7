#![warn(
    unsafe_op_in_unsafe_fn,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    rust_2018_idioms,
    clippy::todo,
    clippy::manual_assert,
    clippy::must_use_candidate,
    clippy::inconsistent_struct_constructor,
    clippy::wrong_self_convention,
    clippy::new_without_default,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]
#![allow(
    clippy::module_inception,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::borrow_as_ptr
)]

//! Writes full-memory minidumps of windows processes, either from the live process
//! or from a point-in-time snapshot captured with `PssCaptureSnapshot`.
//!
//! Every handle involved in a dump (process, snapshot, destination file) is owned by a guard
//! and released exactly once, in reverse order of acquisition, on every exit path.

mod callback;
pub use callback::*;

mod dump;
pub use dump::*;

mod flags;
pub use flags::*;

mod platform;
pub use platform::*;

pub mod error;
pub use error::{DumpError, DumpErrorKind};

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::*;
