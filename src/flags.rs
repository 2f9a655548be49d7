use std::{fmt, ops::BitOr};

#[cfg(windows)]
use winapi::um::{
    processsnapshot::{
        PSS_CAPTURE_HANDLES, PSS_CAPTURE_HANDLE_BASIC_INFORMATION,
        PSS_CAPTURE_HANDLE_NAME_INFORMATION, PSS_CAPTURE_HANDLE_TRACE,
        PSS_CAPTURE_HANDLE_TYPE_SPECIFIC_INFORMATION, PSS_CAPTURE_THREADS,
        PSS_CAPTURE_THREAD_CONTEXT, PSS_CAPTURE_THREAD_CONTEXT_EXTENDED, PSS_CAPTURE_VA_CLONE,
        PSS_CREATE_BREAKAWAY, PSS_CREATE_BREAKAWAY_OPTIONAL, PSS_CREATE_RELEASE_SECTION,
        PSS_CREATE_USE_VM_ALLOCATIONS,
    },
    winnt::{CONTEXT_CONTROL, CONTEXT_DEBUG_REGISTERS, CONTEXT_FLOATING_POINT, CONTEXT_INTEGER},
};

macro_rules! bitset {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u32);

        impl $name {
            /// Returns an empty set.
            #[must_use]
            pub const fn empty() -> Self {
                Self(0)
            }

            #[allow(dead_code)]
            #[must_use]
            pub(crate) const fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            /// Returns the raw bits of this set.
            #[must_use]
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Returns whether all bits of `other` are set in `self`.
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Returns the union of both sets.
            #[must_use]
            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:#010x})", stringify!($name), self.0)
            }
        }
    };
}

#[cfg(windows)]
bitset! {
    /// Flags passed to `PssCaptureSnapshot` selecting what gets cloned into the snapshot.
    CaptureFlags
}

#[cfg(windows)]
impl CaptureFlags {
    /// Clone the virtual address space.
    pub const VA_CLONE: Self = Self(PSS_CAPTURE_VA_CLONE);
    /// Capture the handle table.
    pub const HANDLES: Self = Self(PSS_CAPTURE_HANDLES);
    /// Capture the names of the captured handles.
    pub const HANDLE_NAME_INFO: Self = Self(PSS_CAPTURE_HANDLE_NAME_INFORMATION);
    /// Capture basic information about the captured handles.
    pub const HANDLE_BASIC_INFO: Self = Self(PSS_CAPTURE_HANDLE_BASIC_INFORMATION);
    /// Capture type specific information about the captured handles.
    pub const HANDLE_TYPE_INFO: Self = Self(PSS_CAPTURE_HANDLE_TYPE_SPECIFIC_INFORMATION);
    /// Capture the handle trace.
    pub const HANDLE_TRACE: Self = Self(PSS_CAPTURE_HANDLE_TRACE);
    /// Capture the thread list.
    pub const THREADS: Self = Self(PSS_CAPTURE_THREADS);
    /// Capture the register context of every thread.
    pub const THREAD_CONTEXT: Self = Self(PSS_CAPTURE_THREAD_CONTEXT);
    /// Capture the extended (XSTATE) register context of every thread.
    pub const THREAD_CONTEXT_EXTENDED: Self = Self(PSS_CAPTURE_THREAD_CONTEXT_EXTENDED);
    /// Break away from the job of the target if allowed.
    pub const BREAKAWAY_OPTIONAL: Self = Self(PSS_CREATE_BREAKAWAY_OPTIONAL);
    /// Break away from the job of the target.
    pub const BREAKAWAY: Self = Self(PSS_CREATE_BREAKAWAY);
    /// Use virtual memory allocations for the snapshot buffers.
    pub const USE_VM_ALLOCATIONS: Self = Self(PSS_CREATE_USE_VM_ALLOCATIONS);
    /// Release the section of the cloned address space when the snapshot is freed.
    pub const RELEASE_SECTION: Self = Self(PSS_CREATE_RELEASE_SECTION);

    /// The fixed capture set used for snapshot dumps: address space, handle table with all metadata,
    /// threads with extended register context.
    pub const FULL: Self = Self::VA_CLONE
        .union(Self::HANDLES)
        .union(Self::HANDLE_NAME_INFO)
        .union(Self::HANDLE_BASIC_INFO)
        .union(Self::HANDLE_TYPE_INFO)
        .union(Self::HANDLE_TRACE)
        .union(Self::THREADS)
        .union(Self::THREAD_CONTEXT)
        .union(Self::THREAD_CONTEXT_EXTENDED)
        .union(Self::BREAKAWAY)
        .union(Self::BREAKAWAY_OPTIONAL)
        .union(Self::USE_VM_ALLOCATIONS)
        .union(Self::RELEASE_SECTION);
}

#[cfg(windows)]
bitset! {
    /// `CONTEXT_*` selector for which parts of the thread register state get captured,
    /// using the layout of the target architecture.
    ContextFlags
}

#[cfg(windows)]
impl ContextFlags {
    /// Control registers.
    pub const CONTROL: Self = Self(CONTEXT_CONTROL);
    /// Integer registers.
    pub const INTEGER: Self = Self(CONTEXT_INTEGER);
    /// Floating point registers.
    pub const FLOATING_POINT: Self = Self(CONTEXT_FLOATING_POINT);
    /// Debug registers.
    pub const DEBUG_REGISTERS: Self = Self(CONTEXT_DEBUG_REGISTERS);

    /// Control, integer, floating point and debug registers.
    pub const ALL: Self = Self::CONTROL
        .union(Self::INTEGER)
        .union(Self::FLOATING_POINT)
        .union(Self::DEBUG_REGISTERS);
}

bitset! {
    /// `MINIDUMP_TYPE` flags passed to the dump engine.
    DumpType
}

impl DumpType {
    /// Only the information needed to capture stack traces.
    pub const NORMAL: Self = Self(0x0000_0000);
    /// Include all accessible memory of the process.
    pub const WITH_FULL_MEMORY: Self = Self(0x0000_0002);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(windows)]
    #[test]
    fn full_capture_flags() {
        assert_eq!(CaptureFlags::FULL.bits(), 0xac00_03fd);
        assert!(CaptureFlags::FULL.contains(CaptureFlags::VA_CLONE | CaptureFlags::THREAD_CONTEXT));
        assert!(!CaptureFlags::FULL.contains(CaptureFlags::from_bits(0x2)));
    }

    #[cfg(windows)]
    #[test]
    fn context_all_matches_winnt() {
        let all = ContextFlags::ALL;
        assert_eq!(
            all.bits(),
            CONTEXT_CONTROL | CONTEXT_INTEGER | CONTEXT_FLOATING_POINT | CONTEXT_DEBUG_REGISTERS
        );
        assert!(all.contains(ContextFlags::DEBUG_REGISTERS));
        assert!(all.contains(ContextFlags::FLOATING_POINT));
    }

    #[cfg(all(windows, target_arch = "x86_64"))]
    #[test]
    fn context_all_uses_amd64_layout() {
        assert_eq!(ContextFlags::FLOATING_POINT.bits(), 0x0010_0008);
        assert_eq!(ContextFlags::DEBUG_REGISTERS.bits(), 0x0010_0010);
        assert_eq!(ContextFlags::ALL.bits(), 0x0010_001b);
    }

    #[test]
    fn debug_output() {
        assert_eq!(
            format!("{:?}", DumpType::WITH_FULL_MEMORY),
            "DumpType(0x00000002)"
        );
        assert_eq!(DumpType::default(), DumpType::NORMAL);
        assert!(DumpType::WITH_FULL_MEMORY.contains(DumpType::from_bits(0x2)));
    }
}
