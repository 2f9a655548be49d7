/// The callback type the dump engine raises to ask whether the source handle is a process snapshot
/// and whether module memory should be included for it.
///
/// Equals `IsProcessSnapshotCallback` in `MINIDUMP_CALLBACK_TYPE`.
pub const INCLUDE_MODULE_CALLBACK: u32 = 16;

/// Status written back for [`INCLUDE_MODULE_CALLBACK`] to request the memory to be included (`S_FALSE`).
pub const INCLUDE_STATUS: i32 = 0x0000_0001;

/// Decision logic invoked by the dump engine once per callback event while writing a dump.
///
/// An instance is built for every dump write and handed to the engine by reference,
/// it is never shared between writes and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryCallback {
    event: u32,
    decision: i32,
}

impl Default for MemoryCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCallback {
    /// Creates a callback answering [`INCLUDE_MODULE_CALLBACK`] with [`INCLUDE_STATUS`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            event: INCLUDE_MODULE_CALLBACK,
            decision: INCLUDE_STATUS,
        }
    }

    /// Returns the callback type this instance reacts to.
    #[must_use]
    pub const fn event(&self) -> u32 {
        self.event
    }

    /// Returns the status written for the reacted-to callback type.
    #[must_use]
    pub const fn decision(&self) -> i32 {
        self.decision
    }

    /// Handles a single callback event.
    ///
    /// Writes the decision into `status` if `callback_type` is the include event and leaves it untouched otherwise.
    /// Always returns `true`, the dump is never aborted from here.
    #[inline]
    pub fn on_event(&self, callback_type: u32, status: &mut i32) -> bool {
        if callback_type == self.event {
            *status = self.decision;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_include_event_is_answered() {
        let callback = MemoryCallback::new();
        let stream = [0u32, 4, 11, 12, 13, 16, 17, 3, 255, 16, u32::MAX];
        const UNTOUCHED: i32 = -0x2a;

        for callback_type in stream {
            let mut status = UNTOUCHED;
            assert!(callback.on_event(callback_type, &mut status));
            if callback_type == INCLUDE_MODULE_CALLBACK {
                assert_eq!(status, INCLUDE_STATUS, "type {callback_type}");
            } else {
                assert_eq!(status, UNTOUCHED, "type {callback_type}");
            }
        }
    }

    #[test]
    fn default_matches_constants() {
        let callback = MemoryCallback::default();
        assert_eq!(callback.event(), 16);
        assert_eq!(callback.decision(), 1);
    }
}
