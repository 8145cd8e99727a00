//! Thread affinity checks.
//!
//! The mock tree lives on the editor's UI thread and a form lives on the
//! device's UI thread. Neither may be mutated from anywhere else. Objects
//! capture a [`ThreadAffinity`] when they are created and verify it on every
//! mutation when checks are enabled.
//!
//! ```
//! use horizon_blockform_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.is_same_thread());
//! affinity.assert_same_thread();
//! ```

use std::thread::ThreadId;

/// Thread affinity tracker for objects.
///
/// Records the thread on which an object was created and verifies that
/// subsequent operations occur on the same thread.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
    enabled: bool,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a tracker bound to the current thread, with checks enabled in
    /// debug builds.
    #[inline]
    pub fn current() -> Self {
        Self::with_checks(cfg!(debug_assertions))
    }

    /// Create a tracker bound to the current thread with explicit checking.
    #[inline]
    pub fn with_checks(enabled: bool) -> Self {
        Self {
            thread_id: std::thread::current().id(),
            enabled,
        }
    }

    /// The thread the object belongs to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Whether checks are active.
    #[inline]
    pub fn checks_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the caller is on the owning thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panics if checks are enabled and the caller is on another thread.
    #[inline]
    #[track_caller]
    pub fn assert_same_thread(&self) {
        if self.enabled && !self.is_same_thread() {
            panic_wrong_thread(self.thread_id);
        }
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn panic_wrong_thread(owner: ThreadId) -> ! {
    let current = std::thread::current();
    let location = std::panic::Location::caller();
    panic!(
        "thread affinity violation at {location}: object belongs to thread {owner:?}, \
         accessed from \"{}\" ({:?}). Hand results back to the owning UI thread before \
         mutating trees, stores or forms.",
        current.name().unwrap_or("<unnamed>"),
        current.id()
    )
}
