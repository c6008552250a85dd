//! Generation counter for discarding superseded initialization attempts.
//!
//! Every initialization attempt *mints* a token before its suspension point
//! and compares that token against the current generation after resuming.
//! If another attempt (or a teardown) has minted a newer token in the
//! meantime, the resumed continuation is *stale* and must produce no side
//! effects.
//!
//! This is cancel-by-ignoring: the in-flight asynchronous work itself is
//! never aborted, only its result is discarded.  It gives strict
//! last-initialization-wins ordering under rapid re-attachment without any
//! coordination beyond a single atomic integer.
//!
//! The counter uses `AtomicU64` with relaxed ordering: tokens are compared
//! for equality only and carry no memory-synchronization duties.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing generation counter.
///
/// Tokens start at 1 (the zero generation means "never initialized") and
/// increase by 1 per mint.  Wraps at `u64::MAX` without panicking.
///
/// # Examples
///
/// ```rust
/// use remoteapp_core::generation::InitGeneration;
///
/// let generation = InitGeneration::new();
/// let first = generation.mint();
/// let second = generation.mint();
/// assert!(!generation.is_current(first));
/// assert!(generation.is_current(second));
/// ```
#[derive(Debug, Default)]
pub struct InitGeneration {
    inner: AtomicU64,
}

impl InitGeneration {
    /// Creates a counter with no generation minted yet.
    pub fn new() -> Self {
        Self {
            inner: AtomicU64::new(0),
        }
    }

    /// Mints a new generation token and returns it.
    ///
    /// The returned token is current until the next call to [`mint`] or
    /// [`invalidate`].
    ///
    /// [`mint`]: InitGeneration::mint
    /// [`invalidate`]: InitGeneration::invalidate
    pub fn mint(&self) -> u64 {
        self.inner.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Advances the generation without beginning a new attempt, so that any
    /// token minted earlier becomes stale.
    ///
    /// Used by teardown to ensure a still-pending initialization cannot
    /// install a session handle after detach.
    pub fn invalidate(&self) {
        self.inner.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns `true` when `token` is the most recently minted generation.
    pub fn is_current(&self, token: u64) -> bool {
        self.inner.load(Ordering::Relaxed) == token
    }

    /// Returns the current generation value, for logging and diagnostics.
    pub fn current(&self) -> u64 {
        self.inner.load(Ordering::Relaxed)
    }
}
