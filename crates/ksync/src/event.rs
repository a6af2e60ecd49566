//! Sticky broadcast event flags.
//!
//! An [`EventFlags`] word is a 32-bit set of conditions shared by all
//! threads. Bits are *sticky*: once set, a bit stays observable until it is
//! explicitly cleared by a masked update or a reset-on-observe wait, so a
//! waiter that arrives after the setter still sees the condition
//! (level-triggered semantics). This is what makes the word usable as a
//! one-shot startup barrier regardless of thread startup order.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::timeout::Timeout;

/// Bit set carried by an [`EventFlags`] word.
pub type EventMask = u32;

struct Shared {
    word: Mutex<EventMask>,
    waiters: Condvar,
}

/// Sticky, multi-bit broadcast signal with blocking wait.
///
/// Cloned handles share the same underlying word. All updates happen under
/// one internal lock, so a reader never observes a set or clear in progress.
pub struct EventFlags {
    shared: Arc<Shared>,
}

impl EventFlags {
    /// Creates a new flag word with all bits clear.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                word: Mutex::new(0),
                waiters: Condvar::new(),
            }),
        }
    }

    /// ORs `bits` into the word and wakes every waiter whose condition is
    /// now satisfied. Idempotent; setting an already-set bit is a no-op.
    pub fn set(&self, bits: EventMask) {
        let mut word = self.shared.word.lock();
        *word |= bits;
        self.shared.waiters.notify_all();
    }

    /// Sets the bits selected by `mask` to the value of `bits`, leaving all
    /// other bits untouched: the word becomes `(word & !mask) | (bits & mask)`
    /// in a single locked update.
    ///
    /// This is how a thread toggles one bit on a cadence without disturbing
    /// a barrier bit that other threads still rely on.
    pub fn set_masked(&self, bits: EventMask, mask: EventMask) {
        let mut word = self.shared.word.lock();
        *word = (*word & !mask) | (bits & mask);
        self.shared.waiters.notify_all();
    }

    /// Blocks until at least one bit in `bits` is set, or `timeout` elapses.
    ///
    /// Returns the observed subset of `bits`, or `None` on timeout; a
    /// timeout is an ordinary outcome, not an error. If a requested bit is
    /// already set the call returns without suspending.
    ///
    /// When `reset_on_observe` is true, a successful observation atomically
    /// clears the **entire word** (every bit, not just the awaited ones)
    /// before returning. Callers that share the word with sticky barrier
    /// bits must not use the reset form unless every thread has already
    /// passed those barriers.
    pub fn wait(
        &self,
        bits: EventMask,
        reset_on_observe: bool,
        timeout: Timeout,
    ) -> Option<EventMask> {
        let deadline = timeout.deadline();
        let mut word = self.shared.word.lock();
        loop {
            let observed = *word & bits;
            if observed != 0 {
                if reset_on_observe {
                    *word = 0;
                }
                return Some(observed);
            }
            match deadline {
                None => self.shared.waiters.wait(&mut word),
                Some(at) => {
                    if self.shared.waiters.wait_until(&mut word, at).timed_out() {
                        // One last check: the condition may have become true
                        // in the same instant the deadline expired.
                        let observed = *word & bits;
                        if observed != 0 {
                            if reset_on_observe {
                                *word = 0;
                            }
                            return Some(observed);
                        }
                        return None;
                    }
                }
            }
        }
    }

    /// Current value of the word.
    pub fn snapshot(&self) -> EventMask {
        *self.shared.word.lock()
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventFlags {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}
