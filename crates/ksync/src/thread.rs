//! Static thread table.
//!
//! Threads are declared once, before any of them runs, as a fixed table of
//! descriptors: name, priority, stack allocation, optional startup delay,
//! and body. The table is then handed to the host scheduler in a single
//! spawn pass. There is no dynamic spawn, resize, or teardown afterwards;
//! a thread whose body returns simply stays terminated.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

/// Default per-thread stack allocation.
pub const DEFAULT_STACK_SIZE: usize = 64 * 1024;

/// Scheduling priority for a table entry.
///
/// Convention: a **higher value is more urgent**: a ready thread with a
/// higher priority preempts a running thread with a lower one. On hosts
/// without strict fixed-priority scheduling the value orders thread release
/// (highest spawned first) and documents intent for real-time ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadPriority(pub u8);

/// Thread body function type.
pub type ThreadBody = Box<dyn FnOnce() + Send + 'static>;

/// One entry of the static thread table.
pub struct ThreadSpec {
    name: &'static str,
    priority: ThreadPriority,
    stack_size: usize,
    start_delay: Duration,
    body: ThreadBody,
}

impl ThreadSpec {
    /// Creates a descriptor with the default stack size and no start delay.
    pub fn new(name: &'static str, priority: ThreadPriority, body: ThreadBody) -> Self {
        Self {
            name,
            priority,
            stack_size: DEFAULT_STACK_SIZE,
            start_delay: Duration::ZERO,
            body,
        }
    }

    /// Sets the stack allocation for this thread.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = bytes;
        self
    }

    /// Delays the body's first instruction by `delay` after spawn.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Thread name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Thread priority.
    pub fn priority(&self) -> ThreadPriority {
        self.priority
    }
}

/// Errors raised while building or spawning the thread table.
#[derive(Debug, Error)]
pub enum ThreadTableError {
    /// A descriptor with the same name is already registered.
    #[error("thread {0:?} already registered")]
    DuplicateName(&'static str),
    /// The host refused to spawn a thread.
    #[error("failed to spawn thread {name:?}")]
    Spawn {
        name: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Builder collecting descriptors before the table is frozen.
pub struct ThreadTableBuilder {
    specs: Vec<ThreadSpec>,
}

impl ThreadTableBuilder {
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// Registers a descriptor, rejecting duplicate names.
    pub fn register(mut self, spec: ThreadSpec) -> Result<Self, ThreadTableError> {
        if self.specs.iter().any(|existing| existing.name == spec.name) {
            return Err(ThreadTableError::DuplicateName(spec.name));
        }
        self.specs.push(spec);
        Ok(self)
    }

    /// Freezes the table, ordered by descending priority.
    pub fn build(mut self) -> ThreadTable {
        self.specs
            .sort_by(|a, b| b.priority.cmp(&a.priority));
        ThreadTable { specs: self.specs }
    }
}

impl Default for ThreadTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Frozen thread table, ready for a one-shot spawn pass.
pub struct ThreadTable {
    specs: Vec<ThreadSpec>,
}

impl ThreadTable {
    pub fn builder() -> ThreadTableBuilder {
        ThreadTableBuilder::new()
    }

    /// Number of registered threads.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if no threads are registered.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Registered names in release order (most urgent first).
    pub fn names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.name).collect()
    }

    /// Hands every descriptor to the host scheduler, most urgent first.
    ///
    /// A start delay is served inside the spawned thread, so a delayed entry
    /// occupies its table slot immediately but touches nothing until the
    /// delay has elapsed.
    pub fn spawn(self) -> Result<Vec<JoinHandle<()>>, ThreadTableError> {
        let mut handles = Vec::with_capacity(self.specs.len());
        for spec in self.specs {
            let ThreadSpec {
                name,
                priority,
                stack_size,
                start_delay,
                body,
            } = spec;
            log::debug!("spawning thread {name:?} (priority {})", priority.0);
            let handle = thread::Builder::new()
                .name(name.to_string())
                .stack_size(stack_size)
                .spawn(move || {
                    if !start_delay.is_zero() {
                        thread::sleep(start_delay);
                    }
                    body();
                })
                .map_err(|source| ThreadTableError::Spawn { name, source })?;
            handles.push(handle);
        }
        Ok(handles)
    }
}
