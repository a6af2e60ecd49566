//! Console relay for blinker toggle records.
//!
//! Blinkers never print; they queue a small owned record and move on.
//! Draining runs on its own thread, so console latency is paid at that
//! thread's priority instead of the blinkers'.

use std::sync::Arc;

use hal::Console;
use ksync::{MessageQueue, Timeout};

/// One toggle notification, created per publish and dropped after
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    /// Blinker that produced the record.
    pub source_id: u8,
    /// The blinker's cycle counter at publish time.
    pub sequence: u32,
}

fn render(record: &LogRecord) -> String {
    format!(
        "toggled led{}; counter={}",
        record.source_id, record.sequence
    )
}

/// Drains the record queue onto a console, forever.
pub struct LogDrain {
    records: MessageQueue<LogRecord>,
    console: Arc<dyn Console>,
}

impl LogDrain {
    pub fn new(records: MessageQueue<LogRecord>, console: Arc<dyn Console>) -> Self {
        Self { records, console }
    }

    /// Thread body: drain one record at a time, forever.
    pub fn run(self) {
        loop {
            self.pump(Timeout::Forever);
        }
    }

    /// Drains a single record. Returns false if `timeout` elapsed with the
    /// queue still empty.
    pub fn pump(&self, timeout: Timeout) -> bool {
        match self.records.get(timeout) {
            Some(record) => {
                self.console.emit_line(&render(&record));
                true
            }
            None => false,
        }
    }
}
