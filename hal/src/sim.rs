//! Simulated backends for host runs and tests.
//!
//! [`SimLine`] stands in for a GPIO output line: it records every write,
//! can be constructed unready or configure-rejecting to exercise failure
//! paths, and can share a [`WriteLog`] with other lines so tests can assert
//! on cross-line write ordering. [`CaptureConsole`] collects emitted lines.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::console::Console;
use crate::error::{HalError, HalResult};
use crate::gpio::{Direction, Level, OutputLine};

/// Journal of writes shared by several lines, in wall-clock order.
#[derive(Clone, Default)]
pub struct WriteLog {
    entries: Arc<Mutex<Vec<(&'static str, Level)>>>,
}

impl WriteLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(line label, level)` pairs in write order.
    pub fn entries(&self) -> Vec<(&'static str, Level)> {
        self.entries.lock().clone()
    }

    fn record(&self, label: &'static str, level: Level) {
        self.entries.lock().push((label, level));
    }
}

struct LineState {
    direction: Option<Direction>,
    level: Level,
    writes: Vec<Level>,
}

impl Default for LineState {
    fn default() -> Self {
        Self {
            direction: None,
            level: Level::Low,
            writes: Vec::new(),
        }
    }
}

/// Simulated output line.
pub struct SimLine {
    label: &'static str,
    ready: bool,
    reject: Option<i32>,
    state: Mutex<LineState>,
    log: Option<WriteLog>,
}

impl SimLine {
    /// A line whose device is ready and configures cleanly.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            ready: true,
            reject: None,
            state: Mutex::new(LineState::default()),
            log: None,
        }
    }

    /// A line whose device reports not-ready.
    pub fn unready(label: &'static str) -> Self {
        Self {
            ready: false,
            ..Self::new(label)
        }
    }

    /// A ready line whose configure call fails with the given driver code.
    pub fn rejecting(label: &'static str, code: i32) -> Self {
        Self {
            reject: Some(code),
            ..Self::new(label)
        }
    }

    /// Attaches a shared journal that receives every write.
    pub fn with_log(mut self, log: WriteLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Line label used in journals and trace output.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Current driven level.
    pub fn level(&self) -> Level {
        self.state.lock().level
    }

    /// Every level written so far, in order.
    pub fn writes(&self) -> Vec<Level> {
        self.state.lock().writes.clone()
    }

    /// Number of writes so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes.len()
    }

    /// Configured direction, if any.
    pub fn direction(&self) -> Option<Direction> {
        self.state.lock().direction
    }
}

impl OutputLine for SimLine {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn configure(&self, direction: Direction) -> HalResult<()> {
        if !self.ready {
            return Err(HalError::NotReady);
        }
        if let Some(code) = self.reject {
            return Err(HalError::ConfigRejected(code));
        }
        self.state.lock().direction = Some(direction);
        Ok(())
    }

    fn set_level(&self, level: Level) -> HalResult<()> {
        let mut state = self.state.lock();
        if state.direction != Some(Direction::Output) {
            return Err(HalError::NotConfigured);
        }
        state.level = level;
        state.writes.push(level);
        drop(state);

        log::trace!("{} <- {:?}", self.label, level);
        if let Some(log) = &self.log {
            log.record(self.label, level);
        }
        Ok(())
    }
}

/// Console that stores emitted lines for later inspection.
#[derive(Clone, Default)]
pub struct CaptureConsole {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines emitted so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Console for CaptureConsole {
    fn emit_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_line_records_writes() {
        let line = SimLine::new("led0");
        line.configure(Direction::Output).unwrap();

        line.set_level(Level::High).unwrap();
        line.set_level(Level::Low).unwrap();

        assert_eq!(line.level(), Level::Low);
        assert_eq!(line.writes(), vec![Level::High, Level::Low]);
        assert_eq!(line.direction(), Some(Direction::Output));
    }

    #[test]
    fn unready_line_refuses_configuration() {
        let line = SimLine::unready("led1");
        assert!(!line.is_ready());
        assert_eq!(
            line.configure(Direction::Output),
            Err(HalError::NotReady)
        );
    }

    #[test]
    fn rejecting_line_reports_driver_code() {
        let line = SimLine::rejecting("led2", -22);
        assert!(line.is_ready());
        assert_eq!(
            line.configure(Direction::Output),
            Err(HalError::ConfigRejected(-22))
        );
    }

    #[test]
    fn write_before_configure_fails() {
        let line = SimLine::new("led3");
        assert_eq!(line.set_level(Level::High), Err(HalError::NotConfigured));
        assert_eq!(line.write_count(), 0);
    }

    #[test]
    fn shared_journal_preserves_cross_line_order() {
        let journal = WriteLog::new();
        let first = SimLine::new("led0").with_log(journal.clone());
        let second = SimLine::new("led1").with_log(journal.clone());
        first.configure(Direction::Output).unwrap();
        second.configure(Direction::Output).unwrap();

        first.set_level(Level::High).unwrap();
        second.set_level(Level::High).unwrap();
        first.set_level(Level::Low).unwrap();

        assert_eq!(
            journal.entries(),
            vec![
                ("led0", Level::High),
                ("led1", Level::High),
                ("led0", Level::Low),
            ]
        );
    }

    #[test]
    fn capture_console_collects_lines() {
        let console = CaptureConsole::new();
        console.emit_line("first");
        console.emit_line("second");
        assert_eq!(console.lines(), vec!["first", "second"]);
    }
}
