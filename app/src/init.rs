//! One-shot bring-up sequence.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hal::{Console, Direction, HalError, HalResult, Level, OutputLine};
use ksync::EventFlags;

use crate::signals::INIT_DONE;

/// Delay between self-test steps.
const STEP_DELAY: Duration = Duration::from_millis(200);
/// Pause between the rising and falling self-test passes.
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Configures every output line, drives a visual self-test, then opens the
/// startup barrier.
///
/// Runs once at the highest priority in the thread table, so it has the
/// lines to itself until it publishes `INIT_DONE`. If any line is unready
/// or refuses configuration the sequence aborts early and the barrier stays
/// closed forever: every blinker remains blocked and every line idle. That
/// fail-stop is the whole error story: there is no retry and no partial
/// start.
pub struct InitSequence {
    lines: Vec<Arc<dyn OutputLine>>,
    events: EventFlags,
    console: Arc<dyn Console>,
    step_delay: Duration,
    settle_delay: Duration,
}

impl InitSequence {
    pub fn new(
        lines: Vec<Arc<dyn OutputLine>>,
        events: EventFlags,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            lines,
            events,
            console,
            step_delay: STEP_DELAY,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Overrides the self-test pacing. Tests shrink these to keep runs
    /// fast; the pattern itself is unchanged.
    pub fn with_delays(mut self, step: Duration, settle: Duration) -> Self {
        self.step_delay = step;
        self.settle_delay = settle;
        self
    }

    /// Thread body. Performs no further work after the barrier opens.
    pub fn run(self) {
        if self.bring_up().is_err() {
            // Error already reported; INIT_DONE stays clear and every
            // waiter blocks forever.
            return;
        }
        self.events.set(INIT_DONE);
    }

    /// Configures each line in index order, then walks the self-test
    /// pattern: all lines high in rising index order, settle, all low in
    /// falling order, settle.
    fn bring_up(&self) -> HalResult<()> {
        for (idx, line) in self.lines.iter().enumerate() {
            if !line.is_ready() {
                self.console
                    .emit_line(&format!("error: line {idx} device is not ready"));
                return Err(HalError::NotReady);
            }
            if let Err(err) = line.configure(Direction::Output) {
                self.console
                    .emit_line(&format!("error: failed to configure line {idx}: {err}"));
                return Err(err);
            }
            line.set_level(Level::High)?;
            thread::sleep(self.step_delay);
        }
        thread::sleep(self.settle_delay);

        for line in self.lines.iter().rev() {
            line.set_level(Level::Low)?;
            thread::sleep(self.step_delay);
        }
        thread::sleep(self.settle_delay);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::{CaptureConsole, SimLine};

    fn fast(init: InitSequence) -> InitSequence {
        init.with_delays(Duration::from_millis(1), Duration::from_millis(1))
    }

    fn as_dyn(line: &Arc<SimLine>) -> Arc<dyn OutputLine> {
        Arc::clone(line) as Arc<dyn OutputLine>
    }

    #[test]
    fn successful_bring_up_opens_the_barrier() {
        let lines: Vec<Arc<SimLine>> = ["led0", "led1"]
            .into_iter()
            .map(|label| Arc::new(SimLine::new(label)))
            .collect();
        let events = EventFlags::new();

        let init = fast(InitSequence::new(
            lines.iter().map(as_dyn).collect(),
            events.clone(),
            Arc::new(CaptureConsole::new()),
        ));
        init.run();

        assert_eq!(events.snapshot(), INIT_DONE);
        for line in &lines {
            assert_eq!(line.writes(), vec![Level::High, Level::Low]);
        }
    }

    #[test]
    fn unready_device_keeps_the_barrier_closed() {
        let ok = Arc::new(SimLine::new("led0"));
        let broken = Arc::new(SimLine::unready("led1"));
        let events = EventFlags::new();
        let console = CaptureConsole::new();

        let init = fast(InitSequence::new(
            vec![as_dyn(&ok), as_dyn(&broken)],
            events.clone(),
            Arc::new(console.clone()),
        ));
        init.run();

        assert_eq!(events.snapshot(), 0);
        assert_eq!(console.lines(), vec!["error: line 1 device is not ready"]);
        // The failure stopped the walk mid-pattern.
        assert_eq!(ok.writes(), vec![Level::High]);
        assert_eq!(broken.write_count(), 0);
    }

    #[test]
    fn rejected_configuration_keeps_the_barrier_closed() {
        let broken = Arc::new(SimLine::rejecting("led0", -22));
        let events = EventFlags::new();
        let console = CaptureConsole::new();

        let init = fast(InitSequence::new(
            vec![as_dyn(&broken)],
            events.clone(),
            Arc::new(console.clone()),
        ));
        init.run();

        assert_eq!(events.snapshot(), 0);
        assert_eq!(
            console.lines(),
            vec!["error: failed to configure line 0: pin configuration rejected (code -22)"]
        );
    }
}
