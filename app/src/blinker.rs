//! LED-toggling actor with three yielding policies.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hal::{HalResult, Level, OutputLine};
use ksync::{EventFlags, EventMask, MessageQueue, Timeout};

use crate::logger::LogRecord;
use crate::signals::INIT_DONE;

/// How a blinker paces itself once past the startup barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkMode {
    /// Flip the line as fast as possible with no suspension point at all.
    ///
    /// This thread never invokes a blocking primitive;
    /// it only keeps blinking because the preemptive host scheduler
    /// forcibly deschedules it in favor of higher-priority ready threads.
    /// Registered below its peers for exactly that reason.
    Busy,
    /// Toggle, publish a log record, then sleep one period.
    Periodic {
        /// Event bit to mirror the counter's parity into, if this blinker
        /// owns one. Published with a masked update so the rest of the
        /// word, notably the startup barrier, is left intact.
        publish: Option<EventMask>,
    },
    /// Like `Periodic`, but additionally gated on another blinker's bit.
    Gated {
        /// Bit to wait for: once before the loop (level-triggered), then
        /// again on every odd cycle.
        watch: EventMask,
        /// Whether the odd-cycle re-wait observes with reset semantics.
        /// With reset, each observation clears the whole flag word,
        /// including `INIT_DONE`, which is tolerable only because every
        /// thread has already passed that gate by then. Without reset the
        /// blinker free-runs as long as the watched bit stays set.
        resync_reset: bool,
    },
}

/// Immutable configuration for one blinker.
pub struct BlinkerConfig {
    /// The single output line this blinker drives.
    pub line: Arc<dyn OutputLine>,
    /// Identifier stamped into every log record.
    pub source_id: u8,
    /// Sleep length for the yielding variants.
    pub period: Duration,
    /// Yielding policy.
    pub mode: BlinkMode,
}

/// One LED-toggling thread body.
///
/// Every variant first blocks on the `INIT_DONE` barrier, so a blinker
/// whose line never came up simply waits forever and leaves the line
/// untouched.
pub struct Blinker {
    cfg: BlinkerConfig,
    events: EventFlags,
    records: MessageQueue<LogRecord>,
}

impl Blinker {
    pub fn new(cfg: BlinkerConfig, events: EventFlags, records: MessageQueue<LogRecord>) -> Self {
        Self {
            cfg,
            events,
            records,
        }
    }

    /// Runs the blinker until its line fails. A write error after
    /// successful bring-up is fail-stop: the error is logged and the
    /// thread terminates, with no retry or degraded mode.
    pub fn run(self) {
        self.events.wait(INIT_DONE, false, Timeout::Forever);

        let outcome = match self.cfg.mode {
            BlinkMode::Busy => self.run_busy(),
            BlinkMode::Periodic { publish } => self.run_periodic(publish),
            BlinkMode::Gated {
                watch,
                resync_reset,
            } => self.run_gated(watch, resync_reset),
        };

        if let Err(err) = outcome {
            log::error!("blinker {} stopped: {}", self.cfg.source_id, err);
        }
    }

    fn run_busy(&self) -> HalResult<()> {
        let mut cnt: u32 = 0;
        loop {
            self.cfg.line.set_level(Level::from(cnt % 2 == 1))?;
            cnt = cnt.wrapping_add(1);
        }
    }

    fn run_periodic(&self, publish: Option<EventMask>) -> HalResult<()> {
        let mut cnt: u32 = 0;
        loop {
            self.blink_once(cnt, publish)?;
            thread::sleep(self.cfg.period);
            cnt = cnt.wrapping_add(1);
        }
    }

    fn run_gated(&self, watch: EventMask, resync_reset: bool) -> HalResult<()> {
        self.events.wait(watch, false, Timeout::Forever);

        let mut cnt: u32 = 0;
        loop {
            if cnt % 2 == 1 {
                // Edge-triggered resynchronization. With resync_reset this
                // clears every bit in the word, INIT_DONE included; all
                // gating on that bit has already happened by now.
                self.events.wait(watch, resync_reset, Timeout::Forever);
            }
            self.blink_once(cnt, None)?;
            thread::sleep(self.cfg.period);
            cnt = cnt.wrapping_add(1);
        }
    }

    /// One cycle of the yielding variants: publish parity, drive the line,
    /// queue a record.
    fn blink_once(&self, cnt: u32, publish: Option<EventMask>) -> HalResult<()> {
        let lit = cnt % 2 == 1;
        if let Some(bit) = publish {
            self.events.set_masked(if lit { bit } else { 0 }, bit);
        }
        self.cfg.line.set_level(Level::from(lit))?;
        self.records.put(LogRecord {
            source_id: self.cfg.source_id,
            sequence: cnt,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::{Direction, SimLine};

    fn periodic(line: Arc<SimLine>, events: EventFlags, records: MessageQueue<LogRecord>) -> Blinker {
        Blinker::new(
            BlinkerConfig {
                line,
                source_id: 0,
                period: Duration::from_millis(1),
                mode: BlinkMode::Periodic { publish: None },
            },
            events,
            records,
        )
    }

    #[test]
    fn blinker_stays_blocked_until_barrier_opens() {
        let line = Arc::new(SimLine::new("led0"));
        line.configure(Direction::Output).unwrap();
        let events = EventFlags::new();
        let records = MessageQueue::new();

        let blinker = periodic(Arc::clone(&line), events.clone(), records.clone());
        thread::spawn(move || blinker.run());

        thread::sleep(Duration::from_millis(30));
        assert_eq!(line.write_count(), 0);
        assert!(records.is_empty());
    }

    #[test]
    fn write_failure_terminates_the_blinker() {
        // Line was never configured, so the first write is rejected.
        let line = Arc::new(SimLine::new("led0"));
        let events = EventFlags::new();
        events.set(INIT_DONE);
        let records = MessageQueue::new();

        let blinker = periodic(Arc::clone(&line), events, records.clone());
        let handle = thread::spawn(move || blinker.run());

        // run() returns instead of retrying.
        handle.join().unwrap();
        assert_eq!(line.write_count(), 0);
        assert!(records.is_empty());
    }
}
