use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use blinkthreads::{
    BlinkMode, Blinker, BlinkerConfig, InitSequence, LogDrain, LogRecord, LED1_ON,
};
use hal::{Console, OutputLine, SimLine, StdoutConsole};
use ksync::{EventFlags, MessageQueue, ThreadPriority, ThreadSpec, ThreadTable};

/// Per-thread stack allocation.
const STACK_SIZE: usize = 64 * 1024;

// Higher value = more urgent. Init owns the lines until the barrier opens;
// the drain outranks the blinkers so console output never lags behind
// toggling; the busy blinker sits below its peers so the scheduler
// demonstrably preempts it.
const PRIORITY_INIT: ThreadPriority = ThreadPriority(10);
const PRIORITY_DRAIN: ThreadPriority = ThreadPriority(9);
const PRIORITY_BLINK: ThreadPriority = ThreadPriority(3);
const PRIORITY_BUSY: ThreadPriority = ThreadPriority(2);

#[derive(Parser, Debug)]
#[command(author, version, about = "Four-LED thread coordination demo")]
struct Opts {
    /// Blink period in milliseconds for the fast blinker on line 0
    #[arg(long, default_value_t = 100, value_name = "MS")]
    period0: u64,

    /// Blink period in milliseconds for the publishing blinker on line 1
    #[arg(long, default_value_t = 1000, value_name = "MS")]
    period1: u64,

    /// Blink period in milliseconds for the gated blinker on line 2
    #[arg(long, default_value_t = 200, value_name = "MS")]
    period2: u64,

    /// Start delay in milliseconds for the publishing blinker
    #[arg(long, default_value_t = 5000, value_name = "MS")]
    delay1: u64,

    /// Simulate a bring-up failure on this line index (0..=3)
    #[arg(long, value_name = "INDEX")]
    fail_line: Option<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opts = Opts::parse();

    let events = EventFlags::new();
    let records: MessageQueue<LogRecord> = MessageQueue::new();
    let console: Arc<dyn Console> = Arc::new(StdoutConsole);

    let lines: Vec<Arc<dyn OutputLine>> = ["led0", "led1", "led2", "led3"]
        .into_iter()
        .enumerate()
        .map(|(idx, label)| {
            let line = if opts.fail_line == Some(idx) {
                SimLine::unready(label)
            } else {
                SimLine::new(label)
            };
            Arc::new(line) as Arc<dyn OutputLine>
        })
        .collect();

    let init = InitSequence::new(lines.clone(), events.clone(), Arc::clone(&console));
    let drain = LogDrain::new(records.clone(), Arc::clone(&console));

    let blinker = |idx: usize, period_ms: u64, mode: BlinkMode| {
        Blinker::new(
            BlinkerConfig {
                line: Arc::clone(&lines[idx]),
                source_id: idx as u8,
                period: Duration::from_millis(period_ms),
                mode,
            },
            events.clone(),
            records.clone(),
        )
    };
    let blink0 = blinker(0, opts.period0, BlinkMode::Periodic { publish: None });
    let blink1 = blinker(
        1,
        opts.period1,
        BlinkMode::Periodic {
            publish: Some(LED1_ON),
        },
    );
    let blink2 = blinker(
        2,
        opts.period2,
        BlinkMode::Gated {
            watch: LED1_ON,
            resync_reset: true,
        },
    );
    // No period: this one never sleeps.
    let blink3 = blinker(3, 0, BlinkMode::Busy);

    let table = ThreadTable::builder()
        .register(
            ThreadSpec::new("init", PRIORITY_INIT, Box::new(move || init.run()))
                .with_stack_size(STACK_SIZE),
        )?
        .register(
            ThreadSpec::new("log-drain", PRIORITY_DRAIN, Box::new(move || drain.run()))
                .with_stack_size(STACK_SIZE),
        )?
        .register(
            ThreadSpec::new("blink0", PRIORITY_BLINK, Box::new(move || blink0.run()))
                .with_stack_size(STACK_SIZE),
        )?
        .register(
            ThreadSpec::new("blink1", PRIORITY_BLINK, Box::new(move || blink1.run()))
                .with_stack_size(STACK_SIZE)
                .with_start_delay(Duration::from_millis(opts.delay1)),
        )?
        .register(
            ThreadSpec::new("blink2", PRIORITY_BLINK, Box::new(move || blink2.run()))
                .with_stack_size(STACK_SIZE),
        )?
        .register(
            ThreadSpec::new("blink3-busy", PRIORITY_BUSY, Box::new(move || blink3.run()))
                .with_stack_size(STACK_SIZE),
        )?
        .build();

    println!(
        "blinkthreads: spawning {} threads: {}",
        table.len(),
        table.names().join(", ")
    );
    let handles = table.spawn()?;

    ctrlc::set_handler(|| {
        println!("blinkthreads: shutting down");
        std::process::exit(0);
    })?;

    // The actors run until interrupted.
    for handle in handles {
        let _ = handle.join();
    }
    Ok(())
}
