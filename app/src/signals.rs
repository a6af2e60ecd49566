//! Event bits shared by every thread in the demo.

use ksync::EventMask;

/// Startup barrier: set exactly once, after every output line has been
/// configured and the self-test pattern has finished. All blinkers wait on
/// this bit before touching their line.
pub const INIT_DONE: EventMask = 1 << 0;

/// Mirrors the parity of the line-1 blinker's counter: set while its LED is
/// lit, cleared while dark. Published via a masked update so `INIT_DONE`
/// stays intact; consumed by the gated blinker.
pub const LED1_ON: EventMask = 1 << 1;
