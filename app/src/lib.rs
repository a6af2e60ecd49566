//! # blinkthreads
//!
//! A fixed set of statically registered threads cooperate through two
//! kernel-style primitives (a sticky event-flag word and a FIFO log queue)
//! to drive four output lines deterministically:
//!
//! - [`init::InitSequence`] brings up every line, runs a visual self-test,
//!   and opens the [`signals::INIT_DONE`] barrier (or leaves it closed
//!   forever on any configuration failure).
//! - [`blinker::Blinker`] toggles one line each, in one of three variants
//!   that differ only in how (and whether) they yield.
//! - [`logger::LogDrain`] renders the blinkers' toggle records on the
//!   console from its own thread, decoupling output latency from toggling.

pub mod blinker;
pub mod init;
pub mod logger;
pub mod signals;

pub use blinker::{BlinkMode, Blinker, BlinkerConfig};
pub use init::InitSequence;
pub use logger::{LogDrain, LogRecord};
pub use signals::{INIT_DONE, LED1_ON};
