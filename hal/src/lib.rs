//! Hardware abstraction layer for the blink demo.
//!
//! The core application depends only on two narrow contracts: an output
//! line that can be configured and driven ([`gpio::OutputLine`]), and a
//! fire-and-forget text sink ([`console::Console`]). The [`sim`]
//! module provides host-side implementations of both, with failure
//! injection and write journaling for tests.

pub mod console;
pub mod error;
pub mod gpio;
pub mod sim;

pub use console::{Console, StdoutConsole};
pub use error::{HalError, HalResult};
pub use gpio::{Direction, Level, OutputLine};
pub use sim::{CaptureConsole, SimLine, WriteLog};
