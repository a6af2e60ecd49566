//! Console text sink

/// Fire-and-forget line-oriented text output. No backpressure contract.
pub trait Console: Send + Sync {
    /// Emit one line of text.
    fn emit_line(&self, line: &str);
}

/// Console backed by the process's standard output.
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn emit_line(&self, line: &str) {
        println!("{line}");
    }
}
