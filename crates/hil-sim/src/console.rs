//! Operator console on standard output.
//!
//! Status lines and command feedback go to stdout; diagnostics go through
//! `tracing` to stderr, so the two never interleave mid-line.

use std::io::{self, Write};

use hil_core::command::Notice;
use hil_core::runner::{Console, status_line};
use hil_types::Sample;
use tracing::warn;

/// Prints one line per tick and one line per operator notice.
#[derive(Debug, Default)]
pub struct StdoutConsole {
    write_failed: bool,
}

impl StdoutConsole {
    /// Create a console.
    pub const fn new() -> Self {
        Self {
            write_failed: false,
        }
    }

    fn emit(&mut self, line: &str) {
        if self.write_failed {
            return;
        }
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            // Typically a closed pipe; keep running, stop writing.
            warn!(error = %e, "stdout unavailable, console output disabled");
            self.write_failed = true;
        }
    }
}

impl Console for StdoutConsole {
    fn on_sample(&mut self, sample: &Sample) {
        self.emit(&status_line(sample));
    }

    fn on_notice(&mut self, notice: &Notice) {
        self.emit(&notice.to_string());
    }
}

/// Print the startup instructions.
pub fn print_instructions() {
    println!("Commands: 'pause', 'resume', 'amp <value>', 'freq <value>', 'noise <value>', 'stop'");
    println!("Enter commands during simulation...");
}
