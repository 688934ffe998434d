use std::io::{Write, stdout};

use log::warn;

/// Destination for helper output the user should see.
pub trait OutputSink: Send + Sync {
    fn display(&self, line: &str);
}

/// Writes lines unmodified to the hosting process's stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn display(&self, line: &str) {
        write_line(&mut stdout().lock(), line);
    }
}

/// A closed stdout must not take the launch down with it.
pub(crate) fn write_line(out: &mut impl Write, line: &str) {
    if let Err(e) = writeln!(out, "{line}") {
        warn!("Failed to display debug proxy output: {e}");
    }
}
