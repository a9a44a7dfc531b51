/*!
 * Output Sinks
 *
 * Where workers write their single line. The sink is shared by all workers;
 * ordering between workers comes from the signals, not from the sink.
 */

use parking_lot::Mutex;
use std::io::{self, Write};

/// Destination for worker lines
pub trait OutputSink: Send + Sync {
    /// Write one complete line (without trailing newline)
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Writes lines to standard output, flushing after each one
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }
}

/// Collects lines in memory, in the order they were written
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines.into_inner()
    }
}

impl OutputSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.write_line("0: hello!").unwrap();
        sink.write_line("1: world!").unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.into_lines(), vec!["0: hello!", "1: world!"]);
    }
}
