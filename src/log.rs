use std::{
    io::{self, Write},
    sync::{Mutex, PoisonError},
};

use tracing::warn;

/// Destination for status lines from concurrently running diners.
///
/// Each call must appear intact on its own line; the order between calls
/// from different threads is unspecified.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Serializes lines onto any writer behind one lock.
pub struct WriterSink<W> {
    out: Mutex<W>,
}

pub type StdoutSink = WriterSink<io::Stdout>;

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StdoutSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, line: &str) {
        // A writer that panicked mid-line has still released the lock
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            warn!(error = %e, line, "status line dropped");
        }
    }
}

/// Keeps every line in memory, in the order the lock was taken.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
    }
}
