//! Log capture
//!
//! A `log::Log` implementation that keeps the most recent records in a
//! fixed-capacity ring buffer, so tests can assert on what the control code
//! logged. When full, the oldest record is evicted and counted as overflow.

use std::fmt::Write;
use std::sync::Mutex;

use heapless::{HistoryBuf, String};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Capture capacity in number of records
pub const CAPTURE_SIZE: usize = 128;

/// Maximum message size in bytes; longer messages are truncated
pub const CAPTURE_MSG_SIZE: usize = 192;

/// One captured log record
#[derive(Debug, Clone)]
pub struct CapturedRecord {
    pub level: Level,
    pub message: String<CAPTURE_MSG_SIZE>,
}

struct CaptureBuffer {
    buffer: HistoryBuf<CapturedRecord, CAPTURE_SIZE>,
    overflow_count: u32,
}

/// Ring buffer logger
pub struct LogCapture {
    inner: Mutex<CaptureBuffer>,
}

static CAPTURE: LogCapture = LogCapture::new();

impl LogCapture {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(CaptureBuffer {
                buffer: HistoryBuf::new(),
                overflow_count: 0,
            }),
        }
    }

    /// Install the process-wide capture logger at debug level.
    ///
    /// Safe to call repeatedly; only the first call installs it. If some
    /// other logger was installed first, the returned capture stays empty.
    pub fn install() -> &'static LogCapture {
        if log::set_logger(&CAPTURE).is_ok() {
            log::set_max_level(LevelFilter::Debug);
        }
        &CAPTURE
    }

    /// Captured records, oldest first.
    pub fn records(&self) -> Vec<CapturedRecord> {
        match self.inner.lock() {
            Ok(inner) => inner.buffer.oldest_ordered().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// True if a record at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }

    /// Number of records evicted because the buffer was full.
    pub fn overflow_count(&self) -> u32 {
        self.inner.lock().map(|i| i.overflow_count).unwrap_or(0)
    }

    /// Drop every captured record. Does not reset the overflow count.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.buffer.clear();
        }
    }
}

impl Default for LogCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for LogCapture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut message = String::new();
        // Truncated on overflow
        let _ = write!(message, "{}", record.args());

        if let Ok(mut inner) = self.inner.lock() {
            if inner.buffer.len() == CAPTURE_SIZE {
                inner.overflow_count = inner.overflow_count.saturating_add(1);
            }
            inner.buffer.write(CapturedRecord {
                level: record.level(),
                message,
            });
        }
    }

    fn flush(&self) {}
}
