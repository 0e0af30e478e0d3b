//! # Diagnostics Sinks
//!
//! Structured log interface injected into every component.
//!
//! ```text
//! component ──report()──> SharedSink ──┬──> TracingSink  (tracing events)
//!                                      ├──> ScreenLog    (debug builds only)
//!                                      └──> MemorySink   (tests)
//! ```

use castaway_shared::NetMode;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Expected outcome worth tracing (e.g. a requirement rejection).
    Info,
    /// Unexpected input that was discarded.
    Warning,
    /// Contract violation by a caller (e.g. an out-of-range index).
    Error,
}

impl Severity {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One structured diagnostic record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the record.
    pub severity: Severity,
    /// Stable dotted code, e.g. `resource.component_out_of_range`.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Side of the connection that produced the record, if known.
    pub side: Option<NetMode>,
}

impl Diagnostic {
    /// Creates a record.
    #[must_use]
    pub fn new(severity: Severity, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            side: None,
        }
    }

    /// Info-level record.
    #[must_use]
    pub fn info(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Warning-level record.
    #[must_use]
    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Error-level record.
    #[must_use]
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Tags the record with the reporting side.
    #[must_use]
    pub fn on(mut self, side: NetMode) -> Self {
        self.side = Some(side);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Some(side) => write!(f, "[{}] {} (on {side})", self.code, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Destination for diagnostics.
///
/// Implementations must be cheap to call from the simulation thread.
pub trait DiagnosticsSink: Send + Sync {
    /// Records one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink handle shared between components.
pub type SharedSink = Arc<dyn DiagnosticsSink>;

/// Forwards diagnostics to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        let side = diagnostic.side.map_or("unknown", NetMode::side);
        match diagnostic.severity {
            Severity::Info => {
                tracing::info!(code = diagnostic.code, side, "{}", diagnostic.message);
            }
            Severity::Warning => {
                tracing::warn!(code = diagnostic.code, side, "{}", diagnostic.message);
            }
            Severity::Error => {
                tracing::error!(code = diagnostic.code, side, "{}", diagnostic.message);
            }
        }
    }
}

/// Keeps every diagnostic in memory. Used by tests and tools.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sink behind an `Arc`.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Copy of all records so far.
    #[must_use]
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// Codes of all records in order.
    #[must_use]
    pub fn codes(&self) -> Vec<&'static str> {
        self.records.lock().iter().map(|d| d.code).collect()
    }

    /// Number of records with `code`.
    #[must_use]
    pub fn count_code(&self, code: &str) -> usize {
        self.records.lock().iter().filter(|d| d.code == code).count()
    }

    /// Number of records at `severity`.
    #[must_use]
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Drops all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl DiagnosticsSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        self.records.lock().push(diagnostic);
    }
}

/// A message queued for on-screen display.
#[derive(Clone, Debug)]
pub struct ScreenMessage {
    /// Rendered text.
    pub text: String,
    /// Severity, for colouring.
    pub severity: Severity,
    posted: Instant,
}

/// Bounded queue of on-screen debug messages.
///
/// Messages expire after `display_time`; the oldest message is dropped when
/// the queue is full.
#[derive(Debug)]
pub struct ScreenLog {
    capacity: usize,
    display_time: Duration,
    messages: Mutex<VecDeque<ScreenMessage>>,
}

impl ScreenLog {
    /// Default on-screen lifetime of a message.
    pub const DEFAULT_DISPLAY_TIME: Duration = Duration::from_secs(5);

    /// Creates a log holding at most `capacity` messages.
    #[must_use]
    pub fn new(capacity: usize, display_time: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            display_time,
            messages: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Messages still on screen, oldest first.
    #[must_use]
    pub fn visible(&self) -> Vec<ScreenMessage> {
        let mut messages = self.messages.lock();
        let display_time = self.display_time;
        messages.retain(|m| m.posted.elapsed() < display_time);
        messages.iter().cloned().collect()
    }

    /// Number of queued messages, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl Default for ScreenLog {
    fn default() -> Self {
        Self::new(32, Self::DEFAULT_DISPLAY_TIME)
    }
}

impl DiagnosticsSink for ScreenLog {
    fn report(&self, diagnostic: Diagnostic) {
        let mut messages = self.messages.lock();
        if messages.len() == self.capacity {
            messages.pop_front();
        }
        messages.push_back(ScreenMessage {
            text: diagnostic.to_string(),
            severity: diagnostic.severity,
            posted: Instant::now(),
        });
    }
}

/// Forwards each diagnostic to several sinks.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<SharedSink>,
}

impl FanoutSink {
    /// Creates a fan-out over `sinks`.
    #[must_use]
    pub fn new(sinks: Vec<SharedSink>) -> Self {
        Self { sinks }
    }
}

impl DiagnosticsSink for FanoutSink {
    fn report(&self, diagnostic: Diagnostic) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.report(diagnostic.clone());
            }
            last.report(diagnostic);
        }
    }
}

/// Tracing sink, plus `screen` in builds with debug assertions.
///
/// Production builds never surface diagnostics on screen.
#[must_use]
pub fn debug_sink(screen: Arc<ScreenLog>) -> SharedSink {
    let tracing: SharedSink = Arc::new(TracingSink);
    if cfg!(debug_assertions) {
        let screen: SharedSink = screen;
        Arc::new(FanoutSink::new(vec![tracing, screen]))
    } else {
        tracing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_counts() {
        let sink = MemorySink::new();
        sink.report(Diagnostic::warning("a", "first"));
        sink.report(Diagnostic::error("b", "second").on(NetMode::Client));
        sink.report(Diagnostic::warning("a", "third"));

        assert_eq!(sink.count_code("a"), 2);
        assert_eq!(sink.count_severity(Severity::Error), 1);
        assert_eq!(sink.codes(), vec!["a", "b", "a"]);

        sink.clear();
        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_display_includes_side() {
        let d = Diagnostic::info("x.y", "hello").on(NetMode::ListenServer);
        assert_eq!(d.to_string(), "[x.y] hello (on server)");
    }

    #[test]
    fn test_screen_log_is_bounded() {
        let log = ScreenLog::new(2, Duration::from_secs(60));
        for i in 0..5 {
            log.report(Diagnostic::warning("screen", format!("msg {i}")));
        }
        let visible = log.visible();
        assert_eq!(visible.len(), 2);
        assert!(visible[0].text.contains("msg 3"));
        assert!(visible[1].text.contains("msg 4"));
    }

    #[test]
    fn test_screen_log_expires() {
        let log = ScreenLog::new(4, Duration::ZERO);
        log.report(Diagnostic::warning("screen", "gone"));
        assert_eq!(log.len(), 1);
        assert!(log.visible().is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let a = MemorySink::shared();
        let b = MemorySink::shared();
        let sinks: Vec<SharedSink> = vec![a.clone(), b.clone()];
        let fanout = FanoutSink::new(sinks);
        fanout.report(Diagnostic::info("fan", "out"));
        assert_eq!(a.count_code("fan"), 1);
        assert_eq!(b.count_code("fan"), 1);
    }
}
