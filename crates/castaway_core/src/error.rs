//! # Error Classification
//!
//! Domain errors live next to the code that raises them (`ResourceError`,
//! `PacketError`, ...). This module gives them a common face so they can be
//! reported to a sink with a stable code and severity.

use crate::diagnostics::{Diagnostic, DiagnosticsSink, Severity};
use castaway_shared::NetMode;

/// An error that can be reported as a diagnostic.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for the `Display`/`Error` impl
/// - Codes are dotted, lowercase and never change once shipped
/// - Classify severity by who is at fault, not by impact
pub trait Reportable: std::error::Error {
    /// Severity used when the error is reported.
    fn severity(&self) -> Severity;

    /// Stable identifier of the error variant.
    fn code(&self) -> &'static str;

    /// Builds the diagnostic for this error.
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.severity(), self.code(), self.to_string())
    }
}

/// Reports `error` to `sink`, tagged with the reporting side.
pub fn report<E: Reportable + ?Sized>(sink: &dyn DiagnosticsSink, side: NetMode, error: &E) {
    sink.report(error.to_diagnostic().on(side));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;

    #[derive(Debug, thiserror::Error)]
    #[error("index {0} out of range")]
    struct OutOfRange(usize);

    impl Reportable for OutOfRange {
        fn severity(&self) -> Severity {
            Severity::Error
        }

        fn code(&self) -> &'static str {
            "test.out_of_range"
        }
    }

    #[test]
    fn test_report_tags_side() {
        let sink = MemorySink::new();
        report(&sink, NetMode::Client, &OutOfRange(4));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "test.out_of_range");
        assert_eq!(records[0].message, "index 4 out of range");
        assert_eq!(records[0].side, Some(NetMode::Client));
    }
}
