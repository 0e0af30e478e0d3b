//! # Castaway Core
//!
//! Diagnostics plumbing shared by every gameplay crate.
//!
//! ## Architecture Rules
//!
//! 1. **No global debug output** - components receive a [`SharedSink`] at
//!    construction and report through it
//! 2. **Failures stay local** - an error is reported where it is detected and
//!    the operation becomes a no-op; nothing panics the simulation
//! 3. **Stable codes** - every reportable error carries a static code that
//!    tests and dashboards can match on
//!
//! ## Example
//!
//! ```rust
//! use castaway_core::{Diagnostic, DiagnosticsSink, MemorySink};
//!
//! let sink = MemorySink::new();
//! sink.report(Diagnostic::warning("resource.missing_hit", "no hit result"));
//! assert_eq!(sink.count_code("resource.missing_hit"), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod diagnostics;
pub mod error;

pub use diagnostics::{
    debug_sink, Diagnostic, DiagnosticsSink, FanoutSink, MemorySink, ScreenLog, Severity,
    SharedSink, TracingSink,
};
pub use error::{report, Reportable};
