//! Common types for the defuse analyzer.
//!
//! This crate provides the foundational types used across all defuse crates:
//! - The identifier model (`Ident`, `IdentKind`)
//! - Source spans and line/column mapping (`Span`, `LineMap`)
//! - Driver diagnostics (`Diagnostic`, `DiagnosticCategory`)

pub mod diagnostics;
pub mod ident;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticCategory};
pub use ident::{Ident, IdentKind};
pub use span::{LineMap, Span};
