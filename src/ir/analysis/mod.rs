//! Validation passes over external-clause syntax fragments.

pub mod diagnostic;
pub mod external;

pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSet, Severity};
