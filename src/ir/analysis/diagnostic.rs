//! Diagnostics for external-clause validation.
//!
//! Every malformed combination in an `external` clause maps to one of the
//! kinds below. Validation never fails fast: each stage accumulates into a
//! [`DiagnosticSet`] so a single clause reports all of its problems in one
//! pass.

use serde::Serialize;

use crate::ir::ast::Location;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Does not block construction of the validated object.
    Warning,
    /// Blocks construction of the object it is scoped to.
    Error,
}

/// Closed set of conditions detected while validating an external clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// A positional argument follows a named one.
    MixedBindingOrder,
    /// The same argument name appears twice.
    DuplicateArgumentName,
    /// Annotation key not known for any foreign language.
    UnknownAnnotationKey,
    /// Annotation key known, but not meaningful for the declared language.
    AnnotationLanguageMismatch,
    /// Annotation value kind does not match the key's declared kind.
    AnnotationValueType,
    /// Language specification is not one of the recognized identifiers.
    UnknownLanguage,
    /// The external subprogram name is empty.
    MissingCalleeName,
    /// An argument identifier does not resolve in the class scope.
    UnresolvedArgumentReference,
    /// No explicit return binding and the implicit convention is ambiguous.
    AmbiguousReturnBinding,
    /// An output-bound variable is also read elsewhere in the same call.
    DirectionalityConflict,
}

impl DiagnosticKind {
    /// Severity is fixed per kind.
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::MixedBindingOrder
            | DiagnosticKind::DuplicateArgumentName
            | DiagnosticKind::AnnotationValueType
            | DiagnosticKind::MissingCalleeName
            | DiagnosticKind::UnresolvedArgumentReference
            | DiagnosticKind::AmbiguousReturnBinding => Severity::Error,
            DiagnosticKind::UnknownAnnotationKey
            | DiagnosticKind::AnnotationLanguageMismatch
            | DiagnosticKind::UnknownLanguage
            | DiagnosticKind::DirectionalityConflict => Severity::Warning,
        }
    }

    /// Stable short code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::MixedBindingOrder => "EXT001",
            DiagnosticKind::DuplicateArgumentName => "EXT002",
            DiagnosticKind::UnknownAnnotationKey => "EXT003",
            DiagnosticKind::AnnotationLanguageMismatch => "EXT004",
            DiagnosticKind::AnnotationValueType => "EXT005",
            DiagnosticKind::UnknownLanguage => "EXT006",
            DiagnosticKind::MissingCalleeName => "EXT007",
            DiagnosticKind::UnresolvedArgumentReference => "EXT008",
            DiagnosticKind::AmbiguousReturnBinding => "EXT009",
            DiagnosticKind::DirectionalityConflict => "EXT010",
        }
    }
}

/// One validation finding with enough location information for user-facing
/// reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            location,
            message: message.into(),
        }
    }
}

/// Ordered accumulator of diagnostics for one external clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagnosticSet {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSet {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Merge another set into this one, preserving order.
    pub fn merge(&mut self, other: DiagnosticSet) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostics of a given kind, in report order.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}
