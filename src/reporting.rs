//! Conversion of clause diagnostics into `codespan-reporting` diagnostics
//! for user-facing display by the surrounding tool.

use codespan_reporting::diagnostic::{Diagnostic as ReportDiagnostic, Label};

use crate::ir::analysis::diagnostic::{Diagnostic, DiagnosticSet, Severity};

/// Convert one diagnostic. The file id is `()`; callers reporting against a
/// real file database can map it afterwards.
pub fn to_report_diagnostic(diagnostic: &Diagnostic) -> ReportDiagnostic<()> {
    let report = match diagnostic.severity {
        Severity::Error => ReportDiagnostic::error(),
        Severity::Warning => ReportDiagnostic::warning(),
    };
    let mut report = report
        .with_code(diagnostic.kind.code())
        .with_message(diagnostic.message.clone())
        .with_notes(vec![format!(
            "at line {}, column {}",
            diagnostic.location.line, diagnostic.location.col
        )]);

    let (start, end) = diagnostic.location.span;
    if end > start {
        report = report.with_labels(vec![Label::primary((), start..end)]);
    }
    report
}

/// Convert a whole set, preserving report order.
pub fn to_report_diagnostics(set: &DiagnosticSet) -> Vec<ReportDiagnostic<()>> {
    set.iter().map(to_report_diagnostic).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::analysis::diagnostic::DiagnosticKind;
    use crate::ir::ast::Location;
    use codespan_reporting::diagnostic::Severity as ReportSeverity;

    #[test]
    fn test_severity_and_code_mapping() {
        let mut set = DiagnosticSet::new();
        set.push(Diagnostic::new(
            DiagnosticKind::MissingCalleeName,
            Location::new(3, 7),
            "External call has no subprogram name",
        ));
        set.push(Diagnostic::new(
            DiagnosticKind::UnknownLanguage,
            Location::new(3, 1),
            "Language specification \"Ada\" is not recognized",
        ));

        let reports = to_report_diagnostics(&set);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].severity, ReportSeverity::Error);
        assert_eq!(reports[0].code.as_deref(), Some("EXT007"));
        assert_eq!(reports[1].severity, ReportSeverity::Warning);
        assert_eq!(reports[1].notes[0], "at line 3, column 1");
    }
}
