//! Orchestration of the three validation stages for one external clause.

use crate::ir::analysis::diagnostic::DiagnosticSet;
use crate::ir::ast::external::{
    AnnotationTable, CallExpression, ExternalComposition, LanguageSpecifier,
};
use crate::ir::ast::{AnnotationContext, FunctionCallContext, Token};

/// Build a validated [`ExternalComposition`] from the raw grammar fragments
/// of one `external` clause.
///
/// All three stages run even when an earlier one fails, so a single
/// malformed clause reports every problem in one pass. An object is returned
/// only when the call parsed and composition raised no clause-level error;
/// entry-scoped annotation errors leave the object intact, with the
/// offending entries marked invalid in the table.
pub fn build_external_composition(
    call_ctx: &FunctionCallContext,
    annotation_ctx: Option<&AnnotationContext>,
    language_token: Option<&Token>,
) -> (Option<ExternalComposition>, DiagnosticSet) {
    let mut diagnostics = DiagnosticSet::new();

    let language = LanguageSpecifier::from_token(language_token);
    log::debug!(
        "building external clause '{}' with language \"{}\"",
        call_ctx.callee.text,
        language.as_str()
    );

    let (call, call_diagnostics) = CallExpression::parse(call_ctx);
    diagnostics.merge(call_diagnostics);

    let empty = AnnotationContext::default();
    let (annotations, annotation_diagnostics) =
        AnnotationTable::build(&language, annotation_ctx.unwrap_or(&empty));
    diagnostics.merge(annotation_diagnostics);

    let Some(call) = call else {
        // Annotation diagnostics were still collected above.
        return (None, diagnostics);
    };

    let (composition, compose_diagnostics) =
        ExternalComposition::compose(language, call, annotations);
    diagnostics.merge(compose_diagnostics);

    (composition, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::analysis::diagnostic::DiagnosticKind;
    use crate::ir::ast::external::AnnotationValue;
    use crate::ir::ast::{
        ComponentReference, Expression, Location, RawAnnotationEntry, RawArgument,
    };

    fn tok(text: &str) -> Token {
        Token::new(text, Location::new(1, 1))
    }

    fn ident(text: &str) -> Expression {
        Expression::ComponentReference(ComponentReference::from_token(tok(text)))
    }

    #[test]
    fn test_clean_clause_builds_without_diagnostics() {
        let call_ctx = FunctionCallContext::new(
            tok("sinc"),
            vec![RawArgument::positional(ident("x"))],
        );
        let annotation_ctx = AnnotationContext::new(vec![RawAnnotationEntry {
            key: tok("Library"),
            value: AnnotationValue::String("m".to_string()),
        }]);

        let (composition, diagnostics) =
            build_external_composition(&call_ctx, Some(&annotation_ctx), Some(&tok("C")));
        assert!(diagnostics.is_empty());

        let composition = composition.expect("composition not built");
        assert_eq!(composition.call.callee.text, "sinc");
        assert_eq!(
            composition.annotations.get("Library"),
            Some(&AnnotationValue::String("m".to_string()))
        );
    }

    #[test]
    fn test_default_language_with_library_still_builds() {
        // external clause without a language string but with Library
        let call_ctx = FunctionCallContext::new(tok("foo"), vec![]);
        let annotation_ctx = AnnotationContext::new(vec![RawAnnotationEntry {
            key: tok("Library"),
            value: AnnotationValue::String("libm".to_string()),
        }]);

        let (composition, diagnostics) =
            build_external_composition(&call_ctx, Some(&annotation_ctx), None);
        assert!(composition.is_some());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.diagnostics[0].kind,
            DiagnosticKind::AnnotationLanguageMismatch
        );
    }

    #[test]
    fn test_mixed_binding_order_yields_no_object() {
        // bar(a, b=1, c)
        let call_ctx = FunctionCallContext::new(
            tok("bar"),
            vec![
                RawArgument::positional(ident("a")),
                RawArgument::named(tok("b"), ident("one")),
                RawArgument::positional(ident("c")),
            ],
        );
        let (composition, diagnostics) = build_external_composition(&call_ctx, None, Some(&tok("C")));
        assert!(composition.is_none());
        assert_eq!(
            diagnostics.diagnostics[0].kind,
            DiagnosticKind::MixedBindingOrder
        );
    }

    #[test]
    fn test_diagnostics_accumulate_across_stages() {
        // a broken call and a broken annotation report together
        let call_ctx = FunctionCallContext::new(
            tok("bar"),
            vec![
                RawArgument::named(tok("b"), ident("one")),
                RawArgument::positional(ident("c")),
            ],
        );
        let annotation_ctx = AnnotationContext::new(vec![RawAnnotationEntry {
            key: tok("Include"),
            value: AnnotationValue::Integer(7),
        }]);

        let (composition, diagnostics) =
            build_external_composition(&call_ctx, Some(&annotation_ctx), Some(&tok("C")));
        assert!(composition.is_none());
        assert!(diagnostics
            .of_kind(DiagnosticKind::MixedBindingOrder)
            .next()
            .is_some());
        assert!(diagnostics
            .of_kind(DiagnosticKind::AnnotationValueType)
            .next()
            .is_some());
    }

    #[test]
    fn test_entry_scoped_value_error_keeps_object() {
        let call_ctx = FunctionCallContext::new(tok("foo"), vec![]);
        let annotation_ctx = AnnotationContext::new(vec![
            RawAnnotationEntry {
                key: tok("Include"),
                value: AnnotationValue::Integer(7),
            },
            RawAnnotationEntry {
                key: tok("Library"),
                value: AnnotationValue::String("m".to_string()),
            },
        ]);

        let (composition, diagnostics) =
            build_external_composition(&call_ctx, Some(&annotation_ctx), Some(&tok("C")));
        // the table was still constructed, so the clause object is kept
        let composition = composition.expect("composition not built");
        assert!(diagnostics.has_errors());
        assert!(!composition
            .annotations
            .entry("Include")
            .expect("entry missing")
            .valid);
        assert!(composition
            .annotations
            .entry("Library")
            .expect("entry missing")
            .valid);
    }
}
