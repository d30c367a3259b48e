//! Domain model of the `external` clause.
//!
//! MLS §12.9: External function interface. The clause is a triple of a
//! language specification, an external function call, and an annotation
//! carrying build directives. Each part validates itself on construction;
//! [`ExternalComposition::compose`] adds the cross-field rules. All
//! construction is pure, and the objects are immutable once built.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ir::analysis::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSet};

use super::{AnnotationContext, ComponentReference, Expression, FunctionCallContext, Location, Token};

/// Recognized foreign-language identifiers.
/// MLS §12.9: "The language specification must currently be one of
/// "builtin", "C", "C89", or "FORTRAN 77"."
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageSpecifier {
    /// No language string given; the default form `external;`.
    #[default]
    Builtin,
    C,
    C89,
    Fortran77,
    /// Anything else, preserved verbatim. Never silently coerced.
    Unrecognized(String),
}

impl LanguageSpecifier {
    /// Classify a language token. `None` means the clause carried no
    /// language string.
    pub fn from_token(token: Option<&Token>) -> Self {
        match token {
            None => LanguageSpecifier::Builtin,
            Some(t) => match t.text.as_str() {
                "builtin" => LanguageSpecifier::Builtin,
                "C" => LanguageSpecifier::C,
                "C89" => LanguageSpecifier::C89,
                "FORTRAN 77" => LanguageSpecifier::Fortran77,
                other => LanguageSpecifier::Unrecognized(other.to_string()),
            },
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LanguageSpecifier::Builtin => "builtin",
            LanguageSpecifier::C => "C",
            LanguageSpecifier::C89 => "C89",
            LanguageSpecifier::Fortran77 => "FORTRAN 77",
            LanguageSpecifier::Unrecognized(text) => text,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, LanguageSpecifier::Unrecognized(_))
    }
}

/// One bound argument of the external call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentBinding {
    /// Opaque validated expression: constant, identifier, or nested call.
    pub expression: Expression,
    /// Zero-based position in the argument list.
    pub positional_index: usize,
    /// Set when the argument was given in `name = value` form.
    pub name: Option<String>,
    pub location: Location,
}

/// Validated external function call: callee, ordered argument bindings, and
/// an optional explicit result target. When no result target is given the
/// return convention is resolved later by the binder, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Token,
    pub arguments: Vec<ArgumentBinding>,
    pub return_binding: Option<ArgumentBinding>,
}

impl CallExpression {
    /// Validate the raw argument list of an `external_function_call`
    /// fragment.
    ///
    /// Fails with `MixedBindingOrder` if a positional argument follows a
    /// named one, and with `DuplicateArgumentName` if an argument name
    /// repeats. All arguments are checked before failing so one pass reports
    /// every problem.
    pub fn parse(ctx: &FunctionCallContext) -> (Option<CallExpression>, DiagnosticSet) {
        let mut diagnostics = DiagnosticSet::new();
        let mut arguments = Vec::with_capacity(ctx.arguments.len());
        let mut seen_names: HashSet<String> = HashSet::new();
        let mut named_started = false;

        for (index, raw) in ctx.arguments.iter().enumerate() {
            match &raw.name {
                Some(name_token) => {
                    named_started = true;
                    if !seen_names.insert(name_token.text.clone()) {
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::DuplicateArgumentName,
                            name_token.location.clone(),
                            format!(
                                "Argument name '{}' is bound more than once in call to '{}'",
                                name_token.text, ctx.callee.text
                            ),
                        ));
                        continue;
                    }
                    arguments.push(ArgumentBinding {
                        expression: raw.value.clone(),
                        positional_index: index,
                        name: Some(name_token.text.clone()),
                        location: name_token.location.clone(),
                    });
                }
                None => {
                    if named_started {
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::MixedBindingOrder,
                            raw.value.location(),
                            format!(
                                "Positional argument {} follows a named argument in call to '{}'",
                                index + 1,
                                ctx.callee.text
                            ),
                        ));
                        continue;
                    }
                    arguments.push(ArgumentBinding {
                        expression: raw.value.clone(),
                        positional_index: index,
                        name: None,
                        location: raw.value.location(),
                    });
                }
            }
        }

        if diagnostics.has_errors() {
            return (None, diagnostics);
        }

        let return_binding = ctx.return_target.as_ref().map(|target| ArgumentBinding {
            expression: Expression::ComponentReference(ComponentReference::from_token(
                target.clone(),
            )),
            positional_index: 0,
            name: None,
            location: target.location.clone(),
        });

        let call = CallExpression {
            callee: ctx.callee.clone(),
            arguments,
            return_binding,
        };
        (Some(call), diagnostics)
    }
}

/// Value of an annotation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationValue {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    /// `{ "a", "b" }` vector syntax, used by `Library`.
    Array(Vec<AnnotationValue>),
    /// Nested `key(sub = value)` modification.
    Table(Vec<(String, AnnotationValue)>),
}

impl AnnotationValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AnnotationValue::String(_) => "String",
            AnnotationValue::Integer(_) => "Integer",
            AnnotationValue::Real(_) => "Real",
            AnnotationValue::Boolean(_) => "Boolean",
            AnnotationValue::Array(_) => "Array",
            AnnotationValue::Table(_) => "Table",
        }
    }
}

/// Expected kind of a known annotation key's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    String,
    Integer,
    Real,
    Boolean,
    Table,
}

impl ValueKind {
    /// Structural kind check. A `String` kind also accepts a vector of
    /// strings, matching the MLS `Library` annotation.
    fn matches(&self, value: &AnnotationValue) -> bool {
        match (self, value) {
            (ValueKind::String, AnnotationValue::String(_)) => true,
            (ValueKind::String, AnnotationValue::Array(elements)) => elements
                .iter()
                .all(|e| matches!(e, AnnotationValue::String(_))),
            (ValueKind::Integer, AnnotationValue::Integer(_)) => true,
            (ValueKind::Real, AnnotationValue::Real(_))
            | (ValueKind::Real, AnnotationValue::Integer(_)) => true,
            (ValueKind::Boolean, AnnotationValue::Boolean(_)) => true,
            (ValueKind::Table, AnnotationValue::Table(_)) => true,
            _ => false,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "String",
            ValueKind::Integer => "Integer",
            ValueKind::Real => "Real",
            ValueKind::Boolean => "Boolean",
            ValueKind::Table => "Table",
        }
    }
}

/// Rule for one recognized annotation key.
#[derive(Debug)]
pub struct AnnotationRule {
    pub key: &'static str,
    pub allowed_languages: &'static [&'static str],
    pub value_kind: ValueKind,
}

/// Build-directive keys recognized for external clauses.
/// MLS §12.9.4: Include and IncludeDirectory are C directives; Library and
/// LibraryDirectory apply to C and FORTRAN 77 alike.
/// Read-only after process start, safe to share across threads.
const ANNOTATION_RULES: &[AnnotationRule] = &[
    AnnotationRule {
        key: "Library",
        allowed_languages: &["C", "C89", "FORTRAN 77"],
        value_kind: ValueKind::String,
    },
    AnnotationRule {
        key: "LibraryDirectory",
        allowed_languages: &["C", "C89", "FORTRAN 77"],
        value_kind: ValueKind::String,
    },
    AnnotationRule {
        key: "Include",
        allowed_languages: &["C", "C89"],
        value_kind: ValueKind::String,
    },
    AnnotationRule {
        key: "IncludeDirectory",
        allowed_languages: &["C", "C89"],
        value_kind: ValueKind::String,
    },
];

fn rule_for(key: &str) -> Option<&'static AnnotationRule> {
    ANNOTATION_RULES.iter().find(|rule| rule.key == key)
}

/// One validated annotation entry. Entries that fail the value-kind check
/// are retained with `valid = false` so diagnostics can point at them; they
/// are never dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    pub key: Token,
    pub value: AnnotationValue,
    pub valid: bool,
}

/// Validated annotation table of an external clause. Entry order follows the
/// source; lookup is by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationTable {
    pub entries: Vec<AnnotationEntry>,
}

impl AnnotationTable {
    /// Validate the raw entries against the per-language rule table, in
    /// source order.
    ///
    /// Unknown keys and language mismatches are warnings; a value-kind
    /// mismatch is an error scoped to that entry only. The table is returned
    /// in every case.
    pub fn build(
        language: &LanguageSpecifier,
        ctx: &AnnotationContext,
    ) -> (AnnotationTable, DiagnosticSet) {
        let mut diagnostics = DiagnosticSet::new();
        let mut entries = Vec::with_capacity(ctx.entries.len());

        for raw in &ctx.entries {
            let mut valid = true;
            match rule_for(&raw.key.text) {
                None => {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnknownAnnotationKey,
                        raw.key.location.clone(),
                        format!(
                            "Annotation key '{}' is not a recognized external directive",
                            raw.key.text
                        ),
                    ));
                }
                Some(rule) => {
                    // The builtin case is a cross-field rule handled in
                    // compose; an unrecognized language already reports
                    // UnknownLanguage, so neither is re-checked per entry.
                    if language.is_recognized()
                        && !matches!(language, LanguageSpecifier::Builtin)
                        && !rule.allowed_languages.contains(&language.as_str())
                    {
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::AnnotationLanguageMismatch,
                            raw.key.location.clone(),
                            format!(
                                "Annotation '{}' is not meaningful for language \"{}\"",
                                raw.key.text,
                                language.as_str()
                            ),
                        ));
                    }
                    if !rule.value_kind.matches(&raw.value) {
                        valid = false;
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::AnnotationValueType,
                            raw.key.location.clone(),
                            format!(
                                "Annotation '{}' expects a {} value, found {}",
                                raw.key.text,
                                rule.value_kind.name(),
                                raw.value.kind_name()
                            ),
                        ));
                    }
                }
            }
            entries.push(AnnotationEntry {
                key: raw.key.clone(),
                value: raw.value.clone(),
                valid,
            });
        }

        (AnnotationTable { entries }, diagnostics)
    }

    /// Value stored for `key`, unchanged from the input.
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.entries
            .iter()
            .find(|entry| entry.key.text == key)
            .map(|entry| &entry.value)
    }

    pub fn entry(&self, key: &str) -> Option<&AnnotationEntry> {
        self.entries.iter().find(|entry| entry.key.text == key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries whose key is a language-specific build directive.
    pub fn directive_entries(&self) -> impl Iterator<Item = &AnnotationEntry> {
        self.entries
            .iter()
            .filter(|entry| rule_for(&entry.key.text).is_some())
    }
}

/// The validated external clause: language, call, and annotations.
/// Created once per `external` clause during parse, immutable thereafter,
/// owned by the enclosing class AST node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalComposition {
    pub language: LanguageSpecifier,
    pub call: CallExpression,
    pub annotations: AnnotationTable,
}

impl ExternalComposition {
    /// Cross-field validation over already-validated parts.
    ///
    /// An unrecognized language is a warning and the object is still built,
    /// tagged as unrecognized, so downstream tooling can report the whole
    /// clause. An empty callee name is fatal and yields no object.
    pub fn compose(
        language: LanguageSpecifier,
        call: CallExpression,
        annotations: AnnotationTable,
    ) -> (Option<ExternalComposition>, DiagnosticSet) {
        let mut diagnostics = DiagnosticSet::new();
        let clause_location = call.callee.location.clone();

        if call.callee.text.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingCalleeName,
                clause_location.clone(),
                "External call has no subprogram name".to_string(),
            ));
        }

        if let LanguageSpecifier::Unrecognized(text) = &language {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnknownLanguage,
                clause_location.clone(),
                format!(
                    "Language specification \"{}\" is not one of \"builtin\", \"C\", \"C89\", \"FORTRAN 77\"",
                    text
                ),
            ));
        }

        if matches!(language, LanguageSpecifier::Builtin) {
            for entry in annotations.directive_entries() {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::AnnotationLanguageMismatch,
                    entry.key.location.clone(),
                    format!(
                        "Annotation '{}' requires an explicit language specification",
                        entry.key.text
                    ),
                ));
            }
        }

        if diagnostics.has_errors() {
            return (None, diagnostics);
        }

        let composition = ExternalComposition {
            language,
            call,
            annotations,
        };
        (Some(composition), diagnostics)
    }
}
