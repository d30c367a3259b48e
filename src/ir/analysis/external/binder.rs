//! Binding of an external composition to its owning class's scope.
//!
//! Resolves every argument identifier against the class's declared formal
//! parameters and local variables, applies the implicit return-value
//! convention, and checks directionality plausibility. The class scope is a
//! read-only handle supplied by the declaration subsystem.

use indexmap::IndexMap;
use serde::Serialize;

use crate::ir::analysis::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSet};
use crate::ir::ast::external::{ArgumentBinding, ExternalComposition};
use crate::ir::ast::{Causality, ClassScope, Expression, Location};

/// Policy for an external call that carries no explicit return binding.
///
/// The MLS permits a void external call, so whether zero declared outputs is
/// legal is a policy of the surrounding tool rather than a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnBindingPolicy {
    /// The class must declare exactly one `output`, which is bound
    /// implicitly; zero or several outputs are ambiguous.
    #[default]
    RequireSingleOutput,
    /// Like `RequireSingleOutput`, but zero outputs is accepted as a void
    /// external call with no return target.
    AllowNoOutputs,
}

/// What an argument expression resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResolvedTarget {
    /// A declared class variable.
    Variable { name: String, causality: Causality },
    /// A literal constant.
    Literal,
    /// A nested call; its own identifiers were resolved recursively.
    Call,
}

/// One argument with its resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundArgument {
    pub binding: ArgumentBinding,
    pub resolved: ResolvedTarget,
}

/// The variable receiving the call's result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnTarget {
    pub name: String,
    pub causality: Causality,
    /// True when the target was chosen by the single-output convention
    /// rather than written in the source.
    pub implicit: bool,
}

/// A fully resolved external interface, ready for the semantic-check and
/// code-generation stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundExternalInterface {
    pub composition: ExternalComposition,
    pub arguments: Vec<BoundArgument>,
    /// `None` for a void external call.
    pub return_target: Option<ReturnTarget>,
}

impl BoundExternalInterface {
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Resolve an external composition against the owning class's scope.
///
/// Unresolved identifiers are reported per argument without aborting the
/// remaining arguments; the bound object is returned only when every
/// argument and the return convention resolved. Directionality findings are
/// warnings and never block the result.
pub fn bind_external_interface(
    composition: &ExternalComposition,
    scope: &ClassScope,
    policy: ReturnBindingPolicy,
) -> (Option<BoundExternalInterface>, DiagnosticSet) {
    let mut diagnostics = DiagnosticSet::new();
    let mut arguments = Vec::with_capacity(composition.call.arguments.len());

    for binding in &composition.call.arguments {
        // an unresolved argument is reported and skipped; the remaining
        // arguments are still checked
        if let Some(resolved) = resolve_expression(&binding.expression, scope, &mut diagnostics) {
            arguments.push(BoundArgument {
                binding: binding.clone(),
                resolved,
            });
        }
    }

    let return_target = resolve_return_target(composition, scope, policy, &mut diagnostics);

    let resolved_return = return_target.as_ref().ok().and_then(|t| t.as_ref());
    check_directionality(&arguments, resolved_return, &mut diagnostics);

    if diagnostics.has_errors() {
        return (None, diagnostics);
    }

    let bound = BoundExternalInterface {
        composition: composition.clone(),
        arguments,
        return_target: match return_target {
            Ok(target) => target,
            // unreachable when has_errors() is false, but stay total
            Err(()) => None,
        },
    };
    (Some(bound), diagnostics)
}

/// Resolve one argument expression. Identifiers inside nested calls are
/// resolved recursively, the way reference checking walks expressions.
fn resolve_expression(
    expr: &Expression,
    scope: &ClassScope,
    diagnostics: &mut DiagnosticSet,
) -> Option<ResolvedTarget> {
    match expr {
        Expression::Terminal { .. } => Some(ResolvedTarget::Literal),
        Expression::ComponentReference(comp_ref) => {
            let Some(first) = comp_ref.parts.first() else {
                return Some(ResolvedTarget::Literal);
            };
            match scope.get(&first.text) {
                Some(causality) => Some(ResolvedTarget::Variable {
                    name: first.text.clone(),
                    causality,
                }),
                None => {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnresolvedArgumentReference,
                        first.location.clone(),
                        format!(
                            "'{comp_ref}' does not name a formal parameter or local variable of the enclosing class"
                        ),
                    ));
                    None
                }
            }
        }
        Expression::FunctionCall { args, .. } => {
            let mut ok = true;
            for arg in args {
                if resolve_expression(arg, scope, diagnostics).is_none() {
                    ok = false;
                }
            }
            ok.then_some(ResolvedTarget::Call)
        }
    }
}

/// Apply the explicit or implicit return-value convention.
///
/// Returns `Err(())` when the convention failed fatally (already reported).
fn resolve_return_target(
    composition: &ExternalComposition,
    scope: &ClassScope,
    policy: ReturnBindingPolicy,
    diagnostics: &mut DiagnosticSet,
) -> Result<Option<ReturnTarget>, ()> {
    if let Some(binding) = &composition.call.return_binding {
        let Expression::ComponentReference(comp_ref) = &binding.expression else {
            // the grammar only produces component references here
            return Ok(None);
        };
        let name = comp_ref
            .parts
            .first()
            .map(|p| p.text.clone())
            .unwrap_or_default();
        return match scope.get(&name) {
            Some(causality) => Ok(Some(ReturnTarget {
                name,
                causality,
                implicit: false,
            })),
            None => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnresolvedArgumentReference,
                    binding.location.clone(),
                    format!(
                        "Return target '{name}' does not name a variable of the enclosing class"
                    ),
                ));
                Err(())
            }
        };
    }

    let outputs: Vec<&str> = scope.outputs().collect();
    let clause_location = composition.call.callee.location.clone();
    match outputs.as_slice() {
        [single] => Ok(Some(ReturnTarget {
            name: single.to_string(),
            causality: Causality::Output,
            implicit: true,
        })),
        [] if policy == ReturnBindingPolicy::AllowNoOutputs => Ok(None),
        [] => {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::AmbiguousReturnBinding,
                clause_location,
                format!(
                    "External call '{}' has no explicit return binding and the class declares no output variable",
                    composition.call.callee.text
                ),
            ));
            Err(())
        }
        many => {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::AmbiguousReturnBinding,
                clause_location,
                format!(
                    "External call '{}' has no explicit return binding but the class declares {} output variables",
                    composition.call.callee.text,
                    many.len()
                ),
            ));
            Err(())
        }
    }
}

/// Warn when an output-bound variable is also read elsewhere in the same
/// call: a variable the foreign subprogram writes should appear once.
fn check_directionality(
    arguments: &[BoundArgument],
    return_target: Option<&ReturnTarget>,
    diagnostics: &mut DiagnosticSet,
) {
    let mut output_uses: IndexMap<&str, (usize, Location)> = IndexMap::new();
    for argument in arguments {
        if let ResolvedTarget::Variable {
            name,
            causality: Causality::Output,
        } = &argument.resolved
        {
            let entry = output_uses
                .entry(name.as_str())
                .or_insert((0, argument.binding.location.clone()));
            entry.0 += 1;
        }
    }

    let return_name = return_target.map(|t| t.name.as_str());

    for (name, (count, location)) in &output_uses {
        let also_returned = return_name == Some(*name);
        if *count > 1 || also_returned {
            let detail = if also_returned {
                "is also the call's return target"
            } else {
                "appears more than once in the argument list"
            };
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DirectionalityConflict,
                location.clone(),
                format!("Output variable '{name}' {detail}"),
            ));
        }
    }
}
