//! Raw syntax fragments handed over by the grammar layer.
//!
//! These mirror the parse-tree contexts for `external_function_call` and the
//! external clause's `annotation`, flattened to owned data so the rest of the
//! subsystem never touches parser handles.

use serde::{Deserialize, Serialize};

use super::external::AnnotationValue;
use super::{Expression, Token};

/// One argument as it appeared in the source: an optional `name =` prefix
/// followed by an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArgument {
    pub name: Option<Token>,
    pub value: Expression,
}

impl RawArgument {
    pub fn positional(value: Expression) -> Self {
        Self { name: None, value }
    }

    pub fn named(name: Token, value: Expression) -> Self {
        Self {
            name: Some(name),
            value,
        }
    }
}

/// Parse-tree fragment for `[component_reference =] IDENT "(" args ")"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallContext {
    /// Name token of the external subprogram.
    pub callee: Token,
    /// Arguments in source order.
    pub arguments: Vec<RawArgument>,
    /// Explicit result target to the left of `=`, when present.
    pub return_target: Option<Token>,
}

impl FunctionCallContext {
    pub fn new(callee: Token, arguments: Vec<RawArgument>) -> Self {
        Self {
            callee,
            arguments,
            return_target: None,
        }
    }

    pub fn with_return_target(mut self, target: Token) -> Self {
        self.return_target = Some(target);
        self
    }
}

/// One `key = value` pair from the external clause's annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnnotationEntry {
    pub key: Token,
    pub value: AnnotationValue,
}

/// Parse-tree fragment for `annotation "(" entries ")"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationContext {
    /// Entries in source order.
    pub entries: Vec<RawAnnotationEntry>,
}

impl AnnotationContext {
    pub fn new(entries: Vec<RawAnnotationEntry>) -> Self {
        Self { entries }
    }
}
