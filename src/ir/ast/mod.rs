//! Syntax node types shared across the external-interface subsystem.
//!
//! These are the already-validated fragments handed over by the grammar
//! layer. Expression grammar is not re-parsed here: an [`Expression`] is an
//! opaque node that is either a literal constant, a component reference, or
//! a nested function call.

mod scope;
mod syntax;

pub mod external;

pub use scope::{ClassScope, ScopeVariable};
pub use syntax::{AnnotationContext, FunctionCallContext, RawAnnotationEntry, RawArgument};

use serde::{Deserialize, Serialize};

/// Source location of a token or node.
///
/// `span` carries byte offsets into the source buffer for renderers that
/// work with ranges; `line`/`col` are 1-based and used in messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub col: u32,
    pub span: (usize, usize),
}

impl Location {
    pub fn new(line: u32, col: u32) -> Self {
        Self {
            line,
            col,
            span: (0, 0),
        }
    }
}

/// A lexical token with its source location.
///
/// For string literals `text` holds the unquoted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub location: Location,
}

impl Token {
    pub fn new(text: impl Into<String>, location: Location) -> Self {
        Self {
            text: text.into(),
            location,
        }
    }
}

/// Kind of a literal terminal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalType {
    Integer,
    Real,
    String,
    Bool,
}

/// A dotted reference to a component, e.g. `rec.field`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentReference {
    pub parts: Vec<Token>,
}

impl ComponentReference {
    pub fn from_token(token: Token) -> Self {
        Self { parts: vec![token] }
    }

    /// Location of the first part, used for diagnostics.
    pub fn location(&self) -> Location {
        self.parts
            .first()
            .map(|p| p.location.clone())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ComponentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for part in &self.parts {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", part.text)?;
            first = false;
        }
        Ok(())
    }
}

/// An opaque validated expression node supplied by the expression parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// A literal constant.
    Terminal {
        terminal_type: TerminalType,
        token: Token,
    },
    /// A reference to a declared component.
    ComponentReference(ComponentReference),
    /// A nested function call.
    FunctionCall {
        comp: ComponentReference,
        args: Vec<Expression>,
    },
}

impl Expression {
    /// Location of the expression's leading token.
    pub fn location(&self) -> Location {
        match self {
            Expression::Terminal { token, .. } => token.location.clone(),
            Expression::ComponentReference(comp_ref) => comp_ref.location(),
            Expression::FunctionCall { comp, .. } => comp.location(),
        }
    }
}

/// Directionality of a declared class variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Causality {
    Input,
    Output,
    Local,
}
