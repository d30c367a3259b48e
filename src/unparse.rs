//! Rendering of validated external clauses back to Modelica source text.
//!
//! Used for diagnostics and round-trip checks. Layout follows the usual
//! concrete syntax: `external "C" y = foo(x, n = 3) annotation(Library = "m");`

use std::fmt;

use crate::ir::ast::external::{
    AnnotationTable, AnnotationValue, CallExpression, ExternalComposition, LanguageSpecifier,
};
use crate::ir::ast::{Expression, TerminalType};

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Terminal {
                terminal_type: TerminalType::String,
                token,
            } => write!(f, "\"{}\"", token.text),
            Expression::Terminal { token, .. } => write!(f, "{}", token.text),
            Expression::ComponentReference(comp_ref) => write!(f, "{comp_ref}"),
            Expression::FunctionCall { comp, args } => {
                write!(f, "{comp}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::String(text) => write!(f, "\"{text}\""),
            AnnotationValue::Integer(value) => write!(f, "{value}"),
            AnnotationValue::Real(value) => write!(f, "{value}"),
            AnnotationValue::Boolean(value) => write!(f, "{value}"),
            AnnotationValue::Array(elements) => {
                write!(f, "{{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "}}")
            }
            AnnotationValue::Table(entries) => {
                write!(f, "(")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for AnnotationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "annotation(")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", entry.key.text, entry.value)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for CallExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ret) = &self.return_binding {
            write!(f, "{} = ", ret.expression)?;
        }
        write!(f, "{}(", self.callee.text)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if let Some(name) = &arg.name {
                write!(f, "{name} = ")?;
            }
            write!(f, "{}", arg.expression)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for ExternalComposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "external ")?;
        if !matches!(self.language, LanguageSpecifier::Builtin) {
            write!(f, "\"{}\" ", self.language.as_str())?;
        }
        write!(f, "{}", self.call)?;
        if !self.annotations.is_empty() {
            write!(f, " {}", self.annotations)?;
        }
        write!(f, ";")
    }
}

#[cfg(test)]
mod tests {
    use crate::ir::analysis::external::build_external_composition;
    use crate::ir::ast::external::AnnotationValue;
    use crate::ir::ast::{
        AnnotationContext, ComponentReference, Expression, FunctionCallContext, Location,
        RawAnnotationEntry, RawArgument, TerminalType, Token,
    };

    fn tok(text: &str) -> Token {
        Token::new(text, Location::new(1, 1))
    }

    fn ident(text: &str) -> Expression {
        Expression::ComponentReference(ComponentReference::from_token(tok(text)))
    }

    #[test]
    fn test_render_full_clause() {
        let call_ctx = FunctionCallContext::new(
            tok("mysin"),
            vec![
                RawArgument::positional(ident("u")),
                RawArgument::named(
                    tok("n"),
                    Expression::Terminal {
                        terminal_type: TerminalType::Integer,
                        token: tok("3"),
                    },
                ),
            ],
        )
        .with_return_target(tok("y"));
        let annotation_ctx = AnnotationContext::new(vec![
            RawAnnotationEntry {
                key: tok("Library"),
                value: AnnotationValue::String("m".to_string()),
            },
            RawAnnotationEntry {
                key: tok("Include"),
                value: AnnotationValue::String("#include <m.h>".to_string()),
            },
        ]);

        let (composition, _) =
            build_external_composition(&call_ctx, Some(&annotation_ctx), Some(&tok("C")));
        assert_eq!(
            composition.expect("composition not built").to_string(),
            "external \"C\" y = mysin(u, n = 3) annotation(Library = \"m\", Include = \"#include <m.h>\");"
        );
    }

    #[test]
    fn test_render_builtin_clause_without_language() {
        let call_ctx = FunctionCallContext::new(tok("foo"), vec![]);
        let (composition, _) = build_external_composition(&call_ctx, None, None);
        assert_eq!(
            composition.expect("composition not built").to_string(),
            "external foo();"
        );
    }

    #[test]
    fn test_render_library_vector() {
        let value = AnnotationValue::Array(vec![
            AnnotationValue::String("m".to_string()),
            AnnotationValue::String("lapack".to_string()),
        ]);
        assert_eq!(value.to_string(), "{\"m\", \"lapack\"}");
    }
}
