use crate::{ast::Expr, lexer::Position};

/// A positioned problem found while validating a query.
///
/// Rendered as `<line>:<col>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{pos}: {message}")]
pub struct Diagnostic {
    pub pos: Position,
    pub message: String,
}

impl Diagnostic {
    pub fn new(pos: Position, message: impl Into<String>) -> Self {
        Diagnostic {
            pos,
            message: message.into(),
        }
    }

    /// A diagnostic positioned at `expr`.
    pub fn at(expr: &Expr, message: impl Into<String>) -> Self {
        Diagnostic::new(expr.pos(), message)
    }
}
