use std::fmt;

use crate::{
    ast::{
        BinOp, DateLiteral, GlobLiteral, Identifier, NumberLiteral, PositionedToken,
        RegexLiteral, StringLiteral, UnaryOp,
    },
    lexer::Position,
    types::{FieldType, FieldTypeDescriptor},
};

/// Abstract Syntax Tree node representing a parsed query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Values
    /// Field reference
    ///
    /// # Example
    /// ```text
    /// author
    /// ```
    Identifier(Identifier),

    /// String literal, untyped until compared against a field
    ///
    /// # Example
    /// ```text
    /// "hello"
    /// ```
    String(StringLiteral),

    /// Number literal
    Number(NumberLiteral),

    /// Date literal, only produced by type conversion
    Date(DateLiteral),

    /// Glob literal, only produced by type conversion
    Glob(GlobLiteral),

    /// Regex literal, only produced by type conversion
    Regex(RegexLiteral),

    // Logical
    /// Prefix operation
    ///
    /// # Example
    /// ```text
    /// NOT size > 10
    /// ```
    Unary {
        op: UnaryOp,
        /// The operator as written (`NOT`, `not`, `!`)
        token: PositionedToken,
        operand: Box<Expr>,
    },

    /// Comparison or logical connective
    ///
    /// # Examples
    /// ```text
    /// size > 10
    /// name GLOB "*.rs" AND size > 10
    /// ```
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Parenthesized expression
    Paren {
        inner: Box<Expr>,
        /// Position of the opening parenthesis
        pos: Position,
    },
}

impl Expr {
    pub fn pos(&self) -> Position {
        match self {
            Expr::Identifier(identifier) => identifier.pos(),
            Expr::String(literal) => literal.token.pos,
            Expr::Number(literal) => literal.token.pos,
            Expr::Date(literal) => literal.token.pos,
            Expr::Glob(literal) => literal.token.pos,
            Expr::Regex(literal) => literal.token.pos,
            Expr::Unary { token, .. } => token.pos,
            Expr::Binary { left, .. } => left.pos(),
            Expr::Paren { pos, .. } => *pos,
        }
    }

    /// Name of the node kind, as reported in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Identifier(_) => "Identifier",
            Expr::String(_) => "StringLiteral",
            Expr::Number(_) => "NumberLiteral",
            Expr::Date(_) => "DateLiteral",
            Expr::Glob(_) => "GlobLiteral",
            Expr::Regex(_) => "RegexLiteral",
            Expr::Unary { .. } => "UnaryExpression",
            Expr::Binary { .. } => "BinaryExpression",
            Expr::Paren { .. } => "ParenExpression",
        }
    }

    /// True for nodes that resolve to a boolean.
    pub fn is_logical(&self) -> bool {
        matches!(
            self,
            Expr::Unary { .. } | Expr::Binary { .. } | Expr::Paren { .. }
        )
    }

    /// The type of the value this node denotes, or `None` if it is not a value.
    ///
    /// Unknown fields resolve to [`FieldType::Invalid`].
    pub fn value_type(&self, fields: &dyn FieldTypeDescriptor) -> Option<FieldType> {
        match self {
            Expr::Identifier(identifier) => Some(identifier.field_type(fields)),
            Expr::String(_) => Some(FieldType::String),
            Expr::Number(_) => Some(FieldType::Number),
            Expr::Date(_) => Some(FieldType::Date),
            Expr::Glob(_) => Some(FieldType::Glob),
            Expr::Regex(_) => Some(FieldType::Regex),
            Expr::Unary { .. } | Expr::Binary { .. } | Expr::Paren { .. } => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(identifier) => write!(f, "{}", identifier),
            Expr::String(literal) => write!(f, "{}", literal),
            Expr::Number(literal) => write!(f, "{}", literal),
            Expr::Date(literal) => write!(f, "{}", literal),
            Expr::Glob(literal) => write!(f, "{}", literal),
            Expr::Regex(literal) => write!(f, "{}", literal),
            Expr::Unary { op, operand, .. } => write!(f, "{} {}", op, operand),
            Expr::Binary { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Paren { inner, .. } => write!(f, "({})", inner),
        }
    }
}
