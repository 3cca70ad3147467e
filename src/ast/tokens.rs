use std::fmt;

use rust_decimal::Decimal;

use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Field name
    ///
    /// Must start with a letter or underscore, followed by letters, digits,
    /// or underscores.
    ///
    /// # Examples
    /// ```text
    /// author
    /// commit_date
    /// ```
    Identifier(String),

    /// String literal enclosed in double quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "2021-06-01 12:00:00"
    /// ```
    String(String),

    /// Number literal, kept exact
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// ```
    Number(Decimal),

    // Delimiters
    LParen,
    RParen,

    // Comparison
    /// Equality (`=`)
    Eq,
    /// Inequality (`!=`)
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// Glob match (`GLOB`)
    Glob,
    /// Regular expression match (`REGEXP`)
    Regexp,

    // Logical
    /// Logical AND (keyword, case-insensitive)
    And,
    /// Logical OR (keyword, case-insensitive)
    Or,
    /// Negation (`NOT` or `!`)
    Not,

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "identifier `{}`", name),
            Token::String(s) => write!(f, "string {:?}", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::LParen => f.write_str("`(`"),
            Token::RParen => f.write_str("`)`"),
            Token::Eq => f.write_str("`=`"),
            Token::NotEq => f.write_str("`!=`"),
            Token::Lt => f.write_str("`<`"),
            Token::LtEq => f.write_str("`<=`"),
            Token::Gt => f.write_str("`>`"),
            Token::GtEq => f.write_str("`>=`"),
            Token::Glob => f.write_str("`GLOB`"),
            Token::Regexp => f.write_str("`REGEXP`"),
            Token::And => f.write_str("`AND`"),
            Token::Or => f.write_str("`OR`"),
            Token::Not => f.write_str("`NOT`"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// A token together with the exact source text it was scanned from and the
/// position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    pub token: Token,
    pub value: String,
    pub pos: Position,
}
