use std::fmt;

use chrono::{DateTime, Local};
use regex::Regex;
use rust_decimal::Decimal;

use crate::{
    ast::PositionedToken,
    lexer::Position,
    pattern::GlobPattern,
    types::{FieldType, FieldTypeDescriptor},
};

/// Output format for date literals, matching the longer accepted input form.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reference to a record field.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: PositionedToken,
}

impl Identifier {
    pub fn name(&self) -> &str {
        &self.token.value
    }

    pub fn pos(&self) -> Position {
        self.token.pos
    }

    /// The field's declared type, or [`FieldType::Invalid`] for unknown fields.
    pub fn field_type(&self, fields: &dyn FieldTypeDescriptor) -> FieldType {
        fields.field_type(self.name()).unwrap_or(FieldType::Invalid)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// Unescaped contents
    pub value: String,
    pub token: PositionedToken,
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for ch in self.value.chars() {
            match ch {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                '\r' => f.write_str("\\r")?,
                ch => write!(f, "{}", ch)?,
            }
        }
        f.write_str("\"")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: Decimal,
    pub token: PositionedToken,
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A calendar date/time in the local time zone.
#[derive(Debug, Clone)]
pub struct DateLiteral {
    pub value: DateTime<Local>,
    /// The string literal token this date was parsed from
    pub token: PositionedToken,
}

impl PartialEq for DateLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for DateLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.format(DATE_TIME_FORMAT))
    }
}

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobLiteral {
    pub pattern: GlobPattern,
    /// The string literal token this pattern was compiled from
    pub token: PositionedToken,
}

impl GlobLiteral {
    /// The pattern text as written in the query, without quotes.
    pub fn source(&self) -> &str {
        self.pattern.as_str()
    }
}

impl PartialEq for GlobLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.source() == other.source()
    }
}

impl fmt::Display for GlobLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source())
    }
}

/// A compiled regular expression.
#[derive(Debug, Clone)]
pub struct RegexLiteral {
    pub regex: Regex,
    /// The string literal token this regex was compiled from
    pub token: PositionedToken,
}

impl PartialEq for RegexLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str()
    }
}

impl fmt::Display for RegexLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}
