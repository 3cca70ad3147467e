pub mod ast;
pub mod convert;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod pattern;
pub mod processor;
pub mod restrictions;
pub mod schema;
pub mod types;
pub mod validate;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{BinOp, Expr, PositionedToken, Token, UnaryOp};
pub use convert::convert_types;
pub use diagnostic::Diagnostic;
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser};
pub use pattern::{GlobError, GlobPattern};
pub use processor::{analyze, process};
pub use schema::{FieldSchema, SchemaError};
pub use types::{FieldType, FieldTypeDescriptor};
pub use validate::validate;
