//! # Query Expression Abstract Syntax Tree
//!
//! The tree the parser builds from a record-selection query and the
//! analyzer ([`crate::convert`], [`crate::validate`]) consumes.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens, with their source text and position
//! - **[literals]** - Value nodes: identifiers and the literal kinds
//! - **[operators]** - Comparison operators and logical connectives
//! - **[expressions]** - The closed [`Expr`] sum type tying the nodes together
//!
//! ## Quick Start
//!
//! ```text
//! name GLOB "*.rs" AND (created >= "2021-06-01" OR NOT size > 1024)
//! ```
//!
//! ## Core Concepts
//!
//! ### Logical vs value nodes
//!
//! Unary, binary and parenthesized expressions resolve to a boolean; they are
//! the only nodes allowed at the root of a query or as operands of `AND`,
//! `OR` and `NOT`. Identifiers and literals denote values and are the only
//! nodes allowed on either side of a comparison.
//!
//! ### Materialized literals
//!
//! The parser only ever produces string and number literals. Date, glob and
//! regex literals are created by the type-conversion pass, once it knows what
//! field a string literal is being compared against. They keep the token of
//! the string literal they replaced, so positions and source text survive.
pub mod expressions;
pub mod literals;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use literals::{
    DateLiteral, GlobLiteral, Identifier, NumberLiteral, RegexLiteral, StringLiteral,
};
pub use operators::{BinOp, UnaryOp};
pub use tokens::{PositionedToken, Token};
