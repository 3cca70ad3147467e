//! CLI support for recsel
//!
//! Provides programmatic access to the `check` command for embedding in other
//! tools.

mod check;

pub use check::{CheckOptions, CheckResult, execute_check, load_schema};

use std::io;

use crate::Diagnostic;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Schema error: {0}")]
    Schema(#[from] crate::SchemaError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No query provided. Pass it as an argument or pipe it to stdin.")]
    NoQuery,

    /// The query parsed but failed validation
    #[error("{}", render_diagnostics(.0))]
    Invalid(Vec<Diagnostic>),
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
