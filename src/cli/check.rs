//! Validate queries against a field schema

use std::{fs, path::PathBuf};

use tracing::{debug, trace};

use super::CliError;
use crate::{Expr, FieldSchema, analyze};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to check
    pub query: String,
    /// JSON schema file mapping field names to types
    pub schema_path: Option<PathBuf>,
    /// Extra `name:type` field declarations, applied after the schema file
    pub fields: Vec<String>,
}

/// Result of a successful check
#[derive(Debug)]
pub enum CheckResult {
    /// The query is well-typed; carries the processed expression
    Valid(Expr),
}

/// Builds the field schema from a schema file and inline declarations.
pub fn load_schema(options: &CheckOptions) -> Result<FieldSchema, CliError> {
    let mut schema = match &options.schema_path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            FieldSchema::from_json(&json)?
        }
        None => FieldSchema::new(),
    };

    for spec in &options.fields {
        let (name, field_type) = FieldSchema::parse_field_spec(spec)?;
        schema.insert(name, field_type);
    }

    debug!(fields = schema.len(), "loaded field schema");
    for (name, field_type) in schema.iter() {
        trace!(field = name, %field_type, "declared field");
    }
    Ok(schema)
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.query.trim().is_empty() {
        return Err(CliError::NoQuery);
    }

    let schema = load_schema(options)?;
    let (expr, diagnostics) = analyze(&options.query, &schema)?;

    if diagnostics.is_empty() {
        Ok(CheckResult::Valid(expr))
    } else {
        Err(CliError::Invalid(diagnostics))
    }
}
