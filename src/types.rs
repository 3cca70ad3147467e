//! Field types and the lookup that assigns them to field names.

use std::{collections::HashMap, fmt, str::FromStr};

/// The value type of a field or literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    /// Unknown or absent; never the declared type of a real field
    Invalid,
    String,
    Number,
    Date,
    Glob,
    Regex,
}

impl FieldType {
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Invalid => "Invalid",
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Date => "Date",
            FieldType::Glob => "Glob",
            FieldType::Regex => "Regex",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type: '{0}' (expected one of String, Number, Date, Glob, Regex)")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    /// Case-insensitive. `Invalid` is not accepted: it is not a declarable type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(FieldType::String),
            "number" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            "glob" => Ok(FieldType::Glob),
            "regex" => Ok(FieldType::Regex),
            _ => Err(UnknownFieldType(s.to_string())),
        }
    }
}

/// Joins type names for diagnostics, e.g. `String, Number`.
pub fn type_names(types: &[FieldType]) -> String {
    types
        .iter()
        .map(|field_type| field_type.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reports the declared type of a field, if the field exists.
///
/// Must answer consistently for the duration of one analysis.
pub trait FieldTypeDescriptor {
    fn field_type(&self, field_name: &str) -> Option<FieldType>;
}

impl FieldTypeDescriptor for HashMap<String, FieldType> {
    fn field_type(&self, field_name: &str) -> Option<FieldType> {
        self.get(field_name).copied()
    }
}
