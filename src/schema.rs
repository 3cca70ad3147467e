//! Configurable field schema.
//!
//! A [`FieldSchema`] is the concrete [`FieldTypeDescriptor`] used by the CLI and
//! by embedders that describe their record fields as data, either as a JSON
//! object or as `name:type` pairs.
//!
//! ```
//! use recsel::{FieldSchema, FieldType, FieldTypeDescriptor};
//!
//! let schema = FieldSchema::from_json(r#"{"author": "string", "created": "date"}"#).unwrap();
//! assert_eq!(schema.field_type("created"), Some(FieldType::Date));
//! assert_eq!(schema.field_type("missing"), None);
//! ```

use std::collections::BTreeMap;

use crate::types::{FieldType, FieldTypeDescriptor, UnknownFieldType};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema must be a JSON object mapping field names to type names")]
    NotAnObject,

    #[error("field '{field}': type must be a string")]
    TypeNotAString { field: String },

    #[error("field '{field}': {source}")]
    UnknownType {
        field: String,
        source: UnknownFieldType,
    },

    #[error("invalid field spec '{0}' (expected name:type)")]
    MalformedSpec(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: BTreeMap<String, FieldType>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.insert(name, field_type);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field_type: FieldType) {
        self.fields.insert(name.into(), field_type);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Parses `{"field": "type", ...}`. Type names are case-insensitive.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        let serde_json::Value::Object(entries) = value else {
            return Err(SchemaError::NotAnObject);
        };

        let mut schema = FieldSchema::new();
        for (field, type_name) in entries {
            let serde_json::Value::String(type_name) = type_name else {
                return Err(SchemaError::TypeNotAString { field });
            };
            let field_type = type_name
                .parse::<FieldType>()
                .map_err(|source| SchemaError::UnknownType {
                    field: field.clone(),
                    source,
                })?;
            schema.insert(field, field_type);
        }

        Ok(schema)
    }

    /// Parses a single `name:type` declaration.
    pub fn parse_field_spec(spec: &str) -> Result<(String, FieldType), SchemaError> {
        let Some((name, type_name)) = spec.split_once(':') else {
            return Err(SchemaError::MalformedSpec(spec.to_string()));
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(SchemaError::MalformedSpec(spec.to_string()));
        }

        let field_type = type_name
            .trim()
            .parse::<FieldType>()
            .map_err(|source| SchemaError::UnknownType {
                field: name.to_string(),
                source,
            })?;

        Ok((name.to_string(), field_type))
    }
}

impl FieldTypeDescriptor for FieldSchema {
    fn field_type(&self, field_name: &str) -> Option<FieldType> {
        self.fields.get(field_name).copied()
    }
}

impl<S: Into<String>> FromIterator<(S, FieldType)> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = (S, FieldType)>>(iter: I) -> Self {
        FieldSchema {
            fields: iter
                .into_iter()
                .map(|(name, field_type)| (name.into(), field_type))
                .collect(),
        }
    }
}
