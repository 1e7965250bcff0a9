//! Structural validation of form schemas.
//!
//! Catches problems that would otherwise only surface when a form is
//! generated: an empty schema name, blank or duplicate field keys, and option
//! lists that repeat a value.
//!
//! # Examples
//!
//! ```
//! use form_schema_core::*;
//!
//! let schema = FormSchema::new("user").field("email", fields::email(FieldMetadata::default()));
//! assert!(validate_schema(&schema).is_empty());
//!
//! let bad = FormSchema::new("user")
//!     .field("email", fields::email(FieldMetadata::default()))
//!     .field("email", fields::string(FieldMetadata::default()));
//! assert_eq!(
//!     validate_schema(&bad),
//!     vec![SchemaValidationError::DuplicateField("email".into())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{FormSchema, extract_metadata};

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaValidationError {
    /// Schema name is empty or whitespace-only.
    #[error("schema name cannot be empty")]
    EmptySchemaName,
    /// A field key is empty or whitespace-only.
    #[error("field key cannot be empty")]
    BlankFieldKey,
    /// Two fields share a key.
    #[error("duplicate field: {0}")]
    DuplicateField(String),
    /// A field's option list repeats a value.
    #[error("duplicate option value '{value}' in field {field}")]
    DuplicateOptionValue { field: String, value: String },
}

/// Validates a form schema.
///
/// Returns early on an empty schema name; otherwise every problem found is
/// reported, in field order.
pub fn validate_schema(schema: &FormSchema) -> Vec<SchemaValidationError> {
    let mut errors = Vec::new();

    if schema.name.trim().is_empty() {
        errors.push(SchemaValidationError::EmptySchemaName);
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (key, validator) in &schema.fields {
        if key.trim().is_empty() {
            errors.push(SchemaValidationError::BlankFieldKey);
            continue;
        }
        if !seen.insert(key.as_str()) {
            errors.push(SchemaValidationError::DuplicateField(key.clone()));
            continue;
        }

        let Some(options) = extract_metadata(validator).options else {
            continue;
        };
        let mut values: HashSet<&str> = HashSet::new();
        for option in &options {
            if !values.insert(option.value.as_str()) {
                errors.push(SchemaValidationError::DuplicateOptionValue {
                    field: key.clone(),
                    value: option.value.clone(),
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldMetadata, FieldOption, Validator, fields};

    #[test]
    fn test_valid_schema() {
        let schema = FormSchema::new("user")
            .field("username", fields::string(FieldMetadata::default()))
            .field(
                "status",
                fields::select(
                    vec![
                        FieldOption::new("ACTIVE", "Active"),
                        FieldOption::new("INACTIVE", "Inactive"),
                    ],
                    FieldMetadata::default(),
                ),
            );
        assert!(validate_schema(&schema).is_empty());
    }

    #[test]
    fn test_empty_schema_name() {
        let schema = FormSchema::new("  ").field("", Validator::string());
        assert_eq!(
            validate_schema(&schema),
            vec![SchemaValidationError::EmptySchemaName]
        );
    }

    #[test]
    fn test_blank_and_duplicate_keys() {
        let schema = FormSchema::new("user")
            .field(" ", Validator::string())
            .field("name", Validator::string())
            .field("name", Validator::number());
        assert_eq!(
            validate_schema(&schema),
            vec![
                SchemaValidationError::BlankFieldKey,
                SchemaValidationError::DuplicateField("name".into()),
            ]
        );
    }

    #[test]
    fn test_duplicate_option_value() {
        let schema = FormSchema::new("user").field(
            "roles",
            fields::multi_select(
                vec![
                    FieldOption::new("admin", "Admin"),
                    FieldOption::new("admin", "Administrator"),
                ],
                FieldMetadata::default(),
            ),
        );
        let errors = validate_schema(&schema);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "duplicate option value 'admin' in field roles"
        );
    }

    #[test]
    fn test_empty_field_set_is_structurally_valid() {
        assert!(validate_schema(&FormSchema::new("empty")).is_empty());
    }
}
