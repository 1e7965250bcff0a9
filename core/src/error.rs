//! Error types for registration and descriptor generation.
//!
//! Extraction problems never appear here: they degrade to an empty metadata
//! bundle (see [`ExtractionWarning`](crate::ExtractionWarning)). Everything
//! below is surfaced to the caller, which decides how the form reacts.

use thiserror::Error;

use crate::SchemaValidationError;

/// Why a single field could not be turned into a descriptor or validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldConfigurationCause {
    /// The field key is empty or whitespace-only.
    #[error("field name is blank")]
    BlankName,
    /// The field key occurs more than once in the schema.
    #[error("field name is declared more than once")]
    DuplicateName,
    /// A declared validation setting cannot be applied to the field.
    #[error("{0}")]
    InvalidDeclaration(String),
}

/// Failure attributable to one field.
///
/// Treated as fatal for the whole form: generation stops at the first
/// misconfigured field instead of silently dropping it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' is misconfigured: {cause}")]
pub struct FieldConfigurationError {
    pub field: String,
    #[source]
    pub cause: FieldConfigurationCause,
}

impl FieldConfigurationError {
    pub fn new(field: impl Into<String>, cause: FieldConfigurationCause) -> Self {
        Self {
            field: field.into(),
            cause,
        }
    }

    /// Shorthand for [`FieldConfigurationCause::InvalidDeclaration`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(field, FieldConfigurationCause::InvalidDeclaration(reason.into()))
    }
}

/// Form-level failures of a generation call.
///
/// # Examples
///
/// ```
/// use form_schema_core::{FieldOptions, FieldOverrides, FormError, SchemaRegistry};
///
/// let registry = SchemaRegistry::new();
/// let err = registry
///     .generate("nonexistent-schema", &FieldOptions::new(), &FieldOverrides::new())
///     .unwrap_err();
/// assert!(matches!(err, FormError::SchemaNotFound(_)));
/// assert_eq!(err.to_string(), "schema not found: nonexistent-schema");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// No schema is registered under the requested name.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),
    /// The schema resolved but yields no fields.
    #[error("schema '{0}' has no fields")]
    EmptyFieldSet(String),
    /// One field is misconfigured.
    #[error(transparent)]
    FieldConfiguration(#[from] FieldConfigurationError),
}

/// Failures while populating a [`SchemaRegistry`](crate::SchemaRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A schema with the same name is already registered.
    #[error("duplicate schema name: {0}")]
    DuplicateSchema(String),
    /// The schema failed structural validation.
    #[error("invalid schema '{name}': {}", join_errors(.errors))]
    InvalidSchema {
        name: String,
        errors: Vec<SchemaValidationError>,
    },
}

fn join_errors(errors: &[SchemaValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_configuration_error_names_field() {
        let err = FieldConfigurationError::invalid("age", "pattern is not supported for number fields");
        assert_eq!(
            err.to_string(),
            "field 'age' is misconfigured: pattern is not supported for number fields"
        );
        let form: FormError = err.into();
        assert!(form.to_string().contains("'age'"));
    }

    #[test]
    fn test_registry_error_lists_problems() {
        let err = RegistryError::InvalidSchema {
            name: "user".into(),
            errors: vec![
                SchemaValidationError::BlankFieldKey,
                SchemaValidationError::DuplicateField("email".into()),
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("invalid schema 'user': "));
        assert!(text.contains("email"));
    }
}
