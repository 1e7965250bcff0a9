//! Form plans: everything a renderer needs for one form.
//!
//! A [`FormPlan`] bundles the descriptors of a schema with required flags,
//! normalized initial values and per-field error messages, and validates
//! submitted values against the schema's validators.
//!
//! # Examples
//!
//! ```
//! use form_schema_core::*;
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::new()
//!     .with_schema(
//!         FormSchema::new("user")
//!             .field("username", fields::string(FieldMetadata::default().with_label("Username")))
//!             .field("bio", fields::textarea(FieldMetadata::default()).optional()),
//!     )
//!     .unwrap();
//!
//! let request = FormRequest::new().with_default_values(json!({"username": "ada"}));
//! let plan = registry.build_form("user", &request).unwrap();
//!
//! assert!(plan.is_required("username"));
//! assert!(!plan.is_required("bio"));
//! assert_eq!(plan.default_values["username"], json!("ada"));
//! assert_eq!(plan.default_values["bio"], json!(""));
//!
//! let result = plan.check_submission(&json!({"username": "ada"}));
//! assert!(result.is_success());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    FieldDescriptor, FieldOption, FieldOptions, FieldOverride, FieldOverrides, FormError,
    SchemaRegistry, SubmitResult, ValidationError, Validator, find_default, required_fields,
    resolve_default,
};

/// Caller inputs for building a form.
///
/// Serializable so it can be kept next to schema files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormRequest {
    /// Per-field option lists, replacing metadata options.
    #[serde(default, skip_serializing_if = "FieldOptions::is_empty")]
    pub options: FieldOptions,
    #[serde(default, skip_serializing_if = "FieldOverrides::is_empty")]
    pub overrides: FieldOverrides,
    /// Records searched in order for initial values.
    #[serde(
        default,
        rename = "defaultValues",
        alias = "default_values",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub default_values: Vec<Map<String, Value>>,
}

impl FormRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, field: impl Into<String>, options: Vec<FieldOption>) -> Self {
        self.options.insert(field.into(), options);
        self
    }

    pub fn with_override(mut self, field: impl Into<String>, patch: FieldOverride) -> Self {
        self.overrides.insert(field.into(), patch);
        self
    }

    /// Appends a record of initial values. Non-object values are ignored.
    pub fn with_default_values(mut self, record: Value) -> Self {
        if let Value::Object(map) = record {
            self.default_values.push(map);
        }
        self
    }
}

/// Resolved form, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct FormPlan {
    pub schema: String,
    pub fields: Vec<FieldDescriptor>,
    pub required: BTreeMap<String, bool>,
    /// Normalized initial value of every field.
    #[serde(rename = "defaultValues")]
    pub default_values: Map<String, Value>,
    /// Override error messages keyed by field name.
    #[serde(rename = "errorMessages", skip_serializing_if = "BTreeMap::is_empty")]
    pub error_messages: BTreeMap<String, String>,
    #[serde(skip)]
    submission: Validator,
}

impl FormPlan {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields that are not hidden, in declaration order.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| !field.hidden)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.get(name).copied().unwrap_or(false)
    }

    pub fn error_message(&self, name: &str) -> Option<&str> {
        self.error_messages.get(name).map(String::as_str)
    }

    /// Validates a submitted values object.
    ///
    /// Keys without a field are dropped from the output.
    pub fn validate_submission(&self, values: &Value) -> Result<Value, ValidationError> {
        let parsed = self.submission.parse_value(values)?;
        Ok(parsed.unwrap_or_else(|| Value::Object(Map::new())))
    }

    /// Validates a submission and wraps the outcome for a submit handler.
    ///
    /// Issues on a field with an override error message report that message
    /// instead of the validator's.
    pub fn check_submission(&self, values: &Value) -> SubmitResult {
        match self.validate_submission(values) {
            Ok(data) => SubmitResult::success("Form submitted successfully", Some(data)),
            Err(err) => {
                let messages: Vec<String> = err
                    .issues
                    .iter()
                    .map(|issue| {
                        let custom = issue.path.first().and_then(|field| self.error_message(field));
                        match custom {
                            Some(message) => format!("{}: {message}", issue.dotted_path()),
                            None => issue.to_string(),
                        }
                    })
                    .collect();
                SubmitResult::error(messages.join("; "))
            }
        }
    }
}

/// Builds the plan of the schema registered as `name`.
pub fn build_form(
    registry: &SchemaRegistry,
    name: &str,
    request: &FormRequest,
) -> Result<FormPlan, FormError> {
    let mut fields = registry.generate(name, &request.options, &request.overrides)?;
    let submission = registry.schema(name)?.to_validator();

    let mut default_values = Map::new();
    for field in &mut fields {
        let value = resolve_default(field.kind, find_default(&request.default_values, &field.name));
        default_values.insert(field.name.clone(), value.clone());
        field.default_value = Some(value);
    }

    let error_messages = request
        .overrides
        .iter()
        .filter_map(|(field, patch)| {
            patch
                .error_message
                .as_ref()
                .map(|message| (field.clone(), message.clone()))
        })
        .collect();

    debug!(schema = name, fields = fields.len(), "built form plan");
    Ok(FormPlan {
        schema: name.to_string(),
        required: required_fields(&fields),
        fields,
        default_values,
        error_messages,
        submission,
    })
}

impl SchemaRegistry {
    /// Method form of [`build_form`].
    pub fn build_form(&self, name: &str, request: &FormRequest) -> Result<FormPlan, FormError> {
        build_form(self, name, request)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{FieldKind, FieldMetadata, FormSchema, SubmitStatus, fields};

    fn registry() -> SchemaRegistry {
        let schema = FormSchema::new("user")
            .field(
                "username",
                fields::string(FieldMetadata::default().with_label("Username"))
                    .min(3.0)
                    .message("Username must be at least 3 characters"),
            )
            .field("email", fields::email(FieldMetadata::default().with_label("Email")))
            .field(
                "status",
                fields::select(
                    vec![
                        FieldOption::new("ACTIVE", "Active"),
                        FieldOption::new("INACTIVE", "Inactive"),
                    ],
                    FieldMetadata::default().with_label("Status"),
                )
                .optional(),
            )
            .field(
                "roles",
                fields::multi_select(
                    vec![FieldOption::new("admin", "Admin"), FieldOption::new("user", "User")],
                    FieldMetadata::default().with_label("Roles"),
                ),
            )
            .field("id", Validator::string().optional().hidden());
        SchemaRegistry::new().with_schema(schema).unwrap()
    }

    #[test]
    fn test_plan_normalizes_defaults() {
        let request = FormRequest::new()
            .with_default_values(json!({
                "roles": {"label": "Admin", "value": "admin"},
                "status": {"label": "Active", "value": "ACTIVE"},
            }))
            .with_default_values(json!({"username": "ada", "status": "INACTIVE"}));
        let plan = registry().build_form("user", &request).unwrap();

        assert_eq!(
            plan.default_values["roles"],
            json!([{"label": "Admin", "value": "admin"}])
        );
        assert_eq!(plan.default_values["status"], json!("ACTIVE"));
        assert_eq!(plan.default_values["username"], json!("ada"));
        assert_eq!(plan.default_values["email"], json!(""));
        assert_eq!(
            plan.field("roles").unwrap().default_value,
            Some(json!([{"label": "Admin", "value": "admin"}]))
        );
    }

    #[test]
    fn test_visible_fields_skip_hidden() {
        let plan = registry().build_form("user", &FormRequest::new()).unwrap();
        let visible: Vec<_> = plan.visible_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(visible, vec!["username", "email", "status", "roles"]);
        assert_eq!(plan.fields.len(), 5);
    }

    #[test]
    fn test_required_flags() {
        let plan = registry().build_form("user", &FormRequest::new()).unwrap();
        assert!(plan.is_required("username"));
        assert!(plan.is_required("roles"));
        assert!(!plan.is_required("status"));
        assert!(!plan.is_required("id"));
        assert!(!plan.is_required("unknown"));
    }

    #[test]
    fn test_options_and_overrides_flow_through() {
        let request = FormRequest::new()
            .with_options("status", vec![FieldOption::new("LOCKED", "Locked")])
            .with_override("email", FieldOverride::label("Work email").with_error_message("Use your work address"));
        let plan = registry().build_form("user", &request).unwrap();
        let status = plan.field("status").unwrap();
        assert_eq!(status.kind, FieldKind::Select);
        assert_eq!(status.options.as_ref().unwrap()[0].value, "LOCKED");
        assert_eq!(plan.field("email").unwrap().label, "Work email");
        assert_eq!(plan.error_message("email"), Some("Use your work address"));
    }

    #[test]
    fn test_valid_submission() {
        let plan = registry().build_form("user", &FormRequest::new()).unwrap();
        let result = plan.check_submission(&json!({
            "username": "ada",
            "email": "ada@example.com",
            "roles": [{"label": "Admin", "value": "admin"}],
            "extra": true,
        }));
        assert_eq!(result.status, SubmitStatus::Success);
        let data = result.data.unwrap();
        assert_eq!(data["username"], json!("ada"));
        assert!(data.get("extra").is_none());
        assert!(data.get("status").is_none());
    }

    #[test]
    fn test_invalid_submission_reports_each_field() {
        let request = FormRequest::new()
            .with_override("email", FieldOverride::default().with_error_message("Use your work address"));
        let plan = registry().build_form("user", &request).unwrap();
        let result = plan.check_submission(&json!({
            "username": "ad",
            "email": "nope",
            "roles": [],
        }));
        assert_eq!(result.status, SubmitStatus::Error);
        assert!(result.data.is_none());
        assert!(
            result
                .message
                .contains("username: Username must be at least 3 characters")
        );
        assert!(result.message.contains("email: Use your work address"));
        assert!(result.message.contains("roles: This field is required"));
    }

    #[test]
    fn test_unknown_schema_fails() {
        let err = registry()
            .build_form("nonexistent-schema", &FormRequest::new())
            .unwrap_err();
        assert!(matches!(err, FormError::SchemaNotFound(_)));
    }

    #[test]
    fn test_request_deserializes_from_json() {
        let request: FormRequest = serde_json::from_value(json!({
            "overrides": {"email": {"label": "Mail", "errorMessage": "Bad mail"}},
            "defaultValues": [{"username": "ada"}],
        }))
        .unwrap();
        assert_eq!(request.overrides["email"].error_message.as_deref(), Some("Bad mail"));
        assert_eq!(request.default_values.len(), 1);
        assert!(request.options.is_empty());
    }

    #[test]
    fn test_plan_serializes() {
        let plan = registry().build_form("user", &FormRequest::new()).unwrap();
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["schema"], json!("user"));
        assert_eq!(value["fields"][0]["name"], json!("username"));
        assert_eq!(value["required"]["username"], json!(true));
        assert_eq!(value["defaultValues"]["roles"], json!([]));
        assert!(value.get("errorMessages").is_none());
    }
}
