//! Form data model definitions.
//!
//! This module defines the UI-facing data attached to validators and the
//! render-ready descriptors derived from them. The types are designed for
//! serialization with [`serde`] so that descriptors, overrides and option
//! lists can travel through JSON and YAML.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Validator;

/// Kind of input a field renders as.
///
/// The rendering layer picks a concrete control by kind. When a validator
/// carries no kind, descriptor generation falls back to
/// [`FieldKind::String`].
///
/// # Examples
///
/// ```
/// use form_schema_core::FieldKind;
///
/// assert_eq!(FieldKind::default(), FieldKind::String);
/// assert_eq!(FieldKind::MultiSelect.as_str(), "multi-select");
/// assert!(FieldKind::Select.is_choice());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// Single-line text (the default).
    #[default]
    String,
    Checkbox,
    Switch,
    Password,
    /// Single choice out of an option list.
    Select,
    Textarea,
    Number,
    Email,
    /// Any number of choices out of an option list.
    MultiSelect,
    Tel,
    Url,
    Date,
}

impl FieldKind {
    /// Returns the serialized name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Switch => "switch",
            FieldKind::Password => "password",
            FieldKind::Select => "select",
            FieldKind::Textarea => "textarea",
            FieldKind::Number => "number",
            FieldKind::Email => "email",
            FieldKind::MultiSelect => "multi-select",
            FieldKind::Tel => "tel",
            FieldKind::Url => "url",
            FieldKind::Date => "date",
        }
    }

    /// Returns `true` for kinds that render an option list.
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::MultiSelect)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a select or multi-select option list.
///
/// `value` must be unique within one field's list. The list is used as
/// given and never deduplicated.
///
/// # Examples
///
/// ```
/// use form_schema_core::FieldOption;
///
/// let admin = FieldOption::new("admin", "Administrator").fixed();
/// assert_eq!(admin.value, "admin");
/// assert_eq!(admin.fixed, Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Value submitted when the option is chosen.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// The option cannot be removed once chosen (multi-select only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<bool>,
    /// Additional renderer-specific properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldOption {
    /// Creates an enabled option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: None,
            fixed: None,
            extra: Map::new(),
        }
    }

    /// Marks the option as not selectable.
    pub fn disabled(mut self) -> Self {
        self.disabled = Some(true);
        self
    }

    /// Marks the option as not removable.
    pub fn fixed(mut self) -> Self {
        self.fixed = Some(true);
        self
    }

    /// Returns the option as a `{label, value}` JSON object, the shape
    /// multi-select values are submitted in.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("label".to_string(), Value::String(self.label.clone()));
        map.insert("value".to_string(), Value::String(self.value.clone()));
        Value::Object(map)
    }
}

/// UI metadata bundle attached to a validator.
///
/// Every key is optional. Bundles combine with [`merge`](Self::merge), a
/// shallow right-biased merge: keys defined on the right side win, absent
/// keys are inherited from the left.
///
/// # Examples
///
/// ```
/// use form_schema_core::{FieldKind, FieldMetadata};
///
/// let base = FieldMetadata::kind(FieldKind::Email).with_label("E-mail");
/// let patch = FieldMetadata::default().with_placeholder("name@example.com");
///
/// let merged = base.merge(&patch);
/// assert_eq!(merged.kind, Some(FieldKind::Email));
/// assert_eq!(merged.label.as_deref(), Some("E-mail"));
/// assert_eq!(merged.placeholder.as_deref(), Some("name@example.com"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl FieldMetadata {
    /// Creates a bundle that only names a kind.
    pub fn kind(kind: FieldKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Returns `true` when no key is defined.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.label.is_none()
            && self.placeholder.is_none()
            && self.description.is_none()
            && self.hidden.is_none()
            && self.disabled.is_none()
            && self.options.is_none()
    }

    /// Shallow right-biased merge: `other`'s defined keys override `self`.
    pub fn merge(&self, other: &FieldMetadata) -> FieldMetadata {
        FieldMetadata {
            kind: other.kind.or(self.kind),
            label: other.label.clone().or_else(|| self.label.clone()),
            placeholder: other
                .placeholder
                .clone()
                .or_else(|| self.placeholder.clone()),
            description: other
                .description
                .clone()
                .or_else(|| self.description.clone()),
            hidden: other.hidden.or(self.hidden),
            disabled: other.disabled.or(self.disabled),
            options: other.options.clone().or_else(|| self.options.clone()),
        }
    }
}

/// Caller-supplied per-field patch.
///
/// Every defined key takes precedence over the metadata extracted from the
/// field's validator. `error_message` is carried through to the form plan for
/// the error display layer and does not affect descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(
        default,
        rename = "errorMessage",
        alias = "error_message",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_message: Option<String>,
}

impl FieldOverride {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// Option lists keyed by field name. Replaces the options carried in metadata.
pub type FieldOptions = HashMap<String, Vec<FieldOption>>;

/// Overrides keyed by field name.
pub type FieldOverrides = HashMap<String, FieldOverride>;

/// Fully resolved, render-ready description of one form field.
///
/// Descriptors are derived on every generation call and carry no identity
/// beyond `name`. The validator is shared with the schema and is not
/// serialized.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Field key within the schema.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub hidden: bool,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(skip)]
    pub validator: Validator,
    /// Normalized default, filled in when a form plan is built.
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

/// Outcome tag of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    Success,
    Error,
}

/// Result handed back by a submit handler.
///
/// # Examples
///
/// ```
/// use form_schema_core::{SubmitResult, SubmitStatus};
///
/// let ok = SubmitResult::success("Saved", None);
/// assert_eq!(ok.status, SubmitStatus::Success);
/// assert!(!SubmitResult::error("Rejected").is_success());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub status: SubmitStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl SubmitResult {
    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status: SubmitStatus::Success,
            message: message.into(),
            data,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SubmitStatus::Error,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SubmitStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&FieldKind::MultiSelect).unwrap();
        assert_eq!(json, "\"multi-select\"");
        let kind: FieldKind = serde_json::from_str("\"switch\"").unwrap();
        assert_eq!(kind, FieldKind::Switch);
    }

    #[test]
    fn test_merge_is_right_biased() {
        let left = FieldMetadata::kind(FieldKind::Select)
            .with_label("Status")
            .with_hidden(true)
            .with_options(vec![FieldOption::new("a", "A")]);
        let right = FieldMetadata::default()
            .with_label("Account status")
            .with_hidden(false);

        let merged = left.merge(&right);
        assert_eq!(merged.kind, Some(FieldKind::Select));
        assert_eq!(merged.label.as_deref(), Some("Account status"));
        assert_eq!(merged.hidden, Some(false));
        assert_eq!(merged.options.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_merge_with_empty_keeps_everything() {
        let left = FieldMetadata::kind(FieldKind::Date).with_placeholder("YYYY-MM-DD");
        assert_eq!(left.merge(&FieldMetadata::default()), left);
        assert_eq!(FieldMetadata::default().merge(&left), left);
    }

    #[test]
    fn test_metadata_deserializes_type_key() {
        let meta: FieldMetadata =
            serde_json::from_str(r#"{"type": "textarea", "label": "Bio"}"#).unwrap();
        assert_eq!(meta.kind, Some(FieldKind::Textarea));
        assert_eq!(meta.label.as_deref(), Some("Bio"));
        assert!(!meta.is_empty());
        assert!(FieldMetadata::default().is_empty());
    }

    #[test]
    fn test_option_keeps_extra_properties() {
        let option: FieldOption =
            serde_json::from_str(r##"{"value": "red", "label": "Red", "color": "#f00"}"##).unwrap();
        assert_eq!(option.extra.get("color"), Some(&Value::String("#f00".into())));
        let back = serde_json::to_value(&option).unwrap();
        assert_eq!(back["color"], "#f00");
        assert!(back.get("disabled").is_none());
    }

    #[test]
    fn test_override_accepts_both_error_message_spellings() {
        let camel: FieldOverride = serde_json::from_str(r#"{"errorMessage": "x"}"#).unwrap();
        let snake: FieldOverride = serde_json::from_str(r#"{"error_message": "x"}"#).unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.error_message.as_deref(), Some("x"));
    }
}
