//! Declarative schema files.
//!
//! A [`SchemaDeclaration`] describes a form schema as data so it can live in
//! YAML or JSON next to the application instead of in code. Compiling it
//! produces the same validators the [`fields`] constructors build by hand.
//!
//! # Example YAML
//!
//! ```yaml
//! name: user
//! fields:
//!   - key: username
//!     type: string
//!     label: Username
//!     min: 3
//!     message: Username must be at least 3 characters
//!   - key: status
//!     type: select
//!     label: Status
//!     optional: true
//!     options:
//!       - { value: ACTIVE, label: Active }
//!       - { value: INACTIVE, label: Inactive }
//!   - key: roles
//!     type: multi-select
//!     options:
//!       - { value: admin, label: Admin }
//!       - { value: user, label: User }
//! ```

use form_schema_core::{
    FieldConfigurationError, FieldKind, FieldMetadata, FieldOption, FormSchema, Validator, fields,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named form schema in declaration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDeclaration {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

/// One field of a [`SchemaDeclaration`].
///
/// `min` and `max` bound the length of text, the value of numbers and the
/// number of selected items of a multi-select. `message` replaces the
/// message of the last declared check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub key: String,
    #[serde(default, rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl SchemaDeclaration {
    /// Compiles every field, in order, into a [`FormSchema`].
    ///
    /// # Errors
    ///
    /// Returns the first field whose settings cannot be applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use form_schema_db::SchemaDeclaration;
    /// use serde_json::json;
    ///
    /// let yaml = r#"
    /// name: login
    /// fields:
    ///   - key: email
    ///     type: email
    ///   - key: remember
    ///     type: switch
    ///     optional: true
    /// "#;
    /// let declaration: SchemaDeclaration = serde_yaml::from_str(yaml).unwrap();
    /// let schema = declaration.compile().unwrap();
    /// assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["email", "remember"]);
    /// assert!(schema.get("email").unwrap().parse_value(&json!("a@b.io")).is_ok());
    /// ```
    pub fn compile(&self) -> Result<FormSchema, FieldConfigurationError> {
        self.fields
            .iter()
            .try_fold(FormSchema::new(self.name.clone()), |schema, field| {
                Ok(schema.field(field.key.clone(), field.compile()?))
            })
    }
}

impl FieldDeclaration {
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            kind,
            ..Self::default()
        }
    }

    /// UI metadata declared for this field, without its kind.
    pub fn metadata(&self) -> FieldMetadata {
        FieldMetadata {
            kind: None,
            label: self.label.clone(),
            placeholder: self.placeholder.clone(),
            description: self.description.clone(),
            hidden: self.hidden.then_some(true),
            disabled: self.disabled.then_some(true),
            options: None,
        }
    }

    /// Builds the validator this declaration describes.
    pub fn compile(&self) -> Result<Validator, FieldConfigurationError> {
        if !self.options.is_empty() && !self.kind.is_choice() {
            return Err(self.invalid(format!(
                "options are not supported for {} fields",
                self.kind
            )));
        }

        let mut validator = self.base()?;

        if self.min.is_some() || self.max.is_some() {
            if !supports_bounds(self.kind) {
                return Err(self.invalid(format!(
                    "min and max are not supported for {} fields",
                    self.kind
                )));
            }
            if let (Some(min), Some(max)) = (self.min, self.max) {
                if min > max {
                    return Err(self.invalid(format!("min {min} is greater than max {max}")));
                }
            }
        }
        if let Some(min) = self.min {
            validator = validator.min(min);
        }
        if let Some(max) = self.max {
            validator = validator.max(max);
        }

        if let Some(pattern) = &self.pattern {
            if !is_text(self.kind) {
                return Err(self.invalid(format!(
                    "pattern is not supported for {} fields",
                    self.kind
                )));
            }
            let regex = Regex::new(pattern)
                .map_err(|err| self.invalid(format!("invalid pattern '{pattern}': {err}")))?;
            validator = validator.regex(regex);
        }

        if let Some(message) = &self.message {
            validator = validator.message(message.clone());
        }
        if self.nullable {
            validator = validator.nullable();
        }
        if self.optional {
            validator = validator.optional();
        }
        if let Some(default) = &self.default {
            if let Err(err) = validator.parse_value(default) {
                return Err(self.invalid(format!("default value is rejected: {err}")));
            }
            validator = validator.default(default.clone());
        }

        Ok(validator)
    }

    fn base(&self) -> Result<Validator, FieldConfigurationError> {
        let meta = self.metadata();
        let validator = match self.kind {
            FieldKind::String => fields::string(meta),
            FieldKind::Email => fields::email(meta),
            FieldKind::Password => fields::password(meta),
            FieldKind::Textarea => fields::textarea(meta),
            FieldKind::Tel => fields::tel(meta),
            FieldKind::Url => fields::url(meta),
            FieldKind::Number => fields::number(meta),
            FieldKind::Date => fields::date(meta),
            FieldKind::Checkbox | FieldKind::Switch => {
                fields::boolean(meta.with_kind(self.kind))
            }
            FieldKind::Select => fields::select(self.options.clone(), meta),
            FieldKind::MultiSelect => {
                if self.options.is_empty() {
                    return Err(self.invalid("multi-select fields need at least one option"));
                }
                fields::multi_select(self.options.clone(), meta)
            }
        };
        Ok(validator)
    }

    fn invalid(&self, reason: impl Into<String>) -> FieldConfigurationError {
        FieldConfigurationError::invalid(self.key.clone(), reason)
    }
}

fn is_text(kind: FieldKind) -> bool {
    matches!(
        kind,
        FieldKind::String
            | FieldKind::Email
            | FieldKind::Password
            | FieldKind::Textarea
            | FieldKind::Tel
            | FieldKind::Url
    )
}

fn supports_bounds(kind: FieldKind) -> bool {
    is_text(kind) || matches!(kind, FieldKind::Number | FieldKind::MultiSelect)
}
