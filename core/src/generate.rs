//! Turning a schema into render-ready field descriptors.
//!
//! Every property of a descriptor is resolved by the same precedence: a
//! defined override wins, then the metadata extracted from the field's
//! validator, then a fixed default (`String` kind, the field name as label,
//! not hidden, not disabled). Options are the exception: the caller's
//! per-field option list replaces the metadata's, it is never merged.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    FieldConfigurationCause, FieldConfigurationError, FieldDescriptor, FieldOption, FieldOptions,
    FieldOverride, FieldOverrides, FormSchema, Validator, extract_metadata,
};

/// Produces one descriptor per schema field, in declaration order.
///
/// Stops at the first field that cannot be described.
///
/// # Examples
///
/// ```
/// use form_schema_core::*;
///
/// let schema = FormSchema::new("user")
///     .field("username", fields::string(FieldMetadata::default().with_label("Username")))
///     .field("notes", Validator::string().optional());
///
/// let mut overrides = FieldOverrides::new();
/// overrides.insert("username".into(), FieldOverride::label("Login"));
///
/// let fields = generate_descriptors(&schema, &FieldOptions::new(), &overrides).unwrap();
/// assert_eq!(fields[0].label, "Login");
/// assert_eq!(fields[1].label, "notes");
/// assert_eq!(fields[1].kind, FieldKind::String);
/// ```
pub fn generate_descriptors(
    schema: &FormSchema,
    options: &FieldOptions,
    overrides: &FieldOverrides,
) -> Result<Vec<FieldDescriptor>, FieldConfigurationError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut descriptors = Vec::with_capacity(schema.len());

    for (name, validator) in &schema.fields {
        if name.trim().is_empty() {
            return Err(FieldConfigurationError::new(
                name.clone(),
                FieldConfigurationCause::BlankName,
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(FieldConfigurationError::new(
                name.clone(),
                FieldConfigurationCause::DuplicateName,
            ));
        }
        descriptors.push(describe_field(
            name,
            validator,
            options.get(name).map(Vec::as_slice),
            overrides.get(name),
        ));
    }

    debug!(
        schema = schema.name.as_str(),
        fields = descriptors.len(),
        "generated field descriptors"
    );
    Ok(descriptors)
}

/// Resolves the descriptor of a single field.
pub fn describe_field(
    name: &str,
    validator: &Validator,
    options: Option<&[FieldOption]>,
    field_override: Option<&FieldOverride>,
) -> FieldDescriptor {
    let metadata = extract_metadata(validator);
    let patch = field_override.cloned().unwrap_or_default();

    FieldDescriptor {
        name: name.to_string(),
        kind: metadata.kind.unwrap_or_default(),
        label: patch
            .label
            .or(metadata.label)
            .unwrap_or_else(|| name.to_string()),
        description: patch.description.or(metadata.description),
        placeholder: patch.placeholder.or(metadata.placeholder),
        hidden: patch.hidden.or(metadata.hidden).unwrap_or(false),
        disabled: patch.disabled.or(metadata.disabled).unwrap_or(false),
        options: options.map(<[FieldOption]>::to_vec).or(metadata.options),
        validator: validator.clone(),
        default_value: None,
    }
}
