//! Required-field detection.
//!
//! A field is required exactly when its validator rejects an absent value.
//! Optional and defaulted validators accept absence, so a field with a
//! default is reported as not required even if its inner validator would
//! reject a blank value.

use std::collections::BTreeMap;

use crate::{FieldDescriptor, Validator};

/// Returns `true` when `validator` rejects absence.
///
/// # Examples
///
/// ```
/// use form_schema_core::{FieldMetadata, fields, is_required};
///
/// let username = fields::string(FieldMetadata::default());
/// assert!(is_required(&username));
/// assert!(!is_required(&username.optional()));
/// ```
pub fn is_required(validator: &Validator) -> bool {
    validator.parse(None).is_err()
}

/// Maps each descriptor's name to whether it is required.
pub fn required_fields(descriptors: &[FieldDescriptor]) -> BTreeMap<String, bool> {
    descriptors
        .iter()
        .map(|field| (field.name.clone(), is_required(&field.validator)))
        .collect()
}
