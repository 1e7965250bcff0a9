//! Attaching UI metadata to validators.
//!
//! Metadata lives in a slot on each validator node. [`attach`] returns a copy
//! of the node whose slot holds the merge of the existing bundle and the new
//! one; validation behavior is untouched. Combinators on [`Validator`] copy the
//! slot into every node they create, so a bundle attached once is visible on
//! the whole chain that follows until another `attach` overrides keys.
//!
//! Attach only while declaring schemas. Once a schema is registered its
//! validators are read-only and can be read from any thread.

use crate::{FieldKind, FieldMetadata, Validator};

/// Associates `bundle` with `validator`.
///
/// The result carries `merge(existing, bundle)`: keys defined in `bundle`
/// override, all others are inherited.
///
/// # Examples
///
/// ```
/// use form_schema_core::{FieldKind, FieldMetadata, Validator, attach};
///
/// let username = attach(
///     &Validator::string(),
///     FieldMetadata::kind(FieldKind::String).with_label("Username"),
/// );
/// let narrowed = username.min(3.0).optional();
///
/// let meta = narrowed.metadata().unwrap();
/// assert_eq!(meta.label.as_deref(), Some("Username"));
/// ```
pub fn attach(validator: &Validator, bundle: FieldMetadata) -> Validator {
    let merged = match validator.metadata() {
        Some(existing) => existing.merge(&bundle),
        None => bundle,
    };
    validator.with_metadata_slot(Some(merged))
}

impl Validator {
    /// Method form of [`attach`].
    pub fn with_metadata(&self, bundle: FieldMetadata) -> Validator {
        attach(self, bundle)
    }

    pub fn with_kind(&self, kind: FieldKind) -> Validator {
        attach(self, FieldMetadata::kind(kind))
    }

    pub fn with_label(&self, label: impl Into<String>) -> Validator {
        attach(self, FieldMetadata::default().with_label(label))
    }

    pub fn with_placeholder(&self, placeholder: impl Into<String>) -> Validator {
        attach(self, FieldMetadata::default().with_placeholder(placeholder))
    }

    pub fn with_description(&self, description: impl Into<String>) -> Validator {
        attach(self, FieldMetadata::default().with_description(description))
    }

    pub fn hidden(&self) -> Validator {
        attach(self, FieldMetadata::default().with_hidden(true))
    }

    pub fn disabled(&self) -> Validator {
        attach(self, FieldMetadata::default().with_disabled(true))
    }
}
