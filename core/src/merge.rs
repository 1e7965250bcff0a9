//! Extending one schema with another's fields.
//!
//! [`merge_schemas`] builds a new schema from a base and an overlay, for
//! example an admin form that adds a `roles` field to the user form and
//! relabels an existing one. A [`MergeStrategy`] decides what happens to keys
//! both schemas declare.
//!
//! # Example
//!
//! ```
//! use form_schema_core::*;
//!
//! let user = FormSchema::new("user")
//!     .field("username", fields::string(FieldMetadata::default().with_label("Username")))
//!     .field("email", fields::email(FieldMetadata::default()));
//! let admin = FormSchema::new("user-admin").field(
//!     "roles",
//!     fields::multi_select(vec![FieldOption::new("admin", "Admin")], FieldMetadata::default()),
//! );
//!
//! let merged = merge_schemas(&user, &admin, MergeStrategy::PreferBase);
//! assert_eq!(merged.name, "user-admin");
//! assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["username", "email", "roles"]);
//! ```

use tracing::debug;

use crate::{FormSchema, Validator, attach, extract_metadata};

/// Resolution for keys declared by both schemas.
///
/// # Examples
///
/// ```
/// use form_schema_core::*;
///
/// let base = FormSchema::new("user").field("name", Validator::string().with_label("Name"));
/// let overlay = FormSchema::new("user").field("name", Validator::string().with_label("Full name"));
///
/// let m1 = merge_schemas(&base, &overlay, MergeStrategy::PreferBase);
/// assert_eq!(extract_metadata(m1.get("name").unwrap()).label.as_deref(), Some("Name"));
///
/// let m2 = merge_schemas(&base, &overlay, MergeStrategy::PreferOverlay);
/// assert_eq!(extract_metadata(m2.get("name").unwrap()).label.as_deref(), Some("Full name"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Keep the base validator.
    PreferBase,
    /// Replace with the overlay validator.
    PreferOverlay,
    /// Use the overlay validator, with its metadata layered over the base's
    /// so keys the overlay leaves undefined are inherited.
    Union,
}

/// Merges `overlay` into `base`.
///
/// Base keys keep their position; keys only the overlay declares are appended
/// in overlay order. The result is named after the overlay unless its name is
/// blank.
pub fn merge_schemas(base: &FormSchema, overlay: &FormSchema, strategy: MergeStrategy) -> FormSchema {
    let name = if overlay.name.trim().is_empty() {
        base.name.clone()
    } else {
        overlay.name.clone()
    };
    let mut merged = FormSchema {
        name,
        fields: base.fields.clone(),
    };

    for (key, validator) in &overlay.fields {
        let existing = merged.fields.iter_mut().find(|(k, _)| k == key);
        match existing {
            Some((_, current)) => {
                debug!(field = key.as_str(), ?strategy, "resolving shared field");
                *current = merge_field(current, validator, strategy);
            }
            None => merged.fields.push((key.clone(), validator.clone())),
        }
    }

    merged
}

fn merge_field(base: &Validator, overlay: &Validator, strategy: MergeStrategy) -> Validator {
    match strategy {
        MergeStrategy::PreferBase => base.clone(),
        MergeStrategy::PreferOverlay => overlay.clone(),
        MergeStrategy::Union => {
            let layered = extract_metadata(base).merge(&extract_metadata(overlay));
            attach(overlay, layered)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{FieldKind, FieldMetadata, fields};

    fn base() -> FormSchema {
        FormSchema::new("user")
            .field(
                "username",
                fields::string(
                    FieldMetadata::default()
                        .with_label("Username")
                        .with_placeholder("jdoe"),
                ),
            )
            .field("age", fields::number(FieldMetadata::default()).optional())
    }

    #[test]
    fn test_new_keys_are_appended_in_order() {
        let overlay = FormSchema::new("ext")
            .field("b", Validator::string())
            .field("a", Validator::string());
        let merged = merge_schemas(&base(), &overlay, MergeStrategy::PreferBase);
        assert_eq!(
            merged.keys().collect::<Vec<_>>(),
            vec!["username", "age", "b", "a"]
        );
    }

    #[test]
    fn test_prefer_overlay_replaces_in_place() {
        let overlay = FormSchema::new("").field("age", fields::number(FieldMetadata::default()));
        let merged = merge_schemas(&base(), &overlay, MergeStrategy::PreferOverlay);
        assert_eq!(merged.name, "user");
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["username", "age"]);
        // The overlay's age is required.
        assert!(merged.get("age").unwrap().parse(None).is_err());
    }

    #[test]
    fn test_union_layers_metadata() {
        let overlay = FormSchema::new("user").field(
            "username",
            Validator::string().min(5.0).with_label("Login"),
        );
        let merged = merge_schemas(&base(), &overlay, MergeStrategy::Union);
        let username = merged.get("username").unwrap();
        let meta = extract_metadata(username);
        assert_eq!(meta.label.as_deref(), Some("Login"));
        assert_eq!(meta.placeholder.as_deref(), Some("jdoe"));
        assert_eq!(meta.kind, Some(FieldKind::String));
        // Validation comes from the overlay.
        assert!(username.parse_value(&json!("abcd")).is_err());
        assert!(username.parse_value(&json!("abcde")).is_ok());
    }

    #[test]
    fn test_inputs_are_untouched() {
        let base = base();
        let overlay = FormSchema::new("x").field("extra", Validator::boolean());
        let _ = merge_schemas(&base, &overlay, MergeStrategy::Union);
        assert_eq!(base.len(), 2);
        assert_eq!(overlay.len(), 1);
    }
}
