//! Field constructors for schema declarations.
//!
//! Each constructor returns a base validator already annotated with its
//! [`FieldKind`] and the caller's metadata, so a schema reads as a list of
//! fields with their UI description next to their constraints:
//!
//! ```
//! use form_schema_core::{FieldMetadata, fields};
//!
//! let username = fields::string(FieldMetadata::default().with_label("Username"))
//!     .min(3.0)
//!     .message("Username must be at least 3 characters");
//! assert!(username.parse_value(&"ada".into()).is_ok());
//! assert!(username.parse_value(&"".into()).is_err());
//! ```
//!
//! Text-like constructors reject the empty string with
//! [`REQUIRED_MESSAGE`], so a required text field cannot be submitted blank.
//! Wrap with `.optional()` to accept absence.

use crate::{FieldKind, FieldMetadata, FieldOption, Validator, ValidatorDef};

/// Message reported for missing or blank required values.
pub const REQUIRED_MESSAGE: &str = "This field is required";

fn annotate(validator: Validator, kind: FieldKind, metadata: FieldMetadata) -> Validator {
    validator.with_metadata(FieldMetadata::kind(kind).merge(&metadata))
}

fn non_empty_string() -> Validator {
    Validator::string()
        .required_message(REQUIRED_MESSAGE)
        .min(1.0)
        .message(REQUIRED_MESSAGE)
}

/// Single-line text.
pub fn string(metadata: FieldMetadata) -> Validator {
    annotate(non_empty_string(), FieldKind::String, metadata)
}

pub fn email(metadata: FieldMetadata) -> Validator {
    annotate(
        non_empty_string()
            .email()
            .message("Please enter a valid email address"),
        FieldKind::Email,
        metadata,
    )
}

pub fn password(metadata: FieldMetadata) -> Validator {
    annotate(non_empty_string(), FieldKind::Password, metadata)
}

pub fn textarea(metadata: FieldMetadata) -> Validator {
    annotate(non_empty_string(), FieldKind::Textarea, metadata)
}

pub fn tel(metadata: FieldMetadata) -> Validator {
    annotate(non_empty_string(), FieldKind::Tel, metadata)
}

pub fn url(metadata: FieldMetadata) -> Validator {
    annotate(
        non_empty_string()
            .url()
            .message("Please enter a valid URL"),
        FieldKind::Url,
        metadata,
    )
}

pub fn number(metadata: FieldMetadata) -> Validator {
    annotate(
        Validator::number()
            .required_message(REQUIRED_MESSAGE)
            .invalid_type_message("Please enter a valid number"),
        FieldKind::Number,
        metadata,
    )
}

/// Boolean toggle. Renders as a checkbox unless `metadata` names another
/// kind, such as [`FieldKind::Switch`].
pub fn boolean(metadata: FieldMetadata) -> Validator {
    annotate(
        Validator::boolean()
            .required_message(REQUIRED_MESSAGE)
            .invalid_type_message("Please check or uncheck this option"),
        FieldKind::Checkbox,
        metadata,
    )
}

pub fn date(metadata: FieldMetadata) -> Validator {
    annotate(
        Validator::date()
            .required_message(REQUIRED_MESSAGE)
            .invalid_type_message("Please select a valid date"),
        FieldKind::Date,
        metadata,
    )
}

/// Single choice among `options`.
///
/// Accepts only a declared option value; with an empty option list any
/// non-blank string is accepted.
///
/// # Examples
///
/// ```
/// use form_schema_core::{FieldMetadata, FieldOption, fields};
///
/// let status = fields::select(
///     vec![FieldOption::new("ACTIVE", "Active"), FieldOption::new("LOCKED", "Locked")],
///     FieldMetadata::default(),
/// );
/// assert!(status.parse_value(&"LOCKED".into()).is_ok());
/// assert!(status.parse_value(&"DELETED".into()).is_err());
/// ```
pub fn select(options: Vec<FieldOption>, metadata: FieldMetadata) -> Validator {
    let allowed: Vec<String> = options.iter().map(|o| o.value.clone()).collect();
    let validator = non_empty_string().refine(
        move |value| {
            allowed.is_empty()
                || value
                    .as_str()
                    .is_some_and(|s| allowed.iter().any(|a| a == s))
        },
        "Please select an option",
    );
    annotate(
        validator,
        FieldKind::Select,
        FieldMetadata::default().with_options(options).merge(&metadata),
    )
}

/// Any number (at least one) of `{label, value}` choices.
pub fn multi_select(options: Vec<FieldOption>, metadata: FieldMetadata) -> Validator {
    let item = Validator::object([("label", Validator::string()), ("value", Validator::any())]);
    let validator = Validator::array_of(item)
        .required_message(REQUIRED_MESSAGE)
        .min(1.0)
        .message(REQUIRED_MESSAGE);
    annotate(
        validator,
        FieldKind::MultiSelect,
        FieldMetadata::default().with_options(options).merge(&metadata),
    )
}

/// Rejects blank strings on a string validator, keeping its metadata.
///
/// Other validators are returned unchanged: absence is already rejected
/// unless they were made optional.
pub fn required(validator: &Validator) -> Validator {
    required_with_message(validator, REQUIRED_MESSAGE)
}

pub fn required_with_message(validator: &Validator, message: &str) -> Validator {
    match validator.def() {
        ValidatorDef::String { .. } => validator.min(1.0).message(message),
        _ => validator.clone(),
    }
}
