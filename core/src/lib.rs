//! Schema-driven form generation.
//!
//! This crate turns validation schemas into render-ready form field
//! descriptions:
//!
//! - [`Validator`] — immutable, composable value validator with a metadata
//!   slot that every combinator carries forward.
//! - [`FieldMetadata`] — UI description of a field (kind, label, options,
//!   visibility), attached with [`attach`] and recovered with
//!   [`extract_metadata`].
//! - [`FormSchema`] — named, ordered field-to-validator mapping, kept in a
//!   [`SchemaRegistry`].
//! - [`FieldDescriptor`] — resolved field, produced by
//!   [`generate_descriptors`] from metadata and caller [`FieldOverride`]s.
//! - [`FormPlan`] — descriptors plus required flags, normalized defaults and
//!   submission checking.
//!
//! Validation ([`validate_schema`]) catches structural errors such as
//! duplicate field keys before a schema is registered. Merging
//! ([`merge_schemas`]) extends a schema with another's fields using a
//! configurable [`MergeStrategy`].
//!
//! # Example
//!
//! ```
//! use form_schema_core::*;
//!
//! let schema = FormSchema::new("user")
//!     .field(
//!         "username",
//!         fields::string(FieldMetadata::default().with_label("Username").with_placeholder("jdoe")),
//!     )
//!     .field(
//!         "status",
//!         fields::select(
//!             vec![FieldOption::new("ACTIVE", "Active"), FieldOption::new("INACTIVE", "Inactive")],
//!             FieldMetadata::default().with_label("Status"),
//!         )
//!         .optional(),
//!     );
//!
//! let registry = SchemaRegistry::new().with_schema(schema).unwrap();
//! let plan = registry.build_form("user", &FormRequest::new()).unwrap();
//!
//! let status = plan.field("status").unwrap();
//! assert_eq!(status.kind, FieldKind::Select);
//! assert_eq!(status.options.as_ref().unwrap().len(), 2);
//! assert!(plan.is_required("username"));
//! assert!(!plan.is_required("status"));
//! ```

mod defaults;
mod error;
mod extract;
pub mod fields;
mod form;
mod generate;
mod merge;
mod metadata;
mod registry;
mod required;
mod schema;
mod types;
mod validate;
mod validator;

pub use defaults::{find_default, resolve_default};
pub use error::{FieldConfigurationCause, FieldConfigurationError, FormError, RegistryError};
pub use extract::{
    Extraction, ExtractionWarning, MAX_EXTRACTION_DEPTH, extract_metadata,
    extract_metadata_reported,
};
pub use form::{FormPlan, FormRequest, build_form};
pub use generate::{describe_field, generate_descriptors};
pub use merge::{MergeStrategy, merge_schemas};
pub use metadata::attach;
pub use registry::SchemaRegistry;
pub use required::{is_required, required_fields};
pub use schema::FormSchema;
pub use types::*;
pub use validate::{SchemaValidationError, validate_schema};
pub use validator::*;
