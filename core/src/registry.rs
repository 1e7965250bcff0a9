//! Named schema lookup and descriptor generation by schema name.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    FieldDescriptor, FieldOptions, FieldOverrides, FormError, FormSchema, RegistryError,
    generate_descriptors, validate_schema,
};

/// Schemas addressable by name.
///
/// Populated once at startup, then only read; share it behind an `Arc` if
/// several threads generate forms.
///
/// # Examples
///
/// ```
/// use form_schema_core::*;
///
/// let mut registry = SchemaRegistry::new();
/// registry
///     .register(FormSchema::new("user").field("email", fields::email(FieldMetadata::default())))
///     .unwrap();
///
/// assert!(registry.contains("user"));
/// let fields = registry
///     .generate("user", &FieldOptions::new(), &FieldOverrides::new())
///     .unwrap();
/// assert_eq!(fields[0].kind, FieldKind::Email);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, FormSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `schema` under its name.
    ///
    /// Rejects schemas that fail [`validate_schema`] and names that are
    /// already taken.
    pub fn register(&mut self, schema: FormSchema) -> Result<(), RegistryError> {
        let errors = validate_schema(&schema);
        if !errors.is_empty() {
            return Err(RegistryError::InvalidSchema {
                name: schema.name,
                errors,
            });
        }
        if self.schemas.contains_key(&schema.name) {
            return Err(RegistryError::DuplicateSchema(schema.name));
        }

        debug!(schema = schema.name.as_str(), fields = schema.len(), "registered schema");
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_schema(mut self, schema: FormSchema) -> Result<Self, RegistryError> {
        self.register(schema)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&FormSchema> {
        self.schemas.get(name)
    }

    /// Like [`get`](Self::get), failing with [`FormError::SchemaNotFound`].
    pub fn schema(&self, name: &str) -> Result<&FormSchema, FormError> {
        self.get(name).ok_or_else(|| {
            warn!(schema = name, "schema not found");
            FormError::SchemaNotFound(name.to_string())
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn schemas(&self) -> impl Iterator<Item = &FormSchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Generates the descriptors of the schema registered as `name`.
    ///
    /// Fails when the name is unknown, when the schema has no fields, or when
    /// a field is misconfigured.
    pub fn generate(
        &self,
        name: &str,
        options: &FieldOptions,
        overrides: &FieldOverrides,
    ) -> Result<Vec<FieldDescriptor>, FormError> {
        let schema = self.schema(name)?;
        let descriptors = generate_descriptors(schema, options, overrides).inspect_err(|err| {
            warn!(schema = name, %err, "failed to generate form fields");
        })?;
        if descriptors.is_empty() {
            warn!(schema = name, "schema has no fields");
            return Err(FormError::EmptyFieldSet(name.to_string()));
        }
        Ok(descriptors)
    }
}
