use crate::Validator;

/// Named, ordered mapping from field key to validator.
///
/// Declared once at startup and read-only afterwards. Declaration order is
/// the order descriptors are generated in.
///
/// # Examples
///
/// ```
/// use form_schema_core::{FieldMetadata, FormSchema, fields};
///
/// let schema = FormSchema::new("user")
///     .field("username", fields::string(FieldMetadata::default().with_label("Username")))
///     .field("bio", fields::textarea(FieldMetadata::default()).optional());
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["username", "bio"]);
/// assert!(schema.get("bio").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub name: String,
    pub fields: Vec<(String, Validator)>,
}

impl FormSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn field(mut self, key: impl Into<String>, validator: Validator) -> Self {
        self.fields.push((key.into(), validator));
        self
    }

    /// Looks up a field's validator by key.
    pub fn get(&self, key: &str) -> Option<&Validator> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, validator)| validator)
    }

    /// Returns the field keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Object validator over all fields, for validating whole values objects.
    pub fn to_validator(&self) -> Validator {
        Validator::object(self.fields.iter().cloned())
    }
}
