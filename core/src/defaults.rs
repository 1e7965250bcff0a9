//! Normalizing initial field values for rendering.
//!
//! Choice fields need their defaults in a specific shape: a multi-select
//! always starts from a list and a select from a bare option value. Both
//! normalizations are idempotent, so feeding a resolved default back in
//! returns it unchanged.

use serde_json::{Map, Value};

use crate::FieldKind;

/// Normalizes a raw default for a field of `kind`.
///
/// - multi-select: lists pass through, a single value is wrapped into a
///   one-element list, absence (including `null` and `""`) becomes `[]`.
/// - select: option objects are unwrapped to their `value`, absence
///   (including a `null` option value) becomes `""`.
/// - everything else: passes through, absence becomes `""`.
///
/// # Examples
///
/// ```
/// use form_schema_core::{FieldKind, resolve_default};
/// use serde_json::json;
///
/// let roles = json!({"label": "Admin", "value": "admin"});
/// assert_eq!(
///     resolve_default(FieldKind::MultiSelect, Some(&roles)),
///     json!([{"label": "Admin", "value": "admin"}])
/// );
/// assert_eq!(
///     resolve_default(FieldKind::Select, Some(&json!({"label": "Active", "value": "ACTIVE"}))),
///     json!("ACTIVE")
/// );
/// assert_eq!(resolve_default(FieldKind::Email, None), json!(""));
/// ```
pub fn resolve_default(kind: FieldKind, raw: Option<&Value>) -> Value {
    match kind {
        FieldKind::MultiSelect => match raw {
            None | Some(Value::Null) => Value::Array(Vec::new()),
            Some(Value::String(s)) if s.is_empty() => Value::Array(Vec::new()),
            Some(Value::Array(items)) => Value::Array(items.clone()),
            Some(single) => Value::Array(vec![single.clone()]),
        },
        FieldKind::Select => match raw {
            None => Value::String(String::new()),
            Some(value) => match unwrap_option_value(value) {
                Value::Null => Value::String(String::new()),
                inner => inner.clone(),
            },
        },
        _ => raw.cloned().unwrap_or_else(|| Value::String(String::new())),
    }
}

fn unwrap_option_value(mut value: &Value) -> &Value {
    while let Some(inner) = value.as_object().and_then(|obj| obj.get("value")) {
        value = inner;
    }
    value
}

/// Returns the value for `name` from the first record that contains it.
///
/// A record holding an explicit `null` counts as containing the key.
pub fn find_default<'a>(records: &'a [Map<String, Value>], name: &str) -> Option<&'a Value> {
    records.iter().find_map(|record| record.get(name))
}
