use crate::domain::{Field, FieldMap, FieldValue, SharedError};
use serde_json::Value;

/// Flattens fields into a plain mapping; a later duplicate key wins.
///
/// An object whose marshaler fails is replaced by `"<key>Error"` holding the
/// failure message.
pub fn fields_to_map(fields: &[Field]) -> FieldMap {
    let mut map = FieldMap::with_capacity(fields.len());
    for field in fields {
        match field.value.to_json() {
            Ok(value) => {
                map.insert(field.key.clone(), value);
            }
            Err(e) => {
                map.insert(format!("{}Error", field.key), Value::String(e.to_string()));
            }
        }
    }
    map
}

/// The error carried by the first error-typed field, if any.
pub fn extract_error(fields: &[Field]) -> Option<SharedError> {
    fields.iter().find_map(|field| match &field.value {
        FieldValue::Error(err) => Some(err.clone()),
        _ => None,
    })
}
