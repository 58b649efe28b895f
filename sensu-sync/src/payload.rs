//! Desired-state payload assembly.

use serde_json::Value;

use crate::client::Document;
use crate::error::{Error, Result};

/// Build the mutation payload from operator parameters.
///
/// Attributes whose value is `None` are left out entirely, which marks the
/// remote field as unmanaged. An explicitly empty list is kept, so "clear
/// the list" and "leave it alone" stay distinct. The object name is always
/// present.
pub fn mutation_payload<I>(name: &str, attrs: I) -> Document
where
    I: IntoIterator<Item = (&'static str, Option<Value>)>,
{
    let mut payload = Document::new();
    payload.insert("name".to_string(), Value::String(name.to_string()));
    for (field, value) in attrs {
        if let Some(value) = value {
            payload.insert(field.to_string(), value);
        }
    }
    payload
}

/// Reject a `present` request that is missing required attributes.
///
/// Runs before any I/O.
pub fn require_attrs(payload: &Document, required: &[&str]) -> Result<()> {
    for field in required {
        if !payload.contains_key(*field) {
            return Err(Error::Validation(format!(
                "state=present requires {field}"
            )));
        }
    }
    Ok(())
}
