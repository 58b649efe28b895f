//! Field comparison policy for remote-vs-desired diffs.
//!
//! Resource kinds disagree on whether list order is significant, so the
//! policy is a per-field table declared by each resource module rather
//! than a global default.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::client::Document;

/// How a field participates in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Plain value equality (the default).
    Scalar,
    /// Sequence equality, order significant.
    OrderedList,
    /// Set equality, order and duplicates ignored.
    UnorderedList,
}

/// Per-resource table mapping field names to comparison policies.
///
/// Fields without an entry compare as `Scalar`. For JSON arrays that is
/// already order-sensitive equality, so only order-insensitive list
/// fields strictly need an entry.
#[derive(Debug, Clone, Copy)]
pub struct CompareSchema(pub &'static [(&'static str, FieldPolicy)]);

impl CompareSchema {
    pub const EMPTY: CompareSchema = CompareSchema(&[]);

    pub fn policy(&self, field: &str) -> FieldPolicy {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, policy)| *policy)
            .unwrap_or(FieldPolicy::Scalar)
    }
}

/// Whether the remote object differs from the desired payload.
///
/// One-directional: only keys present in `payload` are compared. Remote
/// fields the payload does not mention are never a mismatch, which is
/// what keeps partial-attribute modules safe to combine.
pub fn differs(current: &Document, payload: &Document, schema: &CompareSchema) -> bool {
    payload.iter().any(|(field, desired)| match current.get(field) {
        None => true,
        Some(actual) => !field_eq(actual, desired, schema.policy(field)),
    })
}

fn field_eq(actual: &Value, desired: &Value, policy: FieldPolicy) -> bool {
    match policy {
        FieldPolicy::Scalar | FieldPolicy::OrderedList => actual == desired,
        FieldPolicy::UnorderedList => match (actual.as_array(), desired.as_array()) {
            (Some(actual), Some(desired)) => as_set(actual) == as_set(desired),
            _ => actual == desired,
        },
    }
}

fn as_set(values: &[Value]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Overlay `payload` onto `current`, keeping unmanaged remote fields.
pub fn merged(current: &Document, payload: &Document) -> Document {
    let mut result = current.clone();
    for (field, value) in payload {
        result.insert(field.clone(), value.clone());
    }
    result
}
