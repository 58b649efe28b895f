//! Handler sets: named groups of event handlers.

use serde_json::{Value, json};

use crate::client::{Client, Document, object_path};
use crate::compare::{CompareSchema, FieldPolicy};
use crate::error::Result;
use crate::payload::{mutation_payload, require_attrs};
use crate::reconcile::{DesiredState, sync};

/// Handler names compare as an ordered sequence; the backend preserves
/// the order the operator wrote.
pub const SCHEMA: CompareSchema = CompareSchema(&[("handlers", FieldPolicy::OrderedList)]);

/// Operator parameters for a handler set.
#[derive(Debug, Clone, Default)]
pub struct Params {
    pub name: String,
    /// Event handlers (names) the set fans out to. Required when present.
    pub handlers: Option<Vec<String>>,
}

fn payload_for(state: DesiredState, params: &Params) -> Result<Document> {
    let mut payload = mutation_payload(
        &params.name,
        [("handlers", params.handlers.as_ref().map(|h| json!(h)))],
    );
    payload.insert("type".to_string(), Value::String("set".to_string()));
    if state == DesiredState::Present {
        require_attrs(&payload, &["handlers"])?;
    }
    Ok(payload)
}

/// Converge a handler set to the desired state.
pub async fn converge(
    client: &Client,
    state: DesiredState,
    params: Params,
    check_mode: bool,
) -> Result<(bool, Option<Document>)> {
    let payload = payload_for(state, &params)?;
    let path = object_path(super::HANDLERS, &params.name);
    sync(state, client, &path, payload, &SCHEMA, check_mode).await
}
