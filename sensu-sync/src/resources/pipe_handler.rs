//! Pipe handlers: event data piped into an external command.

use serde_json::{Value, json};

use crate::client::{Client, Document, object_path};
use crate::compare::{CompareSchema, FieldPolicy};
use crate::error::Result;
use crate::payload::{mutation_payload, require_attrs};
use crate::reconcile::{DesiredState, sync};

/// Filters form an ordered pipeline; runtime assets are a set.
pub const SCHEMA: CompareSchema = CompareSchema(&[
    ("filters", FieldPolicy::OrderedList),
    ("env_vars", FieldPolicy::OrderedList),
    ("runtime_assets", FieldPolicy::UnorderedList),
]);

/// Operator parameters for a pipe handler.
#[derive(Debug, Clone, Default)]
pub struct Params {
    pub name: String,
    /// Command the event data is piped into. Required when present.
    pub command: Option<String>,
    /// Execution timeout in seconds.
    pub timeout: Option<u64>,
    /// Event filters applied before handling, in order.
    pub filters: Option<Vec<String>>,
    /// Mutator applied to event data before the command runs.
    pub mutator: Option<String>,
    /// KEY=VALUE environment entries for the command.
    pub env_vars: Option<Vec<String>>,
    /// Runtime assets required by the handler.
    pub runtime_assets: Option<Vec<String>>,
}

fn payload_for(state: DesiredState, params: &Params) -> Result<Document> {
    let mut payload = mutation_payload(
        &params.name,
        [
            ("command", params.command.as_ref().map(|c| json!(c))),
            ("timeout", params.timeout.map(|t| json!(t))),
            ("filters", params.filters.as_ref().map(|f| json!(f))),
            ("mutator", params.mutator.as_ref().map(|m| json!(m))),
            ("env_vars", params.env_vars.as_ref().map(|e| json!(e))),
            (
                "runtime_assets",
                params.runtime_assets.as_ref().map(|a| json!(a)),
            ),
        ],
    );
    payload.insert("type".to_string(), Value::String("pipe".to_string()));
    if state == DesiredState::Present {
        require_attrs(&payload, &["command"])?;
    }
    Ok(payload)
}

/// Converge a pipe handler to the desired state.
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
