//! Socket handlers: event data written to a TCP or UDP socket.

use serde_json::{Value, json};

use crate::client::{Client, Document, object_path};
use crate::compare::{CompareSchema, FieldPolicy};
use crate::error::{Error, Result};
use crate::payload::{mutation_payload, require_attrs};
use crate::reconcile::{DesiredState, sync};

pub const SCHEMA: CompareSchema = CompareSchema(&[("filters", FieldPolicy::OrderedList)]);

/// Socket flavor, doubling as the wire type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SocketKind {
    #[default]
    Tcp,
    Udp,
}

impl SocketKind {
    fn as_str(self) -> &'static str {
        match self {
            SocketKind::Tcp => "tcp",
            SocketKind::Udp => "udp",
        }
    }
}

/// Operator parameters for a socket handler.
#[derive(Debug, Clone, Default)]
pub struct Params {
    pub name: String,
    pub kind: SocketKind,
    /// Host the socket connects to. Required when present, together with `port`.
    pub host: Option<String>,
    /// Port the socket connects to. Required when present, together with `host`.
    pub port: Option<u16>,
    /// Execution timeout in seconds.
    pub timeout: Option<u64>,
    /// Event filters applied before handling, in order.
    pub filters: Option<Vec<String>>,
}

fn payload_for(state: DesiredState, params: &Params) -> Result<Document> {
    let socket = match (&params.host, params.port) {
        (Some(host), Some(port)) => Some(json!({"host": host, "port": port})),
        (None, None) => None,
        _ => {
            return Err(Error::Validation(
                "host and port must be provided together".to_string(),
            ));
        }
    };
    let mut payload = mutation_payload(
        &params.name,
        [
            ("socket", socket),
            ("timeout", params.timeout.map(|t| json!(t))),
            ("filters", params.filters.as_ref().map(|f| json!(f))),
        ],
    );
    payload.insert(
        "type".to_string(),
        Value::String(params.kind.as_str().to_string()),
    );
    if state == DesiredState::Present {
        require_attrs(&payload, &["socket"])?;
    }
    Ok(payload)
}

/// Converge a socket handler to the desired state.
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
