//! The fetch-compare-act reconciliation core.
//!
//! Stateless across calls: every invocation re-observes ground truth with
//! a fetch before deciding, which is what makes repeated runs idempotent.

use tracing::debug;

use crate::client::{Client, Document};
use crate::compare::{CompareSchema, differs, merged};
use crate::error::Result;

/// Operator-declared target state for a named object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredState {
    Present,
    Absent,
}

/// Converge the object at `path` to the desired state.
///
/// Fetches the current object first, then issues at most one mutating
/// request. In check mode no mutating request is sent and the returned
/// document is the state the backend would hold after a real run.
///
/// Returns whether a change was (or would be) made, together with the
/// resulting object (`None` when the end state is absent). Client errors
/// propagate unmodified; a failed mutating call is the only observable
/// outcome of that run.
pub async fn sync(
    state: DesiredState,
    client: &Client,
    path: &str,
    payload: Document,
    schema: &CompareSchema,
    check_mode: bool,
) -> Result<(bool, Option<Document>)> {
    let current = client.fetch(path).await?;

    match (state, current) {
        (DesiredState::Absent, None) => Ok((false, None)),
        (DesiredState::Absent, Some(_)) => {
            debug!(path = %path, check_mode, "object present, deleting");
            if !check_mode {
                client.delete(path).await?;
            }
            Ok((true, None))
        }
        (DesiredState::Present, None) => {
            debug!(path = %path, check_mode, "object missing, creating");
            if check_mode {
                return Ok((true, Some(payload)));
            }
            let object = client.put(path, &payload).await?;
            Ok((true, Some(object)))
        }
        (DesiredState::Present, Some(current)) => {
            if !differs(&current, &payload, schema) {
                return Ok((false, Some(current)));
            }
            debug!(path = %path, check_mode, "object drifted, updating");
            let desired = merged(&current, &payload);
            if check_mode {
                return Ok((true, Some(desired)));
            }
            let object = client.put(path, &desired).await?;
            Ok((true, Some(object)))
        }
    }
}
