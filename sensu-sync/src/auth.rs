//! Credential resolution against the Sensu backend.
//!
//! API keys are sent as-is on every request. Username/password pairs are
//! exchanged once, at client construction, for a bearer access token via
//! the backend's `/auth` endpoint.

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Operator-supplied credentials.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Long-lived API key, sent as `Authorization: Key <key>`.
    ApiKey(String),
    /// Username and password, exchanged for a bearer token at `/auth`.
    Basic { user: String, password: String },
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
}

/// Resolved session state, held for the lifetime of one client.
#[derive(Debug, Clone)]
pub(crate) enum Session {
    Key(String),
    Bearer(String),
}

impl Session {
    pub(crate) fn header_value(&self) -> String {
        match self {
            Session::Key(key) => format!("Key {key}"),
            Session::Bearer(token) => format!("Bearer {token}"),
        }
    }
}

pub(crate) async fn acquire(
    http: &reqwest::Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<Session> {
    match credentials {
        Credentials::ApiKey(key) => Ok(Session::Key(key.clone())),
        Credentials::Basic { user, password } => {
            let response = http
                .get(format!("{base_url}/auth"))
                .basic_auth(user, Some(password))
                .send()
                .await
                .map_err(Error::Transport)?;

            match response.status().as_u16() {
                200 => {
                    let auth: AuthResponse = response.json().await.map_err(Error::Transport)?;
                    debug!(user = %user, "acquired access token");
                    Ok(Session::Bearer(auth.access_token))
                }
                401 | 403 => Err(Error::Auth(format!(
                    "backend rejected credentials for user {user}"
                ))),
                status => {
                    let body = response.text().await.unwrap_or_default();
                    Err(Error::Api { status, body })
                }
            }
        }
    }
}
