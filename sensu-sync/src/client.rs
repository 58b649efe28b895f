//! HTTP client for the Sensu backend API.
//!
//! One client serves one reconciliation run: credentials are resolved at
//! construction and requests target namespaced resource paths under
//! `/api/core/v2`. The client classifies responses into the shared error
//! taxonomy; it performs no retries and no caching.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use crate::auth::{self, Credentials, Session};
use crate::error::{Error, Result};

/// Wire document: a flat JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Characters that must be escaped inside a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/');

/// Deterministic API path for a named object within a collection.
pub fn object_path(collection: &str, name: &str) -> String {
    format!("/{}/{}", collection, utf8_percent_encode(name, PATH_SEGMENT))
}

/// Authenticated client bound to one backend and namespace.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    namespace: String,
    session: Session,
}

impl Client {
    /// Connect to a Sensu backend, resolving credentials once.
    pub async fn connect(
        base_url: &str,
        namespace: &str,
        credentials: Credentials,
    ) -> Result<Self> {
        let http = reqwest::Client::new();
        let base_url = base_url.trim_end_matches('/').to_string();
        let session = auth::acquire(&http, &base_url, &credentials).await?;
        debug!(url = %base_url, namespace = %namespace, "connected to backend");
        Ok(Self {
            http,
            base_url,
            namespace: namespace.to_string(),
            session,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/core/v2/namespaces/{}{}",
            self.base_url, self.namespace, path
        )
    }

    /// Fetch the current object at `path`, `None` when it does not exist.
    pub async fn fetch(&self, path: &str) -> Result<Option<Document>> {
        debug!(path = %path, "GET");
        let response = self
            .http
            .get(self.api_url(path))
            .header(AUTHORIZATION, self.session.header_value())
            .send()
            .await
            .map_err(Error::Transport)?;

        match response.status().as_u16() {
            404 => Ok(None),
            status if (200..300).contains(&status) => {
                let doc = response.json().await.map_err(Error::Transport)?;
                Ok(Some(doc))
            }
            _ => Err(Self::api_error(response).await),
        }
    }

    /// Idempotent upsert of `payload` at `path`.
    ///
    /// Returns the stored document: the server echo when the response
    /// carries one, otherwise the submitted payload (the backend replies
    /// 201/204 with an empty body).
    pub async fn put(&self, path: &str, payload: &Document) -> Result<Document> {
        debug!(path = %path, "PUT");
        let response = self
            .http
            .put(self.api_url(path))
            .header(AUTHORIZATION, self.session.header_value())
            .json(payload)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(Self::api_error(response).await);
        }
        let body = response.text().await.map_err(Error::Transport)?;
        match serde_json::from_str(&body) {
            Ok(doc) => Ok(doc),
            Err(_) => Ok(payload.clone()),
        }
    }

    /// Delete the object at `path`.
    ///
    /// A 404 means the object is already gone and counts as success.
    pub async fn delete(&self, path: &str) -> Result<()> {
        debug!(path = %path, "DELETE");
        let response = self
            .http
            .delete(self.api_url(path))
            .header(AUTHORIZATION, self.session.header_value())
            .send()
            .await
            .map_err(Error::Transport)?;

        match response.status().as_u16() {
            404 => Ok(()),
            status if (200..300).contains(&status) => Ok(()),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn api_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        match status {
            401 | 403 => Error::Auth(format!("request rejected with status {status}")),
            _ => Error::Api { status, body },
        }
    }
}
