//! Thin HTTP client for the two Conduit endpoints the integration reads.

use std::time::Duration;

use {
    secrecy::ExposeSecret,
    serde::{Deserialize, de::DeserializeOwned},
    serde_json::json,
};

use crate::{
    config::TrackerConfig,
    error::{Error, Result},
};

/// Default per-request timeout so a hung tracker cannot wedge the host's
/// hook queue.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error bodies are truncated to this many bytes before ending up in logs.
const ERROR_BODY_LIMIT: usize = 200;

/// Response envelope shared by every Conduit endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error_code: Option<String>,
    error_info: Option<String>,
}

/// `maniphest.info` result payload, reduced to the fields previews need.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInfo {
    #[serde(rename = "objectName")]
    pub object_name: String,
    pub title: String,
    pub uri: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `differential.revision.search` result payload.
#[derive(Debug, Deserialize)]
struct RevisionSearch {
    #[serde(default)]
    data: Vec<RevisionEntry>,
}

#[derive(Debug, Deserialize)]
struct RevisionEntry {
    fields: RevisionFields,
}

/// Revision fields previews consume. The canonical link is synthesized from
/// `id` rather than taken from the response.
#[derive(Debug, Clone, Deserialize)]
pub struct RevisionFields {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Client over the host-supplied HTTP connector for Conduit calls.
///
/// Holds the settings snapshot it was built with; build a fresh client per
/// operation so setting edits apply to the next message.
#[derive(Debug, Clone)]
pub struct ConduitClient {
    http: reqwest::Client,
    config: TrackerConfig,
    timeout: Duration,
}

impl ConduitClient {
    pub fn new(http: reqwest::Client, config: TrackerConfig) -> Self {
        Self {
            http,
            config,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Replace the default per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Server base URL with trailing slashes removed.
    pub fn base(&self) -> &str {
        self.config.base()
    }

    /// Fetch a single task by numeric id via `maniphest.info`.
    pub async fn task_info(&self, task_id: u64) -> Result<TaskInfo> {
        const METHOD: &str = "maniphest.info";
        let task_id = task_id.to_string();
        let response = self
            .http
            .get(format!("{}/api/{METHOD}", self.base()))
            .query(&[
                ("api.token", self.config.api_token.expose_secret().as_str()),
                ("task_id", task_id.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;
        decode(METHOD, response).await
    }

    /// Look up a revision by numeric id via `differential.revision.search`.
    ///
    /// An empty result set maps to [`Error::RevisionNotFound`].
    pub async fn search_revision(&self, revision_id: u64) -> Result<RevisionFields> {
        const METHOD: &str = "differential.revision.search";
        let params = json!({
            "__conduit__": { "token": self.config.api_token.expose_secret() },
            "constraints": { "ids": [revision_id] },
        })
        .to_string();
        let response = self
            .http
            .post(format!("{}/api/{METHOD}", self.base()))
            .form(&[("params", params.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;
        let search: RevisionSearch = decode(METHOD, response).await?;
        search
            .data
            .into_iter()
            .next()
            .map(|entry| entry.fields)
            .ok_or(Error::RevisionNotFound { id: revision_id })
    }
}

/// Check the HTTP status, then unwrap the Conduit envelope.
async fn decode<T: DeserializeOwned>(
    method: &'static str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Status {
            method,
            status,
            body: truncate(&body, ERROR_BODY_LIMIT),
        });
    }
    let envelope: Envelope<T> = response.json().await?;
    if envelope.error_code.is_some() || envelope.error_info.is_some() {
        return Err(Error::Api {
            method,
            code: envelope.error_code.unwrap_or_else(|| "unknown".to_string()),
            info: envelope.error_info.unwrap_or_default(),
        });
    }
    envelope.result.ok_or(Error::MissingResult { method })
}

fn truncate(body: &str, limit: usize) -> String {
    if body.len() <= limit {
        return body.to_string();
    }
    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
