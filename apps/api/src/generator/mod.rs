/// Document generator: the boundary to the external service that renders a
/// submission into a downloadable CV package.
///
/// Every outbound call is made exactly once: a failure is reported to the
/// caller, who may resubmit.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::form::session::Submission;

pub mod encoding;

pub use encoding::SubmissionEncoding;

const GENERATE_PATH: &[&str] = &["api", "generate"];
const DOWNLOAD_PATH: &[&str] = &["api", "download"];

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Package {0} not found")]
    NotFound(String),

    #[error("Generator response carried no package id")]
    MissingId,

    #[error("Invalid generator URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Identifier of a generated package, opaque to this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub String);

impl ArtifactId {
    /// Accepts ids made of ASCII letters, digits, `-` and `_` only, so an id
    /// can never widen into a path or query on the generator host.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| ArtifactId(raw.to_string()))
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Implement this to swap the generation backend without touching handlers.
///
/// Carried in `AppState` as `Arc<dyn DocumentGenerator>`.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn generate(&self, submission: &Submission) -> Result<ArtifactId, GeneratorError>;

    async fn download(&self, id: &ArtifactId) -> Result<Bytes, GeneratorError>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
}

/// HTTP client for the document service.
#[derive(Clone)]
pub struct HttpDocumentGenerator {
    client: Client,
    base_url: Url,
    encoding: SubmissionEncoding,
}

impl HttpDocumentGenerator {
    pub fn new(
        base_url: &str,
        encoding: SubmissionEncoding,
        timeout: Duration,
    ) -> Result<Self, GeneratorError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| GeneratorError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
            encoding,
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn generate_url(&self) -> Url {
        self.endpoint(GENERATE_PATH.iter().copied())
    }

    fn download_url(&self, id: &ArtifactId) -> Url {
        self.endpoint(DOWNLOAD_PATH.iter().copied().chain(std::iter::once(id.0.as_str())))
    }
}

#[async_trait]
impl DocumentGenerator for HttpDocumentGenerator {
    async fn generate(&self, submission: &Submission) -> Result<ArtifactId, GeneratorError> {
        let request = self
            .encoding
            .encode(self.client.post(self.generate_url()), submission)?;
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generator returned {}: {}", status, body);
            return Err(GeneratorError::Rejected {
                status: status.as_u16(),
                message: error_message(&body, "Document generation failed"),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let id = parsed.id.and_then(id_from_json).ok_or(GeneratorError::MissingId)?;
        debug!("Generator produced package {id} ({:?} encoding)", self.encoding);
        Ok(id)
    }

    async fn download(&self, id: &ArtifactId) -> Result<Bytes, GeneratorError> {
        let response = self.client.get(self.download_url(id)).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(GeneratorError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Download of {} returned {}: {}", id, status, body);
            return Err(GeneratorError::Rejected {
                status: status.as_u16(),
                message: error_message(&body, "Package download failed"),
            });
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded package {id}: {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Accepts both string and numeric ids.
fn id_from_json(value: serde_json::Value) -> Option<ArtifactId> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(ArtifactId(s)),
        serde_json::Value::Number(n) => Some(ArtifactId(n.to_string())),
        _ => None,
    }
}

/// Pulls the human-readable message out of an error body, if it has one.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.message.or(e.detail))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
