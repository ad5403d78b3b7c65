//! HTTP transport to the analysis service.
//!
//! [`Transport`] is the seam between the pipeline and the network. The
//! production implementation, [`HttpTransport`], wraps a `reqwest::Client`;
//! tests substitute a fake that records calls and returns canned payloads.
//!
//! Every method returns an [`ApiResult`]. Nothing here panics or leaks a
//! `reqwest::Error`: connection failures, non-2xx statuses and undecodable
//! bodies are all folded into [`ApiError`].

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::ImageUpload;
use crate::wire::IMAGE_FIELD;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
pub use reqwest::Method;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// A way to reach the analysis service.
///
/// Bodies are untyped JSON so the trait stays object-safe; typed access
/// lives in [`crate::client::ServiceClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a JSON request (or no body) and return the decoded JSON response.
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value>;

    /// POST `file` as multipart form data under the `file` field.
    ///
    /// No JSON content type is set; the multipart boundary header is.
    async fn upload(&self, path: &str, file: &ImageUpload) -> ApiResult<Value>;
}

/// [`Transport`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for `config.base_url`.
    ///
    /// With `timeout_secs = None` reqwest's own defaults apply.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value> {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let start = Instant::now();

        let mut req = self.client.request(method, &url);
        if let Some(ref body) = body {
            req = req.json(body);
        }
        let result = read_response(req.send().await).await;

        debug!(
            "{} finished in {}ms ({})",
            path,
            start.elapsed().as_millis(),
            if result.is_ok() { "ok" } else { "error" }
        );
        result
    }

    async fn upload(&self, path: &str, file: &ImageUpload) -> ApiResult<Value> {
        let url = self.url(path);
        debug!(
            "POST {} (multipart, {} bytes, {})",
            url,
            file.bytes.len(),
            file.mime_type
        );
        let start = Instant::now();

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| ApiError::Network(format!("invalid upload content type: {e}")))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let result = read_response(self.client.post(&url).multipart(form).send().await).await;

        debug!(
            "{} finished in {}ms ({})",
            path,
            start.elapsed().as_millis(),
            if result.is_ok() { "ok" } else { "error" }
        );
        result
    }
}

/// Fold a reqwest outcome into the transport contract.
async fn read_response(sent: Result<reqwest::Response, reqwest::Error>) -> ApiResult<Value> {
    let response = sent.map_err(|e| ApiError::Network(e.to_string()))?;
    let status = response.status();

    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("").to_string();
        // An error body that is not JSON is the same as one without `detail`.
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| detail_message(&v));
        return Err(ApiError::Status {
            status: status.as_u16(),
            reason,
            detail,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull a human-readable `detail` out of an error body.
///
/// FastAPI-style services send a string for handled errors and a list of
/// objects for request-validation failures; the latter is passed through as
/// compact JSON.
pub fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
