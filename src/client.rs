//! Typed access to every endpoint of the analysis service.
//!
//! [`ServiceClient`] is a thin layer over a [`Transport`]: serialise the
//! request body, make one call, decode the response into the wire type. It
//! does no orchestration; [`crate::analyzer::Analyzer`] decides which of
//! these calls a pipeline run makes.

use crate::error::{ApiError, ApiResult};
use crate::request::ImageUpload;
use crate::transport::Transport;
use crate::wire::{
    AuthenticityResponse, EmotionResponse, ExtractLinkRequest, ExtractTextRequest,
    ExtractedContent, FullAnalysisRequest, FullAnalysisResponse, PoliticalResponse,
    ANALYZE_AUTHENTICITY, ANALYZE_EMOTION, ANALYZE_FULL, ANALYZE_POLITICAL, EXTRACT_IMAGE,
    EXTRACT_LINK, EXTRACT_TEXT,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// One method per service endpoint.
#[derive(Clone)]
pub struct ServiceClient {
    transport: Arc<dyn Transport>,
}

impl ServiceClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    // ── Extraction ───────────────────────────────────────────────────────

    /// Pass-through normalisation of typed text.
    pub async fn extract_text(&self, request: &ExtractTextRequest) -> ApiResult<ExtractedContent> {
        self.post(EXTRACT_TEXT, request).await
    }

    /// OCR an uploaded image.
    pub async fn extract_image(&self, file: &ImageUpload) -> ApiResult<ExtractedContent> {
        let value = self.transport.upload(EXTRACT_IMAGE, file).await?;
        decode(value)
    }

    /// Scrape an article URL.
    pub async fn extract_link(&self, url: &str) -> ApiResult<ExtractedContent> {
        let body = ExtractLinkRequest {
            url: url.to_string(),
        };
        self.post(EXTRACT_LINK, &body).await
    }

    // ── Single assessments ───────────────────────────────────────────────

    pub async fn analyze_emotion(&self, content: &ExtractedContent) -> ApiResult<EmotionResponse> {
        self.post(ANALYZE_EMOTION, content).await
    }

    pub async fn analyze_authenticity(
        &self,
        content: &ExtractedContent,
    ) -> ApiResult<AuthenticityResponse> {
        self.post(ANALYZE_AUTHENTICITY, content).await
    }

    pub async fn analyze_political(
        &self,
        content: &ExtractedContent,
    ) -> ApiResult<PoliticalResponse> {
        self.post(ANALYZE_POLITICAL, content).await
    }

    // ── Combined ─────────────────────────────────────────────────────────

    /// Run every assessment in one round trip.
    pub async fn analyze_full(
        &self,
        request: &FullAnalysisRequest,
    ) -> ApiResult<FullAnalysisResponse> {
        self.post(ANALYZE_FULL, request).await
    }

    /// Like [`Self::analyze_full`] but returns the payload undecoded, so the
    /// caller can tell transport failures from payload-shape failures.
    pub async fn analyze_full_raw(&self, request: &FullAnalysisRequest) -> ApiResult<Value> {
        let body = encode(request)?;
        self.transport.request(Method::POST, ANALYZE_FULL, Some(body)).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body)?;
        let value = self.transport.request(Method::POST, path, Some(body)).await?;
        decode(value)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("request body: {e}")))
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// Echoes the request path and body back as the response.
    struct Echo;

    #[async_trait]
    impl Transport for Echo {
        async fn request(
            &self,
            _method: Method,
            path: &str,
            body: Option<Value>,
        ) -> ApiResult<Value> {
            Ok(json!({"headline": path, "first_para": body.map(|b| b.to_string())}))
        }

        async fn upload(&self, path: &str, file: &ImageUpload) -> ApiResult<Value> {
            Ok(json!({"headline": format!("{path}:{}", file.file_name)}))
        }
    }

    fn client() -> ServiceClient {
        ServiceClient::new(Arc::new(Echo))
    }

    #[test]
    fn link_body_is_url_object() {
        let content = tokio_test::block_on(client().extract_link("https://a.example")).unwrap();
        assert_eq!(content.headline, EXTRACT_LINK);
        assert_eq!(
            content.first_paragraph.as_deref(),
            Some(r#"{"url":"https://a.example"}"#)
        );
    }

    #[test]
    fn image_goes_through_upload() {
        let file = ImageUpload::new("a.png", vec![1, 2, 3]);
        let content = tokio_test::block_on(client().extract_image(&file)).unwrap();
        assert_eq!(content.headline, "/extract/image:a.png");
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let err = tokio_test::block_on(client().analyze_emotion(&ExtractedContent {
            headline: "h".into(),
            first_paragraph: None,
        }))
        .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
