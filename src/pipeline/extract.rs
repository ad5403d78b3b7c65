//! Extraction: normalise the raw input into headline + first paragraph.
//!
//! Text input is already in that shape and costs no round trip. URLs are
//! scraped and images are OCR'd by the service. A successful extraction
//! always has a non-empty headline; an empty one is reported as a failure
//! here rather than being sent on to analysis.

use crate::client::ServiceClient;
use crate::error::AnalysisError;
use crate::progress::PipelineStage;
use crate::request::{AnalysisRequest, ExtractionStrategy};
use crate::wire::ExtractedContent;
use tracing::debug;

/// The remote stage an extraction strategy maps to, if any.
pub fn stage_for(strategy: ExtractionStrategy) -> Option<PipelineStage> {
    match strategy {
        ExtractionStrategy::None => None,
        ExtractionStrategy::Scrape => Some(PipelineStage::Scrape),
        ExtractionStrategy::Ocr => Some(PipelineStage::Ocr),
    }
}

/// Build content directly from typed text. A blank paragraph counts as absent.
pub fn content_from_text(headline: &str, paragraph: Option<&str>) -> ExtractedContent {
    ExtractedContent {
        headline: headline.to_string(),
        first_paragraph: paragraph
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string),
    }
}

/// Produce the content the full-analysis stage will receive.
///
/// At most one remote call. On failure the transport error is wrapped with
/// the strategy that produced it and returned unchanged otherwise.
pub async fn extract(
    client: &ServiceClient,
    request: &AnalysisRequest,
) -> Result<ExtractedContent, AnalysisError> {
    let strategy = request.extraction_strategy();

    let content = match request {
        AnalysisRequest::Text {
            headline,
            paragraph,
            ..
        } => return Ok(content_from_text(headline, paragraph.as_deref())),
        AnalysisRequest::Url { url, .. } => client.extract_link(url.trim()).await,
        AnalysisRequest::Image { file, .. } => client.extract_image(file).await,
    }
    .map_err(|source| AnalysisError::Extraction { strategy, source })?;

    check_headline(strategy, content)
}

fn check_headline(
    strategy: ExtractionStrategy,
    content: ExtractedContent,
) -> Result<ExtractedContent, AnalysisError> {
    if content.headline.trim().is_empty() {
        return Err(AnalysisError::EmptyExtraction { strategy });
    }
    debug!(
        "Extracted via {}: headline {} chars, paragraph {}",
        strategy,
        content.headline.chars().count(),
        if content.first_paragraph.is_some() { "present" } else { "absent" }
    );
    Ok(content)
}
