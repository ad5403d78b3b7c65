//! Error types for the fakefinder library.
//!
//! Three layers, three types:
//!
//! * [`ApiError`] — a single round trip to the analysis service failed
//!   (network, non-2xx, undecodable body). This is the error half of the
//!   transport contract; [`ApiResult`] is what every transport call returns.
//!
//! * [`ValidationError`] — the request itself is unusable. Raised locally
//!   before any remote call is made.
//!
//! * [`AnalysisError`] — the only error that crosses the pipeline boundary.
//!   Wraps the other two plus the failures that are specific to orchestration.
//!   Its `Display` output is the user-facing message; no structured codes are
//!   expected past this point.

use crate::request::ExtractionStrategy;
use thiserror::Error;

/// Result of a single call to the analysis service.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of one request/response exchange with the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused, reset, timeout).
    #[error("{0}")]
    Network(String),

    /// The service answered with a non-2xx status.
    ///
    /// Displays the server's `detail` message verbatim when it sent one,
    /// otherwise a status line such as `HTTP 502: Bad Gateway`.
    #[error("{}", render_status(.status, .reason, .detail))]
    Status {
        status: u16,
        reason: String,
        detail: Option<String>,
    },

    /// A 2xx response whose body was not the JSON we expected.
    #[error("Invalid response from analysis service: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status code, if the service produced a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The message shown for a non-2xx response.
pub fn status_message(status: u16, reason: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => format!("HTTP {status}: {reason}"),
    }
}

fn render_status(status: &u16, reason: &str, detail: &Option<String>) -> String {
    status_message(*status, reason, detail.as_deref())
}

/// A request that fails local validation. No remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Headline is required")]
    MissingHeadline,

    #[error(
        "Headline is too long ({len} characters, maximum {max})",
        max = crate::request::MAX_HEADLINE_CHARS
    )]
    HeadlineTooLong { len: usize },

    #[error(
        "Paragraph is too long ({len} characters, maximum {max})",
        max = crate::request::MAX_PARAGRAPH_CHARS
    )]
    ParagraphTooLong { len: usize },

    #[error("URL is required")]
    MissingUrl,

    #[error("Image file is empty")]
    EmptyImage,
}

/// Every way a pipeline run can end without a result.
///
/// Results are all-or-nothing: any variant here means no
/// [`crate::output::AnalysisResult`] was produced.
#[derive(Debug, Error)]
pub enum AnalysisError {
    // ── Local ─────────────────────────────────────────────────────────────
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Extraction stage ──────────────────────────────────────────────────
    /// Scrape or OCR call failed. Displays the transport message unchanged.
    #[error("{source}")]
    Extraction {
        strategy: ExtractionStrategy,
        #[source]
        source: ApiError,
    },

    /// Extraction succeeded but produced no headline to analyse.
    #[error("No headline could be extracted from the {}", .strategy.source_noun())]
    EmptyExtraction { strategy: ExtractionStrategy },

    // ── Analysis stage ────────────────────────────────────────────────────
    /// The full-analysis call failed. Displays the transport message unchanged.
    #[error(transparent)]
    Analysis(ApiError),

    /// The service answered 2xx but reported a failure inside one assessment.
    #[error("{stage} analysis failed: {message}")]
    Stage { stage: String, message: String },

    // ── Normalisation ─────────────────────────────────────────────────────
    /// The combined payload could not be turned into a result.
    ///
    /// `detail` is logged; the user only sees the generic message.
    #[error("An unexpected error occurred")]
    Unexpected { detail: String },

    /// Runtime or environment failure outside the pipeline proper.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Whether the run failed before any remote call was made.
    pub fn is_local(&self) -> bool {
        matches!(self, AnalysisError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_server_detail() {
        let e = ApiError::Status {
            status: 422,
            reason: "Unprocessable Entity".into(),
            detail: Some("unreachable".into()),
        };
        assert_eq!(e.to_string(), "unreachable");
        assert_eq!(e.status(), Some(422));
    }

    #[test]
    fn status_error_falls_back_to_status_line() {
        let e = ApiError::Status {
            status: 502,
            reason: "Bad Gateway".into(),
            detail: None,
        };
        assert_eq!(e.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn empty_detail_is_treated_as_absent() {
        assert_eq!(
            status_message(500, "Internal Server Error", Some("")),
            "HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn extraction_error_displays_transport_message_unchanged() {
        let e = AnalysisError::Extraction {
            strategy: ExtractionStrategy::Scrape,
            source: ApiError::Network("connection refused".into()),
        };
        assert_eq!(e.to_string(), "connection refused");
    }

    #[test]
    fn unexpected_error_hides_detail() {
        let e = AnalysisError::Unexpected {
            detail: "missing field `emotion`".into(),
        };
        assert_eq!(e.to_string(), "An unexpected error occurred");
    }

    #[test]
    fn validation_is_local() {
        let e = AnalysisError::from(ValidationError::MissingUrl);
        assert!(e.is_local());
        assert_eq!(e.to_string(), "URL is required");
    }

    #[test]
    fn headline_too_long_display() {
        let e = ValidationError::HeadlineTooLong { len: 612 };
        assert!(e.to_string().contains("612"));
        assert!(e.to_string().contains("500"));
    }
}
