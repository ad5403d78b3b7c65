//! Analysis requests: the three input shapes a user can submit.
//!
//! A request carries everything one pipeline run needs. Validation happens
//! here, before the orchestrator issues any remote call, so an empty headline
//! or URL never costs a round trip.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Maximum headline length, in characters.
pub const MAX_HEADLINE_CHARS: usize = 500;

/// Maximum paragraph length, in characters.
pub const MAX_PARAGRAPH_CHARS: usize = 1000;

/// Shown as the original text when the input was an image.
pub const IMAGE_PLACEHOLDER: &str = "Uploaded content";

/// One submission to the pipeline.
///
/// `want_corroboration` is carried by every variant. Turning it off does not
/// skip any remote call; the normaliser zeroes the corroboration fields instead.
#[derive(Debug, Clone)]
pub enum AnalysisRequest {
    /// Headline typed by the user, with an optional first paragraph.
    Text {
        headline: String,
        paragraph: Option<String>,
        want_corroboration: bool,
    },
    /// Article URL; the service scrapes it.
    Url { url: String, want_corroboration: bool },
    /// Screenshot or photo of an article; the service OCRs it.
    Image {
        file: ImageUpload,
        want_corroboration: bool,
    },
}

/// Which input shape a request (or result) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Url,
    Image,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputKind::Text => "text",
            InputKind::Url => "url",
            InputKind::Image => "image",
        })
    }
}

/// How the pipeline turns raw input into [`crate::wire::ExtractedContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Typed text is already a headline; no extraction call.
    None,
    /// `/extract/link`
    Scrape,
    /// `/extract/image`
    Ocr,
}

impl ExtractionStrategy {
    /// What the content was extracted from, for error messages.
    pub fn source_noun(&self) -> &'static str {
        match self {
            ExtractionStrategy::None => "text",
            ExtractionStrategy::Scrape => "page",
            ExtractionStrategy::Ocr => "image",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractionStrategy::None => "none",
            ExtractionStrategy::Scrape => "scrape",
            ExtractionStrategy::Ocr => "ocr",
        })
    }
}

/// An image file to be sent as the `file` field of a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

// Keep multi-megabyte blobs out of debug logs.
impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Wrap in-memory bytes, guessing the MIME type from `file_name`.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read an image from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

impl AnalysisRequest {
    /// A text request with corroboration enabled.
    pub fn text(headline: impl Into<String>) -> Self {
        AnalysisRequest::Text {
            headline: headline.into(),
            paragraph: None,
            want_corroboration: true,
        }
    }

    /// A URL request with corroboration enabled.
    pub fn url(url: impl Into<String>) -> Self {
        AnalysisRequest::Url {
            url: url.into(),
            want_corroboration: true,
        }
    }

    /// An image request with corroboration enabled.
    pub fn image(file: ImageUpload) -> Self {
        AnalysisRequest::Image {
            file,
            want_corroboration: true,
        }
    }

    /// Load an image from disk and wrap it in a request.
    pub async fn image_from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self::image(ImageUpload::from_path(path).await?))
    }

    /// Attach a first paragraph. No-op on non-text requests.
    pub fn with_paragraph(mut self, text: impl Into<String>) -> Self {
        if let AnalysisRequest::Text { paragraph, .. } = &mut self {
            *paragraph = Some(text.into());
        }
        self
    }

    pub fn with_corroboration(mut self, want: bool) -> Self {
        match &mut self {
            AnalysisRequest::Text {
                want_corroboration, ..
            }
            | AnalysisRequest::Url {
                want_corroboration, ..
            }
            | AnalysisRequest::Image {
                want_corroboration, ..
            } => *want_corroboration = want,
        }
        self
    }

    pub fn kind(&self) -> InputKind {
        match self {
            AnalysisRequest::Text { .. } => InputKind::Text,
            AnalysisRequest::Url { .. } => InputKind::Url,
            AnalysisRequest::Image { .. } => InputKind::Image,
        }
    }

    pub fn want_corroboration(&self) -> bool {
        match self {
            AnalysisRequest::Text {
                want_corroboration, ..
            }
            | AnalysisRequest::Url {
                want_corroboration, ..
            }
            | AnalysisRequest::Image {
                want_corroboration, ..
            } => *want_corroboration,
        }
    }

    pub fn extraction_strategy(&self) -> ExtractionStrategy {
        match self {
            AnalysisRequest::Text { .. } => ExtractionStrategy::None,
            AnalysisRequest::Url { .. } => ExtractionStrategy::Scrape,
            AnalysisRequest::Image { .. } => ExtractionStrategy::Ocr,
        }
    }

    /// Check the required field of the active variant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            AnalysisRequest::Text {
                headline,
                paragraph,
                ..
            } => {
                if headline.trim().is_empty() {
                    return Err(ValidationError::MissingHeadline);
                }
                let len = headline.trim().chars().count();
                if len > MAX_HEADLINE_CHARS {
                    return Err(ValidationError::HeadlineTooLong { len });
                }
                if let Some(p) = paragraph {
                    let len = p.trim().chars().count();
                    if len > MAX_PARAGRAPH_CHARS {
                        return Err(ValidationError::ParagraphTooLong { len });
                    }
                }
                Ok(())
            }
            AnalysisRequest::Url { url, .. } => {
                if url.trim().is_empty() {
                    return Err(ValidationError::MissingUrl);
                }
                Ok(())
            }
            AnalysisRequest::Image { file, .. } => {
                if file.bytes.is_empty() {
                    return Err(ValidationError::EmptyImage);
                }
                Ok(())
            }
        }
    }

    /// The text shown alongside a result as "what was analysed".
    ///
    /// First non-empty of the submitted headline and the submitted URL, else
    /// [`IMAGE_PLACEHOLDER`].
    pub fn original_text(&self) -> String {
        let candidate = match self {
            AnalysisRequest::Text { headline, .. } => Some(headline.as_str()),
            AnalysisRequest::Url { url, .. } => Some(url.as_str()),
            AnalysisRequest::Image { .. } => None,
        };
        candidate
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(IMAGE_PLACEHOLDER)
            .to_string()
    }
}
