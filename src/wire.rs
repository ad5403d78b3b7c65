//! Request and response bodies of the remote analysis service.
//!
//! Field names follow the service's snake_case JSON. Closed vocabularies
//! (emotion labels, tone positions, authenticity levels) are enums so a label
//! we do not understand fails decoding instead of flowing into a result.
//!
//! | Endpoint | Request | Response |
//! |----------|---------|----------|
//! | `/extract/text`  | [`ExtractTextRequest`] | [`ExtractedContent`] |
//! | `/extract/image` | multipart `file`       | [`ExtractedContent`] |
//! | `/extract/link`  | [`ExtractLinkRequest`] | [`ExtractedContent`] |
//! | `/analyze/emotion` | [`ExtractedContent`] | [`EmotionResponse`] |
//! | `/analyze/authenticity` | [`ExtractedContent`] | [`AuthenticityResponse`] |
//! | `/analyze/political` | [`ExtractedContent`] | [`PoliticalResponse`] |
//! | `/analyze/full` | [`FullAnalysisRequest`] | [`FullAnalysisResponse`] |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const EXTRACT_TEXT: &str = "/extract/text";
pub const EXTRACT_IMAGE: &str = "/extract/image";
pub const EXTRACT_LINK: &str = "/extract/link";
pub const ANALYZE_EMOTION: &str = "/analyze/emotion";
pub const ANALYZE_AUTHENTICITY: &str = "/analyze/authenticity";
pub const ANALYZE_POLITICAL: &str = "/analyze/political";
pub const ANALYZE_FULL: &str = "/analyze/full";

/// Multipart field name for image uploads.
pub const IMAGE_FIELD: &str = "file";

// ── Extraction ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractTextRequest {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractLinkRequest {
    pub url: String,
}

/// Normalised article content produced by every extraction endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub headline: String,
    #[serde(rename = "first_para", default, skip_serializing_if = "Option::is_none")]
    pub first_paragraph: Option<String>,
}

// ── Emotion ──────────────────────────────────────────────────────────────

/// Dominant emotion label from the emotion classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Love,
    Surprise,
    Disgust,
    Neutral,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Love => "love",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickbaitKind {
    Clickbait,
    Ragebait,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResponse {
    pub emotion: Emotion,
    /// Classifier confidence, 0–1.
    pub score: f64,
    pub clickbait: bool,
    #[serde(default)]
    pub clickbait_type: Option<ClickbaitKind>,
}

// ── Authenticity ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticityLevel {
    High,
    Moderate,
    Low,
}

impl AuthenticityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticityLevel::High => "high",
            AuthenticityLevel::Moderate => "moderate",
            AuthenticityLevel::Low => "low",
        }
    }
}

impl fmt::Display for AuthenticityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticityResponse {
    /// Corroborating sources, best match first.
    #[serde(default)]
    pub matched_sources: Vec<String>,
    pub authenticity_level: AuthenticityLevel,
}

// ── Political ────────────────────────────────────────────────────────────

/// Position on the five-point left/right scale.
///
/// Decoding is lenient about spelling: `Extreme Left`, `moderately-left`,
/// `moderate_right`, `neutral` and `centre` are all accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum PoliticalTone {
    ExtremeLeft,
    ModerateLeft,
    Center,
    ModerateRight,
    ExtremeRight,
}

impl PoliticalTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoliticalTone::ExtremeLeft => "extreme-left",
            PoliticalTone::ModerateLeft => "moderate-left",
            PoliticalTone::Center => "center",
            PoliticalTone::ModerateRight => "moderate-right",
            PoliticalTone::ExtremeRight => "extreme-right",
        }
    }
}

impl fmt::Display for PoliticalTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoliticalTone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();
        let norm = norm.replace("moderately-", "moderate-");
        match norm.as_str() {
            "extreme-left" | "far-left" => Ok(PoliticalTone::ExtremeLeft),
            "moderate-left" | "left" => Ok(PoliticalTone::ModerateLeft),
            "center" | "centre" | "neutral" => Ok(PoliticalTone::Center),
            "moderate-right" | "right" => Ok(PoliticalTone::ModerateRight),
            "extreme-right" | "far-right" => Ok(PoliticalTone::ExtremeRight),
            _ => Err(format!("unknown political tone '{s}'")),
        }
    }
}

impl TryFrom<String> for PoliticalTone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Headline rewrites as sent by the service. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewrittenHeadlines {
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub center: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoliticalResponse {
    pub detected_tone: PoliticalTone,
    /// Magnitude of lean, 0–100, independent of direction.
    pub extremity_score: f64,
    #[serde(default)]
    pub rewritten_headlines: RewrittenHeadlines,
}

// ── Full analysis ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullAnalysisRequest {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_para: Option<String>,
    pub want_authentication: bool,
}

impl FullAnalysisRequest {
    pub fn from_content(content: ExtractedContent, want_authentication: bool) -> Self {
        Self {
            headline: content.headline,
            first_para: content.first_paragraph,
            want_authentication,
        }
    }
}

/// Combined payload of `/analyze/full`, decoded and checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullAnalysisResponse {
    pub emotion: EmotionResponse,
    pub authenticity: AuthenticityResponse,
    pub political: PoliticalResponse,
    pub topic: String,
    pub keywords: Vec<String>,
}

/// Why a combined payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// One assessment came back as `{"error": "..."}`.
    StageFailed { stage: &'static str, message: String },
    /// The JSON does not have the expected shape.
    Malformed(String),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::StageFailed { stage, message } => write!(f, "{stage}: {message}"),
            PayloadError::Malformed(m) => f.write_str(m),
        }
    }
}

// A sub-assessment is either the real thing or an `{"error": ...}` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Assessment<T> {
    Ok(T),
    Failed { error: String },
}

#[derive(Deserialize)]
struct KeywordsTopic {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct RawFullAnalysis {
    emotion: Assessment<EmotionResponse>,
    authenticity: Assessment<AuthenticityResponse>,
    political: Assessment<PoliticalResponse>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    keywords_topic: Option<KeywordsTopic>,
}

fn settle<T>(stage: &'static str, a: Assessment<T>) -> Result<T, PayloadError> {
    match a {
        Assessment::Ok(v) => Ok(v),
        Assessment::Failed { error } => Err(PayloadError::StageFailed {
            stage,
            message: error,
        }),
    }
}

impl FullAnalysisResponse {
    /// Decode the raw JSON returned by `/analyze/full`.
    ///
    /// Accepts both the flat `topic`/`keywords` layout and the nested
    /// `keywords_topic: {topic, keywords}` layout; flat fields win when both
    /// are present.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let raw: RawFullAnalysis =
            serde_json::from_value(value).map_err(|e| PayloadError::Malformed(e.to_string()))?;

        let emotion = settle("emotion", raw.emotion)?;
        let authenticity = settle("authenticity", raw.authenticity)?;
        let political = settle("political", raw.political)?;

        let (nested_topic, nested_keywords) = match raw.keywords_topic {
            Some(kt) => (kt.topic, kt.keywords),
            None => (None, None),
        };

        Ok(Self {
            emotion,
            authenticity,
            political,
            topic: raw.topic.or(nested_topic).unwrap_or_default(),
            keywords: raw.keywords.or(nested_keywords).unwrap_or_default(),
        })
    }
}

impl<'de> Deserialize<'de> for FullAnalysisResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}
