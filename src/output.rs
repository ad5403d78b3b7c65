//! Output types: the display-ready result of one pipeline run.
//!
//! [`AnalysisResult`] is immutable once the normaliser builds it and is owned
//! by the caller from then on. It serialises in camelCase, the shape the
//! presentation layer renders.

use crate::error::AnalysisError;
use crate::request::InputKind;
use crate::wire::{AuthenticityLevel, ClickbaitKind, Emotion, PoliticalTone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything the presentation layer shows for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub authentication_level: AuthenticationLevel,
    pub emotion_level: EmotionLevel,
    /// Overall confidence, 0–1.
    pub confidence_score: f64,
    pub political_tone: PoliticalToneLevel,
    pub rewrites: Rewrites,
    pub original_text: String,
    pub input_kind: InputKind,
    pub timestamp: DateTime<Utc>,
    pub topic: String,
    pub keywords: BTreeSet<String>,
}

impl AnalysisResult {
    /// Equality ignoring `timestamp`.
    pub fn same_assessment(&self, other: &Self) -> bool {
        let mut a = self.clone();
        a.timestamp = other.timestamp;
        a == *other
    }
}

/// Corroboration summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationLevel {
    /// Number of matched sources; 0 when corroboration was not requested.
    pub score: usize,
    /// Taken verbatim from the service.
    pub level: AuthenticityLevel,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionLevel {
    pub primary: Emotion,
    pub confidence: f64,
    pub is_clickbait: bool,
    pub is_ragebait: bool,
    pub clickbait_kind: Option<ClickbaitKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticalToneLevel {
    pub position: PoliticalTone,
    /// `extremity_score / 100`.
    pub confidence: f64,
    pub extremity_score: f64,
}

/// One of the three rewrite perspectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lean {
    Left,
    Center,
    Right,
}

impl Lean {
    pub const ALL: [Lean; 3] = [Lean::Left, Lean::Center, Lean::Right];

    /// Used when the service sent no rewrite for this lean.
    pub fn fallback_rewrite(&self) -> &'static str {
        match self {
            Lean::Left => "Left-leaning perspective on this news story...",
            Lean::Center => "Neutral analysis of this news development...",
            Lean::Right => "Right-leaning viewpoint on this news item...",
        }
    }
}

/// Headline rewrites, one per [`Lean`]. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrites {
    pub left: String,
    pub center: String,
    pub right: String,
}

impl Rewrites {
    pub fn get(&self, lean: Lean) -> &str {
        match lean {
            Lean::Left => &self.left,
            Lean::Center => &self.center,
            Lean::Right => &self.right,
        }
    }
}

/// The all-or-nothing outcome of a run, flattened for callers that want the
/// `{success, data?, error?}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<AnalysisResult, AnalysisError>> for AnalysisOutcome {
    fn from(r: Result<AnalysisResult, AnalysisError>) -> Self {
        match r {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Self {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl AnalysisOutcome {
    pub fn into_result(self) -> Result<AnalysisResult, String> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(e)) => Err(e),
            _ => Err("Analysis failed".to_string()),
        }
    }
}
