//! # fakefinder
//!
//! Client-side analysis pipeline for the FakeFinder news-verification service.
//!
//! A user submits a news item (typed headline, article URL or screenshot) and
//! gets back one composite assessment: source corroboration, emotional
//! manipulation signals, political lean and tone-adjusted headline rewrites,
//! plus a derived overall confidence score.
//!
//! The machine-learning models, OCR and scraping all live behind the remote
//! service. This crate owns the part in between: choosing the extraction
//! strategy, driving the remote calls in order with all-or-nothing failure
//! semantics, and folding the combined payload into a display-ready record.
//!
//! ## Pipeline Overview
//!
//! ```text
//! AnalysisRequest (text | url | image)
//!  │
//!  ├─ 1. Validate   required field present, length limits (local, no I/O)
//!  ├─ 2. Extract    none | /extract/link | /extract/image
//!  ├─ 3. Analyse    one /analyze/full round trip
//!  └─ 4. Normalise  corroboration policy, confidence score, rewrite fallbacks
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fakefinder::{AnalysisRequest, Analyzer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Service URL from FAKEFINDER_API_URL, default http://localhost:8000
//!     let analyzer = Analyzer::from_env()?;
//!     let request = AnalysisRequest::text("Market rises after rate decision")
//!         .with_paragraph("Stocks closed higher on Tuesday.");
//!     let result = analyzer.analyze(&request).await?;
//!     println!(
//!         "{:?} / {} sources / confidence {:.0}%",
//!         result.authentication_level.level,
//!         result.authentication_level.score,
//!         result.confidence_score * 100.0
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `fakefinder` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyzer;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod request;
pub mod session;
pub mod transport;
pub mod wire;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyzer::Analyzer;
pub use client::ServiceClient;
pub use config::{ClientConfig, ClientConfigBuilder, API_URL_ENV, DEFAULT_API_URL};
pub use error::{AnalysisError, ApiError, ApiResult, ValidationError};
pub use output::{
    AnalysisOutcome, AnalysisResult, AuthenticationLevel, EmotionLevel, Lean, PoliticalToneLevel,
    Rewrites,
};
pub use pipeline::normalize::{confidence_score, normalize, normalize_at};
pub use progress::{AnalysisProgressCallback, NoopProgressCallback, PipelineStage, ProgressCallback};
pub use request::{AnalysisRequest, ExtractionStrategy, ImageUpload, InputKind};
pub use session::AnalysisSession;
pub use transport::{HttpTransport, Method, Transport};
pub use wire::{
    AuthenticityLevel, ClickbaitKind, Emotion, ExtractedContent, FullAnalysisRequest,
    FullAnalysisResponse, PoliticalTone,
};
