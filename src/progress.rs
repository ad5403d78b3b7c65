//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn AnalysisProgressCallback>`] via
//! [`crate::config::ClientConfigBuilder::progress_callback`] to observe a run
//! as it moves through its states:
//!
//! ```text
//! Idle ─▶ Extracting (url | image only) ─▶ Analyzing ─▶ Done
//!              │                               │
//!              └──────────────▶ Failed ◀───────┘
//! ```
//!
//! Each stage reports `on_stage_start` followed by exactly one of
//! `on_stage_complete` / `on_stage_error`; every run that gets past
//! validation ends with `on_analysis_complete`.
//!
//! # Example
//!
//! ```rust
//! use fakefinder::{AnalysisProgressCallback, ClientConfig, PipelineStage};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     stages: AtomicUsize,
//! }
//!
//! impl AnalysisProgressCallback for CountingCallback {
//!     fn on_stage_complete(&self, _stage: PipelineStage, _elapsed_ms: u64) {
//!         self.stages.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { stages: AtomicUsize::new(0) });
//! let config = ClientConfig::builder()
//!     .progress_callback(cb as Arc<dyn AnalysisProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// One remote round trip of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// `/extract/link`
    Scrape,
    /// `/extract/image`
    Ocr,
    /// `/analyze/full`
    FullAnalysis,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineStage::Scrape => "scraping article",
            PipelineStage::Ocr => "reading image",
            PipelineStage::FullAnalysis => "analysing",
        })
    }
}

/// Called by the orchestrator as a run advances.
///
/// Runs are independent and may overlap, so implementations must be
/// `Send + Sync`. All methods default to no-ops.
pub trait AnalysisProgressCallback: Send + Sync {
    /// A remote call is about to be issued.
    fn on_stage_start(&self, stage: PipelineStage) {
        let _ = stage;
    }

    /// The remote call returned successfully.
    fn on_stage_complete(&self, stage: PipelineStage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// The remote call failed; the run is about to end in `Failed`.
    fn on_stage_error(&self, stage: PipelineStage, error: &str) {
        let _ = (stage, error);
    }

    /// The run has finished, with or without a result.
    fn on_analysis_complete(&self, success: bool) {
        let _ = success;
    }
}

/// No-op implementation.
pub struct NoopProgressCallback;

impl AnalysisProgressCallback for NoopProgressCallback {}

/// The type stored in [`crate::config::ClientConfig`].
pub type ProgressCallback = Arc<dyn AnalysisProgressCallback>;
