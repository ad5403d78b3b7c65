//! Pipeline stages for one analysis run.
//!
//! Each submodule implements exactly one step; the orchestration between them
//! (ordering, progress events, failure propagation) lives in
//! [`crate::analyzer`].
//!
//! ## Data Flow
//!
//! ```text
//! AnalysisRequest ──▶ extract ──▶ /analyze/full ──▶ normalize ──▶ AnalysisResult
//!                   (none|scrape|ocr)  (one call)      (pure)
//! ```
//!
//! 1. [`extract`]   — turn the raw input into `ExtractedContent`; the only
//!    stage whose behaviour depends on the input kind
//! 2. [`normalize`] — fold the combined payload and the request flags into
//!    the display-ready record, including the derived confidence score

pub mod extract;
pub mod normalize;
