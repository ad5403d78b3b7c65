//! The pipeline orchestrator.
//!
//! [`Analyzer::analyze`] takes one [`AnalysisRequest`] through its three
//! linear paths:
//!
//! ```text
//! text:  validate ─▶ /analyze/full ─▶ normalize
//! url:   validate ─▶ /extract/link ─▶ /analyze/full ─▶ normalize
//! image: validate ─▶ /extract/image ─▶ /analyze/full ─▶ normalize
//! ```
//!
//! Stages run strictly in sequence because analysis consumes extraction's
//! output. Every stage gets a single attempt; the first failure ends the run
//! and no partial result is produced. A run owns all of its state, so any
//! number of runs may be in flight on the same `Analyzer` at once.

use crate::client::ServiceClient;
use crate::config::ClientConfig;
use crate::error::AnalysisError;
use crate::output::{AnalysisOutcome, AnalysisResult};
use crate::pipeline::{extract, normalize};
use crate::progress::{AnalysisProgressCallback, PipelineStage, ProgressCallback};
use crate::request::AnalysisRequest;
use crate::transport::{HttpTransport, Transport};
use crate::wire::{FullAnalysisRequest, FullAnalysisResponse, PayloadError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Drives analysis runs against one service.
#[derive(Clone)]
pub struct Analyzer {
    client: ServiceClient,
    progress: Option<ProgressCallback>,
}

impl Analyzer {
    /// Build an analyzer from configuration.
    ///
    /// Uses `config.transport` when set, otherwise an [`HttpTransport`] for
    /// `config.base_url`.
    pub fn new(config: &ClientConfig) -> Result<Self, AnalysisError> {
        let transport: Arc<dyn Transport> = match config.transport {
            Some(ref t) => Arc::clone(t),
            None => Arc::new(
                HttpTransport::new(config).map_err(|e| AnalysisError::Internal(e.to_string()))?,
            ),
        };
        Ok(Self {
            client: ServiceClient::new(transport),
            progress: config.progress_callback.clone(),
        })
    }

    /// Build an analyzer for `$FAKEFINDER_API_URL` (or the local default).
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// Build an analyzer over an existing transport, without progress events.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ServiceClient::new(transport),
            progress: None,
        }
    }

    /// Typed access to individual endpoints.
    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    /// - [`AnalysisError::Validation`] — before any remote call
    /// - [`AnalysisError::Extraction`] / [`AnalysisError::EmptyExtraction`] —
    ///   `/analyze/full` is never called
    /// - [`AnalysisError::Analysis`] / [`AnalysisError::Stage`] — the combined
    ///   call failed or reported a failed assessment
    /// - [`AnalysisError::Unexpected`] — the combined payload was unusable
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        request.validate()?;

        let start = Instant::now();
        info!("Starting {} analysis", request.kind());

        let result = self.run_stages(request).await;
        self.emit(|cb| cb.on_analysis_complete(result.is_ok()));

        match &result {
            Ok(r) => info!(
                "Analysis complete: {} input, confidence {:.3}, {}ms",
                r.input_kind,
                r.confidence_score,
                start.elapsed().as_millis()
            ),
            Err(e) => warn!("Analysis failed after {}ms: {}", start.elapsed().as_millis(), e),
        }
        result
    }

    /// Like [`Self::analyze`], flattened to `{success, data?, error?}`.
    pub async fn run(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        AnalysisOutcome::from(self.analyze(request).await)
    }

    /// Synchronous wrapper around [`Self::analyze`].
    ///
    /// Creates a temporary tokio runtime internally, so it must not be called
    /// from inside an async context.
    pub fn analyze_blocking(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| AnalysisError::Internal(format!("Failed to create tokio runtime: {e}")))?
            .block_on(self.analyze(request))
    }

    async fn run_stages(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        // ── Stage 1: Extract ─────────────────────────────────────────────
        let content = match extract::stage_for(request.extraction_strategy()) {
            None => extract::extract(&self.client, request).await?,
            Some(stage) => {
                self.emit(|cb| cb.on_stage_start(stage));
                let stage_start = Instant::now();
                match extract::extract(&self.client, request).await {
                    Ok(content) => {
                        self.emit(|cb| cb.on_stage_complete(stage, elapsed_ms(stage_start)));
                        content
                    }
                    Err(e) => {
                        self.stage_failed(stage, &e);
                        return Err(e);
                    }
                }
            }
        };

        // ── Stage 2: Full analysis ───────────────────────────────────────
        let stage = PipelineStage::FullAnalysis;
        let body = FullAnalysisRequest::from_content(content, request.want_corroboration());
        self.emit(|cb| cb.on_stage_start(stage));
        let stage_start = Instant::now();

        let raw = match self.client.analyze_full_raw(&body).await {
            Ok(raw) => raw,
            Err(e) => {
                let e = AnalysisError::Analysis(e);
                self.stage_failed(stage, &e);
                return Err(e);
            }
        };

        let payload = match FullAnalysisResponse::from_value(raw) {
            Ok(p) => p,
            Err(PayloadError::StageFailed { stage: name, message }) => {
                let e = AnalysisError::Stage {
                    stage: name.to_string(),
                    message,
                };
                self.stage_failed(stage, &e);
                return Err(e);
            }
            Err(PayloadError::Malformed(detail)) => {
                error!("Unusable full-analysis payload: {}", detail);
                let e = AnalysisError::Unexpected { detail };
                self.stage_failed(stage, &e);
                return Err(e);
            }
        };
        self.emit(|cb| cb.on_stage_complete(stage, elapsed_ms(stage_start)));

        // ── Stage 3: Normalise ───────────────────────────────────────────
        Ok(normalize::normalize(&payload, request))
    }

    fn stage_failed(&self, stage: PipelineStage, e: &AnalysisError) {
        warn!("Stage '{}' failed: {}", stage, e);
        let msg = e.to_string();
        self.emit(|cb| cb.on_stage_error(stage, &msg));
    }

    fn emit(&self, f: impl FnOnce(&dyn AnalysisProgressCallback)) {
        if let Some(ref cb) = self.progress {
            f(cb.as_ref());
        }
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
