//! The "current result" slot a front end renders from.
//!
//! An [`AnalysisSession`] owns an [`Analyzer`] and the single latest outcome.
//! Submitting clears the previous result and error, runs the pipeline, then
//! writes whichever of the two it produced. Overlapping submissions are
//! allowed; each writes its own outcome when it finishes, so the last run to
//! complete wins. A submission whose future is dropped stops counting as in
//! flight and writes nothing.

use crate::analyzer::Analyzer;
use crate::output::AnalysisResult;
use crate::request::AnalysisRequest;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct SessionState {
    result: Option<AnalysisResult>,
    error: Option<String>,
    in_flight: usize,
}

/// Shared, cloneable handle to one result slot.
#[derive(Clone)]
pub struct AnalysisSession {
    analyzer: Analyzer,
    state: Arc<Mutex<SessionState>>,
}

impl AnalysisSession {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Run one analysis and store its outcome in the slot.
    ///
    /// Returns `true` when a result was stored, `false` when an error was.
    pub async fn submit(&self, request: &AnalysisRequest) -> bool {
        let mut in_flight = InFlight::enter(&self.state);

        let outcome = self.analyzer.analyze(request).await;

        let mut s = self.lock();
        in_flight.leave(&mut s);
        match outcome {
            Ok(result) => {
                debug!("Session slot updated with {} result", result.input_kind);
                s.result = Some(result);
                s.error = None;
                true
            }
            Err(e) => {
                s.result = None;
                s.error = Some(e.to_string());
                false
            }
        }
    }

    /// The latest stored result.
    pub fn result(&self) -> Option<AnalysisResult> {
        self.lock().result.clone()
    }

    /// The latest stored error message.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Whether any submission is still running.
    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    pub fn clear_result(&self) {
        self.lock().result = None;
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }
}

// A panic while holding the lock leaves plain data behind; keep using it.
fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Counts one submission as in flight until it finishes or is dropped.
struct InFlight<'a> {
    state: &'a Mutex<SessionState>,
    done: bool,
}

impl<'a> InFlight<'a> {
    /// Clear the slot and register a new submission.
    fn enter(state: &'a Mutex<SessionState>) -> Self {
        let mut s = lock_state(state);
        s.result = None;
        s.error = None;
        s.in_flight += 1;
        Self { state, done: false }
    }

    /// Finish under a lock the caller already holds.
    fn leave(&mut self, s: &mut SessionState) {
        if !self.done {
            s.in_flight = s.in_flight.saturating_sub(1);
            self.done = true;
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            let mut s = lock_state(self.state);
            s.in_flight = s.in_flight.saturating_sub(1);
        }
    }
}
