//! Page controller: request lifecycle, upload selection and card expansion.
//!
//! ```text
//! Idle → Loading → { Success | Failure } → Loading → …
//! ```
//!
//! The controller is locked only for state transitions, never across the
//! network call. While a request is in flight further Analyze actions are
//! ignored, and a completion that does not match the in-flight request id is
//! discarded.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::{AnalysisError, AnalysisResult, Analyzer, Criterion, FALLBACK_MESSAGE};
use crate::page::upload::{UploadController, UploadSelection};

pub type SharedPage = Arc<Mutex<PageController>>;

#[derive(Debug, Clone, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        request_id: Uuid,
        file_name: String,
    },
    Success {
        result: AnalysisResult,
        file_name: String,
        completed_at: DateTime<Utc>,
    },
    Failure {
        message: String,
    },
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }
}

/// A started analysis, carried into the background task.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub request_id: Uuid,
    pub upload: UploadSelection,
}

#[derive(Debug, Default)]
pub struct PageController {
    upload: UploadController,
    state: RequestState,
    expanded: BTreeSet<Criterion>,
}

impl PageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedPage {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn selection(&self) -> Option<&UploadSelection> {
        self.upload.selection()
    }

    pub fn can_analyze(&self) -> bool {
        self.upload.can_analyze(self.state.is_loading())
    }

    /// The drop zone is disabled while a request is in flight.
    pub fn select_file(&mut self, file_name: &str, media_type: Option<&str>, bytes: Bytes) -> bool {
        if self.state.is_loading() {
            warn!(file_name, "Upload ignored: analysis in progress");
            return false;
        }
        self.upload.offer(file_name, media_type, bytes)
    }

    /// Shows an upload that could not be read as the page error. The current
    /// selection is kept, so Analyze stays available. Ignored while Loading.
    pub fn reject_upload(&mut self, message: impl Into<String>) -> bool {
        if self.state.is_loading() {
            warn!("Upload rejection not shown: analysis in progress");
            return false;
        }
        self.state = RequestState::Failure {
            message: message.into(),
        };
        true
    }

    /// Moves to Loading and hands out the upload to analyse, or `None` when
    /// Analyze is not currently enabled.
    pub fn begin_analysis(&mut self) -> Option<AnalysisTicket> {
        if self.state.is_loading() {
            return None;
        }
        let upload = self.upload.selection()?.clone();
        let request_id = Uuid::new_v4();
        self.expanded.clear();
        self.state = RequestState::Loading {
            request_id,
            file_name: upload.file_name().to_string(),
        };
        Some(AnalysisTicket { request_id, upload })
    }

    /// Applies the outcome of `request_id`. Returns false for a stale completion.
    pub fn finish_analysis(
        &mut self,
        request_id: Uuid,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        let file_name = match &self.state {
            RequestState::Loading {
                request_id: current,
                file_name,
            } if *current == request_id => file_name.clone(),
            _ => {
                warn!(%request_id, "Discarding completion for a request that is no longer in flight");
                return false;
            }
        };

        self.state = match outcome {
            Ok(result) => RequestState::Success {
                result,
                file_name,
                completed_at: Utc::now(),
            },
            Err(err) => RequestState::Failure {
                message: err.to_string(),
            },
        };
        true
    }

    /// Flips one evaluator card and returns its new state.
    pub fn toggle(&mut self, criterion: Criterion) -> bool {
        if self.expanded.remove(&criterion) {
            false
        } else {
            self.expanded.insert(criterion);
            true
        }
    }

    pub fn expanded(&self) -> &BTreeSet<Criterion> {
        &self.expanded
    }
}

/// Spawns `run_analysis` under a supervisor. If the analysis task dies
/// without writing its outcome, the page leaves Loading with the fallback
/// message.
pub fn spawn_analysis(page: SharedPage, analyzer: Arc<dyn Analyzer>, ticket: AnalysisTicket) {
    let request_id = ticket.request_id;
    let task = tokio::spawn(run_analysis(page.clone(), analyzer, ticket));

    tokio::spawn(async move {
        if let Err(err) = task.await {
            error!(%request_id, error = %err, "Analysis task aborted");
            page.lock().await.finish_analysis(
                request_id,
                Err(AnalysisError::Transport(FALLBACK_MESSAGE.to_string())),
            );
        }
    });
}

/// Runs one analysis and writes the outcome back into the page.
async fn run_analysis(page: SharedPage, analyzer: Arc<dyn Analyzer>, ticket: AnalysisTicket) {
    let started = Instant::now();
    let outcome = analyzer.analyze(&ticket.upload).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &outcome {
        Ok(result) => info!(
            request_id = %ticket.request_id,
            elapsed_ms,
            quality_band = result.aggregation.quality_band.as_deref().unwrap_or("-"),
            "Analysis succeeded"
        ),
        Err(err) => warn!(
            request_id = %ticket.request_id,
            elapsed_ms,
            upstream_status = ?err.status(),
            error = %err,
            "Analysis failed"
        ),
    }

    page.lock().await.finish_analysis(ticket.request_id, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_selection() -> PageController {
        let mut page = PageController::new();
        assert!(page.select_file(
            "paper.pdf",
            Some("application/pdf"),
            Bytes::from_static(b"%PDF-1.4")
        ));
        page
    }

    #[test]
    fn test_starts_idle_without_analyze() {
        let mut page = PageController::new();
        assert!(matches!(page.state(), RequestState::Idle));
        assert!(!page.can_analyze());
        assert!(page.begin_analysis().is_none());
    }

    #[test]
    fn test_begin_moves_to_loading_and_keeps_selection() {
        let mut page = with_selection();
        let ticket = page.begin_analysis().unwrap();

        assert!(page.state().is_loading());
        assert_eq!(ticket.upload.file_name(), "paper.pdf");
        assert!(page.selection().is_some());
        assert!(!page.can_analyze());
    }

    #[test]
    fn test_second_begin_while_loading_is_refused() {
        let mut page = with_selection();
        page.begin_analysis().unwrap();
        assert!(page.begin_analysis().is_none());
    }

    #[test]
    fn test_success_then_rerun_clears_result() {
        let mut page = with_selection();
        let ticket = page.begin_analysis().unwrap();
        assert!(page.finish_analysis(ticket.request_id, Ok(AnalysisResult::default())));
        assert!(matches!(page.state(), RequestState::Success { .. }));

        page.begin_analysis().unwrap();
        assert!(matches!(page.state(), RequestState::Loading { .. }));
    }

    #[test]
    fn test_failure_carries_error_message() {
        let mut page = with_selection();
        let ticket = page.begin_analysis().unwrap();
        page.finish_analysis(
            ticket.request_id,
            Err(AnalysisError::server(500, "bad file")),
        );

        match page.state() {
            RequestState::Failure { message } => assert_eq!(message, "bad file"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(page.can_analyze());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut page = with_selection();
        let ticket = page.begin_analysis().unwrap();
        assert!(!page.finish_analysis(Uuid::new_v4(), Ok(AnalysisResult::default())));
        assert!(page.state().is_loading());
        assert!(page.finish_analysis(ticket.request_id, Ok(AnalysisResult::default())));
    }

    #[test]
    fn test_uploads_ignored_while_loading() {
        let mut page = with_selection();
        page.begin_analysis().unwrap();
        assert!(!page.select_file(
            "other.pdf",
            Some("application/pdf"),
            Bytes::from_static(b"%PDF")
        ));
        assert_eq!(page.selection().unwrap().file_name(), "paper.pdf");
    }

    #[test]
    fn test_rejected_upload_becomes_page_error() {
        let mut page = with_selection();
        assert!(page.reject_upload("too big"));
        match page.state() {
            RequestState::Failure { message } => assert_eq!(message, "too big"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(page.can_analyze());

        page.begin_analysis().unwrap();
        assert!(!page.reject_upload("too big"));
        assert!(page.state().is_loading());
    }

    struct PanickingAnalyzer;

    #[async_trait::async_trait]
    impl Analyzer for PanickingAnalyzer {
        async fn analyze(
            &self,
            _upload: &UploadSelection,
        ) -> Result<AnalysisResult, AnalysisError> {
            panic!("analyzer blew up");
        }
    }

    #[tokio::test]
    async fn test_panicking_analysis_leaves_loading() {
        let page = PageController::shared();
        let ticket = {
            let mut guard = page.lock().await;
            guard.select_file("paper.pdf", Some("application/pdf"), Bytes::from_static(b"%PDF"));
            guard.begin_analysis().unwrap()
        };

        spawn_analysis(page.clone(), Arc::new(PanickingAnalyzer), ticket);

        for _ in 0..200 {
            if !page.lock().await.state().is_loading() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        let guard = page.lock().await;
        match guard.state() {
            RequestState::Failure { message } => assert_eq!(message, FALLBACK_MESSAGE),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(guard.can_analyze());
    }

    #[test]
    fn test_toggle_and_reset_on_new_analysis() {
        let mut page = with_selection();
        assert!(page.toggle(Criterion::StatisticalRigor));
        assert!(page.expanded().contains(&Criterion::StatisticalRigor));
        assert!(!page.toggle(Criterion::StatisticalRigor));
        page.toggle(Criterion::ClinicalRelevance);

        page.begin_analysis().unwrap();
        assert!(page.expanded().is_empty());
    }
}
