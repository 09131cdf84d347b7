//! The submission/report workflow controller.
//!
//! One [`WorkflowController`] owns the state of one user session: the
//! selected input, the submission lifecycle, the last successful report and
//! whether the report view is open. All mutation goes through `&mut self`,
//! so a single owner serializes state changes. Downloads only read the
//! report handle and take `&self`.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use cleansight_api::CleanSightClient;
use cleansight_types::{
    AnalysisReport, ArtifactKind, DatasetFile, InputSelection, ReportHandle, StoredReport, SubmissionState,
};
use cleansight_util::{DirectorySink, Settings};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::WorkflowError;
use crate::deadline::run_guarded;
use crate::ports::{AnalysisService, ArtifactFetcher, ArtifactSink, Notifier};

/// External collaborators used by the controller.
#[derive(Clone)]
pub struct WorkflowServices {
    pub analysis: Arc<dyn AnalysisService>,
    pub artifacts: Arc<dyn ArtifactFetcher>,
    pub sink: Arc<dyn ArtifactSink>,
    pub notifier: Arc<dyn Notifier>,
}

impl WorkflowServices {
    /// Wire the HTTP client for both analysis and artifact retrieval.
    pub fn from_client(client: CleanSightClient, sink: DirectorySink, notifier: Arc<dyn Notifier>) -> Self {
        let client = Arc::new(client);
        Self {
            analysis: client.clone(),
            artifacts: client,
            sink: Arc::new(sink),
            notifier,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct WorkflowState {
    input: InputSelection,
    submission: SubmissionState,
    report: Option<StoredReport>,
    report_visible: bool,
}

/// Proof that a submission has begun. Hand it back to
/// [`WorkflowController::finish_submission`] to settle the state.
#[derive(Debug)]
#[must_use = "a begun submission must be finished or the controller stays busy"]
pub struct SubmissionTicket {
    input: InputSelection,
    token: CancellationToken,
}

impl SubmissionTicket {
    /// The input captured when the submission began.
    pub fn input(&self) -> &InputSelection {
        &self.input
    }

    /// Cancelled when the controller's interrupt token is cancelled while
    /// this submission is in flight.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Owns the workflow state for one session.
pub struct WorkflowController {
    services: WorkflowServices,
    request_timeout: Duration,
    interrupt: Mutex<CancellationToken>,
    state: WorkflowState,
}

impl WorkflowController {
    pub fn new(services: WorkflowServices, request_timeout: Duration) -> Self {
        Self {
            services,
            request_timeout,
            interrupt: Mutex::new(CancellationToken::new()),
            state: WorkflowState::default(),
        }
    }

    /// Build a controller talking to the backend described by `settings`.
    pub fn from_settings(settings: &Settings, notifier: Arc<dyn Notifier>) -> Result<Self, WorkflowError> {
        let client = CleanSightClient::new(&settings.base_url)?;
        let sink = DirectorySink::new(settings.download_dir.clone());
        let services = WorkflowServices::from_client(client, sink, notifier);
        Ok(Self::new(services, settings.request_timeout()))
    }

    pub fn input(&self) -> &InputSelection {
        &self.state.input
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.state.submission
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.state.report.as_ref().map(|stored| &stored.report)
    }

    pub fn report_handle(&self) -> Option<&ReportHandle> {
        self.state.report.as_ref().map(|stored| &stored.handle)
    }

    pub fn stored_report(&self) -> Option<&StoredReport> {
        self.state.report.as_ref()
    }

    pub fn is_report_visible(&self) -> bool {
        self.state.report_visible
    }

    /// Whether the submit trigger should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.input.is_none() && self.state.submission.accepts_submission()
    }

    /// Token that interrupts the calls in flight when it is cancelled.
    ///
    /// Once cancelled it is spent: the next call, or the next request for a
    /// token, starts a fresh one, so an interrupt never outlives the calls
    /// it was meant for.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.current_interrupt()
    }

    fn current_interrupt(&self) -> CancellationToken {
        let mut interrupt = self.interrupt.lock().unwrap_or_else(PoisonError::into_inner);
        if interrupt.is_cancelled() {
            debug!("interrupt token spent; starting a fresh one");
            *interrupt = CancellationToken::new();
        }
        interrupt.clone()
    }

    /// Select a dataset file. Any pasted text is discarded.
    pub fn select_file(&mut self, file: DatasetFile) {
        debug!(file = %file.file_name, "file selected");
        self.state.input = InputSelection::File(file);
    }

    /// Update the paste field.
    ///
    /// Non-blank text replaces any selected file. Blank text leaves a
    /// selected file alone and clears a previous paste; it never brings back
    /// a file that was replaced earlier.
    pub fn set_pasted_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.trim().is_empty() {
            if matches!(self.state.input, InputSelection::File(_)) {
                debug!("pasted text replaces selected file");
            }
            self.state.input = InputSelection::PastedText(text);
        } else if matches!(self.state.input, InputSelection::PastedText(_)) {
            self.state.input = InputSelection::None;
        }
    }

    /// Submit the current input and wait for the analysis.
    ///
    /// On success the report and handle are stored and the report view
    /// opens. On failure the previous report is kept, the view closes and
    /// the error is sent to the notifier. The submission state leaves
    /// `Submitting` exactly once, including when this future is dropped
    /// before completion.
    pub async fn submit(&mut self) -> Result<(), WorkflowError> {
        let ticket = self.begin_submission()?;
        let analysis = Arc::clone(&self.services.analysis);
        let timeout = self.request_timeout;

        let outcome = {
            let guard = AbandonGuard {
                state: &mut self.state,
                notifier: self.services.notifier.as_ref(),
                armed: true,
            };
            let outcome = run_guarded("analysis", timeout, &ticket.token, analysis.analyze(&ticket.input)).await;
            guard.disarm();
            outcome
        };

        self.finish_submission(ticket, outcome)
    }

    /// First half of [`submit`](Self::submit): validate, enter `Submitting`
    /// and capture the input.
    ///
    /// Fails with [`WorkflowError::Busy`] while another submission is in
    /// flight and with [`WorkflowError::Validation`] when nothing is
    /// selected. Neither failure changes state.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, WorkflowError> {
        if !self.state.submission.accepts_submission() {
            return Err(self.reject(WorkflowError::Busy));
        }
        if self.state.input.is_none() {
            return Err(self.reject(WorkflowError::Validation));
        }

        self.state.submission = SubmissionState::Submitting;
        info!(input = %self.state.input.describe(), "submission started");
        Ok(SubmissionTicket {
            input: self.state.input.clone(),
            token: self.current_interrupt().child_token(),
        })
    }

    /// Second half of [`submit`](Self::submit): settle the state with the
    /// analysis outcome.
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<(AnalysisReport, ReportHandle), WorkflowError>,
    ) -> Result<(), WorkflowError> {
        drop(ticket);
        match outcome {
            Ok((report, handle)) => {
                info!(report_id = %handle, quality = %report.quality_label(), "submission succeeded");
                self.state.report = Some(StoredReport::new(report, handle));
                self.state.submission = SubmissionState::Succeeded;
                self.state.report_visible = true;
                Ok(())
            }
            Err(error) => {
                warn!(%error, "submission failed");
                self.state.submission = SubmissionState::Failed;
                self.state.report_visible = false;
                self.services.notifier.error(&error);
                Err(error)
            }
        }
    }

    /// Hide the report view. Report and handle are kept.
    pub fn close_report_view(&mut self) {
        self.state.report_visible = false;
    }

    /// Show the stored report again without resubmitting.
    pub fn reopen_report_view(&mut self) -> Result<(), WorkflowError> {
        if self.state.report.is_none() {
            return Err(self.reject(WorkflowError::NotReady));
        }
        self.state.report_visible = true;
        Ok(())
    }

    /// Download the formatted report document.
    pub async fn download_report(&self) -> Result<PathBuf, WorkflowError> {
        self.download(ArtifactKind::ReportDocument).await
    }

    /// Download the cleaned dataset.
    pub async fn download_preprocessed(&self) -> Result<PathBuf, WorkflowError> {
        self.download(ArtifactKind::PreprocessedDataset).await
    }

    /// Fetch an artifact for the stored report and save it.
    ///
    /// Never mutates controller state, so a failed download can simply be
    /// retried.
    pub async fn download(&self, kind: ArtifactKind) -> Result<PathBuf, WorkflowError> {
        let Some(handle) = self.report_handle() else {
            let error = WorkflowError::NotReady;
            self.services.notifier.error(&error);
            return Err(error);
        };

        let token = self.current_interrupt().child_token();
        let fetched = run_guarded(
            "download",
            self.request_timeout,
            &token,
            self.services.artifacts.fetch_artifact(handle, kind),
        )
        .await;
        let saved = match fetched {
            Ok(bytes) => self.services.sink.save(kind.file_name(), &bytes).await,
            Err(error) => Err(error),
        };

        match saved {
            Ok(path) => {
                self.services
                    .notifier
                    .info(&format!("saved {kind} to {}", path.display()));
                Ok(path)
            }
            Err(error) => {
                warn!(%kind, report_id = %handle, %error, "download failed");
                self.services.notifier.error(&error);
                Err(error)
            }
        }
    }

    fn reject(&self, error: WorkflowError) -> WorkflowError {
        debug!(%error, "action rejected");
        self.services.notifier.error(&error);
        error
    }
}

/// Settles a submission as failed if the submitting future is dropped
/// before it reaches `finish_submission`.
struct AbandonGuard<'a> {
    state: &'a mut WorkflowState,
    notifier: &'a dyn Notifier,
    armed: bool,
}

impl AbandonGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("submission abandoned before completion");
        self.state.submission = SubmissionState::Failed;
        self.state.report_visible = false;
        self.notifier.error(&WorkflowError::Cancelled { operation: "analysis" });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use cleansight_api::artifact_path;
    use cleansight_types::AnalysisResponse;

    use super::*;

    fn response(id: &str, quality: f64) -> (AnalysisReport, ReportHandle) {
        AnalysisResponse {
            report_id: id.into(),
            summary: "ok".into(),
            data_quality: quality,
            missing_values: 3,
            outliers: 1,
            recommendations: vec!["drop col X".into()],
            visualizations: None,
        }
        .into_parts()
    }

    #[derive(Default)]
    struct ScriptedAnalysis {
        replies: Mutex<VecDeque<Result<(AnalysisReport, ReportHandle), WorkflowError>>>,
        seen: Mutex<Vec<InputSelection>>,
        hang: bool,
    }

    impl ScriptedAnalysis {
        fn replying(replies: Vec<Result<(AnalysisReport, ReportHandle), WorkflowError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            })
        }

        fn hanging() -> Arc<Self> {
            Arc::new(Self {
                hang: true,
                ..Default::default()
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AnalysisService for ScriptedAnalysis {
        async fn analyze(&self, input: &InputSelection) -> Result<(AnalysisReport, ReportHandle), WorkflowError> {
            self.seen.lock().unwrap().push(input.clone());
            if self.hang {
                std::future::pending::<()>().await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected analysis call")
        }
    }

    #[derive(Default)]
    struct RecordingFetcher {
        requests: Mutex<Vec<String>>,
        failures_left: Mutex<usize>,
    }

    #[async_trait]
    impl ArtifactFetcher for RecordingFetcher {
        async fn fetch_artifact(&self, handle: &ReportHandle, kind: ArtifactKind) -> Result<Vec<u8>, WorkflowError> {
            self.requests.lock().unwrap().push(artifact_path(handle, kind));
            let mut failures_left = self.failures_left.lock().unwrap();
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(WorkflowError::Transport { status: 503, message: None });
            }
            Ok(format!("{kind}:{handle}").into_bytes())
        }
    }

    #[derive(Default)]
    struct MemorySink {
        saved: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl ArtifactSink for MemorySink {
        async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, WorkflowError> {
            let mut saved = self.saved.lock().unwrap();
            saved.push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(format!("/downloads/{}-{}", saved.len(), file_name)))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        errors: Mutex<Vec<String>>,
        infos: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn error(&self, error: &WorkflowError) {
            self.errors.lock().unwrap().push(error.to_string());
        }

        fn info(&self, message: &str) {
            self.infos.lock().unwrap().push(message.to_string());
        }
    }

    struct Harness {
        controller: WorkflowController,
        analysis: Arc<ScriptedAnalysis>,
        fetcher: Arc<RecordingFetcher>,
        sink: Arc<MemorySink>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness(analysis: Arc<ScriptedAnalysis>) -> Harness {
        let fetcher = Arc::new(RecordingFetcher::default());
        let sink = Arc::new(MemorySink::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let services = WorkflowServices {
            analysis: analysis.clone(),
            artifacts: fetcher.clone(),
            sink: sink.clone(),
            notifier: notifier.clone(),
        };
        Harness {
            controller: WorkflowController::new(services, Duration::from_secs(5)),
            analysis,
            fetcher,
            sink,
            notifier,
        }
    }

    fn csv_file() -> DatasetFile {
        DatasetFile::new("data.csv", b"a,b\n1,\n".to_vec())
    }

    #[test]
    fn input_modes_are_mutually_exclusive() {
        let mut h = harness(ScriptedAnalysis::replying(vec![]));

        h.controller.set_pasted_text("a,b\n1,2");
        h.controller.select_file(csv_file());
        assert_eq!(h.controller.input(), &InputSelection::File(csv_file()));

        h.controller.set_pasted_text("x,y\n3,4");
        assert_eq!(h.controller.input(), &InputSelection::PastedText("x,y\n3,4".into()));

        // Blank text clears the paste and does not bring the file back.
        h.controller.set_pasted_text("   ");
        assert_eq!(h.controller.input(), &InputSelection::None);
    }

    #[test]
    fn blank_paste_keeps_a_selected_file() {
        let mut h = harness(ScriptedAnalysis::replying(vec![]));
        h.controller.select_file(csv_file());
        h.controller.set_pasted_text("");
        assert_eq!(h.controller.input(), &InputSelection::File(csv_file()));
        assert!(h.controller.can_submit());
    }

    #[tokio::test]
    async fn submit_without_input_is_a_validation_error() {
        let mut h = harness(ScriptedAnalysis::replying(vec![]));

        let error = h.controller.submit().await.unwrap_err();

        assert!(matches!(error, WorkflowError::Validation));
        assert_eq!(h.analysis.calls(), 0);
        assert_eq!(h.controller.submission_state(), SubmissionState::Idle);
        assert_eq!(h.notifier.errors.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn successful_submit_stores_report_and_opens_view() {
        let mut h = harness(ScriptedAnalysis::replying(vec![Ok(response("r1", 92.0))]));
        h.controller.select_file(csv_file());

        h.controller.submit().await.unwrap();

        assert_eq!(h.controller.submission_state(), SubmissionState::Succeeded);
        assert!(h.controller.is_report_visible());
        let report = h.controller.report().unwrap();
        assert_eq!(report.quality_label(), "92%");
        assert_eq!(report.missing_values, 3);
        assert_eq!(report.outliers, 1);
        assert_eq!(report.recommendations, vec!["drop col X".to_string()]);
        assert_eq!(h.controller.report_handle().unwrap().as_str(), "r1");
        assert_eq!(*h.analysis.seen.lock().unwrap(), vec![InputSelection::File(csv_file())]);
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_previous_report() {
        let mut h = harness(ScriptedAnalysis::replying(vec![
            Ok(response("r1", 92.0)),
            Err(WorkflowError::Transport { status: 500, message: None }),
        ]));
        h.controller.set_pasted_text("a,b\n1,2");
        h.controller.submit().await.unwrap();
        let before = h.controller.stored_report().cloned();

        let error = h.controller.submit().await.unwrap_err();

        assert!(matches!(error, WorkflowError::Transport { status: 500, .. }));
        assert_eq!(h.controller.submission_state(), SubmissionState::Failed);
        assert!(!h.controller.is_report_visible());
        assert_eq!(h.controller.stored_report().cloned(), before);
        assert_eq!(h.notifier.errors.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn server_error_on_first_submit_sets_no_handle() {
        let mut h = harness(ScriptedAnalysis::replying(vec![Err(WorkflowError::Transport {
            status: 500,
            message: None,
        })]));
        h.controller.select_file(csv_file());

        assert!(h.controller.submit().await.is_err());

        assert_eq!(h.controller.submission_state(), SubmissionState::Failed);
        assert!(!h.controller.is_report_visible());
        assert!(h.controller.report_handle().is_none());
    }

    #[tokio::test]
    async fn downloads_without_a_report_are_not_ready() {
        let h = harness(ScriptedAnalysis::replying(vec![]));

        let report = h.controller.download_report().await.unwrap_err();
        let dataset = h.controller.download_preprocessed().await.unwrap_err();

        assert!(matches!(report, WorkflowError::NotReady));
        assert!(matches!(dataset, WorkflowError::NotReady));
        assert!(h.fetcher.requests.lock().unwrap().is_empty());
        assert!(h.sink.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn data_csv_scenario_targets_the_returned_report_id() {
        let mut h = harness(ScriptedAnalysis::replying(vec![Ok(response("r1", 92.0))]));
        h.controller.select_file(csv_file());
        h.controller.submit().await.unwrap();

        let path = h.controller.download_report().await.unwrap();

        assert_eq!(*h.fetcher.requests.lock().unwrap(), vec!["/download-report/r1".to_string()]);
        assert_eq!(path, PathBuf::from("/downloads/1-DataQualityReport.pdf"));
        assert_eq!(h.notifier.infos.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn repeated_downloads_fetch_and_save_each_time() {
        let mut h = harness(ScriptedAnalysis::replying(vec![Ok(response("r1", 80.0))]));
        h.controller.set_pasted_text("a\n1");
        h.controller.submit().await.unwrap();
        let before = h.controller.stored_report().cloned();

        let (first, second) = tokio::join!(h.controller.download_preprocessed(), h.controller.download_preprocessed());
        first.unwrap();
        second.unwrap();

        assert_eq!(h.fetcher.requests.lock().unwrap().len(), 2);
        let saved = h.sink.saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().all(|(name, _)| name == "PreprocessedDataset.csv"));
        assert_eq!(h.controller.stored_report().cloned(), before);
        assert_eq!(h.controller.submission_state(), SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn failed_download_changes_nothing_and_can_be_retried() {
        let mut h = harness(ScriptedAnalysis::replying(vec![Ok(response("r1", 80.0))]));
        h.controller.set_pasted_text("a\n1");
        h.controller.submit().await.unwrap();
        *h.fetcher.failures_left.lock().unwrap() = 1;

        let error = h.controller.download_report().await.unwrap_err();
        assert!(matches!(error, WorkflowError::Transport { status: 503, .. }));
        assert!(h.sink.saved.lock().unwrap().is_empty());
        assert!(h.controller.is_report_visible());

        h.controller.download_report().await.unwrap();
        assert_eq!(h.sink.saved.lock().unwrap().len(), 1);
    }

    #[test]
    fn overlapping_submissions_are_rejected() {
        let mut h = harness(ScriptedAnalysis::replying(vec![]));
        h.controller.set_pasted_text("a\n1");

        let ticket = h.controller.begin_submission().unwrap();
        assert!(!h.controller.can_submit());
        let error = h.controller.begin_submission().unwrap_err();
        assert!(matches!(error, WorkflowError::Busy));
        assert_eq!(h.controller.submission_state(), SubmissionState::Submitting);

        h.controller
            .finish_submission(ticket, Ok(response("r2", 70.0)))
            .unwrap();
        assert_eq!(h.controller.submission_state(), SubmissionState::Succeeded);
        assert_eq!(h.analysis.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_analysis_times_out_and_settles() {
        let mut h = harness(ScriptedAnalysis::hanging());
        h.controller.select_file(csv_file());

        let error = h.controller.submit().await.unwrap_err();

        assert!(matches!(error, WorkflowError::Timeout { operation: "analysis", .. }));
        assert_eq!(h.controller.submission_state(), SubmissionState::Failed);
        assert!(h.controller.can_submit());
    }

    #[tokio::test]
    async fn interrupt_aborts_the_submission_in_flight() {
        let mut h = harness(ScriptedAnalysis::hanging());
        h.controller.select_file(csv_file());
        let token = h.controller.cancellation_token();

        let (outcome, ()) = tokio::join!(h.controller.submit(), async {
            tokio::task::yield_now().await;
            token.cancel();
        });

        assert!(matches!(outcome, Err(WorkflowError::Cancelled { operation: "analysis" })));
        assert_eq!(h.controller.submission_state(), SubmissionState::Failed);
        assert_eq!(h.analysis.calls(), 1);
    }

    #[tokio::test]
    async fn submissions_after_an_interrupt_run_normally() {
        let mut h = harness(ScriptedAnalysis::replying(vec![Ok(response("r1", 92.0)), Ok(response("r2", 88.0))]));
        h.controller.select_file(csv_file());
        h.controller.cancellation_token().cancel();

        h.controller.submit().await.unwrap();
        h.controller.submit().await.unwrap();

        assert_eq!(h.analysis.calls(), 2);
        assert_eq!(h.controller.report_handle().unwrap().as_str(), "r2");
        assert!(!h.controller.cancellation_token().is_cancelled());
        h.controller.download_report().await.unwrap();
        assert_eq!(*h.fetcher.requests.lock().unwrap(), vec!["/download-report/r2".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_submit_future_still_settles_state() {
        let mut h = harness(ScriptedAnalysis::hanging());
        h.controller.select_file(csv_file());

        let outcome = tokio::time::timeout(Duration::from_millis(10), h.controller.submit()).await;

        assert!(outcome.is_err());
        assert_eq!(h.controller.submission_state(), SubmissionState::Failed);
        assert_eq!(*h.notifier.errors.lock().unwrap(), vec!["analysis was cancelled".to_string()]);
    }

    #[tokio::test]
    async fn closing_the_view_keeps_the_report() {
        let mut h = harness(ScriptedAnalysis::replying(vec![Ok(response("r1", 92.0))]));
        assert!(matches!(h.controller.reopen_report_view(), Err(WorkflowError::NotReady)));

        h.controller.select_file(csv_file());
        h.controller.submit().await.unwrap();
        h.controller.close_report_view();

        assert!(!h.controller.is_report_visible());
        assert!(h.controller.report().is_some());
        h.controller.download_report().await.unwrap();

        h.controller.reopen_report_view().unwrap();
        assert!(h.controller.is_report_visible());
    }

    #[tokio::test]
    async fn controller_drives_the_http_client_and_directory_sink() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            base_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 5,
            download_dir: dir.path().to_path_buf(),
        };
        let notifier = Arc::new(RecordingNotifier::default());
        let mut controller = WorkflowController::from_settings(&settings, notifier.clone()).unwrap();
        controller.set_pasted_text("a,b\n1,2");

        // Port 9 (discard) is closed on loopback in test environments.
        let error = controller.submit().await.unwrap_err();

        assert!(matches!(error, WorkflowError::Network { .. } | WorkflowError::Timeout { .. }));
        assert_eq!(controller.submission_state(), SubmissionState::Failed);
        assert_eq!(notifier.errors.lock().unwrap().len(), 1);
    }
}
