use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chalk_analyzer::{AnalyzeError, Analyzer};
use chalk_auth::{AuthError, IdentityProvider, SessionAuth};
use chalk_core::entities::{AnalysisResult, JournalEntry, NewJournalEntry};
use chalk_core::enums::{FailureStage, SubmissionState};
use chalk_core::identity::SessionIdentity;
use chalk_db::error::DatabaseError;
use chalk_db::{JournalService, JournalStore, SnapshotStream};
use chalk_journal::{AnalysisOrchestrator, OrchestratorSettings, RetryPolicy, SubmitError};
use futures::StreamExt as _;
use pretty_assertions::assert_eq;

/// Fails the first `fail_first` calls with a 503, then succeeds.
struct ScriptedAnalyzer {
    calls: Arc<AtomicU32>,
    fail_first: u32,
    latency: Duration,
}

impl ScriptedAnalyzer {
    fn new(fail_first: u32, latency: Duration) -> (Self, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let analyzer = Self {
            calls: Arc::clone(&calls),
            fail_first,
            latency,
        };
        (analyzer, calls)
    }

    fn healthy() -> (Self, Arc<AtomicU32>) {
        Self::new(0, Duration::ZERO)
    }
}

impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzeError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.latency).await;
        if n <= self.fail_first {
            return Err(AnalyzeError::Api {
                status: 503,
                message: "Service Unavailable".into(),
            });
        }
        Ok(AnalysisResult::new("Positive", format!("You wrote {} chars.", text.len())))
    }
}

struct FailingStore;

impl JournalStore for FailingStore {
    async fn append(&self, _entry: NewJournalEntry) -> Result<JournalEntry, DatabaseError> {
        Err(DatabaseError::Query("disk is full".into()))
    }

    fn subscribe_all(&self, _owner_id: &str) -> SnapshotStream {
        futures::stream::empty().boxed()
    }
}

fn settings(attempts: u32) -> OrchestratorSettings {
    OrchestratorSettings {
        retry: RetryPolicy::new(attempts, Duration::from_millis(100), 2.0).unwrap(),
        attempt_timeout: Duration::from_secs(5),
        auth_wait_timeout: Duration::from_secs(2),
    }
}

async fn journal() -> JournalService {
    JournalService::new_local(":memory:", "chalk-test").await.unwrap()
}

fn alice() -> SessionAuth {
    SessionAuth::signed_in(SessionIdentity::anonymous("anon-alice"))
}

#[tokio::test]
async fn analyzed_entry_is_saved_for_signed_in_user() {
    let (analyzer, calls) = ScriptedAnalyzer::healthy();
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, alice(), settings(3));

    let outcome = orch.submit("  slept well, long walk  \n").await.unwrap();

    assert!(!outcome.is_degraded());
    assert_eq!(outcome.entry.text, "slept well, long walk");
    assert_eq!(outcome.entry.sentiment.as_deref(), Some("Positive"));
    assert_eq!(outcome.entry.feedback.as_deref(), Some("You wrote 21 chars."));
    assert_eq!(outcome.entry.owner_id, "anon-alice");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(orch.state(), SubmissionState::Idle);

    let stored = orch.store().list_entries("anon-alice").await.unwrap();
    assert_eq!(stored, vec![outcome.entry]);
}

#[tokio::test]
async fn blank_text_has_no_side_effects() {
    let (analyzer, calls) = ScriptedAnalyzer::healthy();
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, alice(), settings(3));
    let states = orch.states();

    for text in ["", "   ", "\n\t"] {
        let err = orch.submit(text).await.unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)), "{text:?}");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!states.has_changed().unwrap());
    assert!(orch.store().list_entries("anon-alice").await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn exhausted_analysis_saves_placeholders() {
    let (analyzer, calls) = ScriptedAnalyzer::new(u32::MAX, Duration::ZERO);
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, alice(), settings(3));

    let outcome = orch.submit("rough day").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(outcome.is_degraded());
    assert_eq!(outcome.entry.text, "rough day");
    assert_eq!(outcome.entry.sentiment.as_deref(), Some("Error analyzing"));
    assert_eq!(
        outcome.entry.feedback.as_deref(),
        Some("Error generating feedback: API call failed with status: 503. Service Unavailable")
    );
    assert_eq!(orch.state(), SubmissionState::Idle);
    assert_eq!(orch.store().list_entries("anon-alice").await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn recovers_when_a_retry_succeeds() {
    let (analyzer, calls) = ScriptedAnalyzer::new(2, Duration::ZERO);
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, alice(), settings(3));

    let outcome = orch.submit("third time lucky").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(!outcome.is_degraded());
    assert_eq!(outcome.entry.sentiment.as_deref(), Some("Positive"));
}

#[tokio::test(start_paused = true)]
async fn attempt_timeout_counts_as_failed_attempt() {
    let (analyzer, calls) = ScriptedAnalyzer::new(0, Duration::from_secs(60));
    let mut config = settings(2);
    config.attempt_timeout = Duration::from_secs(1);
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, alice(), config);

    let outcome = orch.submit("slow network").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let message = outcome.analysis_error.unwrap();
    assert!(message.contains("timed out"), "{message}");
    assert_eq!(outcome.entry.sentiment.as_deref(), Some("Error analyzing"));
}

#[tokio::test(start_paused = true)]
async fn concurrent_submit_is_rejected_as_busy() {
    let (analyzer, calls) = ScriptedAnalyzer::new(0, Duration::from_secs(1));
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, alice(), settings(3));

    let (first, second) = tokio::join!(orch.submit("first"), orch.submit("second"));

    assert_eq!(first.unwrap().entry.text, "first");
    assert!(matches!(second, Err(SubmitError::Busy)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(orch.store().list_entries("anon-alice").await.unwrap().len(), 1);

    // Once idle again, submissions are accepted.
    orch.submit("third").await.unwrap();
    assert_eq!(orch.store().list_entries("anon-alice").await.unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn owner_is_identity_current_when_saving_begins() {
    let (analyzer, _) = ScriptedAnalyzer::new(0, Duration::from_secs(1));
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, alice(), settings(3));

    let (outcome, ()) = tokio::join!(orch.submit("who wrote this?"), async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        orch.identity()
            .establish(SessionIdentity::authenticated("user_bob"));
    });

    let entry = outcome.unwrap().entry;
    assert_eq!(entry.owner_id, "user_bob");
    assert!(orch.store().list_entries("anon-alice").await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn sign_out_during_analysis_fails_without_writing() {
    let (analyzer, _) = ScriptedAnalyzer::new(0, Duration::from_secs(1));
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, alice(), settings(3));

    let (outcome, ()) = tokio::join!(orch.submit("lost"), async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        orch.identity().sign_out();
    });

    assert!(matches!(
        outcome,
        Err(SubmitError::Auth(AuthError::NotAuthenticated))
    ));
    match orch.state() {
        SubmissionState::Failed(failure) => assert_eq!(failure.stage, FailureStage::Auth),
        other => panic!("expected auth failure, got {other:?}"),
    }
    assert!(orch.store().list_entries("anon-alice").await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn pending_identity_times_out_without_state_change() {
    let (analyzer, calls) = ScriptedAnalyzer::healthy();
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, SessionAuth::new(), settings(3));
    let states = orch.states();

    let err = orch.submit("too early").await.unwrap_err();

    assert!(matches!(err, SubmitError::Auth(AuthError::Pending(_))), "{err:?}");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!states.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn waits_for_sign_in_to_finish() {
    let (analyzer, _) = ScriptedAnalyzer::healthy();
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, SessionAuth::new(), settings(3));

    let (outcome, ()) = tokio::join!(orch.submit("patience"), async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        orch.identity()
            .establish(SessionIdentity::anonymous("anon-late"));
    });

    assert_eq!(outcome.unwrap().entry.owner_id, "anon-late");
}

#[tokio::test]
async fn signed_out_identity_is_rejected_up_front() {
    let (analyzer, calls) = ScriptedAnalyzer::healthy();
    let auth = SessionAuth::new();
    auth.sign_out();
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, auth, settings(3));

    let err = orch.submit("nobody home").await.unwrap_err();

    assert!(matches!(err, SubmitError::Auth(AuthError::NotAuthenticated)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(orch.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn persist_error_is_surfaced_verbatim() {
    let (analyzer, calls) = ScriptedAnalyzer::healthy();
    let orch = AnalysisOrchestrator::new(analyzer, FailingStore, alice(), settings(3));

    let err = orch.submit("will not stick").await.unwrap_err();

    assert!(matches!(err, SubmitError::Persist(_)));
    assert_eq!(err.to_string(), "Query failed: disk is full");
    match orch.state() {
        SubmissionState::Failed(failure) => {
            assert_eq!(failure.stage, FailureStage::Persist);
            assert_eq!(failure.message, "Query failed: disk is full");
        }
        other => panic!("expected persist failure, got {other:?}"),
    }

    // A failed submission does not block the next one.
    let err = orch.submit("try again").await.unwrap_err();
    assert!(matches!(err, SubmitError::Persist(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn saved_entry_reaches_live_subscription() {
    let (analyzer, _) = ScriptedAnalyzer::healthy();
    let orch = AnalysisOrchestrator::new(analyzer, journal().await, alice(), settings(3));
    let owner = orch
        .identity()
        .current_identity()
        .identity()
        .map(|identity| identity.user_id.clone())
        .unwrap();

    let mut feed = orch.store().subscribe_all(&owner);
    assert!(feed.next().await.unwrap().unwrap().is_empty());

    let saved = orch.submit("round trip").await.unwrap().entry;

    let snapshot = tokio::time::timeout(Duration::from_secs(5), feed.next())
        .await
        .expect("snapshot after submit")
        .unwrap()
        .unwrap();
    assert_eq!(snapshot, vec![saved]);
}
