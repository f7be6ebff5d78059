mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::{fixture, phase, phase_rubric, reviewer, submit, task};
use rust_hackhub::ai::{AiAssistInput, AiAssistOutput, DisabledOracle, ScoringOracle};
use rust_hackhub::errors::{HackHubError, Result};
use rust_hackhub::models::evaluations::entities::{
    EvaluationScope, EvaluationSource, EvaluationStatus,
};
use rust_hackhub::models::evaluations::requests::{
    AiAssistRequest, EvaluationListQuery, EvaluationRefs,
};
use rust_hackhub::services::evaluations::{EvaluationLifecycle, EvaluationPolicy};

struct StubOracle {
    output: AiAssistOutput,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubOracle {
    fn new(output: AiAssistOutput) -> Self {
        Self {
            output,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn slow(output: AiAssistOutput, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(output)
        }
    }
}

#[async_trait]
impl ScoringOracle for StubOracle {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, input: &AiAssistInput) -> Result<AiAssistOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!input.rubric.criteria.is_empty());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.output.clone())
    }
}

fn suggestion(score: f64, ids: Option<Vec<i64>>) -> AiAssistOutput {
    AiAssistOutput {
        comment: "Clear demo, thin testing".to_string(),
        score: Some(score),
        evaluated_submission_ids: ids,
    }
}

fn submission_request(submission_id: i64) -> AiAssistRequest {
    AiAssistRequest {
        refs: EvaluationRefs {
            scope: EvaluationScope::Submission,
            submission_id: Some(submission_id),
            phase_id: None,
            project_id: None,
            team_id: None,
        },
        evaluated_submission_ids: None,
        locale: None,
    }
}

fn phase_request(phase_id: i64, team_id: i64) -> AiAssistRequest {
    AiAssistRequest {
        refs: EvaluationRefs {
            scope: EvaluationScope::Phase,
            submission_id: None,
            phase_id: Some(phase_id),
            project_id: None,
            team_id: Some(team_id),
        },
        evaluated_submission_ids: None,
        locale: Some("en".to_string()),
    }
}

fn lifecycle_with(
    storage: Arc<dyn rust_hackhub::storage::Storage>,
    oracle: Arc<dyn ScoringOracle>,
    policy: EvaluationPolicy,
) -> EvaluationLifecycle {
    EvaluationLifecycle::new(storage, policy).with_oracle(Some(oracle))
}

#[tokio::test]
async fn test_ai_draft_is_persisted_with_ai_source() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    phase_rubric(storage, p1.id).await;
    let sub = submit(storage, f.alpha, t1.id).await;

    let oracle = Arc::new(StubOracle::new(suggestion(85.5, None)));
    let lifecycle = lifecycle_with(f.storage.clone(), oracle.clone(), EvaluationPolicy::default());

    let draft = lifecycle
        .generate_ai_draft(&reviewer(10), &f.event, submission_request(sub.id))
        .await
        .unwrap();
    assert_eq!(draft.status, EvaluationStatus::Draft);
    assert_eq!(draft.source, EvaluationSource::AiAssisted);
    assert_eq!(draft.score, Some(85.5));
    assert_eq!(draft.comment, "Clear demo, thin testing");
    assert_eq!(draft.evaluated_submission_ids, vec![sub.id]);
    assert!(draft.rubric_snapshot.is_some());
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);

    // AI 草稿与人工草稿一样可以转为 final
    let promoted = lifecycle
        .promote_to_final(&reviewer(10), &f.event, draft.id)
        .await
        .unwrap();
    assert_eq!(promoted.source, EvaluationSource::AiAssisted);
}

#[tokio::test]
async fn test_missing_rubric_fails_before_calling_oracle() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;

    let oracle = Arc::new(StubOracle::new(suggestion(50.0, None)));
    let lifecycle = lifecycle_with(f.storage.clone(), oracle.clone(), EvaluationPolicy::default());

    let err = lifecycle
        .generate_ai_draft(&reviewer(10), &f.event, submission_request(sub.id))
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::NoRubricConfigured(_)));
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_slow_oracle_times_out_without_persisting() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    phase_rubric(storage, p1.id).await;
    let sub = submit(storage, f.alpha, t1.id).await;

    let oracle = Arc::new(StubOracle::slow(
        suggestion(50.0, None),
        Duration::from_secs(5),
    ));
    let policy = EvaluationPolicy {
        ai_timeout: Duration::from_millis(50),
        ..EvaluationPolicy::default()
    };
    let lifecycle = lifecycle_with(f.storage.clone(), oracle, policy);

    let err = lifecycle
        .generate_ai_draft(&reviewer(10), &f.event, submission_request(sub.id))
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::AdapterUnavailable(_)));
    assert!(err.is_retryable());

    let list = storage
        .list_evaluations(EvaluationListQuery {
            event_id: f.event.id,
            page: 1,
            size: 20,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(list.items.is_empty());
}

#[tokio::test]
async fn test_disabled_oracle_is_unavailable() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    phase_rubric(storage, p1.id).await;
    let sub = submit(storage, f.alpha, t1.id).await;

    let lifecycle = lifecycle_with(
        f.storage.clone(),
        Arc::new(DisabledOracle),
        EvaluationPolicy::default(),
    );
    let err = lifecycle
        .generate_ai_draft(&reviewer(10), &f.event, submission_request(sub.id))
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::AdapterUnavailable(_)));

    // 未注入预言机时同样不可用
    let bare = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let err = bare
        .generate_ai_draft(&reviewer(10), &f.event, submission_request(sub.id))
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::AdapterUnavailable(_)));
}

#[tokio::test]
async fn test_out_of_range_suggestion_is_rejected() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    phase_rubric(storage, p1.id).await;
    let sub = submit(storage, f.alpha, t1.id).await;

    let oracle = Arc::new(StubOracle::new(suggestion(140.0, None)));
    let lifecycle = lifecycle_with(f.storage.clone(), oracle, EvaluationPolicy::default());
    let err = lifecycle
        .generate_ai_draft(&reviewer(10), &f.event, submission_request(sub.id))
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Validation(_)));
}

#[tokio::test]
async fn test_proposed_submissions_are_intersected_with_candidates() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let t2 = task(storage, p1.id, "Pitch", 1).await;
    phase_rubric(storage, p1.id).await;
    let first = submit(storage, f.alpha, t1.id).await;
    let second = submit(storage, f.alpha, t2.id).await;
    let foreign = submit(storage, f.beta, t1.id).await;

    // 只保留候选集内的建议
    let oracle = Arc::new(StubOracle::new(suggestion(
        60.0,
        Some(vec![second.id, foreign.id]),
    )));
    let lifecycle = lifecycle_with(f.storage.clone(), oracle, EvaluationPolicy::default());
    let draft = lifecycle
        .generate_ai_draft(&reviewer(10), &f.event, phase_request(p1.id, f.alpha))
        .await
        .unwrap();
    assert_eq!(draft.evaluated_submission_ids, vec![second.id]);

    // 建议全部无效时使用全部候选
    let oracle = Arc::new(StubOracle::new(suggestion(60.0, Some(vec![foreign.id]))));
    let lifecycle = lifecycle_with(f.storage.clone(), oracle, EvaluationPolicy::default());
    let draft = lifecycle
        .generate_ai_draft(&reviewer(10), &f.event, phase_request(p1.id, f.alpha))
        .await
        .unwrap();
    let mut ids = draft.evaluated_submission_ids.clone();
    ids.sort();
    assert_eq!(ids, vec![first.id, second.id]);
}
