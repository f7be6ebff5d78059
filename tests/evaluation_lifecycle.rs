mod common;

use std::sync::Arc;

use common::{actor, fixture, phase, phase_rubric, reviewer, submit, task};
use rust_hackhub::entity::{events, phases, projects, submissions, teams};
use rust_hackhub::errors::HackHubError;
use rust_hackhub::models::actors::entities::ActorRole;
use rust_hackhub::models::evaluations::entities::{
    CriterionScore, EvaluationSource, EvaluationStatus, EvaluationTarget,
};
use rust_hackhub::models::evaluations::requests::{EvaluationListQuery, UpdateEvaluationRequest};
use rust_hackhub::services::evaluations::{DraftInput, EvaluationLifecycle, EvaluationPolicy};
use rust_hackhub::services::notifications::EvaluationNotifier;
use rust_hackhub::services::tracking::load_tracking_matrix;
use sea_orm::EntityTrait;

fn manual(comment: &str, score: Option<f64>) -> DraftInput {
    DraftInput {
        comment: comment.to_string(),
        score,
        criterion_scores: Vec::new(),
        evaluated_submission_ids: None,
        source: EvaluationSource::Manual,
    }
}

#[tokio::test]
async fn test_draft_then_promote_preserves_comment_and_score() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;

    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let target = EvaluationTarget::Submission { submission_id: sub.id };
    let draft = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("Good work", Some(7.0)))
        .await
        .unwrap();
    assert_eq!(draft.status, EvaluationStatus::Draft);
    assert_eq!(draft.evaluated_submission_ids, vec![sub.id]);
    assert!(draft.rubric_snapshot.is_none());

    let promoted = lifecycle
        .promote_to_final(&reviewer(10), &f.event, draft.id)
        .await
        .unwrap();
    assert_eq!(promoted.status, EvaluationStatus::Final);
    assert_eq!(promoted.comment, "Good work");
    assert_eq!(promoted.score, Some(7.0));
    assert!(promoted.finalized_at.is_some());
}

#[tokio::test]
async fn test_score_outside_range_is_rejected() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let target = EvaluationTarget::Submission { submission_id: sub.id };

    // 未配置评分规则时使用 [0, 10]
    let err = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("", Some(11.0)))
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Validation(_)));

    // 配置 [0, 100] 后 85 合法，150 不合法
    phase_rubric(storage, p1.id).await;
    let ok = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("", Some(85.0)))
        .await
        .unwrap();
    assert_eq!(ok.rubric_snapshot.as_ref().map(|s| s.scale_max), Some(100.0));
    let err = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("", Some(150.0)))
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Validation(_)));

    // 校验失败的请求不落库
    let list = storage
        .list_evaluations(EvaluationListQuery {
            event_id: f.event.id,
            page: 1,
            size: 50,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.items.len(), 1);
}

#[tokio::test]
async fn test_second_final_for_same_submission_conflicts() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let target = EvaluationTarget::Submission { submission_id: sub.id };

    let first = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("First", Some(6.0)))
        .await
        .unwrap();
    let second = lifecycle
        .create_draft(&reviewer(11), &f.event, target, manual("Second", Some(9.0)))
        .await
        .unwrap();
    lifecycle
        .promote_to_final(&reviewer(10), &f.event, first.id)
        .await
        .unwrap();

    let err = lifecycle
        .promote_to_final(&reviewer(11), &f.event, second.id)
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Conflict(_)));

    // 失败的一方保持草稿，原 final 不被覆盖
    let loser = lifecycle.get(&f.event, second.id).await.unwrap();
    assert_eq!(loser.status, EvaluationStatus::Draft);
    let winner = lifecycle.get(&f.event, first.id).await.unwrap();
    assert_eq!(winner.comment, "First");
}

#[tokio::test]
async fn test_per_reviewer_policy_allows_one_final_each() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let policy = EvaluationPolicy {
        final_per_reviewer: true,
        ..EvaluationPolicy::default()
    };
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), policy);
    let target = EvaluationTarget::Submission { submission_id: sub.id };

    for reviewer_id in [10, 11] {
        let draft = lifecycle
            .create_draft(&reviewer(reviewer_id), &f.event, target, manual("ok", Some(5.0)))
            .await
            .unwrap();
        lifecycle
            .promote_to_final(&reviewer(reviewer_id), &f.event, draft.id)
            .await
            .unwrap();
    }

    let again = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("again", Some(5.0)))
        .await
        .unwrap();
    let err = lifecycle
        .promote_to_final(&reviewer(10), &f.event, again.id)
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Conflict(_)));
}

#[tokio::test]
async fn test_concurrent_promotion_has_single_winner() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = Arc::new(EvaluationLifecycle::new(
        f.storage.clone(),
        EvaluationPolicy::default(),
    ));
    let target = EvaluationTarget::Submission { submission_id: sub.id };

    let a = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("A", Some(4.0)))
        .await
        .unwrap();
    let b = lifecycle
        .create_draft(&reviewer(11), &f.event, target, manual("B", Some(8.0)))
        .await
        .unwrap();

    let reviewer_a = reviewer(10);
    let reviewer_b = reviewer(11);
    let (ra, rb) = tokio::join!(
        lifecycle.promote_to_final(&reviewer_a, &f.event, a.id),
        lifecycle.promote_to_final(&reviewer_b, &f.event, b.id),
    );

    let results = [ra, rb];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(HackHubError::Conflict(_))))
    );

    let finals = storage
        .list_event_final_evaluations(f.event.id)
        .await
        .unwrap();
    assert_eq!(finals.len(), 1);
}

#[tokio::test]
async fn test_final_is_terminal() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let target = EvaluationTarget::Submission { submission_id: sub.id };

    let draft = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("Fine", Some(6.0)))
        .await
        .unwrap();
    lifecycle
        .promote_to_final(&reviewer(10), &f.event, draft.id)
        .await
        .unwrap();

    let patch = UpdateEvaluationRequest {
        comment: Some("Changed".to_string()),
        ..Default::default()
    };
    let err = lifecycle
        .update(&reviewer(10), &f.event, draft.id, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Conflict(_)));

    let err = lifecycle
        .promote_to_final(&reviewer(10), &f.event, draft.id)
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Conflict(_)));
}

#[tokio::test]
async fn test_update_with_finalize_applies_patch() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let target = EvaluationTarget::Submission { submission_id: sub.id };

    let draft = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("Draft", Some(3.0)))
        .await
        .unwrap();

    let empty = lifecycle
        .update(&reviewer(10), &f.event, draft.id, UpdateEvaluationRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(empty, HackHubError::Validation(_)));

    let patch = UpdateEvaluationRequest {
        comment: Some("Polished".to_string()),
        finalize: true,
        ..Default::default()
    };
    let finalized = lifecycle
        .update(&reviewer(10), &f.event, draft.id, patch)
        .await
        .unwrap();
    assert_eq!(finalized.status, EvaluationStatus::Final);
    assert_eq!(finalized.comment, "Polished");
    assert_eq!(finalized.score, Some(3.0));
}

#[tokio::test]
async fn test_only_owner_or_organizer_can_modify() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let target = EvaluationTarget::Submission { submission_id: sub.id };

    let participant = actor(30, ActorRole::Participant);
    let err = lifecycle
        .create_draft(&participant, &f.event, target, manual("", Some(1.0)))
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Authorization(_)));

    let draft = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("", Some(1.0)))
        .await
        .unwrap();
    let err = lifecycle
        .promote_to_final(&reviewer(11), &f.event, draft.id)
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Authorization(_)));

    let organizer = actor(40, ActorRole::Organizer);
    lifecycle
        .promote_to_final(&organizer, &f.event, draft.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_phase_scope_selection() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let t2 = task(storage, p1.id, "Pitch", 1).await;

    let t1_first = submit(storage, f.alpha, t1.id).await;
    let t1_second = submit(storage, f.alpha, t1.id).await;
    storage.finalize_submission(t1_first.id).await.unwrap();
    let t2_only = submit(storage, f.alpha, t2.id).await;
    let other_team = submit(storage, f.beta, t1.id).await;

    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let target = EvaluationTarget::Phase {
        phase_id: p1.id,
        team_id: f.alpha,
    };

    // 默认：任务 1 取 final 提交，任务 2 取最近一次提交
    let draft = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("Phase", Some(8.0)))
        .await
        .unwrap();
    let mut selected = draft.evaluated_submission_ids.clone();
    selected.sort();
    assert_eq!(selected, vec![t1_first.id, t2_only.id]);
    assert!(!selected.contains(&t1_second.id));

    // 其他团队的提交不能入选
    let mut input = manual("Phase", Some(8.0));
    input.evaluated_submission_ids = Some(vec![t1_second.id, other_team.id]);
    let err = lifecycle
        .create_draft(&reviewer(10), &f.event, target, input)
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Validation(_)));

    // 显式子集保持给定顺序
    let mut input = manual("Phase", Some(8.0));
    input.evaluated_submission_ids = Some(vec![t2_only.id, t1_second.id]);
    let explicit = lifecycle
        .create_draft(&reviewer(10), &f.event, target, input)
        .await
        .unwrap();
    assert_eq!(explicit.evaluated_submission_ids, vec![t2_only.id, t1_second.id]);
}

#[tokio::test]
async fn test_project_scope_requires_owning_team() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    task(storage, p1.id, "Prototype", 0).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());

    let err = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Project {
                project_id: f.project,
                team_id: f.beta,
            },
            manual("", Some(5.0)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Conflict(_)));

    let ok = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Project {
                project_id: f.project,
                team_id: f.alpha,
            },
            manual("Whole project", Some(5.0)),
        )
        .await
        .unwrap();
    assert!(ok.evaluated_submission_ids.is_empty());
}

#[tokio::test]
async fn test_unknown_targets_are_not_found() {
    let f = fixture().await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());

    let err = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Submission { submission_id: 4040 },
            manual("", None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::NotFound(_)));

    let err = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Phase {
                phase_id: 4040,
                team_id: f.alpha,
            },
            manual("", None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::NotFound(_)));
}

#[tokio::test]
async fn test_weighted_score_is_derived_from_criteria() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let rubric = phase_rubric(storage, p1.id).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());

    let impact = rubric.criteria[0].id;
    let execution = rubric.criteria[1].id;
    let input = DraftInput {
        comment: "Scored by criteria".to_string(),
        score: None,
        criterion_scores: vec![
            CriterionScore {
                criterion_id: impact,
                score: 8.0,
            },
            CriterionScore {
                criterion_id: execution,
                score: 5.0,
            },
        ],
        evaluated_submission_ids: None,
        source: EvaluationSource::Manual,
    };
    let draft = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Submission { submission_id: sub.id },
            input,
        )
        .await
        .unwrap();
    // 100 * (2 * 0.8 + 1 * 0.5) / 3
    assert_eq!(draft.score, Some(70.0));

    // 细则得分变更后重新推导
    let patch = UpdateEvaluationRequest {
        criterion_scores: Some(vec![CriterionScore {
            criterion_id: impact,
            score: 10.0,
        }]),
        ..Default::default()
    };
    let updated = lifecycle
        .update(&reviewer(10), &f.event, draft.id, patch)
        .await
        .unwrap();
    assert_eq!(updated.score, Some(100.0));

    // 超出细则满分
    let patch = UpdateEvaluationRequest {
        criterion_scores: Some(vec![CriterionScore {
            criterion_id: execution,
            score: 11.0,
        }]),
        ..Default::default()
    };
    let err = lifecycle
        .update(&reviewer(10), &f.event, draft.id, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, HackHubError::Validation(_)));
}

#[tokio::test]
async fn test_snapshot_is_frozen_at_write_time() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let rubric = phase_rubric(storage, p1.id).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());

    let draft = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Submission { submission_id: sub.id },
            manual("", Some(90.0)),
        )
        .await
        .unwrap();

    storage
        .update_rubric(
            rubric.id,
            rust_hackhub::models::rubrics::requests::UpdateRubricRequest {
                scale_max: Some(50.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reloaded = lifecycle.get(&f.event, draft.id).await.unwrap();
    assert_eq!(reloaded.rubric_snapshot.map(|s| s.scale_max), Some(100.0));
}

#[tokio::test]
async fn test_finalization_is_broadcast() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;

    let notifier = EvaluationNotifier::new(8);
    let mut receiver = notifier.subscribe();
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default())
        .with_notifier(Some(notifier));

    let draft = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Submission { submission_id: sub.id },
            manual("", Some(5.0)),
        )
        .await
        .unwrap();
    // 草稿不广播
    assert!(receiver.try_recv().is_err());

    lifecycle
        .promote_to_final(&reviewer(10), &f.event, draft.id)
        .await
        .unwrap();
    let message = receiver.try_recv().unwrap();
    assert_eq!(message.evaluation_id, draft.id);
    assert_eq!(message.team_id, Some(f.alpha));
    assert_eq!(message.submission_id, Some(sub.id));
}

#[tokio::test]
async fn test_current_only_keeps_latest_draft() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let target = EvaluationTarget::Submission { submission_id: sub.id };

    lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("v1", Some(5.0)))
        .await
        .unwrap();
    let latest = lifecycle
        .create_draft(&reviewer(10), &f.event, target, manual("v2", Some(6.0)))
        .await
        .unwrap();

    let query = |current_only| EvaluationListQuery {
        event_id: f.event.id,
        page: 1,
        size: 50,
        current_only,
        ..Default::default()
    };
    let all = storage.list_evaluations(query(false)).await.unwrap();
    assert_eq!(all.items.len(), 2);

    let current = storage.list_evaluations(query(true)).await.unwrap();
    assert_eq!(current.items.len(), 1);
    assert_eq!(current.items[0].id, latest.id);
}

#[tokio::test]
async fn test_deleting_submission_removes_its_evaluations() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());

    let draft = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Submission { submission_id: sub.id },
            manual("Ship it", Some(9.0)),
        )
        .await
        .unwrap();
    lifecycle
        .promote_to_final(&reviewer(10), &f.event, draft.id)
        .await
        .unwrap();

    let before = load_tracking_matrix(storage, f.event.id, false).await.unwrap();
    assert!(
        before
            .cells
            .iter()
            .any(|c| c.task_id == t1.id && c.team_id == f.alpha && c.has_final_evaluation)
    );

    submissions::Entity::delete_by_id(sub.id)
        .exec(&f.db)
        .await
        .unwrap();

    assert!(storage.get_evaluation_by_id(draft.id).await.unwrap().is_none());
    let after = load_tracking_matrix(storage, f.event.id, false).await.unwrap();
    let cell = after
        .cells
        .iter()
        .find(|c| c.task_id == t1.id && c.team_id == f.alpha)
        .unwrap();
    assert!(!cell.submitted);
    assert!(!cell.has_final_evaluation);
}

#[tokio::test]
async fn test_deleting_aggregate_targets_removes_evaluations() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let p2 = phase(storage, f.event.id, "Demo", 1).await;
    task(storage, p1.id, "Prototype", 0).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());

    let on_phase = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Phase {
                phase_id: p2.id,
                team_id: f.beta,
            },
            manual("Phase", Some(4.0)),
        )
        .await
        .unwrap();
    let on_project = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Project {
                project_id: f.project,
                team_id: f.alpha,
            },
            manual("Project", Some(6.0)),
        )
        .await
        .unwrap();
    let on_team = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Phase {
                phase_id: p1.id,
                team_id: f.alpha,
            },
            manual("Team", Some(5.0)),
        )
        .await
        .unwrap();

    phases::Entity::delete_by_id(p2.id).exec(&f.db).await.unwrap();
    assert!(storage.get_evaluation_by_id(on_phase.id).await.unwrap().is_none());
    assert!(storage.get_evaluation_by_id(on_project.id).await.unwrap().is_some());

    projects::Entity::delete_by_id(f.project)
        .exec(&f.db)
        .await
        .unwrap();
    assert!(storage.get_evaluation_by_id(on_project.id).await.unwrap().is_none());
    assert!(storage.get_evaluation_by_id(on_team.id).await.unwrap().is_some());

    teams::Entity::delete_by_id(f.alpha).exec(&f.db).await.unwrap();
    assert!(storage.get_evaluation_by_id(on_team.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_event_removes_evaluations() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    let sub = submit(storage, f.beta, t1.id).await;
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());

    let draft = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Submission { submission_id: sub.id },
            manual("", Some(2.0)),
        )
        .await
        .unwrap();

    events::Entity::delete_by_id(f.event.id)
        .exec(&f.db)
        .await
        .unwrap();
    assert!(storage.get_evaluation_by_id(draft.id).await.unwrap().is_none());
}
