mod common;

use common::{fixture, phase, reviewer, submit, task};
use rust_hackhub::models::evaluations::entities::{EvaluationSource, EvaluationTarget};
use rust_hackhub::models::tracking::responses::{TrackingCell, TrackingMatrix};
use rust_hackhub::services::evaluations::{DraftInput, EvaluationLifecycle, EvaluationPolicy};
use rust_hackhub::services::tracking::load_tracking_matrix;

fn cell(matrix: &TrackingMatrix, team_id: i64, task_id: i64) -> &TrackingCell {
    matrix
        .cells
        .iter()
        .find(|c| c.team_id == team_id && c.task_id == task_id)
        .unwrap()
}

fn draft(comment: &str) -> DraftInput {
    DraftInput {
        comment: comment.to_string(),
        score: Some(8.0),
        criterion_scores: Vec::new(),
        evaluated_submission_ids: None,
        source: EvaluationSource::Manual,
    }
}

#[tokio::test]
async fn test_matrix_follows_submission_and_evaluation_progress() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Ideation", 0).await;
    let t1 = task(storage, p1.id, "Proposal", 0).await;

    let empty = load_tracking_matrix(storage, f.event.id, false).await.unwrap();
    assert_eq!(empty.columns.len(), 1);
    // 团队按名称排序，大小写不敏感
    let team_order: Vec<i64> = empty.teams.iter().map(|t| t.team_id).collect();
    assert_eq!(team_order, vec![f.alpha, f.beta]);
    assert_eq!(empty.cells.len(), 2);
    assert!(!cell(&empty, f.alpha, t1.id).submitted);

    // 草稿提交后转为 final
    let sub = submit(storage, f.alpha, t1.id).await;
    storage.finalize_submission(sub.id).await.unwrap();

    let submitted = load_tracking_matrix(storage, f.event.id, false).await.unwrap();
    let c = cell(&submitted, f.alpha, t1.id);
    assert!(c.submitted);
    assert!(!c.has_final_evaluation);
    assert!(c.has_pending_evaluation);
    assert_eq!(c.latest_submission_id, Some(sub.id));

    // 草稿评审不算完成
    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let target = EvaluationTarget::Submission {
        submission_id: sub.id,
    };
    let evaluation = lifecycle
        .create_draft(&reviewer(10), &f.event, target, draft("Looks promising"))
        .await
        .unwrap();
    let drafted = load_tracking_matrix(storage, f.event.id, false).await.unwrap();
    assert!(!cell(&drafted, f.alpha, t1.id).has_final_evaluation);

    lifecycle
        .promote_to_final(&reviewer(10), &f.event, evaluation.id)
        .await
        .unwrap();
    let evaluated = load_tracking_matrix(storage, f.event.id, false).await.unwrap();
    let c = cell(&evaluated, f.alpha, t1.id);
    assert!(c.submitted);
    assert!(c.has_final_evaluation);
    assert!(!c.has_pending_evaluation);

    // 没有提交的团队仍然出现在矩阵中
    let idle = cell(&evaluated, f.beta, t1.id);
    assert!(!idle.submitted);
    assert_eq!(idle.latest_submission_id, None);

    // 没有写入时重复构建结果一致
    let again = load_tracking_matrix(storage, f.event.id, false).await.unwrap();
    assert_eq!(again, evaluated);
}

#[tokio::test]
async fn test_final_only_ignores_provisional_submissions() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    submit(storage, f.beta, t1.id).await;

    let all = load_tracking_matrix(storage, f.event.id, false).await.unwrap();
    assert!(cell(&all, f.beta, t1.id).submitted);

    let finals = load_tracking_matrix(storage, f.event.id, true).await.unwrap();
    assert!(finals.final_only);
    assert!(!cell(&finals, f.beta, t1.id).submitted);
}

#[tokio::test]
async fn test_phase_evaluation_marks_team_phase() {
    let f = fixture().await;
    let storage = f.storage.as_ref();
    let p1 = phase(storage, f.event.id, "Build", 0).await;
    let p2 = phase(storage, f.event.id, "Demo", 1).await;
    let t1 = task(storage, p1.id, "Prototype", 0).await;
    task(storage, p2.id, "Video", 0).await;
    let sub = submit(storage, f.alpha, t1.id).await;

    let lifecycle = EvaluationLifecycle::new(f.storage.clone(), EvaluationPolicy::default());
    let evaluation = lifecycle
        .create_draft(
            &reviewer(10),
            &f.event,
            EvaluationTarget::Phase {
                phase_id: p1.id,
                team_id: f.alpha,
            },
            draft("Solid phase"),
        )
        .await
        .unwrap();
    lifecycle
        .promote_to_final(&reviewer(10), &f.event, evaluation.id)
        .await
        .unwrap();

    let matrix = load_tracking_matrix(storage, f.event.id, false).await.unwrap();
    let phase_order: Vec<i64> = matrix.phases.iter().map(|p| p.phase_id).collect();
    assert_eq!(phase_order, vec![p1.id, p2.id]);

    let alpha = matrix.teams.iter().find(|t| t.team_id == f.alpha).unwrap();
    let status: Vec<(i64, bool)> = alpha
        .phases
        .iter()
        .map(|p| (p.phase_id, p.has_final_evaluation))
        .collect();
    assert_eq!(status, vec![(p1.id, true), (p2.id, false)]);
    assert!(!alpha.has_project_final_evaluation);

    // 阶段评审覆盖的提交同样算作已评审
    assert!(cell(&matrix, f.alpha, t1.id).has_final_evaluation);
    assert_eq!(sub.team_id, f.alpha);
}
