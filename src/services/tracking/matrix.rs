use std::collections::{HashMap, HashSet};

use crate::models::evaluations::entities::{Evaluation, EvaluationTarget};
use crate::models::events::entities::Team;
use crate::models::phases::entities::{Phase, Task};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::tracking::responses::{
    TeamPhaseStatus, TrackingCell, TrackingColumn, TrackingMatrix, TrackingPhase, TrackingTeam,
};
use crate::services::ordering::{compare_phases, compare_tasks, compare_teams};

// final 评审的覆盖关系
#[derive(Default)]
struct Coverage {
    submissions: HashSet<i64>,
    phases: HashSet<(i64, i64)>,
    projects: HashSet<i64>,
}

impl Coverage {
    fn from_evaluations(evaluations: &[Evaluation]) -> Self {
        let mut coverage = Coverage::default();
        for evaluation in evaluations.iter().filter(|e| e.is_final()) {
            match evaluation.target {
                EvaluationTarget::Submission { submission_id } => {
                    coverage.submissions.insert(submission_id);
                }
                EvaluationTarget::Phase { phase_id, team_id } => {
                    coverage.phases.insert((team_id, phase_id));
                    coverage
                        .submissions
                        .extend(evaluation.evaluated_submission_ids.iter().copied());
                }
                EvaluationTarget::Project { team_id, .. } => {
                    coverage.projects.insert(team_id);
                    coverage
                        .submissions
                        .extend(evaluation.evaluated_submission_ids.iter().copied());
                }
            }
        }
        coverage
    }
}

/// 构建交付跟踪矩阵
///
/// 纯函数：输入相同则输出相同。各团队之间互不影响，
/// 没有任何提交的团队仍会出现，且所有单元格 `submitted = false`。
/// 不属于任何已知阶段的任务会被忽略。
pub fn build_tracking_matrix(
    event_id: i64,
    final_only: bool,
    mut phases: Vec<Phase>,
    mut tasks: Vec<Task>,
    mut teams: Vec<Team>,
    submissions: &[Submission],
    evaluations: &[Evaluation],
) -> TrackingMatrix {
    phases.sort_by(compare_phases);
    tasks.sort_by(compare_tasks);
    teams.sort_by(compare_teams);

    let mut tasks_by_phase: HashMap<i64, Vec<&Task>> = HashMap::new();
    for task in &tasks {
        tasks_by_phase.entry(task.phase_id).or_default().push(task);
    }

    let tracking_phases: Vec<TrackingPhase> = phases
        .iter()
        .map(|phase| TrackingPhase {
            phase_id: phase.id,
            title: phase.title.clone(),
            order_index: phase.order_index,
            is_elimination: phase.is_elimination,
            task_ids: tasks_by_phase
                .get(&phase.id)
                .map(|ts| ts.iter().map(|t| t.id).collect())
                .unwrap_or_default(),
        })
        .collect();

    // 列顺序：先按阶段，再按阶段内任务顺序
    let columns: Vec<TrackingColumn> = phases
        .iter()
        .flat_map(|phase| tasks_by_phase.get(&phase.id).into_iter().flatten())
        .map(|task| TrackingColumn {
            task_id: task.id,
            phase_id: task.phase_id,
            title: task.title.clone(),
            required: task.required,
            due_at: task.due_at,
        })
        .collect();

    // (团队, 任务) -> 参与统计的提交，按提交时间升序
    let mut cell_submissions: HashMap<(i64, i64), Vec<&Submission>> = HashMap::new();
    for submission in submissions
        .iter()
        .filter(|s| !final_only || s.status == SubmissionStatus::Final)
    {
        cell_submissions
            .entry((submission.team_id, submission.task_id))
            .or_default()
            .push(submission);
    }
    for list in cell_submissions.values_mut() {
        list.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at).then(a.id.cmp(&b.id)));
    }

    let coverage = Coverage::from_evaluations(evaluations);

    let mut tracking_teams = Vec::with_capacity(teams.len());
    let mut cells = Vec::with_capacity(teams.len() * columns.len());
    for team in &teams {
        tracking_teams.push(TrackingTeam {
            team_id: team.id,
            name: team.name.clone(),
            phases: phases
                .iter()
                .map(|phase| TeamPhaseStatus {
                    phase_id: phase.id,
                    has_final_evaluation: coverage.phases.contains(&(team.id, phase.id)),
                })
                .collect(),
            has_project_final_evaluation: coverage.projects.contains(&team.id),
        });

        for column in &columns {
            let found = cell_submissions
                .get(&(team.id, column.task_id))
                .map(Vec::as_slice)
                .unwrap_or_default();
            let submitted = !found.is_empty();
            let has_final_evaluation = found
                .iter()
                .any(|s| coverage.submissions.contains(&s.id));
            cells.push(TrackingCell {
                team_id: team.id,
                task_id: column.task_id,
                submitted,
                has_final_evaluation,
                has_pending_evaluation: submitted && !has_final_evaluation,
                latest_submission_id: found.last().map(|s| s.id),
            });
        }
    }

    TrackingMatrix {
        event_id,
        final_only,
        phases: tracking_phases,
        teams: tracking_teams,
        columns,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::{EvaluationSource, EvaluationStatus};
    use crate::models::submissions::entities::SubmissionType;
    use crate::services::ordering::fixtures::{at, phase, task, team};

    fn submission(id: i64, task_id: i64, team_id: i64, status: SubmissionStatus) -> Submission {
        Submission {
            id,
            task_id,
            team_id,
            author_id: 100,
            status,
            submission_type: SubmissionType::Provisional,
            content: None,
            submitted_at: at(id as u32),
            updated_at: at(id as u32),
        }
    }

    fn evaluation(target: EvaluationTarget, ids: Vec<i64>, status: EvaluationStatus) -> Evaluation {
        Evaluation {
            id: 1,
            event_id: 1,
            target,
            evaluated_submission_ids: ids,
            criterion_scores: vec![],
            score: Some(8.0),
            comment: String::new(),
            status,
            source: EvaluationSource::Manual,
            rubric_snapshot: None,
            reviewer_id: 50,
            created_at: at(1),
            updated_at: at(1),
            finalized_at: None,
        }
    }

    // 两个阶段：阶段 1 有任务 11、12，阶段 2 有任务 21
    fn layout() -> (Vec<Phase>, Vec<Task>, Vec<Team>) {
        (
            vec![phase(2, 1), phase(1, 0)],
            vec![task(21, 2, 0, "Demo"), task(12, 1, 1, "Pitch"), task(11, 1, 0, "Idea")],
            vec![team(8, "zeta"), team(7, "Alpha")],
        )
    }

    fn cell(matrix: &TrackingMatrix, team_id: i64, task_id: i64) -> &TrackingCell {
        matrix
            .cells
            .iter()
            .find(|c| c.team_id == team_id && c.task_id == task_id)
            .unwrap()
    }

    #[test]
    fn test_layout_is_ordered() {
        let (phases, tasks, teams) = layout();
        let matrix = build_tracking_matrix(1, false, phases, tasks, teams, &[], &[]);

        let phase_ids: Vec<i64> = matrix.phases.iter().map(|p| p.phase_id).collect();
        assert_eq!(phase_ids, vec![1, 2]);
        assert_eq!(matrix.phases[0].task_ids, vec![11, 12]);
        let column_ids: Vec<i64> = matrix.columns.iter().map(|c| c.task_id).collect();
        assert_eq!(column_ids, vec![11, 12, 21]);
        let team_names: Vec<&str> = matrix.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(team_names, vec!["Alpha", "zeta"]);
        assert_eq!(matrix.cells.len(), 6);
        assert_eq!(matrix.cells[0].team_id, 7);
    }

    #[test]
    fn test_team_without_submissions_has_empty_cells() {
        let (phases, tasks, teams) = layout();
        let subs = vec![submission(1, 11, 7, SubmissionStatus::Draft)];
        let matrix = build_tracking_matrix(1, false, phases, tasks, teams, &subs, &[]);

        for c in matrix.cells.iter().filter(|c| c.team_id == 8) {
            assert!(!c.submitted);
            assert!(!c.has_pending_evaluation);
            assert_eq!(c.latest_submission_id, None);
        }
        let c = cell(&matrix, 7, 11);
        assert!(c.submitted);
        assert!(c.has_pending_evaluation);
        assert_eq!(c.latest_submission_id, Some(1));
    }

    #[test]
    fn test_final_only_filters_draft_submissions() {
        let (phases, tasks, teams) = layout();
        let subs = vec![
            submission(1, 11, 7, SubmissionStatus::Draft),
            submission(2, 12, 7, SubmissionStatus::Final),
        ];
        let matrix = build_tracking_matrix(1, true, phases, tasks, teams, &subs, &[]);
        assert!(!cell(&matrix, 7, 11).submitted);
        assert!(cell(&matrix, 7, 12).submitted);
    }

    #[test]
    fn test_phase_evaluation_covers_listed_submissions() {
        let (phases, tasks, teams) = layout();
        let subs = vec![
            submission(1, 11, 7, SubmissionStatus::Final),
            submission(2, 12, 7, SubmissionStatus::Final),
        ];
        let evals = vec![evaluation(
            EvaluationTarget::Phase {
                phase_id: 1,
                team_id: 7,
            },
            vec![1],
            EvaluationStatus::Final,
        )];
        let matrix = build_tracking_matrix(1, false, phases, tasks, teams, &subs, &evals);

        assert!(cell(&matrix, 7, 11).has_final_evaluation);
        assert!(!cell(&matrix, 7, 11).has_pending_evaluation);
        // 未被列入的提交仍待评审
        assert!(cell(&matrix, 7, 12).has_pending_evaluation);

        let alpha = matrix.teams.iter().find(|t| t.team_id == 7).unwrap();
        assert!(alpha.phases[0].has_final_evaluation);
        assert!(!alpha.phases[1].has_final_evaluation);
        assert!(!alpha.has_project_final_evaluation);
    }

    #[test]
    fn test_drafts_do_not_count() {
        let (phases, tasks, teams) = layout();
        let subs = vec![submission(1, 11, 7, SubmissionStatus::Final)];
        let evals = vec![evaluation(
            EvaluationTarget::Submission { submission_id: 1 },
            vec![],
            EvaluationStatus::Draft,
        )];
        let matrix = build_tracking_matrix(1, false, phases, tasks, teams, &subs, &evals);
        assert!(cell(&matrix, 7, 11).has_pending_evaluation);
    }

    #[test]
    fn test_project_evaluation_sets_event_level_flag() {
        let (phases, tasks, teams) = layout();
        let subs = vec![submission(3, 21, 8, SubmissionStatus::Final)];
        let evals = vec![evaluation(
            EvaluationTarget::Project {
                project_id: 4,
                team_id: 8,
            },
            vec![3],
            EvaluationStatus::Final,
        )];
        let matrix = build_tracking_matrix(1, false, phases, tasks, teams, &subs, &evals);
        let zeta = matrix.teams.iter().find(|t| t.team_id == 8).unwrap();
        assert!(zeta.has_project_final_evaluation);
        assert!(cell(&matrix, 8, 21).has_final_evaluation);
    }

    #[test]
    fn test_build_is_idempotent() {
        let subs = vec![
            submission(2, 11, 7, SubmissionStatus::Draft),
            submission(1, 11, 7, SubmissionStatus::Final),
        ];
        let (phases, tasks, teams) = layout();
        let first = build_tracking_matrix(1, false, phases, tasks, teams, &subs, &[]);
        let (phases, tasks, teams) = layout();
        let second = build_tracking_matrix(1, false, phases, tasks, teams, &subs, &[]);
        assert_eq!(first, second);
        assert_eq!(cell(&first, 7, 11).latest_submission_id, Some(2));
    }
}
