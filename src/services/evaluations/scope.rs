//! 评审目标解析
//!
//! 校验引用的实体存在且属于同一活动，并为阶段、项目范围计算默认的候选提交集合。

use std::collections::{BTreeMap, HashSet};

use crate::errors::{HackHubError, Result};
use crate::models::evaluations::entities::EvaluationTarget;
use crate::models::events::entities::Event;
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::storage::Storage;

/// 解析后的评审目标
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub target: EvaluationTarget,
    pub team_id: i64,
    /// 评分规则所在阶段；项目范围为 None
    pub phase_id: Option<i64>,
    /// 仅提交范围
    pub task_id: Option<i64>,
    /// 团队在目标范围内的全部提交
    pub eligible: Vec<Submission>,
    /// 默认候选集（建议值，调用方可以给出子集）
    pub default_selection: Vec<i64>,
}

impl ResolvedTarget {
    /// 按 id 取出候选提交，保持给定顺序
    pub fn submissions_for(&self, ids: &[i64]) -> Vec<Submission> {
        ids.iter()
            .filter_map(|id| self.eligible.iter().find(|s| s.id == *id))
            .cloned()
            .collect()
    }
}

fn not_found(kind: &str, id: i64) -> HackHubError {
    HackHubError::not_found(format!("{kind} {id} 不存在"))
}

/// resolveTarget(scope, refs)
pub async fn resolve_target(
    storage: &dyn Storage,
    event: &Event,
    target: EvaluationTarget,
) -> Result<ResolvedTarget> {
    match target {
        EvaluationTarget::Submission { submission_id } => {
            let submission = storage
                .get_submission_by_id(submission_id)
                .await?
                .ok_or_else(|| not_found("提交", submission_id))?;
            let task = storage
                .get_task_by_id(submission.task_id)
                .await?
                .ok_or_else(|| not_found("任务", submission.task_id))?;
            // 提交所在阶段必须属于当前活动
            storage
                .get_phase_by_id(task.phase_id)
                .await?
                .filter(|p| p.event_id == event.id)
                .ok_or_else(|| not_found("提交", submission_id))?;

            Ok(ResolvedTarget {
                target,
                team_id: submission.team_id,
                phase_id: Some(task.phase_id),
                task_id: Some(task.id),
                default_selection: vec![submission.id],
                eligible: vec![submission],
            })
        }
        EvaluationTarget::Phase { phase_id, team_id } => {
            let phase = storage
                .get_phase_by_id(phase_id)
                .await?
                .filter(|p| p.event_id == event.id)
                .ok_or_else(|| not_found("阶段", phase_id))?;
            ensure_team_in_event(storage, event, team_id).await?;

            let task_ids: Vec<i64> = storage
                .list_phase_tasks(phase.id)
                .await?
                .iter()
                .map(|t| t.id)
                .collect();
            let eligible = storage.list_team_submissions(team_id, &task_ids).await?;

            Ok(ResolvedTarget {
                target,
                team_id,
                phase_id: Some(phase.id),
                task_id: None,
                default_selection: default_submission_selection(&eligible),
                eligible,
            })
        }
        EvaluationTarget::Project {
            project_id,
            team_id,
        } => {
            let project = storage
                .get_project_by_id(project_id)
                .await?
                .filter(|p| p.event_id == event.id)
                .ok_or_else(|| not_found("项目", project_id))?;
            ensure_team_in_event(storage, event, team_id).await?;
            if project.team_id != team_id {
                return Err(HackHubError::conflict(format!(
                    "项目 {project_id} 不属于团队 {team_id}"
                )));
            }

            let task_ids: Vec<i64> = storage
                .list_event_tasks(event.id)
                .await?
                .iter()
                .map(|t| t.id)
                .collect();
            let eligible = storage.list_team_submissions(team_id, &task_ids).await?;

            Ok(ResolvedTarget {
                target,
                team_id,
                phase_id: None,
                task_id: None,
                default_selection: default_submission_selection(&eligible),
                eligible,
            })
        }
    }
}

async fn ensure_team_in_event(storage: &dyn Storage, event: &Event, team_id: i64) -> Result<()> {
    storage
        .get_team_by_id(team_id)
        .await?
        .filter(|t| t.event_id == event.id)
        .map(|_| ())
        .ok_or_else(|| not_found("团队", team_id))
}

/// 默认候选集：每个任务取 final 状态的提交；没有 final 时取最近一次提交
///
/// 结果按提交时间排序。
pub fn default_submission_selection(submissions: &[Submission]) -> Vec<i64> {
    let mut by_task: BTreeMap<i64, Vec<&Submission>> = BTreeMap::new();
    for submission in submissions {
        by_task.entry(submission.task_id).or_default().push(submission);
    }

    let mut selected: Vec<&Submission> = Vec::new();
    for subs in by_task.values() {
        let finals: Vec<&Submission> = subs
            .iter()
            .copied()
            .filter(|s| s.status == SubmissionStatus::Final)
            .collect();
        if finals.is_empty() {
            if let Some(latest) = subs.iter().copied().max_by_key(|s| (s.submitted_at, s.id)) {
                selected.push(latest);
            }
        } else {
            selected.extend(finals);
        }
    }

    selected.sort_by_key(|s| (s.submitted_at, s.id));
    selected.iter().map(|s| s.id).collect()
}

/// 校验调用方给出的子集，去重并保持顺序
pub fn validate_selection(requested: &[i64], eligible: &[Submission]) -> Result<Vec<i64>> {
    let allowed: HashSet<i64> = eligible.iter().map(|s| s.id).collect();
    let mut seen = HashSet::new();
    let mut selection = Vec::with_capacity(requested.len());

    for id in requested {
        if !allowed.contains(id) {
            return Err(HackHubError::validation(format!(
                "提交 {id} 不属于该团队在此范围内的交付"
            )));
        }
        if seen.insert(*id) {
            selection.push(*id);
        }
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::SubmissionType;
    use crate::services::ordering::fixtures::at;

    fn submission(id: i64, task_id: i64, status: SubmissionStatus, day: u32) -> Submission {
        Submission {
            id,
            task_id,
            team_id: 1,
            author_id: 1,
            status,
            submission_type: SubmissionType::Provisional,
            content: None,
            submitted_at: at(day),
            updated_at: at(day),
        }
    }

    #[test]
    fn test_default_prefers_finals_per_task() {
        let subs = vec![
            submission(1, 10, SubmissionStatus::Draft, 1),
            submission(2, 10, SubmissionStatus::Final, 2),
            submission(3, 10, SubmissionStatus::Draft, 3),
            submission(4, 20, SubmissionStatus::Draft, 4),
            submission(5, 20, SubmissionStatus::Draft, 5),
        ];
        // 任务 10 有 final，只取 final；任务 20 没有，取最近一次
        assert_eq!(default_submission_selection(&subs), vec![2, 5]);
    }

    #[test]
    fn test_default_keeps_every_final() {
        let subs = vec![
            submission(7, 10, SubmissionStatus::Final, 6),
            submission(6, 10, SubmissionStatus::Final, 2),
        ];
        assert_eq!(default_submission_selection(&subs), vec![6, 7]);
        assert!(default_submission_selection(&[]).is_empty());
    }

    #[test]
    fn test_selection_must_be_subset() {
        let eligible = vec![
            submission(1, 10, SubmissionStatus::Draft, 1),
            submission(2, 10, SubmissionStatus::Final, 2),
        ];
        assert_eq!(validate_selection(&[2, 1, 2], &eligible).unwrap(), vec![2, 1]);
        assert!(matches!(
            validate_selection(&[3], &eligible),
            Err(HackHubError::Validation(_))
        ));
    }
}
