//! 评分规则解析
//!
//! 任务直接绑定的规则优先，其次是阶段内指向该任务的规则，最后是阶段级规则。
//! 只有同一阶段的规则参与解析。

use crate::errors::{HackHubError, Result};
use crate::models::phases::entities::Task;
use crate::models::rubrics::entities::PhaseRubric;
use crate::services::ordering::compare_phases;
use crate::storage::Storage;

/// 在阶段的规则列表中为任务（或阶段本身）挑选规则
pub fn select_rubric<'a>(task: Option<&Task>, rubrics: &'a [PhaseRubric]) -> Option<&'a PhaseRubric> {
    if let Some(task) = task {
        let bound = task
            .rubric_id
            .and_then(|id| rubrics.iter().find(|r| r.id == id));
        if bound.is_some() {
            return bound;
        }

        let task_scoped = rubrics
            .iter()
            .filter(|r| r.task_id == Some(task.id))
            .min_by_key(|r| r.id);
        if task_scoped.is_some() {
            return task_scoped;
        }
    }

    phase_level(rubrics)
}

fn phase_level(rubrics: &[PhaseRubric]) -> Option<&PhaseRubric> {
    rubrics
        .iter()
        .filter(|r| r.task_id.is_none())
        .min_by_key(|r| r.id)
}

/// getRubricFor(eventId, phaseId, taskId?)
///
/// 阶段或任务不属于该活动时返回 NotFound；没有可用规则时返回 `Ok(None)`。
pub async fn get_rubric_for(
    storage: &dyn Storage,
    event_id: i64,
    phase_id: i64,
    task_id: Option<i64>,
) -> Result<Option<PhaseRubric>> {
    let phase = storage
        .get_phase_by_id(phase_id)
        .await?
        .filter(|p| p.event_id == event_id)
        .ok_or_else(|| HackHubError::not_found(format!("阶段 {phase_id} 不存在")))?;

    let task = match task_id {
        Some(task_id) => Some(
            storage
                .get_task_by_id(task_id)
                .await?
                .filter(|t| t.phase_id == phase.id)
                .ok_or_else(|| HackHubError::not_found(format!("任务 {task_id} 不存在")))?,
        ),
        None => None,
    };

    let rubrics = storage.list_phase_rubrics(phase.id).await?;
    Ok(select_rubric(task.as_ref(), &rubrics).cloned())
}

/// 项目范围使用最后一个配置了阶段级规则的阶段
pub async fn get_project_rubric(storage: &dyn Storage, event_id: i64) -> Result<Option<PhaseRubric>> {
    let mut phases = storage.list_event_phases(event_id).await?;
    phases.sort_by(compare_phases);

    for phase in phases.iter().rev() {
        let rubrics = storage.list_phase_rubrics(phase.id).await?;
        if let Some(rubric) = phase_level(&rubrics) {
            return Ok(Some(rubric.clone()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ordering::fixtures::{at, task};

    fn rubric(id: i64, task_id: Option<i64>) -> PhaseRubric {
        PhaseRubric {
            id,
            phase_id: 1,
            task_id,
            name: format!("Rubric {id}"),
            scale_min: 0.0,
            scale_max: 100.0,
            guidance: None,
            created_by: None,
            criteria: vec![],
            created_at: at(1),
            updated_at: at(1),
        }
    }

    #[test]
    fn test_task_binding_wins() {
        let rubrics = vec![rubric(1, None), rubric(2, Some(10)), rubric(3, None)];
        let mut t = task(10, 1, 0, "Pitch");
        t.rubric_id = Some(3);
        assert_eq!(select_rubric(Some(&t), &rubrics).map(|r| r.id), Some(3));
    }

    #[test]
    fn test_task_scoped_rubric_before_phase_rubric() {
        let rubrics = vec![rubric(1, None), rubric(2, Some(10))];
        let t = task(10, 1, 0, "Pitch");
        assert_eq!(select_rubric(Some(&t), &rubrics).map(|r| r.id), Some(2));
    }

    #[test]
    fn test_falls_back_to_phase_rubric() {
        let rubrics = vec![rubric(4, None), rubric(2, Some(99)), rubric(3, None)];
        let mut t = task(10, 1, 0, "Pitch");
        // 绑定到其他阶段的规则不参与解析
        t.rubric_id = Some(77);
        assert_eq!(select_rubric(Some(&t), &rubrics).map(|r| r.id), Some(3));
        assert_eq!(select_rubric(None, &rubrics).map(|r| r.id), Some(3));
    }

    #[test]
    fn test_no_rubric() {
        let rubrics = vec![rubric(2, Some(99))];
        let t = task(10, 1, 0, "Pitch");
        assert!(select_rubric(Some(&t), &rubrics).is_none());
        assert!(select_rubric(None, &[]).is_none());
    }
}
