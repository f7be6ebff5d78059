//! 阶段、任务与团队的统一排序规则
//!
//! 矩阵、列表与评分规则解析都使用这里的比较函数，保证各视图顺序一致。

use std::cmp::Ordering;

use crate::models::events::entities::Team;
use crate::models::phases::entities::{Phase, Task};

/// 阶段：order_index，再按 id
pub fn compare_phases(a: &Phase, b: &Phase) -> Ordering {
    a.order_index
        .cmp(&b.order_index)
        .then_with(|| a.id.cmp(&b.id))
}

/// 任务：order_index，截止时间（未设置的排在最后），标题，最后按 id
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.order_index
        .cmp(&b.order_index)
        .then_with(|| match (a.due_at, b.due_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

/// 团队：按名称字母序，重名按 id
pub fn compare_teams(a: &Team, b: &Team) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::models::events::entities::Team;
    use crate::models::phases::entities::{DeliveryKind, Phase, Task};

    pub fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    pub fn phase(id: i64, order_index: i32) -> Phase {
        Phase {
            id,
            event_id: 1,
            title: format!("Phase {id}"),
            description: None,
            order_index,
            view_start: None,
            view_end: None,
            is_elimination: false,
            created_at: at(1),
            updated_at: at(1),
        }
    }

    pub fn task(id: i64, phase_id: i64, order_index: i32, title: &str) -> Task {
        Task {
            id,
            phase_id,
            title: title.to_string(),
            description: None,
            delivery_kind: DeliveryKind::Url,
            required: true,
            due_at: None,
            order_index,
            rubric_id: None,
            created_at: at(1),
            updated_at: at(1),
        }
    }

    pub fn team(id: i64, name: &str) -> Team {
        Team {
            id,
            event_id: 1,
            name: name.to_string(),
            created_at: at(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_task_tie_breaks() {
        let mut due_late = task(1, 1, 0, "A");
        due_late.due_at = Some(at(20));
        let mut due_early = task(2, 1, 0, "Z");
        due_early.due_at = Some(at(10));
        let no_due = task(3, 1, 0, "B");
        let first = task(4, 1, -1, "Y");
        let same_title = task(5, 1, 0, "B");

        let mut tasks = vec![no_due, due_late, same_title, due_early, first];
        tasks.sort_by(compare_tasks);

        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3, 5]);
    }

    #[test]
    fn test_phase_and_team_order() {
        let mut phases = vec![phase(3, 2), phase(1, 1), phase(2, 1)];
        phases.sort_by(compare_phases);
        assert_eq!(phases.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let mut teams = vec![team(1, "zeta"), team(2, "Alpha"), team(3, "beta")];
        teams.sort_by(compare_teams);
        assert_eq!(teams.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }
}
