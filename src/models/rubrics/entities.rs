use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 未指定区间时的默认值
pub const DEFAULT_SCALE_MIN: f64 = 0.0;
pub const DEFAULT_SCALE_MAX: f64 = 100.0;

/// 评分细则
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct RubricCriterion {
    pub id: i64,
    pub rubric_id: i64,
    pub title: String,
    pub description: Option<String>,
    // 权重，必须为正数
    pub weight: f64,
    // 单项满分，缺省时使用规则量程
    pub max_score: Option<f64>,
    pub order_index: i32,
}

/// 阶段评分规则，可选绑定到某个具体任务
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct PhaseRubric {
    pub id: i64,
    pub phase_id: i64,
    pub task_id: Option<i64>,
    pub name: String,
    pub scale_min: f64,
    pub scale_max: f64,
    // 评审指引
    pub guidance: Option<String>,
    pub created_by: Option<i64>,
    // 按 order_index 排序
    pub criteria: Vec<RubricCriterion>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 评审时刻的细则副本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct CriterionSnapshot {
    pub criterion_id: i64,
    pub title: String,
    pub weight: f64,
    pub max_score: Option<f64>,
    pub order_index: i32,
}

/// 评审时刻的评分规则副本
///
/// 写入评审记录后不再变化，之后对规则或细则的修改与删除都不会影响历史分数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct RubricSnapshot {
    pub rubric_id: i64,
    pub name: String,
    pub scale_min: f64,
    pub scale_max: f64,
    pub guidance: Option<String>,
    pub criteria: Vec<CriterionSnapshot>,
    pub taken_at: chrono::DateTime<chrono::Utc>,
}

impl PhaseRubric {
    pub fn snapshot(&self) -> RubricSnapshot {
        let mut criteria: Vec<CriterionSnapshot> = self
            .criteria
            .iter()
            .map(|c| CriterionSnapshot {
                criterion_id: c.id,
                title: c.title.clone(),
                weight: c.weight,
                max_score: c.max_score,
                order_index: c.order_index,
            })
            .collect();
        criteria.sort_by_key(|c| c.order_index);

        RubricSnapshot {
            rubric_id: self.id,
            name: self.name.clone(),
            scale_min: self.scale_min,
            scale_max: self.scale_max,
            guidance: self.guidance.clone(),
            criteria,
            taken_at: chrono::Utc::now(),
        }
    }
}

impl RubricSnapshot {
    pub fn criterion(&self, criterion_id: i64) -> Option<&CriterionSnapshot> {
        self.criteria.iter().find(|c| c.criterion_id == criterion_id)
    }
}

impl CriterionSnapshot {
    /// 单项分数的取值区间
    pub fn bounds(&self, scale_min: f64, scale_max: f64) -> (f64, f64) {
        match self.max_score {
            Some(max) => (0.0, max),
            None => (scale_min, scale_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rubric() -> PhaseRubric {
        let now = chrono::Utc::now();
        PhaseRubric {
            id: 3,
            phase_id: 1,
            task_id: None,
            name: "Demo day".into(),
            scale_min: 0.0,
            scale_max: 100.0,
            guidance: None,
            created_by: Some(9),
            criteria: vec![
                RubricCriterion {
                    id: 11,
                    rubric_id: 3,
                    title: "Impact".into(),
                    description: None,
                    weight: 2.0,
                    max_score: None,
                    order_index: 2,
                },
                RubricCriterion {
                    id: 10,
                    rubric_id: 3,
                    title: "Novelty".into(),
                    description: None,
                    weight: 1.0,
                    max_score: Some(5.0),
                    order_index: 1,
                },
            ],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_snapshot_orders_criteria() {
        let snap = rubric().snapshot();
        assert_eq!(snap.rubric_id, 3);
        let ids: Vec<i64> = snap.criteria.iter().map(|c| c.criterion_id).collect();
        assert_eq!(ids, vec![10, 11]);
    }

    #[test]
    fn test_snapshot_is_detached_from_rubric() {
        let mut r = rubric();
        let snap = r.snapshot();
        r.criteria.clear();
        r.scale_max = 10.0;
        assert_eq!(snap.criteria.len(), 2);
        assert_eq!(snap.scale_max, 100.0);
    }

    #[test]
    fn test_criterion_bounds() {
        let snap = rubric().snapshot();
        assert_eq!(snap.criterion(10).unwrap().bounds(0.0, 100.0), (0.0, 5.0));
        assert_eq!(snap.criterion(11).unwrap().bounds(0.0, 100.0), (0.0, 100.0));
        assert!(snap.criterion(99).is_none());
    }
}
