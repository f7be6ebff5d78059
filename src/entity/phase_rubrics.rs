//! 阶段评分规则实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "phase_rubrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub phase_id: i64,
    // 为空表示阶段级规则
    pub task_id: Option<i64>,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub scale_min: f64,
    #[sea_orm(column_type = "Double")]
    pub scale_max: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub guidance: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::phases::Entity",
        from = "Column::PhaseId",
        to = "super::phases::Column::Id"
    )]
    Phase,
    #[sea_orm(
        belongs_to = "super::tasks::Entity",
        from = "Column::TaskId",
        to = "super::tasks::Column::Id"
    )]
    Task,
    #[sea_orm(has_many = "super::phase_rubric_criteria::Entity")]
    Criteria,
}

impl Related<super::phases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phase.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl Related<super::phase_rubric_criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criteria.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_rubric(
        self,
        criteria: Vec<super::phase_rubric_criteria::Model>,
    ) -> crate::models::rubrics::entities::PhaseRubric {
        use crate::models::rubrics::entities::PhaseRubric;

        let mut criteria: Vec<_> = criteria
            .into_iter()
            .map(|c| c.into_criterion())
            .collect();
        criteria.sort_by_key(|c| c.order_index);

        PhaseRubric {
            id: self.id,
            phase_id: self.phase_id,
            task_id: self.task_id,
            name: self.name,
            scale_min: self.scale_min,
            scale_max: self.scale_max,
            guidance: self.guidance,
            created_by: self.created_by,
            criteria,
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
