//! 任务实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub phase_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub delivery_kind: String,
    pub required: bool,
    pub due_at: Option<i64>,
    pub order_index: i32,
    // 无外键约束，可能悬空
    pub rubric_id: Option<i64>,
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
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::phases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phase.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_task(self) -> crate::models::phases::entities::Task {
        use crate::models::phases::entities::{DeliveryKind, Task};

        Task {
            id: self.id,
            phase_id: self.phase_id,
            title: self.title,
            description: self.description,
            delivery_kind: self.delivery_kind.parse().unwrap_or(DeliveryKind::None),
            required: self.required,
            due_at: super::opt_ts_to_datetime(self.due_at),
            order_index: self.order_index,
            rubric_id: self.rubric_id,
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
