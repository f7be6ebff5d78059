//! 阶段实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "phases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub order_index: i32,
    pub view_start: Option<i64>,
    pub view_end: Option<i64>,
    pub is_elimination: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
    #[sea_orm(has_many = "super::phase_rubrics::Entity")]
    Rubrics,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::phase_rubrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rubrics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_phase(self) -> crate::models::phases::entities::Phase {
        crate::models::phases::entities::Phase {
            id: self.id,
            event_id: self.event_id,
            title: self.title,
            description: self.description,
            order_index: self.order_index,
            view_start: super::opt_ts_to_datetime(self.view_start),
            view_end: super::opt_ts_to_datetime(self.view_end),
            is_elimination: self.is_elimination,
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
