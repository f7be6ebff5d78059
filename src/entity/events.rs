//! 活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teams::Entity")]
    Teams,
    #[sea_orm(has_many = "super::phases::Entity")]
    Phases,
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl Related<super::phases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phases.def()
    }
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_event(self) -> crate::models::events::entities::Event {
        use crate::models::events::entities::Event;

        Event {
            id: self.id,
            tenant_id: self.tenant_id,
            name: self.name,
            starts_at: super::opt_ts_to_datetime(self.starts_at),
            ends_at: super::opt_ts_to_datetime(self.ends_at),
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
