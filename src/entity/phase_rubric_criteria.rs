//! 评分细则实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "phase_rubric_criteria")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub rubric_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub weight: f64,
    #[sea_orm(column_type = "Double", nullable)]
    pub max_score: Option<f64>,
    pub order_index: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::phase_rubrics::Entity",
        from = "Column::RubricId",
        to = "super::phase_rubrics::Column::Id"
    )]
    Rubric,
}

impl Related<super::phase_rubrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rubric.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_criterion(self) -> crate::models::rubrics::entities::RubricCriterion {
        crate::models::rubrics::entities::RubricCriterion {
            id: self.id,
            rubric_id: self.rubric_id,
            title: self.title,
            description: self.description,
            weight: self.weight,
            max_score: self.max_score,
            order_index: self.order_index,
        }
    }
}
