//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub task_id: i64,
    pub team_id: i64,
    pub author_id: i64,
    pub status: String,
    pub submission_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub submitted_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tasks::Entity",
        from = "Column::TaskId",
        to = "super::tasks::Column::Id"
    )]
    Task,
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id"
    )]
    Team,
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::{Submission, SubmissionStatus, SubmissionType};

        Submission {
            id: self.id,
            task_id: self.task_id,
            team_id: self.team_id,
            author_id: self.author_id,
            status: self.status.parse().unwrap_or(SubmissionStatus::Draft),
            submission_type: self
                .submission_type
                .parse()
                .unwrap_or(SubmissionType::Provisional),
            content: self.content,
            submitted_at: super::ts_to_datetime(self.submitted_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
