//! 评审记录实体
//!
//! 评审对象以 scope + 一组可空外键的形式落库，读出时还原为
//! `EvaluationTarget`。`final_key` 只在 final 状态下写入，
//! 依靠唯一约束保证同一目标至多一条 final 记录。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    pub scope: String,
    pub submission_id: Option<i64>,
    pub phase_id: Option<i64>,
    pub project_id: Option<i64>,
    pub team_id: Option<i64>,
    // JSON 数组
    #[sea_orm(column_type = "Text")]
    pub evaluated_submission_ids: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub criterion_scores: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub status: String,
    pub source: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub rubric_snapshot: Option<String>,
    pub reviewer_id: i64,
    #[sea_orm(unique)]
    pub final_key: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub finalized_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
    #[sea_orm(
        belongs_to = "super::phases::Entity",
        from = "Column::PhaseId",
        to = "super::phases::Column::Id"
    )]
    Phase,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id"
    )]
    Team,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(
        self,
    ) -> crate::errors::Result<crate::models::evaluations::entities::Evaluation> {
        use crate::errors::HackHubError;
        use crate::models::evaluations::entities::{
            Evaluation, EvaluationScope, EvaluationSource, EvaluationStatus, EvaluationTarget,
        };

        let corrupt = |what: String| {
            HackHubError::database_operation(format!("评审记录 {} 数据损坏: {what}", self.id))
        };

        let scope: EvaluationScope = self.scope.parse().map_err(corrupt)?;
        let target = EvaluationTarget::from_parts(
            scope,
            self.submission_id,
            self.phase_id,
            self.project_id,
            self.team_id,
        )
        .map_err(corrupt)?;
        let status: EvaluationStatus = self.status.parse().map_err(corrupt)?;
        let source: EvaluationSource = self.source.parse().map_err(corrupt)?;

        let evaluated_submission_ids: Vec<i64> =
            serde_json::from_str(&self.evaluated_submission_ids)?;
        let criterion_scores = match self.criterion_scores.as_deref() {
            Some(raw) if !raw.is_empty() => serde_json::from_str(raw)?,
            _ => Vec::new(),
        };
        let rubric_snapshot = match self.rubric_snapshot.as_deref() {
            Some(raw) if !raw.is_empty() => Some(serde_json::from_str(raw)?),
            _ => None,
        };

        Ok(Evaluation {
            id: self.id,
            event_id: self.event_id,
            target,
            evaluated_submission_ids,
            criterion_scores,
            score: self.score,
            comment: self.comment,
            status,
            source,
            rubric_snapshot,
            reviewer_id: self.reviewer_id,
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
            finalized_at: super::opt_ts_to_datetime(self.finalized_at),
        })
    }
}
