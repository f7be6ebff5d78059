//! 评审记录存储操作
//!
//! 草稿的修改与转 final 都以 `status = 'draft'` 作为更新条件，
//! 并发下只有一个写入者能命中；final 唯一键由数据库唯一约束兜底。

use std::collections::HashSet;

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::errors::{HackHubError, Result};
use crate::models::{
    PaginationInfo,
    evaluations::{
        entities::{Evaluation, EvaluationStatus},
        requests::{EvaluationChanges, EvaluationListQuery, NewEvaluation},
        responses::EvaluationListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_evaluation_impl(&self, new: NewEvaluation) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();
        let target = new.target;

        let rubric_snapshot = match &new.rubric_snapshot {
            Some(snapshot) => Some(serde_json::to_string(snapshot)?),
            None => None,
        };

        let model = ActiveModel {
            event_id: Set(new.event_id),
            scope: Set(target.scope().to_string()),
            submission_id: Set(target.submission_id()),
            phase_id: Set(target.phase_id()),
            project_id: Set(target.project_id()),
            team_id: Set(target.team_id()),
            evaluated_submission_ids: Set(serde_json::to_string(&new.evaluated_submission_ids)?),
            criterion_scores: Set(Some(serde_json::to_string(&new.criterion_scores)?)),
            score: Set(new.score),
            comment: Set(new.comment),
            status: Set(EvaluationStatus::Draft.to_string()),
            source: Set(new.source.to_string()),
            rubric_snapshot: Set(rubric_snapshot),
            reviewer_id: Set(new.reviewer_id),
            final_key: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            finalized_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("创建评审失败: {e}")))?;

        result.into_evaluation()
    }

    pub async fn get_evaluation_by_id_impl(&self, evaluation_id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(evaluation_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询评审失败: {e}")))?;

        result.map(|m| m.into_evaluation()).transpose()
    }

    /// 仅当记录仍为草稿时写入
    pub async fn update_evaluation_draft_impl(
        &self,
        evaluation_id: i64,
        changes: EvaluationChanges,
    ) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();

        let result = Evaluations::update_many()
            .col_expr(Column::Comment, Expr::value(changes.comment))
            .col_expr(Column::Score, Expr::value(changes.score))
            .col_expr(
                Column::CriterionScores,
                Expr::value(Some(serde_json::to_string(&changes.criterion_scores)?)),
            )
            .col_expr(
                Column::EvaluatedSubmissionIds,
                Expr::value(serde_json::to_string(&changes.evaluated_submission_ids)?),
            )
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(evaluation_id))
            .filter(Column::Status.eq(EvaluationStatus::Draft.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("更新评审失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(self.explain_missed_draft(&self.db, evaluation_id).await);
        }

        self.get_evaluation_by_id_impl(evaluation_id)
            .await?
            .ok_or_else(|| HackHubError::not_found(format!("评审 {evaluation_id} 不存在")))
    }

    /// 草稿转为 final（单事务，比较并交换）
    pub async fn finalize_evaluation_impl(
        &self,
        evaluation_id: i64,
        changes: EvaluationChanges,
        final_key: String,
    ) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| HackHubError::database_operation(format!("开启事务失败: {e}")))?;

        let holder = Evaluations::find()
            .filter(Column::FinalKey.eq(final_key.as_str()))
            .one(&txn)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询 final 评审失败: {e}")))?;

        if let Some(holder) = holder.filter(|h| h.id != evaluation_id) {
            return Err(HackHubError::conflict(format!(
                "目标已存在 final 评审 (id={})，不能重复转为 final",
                holder.id
            )));
        }

        let result = Evaluations::update_many()
            .col_expr(Column::Comment, Expr::value(changes.comment))
            .col_expr(Column::Score, Expr::value(changes.score))
            .col_expr(
                Column::CriterionScores,
                Expr::value(Some(serde_json::to_string(&changes.criterion_scores)?)),
            )
            .col_expr(
                Column::EvaluatedSubmissionIds,
                Expr::value(serde_json::to_string(&changes.evaluated_submission_ids)?),
            )
            .col_expr(
                Column::Status,
                Expr::value(EvaluationStatus::Final.to_string()),
            )
            .col_expr(Column::FinalKey, Expr::value(Some(final_key)))
            .col_expr(Column::FinalizedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(evaluation_id))
            .filter(Column::Status.eq(EvaluationStatus::Draft.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    HackHubError::conflict("目标已存在 final 评审，不能重复转为 final")
                } else {
                    HackHubError::database_operation(format!("评审转为 final 失败: {e}"))
                }
            })?;

        if result.rows_affected == 0 {
            return Err(self.explain_missed_draft(&txn, evaluation_id).await);
        }

        txn.commit()
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    HackHubError::conflict("目标已存在 final 评审，不能重复转为 final")
                } else {
                    HackHubError::database_operation(format!("提交事务失败: {e}"))
                }
            })?;

        self.get_evaluation_by_id_impl(evaluation_id)
            .await?
            .ok_or_else(|| HackHubError::not_found(format!("评审 {evaluation_id} 不存在")))
    }

    /// 条件更新未命中时区分“不存在”与“已不是草稿”
    async fn explain_missed_draft<C: ConnectionTrait>(
        &self,
        conn: &C,
        evaluation_id: i64,
    ) -> HackHubError {
        match Evaluations::find_by_id(evaluation_id).one(conn).await {
            Ok(Some(_)) => {
                HackHubError::conflict(format!("评审 {evaluation_id} 已是 final，不能再修改"))
            }
            Ok(None) => HackHubError::not_found(format!("评审 {evaluation_id} 不存在")),
            Err(e) => HackHubError::database_operation(format!("查询评审失败: {e}")),
        }
    }

    pub async fn find_final_evaluation_impl(&self, final_key: &str) -> Result<Option<Evaluation>> {
        let result = Evaluations::find()
            .filter(Column::FinalKey.eq(final_key))
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询 final 评审失败: {e}")))?;

        result.map(|m| m.into_evaluation()).transpose()
    }

    fn filtered_select(query: &EvaluationListQuery) -> Select<Evaluations> {
        let mut select = Evaluations::find().filter(Column::EventId.eq(query.event_id));

        if let Some(scope) = query.scope {
            select = select.filter(Column::Scope.eq(scope.as_str()));
        }
        if let Some(submission_id) = query.submission_id {
            select = select.filter(Column::SubmissionId.eq(submission_id));
        }
        if let Some(phase_id) = query.phase_id {
            select = select.filter(Column::PhaseId.eq(phase_id));
        }
        if let Some(project_id) = query.project_id {
            select = select.filter(Column::ProjectId.eq(project_id));
        }
        if let Some(team_id) = query.team_id {
            select = select.filter(Column::TeamId.eq(team_id));
        }
        if let Some(reviewer_id) = query.reviewer_id {
            select = select.filter(Column::ReviewerId.eq(reviewer_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        // 最新的在前
        select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
    }

    pub async fn list_evaluations_impl(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        let page = query.page.max(1);
        let size = query.size.max(1);
        let select = Self::filtered_select(&query);

        if query.current_only {
            let models = select
                .all(&self.db)
                .await
                .map_err(|e| HackHubError::database_operation(format!("查询评审列表失败: {e}")))?;
            let all = models
                .into_iter()
                .map(|m| m.into_evaluation())
                .collect::<Result<Vec<_>>>()?;
            let current = retain_current(all);

            let total = current.len() as u64;
            let items = current
                .into_iter()
                .skip(((page - 1) * size) as usize)
                .take(size as usize)
                .collect();

            return Ok(EvaluationListResponse {
                items,
                pagination: PaginationInfo::new(page, size, total),
            });
        }

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询评审总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询评审列表失败: {e}")))?;

        let items = models
            .into_iter()
            .map(|m| m.into_evaluation())
            .collect::<Result<Vec<_>>>()?;

        Ok(EvaluationListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_event_final_evaluations_impl(
        &self,
        event_id: i64,
    ) -> Result<Vec<Evaluation>> {
        let models = Evaluations::find()
            .filter(Column::EventId.eq(event_id))
            .filter(Column::Status.eq(EvaluationStatus::Final.as_str()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询 final 评审失败: {e}")))?;

        models
            .into_iter()
            .map(|m| m.into_evaluation())
            .collect::<Result<Vec<_>>>()
    }
}

/// 保留所有 final，草稿只保留每个 (目标, 评审人) 最新的一条
///
/// 输入需按创建时间倒序。
fn retain_current(evaluations: Vec<Evaluation>) -> Vec<Evaluation> {
    let mut seen_drafts = HashSet::new();
    evaluations
        .into_iter()
        .filter(|e| {
            e.is_final() || seen_drafts.insert((e.target.target_key(), e.reviewer_id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::{EvaluationSource, EvaluationTarget};

    fn eval(id: i64, reviewer_id: i64, status: EvaluationStatus) -> Evaluation {
        let now = chrono::Utc::now();
        Evaluation {
            id,
            event_id: 1,
            target: EvaluationTarget::Submission { submission_id: 10 },
            evaluated_submission_ids: Vec::new(),
            criterion_scores: Vec::new(),
            score: None,
            comment: String::new(),
            status,
            source: EvaluationSource::Manual,
            rubric_snapshot: None,
            reviewer_id,
            created_at: now,
            updated_at: now,
            finalized_at: None,
        }
    }

    #[test]
    fn test_retain_current_keeps_latest_draft_per_reviewer() {
        // 倒序：5 最新
        let input = vec![
            eval(5, 1, EvaluationStatus::Draft),
            eval(4, 2, EvaluationStatus::Draft),
            eval(3, 1, EvaluationStatus::Final),
            eval(2, 1, EvaluationStatus::Draft),
            eval(1, 2, EvaluationStatus::Draft),
        ];
        let ids: Vec<i64> = retain_current(input).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }
}
