//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{HackHubError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus, SubmissionType},
    requests::SubmissionListParams,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建提交，初始状态为草稿
    pub async fn create_submission_impl(
        &self,
        author_id: i64,
        team_id: i64,
        task_id: i64,
        content: Option<String>,
        submission_type: SubmissionType,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            task_id: Set(task_id),
            team_id: Set(team_id),
            author_id: Set(author_id),
            status: Set(SubmissionStatus::Draft.to_string()),
            submission_type: Set(submission_type.to_string()),
            content: Set(content),
            submitted_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 将提交标记为 final（重复调用保持不变）
    pub async fn finalize_submission_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let existing = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询提交失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        if existing.status == SubmissionStatus::Final.as_str() {
            return Ok(Some(existing.into_submission()));
        }

        let mut model: ActiveModel = existing.into();
        model.status = Set(SubmissionStatus::Final.to_string());
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("更新提交状态失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 团队在给定任务上的提交，按提交时间升序
    pub async fn list_team_submissions_impl(
        &self,
        team_id: i64,
        task_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Submissions::find()
            .filter(Column::TeamId.eq(team_id))
            .filter(Column::TaskId.is_in(task_ids.to_vec()))
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询团队提交失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn list_event_submissions_impl(
        &self,
        event_id: i64,
        params: SubmissionListParams,
    ) -> Result<Vec<Submission>> {
        let task_ids: Vec<i64> = match params.task_id {
            Some(task_id) => vec![task_id],
            None => self
                .list_event_tasks_impl(event_id)
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect(),
        };

        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut select = Submissions::find().filter(Column::TaskId.is_in(task_ids));

        if let Some(team_id) = params.team_id {
            select = select.filter(Column::TeamId.eq(team_id));
        }
        if let Some(status) = params.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        let results = select
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }
}
