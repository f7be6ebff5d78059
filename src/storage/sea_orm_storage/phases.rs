//! 阶段与任务存储操作

use super::SeaOrmStorage;
use crate::entity::phases::{
    ActiveModel as PhaseActiveModel, Column as PhaseColumn, Entity as Phases,
};
use crate::entity::tasks::{ActiveModel as TaskActiveModel, Column as TaskColumn, Entity as Tasks};
use crate::errors::{HackHubError, Result};
use crate::models::phases::{
    entities::{Phase, Task},
    requests::{CreatePhaseRequest, CreateTaskRequest, UpdateTaskRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建阶段，未指定顺序时追加到末尾
    pub async fn create_phase_impl(&self, event_id: i64, req: CreatePhaseRequest) -> Result<Phase> {
        let now = chrono::Utc::now().timestamp();

        let order_index = match req.order_index {
            Some(idx) => idx,
            None => {
                let max: Option<i32> = Phases::find()
                    .filter(PhaseColumn::EventId.eq(event_id))
                    .select_only()
                    .column_as(PhaseColumn::OrderIndex.max(), "max_order")
                    .into_tuple::<Option<i32>>()
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        HackHubError::database_operation(format!("查询阶段顺序失败: {e}"))
                    })?
                    .flatten();
                max.map(|m| m + 1).unwrap_or(0)
            }
        };

        let model = PhaseActiveModel {
            event_id: Set(event_id),
            title: Set(req.title),
            description: Set(req.description),
            order_index: Set(order_index),
            view_start: Set(req.view_start.map(|dt| dt.timestamp())),
            view_end: Set(req.view_end.map(|dt| dt.timestamp())),
            is_elimination: Set(req.is_elimination.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("创建阶段失败: {e}")))?;

        Ok(result.into_phase())
    }

    pub async fn get_phase_by_id_impl(&self, phase_id: i64) -> Result<Option<Phase>> {
        let result = Phases::find_by_id(phase_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询阶段失败: {e}")))?;

        Ok(result.map(|m| m.into_phase()))
    }

    pub async fn list_event_phases_impl(&self, event_id: i64) -> Result<Vec<Phase>> {
        let results = Phases::find()
            .filter(PhaseColumn::EventId.eq(event_id))
            .order_by_asc(PhaseColumn::OrderIndex)
            .order_by_asc(PhaseColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询阶段列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_phase()).collect())
    }

    /// 创建任务，未指定顺序时追加到阶段末尾
    pub async fn create_task_impl(&self, phase_id: i64, req: CreateTaskRequest) -> Result<Task> {
        let now = chrono::Utc::now().timestamp();

        let order_index = match req.order_index {
            Some(idx) => idx,
            None => {
                let max: Option<i32> = Tasks::find()
                    .filter(TaskColumn::PhaseId.eq(phase_id))
                    .select_only()
                    .column_as(TaskColumn::OrderIndex.max(), "max_order")
                    .into_tuple::<Option<i32>>()
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        HackHubError::database_operation(format!("查询任务顺序失败: {e}"))
                    })?
                    .flatten();
                max.map(|m| m + 1).unwrap_or(0)
            }
        };

        let model = TaskActiveModel {
            phase_id: Set(phase_id),
            title: Set(req.title),
            description: Set(req.description),
            delivery_kind: Set(req.delivery_kind.to_string()),
            required: Set(req.required.unwrap_or(true)),
            due_at: Set(req.due_at.map(|dt| dt.timestamp())),
            order_index: Set(order_index),
            rubric_id: Set(req.rubric_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("创建任务失败: {e}")))?;

        Ok(result.into_task())
    }

    pub async fn get_task_by_id_impl(&self, task_id: i64) -> Result<Option<Task>> {
        let result = Tasks::find_by_id(task_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询任务失败: {e}")))?;

        Ok(result.map(|m| m.into_task()))
    }

    pub async fn update_task_impl(
        &self,
        task_id: i64,
        req: UpdateTaskRequest,
    ) -> Result<Option<Task>> {
        let existing = Tasks::find_by_id(task_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询任务失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: TaskActiveModel = existing.into();

        if let Some(title) = req.title {
            model.title = Set(title);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(required) = req.required {
            model.required = Set(required);
        }
        if let Some(due_at) = req.due_at {
            model.due_at = Set(Some(due_at.timestamp()));
        }
        if let Some(order_index) = req.order_index {
            model.order_index = Set(order_index);
        }
        if let Some(rubric_id) = req.rubric_id {
            model.rubric_id = Set(if rubric_id > 0 { Some(rubric_id) } else { None });
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("更新任务失败: {e}")))?;

        Ok(Some(result.into_task()))
    }

    pub async fn list_phase_tasks_impl(&self, phase_id: i64) -> Result<Vec<Task>> {
        let results = Tasks::find()
            .filter(TaskColumn::PhaseId.eq(phase_id))
            .order_by_asc(TaskColumn::OrderIndex)
            .order_by_asc(TaskColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询任务列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_task()).collect())
    }

    pub async fn list_event_tasks_impl(&self, event_id: i64) -> Result<Vec<Task>> {
        let phase_ids: Vec<i64> = Phases::find()
            .filter(PhaseColumn::EventId.eq(event_id))
            .select_only()
            .column(PhaseColumn::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询阶段列表失败: {e}")))?;

        if phase_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Tasks::find()
            .filter(TaskColumn::PhaseId.is_in(phase_ids))
            .order_by_asc(TaskColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询任务列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_task()).collect())
    }
}
