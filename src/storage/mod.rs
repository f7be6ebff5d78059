use std::sync::Arc;

use crate::models::{
    evaluations::{
        entities::Evaluation,
        requests::{EvaluationChanges, EvaluationListQuery, NewEvaluation},
        responses::EvaluationListResponse,
    },
    events::entities::{Event, Project, Team},
    phases::{
        entities::{Phase, Task},
        requests::{CreatePhaseRequest, CreateTaskRequest, UpdateTaskRequest},
    },
    rubrics::{
        entities::{PhaseRubric, RubricCriterion},
        requests::{CreateRubricRequest, CriterionInput, UpdateCriterionRequest, UpdateRubricRequest},
    },
    submissions::{
        entities::{Submission, SubmissionType},
        requests::SubmissionListParams,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 活动、团队与项目（由外部系统维护，此处只读）
    // 通过ID获取活动
    async fn get_event_by_id(&self, event_id: i64) -> Result<Option<Event>>;
    // 通过ID获取团队
    async fn get_team_by_id(&self, team_id: i64) -> Result<Option<Team>>;
    // 列出活动的所有团队
    async fn list_event_teams(&self, event_id: i64) -> Result<Vec<Team>>;
    // 通过ID获取项目
    async fn get_project_by_id(&self, project_id: i64) -> Result<Option<Project>>;

    /// 阶段与任务
    // 创建阶段
    async fn create_phase(&self, event_id: i64, req: CreatePhaseRequest) -> Result<Phase>;
    // 通过ID获取阶段
    async fn get_phase_by_id(&self, phase_id: i64) -> Result<Option<Phase>>;
    // 列出活动的所有阶段
    async fn list_event_phases(&self, event_id: i64) -> Result<Vec<Phase>>;
    // 创建任务
    async fn create_task(&self, phase_id: i64, req: CreateTaskRequest) -> Result<Task>;
    // 通过ID获取任务
    async fn get_task_by_id(&self, task_id: i64) -> Result<Option<Task>>;
    // 更新任务
    async fn update_task(&self, task_id: i64, req: UpdateTaskRequest) -> Result<Option<Task>>;
    // 列出阶段的所有任务
    async fn list_phase_tasks(&self, phase_id: i64) -> Result<Vec<Task>>;
    // 列出活动的所有任务
    async fn list_event_tasks(&self, event_id: i64) -> Result<Vec<Task>>;

    /// 提交
    // 创建提交（初始为草稿）
    async fn create_submission(
        &self,
        author_id: i64,
        team_id: i64,
        task_id: i64,
        content: Option<String>,
        submission_type: SubmissionType,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 将提交标记为 final
    async fn finalize_submission(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 列出团队在指定任务上的提交
    async fn list_team_submissions(&self, team_id: i64, task_ids: &[i64])
    -> Result<Vec<Submission>>;
    // 列出活动内的提交
    async fn list_event_submissions(
        &self,
        event_id: i64,
        params: SubmissionListParams,
    ) -> Result<Vec<Submission>>;

    /// 评分规则
    // 创建评分规则及其细则
    async fn create_rubric(
        &self,
        created_by: Option<i64>,
        req: CreateRubricRequest,
    ) -> Result<PhaseRubric>;
    // 通过ID获取评分规则
    async fn get_rubric_by_id(&self, rubric_id: i64) -> Result<Option<PhaseRubric>>;
    // 列出阶段的评分规则
    async fn list_phase_rubrics(&self, phase_id: i64) -> Result<Vec<PhaseRubric>>;
    // 更新评分规则
    async fn update_rubric(
        &self,
        rubric_id: i64,
        req: UpdateRubricRequest,
    ) -> Result<Option<PhaseRubric>>;
    // 添加细则
    async fn add_criterion(&self, rubric_id: i64, input: CriterionInput)
    -> Result<RubricCriterion>;
    // 通过ID获取细则
    async fn get_criterion_by_id(&self, criterion_id: i64) -> Result<Option<RubricCriterion>>;
    // 更新细则
    async fn update_criterion(
        &self,
        criterion_id: i64,
        req: UpdateCriterionRequest,
    ) -> Result<Option<RubricCriterion>>;
    // 删除细则
    async fn delete_criterion(&self, criterion_id: i64) -> Result<bool>;

    /// 评审记录
    // 创建草稿
    async fn create_evaluation(&self, new: NewEvaluation) -> Result<Evaluation>;
    // 通过ID获取评审
    async fn get_evaluation_by_id(&self, evaluation_id: i64) -> Result<Option<Evaluation>>;
    // 更新草稿；记录已不是草稿时返回冲突
    async fn update_evaluation_draft(
        &self,
        evaluation_id: i64,
        changes: EvaluationChanges,
    ) -> Result<Evaluation>;
    // 草稿转为 final；同一 final_key 已存在 final 时返回冲突
    async fn finalize_evaluation(
        &self,
        evaluation_id: i64,
        changes: EvaluationChanges,
        final_key: String,
    ) -> Result<Evaluation>;
    // 按 final_key 查找 final 评审
    async fn find_final_evaluation(&self, final_key: &str) -> Result<Option<Evaluation>>;
    // 分页列出评审
    async fn list_evaluations(&self, query: EvaluationListQuery) -> Result<EvaluationListResponse>;
    // 列出活动内所有 final 评审
    async fn list_event_final_evaluations(&self, event_id: i64) -> Result<Vec<Evaluation>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
