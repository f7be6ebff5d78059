//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod evaluations;
mod events;
mod phases;
mod rubrics;
mod submissions;

use crate::config::AppConfig;
use crate::errors::{HackHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    /// 使用已建立的连接创建存储实例并执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| HackHubError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// 底层连接，供运维脚本与测试准备数据
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// SQLite 专用连接（WAL + 外键约束）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| HackHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| HackHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| HackHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(HackHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一约束冲突（final 唯一键、细则顺序）
pub(super) fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 活动模块
    async fn get_event_by_id(&self, event_id: i64) -> Result<Option<Event>> {
        self.get_event_by_id_impl(event_id).await
    }

    async fn get_team_by_id(&self, team_id: i64) -> Result<Option<Team>> {
        self.get_team_by_id_impl(team_id).await
    }

    async fn list_event_teams(&self, event_id: i64) -> Result<Vec<Team>> {
        self.list_event_teams_impl(event_id).await
    }

    async fn get_project_by_id(&self, project_id: i64) -> Result<Option<Project>> {
        self.get_project_by_id_impl(project_id).await
    }

    // 阶段模块
    async fn create_phase(&self, event_id: i64, req: CreatePhaseRequest) -> Result<Phase> {
        self.create_phase_impl(event_id, req).await
    }

    async fn get_phase_by_id(&self, phase_id: i64) -> Result<Option<Phase>> {
        self.get_phase_by_id_impl(phase_id).await
    }

    async fn list_event_phases(&self, event_id: i64) -> Result<Vec<Phase>> {
        self.list_event_phases_impl(event_id).await
    }

    async fn create_task(&self, phase_id: i64, req: CreateTaskRequest) -> Result<Task> {
        self.create_task_impl(phase_id, req).await
    }

    async fn get_task_by_id(&self, task_id: i64) -> Result<Option<Task>> {
        self.get_task_by_id_impl(task_id).await
    }

    async fn update_task(&self, task_id: i64, req: UpdateTaskRequest) -> Result<Option<Task>> {
        self.update_task_impl(task_id, req).await
    }

    async fn list_phase_tasks(&self, phase_id: i64) -> Result<Vec<Task>> {
        self.list_phase_tasks_impl(phase_id).await
    }

    async fn list_event_tasks(&self, event_id: i64) -> Result<Vec<Task>> {
        self.list_event_tasks_impl(event_id).await
    }

    // 提交模块
    async fn create_submission(
        &self,
        author_id: i64,
        team_id: i64,
        task_id: i64,
        content: Option<String>,
        submission_type: SubmissionType,
    ) -> Result<Submission> {
        self.create_submission_impl(author_id, team_id, task_id, content, submission_type)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn finalize_submission(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.finalize_submission_impl(submission_id).await
    }

    async fn list_team_submissions(
        &self,
        team_id: i64,
        task_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        self.list_team_submissions_impl(team_id, task_ids).await
    }

    async fn list_event_submissions(
        &self,
        event_id: i64,
        params: SubmissionListParams,
    ) -> Result<Vec<Submission>> {
        self.list_event_submissions_impl(event_id, params).await
    }

    // 评分规则模块
    async fn create_rubric(
        &self,
        created_by: Option<i64>,
        req: CreateRubricRequest,
    ) -> Result<PhaseRubric> {
        self.create_rubric_impl(created_by, req).await
    }

    async fn get_rubric_by_id(&self, rubric_id: i64) -> Result<Option<PhaseRubric>> {
        self.get_rubric_by_id_impl(rubric_id).await
    }

    async fn list_phase_rubrics(&self, phase_id: i64) -> Result<Vec<PhaseRubric>> {
        self.list_phase_rubrics_impl(phase_id).await
    }

    async fn update_rubric(
        &self,
        rubric_id: i64,
        req: UpdateRubricRequest,
    ) -> Result<Option<PhaseRubric>> {
        self.update_rubric_impl(rubric_id, req).await
    }

    async fn add_criterion(
        &self,
        rubric_id: i64,
        input: CriterionInput,
    ) -> Result<RubricCriterion> {
        self.add_criterion_impl(rubric_id, input).await
    }

    async fn get_criterion_by_id(&self, criterion_id: i64) -> Result<Option<RubricCriterion>> {
        self.get_criterion_by_id_impl(criterion_id).await
    }

    async fn update_criterion(
        &self,
        criterion_id: i64,
        req: UpdateCriterionRequest,
    ) -> Result<Option<RubricCriterion>> {
        self.update_criterion_impl(criterion_id, req).await
    }

    async fn delete_criterion(&self, criterion_id: i64) -> Result<bool> {
        self.delete_criterion_impl(criterion_id).await
    }

    // 评审模块
    async fn create_evaluation(&self, new: NewEvaluation) -> Result<Evaluation> {
        self.create_evaluation_impl(new).await
    }

    async fn get_evaluation_by_id(&self, evaluation_id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(evaluation_id).await
    }

    async fn update_evaluation_draft(
        &self,
        evaluation_id: i64,
        changes: EvaluationChanges,
    ) -> Result<Evaluation> {
        self.update_evaluation_draft_impl(evaluation_id, changes)
            .await
    }

    async fn finalize_evaluation(
        &self,
        evaluation_id: i64,
        changes: EvaluationChanges,
        final_key: String,
    ) -> Result<Evaluation> {
        self.finalize_evaluation_impl(evaluation_id, changes, final_key)
            .await
    }

    async fn find_final_evaluation(&self, final_key: &str) -> Result<Option<Evaluation>> {
        self.find_final_evaluation_impl(final_key).await
    }

    async fn list_evaluations(&self, query: EvaluationListQuery) -> Result<EvaluationListResponse> {
        self.list_evaluations_impl(query).await
    }

    async fn list_event_final_evaluations(&self, event_id: i64) -> Result<Vec<Evaluation>> {
        self.list_event_final_evaluations_impl(event_id).await
    }
}
