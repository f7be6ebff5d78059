//! 集成测试共用的数据准备
#![allow(dead_code)]

use std::sync::Arc;

use rust_hackhub::entity::{events, projects, teams};
use rust_hackhub::models::actors::entities::{Actor, ActorRole};
use rust_hackhub::models::events::entities::Event;
use rust_hackhub::models::phases::entities::{DeliveryKind, Phase, Task};
use rust_hackhub::models::phases::requests::{CreatePhaseRequest, CreateTaskRequest};
use rust_hackhub::models::rubrics::entities::PhaseRubric;
use rust_hackhub::models::rubrics::requests::{CreateRubricRequest, CriterionInput};
use rust_hackhub::models::submissions::entities::{Submission, SubmissionType};
use rust_hackhub::storage::Storage;
use rust_hackhub::storage::sea_orm_storage::SeaOrmStorage;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection,
};

pub const TENANT: i64 = 1;

pub struct Fixture {
    pub storage: Arc<dyn Storage>,
    // 直接操作数据库，用于删除等存储接口之外的写入
    pub db: DatabaseConnection,
    pub event: Event,
    pub alpha: i64,
    pub beta: i64,
    pub project: i64,
}

/// 内存 SQLite，单连接保证所有查询看到同一个库
pub async fn storage() -> SeaOrmStorage {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    // 级联删除依赖外键约束
    db.execute_unprepared("PRAGMA foreign_keys = ON").await.unwrap();
    SeaOrmStorage::from_connection(db).await.unwrap()
}

/// 一个活动、两个团队（Alpha、beta）以及 Alpha 的项目
pub async fn fixture() -> Fixture {
    let storage = storage().await;
    let db = storage.connection();
    let now = chrono::Utc::now().timestamp();

    let event = events::ActiveModel {
        tenant_id: Set(TENANT),
        name: Set("Spring Hack".to_string()),
        starts_at: Set(None),
        ends_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let mut team_ids = Vec::new();
    for name in ["beta", "Alpha"] {
        let team = teams::ActiveModel {
            event_id: Set(event.id),
            name: Set(name.to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        team_ids.push(team.id);
    }
    let (beta, alpha) = (team_ids[0], team_ids[1]);

    let project = projects::ActiveModel {
        event_id: Set(event.id),
        team_id: Set(alpha),
        title: Set("Carbon tracker".to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let db = db.clone();
    Fixture {
        storage: Arc::new(storage),
        db,
        event: event.into_event(),
        alpha,
        beta,
        project: project.id,
    }
}

pub fn actor(id: i64, role: ActorRole) -> Actor {
    Actor {
        id,
        tenant_id: TENANT,
        role,
        team_id: None,
    }
}

pub fn reviewer(id: i64) -> Actor {
    actor(id, ActorRole::Reviewer)
}

pub async fn phase(storage: &dyn Storage, event_id: i64, title: &str, order: i32) -> Phase {
    storage
        .create_phase(
            event_id,
            CreatePhaseRequest {
                title: title.to_string(),
                description: None,
                order_index: Some(order),
                view_start: None,
                view_end: None,
                is_elimination: None,
            },
        )
        .await
        .unwrap()
}

pub async fn task(storage: &dyn Storage, phase_id: i64, title: &str, order: i32) -> Task {
    storage
        .create_task(
            phase_id,
            CreateTaskRequest {
                title: title.to_string(),
                description: None,
                delivery_kind: DeliveryKind::Url,
                required: Some(true),
                due_at: None,
                order_index: Some(order),
                rubric_id: None,
            },
        )
        .await
        .unwrap()
}

/// 阶段级评分规则，区间 [0, 100]，两个细则：Impact(权重 2, 满分 10)、Execution(权重 1, 满分 10)
pub async fn phase_rubric(storage: &dyn Storage, phase_id: i64) -> PhaseRubric {
    storage
        .create_rubric(
            Some(99),
            CreateRubricRequest {
                phase_id,
                task_id: None,
                name: "Demo day".to_string(),
                scale_min: Some(0.0),
                scale_max: Some(100.0),
                guidance: None,
                criteria: vec![
                    CriterionInput {
                        title: "Impact".to_string(),
                        description: None,
                        weight: Some(2.0),
                        max_score: Some(10.0),
                        order_index: Some(0),
                    },
                    CriterionInput {
                        title: "Execution".to_string(),
                        description: None,
                        weight: Some(1.0),
                        max_score: Some(10.0),
                        order_index: Some(1),
                    },
                ],
            },
        )
        .await
        .unwrap()
}

pub async fn submit(storage: &dyn Storage, team_id: i64, task_id: i64) -> Submission {
    storage
        .create_submission(
            500,
            team_id,
            task_id,
            Some("https://example.org/demo".to_string()),
            SubmissionType::Provisional,
        )
        .await
        .unwrap()
}
