use serde::Deserialize;
use ts_rs::TS;

/// 细则输入
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct CriterionInput {
    pub title: String,
    pub description: Option<String>,
    pub weight: Option<f64>, // 缺省 1.00
    pub max_score: Option<f64>,
    pub order_index: Option<i32>, // 缺省追加到末尾
}

/// 创建评分规则请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct CreateRubricRequest {
    pub phase_id: i64,
    pub task_id: Option<i64>,
    pub name: String,
    pub scale_min: Option<f64>, // 缺省 0
    pub scale_max: Option<f64>, // 缺省 100
    pub guidance: Option<String>,
    #[serde(default)]
    pub criteria: Vec<CriterionInput>,
}

/// 更新评分规则请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct UpdateRubricRequest {
    pub name: Option<String>,
    pub scale_min: Option<f64>,
    pub scale_max: Option<f64>,
    pub guidance: Option<String>,
}

/// 更新细则请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct UpdateCriterionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weight: Option<f64>,
    pub max_score: Option<f64>,
    pub order_index: Option<i32>,
}

/// 查询阶段/任务生效的评分规则
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct ResolveRubricParams {
    pub phase_id: i64,
    pub task_id: Option<i64>,
}
