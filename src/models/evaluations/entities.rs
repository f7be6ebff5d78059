use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::rubrics::entities::RubricSnapshot;

// 评审对象类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum EvaluationScope {
    Submission,
    Phase,
    Project,
}

impl EvaluationScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationScope::Submission => "submission",
            EvaluationScope::Phase => "phase",
            EvaluationScope::Project => "project",
        }
    }
}

impl std::fmt::Display for EvaluationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EvaluationScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submission" => Ok(EvaluationScope::Submission),
            "phase" => Ok(EvaluationScope::Phase),
            "project" => Ok(EvaluationScope::Project),
            _ => Err(format!(
                "无效的评审范围: '{s}'. 支持: submission, phase, project"
            )),
        }
    }
}

// 评审状态：draft -> final，单向
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum EvaluationStatus {
    Draft,
    Final,
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStatus::Draft => "draft",
            EvaluationStatus::Final => "final",
        }
    }
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EvaluationStatus::Draft),
            "final" => Ok(EvaluationStatus::Final),
            _ => Err(format!("Invalid evaluation status: {s}")),
        }
    }
}

// 评审来源
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum EvaluationSource {
    Manual,
    AiAssisted,
}

impl EvaluationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationSource::Manual => "manual",
            EvaluationSource::AiAssisted => "ai_assisted",
        }
    }
}

impl std::fmt::Display for EvaluationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EvaluationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(EvaluationSource::Manual),
            "ai_assisted" => Ok(EvaluationSource::AiAssisted),
            _ => Err(format!("Invalid evaluation source: {s}")),
        }
    }
}

/// 评审对象
///
/// 每种范围只携带它需要的引用，范围与引用不一致的记录无法构造。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(tag = "scope", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum EvaluationTarget {
    Submission { submission_id: i64 },
    Phase { phase_id: i64, team_id: i64 },
    Project { project_id: i64, team_id: i64 },
}

impl EvaluationTarget {
    pub fn scope(&self) -> EvaluationScope {
        match self {
            EvaluationTarget::Submission { .. } => EvaluationScope::Submission,
            EvaluationTarget::Phase { .. } => EvaluationScope::Phase,
            EvaluationTarget::Project { .. } => EvaluationScope::Project,
        }
    }

    pub fn submission_id(&self) -> Option<i64> {
        match self {
            EvaluationTarget::Submission { submission_id } => Some(*submission_id),
            _ => None,
        }
    }

    pub fn phase_id(&self) -> Option<i64> {
        match self {
            EvaluationTarget::Phase { phase_id, .. } => Some(*phase_id),
            _ => None,
        }
    }

    pub fn project_id(&self) -> Option<i64> {
        match self {
            EvaluationTarget::Project { project_id, .. } => Some(*project_id),
            _ => None,
        }
    }

    /// 聚合范围的团队；提交范围的团队需要从提交本身读取
    pub fn team_id(&self) -> Option<i64> {
        match self {
            EvaluationTarget::Submission { .. } => None,
            EvaluationTarget::Phase { team_id, .. } | EvaluationTarget::Project { team_id, .. } => {
                Some(*team_id)
            }
        }
    }

    /// 目标的规范化标识
    pub fn target_key(&self) -> String {
        match self {
            EvaluationTarget::Submission { submission_id } => {
                format!("submission:{submission_id}")
            }
            EvaluationTarget::Phase { phase_id, team_id } => {
                format!("phase:{phase_id}:team:{team_id}")
            }
            EvaluationTarget::Project {
                project_id,
                team_id,
            } => format!("project:{project_id}:team:{team_id}"),
        }
    }

    /// final 唯一键，写入带唯一约束的列
    pub fn final_key(&self, reviewer_id: Option<i64>) -> String {
        match reviewer_id {
            Some(reviewer) => format!("{}:reviewer:{reviewer}", self.target_key()),
            None => self.target_key(),
        }
    }

    /// 由存储中的扁平列还原评审对象
    pub fn from_parts(
        scope: EvaluationScope,
        submission_id: Option<i64>,
        phase_id: Option<i64>,
        project_id: Option<i64>,
        team_id: Option<i64>,
    ) -> Result<Self, String> {
        match (scope, submission_id, phase_id, project_id, team_id) {
            (EvaluationScope::Submission, Some(submission_id), None, None, None) => {
                Ok(EvaluationTarget::Submission { submission_id })
            }
            (EvaluationScope::Phase, None, Some(phase_id), None, Some(team_id)) => {
                Ok(EvaluationTarget::Phase { phase_id, team_id })
            }
            (EvaluationScope::Project, None, None, Some(project_id), Some(team_id)) => {
                Ok(EvaluationTarget::Project {
                    project_id,
                    team_id,
                })
            }
            (EvaluationScope::Submission, ..) => {
                Err("submission 范围只能且必须提供 submission_id".to_string())
            }
            (EvaluationScope::Phase, ..) => {
                Err("phase 范围只能且必须提供 phase_id 与 team_id".to_string())
            }
            (EvaluationScope::Project, ..) => {
                Err("project 范围只能且必须提供 project_id 与 team_id".to_string())
            }
        }
    }
}

/// 单项细则得分
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CriterionScore {
    pub criterion_id: i64,
    pub score: f64,
}

/// 评审记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Evaluation {
    pub id: i64,
    pub event_id: i64,
    pub target: EvaluationTarget,
    // 阶段/项目范围下实际参与评审的提交，保持顺序
    pub evaluated_submission_ids: Vec<i64>,
    pub criterion_scores: Vec<CriterionScore>,
    pub score: Option<f64>,
    pub comment: String,
    pub status: EvaluationStatus,
    pub source: EvaluationSource,
    pub rubric_snapshot: Option<RubricSnapshot>,
    pub reviewer_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub finalized_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Evaluation {
    pub fn is_final(&self) -> bool {
        self.status == EvaluationStatus::Final
    }
}
