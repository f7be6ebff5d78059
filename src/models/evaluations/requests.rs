use serde::Deserialize;
use ts_rs::TS;

use crate::errors::{HackHubError, Result};
use crate::models::common::pagination::PaginationQuery;
use crate::models::evaluations::entities::{
    CriterionScore, EvaluationScope, EvaluationSource, EvaluationStatus, EvaluationTarget,
};
use crate::models::rubrics::entities::RubricSnapshot;

/// 请求中的扁平目标引用，进入业务层前转换为 EvaluationTarget
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationRefs {
    pub scope: EvaluationScope,
    pub submission_id: Option<i64>,
    pub phase_id: Option<i64>,
    pub project_id: Option<i64>,
    pub team_id: Option<i64>,
}

impl EvaluationRefs {
    pub fn into_target(self) -> Result<EvaluationTarget> {
        EvaluationTarget::from_parts(
            self.scope,
            self.submission_id,
            self.phase_id,
            self.project_id,
            self.team_id,
        )
        .map_err(HackHubError::validation)
    }
}

/// 创建评审草稿请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CreateEvaluationRequest {
    #[serde(flatten)]
    #[ts(flatten)]
    pub refs: EvaluationRefs,
    #[serde(default)]
    pub comment: String,
    pub score: Option<f64>,
    #[serde(default)]
    pub criterion_scores: Vec<CriterionScore>,
    // 缺省时使用默认候选集
    pub evaluated_submission_ids: Option<Vec<i64>>,
}

/// 更新评审请求，仅草稿可改；finalize 为 true 时在同一次调用中转为 final
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct UpdateEvaluationRequest {
    pub comment: Option<String>,
    pub score: Option<f64>,
    pub criterion_scores: Option<Vec<CriterionScore>>,
    pub evaluated_submission_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub finalize: bool,
}

impl UpdateEvaluationRequest {
    pub fn is_empty(&self) -> bool {
        self.comment.is_none()
            && self.score.is_none()
            && self.criterion_scores.is_none()
            && self.evaluated_submission_ids.is_none()
    }
}

/// AI 辅助评审请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct AiAssistRequest {
    #[serde(flatten)]
    #[ts(flatten)]
    pub refs: EvaluationRefs,
    pub evaluated_submission_ids: Option<Vec<i64>>,
    // 生成评语使用的语言，如 "zh-CN"
    pub locale: Option<String>,
}

/// 评审列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub scope: Option<EvaluationScope>,
    pub submission_id: Option<i64>,
    pub phase_id: Option<i64>,
    pub project_id: Option<i64>,
    pub team_id: Option<i64>,
    pub reviewer_id: Option<i64>,
    pub status: Option<EvaluationStatus>,
    /// 每个 (范围, 目标, 评审人) 只返回最新草稿与 final
    pub current_only: Option<bool>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct EvaluationListQuery {
    pub event_id: i64,
    pub page: u64,
    pub size: u64,
    pub scope: Option<EvaluationScope>,
    pub submission_id: Option<i64>,
    pub phase_id: Option<i64>,
    pub project_id: Option<i64>,
    pub team_id: Option<i64>,
    pub reviewer_id: Option<i64>,
    pub status: Option<EvaluationStatus>,
    pub current_only: bool,
}

impl EvaluationListQuery {
    pub fn from_params(event_id: i64, params: EvaluationListParams) -> Self {
        let (page, size) = PaginationQuery {
            page: params.page.unwrap_or(1),
            size: params.size.unwrap_or(20),
        }
        .normalized();
        Self {
            event_id,
            page,
            size,
            scope: params.scope,
            submission_id: params.submission_id,
            phase_id: params.phase_id,
            project_id: params.project_id,
            team_id: params.team_id,
            reviewer_id: params.reviewer_id,
            status: params.status,
            current_only: params.current_only.unwrap_or(false),
        }
    }
}

// 用于存储层的内部写入参数
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub event_id: i64,
    pub target: EvaluationTarget,
    pub evaluated_submission_ids: Vec<i64>,
    pub criterion_scores: Vec<CriterionScore>,
    pub score: Option<f64>,
    pub comment: String,
    pub source: EvaluationSource,
    pub rubric_snapshot: Option<RubricSnapshot>,
    pub reviewer_id: i64,
}

// 草稿的完整可变字段（合并补丁后的结果）
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationChanges {
    pub comment: String,
    pub score: Option<f64>,
    pub criterion_scores: Vec<CriterionScore>,
    pub evaluated_submission_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_into_target() {
        let req: CreateEvaluationRequest = serde_json::from_str(
            r#"{"scope":"submission","submission_id":4,"comment":"Good work","score":7}"#,
        )
        .unwrap();
        assert_eq!(
            req.refs.into_target().unwrap(),
            EvaluationTarget::Submission { submission_id: 4 }
        );
        assert_eq!(req.score, Some(7.0));
    }

    #[test]
    fn test_refs_mismatch_is_validation_error() {
        let refs = EvaluationRefs {
            scope: EvaluationScope::Phase,
            submission_id: Some(1),
            phase_id: Some(2),
            project_id: None,
            team_id: Some(3),
        };
        let err = refs.into_target().unwrap_err();
        assert!(matches!(err, HackHubError::Validation(_)));
    }
}
