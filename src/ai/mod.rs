//! AI 辅助评审适配层
//!
//! 评分模型被视为不透明的打分预言机：给定评审目标、评分规则快照与语言，
//! 返回建议的评语与分数。适配层从不写存储，输出交由评审生命周期以
//! `ai_assisted` 来源创建草稿。

pub mod disabled;
pub mod ollama;
pub mod prompt;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AiAssistConfig;
use crate::errors::Result;
use crate::models::evaluations::entities::EvaluationTarget;
use crate::models::rubrics::entities::RubricSnapshot;
use crate::models::submissions::entities::Submission;

pub use disabled::DisabledOracle;
pub use ollama::OllamaOracle;

/// 交给预言机的评审上下文
#[derive(Debug, Clone)]
pub struct AiAssistInput {
    pub target: EvaluationTarget,
    pub rubric: RubricSnapshot,
    /// 候选提交，预言机只能从中挑选
    pub submissions: Vec<Submission>,
    pub locale: String,
}

/// 预言机给出的建议
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAssistOutput {
    pub comment: String,
    pub score: Option<f64>,
    pub evaluated_submission_ids: Option<Vec<i64>>,
}

#[async_trait]
pub trait ScoringOracle: Send + Sync {
    /// 预言机名称，用于日志
    fn name(&self) -> &str;

    /// 生成建议；暂时性失败返回 `AdapterUnavailable`
    async fn generate(&self, input: &AiAssistInput) -> Result<AiAssistOutput>;
}

/// 按配置创建预言机，未知或无法初始化的 provider 退化为禁用
pub fn create_oracle(config: &AiAssistConfig) -> Arc<dyn ScoringOracle> {
    match config.provider.as_str() {
        "ollama" => match OllamaOracle::from_config(config) {
            Ok(oracle) => Arc::new(oracle),
            Err(e) => {
                warn!("Failed to initialize Ollama oracle: {}, AI assist disabled", e);
                Arc::new(DisabledOracle)
            }
        },
        "disabled" => Arc::new(DisabledOracle),
        other => {
            warn!("Unknown AI assist provider '{}', AI assist disabled", other);
            Arc::new(DisabledOracle)
        }
    }
}
