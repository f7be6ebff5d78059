use async_trait::async_trait;

use super::{AiAssistInput, AiAssistOutput, ScoringOracle};
use crate::errors::{HackHubError, Result};

/// 未配置 AI 辅助时使用
pub struct DisabledOracle;

#[async_trait]
impl ScoringOracle for DisabledOracle {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _input: &AiAssistInput) -> Result<AiAssistOutput> {
        Err(HackHubError::adapter_unavailable(
            "AI assist is not configured on this server",
        ))
    }
}
