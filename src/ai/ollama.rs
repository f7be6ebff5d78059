use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::prompt::{build_system_prompt, build_user_prompt, parse_oracle_output};
use super::{AiAssistInput, AiAssistOutput, ScoringOracle};
use crate::config::AiAssistConfig;
use crate::errors::{HackHubError, Result};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    system: String,
    stream: bool,
    format: &'a str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: i32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    total_duration: Option<i64>,
}

/// 通过 Ollama `/api/generate` 调用本地模型
pub struct OllamaOracle {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaOracle {
    pub fn from_config(config: &AiAssistConfig) -> Result<Self> {
        // 调用方另有总超时，这里只限制单次 HTTP 请求
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| HackHubError::adapter_unavailable(format!("HTTP 客户端创建失败: {e}")))?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ScoringOracle for OllamaOracle {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, input: &AiAssistInput) -> Result<AiAssistOutput> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: build_user_prompt(input),
            system: build_system_prompt(&input.locale),
            stream: false,
            format: "json",
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: 1024,
            },
        };

        info!(
            "Sending evaluation request to Ollama (model: {}, target: {}, submissions: {})",
            self.model,
            input.target.target_key(),
            input.submissions.len()
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| HackHubError::adapter_unavailable(format!("Ollama 请求失败: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HackHubError::adapter_unavailable(format!(
                "Ollama 返回错误 ({status}): {body}"
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| HackHubError::adapter_unavailable(format!("Ollama 响应解析失败: {e}")))?;

        if let Some(total) = generated.total_duration {
            debug!(
                "Ollama generation finished in {:.2}s, {} chars",
                total as f64 / 1_000_000_000.0,
                generated.response.len()
            );
        }

        parse_oracle_output(&generated.response)
    }
}
