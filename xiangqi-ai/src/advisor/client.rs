//! OpenAI 兼容的 chat-completions 顾问客户端
//!
//! 红方默认走 `OPENAI_*`，黑方默认走 `DEEPSEEK_*` 环境变量。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use xiangqi_core::{AdvisorRequest, AdvisorResponse, Color};

use super::MoveAdvisor;
use crate::error::AdvisorError;

#[cfg(feature = "llm")]
use anyhow::{Context, Result};
#[cfg(feature = "llm")]
use tracing::{debug, info};

#[cfg(feature = "llm")]
use super::{ChatMessage, PromptTemplate, ResponseParser};

const OPENAI_API: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const DEEPSEEK_API: &str = "https://api.deepseek.com/chat/completions";
const DEEPSEEK_MODEL: &str = "deepseek-chat";

/// 顾问客户端配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// chat-completions 接口地址
    pub base_url: String,
    pub model: String,
    /// 没有密钥时视为未配置
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// 最大生成 token 数（推理模型先输出思考过程，要留足余量）
    pub max_tokens: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_API.to_string(),
            model: OPENAI_MODEL.to_string(),
            api_key: None,
            timeout_secs: 30,
            max_tokens: 1024,
        }
    }
}

impl AdvisorConfig {
    /// 从 `<PREFIX>_API`、`<PREFIX>_MODEL`、`<PREFIX>_API_KEY` 读取
    pub fn from_env(prefix: &str) -> Self {
        Self::from_lookup(prefix, |name| std::env::var(name).ok())
    }

    /// 按阵营选择默认服务
    pub fn for_side(side: Color) -> Self {
        Self::from_env(Self::env_prefix(side))
    }

    pub fn env_prefix(side: Color) -> &'static str {
        match side {
            Color::Red => "OPENAI",
            Color::Black => "DEEPSEEK",
        }
    }

    fn from_lookup(prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let (default_url, default_model) = match prefix {
            "DEEPSEEK" => (DEEPSEEK_API, DEEPSEEK_MODEL),
            _ => (OPENAI_API, OPENAI_MODEL),
        };
        let read = |suffix: &str| lookup(&format!("{}_{}", prefix, suffix)).filter(|v| !v.trim().is_empty());

        Self {
            base_url: read("API").unwrap_or_else(|| default_url.to_string()),
            model: read("MODEL").unwrap_or_else(|| default_model.to_string()),
            api_key: read("API_KEY"),
            ..Self::default()
        }
    }

    /// 是否配置了密钥
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// chat-completions 请求体
#[cfg(feature = "llm")]
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
    messages: &'a [ChatMessage],
}

#[cfg(feature = "llm")]
#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// chat-completions 响应体
#[cfg(feature = "llm")]
#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[cfg(feature = "llm")]
#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[cfg(feature = "llm")]
#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// 基于 chat-completions 的顾问
#[cfg(feature = "llm")]
pub struct ChatAdvisor {
    config: AdvisorConfig,
    client: reqwest::Client,
}

#[cfg(feature = "llm")]
impl ChatAdvisor {
    pub fn new(config: AdvisorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// 发送对话，返回第一条回答的文本
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let api_key = self.config.api_key.as_deref().context("API key not configured")?;

        let body = CompletionRequest {
            model: &self.config.model,
            temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat { kind: "json_object" },
            messages,
        };

        debug!(
            "Sending advisor request: model={}, messages={}, temperature={}",
            self.config.model,
            messages.len(),
            temperature
        );

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send completion request")?
            .error_for_status()
            .context("Advisor service returned an error status")?;

        let text = response.text().await.context("Failed to read response body")?;
        let preview: String = text.chars().take(300).collect();
        debug!("Raw advisor response: {}", preview);

        let parsed: CompletionResponse = serde_json::from_str(&text).context("Failed to parse completion response")?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        info!("Advisor {} answered {} chars", self.config.model, content.len());
        Ok(content)
    }
}

#[cfg(feature = "llm")]
#[async_trait]
impl MoveAdvisor for ChatAdvisor {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn advise(&self, request: &AdvisorRequest) -> Result<AdvisorResponse, AdvisorError> {
        let messages =
            PromptTemplate::messages(request).map_err(|e| AdvisorError::Unavailable(format!("encode request: {}", e)))?;

        let content = self
            .complete(&messages, request.temperature)
            .await
            .map_err(|e| AdvisorError::Unavailable(format!("{:#}", e)))?;

        ResponseParser::parse(&content)
    }
}

/// 非 LLM feature 时的占位实现
#[cfg(not(feature = "llm"))]
pub struct ChatAdvisor {
    config: AdvisorConfig,
}

#[cfg(not(feature = "llm"))]
impl ChatAdvisor {
    pub fn new(config: AdvisorConfig) -> anyhow::Result<Self> {
        Ok(Self { config })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }
}

#[cfg(not(feature = "llm"))]
#[async_trait]
impl MoveAdvisor for ChatAdvisor {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn advise(&self, _request: &AdvisorRequest) -> Result<AdvisorResponse, AdvisorError> {
        Err(AdvisorError::Unavailable(
            "LLM feature not enabled. Compile with --features llm".to_string(),
        ))
    }
}
