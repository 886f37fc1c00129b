//! DeepSeek chat-completions insight generator.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use coinfolio_core::insights::{Insight, InsightContext, InsightGenerator};

use crate::error::AiError;
use crate::prompt::{build_user_prompt, parse_insight, SYSTEM_PROMPT};

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEEPSEEK_MODEL: &str = "deepseek-chat";

/// Request tuning for insight generation.
#[derive(Debug, Clone)]
pub struct InsightGeneratorConfig {
    pub model: String,
    pub max_tokens: u32,
    /// Low temperature keeps the JSON shape stable.
    pub temperature: f64,
    pub timeout: Duration,
}

impl Default for InsightGeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEEPSEEK_MODEL.to_string(),
            max_tokens: 400,
            temperature: 0.3,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

pub struct DeepSeekInsightGenerator {
    client: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
    config: InsightGeneratorConfig,
}

impl DeepSeekInsightGenerator {
    pub fn new(api_key: &str) -> Result<Self, AiError> {
        Self::with_base_url(DEEPSEEK_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, AiError> {
        Self::with_config(base_url, api_key, InsightGeneratorConfig::default())
    }

    pub fn with_config(
        base_url: &str,
        api_key: &str,
        config: InsightGeneratorConfig,
    ) -> Result<Self, AiError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AiError::MissingApiKey("DEEPSEEK".to_string()));
        }
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| AiError::MissingApiKey("DEEPSEEK".to_string()))?;
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            headers,
            config,
        })
    }

    async fn complete(&self, user_prompt: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(AiError::provider(status.as_u16(), message));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| AiError::invalid_response(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AiError::invalid_response("no completion content"))
    }
}

#[async_trait]
impl InsightGenerator for DeepSeekInsightGenerator {
    fn id(&self) -> &'static str {
        "DEEPSEEK"
    }

    async fn generate(&self, context: &InsightContext) -> coinfolio_core::Result<Insight> {
        let prompt = build_user_prompt(context);
        let result = match self.complete(&prompt).await {
            Ok(content) => parse_insight(&content),
            Err(e) => Err(e),
        };
        match result {
            Ok(insight) => {
                debug!("DeepSeek insight generated ({} holdings)", context.summary.holdings_count);
                Ok(insight)
            }
            Err(e) => {
                warn!("DeepSeek insight generation failed: {}", e);
                Err(e.into())
            }
        }
    }
}
