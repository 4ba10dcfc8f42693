use crate::config::toml_config::CompletionSettings;
use crate::domain::model::{CompletionResult, PromptPayload};
use crate::domain::ports::CompletionModel;
use crate::utils::error::{Result, ReviewError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const SERVICE: &str = "Anthropic";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    settings: CompletionSettings,
}

#[derive(Debug, Clone, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicClient {
    pub fn new(api_key: &str, settings: CompletionSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            settings,
        })
    }
}

#[async_trait]
impl CompletionModel for AnthropicClient {
    async fn complete(&self, prompt: &PromptPayload) -> Result<CompletionResult> {
        let request = ApiRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt.as_str(),
            }],
        };

        let url = format!("{}/v1/messages", self.settings.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ReviewError::upstream(SERVICE, format!("failed to send request: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::upstream(
                SERVICE,
                format!("API error ({}): {}", status, body),
            ));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            ReviewError::upstream(SERVICE, format!("failed to parse response: {}", e))
        })?;

        let text = api_response
            .content
            .into_iter()
            .find(|block| block.content_type == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| ReviewError::upstream(SERVICE, "response has no text content"))?;

        let usage = api_response.usage.unwrap_or_default();
        Ok(CompletionResult {
            text,
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
        })
    }
}
