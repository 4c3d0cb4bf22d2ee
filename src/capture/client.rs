use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::CaptureError;

pub const MAX_TOKENS: u32 = 2000;
pub const TEMPERATURE: f32 = 0.1;

/// A vision-capable chat model: one prompt plus one image in, text out.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn complete(&self, prompt: &str, image_url: &str) -> Result<String, CaptureError>;
}

#[derive(Clone)]
pub struct OpenAiVisionModel {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiVisionModel {
    #[must_use]
    pub fn new(api_key: Option<String>, model: String, endpoint: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            endpoint,
        }
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionModel {
    async fn complete(&self, prompt: &str, image_url: &str) -> Result<String, CaptureError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CaptureError::Configuration)?;

        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image_url } }
                ]
            }],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CaptureError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "vision model returned an error");
            return Err(CaptureError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CaptureError::MalformedResult(e.to_string()))?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CaptureError::EmptyResult)
    }
}
