//! OpenAI-compatible chat completions. Mistral exposes the same API shape.

use super::{check_status, invalid, transport, ProviderSettings};
use crate::domain::content::ProviderKind;
use crate::ports::content::{Completion, ContentProvider, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct ChatCompletionsProvider {
    kind: ProviderKind,
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    pub fn new(kind: ProviderKind, settings: ProviderSettings, client: reqwest::Client) -> Self {
        Self {
            kind,
            settings,
            client,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[async_trait]
impl ContentProvider for ChatCompletionsProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, ProviderError> {
        let key = self.settings.key(self.kind)?;
        let url = format!("{}/v1/chat/completions", self.settings.base_url);
        debug!(provider = %self.kind, model = %self.settings.model, "chat completion");

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "Você é um redator de roteiros para vídeos curtos de marketing.",
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await
            .map_err(transport(self.kind))?;
        let response = check_status(self.kind, response).await?;
        let body: ChatResponse = response.json().await.map_err(transport(self.kind))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| invalid(self.kind, "no message content"))?;

        Ok(Completion {
            text,
            tokens_used: body.usage.map(|u| u.total_tokens),
        })
    }
}
