use super::{check_status, invalid, transport, ProviderSettings};
use crate::domain::content::ProviderKind;
use crate::ports::content::{Completion, ContentProvider, ProviderError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const KIND: ProviderKind = ProviderKind::Gemini;

/// Google Generative Language `generateContent`.
pub struct GeminiProvider {
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(settings: ProviderSettings, client: reqwest::Client) -> Self {
        Self { settings, client }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, ProviderError> {
        let key = self.settings.key(KIND)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        );
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {"maxOutputTokens": max_tokens, "temperature": 0.7}
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(transport(KIND))?;
        let response = check_status(KIND, response).await?;
        let parsed: GenerateResponse = response.json().await.map_err(transport(KIND))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| invalid(KIND, "no candidate text"))?;

        Ok(Completion {
            text,
            tokens_used: parsed.usage_metadata.and_then(|u| u.total_token_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_parses_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "g-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Olá mundo"}]}}],
                "usageMetadata": {"totalTokenCount": 7}
            })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(
            ProviderSettings::new(Some("g-key".into()), "gemini-1.5-flash", server.uri()),
            reqwest::Client::new(),
        );
        let completion = provider.complete("oi", 50).await.unwrap();
        assert_eq!(completion.text, "Olá mundo");
        assert_eq!(completion.tokens_used, Some(7));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(
            ProviderSettings::new(Some("k".into()), "m", server.uri()),
            reqwest::Client::new(),
        );
        assert!(matches!(
            provider.complete("oi", 50).await,
            Err(ProviderError::InvalidResponse { .. })
        ));
    }
}
