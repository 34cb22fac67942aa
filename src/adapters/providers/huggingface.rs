use super::{check_status, invalid, transport, ProviderSettings};
use crate::domain::content::ProviderKind;
use crate::ports::content::{Completion, ContentProvider, ProviderError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const KIND: ProviderKind = ProviderKind::HuggingFace;

/// HuggingFace Inference API text-generation models.
pub struct HuggingFaceProvider {
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    pub fn new(settings: ProviderSettings, client: reqwest::Client) -> Self {
        Self { settings, client }
    }
}

#[derive(Deserialize)]
struct Generated {
    generated_text: Option<String>,
}

#[async_trait]
impl ContentProvider for HuggingFaceProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, ProviderError> {
        let key = self.settings.key(KIND)?;
        let url = format!("{}/models/{}", self.settings.base_url, self.settings.model);
        let body = json!({
            "inputs": prompt,
            "parameters": {"max_new_tokens": max_tokens, "return_full_text": false}
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(transport(KIND))?;
        let response = check_status(KIND, response).await?;
        let parsed: Vec<Generated> = response.json().await.map_err(transport(KIND))?;

        let raw = parsed
            .into_iter()
            .next()
            .and_then(|g| g.generated_text)
            .ok_or_else(|| invalid(KIND, "no generated_text"))?;
        // Some models echo the prompt even with return_full_text=false.
        let text = raw.strip_prefix(prompt).unwrap_or(&raw).trim().to_string();
        if text.is_empty() {
            return Err(invalid(KIND, "empty generation"));
        }

        Ok(Completion {
            text,
            tokens_used: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_strips_echoed_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/mistralai/Mistral-7B-Instruct-v0.2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"generated_text": "Escreva algo. Texto gerado."}
            ])))
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::new(
            ProviderSettings::new(
                Some("hf_x".into()),
                "mistralai/Mistral-7B-Instruct-v0.2",
                server.uri(),
            ),
            reqwest::Client::new(),
        );
        let completion = provider.complete("Escreva algo.", 50).await.unwrap();
        assert_eq!(completion.text, "Texto gerado.");
        assert_eq!(completion.tokens_used, None);
    }

    #[tokio::test]
    async fn test_model_loading_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "loading"})))
            .mount(&server)
            .await;

        let provider = HuggingFaceProvider::new(
            ProviderSettings::new(Some("hf_x".into()), "m", server.uri()),
            reqwest::Client::new(),
        );
        assert!(matches!(
            provider.complete("x", 10).await,
            Err(ProviderError::Http { status: 503, .. })
        ));
    }
}
