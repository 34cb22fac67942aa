//! HTTP clients for the remote text-generation APIs.

mod gemini;
mod huggingface;
mod openai;

pub use gemini::GeminiProvider;
pub use huggingface::HuggingFaceProvider;
pub use openai::ChatCompletionsProvider;

use crate::domain::content::ProviderKind;
use crate::ports::content::{ContentProvider, ProviderError};
use std::sync::Arc;

/// Credentials and endpoint of one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl ProviderSettings {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn key(&self, provider: ProviderKind) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey { provider })
    }
}

/// Settings for every provider, indexed by kind.
#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog {
    pub openai: ProviderSettings,
    pub gemini: ProviderSettings,
    pub mistral: ProviderSettings,
    pub huggingface: ProviderSettings,
}

impl ProviderCatalog {
    /// Instantiate providers in the given priority order.
    pub fn build(
        &self,
        order: &[ProviderKind],
        client: &reqwest::Client,
    ) -> Vec<Arc<dyn ContentProvider>> {
        order
            .iter()
            .map(|kind| -> Arc<dyn ContentProvider> {
                match kind {
                    ProviderKind::OpenAi => Arc::new(ChatCompletionsProvider::new(
                        ProviderKind::OpenAi,
                        self.openai.clone(),
                        client.clone(),
                    )),
                    ProviderKind::Mistral => Arc::new(ChatCompletionsProvider::new(
                        ProviderKind::Mistral,
                        self.mistral.clone(),
                        client.clone(),
                    )),
                    ProviderKind::Gemini => {
                        Arc::new(GeminiProvider::new(self.gemini.clone(), client.clone()))
                    }
                    ProviderKind::HuggingFace => Arc::new(HuggingFaceProvider::new(
                        self.huggingface.clone(),
                        client.clone(),
                    )),
                }
            })
            .collect()
    }
}

/// Turn a non-2xx response into `ProviderError::Http`, keeping a short body.
pub(crate) async fn check_status(
    provider: ProviderKind,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Http {
        provider,
        status: status.as_u16(),
        body: body.chars().take(300).collect(),
    })
}

pub(crate) fn transport(provider: ProviderKind) -> impl FnOnce(reqwest::Error) -> ProviderError {
    move |source| ProviderError::Transport { provider, source }
}

pub(crate) fn invalid(provider: ProviderKind, reason: impl Into<String>) -> ProviderError {
    ProviderError::InvalidResponse {
        provider,
        reason: reason.into(),
    }
}
