use crate::domain::content::ProviderKind;
use async_trait::async_trait;
use thiserror::Error;

/// Text returned by a remote provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub tokens_used: Option<u32>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("missing API key for {provider}")]
    MissingApiKey { provider: ProviderKind },

    #[error("{provider} returned HTTP {status}: {body}")]
    Http {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid response from {provider}: {reason}")]
    InvalidResponse {
        provider: ProviderKind,
        reason: String,
    },
}

/// One remote text-generation backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether credentials are present; unconfigured providers are skipped.
    fn is_configured(&self) -> bool;

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, ProviderError>;
}
