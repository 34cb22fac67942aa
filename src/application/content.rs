//! Provider selection with local fallback.

use crate::domain::content::{
    GenerationRequest, GenerationResult, ProviderKind, ProviderSelector, TextMetrics,
};
use crate::domain::local_text::{LocalTextGenerator, LocalTextOptions};
use crate::ports::content::ContentProvider;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("theme must not be empty")]
    EmptyTheme,

    #[error("provider {0} is not available")]
    UnknownProvider(ProviderKind),

    #[error("all content providers failed: {}", .attempts.join("; "))]
    AllProvidersFailed { attempts: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub name: String,
    pub configured: bool,
    pub priority: usize,
}

pub struct ContentOrchestrator {
    providers: Vec<Arc<dyn ContentProvider>>,
    local: LocalTextGenerator,
    rng: Mutex<StdRng>,
}

impl ContentOrchestrator {
    /// `providers` are tried in the given order when the selector is `auto`.
    pub fn new(providers: Vec<Arc<dyn ContentProvider>>) -> Self {
        Self::with_rng(providers, StdRng::from_entropy())
    }

    pub fn with_rng(providers: Vec<Arc<dyn ContentProvider>>, rng: StdRng) -> Self {
        Self {
            providers,
            local: LocalTextGenerator::new(),
            rng: Mutex::new(rng),
        }
    }

    fn candidates(
        &self,
        selector: ProviderSelector,
    ) -> Result<Vec<Arc<dyn ContentProvider>>, ContentError> {
        match selector {
            ProviderSelector::Auto => Ok(self.providers.clone()),
            ProviderSelector::Only(kind) => self
                .providers
                .iter()
                .find(|p| p.kind() == kind)
                .map(|p| vec![Arc::clone(p)])
                .ok_or(ContentError::UnknownProvider(kind)),
        }
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ContentError> {
        if request.theme.trim().is_empty() {
            return Err(ContentError::EmptyTheme);
        }
        let prompt = request.prompt();
        let max_tokens = request.max_tokens();
        let mut attempts = Vec::new();

        let candidates = match self.candidates(request.provider) {
            Ok(candidates) => candidates,
            Err(e) if request.use_fallback => {
                attempts.push(e.to_string());
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        for provider in candidates {
            let kind = provider.kind();
            if !provider.is_configured() {
                attempts.push(format!("{}: not configured", kind));
                continue;
            }
            match provider.complete(&prompt, max_tokens).await {
                Ok(completion) => {
                    let metrics = TextMetrics::of(&completion.text);
                    info!(provider = %kind, words = metrics.words, "content generated");
                    return Ok(GenerationResult {
                        content: completion.text,
                        title: None,
                        used_provider: kind.to_string(),
                        used_fallback: false,
                        tokens_used: completion.tokens_used.or(Some(metrics.tokens_estimate)),
                        word_count: metrics.words,
                        reading_minutes: metrics.reading_minutes,
                        request_id: Uuid::new_v4().to_string(),
                    });
                }
                Err(e) => {
                    warn!(provider = %kind, error = %e, "content provider failed");
                    attempts.push(e.to_string());
                }
            }
        }

        if !request.use_fallback {
            return Err(ContentError::AllProvidersFailed { attempts });
        }
        warn!(attempts = attempts.len(), "falling back to local generator");
        Ok(self.generate_local(request))
    }

    /// Local generator only, no remote calls.
    pub fn generate_local(&self, request: &GenerationRequest) -> GenerationResult {
        let options = LocalTextOptions {
            size: request.size,
            tone: request.tone(),
        };
        let context = format!(
            "{} {}",
            request.target_audience.as_deref().unwrap_or_default(),
            request.keywords.join(" ")
        );
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        self.local
            .generate(&request.theme, &context, &options, &mut *rng)
    }

    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .enumerate()
            .map(|(i, p)| ProviderStatus {
                name: p.kind().to_string(),
                configured: p.is_configured(),
                priority: i + 1,
            })
            .collect()
    }
}
