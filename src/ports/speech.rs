use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("{provider} is not configured")]
    NotConfigured { provider: String },

    #[error("{provider} returned HTTP {status}")]
    Http { provider: String, status: u16 },

    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} failed: {reason}")]
    Synthesis { provider: String, reason: String },

    #[error("text to synthesize is empty")]
    EmptyText,

    #[error("every speech provider failed: {}", .attempts.join("; "))]
    AllFailed { attempts: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A text-to-speech backend writing an MP3 file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    async fn synthesize(&self, text: &str, voice: &str, output: &Path) -> Result<(), SpeechError>;
}

/// Language code for a voice id such as `pt-BR-Wavenet-A` (gives `pt-BR`).
pub fn voice_language(voice: &str) -> String {
    let mut parts = voice.split('-');
    match (parts.next(), parts.next()) {
        (Some(lang), Some(region)) if lang.len() == 2 && region.len() == 2 => {
            format!("{}-{}", lang.to_lowercase(), region.to_uppercase())
        }
        (Some(lang), _) if lang.len() == 2 => lang.to_lowercase(),
        _ => "pt-BR".to_string(),
    }
}
