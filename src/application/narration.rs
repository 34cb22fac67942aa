//! Cached narration over a chain of speech synthesizers.

use crate::adapters::local::tts_cache::{CacheStats, TtsCache};
use crate::ports::speech::{SpeechError, SpeechSynthesizer};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Narration {
    pub path: PathBuf,
    pub provider: String,
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizerStatus {
    pub name: String,
    pub available: bool,
}

pub struct NarrationService {
    cache: TtsCache,
    synthesizers: Vec<Arc<dyn SpeechSynthesizer>>,
    scratch_dir: PathBuf,
}

impl NarrationService {
    pub fn new(
        cache: TtsCache,
        synthesizers: Vec<Arc<dyn SpeechSynthesizer>>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cache,
            synthesizers,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub async fn narrate(&self, text: &str, voice: &str) -> Result<Narration, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        if let Some(path) = self.cache.get(text, voice).await {
            return Ok(Narration {
                path,
                provider: "cache".to_string(),
                cached: true,
            });
        }

        tokio::fs::create_dir_all(&self.scratch_dir).await?;
        let scratch = self.scratch_dir.join(format!("tts-{}.mp3", Uuid::new_v4()));
        let mut attempts = Vec::new();

        for synthesizer in self.synthesizers.iter().filter(|s| s.is_available()) {
            match synthesizer.synthesize(text, voice, &scratch).await {
                Ok(()) => {
                    let stored = self.store(text, voice, &scratch).await;
                    let _ = tokio::fs::remove_file(&scratch).await;
                    let path = stored?;
                    info!(
                        provider = synthesizer.name(),
                        path = %path.display(),
                        "narration synthesized"
                    );
                    return Ok(Narration {
                        path,
                        provider: synthesizer.name().to_string(),
                        cached: false,
                    });
                }
                Err(e) => {
                    warn!(provider = synthesizer.name(), error = %e, "speech synthesizer failed");
                    attempts.push(format!("{}: {}", synthesizer.name(), e));
                }
            }
        }

        let _ = tokio::fs::remove_file(&scratch).await;
        Err(SpeechError::AllFailed { attempts })
    }

    async fn store(&self, text: &str, voice: &str, scratch: &Path) -> Result<PathBuf, SpeechError> {
        Ok(self.cache.set(text, voice, scratch).await?)
    }

    pub async fn cache_stats(&self) -> Result<CacheStats, SpeechError> {
        Ok(self.cache.stats().await?)
    }

    pub fn synthesizers(&self) -> Vec<SynthesizerStatus> {
        self.synthesizers
            .iter()
            .map(|s| SynthesizerStatus {
                name: s.name().to_string(),
                available: s.is_available(),
            })
            .collect()
    }
}
