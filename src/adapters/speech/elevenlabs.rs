use crate::ports::speech::{SpeechError, SpeechSynthesizer};
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use tracing::debug;

const NAME: &str = "elevenlabs";

/// ElevenLabs multilingual voices. The request voice only selects the
/// language; the account voice id is fixed by configuration.
pub struct ElevenLabs {
    api_key: Option<String>,
    voice_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl ElevenLabs {
    pub fn new(
        api_key: Option<String>,
        voice_id: impl Into<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            voice_id: voice_id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabs {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn synthesize(&self, text: &str, _voice: &str, output: &Path) -> Result<(), SpeechError> {
        let key = self.api_key.as_deref().ok_or(SpeechError::NotConfigured {
            provider: NAME.to_string(),
        })?;
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);
        debug!(voice_id = %self.voice_id, chars = text.chars().count(), "elevenlabs request");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&json!({
                "text": text,
                "model_id": "eleven_multilingual_v2",
                "voice_settings": {"stability": 0.5, "similarity_boost": 0.75}
            }))
            .send()
            .await
            .map_err(|source| SpeechError::Transport {
                provider: NAME.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SpeechError::Http {
                provider: NAME.to_string(),
                status: response.status().as_u16(),
            });
        }
        let audio = response.bytes().await.map_err(|source| SpeechError::Transport {
            provider: NAME.to_string(),
            source,
        })?;
        if audio.is_empty() {
            return Err(SpeechError::Synthesis {
                provider: NAME.to_string(),
                reason: "empty audio".to_string(),
            });
        }
        tokio::fs::write(output, &audio).await?;
        Ok(())
    }
}
