use crate::ports::speech::{voice_language, SpeechError, SpeechSynthesizer};
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

const NAME: &str = "google";

/// The translate endpoint rejects longer inputs.
pub const MAX_CHUNK_CHARS: usize = 200;

/// Google Translate's public TTS endpoint. Each chunk is a separate MP3;
/// MP3 frames can be concatenated directly.
pub struct GoogleTranslateTts {
    url: String,
    client: reqwest::Client,
}

impl GoogleTranslateTts {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    async fn fetch(
        &self,
        chunk: &str,
        lang: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, SpeechError> {
        let transport = |source| SpeechError::Transport {
            provider: NAME.to_string(),
            source,
        };
        let idx = index.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(SpeechError::Http {
                provider: NAME.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.bytes().await.map_err(transport)?.to_vec())
    }
}

/// Split on word boundaries into chunks of at most `max` characters.
/// A single word longer than `max` is cut.
pub fn split_chunks(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let head = word.chars().take(max).collect::<String>();
            word = word.chars().skip(max).collect();
            chunks.push(head);
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        !self.url.is_empty()
    }

    async fn synthesize(&self, text: &str, voice: &str, output: &Path) -> Result<(), SpeechError> {
        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }
        let lang = voice_language(voice);
        debug!(chunks = chunks.len(), lang = %lang, "google tts request");

        let mut audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch(chunk, &lang, index, chunks.len()).await?);
        }
        tokio::fs::write(output, &audio).await?;
        Ok(())
    }
}
