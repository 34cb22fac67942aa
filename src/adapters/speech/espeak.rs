use crate::domain::av::commands::{stderr_tail, transcode_mp3_args};
use crate::ports::media::FfmpegRunner;
use crate::ports::speech::{voice_language, SpeechError, SpeechSynthesizer};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

const NAME: &str = "espeak";

/// Offline voice: `espeak-ng` renders WAV, ffmpeg converts it to MP3.
pub struct Espeak {
    binary: PathBuf,
    ffmpeg: Arc<dyn FfmpegRunner>,
}

impl Espeak {
    pub fn new(binary: impl Into<PathBuf>, ffmpeg: Arc<dyn FfmpegRunner>) -> Self {
        Self {
            binary: binary.into(),
            ffmpeg,
        }
    }

    fn failure(reason: impl Into<String>) -> SpeechError {
        SpeechError::Synthesis {
            provider: NAME.to_string(),
            reason: reason.into(),
        }
    }
}

/// espeak voices use lowercase language tags (`pt-br`).
fn espeak_voice(voice: &str) -> String {
    voice_language(voice).to_lowercase()
}

#[async_trait]
impl SpeechSynthesizer for Espeak {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn synthesize(&self, text: &str, voice: &str, output: &Path) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        let wav = output.with_extension("wav");
        debug!(binary = %self.binary.display(), "espeak synthesis");

        // Text goes through stdin so a leading `-` is never read as an option.
        let mut child = Command::new(&self.binary)
            .arg("-v")
            .arg(espeak_voice(voice))
            .arg("-w")
            .arg(&wav)
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(text.as_bytes()).await {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }
        let result = child.wait_with_output().await?;
        if !result.status.success() {
            return Err(Self::failure(stderr_tail(&result.stderr, 5)));
        }

        let converted = self.ffmpeg.run(transcode_mp3_args(&wav, output)).await;
        let _ = tokio::fs::remove_file(&wav).await;
        let converted = converted?;
        if !converted.status.success() {
            return Err(Self::failure(stderr_tail(&converted.stderr, 5)));
        }
        Ok(())
    }
}
