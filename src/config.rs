//! Configuration loaded from the environment (and `.env`).

use crate::adapters::providers::{ProviderCatalog, ProviderSettings};
use crate::domain::content::ProviderKind;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Service configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Root of uploaded and generated media
    pub upload_dir: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub espeak_path: PathBuf,
    /// Video pipelines allowed to run at once
    pub max_concurrent_videos: usize,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout: Duration,
    /// Priority of remote text providers for `auto` selection
    pub provider_order: Vec<ProviderKind>,
    pub providers: ProviderCatalog,
    pub pexels_api_key: Option<String>,
    pub pexels_base_url: String,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: String,
    pub elevenlabs_base_url: String,
    pub google_tts_url: String,
    pub default_voice: String,
}

/// Unset and blank variables are both treated as absent.
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(name: &str, default: &str) -> String {
    var(name).unwrap_or_else(|| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    var(name).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup()
    }

    fn from_lookup() -> Self {
        let provider_order = var("CONTENT_PROVIDER_ORDER")
            .map(|raw| ProviderKind::parse_list(&raw))
            .filter(|kinds| !kinds.is_empty())
            .unwrap_or_else(|| ProviderKind::PREFERENCE.to_vec());

        Self {
            addr: var_or("ADDR", "127.0.0.1"),
            port: var_or("PORT", "3000"),
            upload_dir: PathBuf::from(var_or("UPLOAD_DIR", "./uploads")),
            ffmpeg_path: PathBuf::from(var_or("FFMPEG_PATH", "ffmpeg")),
            espeak_path: PathBuf::from(var_or("ESPEAK_PATH", "espeak-ng")),
            max_concurrent_videos: parsed_or("MAX_CONCURRENT_VIDEOS", 2usize).max(1),
            http_timeout: Duration::from_secs(parsed_or("HTTP_TIMEOUT_SECS", 60u64)),
            provider_order,
            providers: ProviderCatalog {
                openai: ProviderSettings::new(
                    var("OPENAI_API_KEY"),
                    var_or("OPENAI_MODEL", "gpt-4o-mini"),
                    var_or("OPENAI_BASE_URL", "https://api.openai.com"),
                ),
                gemini: ProviderSettings::new(
                    var("GEMINI_API_KEY"),
                    var_or("GEMINI_MODEL", "gemini-1.5-flash"),
                    var_or("GEMINI_BASE_URL", "https://generativelanguage.googleapis.com"),
                ),
                mistral: ProviderSettings::new(
                    var("MISTRAL_API_KEY"),
                    var_or("MISTRAL_MODEL", "mistral-small-latest"),
                    var_or("MISTRAL_BASE_URL", "https://api.mistral.ai"),
                ),
                huggingface: ProviderSettings::new(
                    var("HUGGINGFACE_API_KEY"),
                    var_or("HUGGINGFACE_MODEL", "mistralai/Mistral-7B-Instruct-v0.2"),
                    var_or("HUGGINGFACE_BASE_URL", "https://api-inference.huggingface.co"),
                ),
            },
            pexels_api_key: var("PEXELS_API_KEY"),
            pexels_base_url: var_or("PEXELS_BASE_URL", "https://api.pexels.com"),
            elevenlabs_api_key: var("ELEVENLABS_API_KEY"),
            elevenlabs_voice_id: var_or("ELEVENLABS_VOICE_ID", "21m00Tcm4TlvDq8ikWAM"),
            elevenlabs_base_url: var_or("ELEVENLABS_BASE_URL", "https://api.elevenlabs.io"),
            google_tts_url: var_or(
                "GOOGLE_TTS_URL",
                "https://translate.google.com/translate_tts",
            ),
            default_voice: var_or("DEFAULT_VOICE", "pt-BR"),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}
