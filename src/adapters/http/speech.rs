use super::error::{ok, ApiError, ApiResult};
use super::AppState;
use crate::adapters::local::tts_cache::CacheStats;
use crate::application::narration::SynthesizerStatus;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    audio_url: String,
    provider: String,
    cached: bool,
    voice: String,
}

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> ApiResult<SpeechResponse> {
    let Json(request) = payload?;
    let voice = request
        .voice
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| state.default_voice.clone());

    let narration = state.narration.narrate(&request.text, &voice).await?;
    let audio_url = state
        .layout
        .public_url(&narration.path)
        .ok_or_else(|| ApiError::Internal("narration stored outside the upload directory".into()))?;

    Ok(ok(SpeechResponse {
        audio_url,
        provider: narration.provider,
        cached: narration.cached,
        voice,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechStatus {
    cache: CacheStats,
    synthesizers: Vec<SynthesizerStatus>,
    default_voice: String,
}

pub async fn status(State(state): State<AppState>) -> ApiResult<SpeechStatus> {
    Ok(ok(SpeechStatus {
        cache: state.narration.cache_stats().await?,
        synthesizers: state.narration.synthesizers(),
        default_voice: state.default_voice.clone(),
    }))
}
