use super::error::{ok, ApiError, ApiResult, Envelope};
use super::AppState;
use crate::adapters::local::fs::{sanitize_file_name, stream_to_file, UploadLayout};
use crate::domain::av::spec::{
    Background, Canvas, NarrationSpec, VideoSpec, DEFAULT_IMAGE_DURATION, DEFAULT_STOCK_COUNT,
};
use crate::domain::jobs::{JobCounts, VideoJob};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

/// JSON request; file paths are relative to the upload directory.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub background_video: Option<String>,
    #[serde(default)]
    pub stock_query: Option<String>,
    #[serde(default)]
    pub stock_count: Option<usize>,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub narration: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub image_duration: Option<f64>,
    #[serde(default)]
    pub transition: Option<f64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<u32>,
}

fn existing_file(layout: &UploadLayout, relative: &str) -> Result<PathBuf, ApiError> {
    let path = layout
        .resolve(relative)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid path '{}'", relative)))?;
    if !path.is_file() {
        return Err(ApiError::BadRequest(format!("file not found: {}", relative)));
    }
    Ok(path)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl VideoRequest {
    /// Resolve paths and defaults. Images win over a background video,
    /// which wins over a stock query.
    pub fn into_spec(
        self,
        layout: &UploadLayout,
        default_voice: &str,
    ) -> Result<VideoSpec, ApiError> {
        let background = if !self.images.is_empty() {
            Background::Images(
                self.images
                    .iter()
                    .map(|p| existing_file(layout, p))
                    .collect::<Result<_, _>>()?,
            )
        } else if let Some(video) = non_blank(self.background_video) {
            Background::Video(existing_file(layout, &video)?)
        } else if let Some(query) = non_blank(self.stock_query) {
            Background::Stock {
                query,
                count: self.stock_count.unwrap_or(DEFAULT_STOCK_COUNT),
            }
        } else {
            Background::Images(Vec::new())
        };

        let audio = non_blank(self.audio)
            .map(|a| existing_file(layout, &a))
            .transpose()?;
        let narration = non_blank(self.narration).map(|text| NarrationSpec {
            text,
            voice: non_blank(self.voice).unwrap_or_else(|| default_voice.to_string()),
        });

        let defaults = Canvas::default();
        Ok(VideoSpec {
            title: self.title,
            background,
            audio,
            narration,
            image_duration: self.image_duration.unwrap_or(DEFAULT_IMAGE_DURATION),
            transition: self.transition,
            canvas: Canvas {
                width: self.width.unwrap_or(defaults.width),
                height: self.height.unwrap_or(defaults.height),
                fps: self.fps.unwrap_or(defaults.fps),
            },
        })
    }
}

type Accepted = (StatusCode, Json<Envelope<VideoJob>>);

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Accepted, ApiError> {
    let Json(request) = payload?;
    let spec = request.into_spec(&state.layout, &state.default_voice)?;
    let job = state.videos.generate_video(spec).await?;
    Ok((StatusCode::ACCEPTED, ok(job)))
}

/// Multipart form: `images` files (repeatable), optional `audio` file and
/// text fields `title`, `narration`, `voice`, `imageDuration`, `transition`.
pub async fn create_with_images(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Accepted, ApiError> {
    let mut saved = Vec::new();
    let result = accept_uploads(&state, multipart, &mut saved).await;
    if result.is_err() {
        for path in &saved {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!(file = %path.display(), error = %e, "could not remove rejected upload");
            }
        }
    }
    result
}

async fn accept_uploads(
    state: &AppState,
    mut multipart: Multipart,
    saved: &mut Vec<PathBuf>,
) -> Result<Accepted, ApiError> {
    let batch = Uuid::new_v4().to_string();
    let mut request = VideoRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" | "images[]" | "audio" => {
                let Some(file_name) = field.file_name().map(sanitize_file_name) else {
                    continue;
                };
                let (dir, subdir) = if name == "audio" {
                    (state.layout.audio(), "audio")
                } else {
                    (state.layout.images(), "images")
                };
                let stored = format!("{}-{}", batch, file_name);
                let path = dir.join(&stored);
                saved.push(path.clone());
                stream_to_file(&path, field).await?;
                info!(file = %stored, "upload saved");

                let relative = format!("{}/{}", subdir, stored);
                if name == "audio" {
                    request.audio = Some(relative);
                } else {
                    request.images.push(relative);
                }
            }
            "title" => request.title = field.text().await?,
            "narration" => request.narration = Some(field.text().await?),
            "voice" => request.voice = Some(field.text().await?),
            "imageDuration" => {
                request.image_duration = Some(parse_number(&field.text().await?)?)
            }
            "transition" => request.transition = Some(parse_number(&field.text().await?)?),
            _ => {}
        }
    }

    if request.images.is_empty() {
        return Err(ApiError::BadRequest("at least one image is required".into()));
    }
    if request.title.trim().is_empty() {
        request.title = format!("video-{}", &batch[..8]);
    }
    let spec = request.into_spec(&state.layout, &state.default_voice)?;
    let job = state.videos.generate_video(spec).await?;
    Ok((StatusCode::ACCEPTED, ok(job)))
}

fn parse_number(raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("'{}' is not a number", raw)))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<VideoJob>> {
    Ok(ok(state.videos.list_videos().await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    #[serde(flatten)]
    counts: JobCounts,
    total: usize,
}

pub async fn queue_status(State(state): State<AppState>) -> ApiResult<QueueStatus> {
    let counts = state.videos.counts().await?;
    Ok(ok(QueueStatus {
        total: counts.total(),
        counts,
    }))
}

pub async fn job_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<VideoJob> {
    state
        .videos
        .get_video_status(&id)
        .await?
        .map(ok)
        .ok_or_else(|| ApiError::NotFound(format!("video {} not found", id)))
}

#[derive(Debug, Serialize)]
pub struct FfmpegProbe {
    available: bool,
    version: String,
}

pub async fn test_ffmpeg(State(state): State<AppState>) -> ApiResult<FfmpegProbe> {
    let version = state.videos.ffmpeg_version().await.map_err(|e| {
        ApiError::Unavailable(format!("ffmpeg is not available: {}", e))
    })?;
    Ok(ok(FfmpegProbe {
        available: true,
        version,
    }))
}
