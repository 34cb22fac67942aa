use super::error::{ok, ApiError, ApiResult};
use super::AppState;
use crate::application::content::ProviderStatus;
use crate::domain::content::{GenerationRequest, GenerationResult};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> ApiResult<GenerationResult> {
    let Json(request) = payload?;
    Ok(ok(state.content.generate(&request).await?))
}

pub async fn generate_local(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> ApiResult<GenerationResult> {
    let Json(request) = payload?;
    if request.theme.trim().is_empty() {
        return Err(ApiError::BadRequest("theme must not be empty".into()));
    }
    Ok(ok(state.content.generate_local(&request)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatus {
    providers: Vec<ProviderStatus>,
    local_available: bool,
}

pub async fn status(State(state): State<AppState>) -> ApiResult<ContentStatus> {
    Ok(ok(ContentStatus {
        providers: state.content.provider_status(),
        local_available: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::router;
    use super::super::testing::*;
    use crate::ports::media::MockFfmpegRunner;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn app(dir: &std::path::Path) -> axum::Router {
        router(state(dir, Arc::new(MockFfmpegRunner::new()), vec![]))
    }

    #[tokio::test]
    async fn test_generate_falls_back_without_providers() {
        let dir = tempdir().unwrap();
        let (status, body) = send(
            app(dir.path()),
            json_request(
                "POST",
                "/api/content/generate",
                json!({"theme": "finanças pessoais", "tamanho": "pequeno"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["usedProvider"], "local");
        assert_eq!(body["data"]["usedFallback"], true);
    }

    #[tokio::test]
    async fn test_generate_without_fallback_is_unavailable() {
        let dir = tempdir().unwrap();
        let (status, body) = send(
            app(dir.path()),
            json_request(
                "POST",
                "/api/content/generate",
                json!({"theme": "tecnologia", "useFallback": false}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_envelope() {
        let dir = tempdir().unwrap();
        let (status, body) = send(
            app(dir.path()),
            json_request("POST", "/api/content/local", json!({"tema": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_status_lists_local() {
        let dir = tempdir().unwrap();
        let (status, body) = send(app(dir.path()), get("/api/content/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["localAvailable"], true);
    }
}
