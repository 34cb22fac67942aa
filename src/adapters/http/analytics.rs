use super::error::{ok, ApiResult};
use super::AppState;
use crate::application::analytics::AnalyticsSummary;
use axum::extract::State;

pub async fn summary(State(state): State<AppState>) -> ApiResult<AnalyticsSummary> {
    Ok(ok(state.analytics.summary().await?))
}
