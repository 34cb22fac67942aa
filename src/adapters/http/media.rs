use super::error::{ok, ApiError, ApiResult};
use super::AppState;
use crate::ports::stock::{StockMediaSource, StockPhoto, StockVideo};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Photos,
    Videos,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchResults {
    Photos { photos: Vec<StockPhoto> },
    Videos { videos: Vec<StockVideo> },
}

pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SearchResults> {
    let Query(params) = params?;
    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".into()));
    }
    if !state.stock.is_configured() {
        return Err(ApiError::Unavailable("stock media is not configured".into()));
    }
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);
    let results = match params.kind {
        MediaKind::Photos => SearchResults::Photos {
            photos: state.stock.search_photos(query, per_page).await?,
        },
        MediaKind::Videos => SearchResults::Videos {
            videos: state.stock.search_videos(query, per_page).await?,
        },
    };
    Ok(ok(results))
}
