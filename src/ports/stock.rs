use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPhoto {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub photographer: String,
    pub page_url: String,
    /// Best download URL for a portrait short.
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockVideo {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub duration: u32,
    pub page_url: String,
    pub download_url: String,
}

#[derive(Debug, Error)]
pub enum StockError {
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),

    #[error("stock media request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("stock media service returned HTTP {0}")]
    Http(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Search and download of licensed stock media.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockMediaSource: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn search_photos(
        &self,
        query: &str,
        per_page: u32,
    ) -> Result<Vec<StockPhoto>, StockError>;

    async fn search_videos(
        &self,
        query: &str,
        per_page: u32,
    ) -> Result<Vec<StockVideo>, StockError>;

    async fn download(&self, url: &str, dest: &Path) -> Result<(), StockError>;
}
