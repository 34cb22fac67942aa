//! Pexels photo and video search.

use crate::ports::stock::{StockError, StockMediaSource, StockPhoto, StockVideo};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const NAME: &str = "pexels";

pub struct Pexels {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl Pexels {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &str,
        per_page: u32,
    ) -> Result<T, StockError> {
        let key = self.api_key.as_deref().ok_or(StockError::MissingApiKey(NAME))?;
        let per_page = per_page.clamp(1, 80).to_string();
        debug!(path, query, "pexels search");
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(reqwest::header::AUTHORIZATION, key)
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "portrait"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StockError::Http(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[derive(Deserialize)]
struct PhotoPage {
    #[serde(default)]
    photos: Vec<PhotoItem>,
}

#[derive(Deserialize)]
struct PhotoItem {
    id: u64,
    width: u32,
    height: u32,
    #[serde(default)]
    photographer: String,
    url: String,
    src: PhotoSources,
}

#[derive(Deserialize)]
struct PhotoSources {
    original: String,
    portrait: Option<String>,
    large2x: Option<String>,
}

#[derive(Deserialize)]
struct VideoPage {
    #[serde(default)]
    videos: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    id: u64,
    width: u32,
    height: u32,
    duration: u32,
    url: String,
    #[serde(default)]
    video_files: Vec<VideoFile>,
}

#[derive(Deserialize)]
struct VideoFile {
    link: String,
    width: Option<u32>,
    height: Option<u32>,
}

impl From<PhotoItem> for StockPhoto {
    fn from(item: PhotoItem) -> Self {
        let download_url = item
            .src
            .portrait
            .or(item.src.large2x)
            .unwrap_or(item.src.original);
        StockPhoto {
            id: item.id,
            width: item.width,
            height: item.height,
            photographer: item.photographer,
            page_url: item.url,
            download_url,
        }
    }
}

impl VideoItem {
    /// Largest portrait rendition up to 1080p wide, else the first file.
    fn best_file(&self) -> Option<&VideoFile> {
        self.video_files
            .iter()
            .filter(|f| matches!((f.width, f.height), (Some(w), Some(h)) if h >= w && w <= 1080))
            .max_by_key(|f| f.width.unwrap_or(0))
            .or_else(|| self.video_files.first())
    }
}

#[async_trait]
impl StockMediaSource for Pexels {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search_photos(
        &self,
        query: &str,
        per_page: u32,
    ) -> Result<Vec<StockPhoto>, StockError> {
        let page: PhotoPage = self.get("/v1/search", query, per_page).await?;
        Ok(page.photos.into_iter().map(StockPhoto::from).collect())
    }

    async fn search_videos(
        &self,
        query: &str,
        per_page: u32,
    ) -> Result<Vec<StockVideo>, StockError> {
        let page: VideoPage = self.get("/videos/search", query, per_page).await?;
        Ok(page
            .videos
            .iter()
            .filter_map(|v| {
                v.best_file().map(|file| StockVideo {
                    id: v.id,
                    width: v.width,
                    height: v.height,
                    duration: v.duration,
                    page_url: v.url.clone(),
                    download_url: file.link.clone(),
                })
            })
            .collect())
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), StockError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(StockError::Http(response.status().as_u16()));
        }
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut response = response;
        let mut file = tokio::fs::File::create(dest).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pexels(server: &MockServer) -> Pexels {
        Pexels::new(Some("px-key".into()), server.uri(), reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_search_photos_prefers_portrait() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("authorization", "px-key"))
            .and(query_param("query", "café"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "photos": [{
                    "id": 1, "width": 3000, "height": 4000, "photographer": "Ana",
                    "url": "https://pexels.com/photo/1",
                    "src": {"original": "https://img/orig.jpg", "portrait": "https://img/p.jpg"}
                }]
            })))
            .mount(&server)
            .await;

        let photos = pexels(&server).search_photos("café", 5).await.unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].download_url, "https://img/p.jpg");
    }

    #[tokio::test]
    async fn test_search_videos_picks_portrait_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "videos": [{
                    "id": 9, "width": 1080, "height": 1920, "duration": 12,
                    "url": "https://pexels.com/video/9",
                    "video_files": [
                        {"link": "https://v/land.mp4", "width": 1920, "height": 1080},
                        {"link": "https://v/small.mp4", "width": 540, "height": 960},
                        {"link": "https://v/hd.mp4", "width": 1080, "height": 1920}
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let videos = pexels(&server).search_videos("mar", 3).await.unwrap();
        assert_eq!(videos[0].download_url, "https://v/hd.mp4");
    }

    #[tokio::test]
    async fn test_missing_key() {
        let source = Pexels::new(None, "http://localhost", reqwest::Client::new());
        assert!(matches!(
            source.search_photos("x", 1).await,
            Err(StockError::MissingApiKey("pexels"))
        ));
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpegdata".to_vec()))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("stock").join("0.jpg");
        pexels(&server)
            .download(&format!("{}/img.jpg", server.uri()), &dest)
            .await
            .unwrap();
        assert_eq!(std::fs::read(dest).unwrap(), b"jpegdata");
    }
}
