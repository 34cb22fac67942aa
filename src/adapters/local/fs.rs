//! Upload directory layout and file helpers.

use axum::body::Bytes;
use axum::BoxError;
use futures::{Stream, TryStreamExt};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::{fs::File, io::BufWriter};
use tokio_util::io::StreamReader;
use tracing::warn;

pub const IMAGES_DIR: &str = "images";
pub const AUDIO_DIR: &str = "audio";
pub const VIDEOS_DIR: &str = "videos";
pub const TTS_CACHE_DIR: &str = "tts-cache";
pub const TMP_DIR: &str = "tmp";

/// Subdirectories of the upload root, created at startup.
#[derive(Debug, Clone)]
pub struct UploadLayout {
    pub root: PathBuf,
}

impl UploadLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn images(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn audio(&self) -> PathBuf {
        self.root.join(AUDIO_DIR)
    }

    pub fn videos(&self) -> PathBuf {
        self.root.join(VIDEOS_DIR)
    }

    pub fn tts_cache(&self) -> PathBuf {
        self.root.join(TTS_CACHE_DIR)
    }

    pub fn tmp(&self) -> PathBuf {
        self.root.join(TMP_DIR)
    }

    pub async fn ensure(&self) -> io::Result<()> {
        for dir in [
            self.images(),
            self.audio(),
            self.videos(),
            self.tts_cache(),
            self.tmp(),
        ] {
            tokio::fs::create_dir_all(&dir).await?;
        }
        Ok(())
    }

    /// Resolve a client-supplied relative path inside the upload root.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        if relative.trim().is_empty() || !path_is_valid(path) {
            warn!(path = relative, "rejected upload path");
            return None;
        }
        Some(self.root.join(path))
    }

    /// Public URL for a file below the upload root.
    pub fn public_url(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        Some(format!("/uploads/{}", parts.join("/")))
    }
}

/// Only plain relative paths are accepted: no `..`, no root, no drive prefix.
pub fn path_is_valid(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Keep only the final file name of an uploaded file, replacing anything
/// outside `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Save a `Stream` to a file.
pub async fn stream_to_file<S, E>(path: &Path, stream: S) -> io::Result<()>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let body_with_io_error = stream.map_err(io::Error::other);
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = BufWriter::new(File::create(path).await?);
    tokio::io::copy(&mut body_reader, &mut file).await?;
    tokio::io::AsyncWriteExt::flush(&mut file).await?;

    Ok(())
}
