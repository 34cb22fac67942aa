//! Content-addressed narration cache on local disk.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
}

/// One `<sha256>.mp3` file per (text, voice) pair. Entries are never evicted.
#[derive(Debug, Clone)]
pub struct TtsCache {
    dir: PathBuf,
}

impl TtsCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Hex SHA-256 of the raw text followed by the voice id.
    pub fn key(text: &str, voice: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(voice.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn path_for(&self, text: &str, voice: &str) -> PathBuf {
        self.dir.join(format!("{}.mp3", Self::key(text, voice)))
    }

    pub async fn get(&self, text: &str, voice: &str) -> Option<PathBuf> {
        let path = self.path_for(text, voice);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                debug!(path = %path.display(), "tts cache hit");
                Some(path)
            }
            _ => None,
        }
    }

    /// Copy `source` into the cache and return the cached path.
    pub async fn set(&self, text: &str, voice: &str, source: &Path) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(text, voice);
        if source != path {
            tokio::fs::copy(source, &path).await?;
        }
        debug!(path = %path.display(), "tts cache stored");
        Ok(path)
    }

    pub async fn stats(&self) -> io::Result<CacheStats> {
        let mut stats = CacheStats::default();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(e),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mp3") {
                continue;
            }
            let meta = entry.metadata().await?;
            if meta.is_file() {
                stats.entries += 1;
                stats.total_bytes += meta.len();
            }
        }
        Ok(stats)
    }
}
