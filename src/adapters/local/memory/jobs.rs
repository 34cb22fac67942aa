//! In-memory VideoJobRepository implementation.

use crate::domain::jobs::VideoJob;
use crate::ports::repository::{RepositoryError, VideoJobRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

const KIND: &str = "video job";

#[derive(Debug, Default)]
pub struct MemoryJobs {
    jobs: RwLock<HashMap<String, VideoJob>>,
}

impl MemoryJobs {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: &str, apply: F) -> Result<VideoJob, RepositoryError>
    where
        F: FnOnce(&mut VideoJob) -> Result<(), crate::domain::jobs::JobTransitionError>,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found(KIND, id))?;
        apply(job)?;
        Ok(job.clone())
    }
}

#[async_trait]
impl VideoJobRepository for MemoryJobs {
    async fn insert(&self, job: VideoJob) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::Duplicate {
                kind: KIND,
                id: job.id,
            });
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<VideoJob>, RepositoryError> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<VideoJob>, RepositoryError> {
        let mut jobs = self.jobs.read().await.values().cloned().collect::<Vec<_>>();
        jobs.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(jobs)
    }

    async fn set_progress(&self, id: &str, progress: u8) -> Result<VideoJob, RepositoryError> {
        self.update(id, |job| job.advance(progress)).await
    }

    async fn complete(&self, id: &str, output_url: &str) -> Result<VideoJob, RepositoryError> {
        self.update(id, |job| job.complete(output_url)).await
    }

    async fn fail(&self, id: &str, message: &str) -> Result<VideoJob, RepositoryError> {
        self.update(id, |job| job.fail(message)).await
    }
}
