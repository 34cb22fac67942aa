use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobTransitionError {
    #[error("job {id} is already {status:?}")]
    AlreadyTerminal { id: String, status: JobStatus },
}

/// A unit of video-generation work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoJob {
    pub id: String,
    pub title: String,
    pub status: JobStatus,
    pub progress: u8,
    pub output_url: Option<String>,
    pub error_message: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl VideoJob {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            status: JobStatus::Processing,
            progress: 0,
            output_url: None,
            error_message: None,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    fn ensure_processing(&self) -> Result<(), JobTransitionError> {
        if self.status.is_terminal() {
            return Err(JobTransitionError::AlreadyTerminal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }

    /// Raise progress; lower values are ignored so progress never goes back.
    pub fn advance(&mut self, progress: u8) -> Result<(), JobTransitionError> {
        self.ensure_processing()?;
        self.progress = self.progress.max(progress.min(100));
        Ok(())
    }

    pub fn complete(&mut self, output_url: impl Into<String>) -> Result<(), JobTransitionError> {
        self.ensure_processing()?;
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.output_url = Some(output_url.into());
        self.end_time = Some(Utc::now());
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), JobTransitionError> {
        self.ensure_processing()?;
        self.status = JobStatus::Failed;
        self.error_message = Some(message.into());
        self.end_time = Some(Utc::now());
        Ok(())
    }
}

/// Per-status counters exposed on the status endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCounts {
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl JobCounts {
    pub fn tally<'a>(jobs: impl IntoIterator<Item = &'a VideoJob>) -> Self {
        let mut counts = Self::default();
        for job in jobs {
            match job.status {
                JobStatus::Processing => counts.processing += 1,
                JobStatus::Completed => counts.completed += 1,
                JobStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.processing + self.completed + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_monotonic() {
        let mut job = VideoJob::new("demo");
        job.advance(40).unwrap();
        job.advance(20).unwrap();
        assert_eq!(job.progress, 40);
        job.advance(250).unwrap();
        assert_eq!(job.progress, 100);
    }

    #[test]
    fn test_completed_job_is_frozen() {
        let mut job = VideoJob::new("demo");
        job.complete("/uploads/videos/a.mp4").unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert!(job.end_time.is_some());

        assert!(job.advance(10).is_err());
        assert!(job.fail("late").is_err());
        assert!(job.complete("/other.mp4").is_err());
        assert_eq!(job.output_url.as_deref(), Some("/uploads/videos/a.mp4"));
        assert!(job.error_message.is_none());
    }

    #[test]
    fn test_failed_job_keeps_message_and_progress() {
        let mut job = VideoJob::new("demo");
        job.advance(30).unwrap();
        job.fail("ffmpeg exited with status 1").unwrap();
        assert_eq!(job.progress, 30);
        assert_eq!(
            job.complete("/x.mp4"),
            Err(JobTransitionError::AlreadyTerminal {
                id: job.id.clone(),
                status: JobStatus::Failed
            })
        );
        assert_eq!(job.error_message.as_deref(), Some("ffmpeg exited with status 1"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let job = VideoJob::new("demo");
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["status"], "processing");
        assert!(value.get("startTime").is_some());
        assert!(value.get("outputUrl").is_some());
    }

    #[test]
    fn test_counts() {
        let mut done = VideoJob::new("a");
        done.complete("/a.mp4").unwrap();
        let running = VideoJob::new("b");
        let counts = JobCounts::tally([&done, &running]);
        assert_eq!(counts, JobCounts { processing: 1, completed: 1, failed: 0 });
        assert_eq!(counts.total(), 2);
    }
}
