//! Background video assembly: slideshow or background clip, optional
//! narration, audio mux.

use crate::adapters::local::fs::UploadLayout;
use crate::application::narration::NarrationService;
use crate::domain::av::commands::{
    mux_audio_args, slideshow_args, slideshow_duration, stderr_tail,
};
use crate::domain::av::spec::{Background, SpecError, VideoSpec};
use crate::domain::jobs::{JobCounts, VideoJob};
use crate::ports::media::FfmpegRunner;
use crate::ports::repository::{RepositoryError, VideoJobRepository};
use crate::ports::speech::SpeechError;
use crate::ports::stock::{StockError, StockMediaSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

/// Lines of ffmpeg stderr kept as the job error message.
pub const ERROR_TAIL_LINES: usize = 20;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("ffmpeg {stage} failed: {message}")]
    Ffmpeg { stage: &'static str, message: String },

    #[error("ffmpeg {stage} finished without writing {}", .output.display())]
    MissingOutput { stage: &'static str, output: PathBuf },

    #[error("narration failed: {0}")]
    Speech(#[from] SpeechError),

    #[error("stock media failed: {0}")]
    Stock(#[from] StockError),

    #[error("no stock photos found for '{0}'")]
    NoStockResults(String),

    #[error("{0} is not configured")]
    Unavailable(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct VideoPipeline {
    jobs: Arc<dyn VideoJobRepository>,
    ffmpeg: Arc<dyn FfmpegRunner>,
    narration: Option<Arc<NarrationService>>,
    stock: Option<Arc<dyn StockMediaSource>>,
    layout: UploadLayout,
    permits: Arc<Semaphore>,
}

impl VideoPipeline {
    pub fn new(
        jobs: Arc<dyn VideoJobRepository>,
        ffmpeg: Arc<dyn FfmpegRunner>,
        layout: UploadLayout,
        max_concurrent: usize,
    ) -> Self {
        Self {
            jobs,
            ffmpeg,
            narration: None,
            stock: None,
            layout,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn with_narration(mut self, narration: Arc<NarrationService>) -> Self {
        self.narration = Some(narration);
        self
    }

    pub fn with_stock(mut self, stock: Arc<dyn StockMediaSource>) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Validate and register a job, then assemble it on a background task.
    /// The returned job is still `processing`.
    pub async fn generate_video(&self, spec: VideoSpec) -> Result<VideoJob, VideoError> {
        spec.validate()?;
        let job = VideoJob::new(spec.title.trim());
        self.jobs.insert(job.clone()).await?;
        info!(job_id = %job.id, title = %job.title, "video job accepted");

        let pipeline = self.clone();
        let id = job.id.clone();
        tokio::spawn(async move {
            pipeline.run_job(&id, spec).await;
        });
        Ok(job)
    }

    /// Run every stage of one job and record the outcome on the job.
    pub async fn run_job(&self, id: &str, spec: VideoSpec) {
        let workdir = self.layout.tmp().join(id);
        let outcome = match self.permits.acquire().await {
            Ok(_permit) => self.assemble(id, &spec, &workdir).await,
            Err(_) => Err(VideoError::Unavailable("video pipeline")),
        };
        let _ = tokio::fs::remove_dir_all(&workdir).await;

        let recorded = match outcome {
            Ok(url) => {
                info!(job_id = id, url = %url, "video completed");
                self.jobs.complete(id, &url).await
            }
            Err(e) => {
                error!(job_id = id, error = %e, "video failed");
                self.jobs.fail(id, &e.to_string()).await
            }
        };
        if let Err(e) = recorded {
            error!(job_id = id, error = %e, "could not record video outcome");
        }
    }

    async fn assemble(
        &self,
        id: &str,
        spec: &VideoSpec,
        workdir: &Path,
    ) -> Result<String, VideoError> {
        tokio::fs::create_dir_all(workdir).await?;
        tokio::fs::create_dir_all(self.layout.videos()).await?;
        self.jobs.set_progress(id, 10).await?;

        let background = workdir.join("background.mp4");
        match &spec.background {
            Background::Images(images) => self.slideshow(images, spec, &background).await?,
            Background::Video(source) => {
                tokio::fs::copy(source, &background).await?;
            }
            Background::Stock { query, count } => {
                let images = self.fetch_stock(query, *count, workdir).await?;
                self.jobs.set_progress(id, 30).await?;
                self.slideshow(&images, spec, &background).await?;
            }
        }
        self.jobs.set_progress(id, 60).await?;

        let audio = match (&spec.audio, &spec.narration) {
            (Some(audio), _) => Some(audio.clone()),
            (None, Some(narration)) => {
                let service = self
                    .narration
                    .as_ref()
                    .ok_or(VideoError::Unavailable("narration"))?;
                Some(service.narrate(&narration.text, &narration.voice).await?.path)
            }
            (None, None) => None,
        };
        self.jobs.set_progress(id, 75).await?;

        // Only finished renders are moved under videos/.
        let rendered = match audio {
            Some(audio) => {
                let muxed = workdir.join("final.mp4");
                let args = mux_audio_args(&background, &audio, &muxed);
                self.ffmpeg_stage("audio mux", args, &muxed).await?;
                muxed
            }
            None => background,
        };
        let output = self.layout.videos().join(format!("{}.mp4", id));
        tokio::fs::rename(&rendered, &output).await?;
        self.jobs.set_progress(id, 95).await?;

        Ok(format!("/uploads/videos/{}.mp4", id))
    }

    async fn slideshow(
        &self,
        images: &[PathBuf],
        spec: &VideoSpec,
        output: &Path,
    ) -> Result<(), VideoError> {
        let transition = spec.effective_transition();
        debug!(
            images = images.len(),
            seconds = slideshow_duration(images.len(), spec.image_duration, transition),
            "building slideshow"
        );
        let args = slideshow_args(images, spec.image_duration, transition, &spec.canvas, output);
        self.ffmpeg_stage("slideshow", args, output).await
    }

    async fn fetch_stock(
        &self,
        query: &str,
        count: usize,
        workdir: &Path,
    ) -> Result<Vec<PathBuf>, VideoError> {
        let stock = self
            .stock
            .as_ref()
            .ok_or(VideoError::Unavailable("stock media"))?;
        let photos = stock.search_photos(query, count as u32).await?;
        if photos.is_empty() {
            return Err(VideoError::NoStockResults(query.to_string()));
        }
        let mut images = Vec::with_capacity(photos.len());
        for (i, photo) in photos.iter().take(count).enumerate() {
            let dest = workdir.join(format!("stock-{}.jpg", i));
            stock.download(&photo.download_url, &dest).await?;
            images.push(dest);
        }
        Ok(images)
    }

    async fn ffmpeg_stage(
        &self,
        stage: &'static str,
        args: Vec<String>,
        output: &Path,
    ) -> Result<(), VideoError> {
        let result = self.ffmpeg.run(args).await?;
        if !result.status.success() {
            let tail = stderr_tail(&result.stderr, ERROR_TAIL_LINES);
            let message = if tail.trim().is_empty() {
                format!("exited with {}", result.status)
            } else {
                tail
            };
            return Err(VideoError::Ffmpeg { stage, message });
        }
        if tokio::fs::metadata(output).await.is_err() {
            return Err(VideoError::MissingOutput {
                stage,
                output: output.to_path_buf(),
            });
        }
        Ok(())
    }

    pub async fn get_video_status(&self, id: &str) -> Result<Option<VideoJob>, VideoError> {
        Ok(self.jobs.get(id).await?)
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoJob>, VideoError> {
        Ok(self.jobs.list().await?)
    }

    pub async fn counts(&self) -> Result<JobCounts, VideoError> {
        Ok(JobCounts::tally(&self.jobs.list().await?))
    }

    /// First line of `ffmpeg -version`.
    pub async fn ffmpeg_version(&self) -> Result<String, VideoError> {
        let output = self.ffmpeg.version().await?;
        if !output.status.success() {
            return Err(VideoError::Ffmpeg {
                stage: "version probe",
                message: stderr_tail(&output.stderr, ERROR_TAIL_LINES),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::adapters::local::ffmpeg::CliFfmpeg;
    use crate::adapters::local::memory::MemoryJobs;
    use crate::adapters::local::tts_cache::TtsCache;
    use crate::domain::av::spec::NarrationSpec;
    use crate::domain::jobs::JobStatus;
    use crate::ports::media::MockFfmpegRunner;
    use crate::ports::speech::MockSpeechSynthesizer;
    use crate::ports::speech::SpeechSynthesizer;
    use crate::ports::stock::{MockStockMediaSource, StockPhoto};
    use std::os::unix::process::ExitStatusExt;
    use std::process::{ExitStatus, Output};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    fn ok_writing_output(args: &[String]) -> std::io::Result<Output> {
        if let Some(out) = args.last() {
            std::fs::write(out, b"video")?;
        }
        Ok(Output {
            status: ExitStatus::from_raw(0),
            stdout: b"ffmpeg version 6.1\nbuilt with gcc".to_vec(),
            stderr: vec![],
        })
    }

    fn images(dir: &Path, n: usize) -> Vec<PathBuf> {
        (0..n)
            .map(|i| {
                let path = dir.join(format!("img{}.jpg", i));
                std::fs::write(&path, b"jpg").unwrap();
                path
            })
            .collect()
    }

    fn pipeline(dir: &TempDir, ffmpeg: MockFfmpegRunner) -> (VideoPipeline, Arc<MemoryJobs>) {
        let jobs = Arc::new(MemoryJobs::new());
        let pipeline = VideoPipeline::new(
            jobs.clone(),
            Arc::new(ffmpeg),
            UploadLayout::new(dir.path().join("uploads")),
            2,
        );
        (pipeline, jobs)
    }

    async fn accepted(pipeline: &VideoPipeline, jobs: &MemoryJobs, spec: &VideoSpec) -> String {
        let job = VideoJob::new(spec.title.clone());
        let id = job.id.clone();
        jobs.insert(job).await.unwrap();
        pipeline.run_job(&id, spec.clone()).await;
        id
    }

    #[tokio::test]
    async fn test_two_images_without_audio_completes() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(Mutex::new(Vec::<Vec<String>>::new()));
        let seen = calls.clone();
        let mut ffmpeg = MockFfmpegRunner::new();
        ffmpeg.expect_run().times(1).returning(move |args| {
            seen.lock().unwrap().push(args.clone());
            ok_writing_output(&args)
        });
        let (pipeline, jobs) = pipeline(&dir, ffmpeg);

        let mut spec = VideoSpec::images("promo", images(dir.path(), 2));
        spec.transition = Some(0.5);
        let id = accepted(&pipeline, &jobs, &spec).await;

        let job = pipeline.get_video_status(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.output_url, Some(format!("/uploads/videos/{}.mp4", id)));
        assert!(dir.path().join(format!("uploads/videos/{}.mp4", id)).exists());
        assert!(!dir.path().join(format!("uploads/tmp/{}", id)).exists());

        let args = &calls.lock().unwrap()[0];
        assert_eq!(args[0], "-y");
        let filter = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];
        assert!(filter.contains("xfade=transition=fade:duration=0.5:offset=2.5[out]"));
        assert_eq!(slideshow_duration(2, spec.image_duration, 0.5), 5.5);
    }

    #[tokio::test]
    async fn test_non_zero_exit_fails_with_stderr() {
        let dir = tempdir().unwrap();
        let mut ffmpeg = MockFfmpegRunner::new();
        ffmpeg.expect_run().returning(|_| {
            Ok(Output {
                status: ExitStatus::from_raw(1 << 8),
                stdout: vec![],
                stderr: b"Input #0\nimg0.jpg: Invalid data found when processing input\n".to_vec(),
            })
        });
        let (pipeline, jobs) = pipeline(&dir, ffmpeg);
        let spec = VideoSpec::images("x", images(dir.path(), 2));
        let id = accepted(&pipeline, &jobs, &spec).await;

        let job = pipeline.get_video_status(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job
            .error_message
            .unwrap()
            .contains("Invalid data found when processing input"));
        assert!(job.output_url.is_none());
    }

    #[tokio::test]
    async fn test_audio_is_muxed() {
        let dir = tempdir().unwrap();
        let mut ffmpeg = MockFfmpegRunner::new();
        ffmpeg
            .expect_run()
            .withf(|args| args.iter().any(|a| a == "-filter_complex"))
            .times(1)
            .returning(|args| ok_writing_output(&args));
        ffmpeg
            .expect_run()
            .withf(|args| args.iter().any(|a| a == "-shortest"))
            .times(1)
            .returning(|args| ok_writing_output(&args));
        let (pipeline, jobs) = pipeline(&dir, ffmpeg);

        let mut spec = VideoSpec::images("com trilha", images(dir.path(), 1));
        let audio = dir.path().join("song.mp3");
        std::fs::write(&audio, b"mp3").unwrap();
        spec.audio = Some(audio);
        let id = accepted(&pipeline, &jobs, &spec).await;

        let job = pipeline.get_video_status(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_failed_mux_leaves_no_public_file() {
        let dir = tempdir().unwrap();
        let mut ffmpeg = MockFfmpegRunner::new();
        ffmpeg
            .expect_run()
            .withf(|args| args.iter().any(|a| a == "-filter_complex"))
            .returning(|args| ok_writing_output(&args));
        ffmpeg
            .expect_run()
            .withf(|args| args.iter().any(|a| a == "-shortest"))
            .returning(|args| {
                if let Some(out) = args.last() {
                    std::fs::write(out, b"partial")?;
                }
                Ok(Output {
                    status: ExitStatus::from_raw(1 << 8),
                    stdout: vec![],
                    stderr: b"song.mp3: Invalid data found when processing input".to_vec(),
                })
            });
        let (pipeline, jobs) = pipeline(&dir, ffmpeg);

        let mut spec = VideoSpec::images("mux falho", images(dir.path(), 1));
        let audio = dir.path().join("song.mp3");
        std::fs::write(&audio, b"mp3").unwrap();
        spec.audio = Some(audio);
        let id = accepted(&pipeline, &jobs, &spec).await;

        let job = pipeline.get_video_status(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error_message.unwrap().contains("audio mux"));
        assert!(!dir.path().join(format!("uploads/videos/{}.mp4", id)).exists());
        assert!(!dir.path().join(format!("uploads/tmp/{}", id)).exists());
    }

    #[tokio::test]
    async fn test_narration_feeds_mux() {
        let dir = tempdir().unwrap();
        let mut ffmpeg = MockFfmpegRunner::new();
        ffmpeg.expect_run().times(2).returning(|args| ok_writing_output(&args));

        let mut voice = MockSpeechSynthesizer::new();
        voice.expect_name().return_const("google");
        voice.expect_is_available().return_const(true);
        voice
            .expect_synthesize()
            .times(1)
            .returning(|_, _, out| Ok(std::fs::write(out, b"mp3")?));
        let narration = NarrationService::new(
            TtsCache::new(dir.path().join("cache")),
            vec![Arc::new(voice) as Arc<dyn SpeechSynthesizer>],
            dir.path().join("scratch"),
        );

        let (pipeline, jobs) = pipeline(&dir, ffmpeg);
        let pipeline = pipeline.with_narration(Arc::new(narration));
        let mut spec = VideoSpec::images("narrado", images(dir.path(), 2));
        spec.narration = Some(NarrationSpec {
            text: "Olá a todos".into(),
            voice: "pt-BR".into(),
        });
        let id = accepted(&pipeline, &jobs, &spec).await;
        assert_eq!(
            pipeline.get_video_status(&id).await.unwrap().unwrap().status,
            JobStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_stock_background_downloads_then_renders() {
        let dir = tempdir().unwrap();
        let mut ffmpeg = MockFfmpegRunner::new();
        ffmpeg
            .expect_run()
            .withf(|args| args.iter().filter(|a| a.ends_with(".jpg")).count() == 2)
            .times(1)
            .returning(|args| ok_writing_output(&args));

        let mut stock = MockStockMediaSource::new();
        stock.expect_search_photos().returning(|_, n| {
            Ok((0..n as u64)
                .map(|id| StockPhoto {
                    id,
                    width: 1080,
                    height: 1920,
                    photographer: "p".into(),
                    page_url: "https://pexels.com".into(),
                    download_url: format!("https://img/{}.jpg", id),
                })
                .collect())
        });
        stock
            .expect_download()
            .times(2)
            .returning(|_, dest| Ok(std::fs::write(dest, b"jpg")?));

        let (pipeline, jobs) = pipeline(&dir, ffmpeg);
        let pipeline = pipeline.with_stock(Arc::new(stock));
        let mut spec = VideoSpec::images("stock", vec![]);
        spec.background = Background::Stock {
            query: "praia".into(),
            count: 2,
        };
        let id = accepted(&pipeline, &jobs, &spec).await;
        assert_eq!(
            pipeline.get_video_status(&id).await.unwrap().unwrap().status,
            JobStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_generate_video_returns_processing_then_finishes() {
        let dir = tempdir().unwrap();
        let mut ffmpeg = MockFfmpegRunner::new();
        ffmpeg.expect_run().returning(|args| ok_writing_output(&args));
        let (pipeline, _jobs) = pipeline(&dir, ffmpeg);

        let job = pipeline
            .generate_video(VideoSpec::images("async", images(dir.path(), 2)))
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Processing);

        let mut status = JobStatus::Processing;
        for _ in 0..100 {
            status = pipeline.get_video_status(&job.id).await.unwrap().unwrap().status;
            if status.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(status, JobStatus::Completed);
        assert_eq!(pipeline.counts().await.unwrap().completed, 1);
    }

    #[tokio::test]
    async fn test_invalid_spec_is_rejected_before_job() {
        let dir = tempdir().unwrap();
        let (pipeline, _jobs) = pipeline(&dir, MockFfmpegRunner::new());
        let result = pipeline.generate_video(VideoSpec::images("vazio", vec![])).await;
        assert!(matches!(result, Err(VideoError::Spec(SpecError::MissingBackground))));
        assert!(pipeline.list_videos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_real_runner_failure_marks_job_failed() {
        let dir = tempdir().unwrap();
        let jobs = Arc::new(MemoryJobs::new());
        let pipeline = VideoPipeline::new(
            jobs.clone(),
            Arc::new(CliFfmpeg::new("false")),
            UploadLayout::new(dir.path().join("uploads")),
            1,
        );
        let spec = VideoSpec::images("x", images(dir.path(), 1));
        let id = accepted(&pipeline, &jobs, &spec).await;
        let job = jobs.get(&id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error_message.unwrap().contains("slideshow"));
    }

    #[tokio::test]
    async fn test_ffmpeg_version() {
        let dir = tempdir().unwrap();
        let mut ffmpeg = MockFfmpegRunner::new();
        ffmpeg.expect_version().returning(|| ok_writing_output(&[]));
        let (pipeline, _) = pipeline(&dir, ffmpeg);
        assert_eq!(pipeline.ffmpeg_version().await.unwrap(), "ffmpeg version 6.1");
    }
}
