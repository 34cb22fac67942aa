use crate::ports::media::FfmpegRunner;
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Spawns the configured `ffmpeg` binary, capturing stdout and stderr.
#[derive(Debug, Clone)]
pub struct CliFfmpeg {
    binary: PathBuf,
}

impl CliFfmpeg {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl FfmpegRunner for CliFfmpeg {
    async fn run(&self, args: Vec<String>) -> io::Result<Output> {
        debug!(binary = %self.binary.display(), args = %args.join(" "), "running ffmpeg");
        Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
    }

    async fn version(&self) -> io::Result<Output> {
        Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
    }
}
