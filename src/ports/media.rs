use async_trait::async_trait;
use std::io;
use std::process::Output;

/// Runs the `ffmpeg` binary. Arguments exclude the program name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FfmpegRunner: Send + Sync {
    async fn run(&self, args: Vec<String>) -> io::Result<Output>;

    /// `ffmpeg -version`, used by the diagnostics endpoint.
    async fn version(&self) -> io::Result<Output>;
}
