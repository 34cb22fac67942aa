//! Local adapters: ffmpeg subprocess, upload directory, TTS cache and
//! in-memory stores.

pub mod ffmpeg;
pub mod fs;
pub mod memory;
pub mod tts_cache;

pub use ffmpeg::CliFfmpeg;
pub use fs::UploadLayout;
pub use tts_cache::TtsCache;
