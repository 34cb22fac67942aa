//! Text-to-speech backends, tried in this order by the narration service.

mod elevenlabs;
mod espeak;
mod google;

pub use elevenlabs::ElevenLabs;
pub use espeak::Espeak;
pub use google::{split_chunks, GoogleTranslateTts, MAX_CHUNK_CHARS};
