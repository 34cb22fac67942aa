//! Application layer - services that use ports.

pub mod analytics;
pub mod content;
pub mod narration;
pub mod sales;
pub mod video;
