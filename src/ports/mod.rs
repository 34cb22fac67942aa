//! Ports - Trait definitions implemented by adapters.

pub mod content;
pub mod media;
pub mod repository;
pub mod speech;
pub mod stock;
