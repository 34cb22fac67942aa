//! ReelForge - short marketing video backend
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (content requests, local text generation,
//!   ffmpeg command building, video jobs, CRM records)
//! - ports/: Trait definitions (text providers, speech, stock media, ffmpeg, repositories)
//! - adapters/: Concrete implementations (HTTP API, provider clients, disk, memory stores)
//! - application/: Services that use ports
//! - config: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use config::AppConfig;
