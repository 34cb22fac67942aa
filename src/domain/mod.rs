//! Domain layer - Pure business logic.

// Video assembly inputs and FFmpeg command lines
pub mod av;

// Content generation requests/results
pub mod content;

// CRM-lite records
pub mod crm;

// Job definitions
pub mod jobs;

// Template-based fallback text generator
pub mod local_text;
