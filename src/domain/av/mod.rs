//! Video assembly domain: resolved inputs and FFmpeg command lines.

pub mod commands;
pub mod spec;
