use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_IMAGE_DURATION: f64 = 3.0;
pub const DEFAULT_WIDTH: u32 = 1080;
pub const DEFAULT_HEIGHT: u32 = 1920;
pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_STOCK_COUNT: usize = 4;

/// Where the video track comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Images(Vec<PathBuf>),
    Video(PathBuf),
    Stock { query: String, count: usize },
}

/// Output frame geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
        }
    }
}

/// Narration produced from text before muxing.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationSpec {
    pub text: String,
    pub voice: String,
}

/// Fully resolved input of the video pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSpec {
    pub title: String,
    pub background: Background,
    pub audio: Option<PathBuf>,
    pub narration: Option<NarrationSpec>,
    pub image_duration: f64,
    /// Crossfade length between images, in seconds.
    pub transition: Option<f64>,
    pub canvas: Canvas,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SpecError {
    #[error("at least one image, a background video or a stock query is required")]
    MissingBackground,
    #[error("image duration must be positive, got {0}")]
    InvalidDuration(f64),
    #[error("transition ({transition}s) must be shorter than the image duration ({duration}s)")]
    TransitionTooLong { transition: f64, duration: f64 },
    #[error("title must not be empty")]
    EmptyTitle,
}

impl VideoSpec {
    pub fn images(title: impl Into<String>, images: Vec<PathBuf>) -> Self {
        Self {
            title: title.into(),
            background: Background::Images(images),
            audio: None,
            narration: None,
            image_duration: DEFAULT_IMAGE_DURATION,
            transition: None,
            canvas: Canvas::default(),
        }
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if self.title.trim().is_empty() {
            return Err(SpecError::EmptyTitle);
        }
        match &self.background {
            Background::Images(images) if images.is_empty() => {
                return Err(SpecError::MissingBackground)
            }
            Background::Stock { query, count } if query.trim().is_empty() || *count == 0 => {
                return Err(SpecError::MissingBackground)
            }
            _ => {}
        }
        if !(self.image_duration > 0.0) {
            return Err(SpecError::InvalidDuration(self.image_duration));
        }
        if let Some(transition) = self.transition {
            if transition >= self.image_duration {
                return Err(SpecError::TransitionTooLong {
                    transition,
                    duration: self.image_duration,
                });
            }
        }
        Ok(())
    }

    /// Transition actually applied, zero when absent or negative.
    pub fn effective_transition(&self) -> f64 {
        self.transition.filter(|t| *t > 0.0).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_images() {
        let spec = VideoSpec::images("demo", vec![PathBuf::from("a.jpg")]);
        assert_eq!(spec.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_background() {
        let spec = VideoSpec::images("demo", vec![]);
        assert_eq!(spec.validate(), Err(SpecError::MissingBackground));

        let mut stock = VideoSpec::images("demo", vec![]);
        stock.background = Background::Stock { query: " ".into(), count: 3 };
        assert_eq!(stock.validate(), Err(SpecError::MissingBackground));
    }

    #[test]
    fn test_validate_rejects_long_transition() {
        let mut spec = VideoSpec::images("demo", vec![PathBuf::from("a.jpg")]);
        spec.image_duration = 2.0;
        spec.transition = Some(2.0);
        assert!(matches!(spec.validate(), Err(SpecError::TransitionTooLong { .. })));
    }

    #[test]
    fn test_validate_rejects_nan_duration() {
        let mut spec = VideoSpec::images("demo", vec![PathBuf::from("a.jpg")]);
        spec.image_duration = f64::NAN;
        assert!(matches!(spec.validate(), Err(SpecError::InvalidDuration(_))));
    }
}
