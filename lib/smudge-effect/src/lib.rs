//! Rainy-night smudge effects for RGBA raster images.
//!
//! The crate bundles three effects that are normally chained by [`SmudgePipeline`]:
//! a box-average convolution blur, a grid of progressively tinted translucent discs
//! and randomly branching crack strokes.

pub mod blur_effect;
pub mod composite;
pub mod crack_effect;
pub mod io;
pub mod overlay_effect;
pub mod pipeline;
pub mod surface;

use image::{Rgba, RgbaImage};
use std::path::PathBuf;

pub use blur_effect::{ConvolutionBlurConfig, Kernel};
pub use crack_effect::{CrackConfig, CrackState};
pub use io::{load_image, save_image};
pub use overlay_effect::{Disc, GridCursor, GridOverlayConfig};
pub use pipeline::SmudgePipeline;
pub use surface::{DrawLog, DrawOp, Surface};

/// Straight (non-premultiplied) RGBA color.
pub type Color = Rgba<u8>;

pub type SmudgeEffectResult<T> = Result<T, SmudgeEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum SmudgeEffectError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Empty image: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("Input image {path} is unreadable: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Output image {path} is unwritable: {source}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub trait Effect {
    fn apply(&self, image: &mut RgbaImage) -> SmudgeEffectResult<()>;
}

#[derive(Debug, Clone)]
pub enum SmudgeEffect {
    Blur(ConvolutionBlurConfig),
    GridOverlay(GridOverlayConfig),
    Cracks(CrackConfig),
}

impl SmudgeEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SmudgeEffect::Blur(_) => "Convolution Blur",
            SmudgeEffect::GridOverlay(_) => "Grid Overlay",
            SmudgeEffect::Cracks(_) => "Cracks",
        }
    }
}

impl Effect for SmudgeEffect {
    fn apply(&self, image: &mut RgbaImage) -> SmudgeEffectResult<()> {
        match self {
            SmudgeEffect::Blur(config) => config.apply(image),
            SmudgeEffect::GridOverlay(config) => config.apply(image),
            SmudgeEffect::Cracks(config) => config.apply(image),
        }
    }
}

pub(crate) fn ensure_not_empty(image: &RgbaImage) -> SmudgeEffectResult<()> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(SmudgeEffectError::EmptyImage { width, height });
    }

    Ok(())
}
