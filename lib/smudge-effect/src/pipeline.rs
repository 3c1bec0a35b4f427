//! The fixed blur -> overlay -> cracks sequence.

use crate::{
    ConvolutionBlurConfig, CrackConfig, Effect, GridOverlayConfig, SmudgeEffect,
    SmudgeEffectResult, ensure_not_empty,
};
use derive_setters::Setters;
use image::RgbaImage;
use std::time::Instant;

#[derive(Debug, Clone, Default, Setters)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SmudgePipeline {
    pub blur: ConvolutionBlurConfig,
    pub overlay: GridOverlayConfig,
    pub cracks: CrackConfig,
}

impl SmudgePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipeline from the four user facing knobs, leaving every other parameter at
    /// its default.
    pub fn from_knobs(
        kernel_size: u32,
        grid_step: u32,
        circle_size: u32,
        crack_count: u32,
        seed: Option<u64>,
    ) -> SmudgeEffectResult<Self> {
        let pipeline = Self::new()
            .with_blur(ConvolutionBlurConfig::new().with_kernel_size(kernel_size))
            .with_overlay(
                GridOverlayConfig::new()
                    .with_grid_step(grid_step)
                    .with_circle_size(circle_size),
            )
            .with_cracks(
                CrackConfig::new()
                    .with_crack_count(crack_count)
                    .with_seed(seed),
            );

        pipeline.validate()?;
        Ok(pipeline)
    }

    pub fn validate(&self) -> SmudgeEffectResult<()> {
        self.blur.validate()?;
        self.overlay.validate()?;
        self.cracks.validate()
    }

    pub fn effects(&self) -> Vec<SmudgeEffect> {
        vec![
            SmudgeEffect::Blur(self.blur.clone()),
            SmudgeEffect::GridOverlay(self.overlay.clone()),
            SmudgeEffect::Cracks(self.cracks.clone()),
        ]
    }

    /// Run every stage on a copy of `image`; the input is left untouched.
    pub fn run(&self, image: &RgbaImage) -> SmudgeEffectResult<RgbaImage> {
        self.validate()?;
        ensure_not_empty(image)?;

        let total = Instant::now();
        let mut output = image.clone();

        for effect in self.effects() {
            let start = Instant::now();
            effect.apply(&mut output)?;
            log::debug!("{} finished in {:.2?}", effect.name(), start.elapsed());
        }

        log::info!(
            "smudged {}x{} image in {:.2?}",
            output.width(),
            output.height(),
            total.elapsed()
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_defaults() {
        let pipeline = SmudgePipeline::new();
        assert_eq!(pipeline.blur.kernel_size, 7);
        assert_eq!(pipeline.overlay.grid_step, 30);
        assert_eq!(pipeline.overlay.circle_size, 20);
        assert_eq!(pipeline.cracks.crack_count, 50);
        assert_eq!(pipeline.cracks.seed, None);
        assert!(pipeline.validate().is_ok());
    }

    #[test]
    fn test_from_knobs() {
        let pipeline = SmudgePipeline::from_knobs(5, 12, 8, 3, Some(9)).unwrap();
        assert_eq!(pipeline.blur.kernel_size, 5);
        assert_eq!(pipeline.overlay.grid_step, 12);
        assert_eq!(pipeline.overlay.circle_size, 8);
        assert_eq!(pipeline.cracks.crack_count, 3);
        assert_eq!(pipeline.cracks.seed, Some(9));

        assert!(SmudgePipeline::from_knobs(0, 30, 20, 50, None).is_err());
        assert!(SmudgePipeline::from_knobs(7, 0, 20, 50, None).is_err());
        assert!(SmudgePipeline::from_knobs(7, 30, 0, 50, None).is_err());
    }

    #[test]
    fn test_effect_order() {
        let names: Vec<_> = SmudgePipeline::new()
            .effects()
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(names, ["Convolution Blur", "Grid Overlay", "Cracks"]);
    }

    #[test]
    fn test_run_keeps_dimensions_and_input() {
        let input = RgbaImage::from_pixel(64, 48, Rgba([90, 90, 90, 255]));
        let pipeline = SmudgePipeline::new().with_cracks(CrackConfig::new().with_seed(Some(1)));
        let output = pipeline.run(&input).unwrap();

        assert_eq!(output.dimensions(), (64, 48));
        assert!(input.pixels().all(|p| *p == Rgba([90, 90, 90, 255])));
        assert_ne!(output, input);
    }

    #[test]
    fn test_run_rejects_empty_image() {
        assert!(SmudgePipeline::new().run(&RgbaImage::new(0, 0)).is_err());
    }
}
