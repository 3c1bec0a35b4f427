use crate::{Effect, SmudgeEffectError, SmudgeEffectResult, ensure_not_empty};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use rayon::prelude::*;

/// Square convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: u32,
    weights: Vec<f32>,
}

impl Kernel {
    /// Unweighted average over a `size x size` neighborhood.
    pub fn box_average(size: u32) -> SmudgeEffectResult<Self> {
        if size == 0 {
            return Err(SmudgeEffectError::InvalidParameter(
                "kernel_size must be > 0".to_string(),
            ));
        }

        let count = (size * size) as usize;
        Ok(Self {
            size,
            weights: vec![1.0 / count as f32; count],
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Offset of the anchor cell; even sizes anchor left/up of the true center.
    pub fn origin(&self) -> u32 {
        (self.size - 1) / 2
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn weight(&self, kx: u32, ky: u32) -> f32 {
        self.weights[(ky * self.size + kx) as usize]
    }
}

/// Box-average convolution blur with clamp-to-edge sampling
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ConvolutionBlurConfig {
    #[derivative(Default(value = "7"))]
    pub kernel_size: u32,
}

impl ConvolutionBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> SmudgeEffectResult<()> {
        Kernel::box_average(self.kernel_size).map(|_| ())
    }

    /// Convolve `src` into a new buffer of the same dimensions.
    pub fn blur(&self, src: &RgbaImage) -> SmudgeEffectResult<RgbaImage> {
        ensure_not_empty(src)?;
        let kernel = Kernel::box_average(self.kernel_size)?;

        let (width, height) = src.dimensions();
        let (w, h) = (width as i32, height as i32);
        let size = kernel.size() as i32;
        let origin = kernel.origin() as i32;
        let raw = src.as_raw();

        log::debug!("blur {width}x{height} with {size}x{size} kernel");

        let mut out = RgbaImage::new(width, height);
        let pixels: &mut [u8] = &mut out;

        pixels
            .par_chunks_exact_mut(width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as i32;
                for x in 0..w {
                    let mut acc = [0f32; 4];

                    for ky in 0..size {
                        let sy = (y + ky - origin).clamp(0, h - 1);
                        for kx in 0..size {
                            let sx = (x + kx - origin).clamp(0, w - 1);
                            let weight = kernel.weight(kx as u32, ky as u32);
                            let idx = ((sy * w + sx) as usize) * 4;
                            for (c, sum) in acc.iter_mut().enumerate() {
                                *sum += weight * raw[idx + c] as f32;
                            }
                        }
                    }

                    let out_idx = x as usize * 4;
                    for (c, sum) in acc.iter().enumerate() {
                        row[out_idx + c] = sum.round().clamp(0.0, 255.0) as u8;
                    }
                }
            });

        Ok(out)
    }
}

impl Effect for ConvolutionBlurConfig {
    fn apply(&self, image: &mut RgbaImage) -> SmudgeEffectResult<()> {
        *image = self.blur(image)?;
        Ok(())
    }
}
