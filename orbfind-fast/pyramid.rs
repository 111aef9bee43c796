use log::{debug, trace};
use orbfind_core::{Image, OrbConfig, OrbResult, PyramidLevel};
use rayon::prelude::*;

use crate::preprocessing::ImagePreprocessing;

/// Blur applied to every level before descriptor sampling (7x7 kernel)
pub const DESCRIPTOR_SIGMA: f32 = 2.0;
pub const DESCRIPTOR_BLUR_RADIUS: usize = 3;

/// Image pyramid for multi-scale feature detection
#[derive(Debug, Clone)]
pub struct ImagePyramid {
    levels: Vec<PyramidLevel>,
}

impl ImagePyramid {
    /// Planned level sizes for an image, level 0 first.
    ///
    /// Stops before the first level whose smaller side drops below
    /// `cfg.min_level_dim()`. Level 0 is always present.
    pub fn generate_scale_levels(width: usize, height: usize, cfg: &OrbConfig) -> Vec<(usize, usize, f32)> {
        let min_dim = cfg.min_level_dim();
        let mut levels = vec![(width, height, 1.0f32)];

        for octave in 1..cfg.n_levels {
            let scale = cfg.downscale.powi(octave as i32);
            let w = (width as f32 * scale).round() as usize;
            let h = (height as f32 * scale).round() as usize;
            if w.min(h) < min_dim {
                break;
            }
            levels.push((w, h, scale));
        }

        levels
    }

    /// Build the pyramid from a grayscale image.
    ///
    /// Each level is the previous one smoothed and resampled; smoothing
    /// strength follows the downscale factor. Any non-empty image builds at
    /// least level 0, even one too small for corner tests.
    pub fn build(img: &Image, cfg: &OrbConfig) -> OrbResult<Self> {
        cfg.validate()?;
        let gray = if img.channels() == 1 { img.clone() } else { img.to_gray() };
        let (width, height) = gray.dimensions();

        let plan = Self::generate_scale_levels(width, height, cfg);
        let sigma = Self::antialias_sigma(cfg.downscale);
        let radius = (3.0 * sigma).ceil() as usize;

        let mut images = Vec::with_capacity(plan.len());
        images.push(gray);
        for &(w, h, scale) in plan.iter().skip(1) {
            let prev = &images[images.len() - 1];
            let smoothed = ImagePreprocessing::gaussian_blur(prev, sigma, radius);
            trace!("pyramid level {} -> {}x{} (scale {:.4})", images.len(), w, h, scale);
            images.push(ImagePreprocessing::resize_bilinear(&smoothed, w, h));
        }

        let levels: Vec<PyramidLevel> = images
            .into_par_iter()
            .zip(plan.into_par_iter())
            .enumerate()
            .map(|(octave, (image, (_, _, scale)))| {
                let smoothed = ImagePreprocessing::gaussian_blur(&image, DESCRIPTOR_SIGMA, DESCRIPTOR_BLUR_RADIUS);
                PyramidLevel {
                    octave,
                    scale,
                    image,
                    smoothed,
                }
            })
            .collect();

        debug!("built {} pyramid levels for {}x{} image", levels.len(), width, height);
        Ok(Self { levels })
    }

    /// Smoothing applied before resampling by factor `f`
    pub fn antialias_sigma(f: f32) -> f32 {
        (0.5 * (1.0 / (f * f) - 1.0).sqrt()).max(0.5)
    }

    pub fn levels(&self) -> &[PyramidLevel] {
        &self.levels
    }

    pub fn level(&self, octave: usize) -> Option<&PyramidLevel> {
        self.levels.get(octave)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
