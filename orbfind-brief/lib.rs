use log::trace;
use orbfind_core::{
    validate_descriptor_bits, ConfigError, Descriptor, Image, Keypoint, OrbConfig, OrbResult, PyramidLevel,
};
use rayon::prelude::*;

pub mod pattern;

pub use pattern::{BIT_PATTERN_31, PATTERN_PATCH_SIZE};

/// Steered BRIEF over the fixed pair table.
///
/// The table is a process-wide constant; an extractor only holds the copy
/// scaled to its patch size.
#[derive(Debug, Clone)]
pub struct BriefExtractor {
    pattern: Vec<[f32; 4]>,
    patch_size: usize,
}

impl BriefExtractor {
    pub fn new(patch_size: usize, bits: usize) -> OrbResult<Self> {
        if patch_size % 2 == 0 || patch_size < 7 {
            return Err(ConfigError::InvalidPatchSize(patch_size).into());
        }
        validate_descriptor_bits(bits)?;
        Ok(Self {
            pattern: pattern::scaled_pattern(patch_size, bits),
            patch_size,
        })
    }

    pub fn from_config(cfg: &OrbConfig) -> OrbResult<Self> {
        Self::new(cfg.patch_size, cfg.descriptor_bits)
    }

    /// Descriptor length in bits
    pub fn bits(&self) -> usize {
        self.pattern.len()
    }

    pub fn patch_size(&self) -> usize {
        self.patch_size
    }

    /// Describe the patch around `(cx, cy)` of a smoothed image.
    ///
    /// Both points of each pair are rotated by `angle`, rounded to the
    /// nearest pixel and clamped to the image. Bit = first sample > second.
    pub fn describe_at(&self, smoothed: &Image, cx: isize, cy: isize, angle: f32) -> Descriptor {
        let (s, c) = angle.sin_cos();
        let sample = |px: f32, py: f32| {
            let rx = (c * px - s * py).round() as isize;
            let ry = (s * px + c * py).round() as isize;
            smoothed.get_clamped(cx + rx, cy + ry)
        };

        let mut d = Descriptor::zeros(self.bits());
        for (i, &[x1, y1, x2, y2]) in self.pattern.iter().enumerate() {
            if sample(x1, y1) > sample(x2, y2) {
                d.set_bit(i);
            }
        }
        d
    }

    /// Descriptor of one keypoint on its pyramid level.
    ///
    /// A keypoint without orientation is described upright.
    pub fn describe(&self, level: &PyramidLevel, kp: &Keypoint) -> Descriptor {
        let (x, y) = kp.level_position(level.scale);
        self.describe_at(&level.smoothed, x, y, kp.angle.unwrap_or(0.0))
    }

    /// One descriptor per keypoint, same order.
    pub fn compute(&self, levels: &[PyramidLevel], keypoints: &[Keypoint]) -> OrbResult<Vec<Descriptor>> {
        let descriptors = keypoints
            .par_iter()
            .map(|kp| -> OrbResult<Descriptor> {
                let level = levels.get(kp.octave).ok_or(ConfigError::OctaveOutOfRange {
                    octave: kp.octave,
                    levels: levels.len(),
                })?;
                Ok(self.describe(level, kp))
            })
            .collect::<OrbResult<Vec<_>>>()?;

        trace!("computed {} descriptors of {} bits", descriptors.len(), self.bits());
        Ok(descriptors)
    }
}
