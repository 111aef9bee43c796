use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of point pairs in the fixed BRIEF sampling table.
pub const MAX_DESCRIPTOR_BITS: usize = 256;

/// Detection and description parameters shared by every pipeline stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrbConfig {
    /// Maximum number of pyramid levels
    pub n_levels: usize,
    /// Size ratio between consecutive pyramid levels, in (0, 1)
    pub downscale: f32,
    /// Radius of the FAST sampling circle (1, 2 or 3)
    pub fast_radius: usize,
    /// Intensity difference a circle sample must exceed
    pub fast_threshold: u8,
    /// Minimum number of contiguous brighter / darker circle samples
    pub min_arc: usize,
    /// 3x3 non-maximum suppression on corner scores
    pub non_max_suppression: bool,
    /// Side of a retention grid cell, in level pixels
    pub cell_size: usize,
    /// Candidates kept per grid cell
    pub max_per_cell: usize,
    /// Global cap on keypoints per image, 0 disables it
    pub max_features: usize,
    /// Side of the described patch; also the orientation disk diameter
    pub patch_size: usize,
    /// Descriptor length in bits
    pub descriptor_bits: usize,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            n_levels: 8,
            downscale: 1.0 / 1.2,
            fast_radius: 3,
            fast_threshold: 20,
            min_arc: 9,
            non_max_suppression: true,
            cell_size: 32,
            max_per_cell: 8,
            max_features: 500,
            patch_size: 31,
            descriptor_bits: MAX_DESCRIPTOR_BITS,
        }
    }
}

impl OrbConfig {
    /// Number of samples on the FAST circle of the configured radius.
    pub fn circle_samples(&self) -> usize {
        match self.fast_radius {
            1 => 8,
            2 => 12,
            _ => 16,
        }
    }

    /// Smallest level side that still gets corners tested.
    pub fn min_detect_dim(&self) -> usize {
        2 * self.fast_radius + 1
    }

    /// Smallest level side kept in the pyramid beyond level 0.
    pub fn min_level_dim(&self) -> usize {
        self.patch_size.max(self.min_detect_dim())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_levels == 0 {
            return Err(ConfigError::NonPositive("n_levels"));
        }
        if !(self.downscale > 0.0 && self.downscale < 1.0) {
            return Err(ConfigError::InvalidDownscale(self.downscale));
        }
        if !(1..=3).contains(&self.fast_radius) {
            return Err(ConfigError::InvalidRadius(self.fast_radius));
        }
        if self.fast_threshold == 0 || self.fast_threshold > 127 {
            return Err(ConfigError::InvalidThreshold(self.fast_threshold));
        }
        let samples = self.circle_samples();
        if self.min_arc == 0 || self.min_arc > samples {
            return Err(ConfigError::InvalidArcLength {
                arc: self.min_arc,
                samples,
            });
        }
        if self.cell_size == 0 {
            return Err(ConfigError::NonPositive("cell_size"));
        }
        if self.max_per_cell == 0 {
            return Err(ConfigError::NonPositive("max_per_cell"));
        }
        if self.patch_size % 2 == 0 || self.patch_size < 7 {
            return Err(ConfigError::InvalidPatchSize(self.patch_size));
        }
        validate_descriptor_bits(self.descriptor_bits)
    }
}

/// Descriptor lengths are whole bytes drawn from the fixed pair table.
pub fn validate_descriptor_bits(bits: usize) -> Result<(), ConfigError> {
    if bits == 0 || bits % 8 != 0 || bits > MAX_DESCRIPTOR_BITS {
        return Err(ConfigError::InvalidDescriptorBits(bits));
    }
    Ok(())
}
