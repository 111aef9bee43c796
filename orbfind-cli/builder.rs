use orbfind_core::OrbConfig;

use crate::config::LocatorConfig;
use crate::{LocateResult, Locator};

/// Builder for creating a `Locator`
#[derive(Debug, Clone, Default)]
pub struct LocatorBuilder {
    config: LocatorConfig,
}

impl LocatorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: LocatorConfig) -> Self {
        Self { config }
    }

    /// Replace all detection parameters at once
    pub fn orb(mut self, orb: OrbConfig) -> Self {
        self.config.orb = orb;
        self
    }

    /// Set the FAST threshold (1-127)
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.config.orb.fast_threshold = threshold;
        self
    }

    /// Set the FAST circle radius and minimum arc length
    pub fn circle(mut self, radius: usize, min_arc: usize) -> Self {
        self.config.orb.fast_radius = radius;
        self.config.orb.min_arc = min_arc;
        self
    }

    pub fn levels(mut self, n_levels: usize) -> Self {
        self.config.orb.n_levels = n_levels;
        self
    }

    pub fn downscale(mut self, factor: f32) -> Self {
        self.config.orb.downscale = factor;
        self
    }

    pub fn non_max_suppression(mut self, enable: bool) -> Self {
        self.config.orb.non_max_suppression = enable;
        self
    }

    /// Grid cell side and number of corners kept per cell
    pub fn grid(mut self, cell_size: usize, max_per_cell: usize) -> Self {
        self.config.orb.cell_size = cell_size;
        self.config.orb.max_per_cell = max_per_cell;
        self
    }

    /// Global keypoint budget per image, 0 for unlimited
    pub fn max_features(mut self, max_features: usize) -> Self {
        self.config.orb.max_features = max_features;
        self
    }

    /// Set the patch size for orientation and description
    pub fn patch_size(mut self, patch_size: usize) -> Self {
        self.config.orb.patch_size = patch_size;
        self
    }

    pub fn descriptor_bits(mut self, bits: usize) -> Self {
        self.config.orb.descriptor_bits = bits;
        self
    }

    pub fn top_n(mut self, top_n: usize) -> Self {
        self.config.top_n = top_n;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    pub fn cross_check(mut self, enable: bool) -> Self {
        self.config.cross_check = enable;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.config.name = Some(name.to_string());
        self
    }

    pub fn preset_fast(self) -> Self {
        self.with_preset(LocatorConfig::fast_preset())
    }

    pub fn preset_dense(self) -> Self {
        self.with_preset(LocatorConfig::dense_preset())
    }

    // Presets replace detection parameters but keep the thread count.
    fn with_preset(mut self, preset: LocatorConfig) -> Self {
        let n_threads = self.config.n_threads;
        self.config = LocatorConfig { n_threads, ..preset };
        self
    }

    pub fn summary(&self) -> String {
        self.config.summary()
    }

    pub fn to_config(self) -> LocatorConfig {
        self.config
    }

    /// Validate the configuration and create the locator
    pub fn build(self) -> LocateResult<Locator> {
        Locator::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocateError;
    use orbfind_core::{ConfigError, OrbError};

    #[test]
    fn test_setters_reach_config() {
        let cfg = LocatorBuilder::new()
            .threshold(35)
            .circle(2, 7)
            .levels(3)
            .grid(16, 2)
            .descriptor_bits(128)
            .top_n(5)
            .threads(3)
            .cross_check(true)
            .to_config();
        assert_eq!(cfg.orb.fast_threshold, 35);
        assert_eq!((cfg.orb.fast_radius, cfg.orb.min_arc), (2, 7));
        assert_eq!(cfg.orb.n_levels, 3);
        assert_eq!((cfg.orb.cell_size, cfg.orb.max_per_cell), (16, 2));
        assert_eq!(cfg.orb.descriptor_bits, 128);
        assert_eq!((cfg.top_n, cfg.n_threads), (5, 3));
        assert!(cfg.cross_check);
    }

    #[test]
    fn test_preset_keeps_threads() {
        let cfg = LocatorBuilder::new().threads(2).preset_dense().to_config();
        assert_eq!(cfg.n_threads, 2);
        assert_eq!(cfg.orb, LocatorConfig::dense_preset().orb);
    }

    #[test]
    fn test_build_validates() {
        let result = LocatorBuilder::new().circle(1, 9).build();
        assert!(matches!(
            result,
            Err(LocateError::Orb(OrbError::Config(ConfigError::InvalidArcLength {
                arc: 9,
                samples: 8
            })))
        ));
    }
}
