use log::debug;
use orbfind_core::{Image, Keypoint, OrbConfig, OrbResult, PyramidLevel};
use rayon::prelude::*;

use crate::corner_detection::CornerDetector;
use crate::pyramid::ImagePyramid;
use crate::refinement::KeypointRefinement;
use crate::types::Candidate;

/// Main FAST corner detector with multi-scale capability
#[derive(Debug, Clone)]
pub struct FastDetector {
    cfg: OrbConfig,
    corners: CornerDetector,
}

impl FastDetector {
    /// Creates a new FAST detector with validation
    pub fn new(cfg: OrbConfig) -> OrbResult<Self> {
        cfg.validate()?;
        let corners = CornerDetector::new(cfg.fast_radius, cfg.fast_threshold, cfg.min_arc);
        Ok(Self { cfg, corners })
    }

    /// Build the pyramid for `img` and detect keypoints on every level.
    pub fn detect_image(&self, img: &Image) -> OrbResult<(ImagePyramid, Vec<Keypoint>)> {
        let pyramid = ImagePyramid::build(img, &self.cfg)?;
        let keypoints = self.detect_keypoints(&pyramid);
        Ok((pyramid, keypoints))
    }

    /// Detect keypoints across all pyramid levels.
    ///
    /// Levels run in parallel; keypoints are merged low level first, each
    /// level in row-major order, then capped to `max_features`. Orientation
    /// is left unset.
    pub fn detect_keypoints(&self, pyramid: &ImagePyramid) -> Vec<Keypoint> {
        let per_level: Vec<Vec<Keypoint>> = pyramid
            .levels()
            .par_iter()
            .map(|level| {
                self.detect_candidates(level)
                    .into_iter()
                    .map(|c| self.to_keypoint(&c, level))
                    .collect()
            })
            .collect();

        let merged: Vec<Keypoint> = per_level.into_iter().flatten().collect();
        let total = merged.len();
        let kept = KeypointRefinement::retain_best(merged, self.cfg.max_features);
        debug!("detected {} keypoints over {} levels, kept {}", total, pyramid.len(), kept.len());
        kept
    }

    /// Corner candidates of one level after suppression and grid retention,
    /// in level pixel coordinates.
    pub fn detect_candidates(&self, level: &PyramidLevel) -> Vec<Candidate> {
        let raw = self.corners.detect(&level.image);
        let raw_count = raw.len();

        let suppressed = if self.cfg.non_max_suppression {
            KeypointRefinement::non_maximum_suppression(&raw, level.width())
        } else {
            raw
        };
        let kept = KeypointRefinement::retain_best_per_cell(&suppressed, self.cfg.cell_size, self.cfg.max_per_cell);

        debug!(
            "level {} ({}x{}): {} candidates, {} after suppression, {} retained",
            level.octave,
            level.width(),
            level.height(),
            raw_count,
            suppressed.len(),
            kept.len()
        );
        kept
    }

    fn to_keypoint(&self, c: &Candidate, level: &PyramidLevel) -> Keypoint {
        Keypoint {
            x: c.x as f32 / level.scale,
            y: c.y as f32 / level.scale,
            octave: level.octave,
            size: self.cfg.patch_size as f32 / level.scale,
            angle: None,
            response: c.score,
        }
    }

    /// Get detector configuration
    pub fn config(&self) -> &OrbConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbfind_core::{ConfigError, OrbError};

    fn create_test_config() -> OrbConfig {
        OrbConfig {
            fast_threshold: 20,
            ..OrbConfig::default()
        }
    }

    fn quadrant_image(width: usize, height: usize, cx: usize, cy: usize) -> Image {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| if x >= cx && y >= cy { 200 } else { 50 }))
            .collect();
        Image::from_gray(width, height, data).unwrap()
    }

    fn create_multiple_corners_image(width: usize, height: usize) -> Image {
        let mut data = vec![50u8; width * height];
        let corners = [(width / 4, height / 4), (3 * width / 4, height / 4), (width / 2, height / 2)];
        for &(cx, cy) in &corners {
            for y in cy - 3..=cy + 3 {
                for x in cx - 3..=cx + 3 {
                    data[y * width + x] = 255;
                }
            }
        }
        Image::from_gray(width, height, data).unwrap()
    }

    #[test]
    fn test_invalid_threshold() {
        let cfg = OrbConfig {
            fast_threshold: 0,
            ..create_test_config()
        };
        assert!(matches!(
            FastDetector::new(cfg),
            Err(OrbError::Config(ConfigError::InvalidThreshold(0)))
        ));
    }

    #[test]
    fn test_flat_image_detection() {
        let detector = FastDetector::new(create_test_config()).unwrap();
        let img = Image::filled(100, 80, 128).unwrap();
        let (_, keypoints) = detector.detect_image(&img).unwrap();
        assert!(keypoints.is_empty());
    }

    #[test]
    fn test_single_corner_level_zero() {
        let detector = FastDetector::new(create_test_config()).unwrap();
        let img = quadrant_image(64, 64, 10, 10);
        let (pyramid, keypoints) = detector.detect_image(&img).unwrap();
        let level0: Vec<&Keypoint> = keypoints.iter().filter(|k| k.octave == 0).collect();
        assert_eq!(level0.len(), 1);
        assert_eq!((level0[0].x, level0[0].y), (10.0, 10.0));
        assert_eq!(level0[0].response, 1650.0);
        assert!(level0[0].angle.is_none());
        assert!(pyramid.len() > 1);
    }

    #[test]
    fn test_keypoints_ordered_by_level() {
        let detector = FastDetector::new(create_test_config()).unwrap();
        let img = create_multiple_corners_image(128, 128);
        let (_, keypoints) = detector.detect_image(&img).unwrap();
        assert!(!keypoints.is_empty());
        for pair in keypoints.windows(2) {
            assert!(pair[0].octave <= pair[1].octave);
        }
    }

    #[test]
    fn test_coordinates_in_original_space() {
        let detector = FastDetector::new(create_test_config()).unwrap();
        let img = create_multiple_corners_image(160, 120);
        let (_, keypoints) = detector.detect_image(&img).unwrap();
        for kp in &keypoints {
            assert!(kp.x >= 0.0 && kp.x < 160.0);
            assert!(kp.y >= 0.0 && kp.y < 120.0);
            assert!(kp.size >= 31.0);
        }
    }

    #[test]
    fn test_per_cell_limit() {
        let cfg = OrbConfig {
            max_per_cell: 1,
            cell_size: 1000,
            n_levels: 1,
            ..create_test_config()
        };
        let detector = FastDetector::new(cfg).unwrap();
        let img = create_multiple_corners_image(128, 128);
        let (_, keypoints) = detector.detect_image(&img).unwrap();
        assert_eq!(keypoints.len(), 1);
    }

    #[test]
    fn test_max_features_cap() {
        let cfg = OrbConfig {
            max_features: 3,
            ..create_test_config()
        };
        let detector = FastDetector::new(cfg).unwrap();
        let img = create_multiple_corners_image(128, 128);
        let (_, keypoints) = detector.detect_image(&img).unwrap();
        assert!(keypoints.len() <= 3);
    }

    #[test]
    fn test_repeatable_across_thread_counts() {
        let detector = FastDetector::new(create_test_config()).unwrap();
        let img = create_multiple_corners_image(128, 96);
        let pool = orbfind_core::build_thread_pool(1).unwrap();
        let (_, single) = pool.install(|| detector.detect_image(&img)).unwrap();
        for _ in 0..5 {
            let (_, parallel) = detector.detect_image(&img).unwrap();
            assert_eq!(parallel, single);
        }
    }
}
