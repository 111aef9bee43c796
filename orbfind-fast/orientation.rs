use std::f32::consts::PI;

use orbfind_core::{ConfigError, Image, Keypoint, OrbResult, PyramidLevel};
use rayon::prelude::*;

use crate::pyramid::ImagePyramid;

/// Intensity-centroid orientation over a disk of fixed radius
#[derive(Debug, Clone)]
pub struct OrientationEstimator {
    radius: i32,
    /// Half-width of each disk row, indexed by |dy|
    row_extent: Vec<i32>,
}

impl OrientationEstimator {
    pub fn new(patch_size: usize) -> Self {
        let radius = (patch_size / 2) as i32;
        let r2 = radius * radius;
        let row_extent = (0..=radius)
            .map(|dy| {
                let mut dx = 0;
                while (dx + 1) * (dx + 1) + dy * dy <= r2 {
                    dx += 1;
                }
                dx
            })
            .collect();
        Self { radius, row_extent }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Angle of the intensity centroid around `(cx, cy)`, in (-π, π].
    ///
    /// Pixels outside the image take the nearest border value. A patch with
    /// zero total intensity has angle 0.
    pub fn compute_orientation(&self, img: &Image, cx: isize, cy: isize) -> f32 {
        let mut m00 = 0i64;
        let mut m10 = 0i64;
        let mut m01 = 0i64;

        for dy in -self.radius..=self.radius {
            let extent = self.row_extent[dy.unsigned_abs() as usize];
            for dx in -extent..=extent {
                let val = img.get_clamped(cx + dx as isize, cy + dy as isize) as i64;
                m00 += val;
                m10 += dx as i64 * val;
                m01 += dy as i64 * val;
            }
        }

        if m00 == 0 {
            return 0.0;
        }
        normalize_angle((m01 as f32).atan2(m10 as f32))
    }

    /// Orientation of a keypoint measured on its own pyramid level.
    pub fn orient(&self, level: &PyramidLevel, kp: &Keypoint) -> f32 {
        let (x, y) = kp.level_position(level.scale);
        self.compute_orientation(&level.image, x, y)
    }

    /// Assign orientations to every keypoint in parallel.
    pub fn assign(&self, pyramid: &ImagePyramid, keypoints: &[Keypoint]) -> OrbResult<Vec<Keypoint>> {
        keypoints
            .par_iter()
            .map(|kp| -> OrbResult<Keypoint> {
                let level = pyramid.level(kp.octave).ok_or(ConfigError::OctaveOutOfRange {
                    octave: kp.octave,
                    levels: pyramid.len(),
                })?;
                Ok(kp.with_angle(self.orient(level, kp)))
            })
            .collect()
    }
}

/// Map an angle into (-π, π].
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    if angle <= -PI {
        angle + 2.0 * PI
    } else if angle > PI {
        angle - 2.0 * PI
    } else {
        angle
    }
}
