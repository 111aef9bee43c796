use orbfind_core::Image;
use rayon::prelude::*;

use crate::types::{Candidate, CornerType};
use crate::utils::has_consecutive_bits;

/// Bresenham circle of radius 1 (8 samples)
pub const CIRCLE_8: [(i32, i32); 8] = [
    (0, -1), (1, -1), (1, 0), (1, 1),
    (0, 1), (-1, 1), (-1, 0), (-1, -1),
];

/// Bresenham circle of radius 2 (12 samples)
pub const CIRCLE_12: [(i32, i32); 12] = [
    (0, -2), (1, -2), (2, -1), (2, 0),
    (2, 1), (1, 2), (0, 2), (-1, 2),
    (-2, 1), (-2, 0), (-2, -1), (-1, -2),
];

/// Bresenham circle of radius 3 (16 samples)
pub const CIRCLE_16: [(i32, i32); 16] = [
    (0, -3), (1, -3), (2, -2), (3, -1),
    (3, 0), (3, 1), (2, 2), (1, 3),
    (0, 3), (-1, 3), (-2, 2), (-3, 1),
    (-3, 0), (-3, -1), (-2, -2), (-1, -3),
];

/// Segment-test corner detector for a single pyramid level
#[derive(Debug, Clone, Copy)]
pub struct CornerDetector {
    radius: usize,
    threshold: u8,
    min_arc: usize,
}

impl CornerDetector {
    /// Parameters are expected to be validated by `OrbConfig::validate`.
    pub fn new(radius: usize, threshold: u8, min_arc: usize) -> Self {
        Self {
            radius,
            threshold,
            min_arc,
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn offsets(&self) -> &'static [(i32, i32)] {
        match self.radius {
            1 => &CIRCLE_8,
            2 => &CIRCLE_12,
            _ => &CIRCLE_16,
        }
    }

    /// Scan every pixel at least `radius` away from the border.
    ///
    /// Rows are processed in parallel; the result is in row-major order
    /// regardless of scheduling.
    pub fn detect(&self, img: &Image) -> Vec<Candidate> {
        let (width, height) = img.dimensions();
        let r = self.radius;
        if width < 2 * r + 1 || height < 2 * r + 1 {
            return Vec::new();
        }

        (r..height - r)
            .into_par_iter()
            .flat_map_iter(|y| {
                let mut row = Vec::new();
                for x in r..width - r {
                    if let Some(score) = self.corner_score(img, x, y) {
                        row.push(Candidate { x, y, score });
                    }
                }
                row
            })
            .collect()
    }

    /// Classify the pixel at `(x, y)`. Caller guarantees the circle is inside the image.
    pub fn classify(&self, img: &Image, x: usize, y: usize) -> (CornerType, f32) {
        let width = img.width();
        let data = img.as_raw();
        let center = data[y * width + x] as i32;
        let t = self.threshold as i32;
        let offsets = self.offsets();

        let mut bright_mask = 0u32;
        let mut dark_mask = 0u32;
        let mut bright_sum = 0i32;
        let mut dark_sum = 0i32;

        for (i, &(dx, dy)) in offsets.iter().enumerate() {
            let px = (x as i32 + dx) as usize;
            let py = (y as i32 + dy) as usize;
            let q = data[py * width + px] as i32;

            if q > center + t {
                bright_mask |= 1 << i;
                bright_sum += q - center;
            } else if q < center - t {
                dark_mask |= 1 << i;
                dark_sum += center - q;
            }
        }

        let n = offsets.len();
        let bright = has_consecutive_bits(bright_mask, n, self.min_arc);
        let dark = has_consecutive_bits(dark_mask, n, self.min_arc);

        match (bright, dark) {
            (true, true) if dark_sum > bright_sum => (CornerType::Dark, dark_sum as f32),
            (true, _) => (CornerType::Bright, bright_sum as f32),
            (false, true) => (CornerType::Dark, dark_sum as f32),
            (false, false) => (CornerType::None, 0.0),
        }
    }

    /// Corner strength if the pixel passes the segment test
    #[inline]
    pub fn corner_score(&self, img: &Image, x: usize, y: usize) -> Option<f32> {
        match self.classify(img, x, y) {
            (CornerType::None, _) => None,
            (_, score) => Some(score),
        }
    }
}
