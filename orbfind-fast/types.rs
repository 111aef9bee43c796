/// Corner candidate in the pixel grid of one pyramid level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x: usize,
    pub y: usize,
    pub score: f32,
}

impl Candidate {
    /// Row-major position, the fixed tie-break for equal scores
    #[inline]
    pub fn raster_index(&self, width: usize) -> usize {
        self.y * width + self.x
    }
}

/// Polarity of the contiguous arc that made a pixel a corner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerType {
    Bright,
    Dark,
    None,
}
