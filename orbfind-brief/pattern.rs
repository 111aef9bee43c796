/// Patch side the sampling table was laid out for
pub const PATTERN_PATCH_SIZE: usize = 31;

/// Fixed BRIEF sampling table: 256 point pairs `[x1, y1, x2, y2]`, offsets
/// relative to the keypoint within a 31x31 patch (|offset| <= 13).
///
/// Bit `i` of a descriptor compares the two points of pair `i`.
pub const BIT_PATTERN_31: [[i8; 4]; 256] = [
    [8, -3, 9, 5], [-11, 9, -8, 2], [3, -12, -13, 2], [-3, -7, -4, 5],
    [1, -11, 12, -2], [1, -1, 11, -1], [4, -2, -5, -8], [2, -13, -8, 9],
    [-11, 1, 6, 2], [11, 11, 12, -1], [6, -12, -9, -8], [12, 5, 3, -6],
    [1, 1, -4, -1], [7, -4, -6, 7], [-3, 2, 9, -8], [-4, -8, 3, 3],
    [-5, 3, 0, -4], [2, -11, -13, 0], [10, 5, 5, 2], [0, 9, 10, -3],
    [5, -8, -10, 1], [8, 3, -8, -5], [2, -6, -9, -4], [-12, 2, 0, -10],
    [5, -10, -7, -2], [-7, 9, -1, 0], [0, -1, -3, 3], [-12, 5, -2, -1],
    [-1, 1, -5, -11], [-1, 2, -3, 0], [-5, -6, 7, -1], [4, 7, 0, -8],
    [-9, 9, 3, -13], [7, -3, 13, -7], [10, -4, -5, 3], [6, 1, -13, -13],
    [-12, -11, 7, 0], [0, -1, -8, -6], [-10, -5, -6, 7], [10, 2, -6, -12],
    [-11, 8, 4, -2], [9, 0, -11, -4], [0, 11, 6, -11], [4, 1, -10, -3],
    [-6, 12, 1, 12], [-4, -8, 8, -7], [-3, 0, 8, 3], [3, 3, -3, -1],
    [-6, -11, -2, 12], [0, -3, -6, -3], [-6, 3, -12, -8], [6, 3, -2, -10],
    [-3, -10, -1, 0], [11, 2, 11, 3], [1, -8, -10, 8], [2, -2, -7, 8],
    [0, -13, 13, 0], [6, -9, -1, -1], [7, 5, 6, 3], [-13, 7, -7, -7],
    [-5, -13, 5, -11], [6, 7, -2, 12], [-6, -11, 8, 6], [-2, -2, -5, 9],
    [5, 4, 7, -6], [0, 11, -4, -5], [10, 1, 2, -8], [-3, -10, -10, -10],
    [1, 9, 6, -5], [-7, -11, 11, 3], [11, -2, -4, 3], [7, -1, 5, 12],
    [-5, 5, -2, -5], [8, -11, -1, -13], [-13, 2, -11, -8], [-2, 9, 5, 0],
    [2, -5, 2, 0], [3, -13, -12, 9], [6, -3, 5, 4], [10, 10, 1, -9],
    [-13, -8, -4, 10], [2, -2, -3, 8], [-13, -11, -8, -3], [2, -4, -7, -3],
    [12, 0, -2, 13], [-11, 7, -10, -1], [-5, -10, 0, -11], [6, 7, 12, -3],
    [-1, -1, 8, -6], [-6, 3, -1, -3], [-2, -11, -11, -3], [12, -2, 3, -10],
    [-11, -1, -2, -8], [3, -1, 7, 3], [2, -2, -12, 12], [6, -4, 12, -2],
    [-3, 11, 2, -12], [-1, 3, 2, 3], [1, 3, -11, -3], [2, -8, -7, -5],
    [0, -5, -11, -6], [-12, 8, -2, 9], [3, -7, 9, -8], [-10, -6, -1, -11],
    [11, -6, -3, -13], [3, 0, 0, -8], [-5, -2, -1, -13], [-8, -5, -10, -13],
    [7, -13, 0, -3], [1, -4, -1, -13], [6, -5, -7, 8], [8, 7, -5, -13],
    [2, 0, -8, -6], [-8, -3, -13, -6], [-6, 5, 0, 6], [-8, 8, -9, 1],
    [10, 1, -9, 4], [-4, -8, -5, 7], [7, 7, 10, -8], [-7, -3, -1, 1],
    [10, -1, 3, 1], [5, 6, -10, -8], [-6, -13, 5, -8], [4, -3, -4, -13],
    [-3, 4, -2, -13], [10, -11, 9, 11], [-9, 0, 12, 2], [-4, -2, 13, -6],
    [2, -10, -6, 1], [11, -13, 4, -13], [1, -1, 1, 9], [1, -5, -13, -5],
    [7, 4, 12, -7], [0, -2, -8, 3], [7, 2, 2, -8], [-2, 7, -12, -4],
    [1, 11, 6, -2], [-1, -1, -4, 10], [0, 8, 0, -13], [3, 12, 5, -13],
    [-9, -1, 9, -13], [12, 4, -6, -4], [-13, 13, 1, -4], [0, -2, -7, -9],
    [10, -8, -13, 3], [2, -13, 6, 8], [10, -6, -7, 0], [-11, 7, -1, -7],
    [12, 0, 5, -4], [-7, -8, 4, -12], [-13, 5, -5, -2], [0, 5, 4, 4],
    [-2, -11, -1, 8], [9, 3, -1, -12], [0, 6, -10, 12], [1, -8, -7, -10],
    [-6, 4, -6, 3], [5, 1, -3, -9], [-6, 6, -6, 3], [7, -8, 1, -7],
    [3, 8, -9, -5], [2, -4, 5, 7], [11, 4, 6, -3], [-8, -1, 11, -1],
    [-3, -6, -10, -8], [2, 7, 3, -12], [-4, -10, 12, -3], [1, -2, -4, 6],
    [3, 11, -11, 0], [-6, 2, 3, -8], [6, 12, 0, -13], [3, 2, -2, -5],
    [-4, 1, -6, 5], [-12, 0, -13, 9], [-6, 2, 7, -8], [-2, -4, -6, 5],
    [0, 0, 0, -13], [9, -13, -2, 0], [3, -13, 5, -12], [10, 11, -13, -13],
    [-2, 3, -12, 3], [11, 7, -7, 0], [12, 2, 1, -13], [12, -11, 12, -8],
    [-7, -2, -4, -7], [7, 5, -1, -13], [-5, -8, -9, 10], [6, 0, -3, -13],
    [12, 4, -13, 1], [-7, 8, 8, -3], [10, -4, 0, -13], [2, 1, -7, 0],
    [-5, 4, 2, -8], [12, 8, 4, -13], [8, 7, -10, 0], [-3, 6, -2, 4],
    [-5, -1, -8, -12], [4, -1, -2, -10], [6, -4, -13, 9], [-7, 8, -6, -12],
    [-10, 2, -13, 10], [-1, -7, 0, 2], [-5, 6, -5, -12], [6, -13, 7, -3],
    [-13, 2, -1, 8], [2, 8, -13, 0], [-6, -9, 1, -4], [-9, 13, 0, -13],
    [-2, -3, 8, 0], [4, 0, -11, 12], [0, 3, -10, 10], [-6, -9, -3, -2],
    [9, -4, -6, 2], [5, 0, -13, -10], [-3, -8, -13, 3], [-12, -1, -4, -2],
    [7, -9, -4, 3], [-8, -4, 1, 11], [11, 6, 2, -12], [6, 6, -8, 12],
    [-3, -8, 2, -10], [2, 5, -8, 8], [-9, 8, -6, -8], [-4, 0, -11, -7],
    [7, 6, -3, 8], [-5, 7, -12, 5], [2, -8, -5, 1], [0, 4, -5, -3],
    [9, -9, -6, -12], [0, -13, 1, 12], [-7, -11, -3, -13], [6, -12, -7, 10],
    [6, -8, -13, 7], [8, 7, -11, -1], [-11, -5, -6, 9], [6, 4, 2, -13],
    [-1, -6, 3, -9], [1, -4, 4, -3], [-6, 8, -12, 0], [-11, 3, -6, 2],
    [7, -10, 11, -6], [5, 0, 12, -13], [4, -8, 1, -1], [-13, 12, -6, 3],
    [1, 4, -9, -2], [-8, -12, -8, 7], [-9, 5, 0, -5], [9, 7, 5, 3],
    [-12, -2, 8, -8], [3, 7, 12, -8], [-13, 3, -1, -1], [-10, -4, -10, 12],
    [5, -2, 0, 13], [-7, 1, -12, 8], [2, 9, -5, -11], [11, -13, 0, 2],
];

/// Pair offsets scaled to `patch_size`, truncated to `bits` pairs.
pub fn scaled_pattern(patch_size: usize, bits: usize) -> Vec<[f32; 4]> {
    let factor = patch_size as f32 / PATTERN_PATCH_SIZE as f32;
    BIT_PATTERN_31
        .iter()
        .take(bits)
        .map(|p| {
            [
                p[0] as f32 * factor,
                p[1] as f32 * factor,
                p[2] as f32 * factor,
                p[3] as f32 * factor,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_fits_patch() {
        let half = (PATTERN_PATCH_SIZE / 2) as i8;
        for p in BIT_PATTERN_31.iter() {
            assert!(p.iter().all(|v| v.abs() < half));
        }
    }

    #[test]
    fn test_pairs_are_distinct_points() {
        for p in BIT_PATTERN_31.iter() {
            assert!(p[0] != p[2] || p[1] != p[3], "degenerate pair {:?}", p);
        }
    }

    #[test]
    fn test_scaling() {
        let pattern = scaled_pattern(62, 8);
        assert_eq!(pattern.len(), 8);
        assert_eq!(pattern[0], [16.0, -6.0, 18.0, 10.0]);
        assert_eq!(scaled_pattern(31, 256)[255], [11.0, -13.0, 0.0, 2.0]);
    }
}
