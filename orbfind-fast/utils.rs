//! Utility functions for the segment test

/// Check if there are at least `min_count` consecutive set bits in the
/// circular `mask` of `len` samples, using a rotate-and-AND bitmask approach.
#[inline]
pub fn has_consecutive_bits(mask: u32, len: usize, min_count: usize) -> bool {
    if min_count == 0 || min_count > len || len > 32 {
        return false;
    }
    let full = if len == 32 { u32::MAX } else { (1u32 << len) - 1 };
    let mask = mask & full;
    if min_count == len {
        return mask == full;
    }

    // A run of n set bits survives n-1 AND-ed rotations
    let mut test_mask = mask;
    for i in 1..min_count {
        let rotated = ((mask >> i) | (mask << (len - i))) & full;
        test_mask &= rotated;
        if test_mask == 0 {
            return false;
        }
    }
    test_mask != 0
}
