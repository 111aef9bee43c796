mod config;
mod error;
mod image;

pub use config::{validate_descriptor_bits, OrbConfig, MAX_DESCRIPTOR_BITS};
pub use error::{ConfigError, InputError, OrbError, OrbResult};
pub use image::Image;

/// Key-point ≙ FAST corner in original image coordinates, plus the pyramid
/// level it was found on and its orientation once estimated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Pyramid level index
    pub octave: usize,
    /// Diameter of the described neighbourhood, in original pixels
    pub size: f32,
    /// Radians in (-π, π]; `None` until orientation runs
    pub angle: Option<f32>,
    /// Corner strength
    pub response: f32,
}

impl Keypoint {
    /// Integer position on the keypoint's own pyramid level.
    #[inline]
    pub fn level_position(&self, scale: f32) -> (isize, isize) {
        ((self.x * scale).round() as isize, (self.y * scale).round() as isize)
    }

    pub fn with_angle(self, angle: f32) -> Self {
        Self {
            angle: Some(angle),
            ..self
        }
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

/// Binary descriptor. Bit `i` lives in bit `i % 8` of byte `i / 8`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor(Vec<u8>);

impl Descriptor {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn zeros(bits: usize) -> Self {
        Self(vec![0; bits.div_ceil(8)])
    }

    pub fn bit_len(&self) -> usize {
        self.0.len() * 8
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        (self.0[i / 8] >> (i % 8)) & 1 == 1
    }

    #[inline]
    pub fn set_bit(&mut self, i: usize) {
        self.0[i / 8] |= 1 << (i % 8);
    }

    /// Number of differing bits.
    ///
    /// # Panics
    ///
    /// If the descriptors differ in length. Sets of descriptors from
    /// different extractors should go through the matcher, which reports the
    /// mismatch as a `ConfigError` instead.
    #[inline]
    pub fn hamming(&self, other: &Descriptor) -> u32 {
        assert_eq!(
            self.0.len(),
            other.0.len(),
            "hamming distance between descriptors of different lengths"
        );
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| (a ^ b).count_ones())
            .sum()
    }
}

/// Query descriptor `query_idx` paired with train descriptor `train_idx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: u32,
}

/// One level of the scale pyramid.
#[derive(Debug, Clone)]
pub struct PyramidLevel {
    pub octave: usize,
    /// Level size relative to the original image (1.0 at level 0)
    pub scale: f32,
    /// Pixels used for corner tests and orientation
    pub image: Image,
    /// Blurred copy used for descriptor sampling
    pub smoothed: Image,
}

impl PyramidLevel {
    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }
}

/// Build a dedicated Rayon pool with the specified number of threads
pub fn build_thread_pool(n_threads: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("orbfind-{i}"))
        .build()
}

/// Default worker count.
pub fn default_threads() -> usize {
    num_cpus::get().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_descriptor_bits() {
        let mut d = Descriptor::zeros(16);
        d.set_bit(0);
        d.set_bit(9);
        assert_eq!(d.as_bytes(), &[0b0000_0001, 0b0000_0010]);
        assert!(d.bit(9));
        assert!(!d.bit(8));
        assert_eq!(d.bit_len(), 16);
    }

    #[test]
    fn test_level_position_round_trip() {
        let scale = (1.0f32 / 1.2).powi(3);
        let kp = Keypoint {
            x: 17.0 / scale,
            y: 4.0 / scale,
            octave: 3,
            size: 31.0 / scale,
            angle: None,
            response: 1.0,
        };
        assert_eq!(kp.level_position(scale), (17, 4));
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn test_hamming_rejects_length_mismatch() {
        let long = Descriptor::zeros(256);
        let short = Descriptor::zeros(128);
        long.hamming(&short);
    }

    proptest! {
        #[test]
        fn hamming_is_symmetric_and_bounded(
            a in proptest::collection::vec(any::<u8>(), 32),
            b in proptest::collection::vec(any::<u8>(), 32),
        ) {
            let (a, b) = (Descriptor::from_bytes(a), Descriptor::from_bytes(b));
            let d = a.hamming(&b);
            prop_assert_eq!(d, b.hamming(&a));
            prop_assert!(d as usize <= a.bit_len());
            prop_assert_eq!(a.hamming(&a), 0);
        }
    }
}
