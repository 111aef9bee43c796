use thiserror::Error;

/// Problems with an image handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid image dimensions: {width}x{height} (must be > 0)")]
    EmptyImage { width: usize, height: usize },
    #[error("image data length mismatch: expected {expected_len}, got {actual_len}")]
    InvalidImageData { expected_len: usize, actual_len: usize },
    #[error("unsupported channel count {0} (expected 1, 2, 3 or 4)")]
    UnsupportedChannels(usize),
}

/// Invalid or mutually inconsistent parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("descriptor length mismatch: query has {query} bits, train has {train} bits")]
    DescriptorLengthMismatch { query: usize, train: usize },
    #[error("{set} descriptors differ in length: {expected} and {found} bits")]
    RaggedDescriptors {
        set: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    #[error("invalid downscale factor {0} (must be in (0, 1))")]
    InvalidDownscale(f32),
    #[error("invalid threshold: {0} (must be 1-127)")]
    InvalidThreshold(u8),
    #[error("unsupported FAST circle radius {0} (expected 1, 2 or 3)")]
    InvalidRadius(usize),
    #[error("invalid minimum arc length {arc} for a circle of {samples} samples")]
    InvalidArcLength { arc: usize, samples: usize },
    #[error("invalid patch size {0} (must be odd and at least 7)")]
    InvalidPatchSize(usize),
    #[error("invalid descriptor length {0} bits (must be a multiple of 8 in 8..=256)")]
    InvalidDescriptorBits(usize),
    #[error("keypoint octave {octave} not present in a pyramid of {levels} levels")]
    OctaveOutOfRange { octave: usize, levels: usize },
}

/// Failures of the detection / description / matching pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbError {
    #[error(transparent)]
    Input(#[from] InputError),
    /// One or both sides had nothing to match. Distinct from a successful
    /// match that produced no close pairs.
    #[error("no features to match (query: {query}, train: {train})")]
    NoFeatures { query: usize, train: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type OrbResult<T> = Result<T, OrbError>;
