//! Scale pyramid, FAST corner detection and intensity-centroid orientation.
//!
//! ```text
//! Image -> ImagePyramid -> FastDetector (per level) -> Vec<Keypoint>
//!                                                   -> OrientationEstimator
//! ```

pub mod corner_detection;
pub mod detector;
pub mod orientation;
pub mod preprocessing;
pub mod pyramid;
pub mod refinement;
pub mod types;
pub mod utils;

pub use corner_detection::CornerDetector;
pub use detector::FastDetector;
pub use orientation::{normalize_angle, OrientationEstimator};
pub use pyramid::ImagePyramid;
pub use refinement::KeypointRefinement;
pub use types::{Candidate, CornerType};
