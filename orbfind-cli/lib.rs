//! High-level object finding: detect, describe and match two images.
//!
//! ```text
//! query ─┐                                   ┌─> Features ─┐
//!        ├─> Locator::detect_and_compute ────┤             ├─> matcher -> select_top -> Correspondences
//! scene ─┘                                   └─> Features ─┘
//! ```

use log::info;
use orbfind_brief::BriefExtractor;
use orbfind_core::{Descriptor, Image, Keypoint, Match, OrbError};
use orbfind_fast::{FastDetector, OrientationEstimator};
use orbfind_match::{select_top, BruteForceMatcher};
use rayon::ThreadPool;
use thiserror::Error;

pub mod builder;
pub mod config;
pub mod render;

pub use builder::LocatorBuilder;
pub use config::LocatorConfig;
pub use orbfind_core::{self, OrbConfig};

#[derive(Debug, Error)]
pub enum LocateError {
    #[error(transparent)]
    Orb(#[from] OrbError),
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("{keypoints} keypoints paired with {descriptors} descriptors")]
    FeatureCountMismatch { keypoints: usize, descriptors: usize },
}

pub type LocateResult<T> = Result<T, LocateError>;

/// Keypoints of one image with their descriptors, index for index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    keypoints: Vec<Keypoint>,
    descriptors: Vec<Descriptor>,
}

impl Features {
    pub fn new(keypoints: Vec<Keypoint>, descriptors: Vec<Descriptor>) -> LocateResult<Self> {
        if keypoints.len() != descriptors.len() {
            return Err(LocateError::FeatureCountMismatch {
                keypoints: keypoints.len(),
                descriptors: descriptors.len(),
            });
        }
        Ok(Self {
            keypoints,
            descriptors,
        })
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Ranked matches between a query image and a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Correspondences {
    pub query: Features,
    pub scene: Features,
    /// Best matches, ascending by distance
    pub matches: Vec<Match>,
    /// Match count before ranking and truncation
    pub total_matches: usize,
}

impl Correspondences {
    pub fn best(&self) -> Option<&Match> {
        self.matches.first()
    }

    /// Query and scene keypoint of every selected match.
    pub fn pairs(&self) -> impl Iterator<Item = (&Keypoint, &Keypoint, u32)> + '_ {
        self.matches.iter().map(|m| {
            (
                &self.query.keypoints[m.query_idx],
                &self.scene.keypoints[m.train_idx],
                m.distance,
            )
        })
    }
}

/// ORB pipeline bound to its own worker pool.
#[derive(Debug)]
pub struct Locator {
    cfg: LocatorConfig,
    pool: ThreadPool,
    detector: FastDetector,
    orientation: OrientationEstimator,
    extractor: BriefExtractor,
    matcher: BruteForceMatcher,
}

impl Locator {
    /// Validates `cfg` and starts a pool of `cfg.n_threads` workers.
    pub fn new(cfg: LocatorConfig) -> LocateResult<Self> {
        cfg.validate()?;
        let pool = orbfind_core::build_thread_pool(cfg.n_threads)?;
        let detector = FastDetector::new(cfg.orb.clone())?;
        let orientation = OrientationEstimator::new(cfg.orb.patch_size);
        let extractor = BriefExtractor::from_config(&cfg.orb)?;
        let matcher = BruteForceMatcher::new(cfg.cross_check);

        Ok(Self {
            cfg,
            pool,
            detector,
            orientation,
            extractor,
            matcher,
        })
    }

    pub fn with_defaults() -> LocateResult<Self> {
        Self::new(LocatorConfig::default())
    }

    /// Oriented keypoints and their descriptors.
    ///
    /// An image without corners yields empty features, not an error.
    pub fn detect_and_compute(&self, img: &Image) -> LocateResult<Features> {
        let (keypoints, descriptors) = self.pool.install(|| -> Result<_, OrbError> {
            let (pyramid, keypoints) = self.detector.detect_image(img)?;
            let keypoints = self.orientation.assign(&pyramid, &keypoints)?;
            let descriptors = self.extractor.compute(pyramid.levels(), &keypoints)?;
            Ok((keypoints, descriptors))
        })?;

        info!(
            "{}x{} image: {} features",
            img.width(),
            img.height(),
            keypoints.len()
        );
        Features::new(keypoints, descriptors)
    }

    /// Match query features against scene features, one match per query
    /// feature in query order (fewer with cross-checking).
    pub fn match_features(&self, query: &Features, scene: &Features) -> LocateResult<Vec<Match>> {
        let matches = self
            .pool
            .install(|| self.matcher.match_sets(query.descriptors(), scene.descriptors()))?;
        Ok(matches)
    }

    /// Locate `query` in `scene`, keeping the configured number of matches.
    pub fn locate(&self, query: &Image, scene: &Image) -> LocateResult<Correspondences> {
        self.locate_top(query, scene, self.cfg.top_n)
    }

    pub fn locate_top(&self, query: &Image, scene: &Image, top_n: usize) -> LocateResult<Correspondences> {
        let query = self.detect_and_compute(query)?;
        let scene = self.detect_and_compute(scene)?;
        let matches = self.match_features(&query, &scene)?;
        let total_matches = matches.len();
        let matches = select_top(matches, top_n);

        info!(
            "{} matches between {} query and {} scene features, keeping {}",
            total_matches,
            query.len(),
            scene.len(),
            matches.len()
        );
        Ok(Correspondences {
            query,
            scene,
            matches,
            total_matches,
        })
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.cfg
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbfind_core::ConfigError;

    #[test]
    fn test_features_length_check() {
        let kp = Keypoint {
            x: 1.0,
            y: 2.0,
            octave: 0,
            size: 31.0,
            angle: Some(0.0),
            response: 10.0,
        };
        assert!(matches!(
            Features::new(vec![kp, kp], vec![Descriptor::zeros(256)]),
            Err(LocateError::FeatureCountMismatch {
                keypoints: 2,
                descriptors: 1
            })
        ));
        let features = Features::new(vec![kp], vec![Descriptor::zeros(256)]).unwrap();
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = LocatorConfig {
            n_threads: 0,
            ..LocatorConfig::default()
        };
        assert!(matches!(
            Locator::new(cfg),
            Err(LocateError::Orb(OrbError::Config(ConfigError::NonPositive("n_threads"))))
        ));
    }

    #[test]
    fn test_dedicated_pool_size() {
        let locator = LocatorBuilder::new().threads(2).build().unwrap();
        assert_eq!(locator.threads(), 2);
    }
}
