use log::debug;
use orbfind_core::{ConfigError, Descriptor, Match, OrbError, OrbResult};
use rayon::prelude::*;

/// Exhaustive nearest-neighbour search under Hamming distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceMatcher {
    /// Keep only pairs that are each other's nearest neighbour
    pub cross_check: bool,
}

impl BruteForceMatcher {
    pub fn new(cross_check: bool) -> Self {
        Self { cross_check }
    }

    pub fn match_sets(&self, query: &[Descriptor], train: &[Descriptor]) -> OrbResult<Vec<Match>> {
        if self.cross_check {
            match_mutual(query, train)
        } else {
            match_descriptors(query, train)
        }
    }
}

/// Best train descriptor for every query descriptor.
///
/// Returns exactly one match per query, in query order. Ties go to the
/// smallest train index.
pub fn match_descriptors(query: &[Descriptor], train: &[Descriptor]) -> OrbResult<Vec<Match>> {
    check_sets(query, train)?;

    let matches: Vec<Match> = query
        .par_iter()
        .enumerate()
        .map(|(query_idx, q)| nearest(query_idx, q, train))
        .collect();

    debug!("matched {} query descriptors against {}", query.len(), train.len());
    Ok(matches)
}

/// One-directional matches whose train descriptor picks the same query
/// descriptor back. A subset of [`match_descriptors`], in query order.
pub fn match_mutual(query: &[Descriptor], train: &[Descriptor]) -> OrbResult<Vec<Match>> {
    let forward = match_descriptors(query, train)?;
    let backward = match_descriptors(train, query)?;

    let mutual: Vec<Match> = forward
        .into_iter()
        .filter(|m| backward[m.train_idx].train_idx == m.query_idx)
        .collect();

    debug!("{} of {} matches are mutual", mutual.len(), query.len());
    Ok(mutual)
}

#[inline]
fn nearest(query_idx: usize, q: &Descriptor, train: &[Descriptor]) -> Match {
    let mut best = Match {
        query_idx,
        train_idx: 0,
        distance: u32::MAX,
    };
    for (train_idx, t) in train.iter().enumerate() {
        let distance = q.hamming(t);
        if distance < best.distance {
            best.train_idx = train_idx;
            best.distance = distance;
        }
    }
    best
}

fn check_sets(query: &[Descriptor], train: &[Descriptor]) -> OrbResult<()> {
    if query.is_empty() || train.is_empty() {
        return Err(OrbError::NoFeatures {
            query: query.len(),
            train: train.len(),
        });
    }

    let bits = uniform_length("query", query)?;
    let train_bits = uniform_length("train", train)?;
    if bits != train_bits {
        return Err(ConfigError::DescriptorLengthMismatch {
            query: bits,
            train: train_bits,
        }
        .into());
    }
    Ok(())
}

/// Bit length shared by every descriptor of a non-empty set.
fn uniform_length(set: &'static str, descriptors: &[Descriptor]) -> Result<usize, ConfigError> {
    let expected = descriptors.first().map_or(0, Descriptor::bit_len);
    match descriptors.iter().find(|d| d.bit_len() != expected) {
        Some(d) => Err(ConfigError::RaggedDescriptors {
            set,
            expected,
            found: d.bit_len(),
        }),
        None => Ok(expected),
    }
}
