use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use orbfind_core::Keypoint;

use crate::types::Candidate;

/// Thinning of corner candidates: local maxima, grid spread and global budget
pub struct KeypointRefinement;

impl KeypointRefinement {
    /// 3x3 non-maximum suppression over row-major candidates.
    ///
    /// A candidate survives when every neighbouring candidate scores lower, or
    /// scores the same and comes later in row-major order.
    pub fn non_maximum_suppression(candidates: &[Candidate], width: usize) -> Vec<Candidate> {
        let scores: HashMap<usize, f32> = candidates
            .iter()
            .map(|c| (c.raster_index(width), c.score))
            .collect();

        candidates
            .iter()
            .filter(|c| {
                let own = c.raster_index(width);
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let (nx, ny) = (c.x as i64 + dx, c.y as i64 + dy);
                        if nx < 0 || ny < 0 || nx >= width as i64 {
                            continue;
                        }
                        let idx = ny as usize * width + nx as usize;
                        if let Some(&other) = scores.get(&idx) {
                            if other > c.score || (other == c.score && idx < own) {
                                return false;
                            }
                        }
                    }
                }
                true
            })
            .copied()
            .collect()
    }

    /// Keep the `max_per_cell` strongest candidates of every grid cell.
    ///
    /// Equal scores keep row-major order. Output is in row-major order.
    pub fn retain_best_per_cell(candidates: &[Candidate], cell_size: usize, max_per_cell: usize) -> Vec<Candidate> {
        let mut cells: BTreeMap<(usize, usize), Vec<(usize, Candidate)>> = BTreeMap::new();
        for (order, c) in candidates.iter().enumerate() {
            cells
                .entry((c.y / cell_size, c.x / cell_size))
                .or_default()
                .push((order, *c));
        }

        let mut kept: Vec<(usize, Candidate)> = Vec::with_capacity(candidates.len());
        for (_, mut cell) in cells {
            // stable: ties keep scan order
            cell.sort_by(|a, b| Self::by_score_desc(a.1.score, b.1.score));
            kept.extend(cell.into_iter().take(max_per_cell));
        }
        kept.sort_unstable_by_key(|&(order, _)| order);
        kept.into_iter().map(|(_, c)| c).collect()
    }

    /// Keep the `max_features` strongest keypoints, preserving their order.
    ///
    /// Ties go to the earlier keypoint. `max_features == 0` keeps everything.
    pub fn retain_best(keypoints: Vec<Keypoint>, max_features: usize) -> Vec<Keypoint> {
        if max_features == 0 || keypoints.len() <= max_features {
            return keypoints;
        }

        let mut ranked: Vec<(usize, Keypoint)> = keypoints.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| Self::by_score_desc(a.1.response, b.1.response));
        ranked.truncate(max_features);
        ranked.sort_unstable_by_key(|&(order, _)| order);
        ranked.into_iter().map(|(_, kp)| kp).collect()
    }

    fn by_score_desc(a: f32, b: f32) -> Ordering {
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    }
}
