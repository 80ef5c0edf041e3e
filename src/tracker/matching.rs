//! Spatial/class matching of detections against tracks.

use nalgebra::{Point3, distance};
use ndarray::Array2;

use crate::tracker::config::MatchPolicy;

/// Matching input for one track or one resolved detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub position: Point3<f32>,
    pub class_id: usize,
}

impl Candidate {
    pub fn new(position: Point3<f32>, class_id: usize) -> Self {
        Self { position, class_id }
    }
}

/// Compute the world distance matrix between tracks and detections.
///
/// Pairs of different classes can never match and get `f32::INFINITY`.
pub fn distance_matrix(tracks: &[Candidate], detections: &[Candidate]) -> Array2<f32> {
    let mut dists = Array2::from_elem((tracks.len(), detections.len()), f32::INFINITY);
    for (i, t) in tracks.iter().enumerate() {
        for (j, d) in detections.iter().enumerate() {
            if t.class_id == d.class_id {
                dists[[i, j]] = distance(&t.position, &d.position);
            }
        }
    }
    dists
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult {
    /// `(track index, detection index)` pairs
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Assign detections to tracks with strictly-below-`thresh` distances.
///
/// Each track and each detection takes part in at most one match.
pub fn assign(cost_matrix: &Array2<f32>, thresh: f32, policy: MatchPolicy) -> AssignmentResult {
    match policy {
        MatchPolicy::FirstFit => first_fit_assignment(cost_matrix, thresh),
        MatchPolicy::Nearest => nearest_assignment(cost_matrix, thresh),
    }
}

/// Detections in order each claim the lowest-index unclaimed track in range.
pub fn first_fit_assignment(cost_matrix: &Array2<f32>, thresh: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();
    let mut track_claimed = vec![false; num_rows];
    let mut det_claimed = vec![false; num_cols];
    let mut matches = Vec::new();

    for j in 0..num_cols {
        let found = (0..num_rows).find(|&i| !track_claimed[i] && cost_matrix[[i, j]] < thresh);
        if let Some(i) = found {
            track_claimed[i] = true;
            det_claimed[j] = true;
            matches.push((i, j));
        }
    }

    collect_result(matches, &track_claimed, &det_claimed)
}

/// All in-range pairs, committed greedily by ascending distance.
///
/// Equal distances fall back to detection order, then track order.
pub fn nearest_assignment(cost_matrix: &Array2<f32>, thresh: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();
    let mut pairs: Vec<(f32, usize, usize)> = cost_matrix
        .indexed_iter()
        .filter(|&(_, &cost)| cost < thresh)
        .map(|((i, j), &cost)| (cost, i, j))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.2.cmp(&b.2)).then(a.1.cmp(&b.1)));

    let mut track_claimed = vec![false; num_rows];
    let mut det_claimed = vec![false; num_cols];
    let mut matches = Vec::new();

    for (_, i, j) in pairs {
        if track_claimed[i] || det_claimed[j] {
            continue;
        }
        track_claimed[i] = true;
        det_claimed[j] = true;
        matches.push((i, j));
    }
    matches.sort_by_key(|&(_, j)| j);

    collect_result(matches, &track_claimed, &det_claimed)
}

fn collect_result(
    matches: Vec<(usize, usize)>,
    track_claimed: &[bool],
    det_claimed: &[bool],
) -> AssignmentResult {
    let unclaimed = |mask: &[bool]| -> Vec<usize> {
        mask.iter()
            .enumerate()
            .filter_map(|(i, &claimed)| if claimed { None } else { Some(i) })
            .collect()
    };

    AssignmentResult {
        matches,
        unmatched_tracks: unclaimed(track_claimed),
        unmatched_detections: unclaimed(det_claimed),
    }
}
