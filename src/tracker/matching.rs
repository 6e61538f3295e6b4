//! Matching utilities for centroid tracking.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::tracker::rect::{Rect, tlbr_centroid};

/// Detection input for the tracker.
///
/// Kept as given by the detector, `[min x, min y, max x, max y]`, so the
/// centroid is computed from the exact corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    tlbr: [f32; 4],
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            tlbr: [x1, y1, x2, y2],
        }
    }

    pub fn from_rect(bbox: Rect) -> Self {
        Self {
            tlbr: bbox.to_tlbr(),
        }
    }

    pub fn tlbr(&self) -> [f32; 4] {
        self.tlbr
    }

    /// The box as a [`Rect`].
    pub fn bbox(&self) -> Rect {
        let [x1, y1, x2, y2] = self.tlbr;
        Rect::from_tlbr(x1, y1, x2, y2)
    }

    /// Tracking reference point, see [`tlbr_centroid`].
    pub fn centroid(&self) -> Point {
        tlbr_centroid(self.tlbr)
    }
}

/// How existing objects are paired with new centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// Rows ordered by their nearest distance, each takes its nearest free
    /// column. Not optimal: a row whose nearest column is taken stays
    /// unmatched even if another column is free.
    #[default]
    Greedy,
    /// Minimum total distance bipartite assignment (LAPJV).
    Optimal,
}

/// Compute the Euclidean distance matrix between object centroids (rows) and
/// input centroids (columns).
pub fn distance_matrix(objects: &[Point], inputs: &[Point]) -> Array2<f64> {
    let mut dists = Array2::zeros((objects.len(), inputs.len()));
    for (i, o) in objects.iter().enumerate() {
        for (j, c) in inputs.iter().enumerate() {
            dists[[i, j]] = o.distance(*c);
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

impl AssignmentResult {
    fn from_matches(matches: Vec<(usize, usize)>, num_rows: usize, num_cols: usize) -> Self {
        let mut row_used = vec![false; num_rows];
        let mut col_used = vec![false; num_cols];
        for &(row, col) in &matches {
            row_used[row] = true;
            col_used[col] = true;
        }

        Self {
            matches,
            unmatched_tracks: unused_indices(&row_used),
            unmatched_detections: unused_indices(&col_used),
        }
    }
}

fn unused_indices(used: &[bool]) -> Vec<usize> {
    used.iter()
        .enumerate()
        .filter_map(|(i, &u)| if u { None } else { Some(i) })
        .collect()
}

/// Solve the assignment with the given strategy.
///
/// Matches further apart than `max_distance` are dropped, leaving both sides
/// unmatched.
pub fn assign(
    cost_matrix: &Array2<f64>,
    strategy: AssignmentStrategy,
    max_distance: Option<f64>,
) -> AssignmentResult {
    let mut result = match strategy {
        AssignmentStrategy::Greedy => greedy_assignment(cost_matrix),
        AssignmentStrategy::Optimal => linear_assignment(cost_matrix),
    };

    if let Some(limit) = max_distance {
        let (num_rows, num_cols) = cost_matrix.dim();
        let kept = result
            .matches
            .into_iter()
            .filter(|&(row, col)| cost_matrix[[row, col]] <= limit)
            .collect();
        result = AssignmentResult::from_matches(kept, num_rows, num_cols);
    }

    result
}

/// Greedy nearest-neighbour assignment.
///
/// Rows are visited in ascending order of their minimum distance (ties keep
/// row order). Each row proposes its arg-min column and the pair is committed
/// unless the column was already taken by an earlier row.
pub fn greedy_assignment(cost_matrix: &Array2<f64>) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();
    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult::from_matches(vec![], num_rows, num_cols);
    }

    // (row, nearest column, distance to it)
    let mut proposals: Vec<(usize, usize, f64)> = cost_matrix
        .rows()
        .into_iter()
        .enumerate()
        .map(|(row, costs)| {
            let (col, min) = costs
                .iter()
                .enumerate()
                .fold((0, f64::INFINITY), |best, (j, &c)| {
                    if c < best.1 { (j, c) } else { best }
                });
            (row, col, min)
        })
        .collect();
    proposals.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut col_used = vec![false; num_cols];
    let mut matches = Vec::new();
    for (row, col, _) in proposals {
        if col_used[col] {
            continue;
        }
        col_used[col] = true;
        matches.push((row, col));
    }

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}

/// Optimal assignment minimising the summed distance, solved with LAPJV on a
/// square padded copy of the cost matrix.
pub fn linear_assignment(cost_matrix: &Array2<f64>) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();
    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult::from_matches(vec![], num_rows, num_cols);
    }

    // Padding must cost more than any real pair so it is only used for surplus.
    let max_cost = cost_matrix.iter().cloned().fold(0.0_f64, f64::max);
    let pad = (max_cost + 1.0) * (num_rows.max(num_cols) as f64);

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), pad);
    for i in 0..num_rows {
        for j in 0..num_cols {
            padded[[i, j]] = cost_matrix[[i, j]];
        }
    }

    let matches: Vec<(usize, usize)> = match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => row_to_col
            .into_iter()
            .enumerate()
            .filter(|&(row, col)| row < num_rows && col < num_cols)
            .collect(),
        Err(err) => {
            tracing::warn!(?err, "LAPJV failed, falling back to greedy assignment");
            return greedy_assignment(cost_matrix);
        }
    };

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}
