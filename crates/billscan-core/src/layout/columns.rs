//! Approximate column positions from token centers.

use super::rows::Row;

const REFINEMENT_ROUNDS: usize = 4;

/// Estimate `n_columns` column centers from the horizontal centers of all
/// tokens in `rows`.
///
/// Centers start evenly spaced between the leftmost and rightmost token
/// and go through a few rounds of nearest-center assignment and mean
/// update. A center that attracts no token stays where it is. The result
/// is sorted left to right.
pub fn guess_column_positions(rows: &[Row<'_>], n_columns: usize) -> Vec<f64> {
    let xs: Vec<f64> = rows
        .iter()
        .flat_map(|row| row.tokens().iter().map(|t| t.cx))
        .collect();

    if xs.is_empty() || n_columns == 0 {
        return Vec::new();
    }

    let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut centers: Vec<f64> = if n_columns == 1 {
        vec![min_x]
    } else {
        let step = (max_x - min_x) / (n_columns - 1) as f64;
        (0..n_columns).map(|i| min_x + step * i as f64).collect()
    };

    for _ in 0..REFINEMENT_ROUNDS {
        let mut sums = vec![0.0; centers.len()];
        let mut counts = vec![0usize; centers.len()];

        for &x in &xs {
            let nearest = nearest_center(&centers, x);
            sums[nearest] += x;
            counts[nearest] += 1;
        }

        for (i, center) in centers.iter_mut().enumerate() {
            if counts[i] > 0 {
                *center = sums[i] / counts[i] as f64;
            }
        }
    }

    centers.sort_by(f64::total_cmp);
    centers
}

/// Index of the center closest to `x`; ties go to the lower index.
fn nearest_center(centers: &[f64], x: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;

    for (i, center) in centers.iter().enumerate() {
        let distance = (x - center).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }

    best
}
