//! Accessibility analysis over the transition matrix.
//!
//! With `M` the 0/1 adjacency matrix of an `N`-state machine, the
//! accessibility matrix is `R = M + M + M² + … + Mᴺ⁻¹`. `R[i][j] > 0`
//! exactly when `j` can be reached from `i` in at least one hop. Entries
//! count (weighted) paths and saturate instead of overflowing.

use super::matrix::TransitionMatrix;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessibility {
    counts: Vec<Vec<u64>>,
}

impl Accessibility {
    /// Sum the powers of the adjacency matrix up to the state count.
    pub fn from_matrix(matrix: &TransitionMatrix) -> Self {
        let m = matrix.adjacency();
        let n = m.len();
        let mut reach = m.clone();
        let mut power = m.clone();
        for _ in 0..n.saturating_sub(1) {
            add_assign(&mut reach, &power);
            power = multiply(&power, &m);
        }
        Self { counts: reach }
    }

    /// Number of states on each side.
    pub fn size(&self) -> usize {
        self.counts.len()
    }

    /// Path count from `from` to `to`, saturating at `u64::MAX`.
    pub fn count(&self, from: usize, to: usize) -> u64 {
        self.counts[from][to]
    }

    /// Whether any path leads from `from` to `to`.
    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.count(from, to) > 0
    }

    /// Path counts row by row.
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// States other than `entry` that cannot be reached from it.
    pub fn dead_states(&self, entry: usize) -> Vec<usize> {
        (0..self.size())
            .filter(|&k| k != entry && !self.is_reachable(entry, k))
            .collect()
    }
}

fn add_assign(acc: &mut [Vec<u64>], other: &[Vec<u64>]) {
    for (row, other_row) in acc.iter_mut().zip(other) {
        for (cell, value) in row.iter_mut().zip(other_row) {
            *cell = cell.saturating_add(*value);
        }
    }
}

fn multiply(a: &[Vec<u64>], b: &[Vec<u64>]) -> Vec<Vec<u64>> {
    let n = a.len();
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    (0..n).fold(0u64, |sum, k| {
                        sum.saturating_add(a[i][k].saturating_mul(b[k][j]))
                    })
                })
                .collect()
        })
        .collect()
}
