//! Dense adjacency matrix of labeled transitions.

use serde::{Deserialize, Serialize};

/// One cell of the transition matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Vacant,
    Label(String),
}

impl Cell {
    /// Label of the transition in this cell, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Vacant => None,
            Self::Label(label) => Some(label),
        }
    }

    /// Whether the cell holds no transition.
    pub fn is_vacant(&self) -> bool {
        matches!(self, Self::Vacant)
    }
}

/// `N×N` matrix where cell `(i, j)` holds the label of the transition from
/// state `i` to state `j`, if any. There is at most one transition per
/// ordered pair of states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    size: usize,
    cells: Vec<Cell>,
}

impl TransitionMatrix {
    /// Create a `size x size` matrix with every cell vacant.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Vacant; size * size],
        }
    }

    /// Number of states on each side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell for the `origin -> destination` edge.
    pub fn get(&self, origin: usize, destination: usize) -> &Cell {
        &self.cells[origin * self.size + destination]
    }

    /// Write a label, returning whatever the cell held before.
    pub fn set(&mut self, origin: usize, destination: usize, label: impl Into<String>) -> Cell {
        let slot = &mut self.cells[origin * self.size + destination];
        std::mem::replace(slot, Cell::Label(label.into()))
    }

    /// Cells leaving `origin`, in destination index order.
    pub fn row(&self, origin: usize) -> &[Cell] {
        let start = origin * self.size;
        &self.cells[start..start + self.size]
    }

    /// Labeled transitions leaving `origin` as `(destination, label)`.
    pub fn outgoing(&self, origin: usize) -> impl Iterator<Item = (usize, &str)> {
        self.row(origin)
            .iter()
            .enumerate()
            .filter_map(|(j, cell)| cell.label().map(|label| (j, label)))
    }

    /// Position of `label`, if it labels any cell.
    pub fn find(&self, label: &str) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|cell| cell.label() == Some(label))
            .map(|k| (k / self.size, k % self.size))
    }

    /// 0/1 adjacency: 1 wherever a transition exists.
    pub fn adjacency(&self) -> Vec<Vec<u64>> {
        (0..self.size)
            .map(|i| {
                self.row(i)
                    .iter()
                    .map(|cell| u64::from(!cell.is_vacant()))
                    .collect()
            })
            .collect()
    }

    /// All labels in row-major order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().filter_map(Cell::label)
    }

    /// Number of occupied cells.
    pub fn transition_count(&self) -> usize {
        self.labels().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_matrix_is_vacant() {
        let matrix = TransitionMatrix::new(3);
        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.transition_count(), 0);
        assert!(matrix.get(2, 2).is_vacant());
    }

    #[test]
    fn set_returns_previous_cell() {
        let mut matrix = TransitionMatrix::new(2);
        assert_eq!(matrix.set(0, 1, "t0"), Cell::Vacant);
        assert_eq!(matrix.set(0, 1, "t1"), Cell::Label("t0".to_string()));
        assert_eq!(matrix.get(0, 1).label(), Some("t1"));
    }

    #[test]
    fn outgoing_follows_destination_order() {
        let mut matrix = TransitionMatrix::new(3);
        matrix.set(1, 2, "late");
        matrix.set(1, 0, "early");
        matrix.set(0, 1, "other_row");

        let outgoing: Vec<_> = matrix.outgoing(1).collect();
        assert_eq!(outgoing, vec![(0, "early"), (2, "late")]);
    }

    #[test]
    fn find_locates_label() {
        let mut matrix = TransitionMatrix::new(3);
        matrix.set(2, 1, "t5");
        assert_eq!(matrix.find("t5"), Some((2, 1)));
        assert_eq!(matrix.find("t6"), None);
    }

    #[test]
    fn adjacency_is_zero_one() {
        let mut matrix = TransitionMatrix::new(2);
        matrix.set(0, 1, "t0");
        matrix.set(1, 1, "t1");
        assert_eq!(matrix.adjacency(), vec![vec![0, 1], vec![0, 1]]);
    }
}
