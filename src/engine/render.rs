//! Plain-text rendering of a machine for logs and terminals.

use crate::engine::machine::Machine;
use std::fmt;

const MIN_COLUMN_WIDTH: usize = 4;

/// Right-aligned table with state names as row and column headers.
struct Table<'a> {
    headers: &'a [String],
    cells: Vec<Vec<String>>,
}

impl Table<'_> {
    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(j, header)| {
                self.cells
                    .iter()
                    .map(|row| row[j].len())
                    .chain([header.len(), MIN_COLUMN_WIDTH])
                    .max()
                    .unwrap_or(MIN_COLUMN_WIDTH)
                    + 2
            })
            .collect()
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_header_width = self.headers.iter().map(String::len).max().unwrap_or(0) + 2;
        let widths = self.column_widths();

        write!(f, "{:row_header_width$}", "")?;
        for (header, width) in self.headers.iter().zip(&widths) {
            write!(f, "{header:>width$}")?;
        }
        writeln!(f)?;
        for (header, row) in self.headers.iter().zip(&self.cells) {
            write!(f, "{header:>row_header_width$}")?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "{cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<C> Machine<C> {
    fn matrix_table(&self) -> Table<'_> {
        let matrix = self.matrix();
        let cells = (0..matrix.size())
            .map(|i| {
                matrix
                    .row(i)
                    .iter()
                    .map(|cell| cell.label().unwrap_or_default().to_string())
                    .collect()
            })
            .collect();
        Table {
            headers: self.states(),
            cells,
        }
    }

    fn accessibility_table(&self) -> Table<'_> {
        let cells = self
            .accessibility()
            .rows()
            .iter()
            .map(|row| row.iter().map(u64::to_string).collect())
            .collect();
        Table {
            headers: self.states(),
            cells,
        }
    }

    /// The transition matrix with labels in occupied cells.
    pub fn printable_matrix(&self) -> String {
        self.matrix_table().to_string()
    }

    /// The accessibility matrix as path counts.
    pub fn printable_accessibility(&self) -> String {
        self.accessibility_table().to_string()
    }

    /// Visited states, oldest first, e.g. `[A, B, C]`.
    pub fn printable_history(&self) -> String {
        format!("[{}]", self.history().join(", "))
    }
}

impl<C> fmt::Display for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State transitions:")?;
        for statement in self.statements() {
            writeln!(f, "\t{statement}")?;
        }
        writeln!(f, "\nTransition conditions:")?;
        for (label, guard) in self.conditions() {
            writeln!(f, "\t{label}::{}", guard.describe())?;
        }
        writeln!(f)?;
        writeln!(f, "entry_point : {}", self.entry_point())?;
        writeln!(f, "state : {}", self.current_state())?;
        writeln!(f, "state_history : {}", self.printable_history())?;
        writeln!(f, "check_disjoint : {}", self.check_disjoint())?;
        for diagnostic in self.diagnostics() {
            writeln!(f, "warning : {diagnostic}")?;
        }
        writeln!(f, "\ntransition matrix:\n{}", self.matrix_table())?;
        write!(f, "accessibility matrix:\n{}", self.accessibility_table())
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::MachineBuilder;
    use crate::core::Guard;
    use crate::engine::machine::Machine;

    fn sample() -> Machine<()> {
        let mut builder = MachineBuilder::<()>::new();
        builder.add_transition("A => B : t0").unwrap();
        builder.add_transition("B => A : t1").unwrap();
        builder.add_condition("t0", Guard::always()).unwrap();
        builder.add_condition("t1", Guard::never().named("door_open")).unwrap();
        builder.compile().unwrap()
    }

    #[test]
    fn matrix_is_right_aligned() {
        let expected = concat!(
            "        A     B\n",
            "  A          t0\n",
            "  B    t1      \n",
        );
        assert_eq!(sample().printable_matrix(), expected);
    }

    #[test]
    fn accessibility_shows_path_counts() {
        let expected = concat!(
            "        A     B\n",
            "  A     0     2\n",
            "  B     2     0\n",
        );
        assert_eq!(sample().printable_accessibility(), expected);
    }

    #[test]
    fn history_lists_names() {
        let mut machine = sample();
        assert_eq!(machine.printable_history(), "[A]");
        machine.step(&mut ()).unwrap();
        assert_eq!(machine.printable_history(), "[A, B]");
    }

    #[test]
    fn display_summarizes_machine() {
        let text = sample().to_string();
        assert!(text.contains("\tA => B : t0\n"));
        assert!(text.contains("\tt1::door_open()\n"));
        assert!(text.contains("state : A\n"));
        assert!(text.contains("transition matrix:"));
        assert!(text.contains(&sample().printable_matrix()));
        assert!(text.ends_with(&sample().printable_accessibility()));
    }
}
