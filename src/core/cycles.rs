//! Oscillation detection over a state sequence.
//!
//! Both detectors are read-only and operate on a padding-free sequence,
//! oldest first. `max_len` bounds the cycle length searched; `None` means
//! the whole sequence length. Cycle lengths never exceed half the sequence.

use serde::{Deserialize, Serialize};

/// A window immediately followed by an identical window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowedCycle<T> {
    /// Start of the first occurrence within the sequence.
    pub offset: usize,
    /// The repeated window.
    pub states: Vec<T>,
}

fn longest_candidate(n: usize, max_len: Option<usize>) -> usize {
    max_len.unwrap_or(n).min(n / 2)
}

/// Find the shortest suffix that exactly repeats the block before it.
///
/// For each length `L` from 1, the last `L` entries are compared with the
/// `L` entries preceding them; the first match is returned.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::detect_closed_cycle;
///
/// let history = ["A", "B", "A", "B", "A", "B"];
/// assert_eq!(detect_closed_cycle(&history, None), Some(vec!["A", "B"]));
///
/// let rising = [1, 2, 3, 4, 5];
/// assert_eq!(detect_closed_cycle(&rising, None), None);
/// ```
pub fn detect_closed_cycle<T: PartialEq + Clone>(
    sequence: &[T],
    max_len: Option<usize>,
) -> Option<Vec<T>> {
    let n = sequence.len();
    (1..=longest_candidate(n, max_len)).find_map(|len| {
        let previous = &sequence[n - 2 * len..n - len];
        let current = &sequence[n - len..];
        (previous == current).then(|| previous.to_vec())
    })
}

/// Find every window that is immediately repeated, at any offset.
///
/// Matches are reported by increasing length, then by offset. Overlapping
/// matches are all kept. An empty result means no repetition was found.
pub fn detect_windowed_cycles<T: PartialEq + Clone>(
    sequence: &[T],
    max_len: Option<usize>,
) -> Vec<WindowedCycle<T>> {
    let n = sequence.len();
    let mut found = Vec::new();
    for len in 1..=longest_candidate(n, max_len) {
        for offset in 0..=(n - 2 * len) {
            let first = &sequence[offset..offset + len];
            let second = &sequence[offset + len..offset + 2 * len];
            if first == second {
                found.push(WindowedCycle {
                    offset,
                    states: first.to_vec(),
                });
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_cycle_returns_shortest_unit() {
        let history = ["A", "B", "A", "B", "A", "B"];
        assert_eq!(detect_closed_cycle(&history, None), Some(vec!["A", "B"]));
    }

    #[test]
    fn closed_cycle_detects_stuck_state() {
        let history = [0, 1, 2, 2];
        assert_eq!(detect_closed_cycle(&history, None), Some(vec![2]));
    }

    #[test]
    fn closed_cycle_ignores_non_suffix_repetition() {
        // A,B repeats at the start but the tail does not.
        let history = ["A", "B", "A", "B", "C"];
        assert_eq!(detect_closed_cycle(&history, None), None);
    }

    #[test]
    fn closed_cycle_respects_max_len() {
        let history = ["A", "B", "C", "A", "B", "C"];
        assert_eq!(detect_closed_cycle(&history, Some(2)), None);
        assert_eq!(
            detect_closed_cycle(&history, Some(3)),
            Some(vec!["A", "B", "C"])
        );
    }

    #[test]
    fn short_sequences_have_no_cycle() {
        assert_eq!(detect_closed_cycle::<u8>(&[], None), None);
        assert_eq!(detect_closed_cycle(&[1], None), None);
        assert!(detect_windowed_cycles(&[1], None).is_empty());
    }

    #[test]
    fn windowed_finds_repeated_block_at_start() {
        let history = ["A", "B", "C", "A", "B", "C", "A", "B", "D"];
        let cycles = detect_windowed_cycles(&history, None);

        assert!(cycles.contains(&WindowedCycle {
            offset: 0,
            states: vec!["A", "B", "C"],
        }));
        assert!(cycles.iter().all(|c| c.states != vec!["A", "B", "D"]));
        // Rotations of the block overlap the first match.
        assert!(cycles.contains(&WindowedCycle {
            offset: 1,
            states: vec!["B", "C", "A"],
        }));
    }

    #[test]
    fn windowed_orders_by_length_then_offset() {
        let history = [1, 1, 2, 2];
        let cycles = detect_windowed_cycles(&history, None);
        assert_eq!(
            cycles,
            vec![
                WindowedCycle {
                    offset: 0,
                    states: vec![1]
                },
                WindowedCycle {
                    offset: 2,
                    states: vec![2]
                },
            ]
        );
    }

    #[test]
    fn windowed_empty_for_non_repeating_history() {
        let history = [1, 2, 3, 4, 5, 6];
        assert!(detect_windowed_cycles(&history, None).is_empty());
    }

    #[test]
    fn max_len_zero_searches_nothing() {
        let history = [1, 1, 1, 1];
        assert_eq!(detect_closed_cycle(&history, Some(0)), None);
        assert!(detect_windowed_cycles(&history, Some(0)).is_empty());
    }
}
