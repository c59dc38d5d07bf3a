//! Near-square grid layout for multi-panel figures.
//!
//! Given a number of panels to display, picks a rows x cols grid close to a
//! square and assigns each panel a (row, col) cell in row-major order.
//! Prime panel counts only factor as 1 x n, which degenerates into a single
//! strip, so they are bumped up by one before factoring at the cost of one
//! unused cell.

use serde::{Deserialize, Serialize};

/// A single grid cell. Coordinates are 1-based, matching the subplot
/// convention of downstream renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

/// A planned grid: its dimensions and one cell per panel, in row-major
/// fill order. `rows * cols >= cells.len()` always holds; trailing cells
/// of the grid are simply left unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPlan {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<GridCell>,
}

impl GridPlan {
    /// An empty plan with no cells.
    pub fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            cells: Vec::new(),
        }
    }

    /// Number of panels placed in the grid.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the plan holds no panels.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Trial-division primality check. Numbers below 2 are not prime.
fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    for i in 2..=n / 2 {
        if n % i == 0 {
            return false;
        }
    }
    true
}

/// All factor pairs (i, n/i) of `n` with `i <= sqrt(n)`, in increasing
/// order of `i`. The last pair is the closest-to-square split.
fn factor_pairs(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let mut i = 1;
    while i * i <= n {
        if n % i == 0 {
            pairs.push((i, n / i));
        }
        i += 1;
    }
    pairs
}

/// Plan a near-square grid for `item_count` panels.
///
/// Zero panels yield an empty plan without any factoring. A prime count is
/// bumped to `count + 1` before factoring, so e.g. 7 panels land on a 2 x 4
/// grid with one unused cell. The returned assignment always contains
/// exactly `item_count` cells.
pub fn plan(item_count: usize) -> GridPlan {
    if item_count == 0 {
        return GridPlan::empty();
    }

    let mut n = item_count;
    if is_prime(n) {
        n += 1;
    }

    let pairs = factor_pairs(n);
    // factor_pairs(n) is non-empty for n >= 1: (1, n) is always present.
    let (rows, cols) = pairs.last().copied().unwrap_or((1, n));

    let mut cells = Vec::with_capacity(item_count);
    'outer: for row in 1..=rows {
        for col in 1..=cols {
            if cells.len() == item_count {
                break 'outer;
            }
            cells.push(GridCell { row, col });
        }
    }

    GridPlan { rows, cols, cells }
}

/// Horizontal spacing fraction between panels.
///
/// `1 / (item_count - 1)` is undefined for a single panel; a lone panel
/// needs no inter-panel gap, so the fallback is 0.
pub fn horizontal_spacing(item_count: usize) -> f64 {
    if item_count <= 1 {
        0.0
    } else {
        1.0 / (item_count - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_prime_small_numbers() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(is_prime(7));
        assert!(!is_prime(9));
        assert!(is_prime(13));
        assert!(!is_prime(100));
    }

    #[test]
    fn test_factor_pairs_of_eight() {
        assert_eq!(factor_pairs(8), vec![(1, 8), (2, 4)]);
    }

    #[test]
    fn test_factor_pairs_of_nine() {
        assert_eq!(factor_pairs(9), vec![(1, 9), (3, 3)]);
    }

    #[test]
    fn test_factor_pairs_of_one() {
        assert_eq!(factor_pairs(1), vec![(1, 1)]);
    }

    #[test]
    fn test_plan_zero_items() {
        let plan = plan(0);
        assert!(plan.is_empty());
        assert_eq!(plan.rows, 0);
        assert_eq!(plan.cols, 0);
    }

    #[test]
    fn test_plan_single_item() {
        // 1 is not prime (below 2), so n stays 1 and the grid is 1x1.
        let plan = plan(1);
        assert_eq!(plan.rows, 1);
        assert_eq!(plan.cols, 1);
        assert_eq!(plan.cells, vec![GridCell { row: 1, col: 1 }]);
    }

    #[test]
    fn test_plan_six_items_is_two_by_three() {
        let plan = plan(6);
        assert_eq!((plan.rows, plan.cols), (2, 3));
        assert_eq!(plan.len(), 6);
    }

    #[test]
    fn test_plan_prime_count_bumped() {
        // 7 is prime, bumped to 8; factor pairs of 8 end at (2, 4).
        let plan = plan(7);
        assert_eq!((plan.rows, plan.cols), (2, 4));
        // 7 panels in an 8-cell grid, one cell unused.
        assert_eq!(plan.len(), 7);
        assert_eq!(plan.cells.last(), Some(&GridCell { row: 2, col: 3 }));
    }

    #[test]
    fn test_plan_nine_items_fills_square() {
        let plan = plan(9);
        assert_eq!((plan.rows, plan.cols), (3, 3));
        assert_eq!(plan.len(), 9);
        assert_eq!(plan.cells.last(), Some(&GridCell { row: 3, col: 3 }));
    }

    #[test]
    fn test_plan_row_major_order() {
        let plan = plan(6);
        let expected = vec![
            GridCell { row: 1, col: 1 },
            GridCell { row: 1, col: 2 },
            GridCell { row: 1, col: 3 },
            GridCell { row: 2, col: 1 },
            GridCell { row: 2, col: 2 },
            GridCell { row: 2, col: 3 },
        ];
        assert_eq!(plan.cells, expected);
    }

    #[test]
    fn test_plan_invariants_hold_for_range() {
        for n in 0..=120 {
            let plan = plan(n);
            assert_eq!(plan.len(), n, "exactly one cell per panel for n={n}");
            assert!(
                plan.rows * plan.cols >= n,
                "grid must hold all panels for n={n}"
            );
            for cell in &plan.cells {
                assert!(cell.row >= 1 && cell.row <= plan.rows);
                assert!(cell.col >= 1 && cell.col <= plan.cols);
            }
            // No duplicate cells.
            let mut seen = std::collections::HashSet::new();
            for cell in &plan.cells {
                assert!(seen.insert((cell.row, cell.col)), "duplicate cell for n={n}");
            }
        }
    }

    #[test]
    fn test_plan_is_deterministic() {
        assert_eq!(plan(42), plan(42));
        assert_eq!(plan(97), plan(97));
    }

    #[test]
    fn test_horizontal_spacing_guards_degenerate_counts() {
        assert_eq!(horizontal_spacing(0), 0.0);
        assert_eq!(horizontal_spacing(1), 0.0);
        assert_eq!(horizontal_spacing(2), 1.0);
        assert!((horizontal_spacing(5) - 0.25).abs() < 1e-12);
    }
}
