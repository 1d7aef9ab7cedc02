//! Policy-stability test that ends value iteration.
//!
//! Only the greedy policies of successive sweeps are compared; the values
//! may still be moving when the run stops.

use crate::mdp::policy::PolicyGrid;

/// Cell-by-cell equality of two policy grids, terminal markers included.
/// Grids of different shapes are never equal.
pub fn policies_equal(a: &PolicyGrid, b: &PolicyGrid) -> bool {
    a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// Holds the two most recent policy grids, which is all the convergence
/// test needs.
#[derive(Debug, Clone, Default)]
pub struct PolicyWindow {
    previous: Option<PolicyGrid>,
    latest: Option<PolicyGrid>,
}

impl PolicyWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the policy of a completed sweep, dropping the oldest one.
    pub fn push(&mut self, policy: PolicyGrid) {
        self.previous = self.latest.replace(policy);
    }

    /// Policy of the most recent sweep.
    pub fn latest(&self) -> Option<&PolicyGrid> {
        self.latest.as_ref()
    }

    /// Policy of the sweep before the most recent one.
    pub fn previous(&self) -> Option<&PolicyGrid> {
        self.previous.as_ref()
    }

    /// `true` once two sweeps have been recorded and their policies agree
    /// everywhere. Does not modify the window.
    pub fn is_converged(&self) -> bool {
        match (&self.previous, &self.latest) {
            (Some(previous), Some(latest)) => policies_equal(previous, latest),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::direction::Direction;
    use crate::mdp::policy::Policy;
    use ndarray::Array2;

    fn uniform(direction: Direction) -> PolicyGrid {
        let mut grid = Array2::from_elem((2, 2), Policy::Move(direction));
        grid[[0, 0]] = Policy::Terminal(1.0);
        grid
    }

    #[test]
    fn test_needs_two_sweeps() {
        let mut window = PolicyWindow::new();
        assert!(!window.is_converged());
        window.push(uniform(Direction::Up));
        assert!(!window.is_converged());
        window.push(uniform(Direction::Up));
        assert!(window.is_converged());
    }

    #[test]
    fn test_single_cell_difference() {
        let mut window = PolicyWindow::new();
        let a = uniform(Direction::Up);
        let mut b = a.clone();
        b[[1, 1]] = Policy::Move(Direction::Left);
        window.push(a);
        window.push(b);
        assert!(!window.is_converged());
    }

    #[test]
    fn test_terminal_markers_compared() {
        let a = uniform(Direction::Up);
        let mut b = a.clone();
        b[[0, 0]] = Policy::Terminal(2.0);
        assert!(!policies_equal(&a, &b));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = uniform(Direction::Up);
        let b = Array2::from_elem((2, 3), Policy::Move(Direction::Up));
        assert!(!policies_equal(&a, &b));
    }

    #[test]
    fn test_recheck_is_idempotent() {
        let mut window = PolicyWindow::new();
        window.push(uniform(Direction::Down));
        window.push(uniform(Direction::Down));
        let first = window.is_converged();
        let second = window.is_converged();
        assert_eq!(first, second);
        assert!(first);
    }

    #[test]
    fn test_window_keeps_last_two() {
        let mut window = PolicyWindow::new();
        window.push(uniform(Direction::Up));
        window.push(uniform(Direction::Down));
        window.push(uniform(Direction::Down));
        assert!(window.is_converged());
        assert_eq!(window.previous(), Some(&uniform(Direction::Down)));
    }
}
