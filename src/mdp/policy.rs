//! Per-cell policy labels and the grid that holds one sweep's policy.

use std::fmt;

use ndarray::Array2;

use crate::mdp::direction::Direction;

/// One entry of a policy grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Policy {
    /// No sweep has visited the cell yet.
    #[default]
    Unset,
    /// Greedy move for a regular cell.
    Move(Direction),
    /// Terminal marker carrying the cell's fixed value.
    Terminal(f64),
    /// Obstacles never get a policy.
    Obstacle,
}

impl Policy {
    /// The greedy move, if this cell has one.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Policy::Move(direction) => Some(*direction),
            _ => None,
        }
    }

    /// `true` for terminal markers, whatever their value.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Policy::Terminal(_))
    }
}

/// Renders the label used in the textual policy dump: a direction letter,
/// the terminal value, `-` before the first sweep, or nothing for obstacles.
impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Unset => f.pad("-"),
            Policy::Move(direction) => f.pad(&direction.to_string()),
            Policy::Terminal(value) => f.pad(&value.to_string()),
            Policy::Obstacle => f.pad(""),
        }
    }
}

/// A full `rows x cols` policy snapshot.
pub type PolicyGrid = Array2<Policy>;
