//! Stochastic outcome model for a single attempted move.

use serde::{Deserialize, Serialize};

use crate::mdp::direction::Direction;
use crate::mdp::grid::{Coord, GridState};

/// Probabilities that an attempted move goes forward, veers left or veers
/// right. Whatever is left over (back-drift) is ignored by the update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    /// Chance of landing where intended.
    pub forward: f64,
    /// Chance of veering 90 degrees counter-clockwise.
    pub left: f64,
    /// Chance of veering 90 degrees clockwise.
    pub right: f64,
}

impl Drift {
    /// Creates a drift model from its three probabilities.
    pub fn new(forward: f64, left: f64, right: f64) -> Self {
        Self {
            forward,
            left,
            right,
        }
    }

    /// Moves always land where intended.
    pub fn deterministic() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Sum of the three probabilities. Anything short of one is back-drift.
    pub fn total(&self) -> f64 {
        self.forward + self.left + self.right
    }
}

impl Default for Drift {
    fn default() -> Self {
        Self::new(0.8, 0.1, 0.1)
    }
}

/// Expected value of each nominal direction, in [`Direction::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionValues(pub [f64; 4]);

impl ActionValues {
    /// Expected value of attempting `direction`.
    pub fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Up => self.0[0],
            Direction::Down => self.0[1],
            Direction::Left => self.0[2],
            Direction::Right => self.0[3],
        }
    }

    /// Pairs each direction with its expected value, in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, f64)> + '_ {
        Direction::ALL.iter().copied().zip(self.0.iter().copied())
    }

    /// Highest expected value and the first direction reaching it, scanning
    /// up, down, left, right.
    pub fn best(&self) -> (Direction, f64) {
        let mut best_direction = Direction::Up;
        let mut best_value = f64::NEG_INFINITY;
        for (direction, value) in self.iter() {
            if value > best_value {
                best_value = value;
                best_direction = direction;
            }
        }
        (best_direction, best_value)
    }
}

/// Value of the cell reached by stepping from `coord` towards `compass`.
/// Walls and obstacles bounce the agent back, so `coord`'s own value stands
/// in for them.
pub fn effective_value(grid: &GridState, coord: Coord, compass: Direction) -> f64 {
    match grid.neighbor(coord, compass) {
        Some(next) => grid.value(next),
        None => grid.value(coord),
    }
}

/// `E[D] = forward * v(D) + left * v(left of D) + right * v(right of D)`.
pub fn expected_value(grid: &GridState, drift: &Drift, coord: Coord, nominal: Direction) -> f64 {
    drift.forward * effective_value(grid, coord, nominal)
        + drift.left * effective_value(grid, coord, nominal.left_of())
        + drift.right * effective_value(grid, coord, nominal.right_of())
}

/// Expected values of all four nominal directions, read from `grid` only.
pub fn expected_values(grid: &GridState, drift: &Drift, coord: Coord) -> ActionValues {
    ActionValues(Direction::ALL.map(|d| expected_value(grid, drift, coord, d)))
}
