//! The per-cell Bellman backup and greedy action choice.

use num_traits::Float;

use crate::mdp::direction::Direction;
use crate::mdp::grid::{Coord, GridState};
use crate::mdp::transition::{expected_values, Drift};

/// Number of decimal digits kept in every stored value. Rounding keeps the
/// policy comparison between sweeps free of floating point noise.
pub const VALUE_PRECISION: i32 = 5;

/// Result of backing up a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Update {
    /// `reward + gamma * max_a E[a]`, rounded to [`VALUE_PRECISION`] digits.
    pub value: f64,
    /// First direction reaching the maximum, scanning up, down, left, right.
    pub action: Direction,
}

/// Rounds `value` to `digits` decimal places, halves away from zero.
///
/// The scale `10^digits` is built with a lossless `From<u8>` conversion, so
/// it is exact for every float type accepted here.
///
/// This rounds the scaled product `(value * 10^digits).round()`, not the
/// exact decimal expansion of `value`. On rare inputs whose scaled product
/// lands on a binary half-way point the last digit can differ from a
/// correctly rounded decimal `round(value, digits)`.
///
/// # Examples
///
/// ```
/// use gridworld_mdp::mdp::round_to;
///
/// assert_eq!(round_to(0.123456_f64, 5), 0.12346);
/// assert_eq!(round_to(-0.076000004_f64, 5), -0.076);
/// ```
pub fn round_to<T: Float + From<u8>>(value: T, digits: i32) -> T {
    let ten = <T as From<u8>>::from(10);
    let scale = ten.powi(digits);
    (value * scale).round() / scale
}

/// Bellman backup for a non-terminal, non-obstacle cell.
///
/// Reads only `grid`, which must be the completed previous sweep.
///
/// # Arguments
///
/// * `grid` - Values from the previous sweep
/// * `drift` - Forward / left / right probabilities
/// * `reward` - Reward collected for every step taken from a non-terminal cell
/// * `gamma` - Discount factor
/// * `coord` - The cell to back up
pub fn bellman_update(
    grid: &GridState,
    drift: &Drift,
    reward: f64,
    gamma: f64,
    coord: Coord,
) -> Update {
    let (action, best) = expected_values(grid, drift, coord).best();
    Update {
        value: round_to(reward + gamma * best, VALUE_PRECISION),
        action,
    }
}
