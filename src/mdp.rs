//! Value iteration over rectangular grid worlds with drifting moves.
//!
//! An agent that tries to move in one direction goes forward with probability
//! `forward`, veers to its left with probability `left` and to its right with
//! probability `right`. Walls and obstacles leave the agent where it stands.

pub mod bellman;
pub mod config;
pub mod convergence;
pub mod direction;
pub mod grid;
pub mod policy;
pub mod render;
pub mod sweep;
pub mod transition;


pub use bellman::{bellman_update, round_to, Update, VALUE_PRECISION};
pub use config::{GridWorldConfig, TerminalSpec, MIN_TERMINALS};
pub use convergence::{policies_equal, PolicyWindow};
pub use direction::Direction;
pub use grid::{Coord, GridState, OBSTACLE_SENTINEL};
pub use policy::{Policy, PolicyGrid};
pub use render::{render_policy, render_values, FIELD_WIDTH};
pub use sweep::{GridWorld, Snapshot, Solution, SweepState};
pub use transition::{effective_value, expected_value, expected_values, ActionValues, Drift};
