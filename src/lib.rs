pub mod error;
pub mod mdp;

pub use error::{Error, Result};
pub use mdp::{
    Coord, Direction, Drift, GridWorld, GridWorldConfig, Policy, Solution, SweepState,
    TerminalSpec,
};
