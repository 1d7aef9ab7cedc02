//! Error types shared by the grid world solver and its configuration layer.

use thiserror::Error;

/// Errors raised while configuring or running a grid world.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The grid has zero rows or zero columns.
    #[error("grid must have at least one row and one column")]
    EmptyGrid,

    /// A coordinate lies outside the `rows x cols` board.
    #[error("cell ({row}, {col}) is out of bounds for a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Text that could not be parsed as a cell entry.
    #[error("malformed entry: {0}")]
    MalformedEntry(String),

    /// Fewer than two terminal cells were configured.
    #[error("at least two terminal cells are required, found {found}")]
    TooFewTerminals { found: usize },

    #[error("terminal cell ({row}, {col}) is listed more than once")]
    DuplicateTerminal { row: usize, col: usize },

    #[error("obstacle cell ({row}, {col}) is listed more than once")]
    DuplicateObstacle { row: usize, col: usize },

    #[error("cell ({row}, {col}) cannot be both a terminal and an obstacle")]
    TerminalObstacleOverlap { row: usize, col: usize },

    /// A reward, discount, drift probability or terminal value is NaN or
    /// infinite.
    #[error("{0} must be a finite number")]
    NonFinite(String),

    /// A configuration document could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The sweep bound was reached before the greedy policy settled.
    #[error("policy did not converge within {sweeps} sweeps")]
    NotConverged { sweeps: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = Error::OutOfBounds {
            row: 4,
            col: 1,
            rows: 3,
            cols: 3,
        };
        assert_eq!(
            err.to_string(),
            "cell (4, 1) is out of bounds for a 3x3 grid"
        );
    }

    #[test]
    fn test_not_converged_message() {
        let err = Error::NotConverged { sweeps: 10 };
        assert_eq!(err.to_string(), "policy did not converge within 10 sweeps");
    }

    #[test]
    fn test_non_finite_message() {
        let err = Error::NonFinite("terminal value at (0, 2) (NaN)".to_string());
        assert_eq!(
            err.to_string(),
            "terminal value at (0, 2) (NaN) must be a finite number"
        );
    }
}
