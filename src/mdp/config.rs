//! Grid world configuration: the explicit input object handed to
//! [`GridWorld::new`](crate::mdp::GridWorld::new), together with parsing of
//! the `r,c,val` / `r,c` entry format and up-front validation.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mdp::grid::{parse_index, Coord};
use crate::mdp::transition::Drift;

/// Minimum number of terminal cells a grid world must have.
pub const MIN_TERMINALS: usize = 2;

/// A terminal cell and the fixed value it holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalSpec {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl TerminalSpec {
    /// Terminal at `(row, col)` with a fixed `value`.
    pub fn new(row: usize, col: usize, value: f64) -> Self {
        Self { row, col, value }
    }

    /// Board position of this terminal.
    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }
}

impl fmt::Display for TerminalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.row, self.col, self.value)
    }
}

/// Parses `"r,c,val"`.
impl FromStr for TerminalSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let [row, col, value] = fields.as_slice() else {
            return Err(Error::MalformedEntry(format!(
                "expected `row,col,value`, got `{}`",
                s.trim()
            )));
        };
        let value: f64 = value.parse().map_err(|_| {
            Error::MalformedEntry(format!("`{}` in `{}` is not a number", value, s.trim()))
        })?;
        if !value.is_finite() {
            return Err(Error::MalformedEntry(format!(
                "terminal value in `{}` must be finite",
                s.trim()
            )));
        }
        Ok(TerminalSpec::new(
            parse_index(row, s)?,
            parse_index(col, s)?,
            value,
        ))
    }
}

/// Everything needed to build and run a grid world.
///
/// Loadable from TOML:
///
/// ```toml
/// rows = 3
/// cols = 4
/// reward = -0.04
/// gamma = 0.9
/// max_sweeps = 1000
///
/// [drift]
/// forward = 0.8
/// left = 0.1
/// right = 0.1
///
/// [[terminals]]
/// row = 0
/// col = 3
/// value = 1.0
///
/// [[terminals]]
/// row = 1
/// col = 3
/// value = -1.0
///
/// [[obstacles]]
/// row = 1
/// col = 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridWorldConfig {
    pub rows: usize,
    pub cols: usize,
    /// Reward collected on every step from a non-terminal cell.
    pub reward: f64,
    /// Discount factor, expected in `[0, 1]`.
    pub gamma: f64,
    #[serde(default)]
    pub drift: Drift,
    #[serde(default)]
    pub terminals: Vec<TerminalSpec>,
    #[serde(default)]
    pub obstacles: Vec<Coord>,
    /// Stop with [`Error::NotConverged`] after this many sweeps.
    #[serde(default)]
    pub max_sweeps: Option<usize>,
    /// Retain every sweep's values and policy instead of only the last two.
    #[serde(default)]
    pub keep_history: bool,
}

impl GridWorldConfig {
    /// A board with no terminals, no obstacles and no sweep bound.
    pub fn new(rows: usize, cols: usize, reward: f64, gamma: f64, drift: Drift) -> Self {
        Self {
            rows,
            cols,
            reward,
            gamma,
            drift,
            terminals: Vec::new(),
            obstacles: Vec::new(),
            max_sweeps: None,
            keep_history: false,
        }
    }

    /// Adds a terminal cell holding `value`.
    pub fn with_terminal(mut self, row: usize, col: usize, value: f64) -> Self {
        self.terminals.push(TerminalSpec::new(row, col, value));
        self
    }

    /// Adds an obstacle cell.
    pub fn with_obstacle(mut self, row: usize, col: usize) -> Self {
        self.obstacles.push(Coord::new(row, col));
        self
    }

    /// Bounds the run; see [`GridWorld::solve`](crate::mdp::GridWorld::solve).
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    /// Keeps every sweep's snapshot when `true`.
    pub fn with_history(mut self, keep_history: bool) -> Self {
        self.keep_history = keep_history;
        self
    }

    /// Reads a configuration from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reports [`Error::OutOfBounds`] for a cell off the configured board.
    pub fn check_bounds(&self, coord: Coord) -> Result<()> {
        if coord.row < self.rows && coord.col < self.cols {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                row: coord.row,
                col: coord.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Checks one more terminal against the board and the cells already
    /// configured. Used by entry loops to reject a line before accepting it.
    pub fn check_new_terminal(&self, terminal: &TerminalSpec) -> Result<()> {
        let coord = terminal.coord();
        self.check_bounds(coord)?;
        check_finite(&format!("terminal value at {}", coord), terminal.value)?;
        if self.terminals.iter().any(|t| t.coord() == coord) {
            return Err(Error::DuplicateTerminal {
                row: coord.row,
                col: coord.col,
            });
        }
        if self.obstacles.contains(&coord) {
            return Err(Error::TerminalObstacleOverlap {
                row: coord.row,
                col: coord.col,
            });
        }
        Ok(())
    }

    /// Checks one more obstacle against the board and the cells already
    /// configured.
    pub fn check_new_obstacle(&self, coord: Coord) -> Result<()> {
        self.check_bounds(coord)?;
        if self.obstacles.contains(&coord) {
            return Err(Error::DuplicateObstacle {
                row: coord.row,
                col: coord.col,
            });
        }
        if self.terminals.iter().any(|t| t.coord() == coord) {
            return Err(Error::TerminalObstacleOverlap {
                row: coord.row,
                col: coord.col,
            });
        }
        Ok(())
    }

    /// Rejects configurations the solver cannot run: an empty board, a NaN
    /// or infinite number anywhere, cells off the board, fewer than
    /// [`MIN_TERMINALS`] terminals, repeated cells, and cells that are both
    /// terminal and obstacle.
    ///
    /// A discount outside `[0, 1]` or drift probabilities summing above one
    /// are only logged.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::EmptyGrid);
        }

        check_finite("reward", self.reward)?;
        check_finite("gamma", self.gamma)?;
        check_finite("forward probability", self.drift.forward)?;
        check_finite("left probability", self.drift.left)?;
        check_finite("right probability", self.drift.right)?;

        let mut terminals = HashSet::new();
        for terminal in &self.terminals {
            let coord = terminal.coord();
            self.check_bounds(coord)?;
            check_finite(&format!("terminal value at {}", coord), terminal.value)?;
            if !terminals.insert(coord) {
                return Err(Error::DuplicateTerminal {
                    row: coord.row,
                    col: coord.col,
                });
            }
        }
        if terminals.len() < MIN_TERMINALS {
            return Err(Error::TooFewTerminals {
                found: terminals.len(),
            });
        }

        let mut obstacles = HashSet::new();
        for &coord in &self.obstacles {
            self.check_bounds(coord)?;
            if terminals.contains(&coord) {
                return Err(Error::TerminalObstacleOverlap {
                    row: coord.row,
                    col: coord.col,
                });
            }
            if !obstacles.insert(coord) {
                return Err(Error::DuplicateObstacle {
                    row: coord.row,
                    col: coord.col,
                });
            }
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            warn!("Discount factor {} is outside [0, 1]", self.gamma);
        }
        if self.drift.total() > 1.0 + f64::EPSILON {
            warn!(
                "Drift probabilities sum to {} which is more than 1",
                self.drift.total()
            );
        }

        Ok(())
    }
}

/// A NaN terminal never equals itself, so the policy comparison could not
/// succeed; infinities poison every neighbour on the first sweep.
fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFinite(format!("{} ({})", name, value)))
    }
}
