//! Board state: the current value estimate of every cell plus the fixed
//! terminal and obstacle layout.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mdp::direction::Direction;

/// Value held by obstacle cells. Obstacles are never read by their
/// neighbours, so the sentinel only shows up in the raw value grid.
pub const OBSTACLE_SENTINEL: f64 = 0.0;

/// A `(row, col)` cell position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Index into an `Array2` laid out as `(rows, cols)`.
    pub fn index(self) -> [usize; 2] {
        [self.row, self.col]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `"r,c"`, tolerating whitespace around each field.
impl FromStr for Coord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [row, col] => Ok(Coord::new(parse_index(row, s)?, parse_index(col, s)?)),
            _ => Err(Error::MalformedEntry(format!(
                "expected `row,col`, got `{}`",
                s.trim()
            ))),
        }
    }
}

pub(crate) fn parse_index(field: &str, entry: &str) -> Result<usize> {
    field.parse().map_err(|_| {
        Error::MalformedEntry(format!(
            "`{}` in `{}` is not a non-negative integer",
            field,
            entry.trim()
        ))
    })
}

/// Row-major walk over every cell of a `rows x cols` board.
#[derive(Debug, Clone)]
pub struct Cells {
    rows: usize,
    cols: usize,
    next: Coord,
}

impl Iterator for Cells {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.next.row >= self.rows || self.cols == 0 {
            return None;
        }
        let current = self.next;
        self.next.col += 1;
        if self.next.col == self.cols {
            self.next.col = 0;
            self.next.row += 1;
        }
        Some(current)
    }
}

/// Current value estimate per cell together with the immutable sets of
/// terminal and obstacle cells.
#[derive(Debug, Clone)]
pub struct GridState {
    rows: usize,
    cols: usize,
    values: Array2<f64>,
    terminals: HashMap<Coord, f64>,
    obstacles: HashSet<Coord>,
}

impl GridState {
    /// Seeds a board with zeros, then places every terminal value and
    /// obstacle sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyGrid`] for a zero-sized board and
    /// [`Error::OutOfBounds`] for any terminal or obstacle off the board.
    /// No other checks are performed here; overlap and duplicate detection
    /// belong to [`GridWorldConfig::validate`](crate::mdp::GridWorldConfig::validate).
    pub fn new<T, O>(rows: usize, cols: usize, terminals: T, obstacles: O) -> Result<Self>
    where
        T: IntoIterator<Item = (Coord, f64)>,
        O: IntoIterator<Item = Coord>,
    {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut state = Self {
            rows,
            cols,
            values: Array2::zeros((rows, cols)),
            terminals: HashMap::new(),
            obstacles: HashSet::new(),
        };

        for (coord, value) in terminals {
            state.check_bounds(coord)?;
            state.values[coord.index()] = value;
            state.terminals.insert(coord, value);
        }
        for coord in obstacles {
            state.check_bounds(coord)?;
            state.values[coord.index()] = OBSTACLE_SENTINEL;
            state.obstacles.insert(coord);
        }

        Ok(state)
    }

    /// Number of rows on the board.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns on the board.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `true` when `coord` lies on the board.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Like [`contains`](Self::contains), but reports an off-board cell as
    /// [`Error::OutOfBounds`].
    pub fn check_bounds(&self, coord: Coord) -> Result<()> {
        if self.contains(coord) {
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

    /// Current value of an in-bounds cell.
    pub fn value(&self, coord: Coord) -> f64 {
        self.values[coord.index()]
    }

    /// The whole value grid, row-major.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// `true` for cells whose value is fixed by the configuration.
    pub fn is_terminal(&self, coord: Coord) -> bool {
        self.terminals.contains_key(&coord)
    }

    /// The fixed value of a terminal cell, `None` for any other cell.
    pub fn terminal_value(&self, coord: Coord) -> Option<f64> {
        self.terminals.get(&coord).copied()
    }

    /// `true` for cells that block movement.
    pub fn is_obstacle(&self, coord: Coord) -> bool {
        self.obstacles.contains(&coord)
    }

    /// Number of distinct terminal cells.
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    /// Number of distinct obstacle cells.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// The cell one step away in `direction`, if it is on the board and
    /// not an obstacle.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let (dr, dc) = direction.delta();
        let row = coord.row.checked_add_signed(dr)?;
        let col = coord.col.checked_add_signed(dc)?;
        let next = Coord::new(row, col);
        (self.contains(next) && !self.is_obstacle(next)).then_some(next)
    }

    /// Independent copy of the value grid, used as the write target of the
    /// next sweep while `self` stays readable.
    pub fn snapshot(&self) -> Array2<f64> {
        self.values.clone()
    }

    /// Installs the value grid produced by a completed sweep.
    pub(crate) fn replace_values(&mut self, values: Array2<f64>) {
        debug_assert_eq!(values.dim(), (self.rows, self.cols));
        self.values = values;
    }

    /// Every coordinate on the board in row-major order.
    pub fn cells(&self) -> Cells {
        Cells {
            rows: self.rows,
            cols: self.cols,
            next: Coord::default(),
        }
    }
}
