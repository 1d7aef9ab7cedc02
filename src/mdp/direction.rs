//! The four moves and how they rotate into one another under drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four compass moves available in every non-terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in the fixed priority order used to break ties
    /// between equally valued moves.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction 90 degrees counter-clockwise from `self`.
    pub fn left_of(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// The direction 90 degrees clockwise from `self`.
    pub fn right_of(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Row and column offset of a single step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Single-letter label used in the policy dump.
    pub fn label(self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Down => 'd',
            Direction::Left => 'l',
            Direction::Right => 'r',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_and_right_are_inverse() {
        for d in Direction::ALL {
            assert_eq!(d.left_of().right_of(), d);
            assert_eq!(d.right_of().left_of(), d);
        }
    }

    #[test]
    fn test_four_left_turns_is_identity() {
        for d in Direction::ALL {
            assert_eq!(d.left_of().left_of().left_of().left_of(), d);
        }
    }

    #[test]
    fn test_veer_directions() {
        assert_eq!(Direction::Up.left_of(), Direction::Left);
        assert_eq!(Direction::Up.right_of(), Direction::Right);
        assert_eq!(Direction::Left.left_of(), Direction::Down);
        assert_eq!(Direction::Left.right_of(), Direction::Up);
        assert_eq!(Direction::Down.left_of(), Direction::Right);
        assert_eq!(Direction::Right.right_of(), Direction::Down);
    }

    #[test]
    fn test_labels() {
        let labels: String = Direction::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(labels, "udlr");
    }
}
