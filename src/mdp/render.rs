//! Plain-text dump of a solved grid world.
//!
//! Each grid is printed as rows of right-justified fields of width
//! [`FIELD_WIDTH`] separated by single spaces. Obstacle cells are blank.

use std::fmt;

use ndarray::Array2;

use crate::mdp::policy::{Policy, PolicyGrid};
use crate::mdp::sweep::Solution;

pub const FIELD_WIDTH: usize = 6;
const SEPARATOR: &str = "---------------";

fn render_rows<T, F>(grid: &Array2<T>, mut field: F) -> String
where
    F: FnMut([usize; 2], &T) -> String,
{
    grid.outer_iter()
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, cell)| field([row, col], cell))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Value block. `policy` marks which cells are obstacles.
pub fn render_values(values: &Array2<f64>, policy: &PolicyGrid) -> String {
    render_rows(values, |idx, value| match policy.get(idx) {
        Some(Policy::Obstacle) => format!("{:>width$}", "", width = FIELD_WIDTH),
        _ => format!("{:>width$}", value, width = FIELD_WIDTH),
    })
}

/// Policy block: direction letters, terminal values, blanks for obstacles.
pub fn render_policy(policy: &PolicyGrid) -> String {
    render_rows(policy, |_, label| format!("{:>width$}", label, width = FIELD_WIDTH))
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Values:")?;
        writeln!(f, "{}", render_values(&self.values, &self.policy))?;
        writeln!(f)?;
        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f)?;
        writeln!(f, "Policy:")?;
        writeln!(f, "{}", render_policy(&self.policy))
    }
}
