//! Synchronous value iteration driver.

use log::{debug, info, trace, warn};
use ndarray::Array2;

use crate::error::{Error, Result};
use crate::mdp::bellman::bellman_update;
use crate::mdp::config::GridWorldConfig;
use crate::mdp::convergence::PolicyWindow;
use crate::mdp::grid::GridState;
use crate::mdp::policy::{Policy, PolicyGrid};
use crate::mdp::transition::Drift;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Running,
    Converged,
}

/// Values and policy recorded after one sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub values: Array2<f64>,
    pub policy: PolicyGrid,
}

/// Final result handed to reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub values: Array2<f64>,
    pub policy: PolicyGrid,
    /// Number of sweeps performed until the policy settled.
    pub sweeps: usize,
}

/// A grid world being solved by value iteration.
///
/// Every sweep reads the values of the previous sweep only and writes a
/// freshly allocated grid, so updates within a sweep never see each other.
///
/// # Examples
///
/// ```
/// use gridworld_mdp::{Direction, Drift, GridWorld, GridWorldConfig, Policy};
///
/// let config = GridWorldConfig::new(3, 3, -0.04, 0.9, Drift::new(0.8, 0.1, 0.1))
///     .with_terminal(0, 1, 1.0)
///     .with_terminal(2, 1, -1.0);
///
/// let mut world = GridWorld::new(config).unwrap();
/// let solution = world.solve().unwrap();
///
/// assert_eq!(solution.sweeps, 2);
/// assert_eq!(solution.policy[[0, 0]], Policy::Move(Direction::Right));
/// assert_eq!(solution.policy[[0, 1]], Policy::Terminal(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct GridWorld {
    grid: GridState,
    reward: f64,
    gamma: f64,
    drift: Drift,
    max_sweeps: Option<usize>,
    window: PolicyWindow,
    history: Option<Vec<Snapshot>>,
    sweeps: usize,
    state: SweepState,
}

impl GridWorld {
    /// Validates `config` and seeds the board.
    ///
    /// # Errors
    ///
    /// Any error reported by [`GridWorldConfig::validate`].
    pub fn new(config: GridWorldConfig) -> Result<Self> {
        config.validate()?;

        let grid = GridState::new(
            config.rows,
            config.cols,
            config.terminals.iter().map(|t| (t.coord(), t.value)),
            config.obstacles.iter().copied(),
        )?;

        info!(
            "Grid world {}x{} with {} terminals and {} obstacles",
            grid.rows(),
            grid.cols(),
            grid.terminal_count(),
            grid.obstacle_count()
        );

        let history = config.keep_history.then(|| {
            vec![Snapshot {
                values: grid.snapshot(),
                policy: Array2::from_elem((grid.rows(), grid.cols()), Policy::Unset),
            }]
        });

        Ok(Self {
            grid,
            reward: config.reward,
            gamma: config.gamma,
            drift: config.drift,
            max_sweeps: config.max_sweeps,
            window: PolicyWindow::new(),
            history,
            sweeps: 0,
            state: SweepState::Running,
        })
    }

    /// Performs one full sweep and reports whether the greedy policy has
    /// settled. Once converged, further calls change nothing.
    pub fn step(&mut self) -> SweepState {
        if self.state == SweepState::Converged {
            return self.state;
        }

        let mut values = self.grid.snapshot();
        let mut policy = Array2::from_elem((self.grid.rows(), self.grid.cols()), Policy::Unset);

        for coord in self.grid.cells() {
            let idx = coord.index();
            if let Some(value) = self.grid.terminal_value(coord) {
                values[idx] = value;
                policy[idx] = Policy::Terminal(value);
            } else if self.grid.is_obstacle(coord) {
                policy[idx] = Policy::Obstacle;
            } else {
                let update = bellman_update(&self.grid, &self.drift, self.reward, self.gamma, coord);
                trace!("{} -> {} ({})", coord, update.value, update.action);
                values[idx] = update.value;
                policy[idx] = Policy::Move(update.action);
            }
        }

        if let Some(history) = self.history.as_mut() {
            history.push(Snapshot {
                values: values.clone(),
                policy: policy.clone(),
            });
        }

        self.grid.replace_values(values);
        self.window.push(policy);
        self.sweeps += 1;

        if self.window.is_converged() {
            info!("Policy converged after {} sweeps", self.sweeps);
            self.state = SweepState::Converged;
        } else {
            debug!("Sweep {} changed the policy", self.sweeps);
        }

        self.state
    }

    /// Sweeps until the policy settles.
    ///
    /// # Errors
    ///
    /// [`Error::NotConverged`] if `max_sweeps` was configured and reached
    /// first. Without a bound, a configuration whose greedy policy keeps
    /// oscillating never returns.
    pub fn solve(&mut self) -> Result<Solution> {
        while self.state == SweepState::Running {
            if let Some(max_sweeps) = self.max_sweeps {
                if self.sweeps >= max_sweeps {
                    warn!("Giving up after {} sweeps", self.sweeps);
                    return Err(Error::NotConverged {
                        sweeps: self.sweeps,
                    });
                }
            }
            self.step();
        }

        Ok(Solution {
            values: self.grid.values().clone(),
            policy: self.policy().cloned().unwrap_or_default(),
            sweeps: self.sweeps,
        })
    }

    /// Whether the last sweep settled the policy.
    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Number of completed sweeps.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// The board as of the last completed sweep.
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Current value grid.
    pub fn values(&self) -> &Array2<f64> {
        self.grid.values()
    }

    /// Policy of the most recent sweep, if any sweep has run.
    pub fn policy(&self) -> Option<&PolicyGrid> {
        self.window.latest()
    }

    /// Every recorded snapshot, starting with the initial board, when the
    /// configuration asked for history.
    pub fn history(&self) -> Option<&[Snapshot]> {
        self.history.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::direction::Direction;
    use crate::mdp::grid::Coord;

    fn three_by_three() -> GridWorldConfig {
        GridWorldConfig::new(3, 3, -0.04, 0.9, Drift::new(0.8, 0.1, 0.1))
            .with_terminal(0, 1, 1.0)
            .with_terminal(2, 1, -1.0)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GridWorldConfig::new(3, 3, 0.0, 0.9, Drift::default()).with_terminal(0, 0, 1.0);
        assert_eq!(
            GridWorld::new(config).unwrap_err(),
            Error::TooFewTerminals { found: 1 }
        );
    }

    #[test]
    fn test_new_rejects_nan_terminal() {
        let config = GridWorldConfig::new(1, 3, 0.0, 0.5, Drift::default())
            .with_terminal(0, 0, 1.0)
            .with_terminal(0, 2, f64::NAN)
            .with_max_sweeps(50);
        assert!(matches!(GridWorld::new(config), Err(Error::NonFinite(_))));
    }

    #[test]
    fn test_first_sweep_is_running() {
        let mut world = GridWorld::new(three_by_three()).unwrap();
        assert!(world.policy().is_none());
        assert_eq!(world.step(), SweepState::Running);
        assert_eq!(world.sweeps(), 1);
        let policy = world.policy().unwrap();
        assert_eq!(policy[[0, 0]], Policy::Move(Direction::Right));
        assert_eq!(policy[[2, 1]], Policy::Terminal(-1.0));
        assert_eq!(world.values()[[0, 0]], 0.68);
    }

    #[test]
    fn test_step_after_convergence_is_noop() {
        let mut world = GridWorld::new(three_by_three()).unwrap();
        world.solve().unwrap();
        let values = world.values().clone();
        assert_eq!(world.step(), SweepState::Converged);
        assert_eq!(world.sweeps(), 2);
        assert_eq!(world.values(), &values);
    }

    #[test]
    fn test_history_disabled_by_default() {
        let mut world = GridWorld::new(three_by_three()).unwrap();
        world.solve().unwrap();
        assert!(world.history().is_none());
    }

    #[test]
    fn test_history_records_every_sweep() {
        let mut world = GridWorld::new(three_by_three().with_history(true)).unwrap();
        let solution = world.solve().unwrap();
        let history = world.history().unwrap();
        assert_eq!(history.len(), solution.sweeps + 1);
        assert_eq!(history[0].policy[[1, 1]], Policy::Unset);
        assert_eq!(history[0].values[[0, 1]], 1.0);
        assert_eq!(history.last().unwrap().values, solution.values);
        assert_eq!(history.last().unwrap().policy, solution.policy);
    }

    #[test]
    fn test_max_sweeps_reports_not_converged() {
        let mut world = GridWorld::new(three_by_three().with_max_sweeps(1)).unwrap();
        assert_eq!(world.solve(), Err(Error::NotConverged { sweeps: 1 }));
        assert_eq!(world.state(), SweepState::Running);
    }

    #[test]
    fn test_bound_reached_exactly_on_convergence() {
        let mut world = GridWorld::new(three_by_three().with_max_sweeps(2)).unwrap();
        let solution = world.solve().unwrap();
        assert_eq!(solution.sweeps, 2);
    }

    #[test]
    fn test_zero_bound() {
        let mut world = GridWorld::new(three_by_three().with_max_sweeps(0)).unwrap();
        assert_eq!(world.solve(), Err(Error::NotConverged { sweeps: 0 }));
        assert_eq!(world.grid().value(Coord::new(0, 0)), 0.0);
    }
}
