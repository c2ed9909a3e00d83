use log::{debug, info, warn};

use crate::{
    action::Action,
    grid::{Cell, Grid},
    policy::PolicyTable,
};

/// Default step budget for a single replay
pub const DEFAULT_MAX_STEPS: u32 = 200;

/// Where a replay stands; everything but `Running` is terminal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Running,
    ReachedGoal,
    HaltedUnknownState,
    StepBudgetExhausted,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::Running
    }
}

/// Replays a policy table greedily, one cell per tick
///
/// The controller owns only its discrete position; any smooth motion between cells is
/// for the presentation layer to derive.
#[derive(Clone, Debug)]
pub struct AgentController {
    position: Cell,
    step_count: u32,
    max_steps: u32,
    status: Status,
}

impl AgentController {
    pub fn new(start: Cell, max_steps: u32) -> Self {
        Self {
            position: start,
            step_count: 0,
            max_steps,
            status: Status::Running,
        }
    }

    /// Start from a continuous host position, snapped to the nearest cell
    pub fn from_continuous(x: f32, y: f32, max_steps: u32) -> Self {
        Self::new(Cell::from_continuous(x, y), max_steps)
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    /// Run one iteration of the decision loop and return the resulting status
    ///
    /// Terminal states are sticky: once one is reached, further ticks do nothing.
    /// Obstacles are not checked, so a policy trained on another map can walk through walls.
    pub fn tick(&mut self, grid: &Grid, table: &PolicyTable) -> Status {
        if self.status.is_terminal() {
            return self.status;
        }

        if self.step_count >= self.max_steps {
            return self.exhaust();
        }

        let current = self.position;
        if grid.is_goal(current) {
            info!("reached goal {current} after {} steps", self.step_count);
            self.status = Status::ReachedGoal;
            return self.status;
        }

        let Some(values) = table.lookup(current) else {
            warn!(
                "unknown state {current} at step {}; agent halted",
                self.step_count
            );
            self.status = Status::HaltedUnknownState;
            return self.status;
        };

        let action = Action::greedy(values);
        let Some(next) = current.offset(action.displacement()) else {
            warn!(
                "{action:?} from {current} at step {} leaves the coordinate range; agent halted",
                self.step_count
            );
            self.status = Status::HaltedUnknownState;
            return self.status;
        };
        self.position = next;
        self.step_count += 1;
        debug!(
            "step {}: {current} -> {} ({action:?})",
            self.step_count, self.position
        );

        if self.step_count >= self.max_steps {
            return self.exhaust();
        }
        self.status
    }

    /// Tick until a terminal state, without any pacing
    pub fn run_to_end(&mut self, grid: &Grid, table: &PolicyTable) -> Status {
        while !self.tick(grid, table).is_terminal() {}
        self.status
    }

    fn exhaust(&mut self) -> Status {
        info!(
            "step budget of {} exhausted without reaching the goal",
            self.max_steps
        );
        self.status = Status::StepBudgetExhausted;
        self.status
    }
}
