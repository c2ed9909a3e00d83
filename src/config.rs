use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    agent::{AgentController, DEFAULT_MAX_STEPS},
    error::LoadError,
    grid::{Cell, Grid, Scenario, DEFAULT_OBSTACLES},
    policy::PolicyTable,
};

/// Configuration for a replay run
///
/// Every field is optional in the JSON form; missing ones take the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub max_steps: u32,
    /// Pause between steps
    pub step_interval_ms: u64,
    /// Pause before the first step
    pub start_delay_ms: u64,
    /// Advisory only, never bounds a move
    pub grid_width: i32,
    pub grid_height: i32,
    pub start: Cell,
    pub goal: Cell,
    pub obstacles: Vec<Cell>,
    pub policy_path: PathBuf,
    /// Warn about table states that are off-grid or blocked
    pub validate_table: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            step_interval_ms: 300,
            start_delay_ms: 1000,
            grid_width: 11,
            grid_height: 11,
            start: Cell::new(0, 0),
            goal: Cell::new(10, 10),
            obstacles: DEFAULT_OBSTACLES.into_iter().map(Cell::from).collect(),
            policy_path: PathBuf::from("q_table_unity.json"),
            validate_table: false,
        }
    }
}

impl ReplayConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| LoadError::parse(path, e))
    }

    /// Take grid layout and start cell from a scenario file
    pub fn with_scenario(mut self, scenario: &Scenario) -> Self {
        self.grid_width = scenario.width;
        self.grid_height = scenario.height;
        self.start = scenario.start;
        self.goal = scenario.goal;
        self.obstacles = scenario.obstacles.clone();
        self
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    /// **Panics** if the grid dimensions are not positive
    pub fn grid(&self) -> Grid {
        Grid::new(
            self.grid_width,
            self.grid_height,
            self.obstacles.iter().copied(),
            self.goal,
        )
    }

    /// Load the policy table, optionally checking it against `grid`
    pub fn policy(&self, grid: &Grid) -> PolicyTable {
        let table = PolicyTable::load(&self.policy_path);
        if self.validate_table {
            table.validate(grid);
        }
        table
    }

    pub fn agent(&self) -> AgentController {
        AgentController::new(self.start, self.max_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ReplayConfig::default();
        assert_eq!(config.max_steps, 200);
        assert_eq!(config.step_interval(), Duration::from_millis(300));
        assert_eq!(config.start_delay(), Duration::from_secs(1));
        assert_eq!(config.grid(), Grid::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ReplayConfig =
            serde_json::from_str(r#"{ "max_steps": 3, "goal": [4, 5] }"#).unwrap();
        assert_eq!(config.max_steps, 3);
        assert_eq!(config.goal, Cell::new(4, 5));
        assert_eq!(config.step_interval_ms, 300);
        assert_eq!(config.obstacles.len(), 12);
    }

    #[test]
    fn scenario_overrides_layout() {
        let scenario = Scenario {
            width: 4,
            height: 3,
            start: Cell::new(1, 0),
            goal: Cell::new(3, 2),
            obstacles: vec![Cell::new(2, 1)],
        };
        let config = ReplayConfig::default().with_scenario(&scenario);
        let grid = config.grid();
        assert_eq!((grid.width(), grid.height()), (4, 3));
        assert!(grid.is_obstacle(Cell::new(2, 1)));
        assert_eq!(config.agent().position(), Cell::new(1, 0));
    }

    #[test]
    fn missing_policy_path_gives_halting_agent() {
        let config = ReplayConfig {
            policy_path: PathBuf::from("no/such/q_table.json"),
            validate_table: true,
            ..Default::default()
        };
        let grid = config.grid();
        let table = config.policy(&grid);
        assert!(table.is_empty());
    }
}
