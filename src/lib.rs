//! Greedy replay of a precomputed Q-table over a 2D grid.
//!
//! A [`PolicyTable`] trained elsewhere is replayed by an [`AgentController`], which moves one
//! cell per tick towards the highest-valued action until it reaches the goal, finds a cell
//! the table does not know, or runs out of steps. A [`Driver`] paces the ticks.

/// Discrete actions and greedy selection
pub mod action;

/// Decision loop state machine
pub mod agent;

/// Replay configuration
pub mod config;

/// Paced execution of a replay
pub mod driver;

/// Errors from loading and saving JSON files
pub mod error;

/// Grid layout, obstacles and goal
pub mod grid;

/// Cell to action-value mapping
pub mod policy;

/// Terminal view of a running replay
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use action::{Action, ActionValues};
pub use agent::{AgentController, Status};
pub use config::ReplayConfig;
pub use driver::{Driver, Frame, NoPacer, Pacer, ThreadPacer};
pub use error::LoadError;
pub use grid::{Cell, Grid, Scenario, Tile};
pub use policy::{Mismatch, PolicyEntry, PolicyTable};
