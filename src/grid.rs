use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{assert_interval, error::LoadError, util::round_to_i32};

/// A discrete grid coordinate
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snap a continuous position onto the grid, rounding each axis independently
    pub fn from_continuous(x: f32, y: f32) -> Self {
        Self::new(round_to_i32(x), round_to_i32(y))
    }

    /// The cell reached by moving `(dx, dy)` from here, or `None` past the edge of `i32`
    pub fn offset(self, (dx, dy): (i32, i32)) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<[i32; 2]> for Cell {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Cell> for [i32; 2] {
    fn from(cell: Cell) -> Self {
        [cell.x, cell.y]
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What a renderer should draw at a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Obstacle,
    Goal,
}

/// Obstacle layout the bundled policies were trained against
pub const DEFAULT_OBSTACLES: [(i32, i32); 12] = [
    (0, 1),
    (1, 1),
    (2, 1),
    (3, 1),
    (4, 1),
    (6, 6),
    (7, 6),
    (8, 6),
    (9, 6),
    (6, 7),
    (6, 8),
    (6, 10),
];

/// Static description of the world the agent moves over
///
/// `width` and `height` are advisory: they drive rendering and [`PolicyTable::validate`](crate::policy::PolicyTable::validate)
/// but never bound a query or a move. The goal is not checked against the obstacle set.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    obstacles: HashSet<Cell>,
    goal: Cell,
}

impl Grid {
    /// **Panics** if `width` or `height` is not positive
    pub fn new(
        width: i32,
        height: i32,
        obstacles: impl IntoIterator<Item = Cell>,
        goal: Cell,
    ) -> Self {
        assert_interval!(width, 1, i32::MAX);
        assert_interval!(height, 1, i32::MAX);
        Self {
            width,
            height,
            obstacles: obstacles.into_iter().collect(),
            goal,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn obstacles(&self) -> &HashSet<Cell> {
        &self.obstacles
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    pub fn is_goal(&self, cell: Cell) -> bool {
        self.goal == cell
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    /// Goal takes precedence over an obstacle on the same cell
    pub fn tile(&self, cell: Cell) -> Tile {
        if self.is_goal(cell) {
            Tile::Goal
        } else if self.is_obstacle(cell) {
            Tile::Obstacle
        } else {
            Tile::Floor
        }
    }

    /// Every in-bounds cell, row by row starting at `y = 0`
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// Draw the grid as text with the top row (`y = height - 1`) first
    ///
    /// `W` agent, `M` goal, `#` obstacle, `.` free, in that order of precedence.
    pub fn render_ascii(&self, agent: Option<Cell>) -> String {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let cell = Cell::new(x, y);
                        if agent == Some(cell) {
                            "W"
                        } else if self.is_goal(cell) {
                            "M"
                        } else if self.is_obstacle(cell) {
                            "#"
                        } else {
                            "."
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(
            11,
            11,
            DEFAULT_OBSTACLES.into_iter().map(Cell::from),
            Cell::new(10, 10),
        )
    }
}

/// A grid layout plus start cell, as exported by the path-planning tools
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub width: i32,
    pub height: i32,
    pub start: Cell,
    pub goal: Cell,
    #[serde(default)]
    pub obstacles: Vec<Cell>,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| LoadError::parse(path, e))
    }

    /// **Panics** if the scenario has a non-positive width or height
    pub fn grid(&self) -> Grid {
        Grid::new(
            self.width,
            self.height,
            self.obstacles.iter().copied(),
            self.goal,
        )
    }
}
