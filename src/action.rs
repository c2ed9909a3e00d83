use strum::{EnumIter, FromRepr, VariantArray};

/// Action values for one cell, ordered `[up, down, left, right]`
pub type ActionValues = [f32; 4];

/// The four moves, in the column order of an [`ActionValues`] row
#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(usize)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// Unit displacement `(dx, dy)`, with `y` growing upward
    pub fn displacement(self) -> (i32, i32) {
        match self {
            Action::Up => (0, 1),
            Action::Down => (0, -1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Pick the highest-valued action, ties going to the lowest index
    ///
    /// NaN entries never win; a row of NaNs yields [`Action::Up`].
    pub fn greedy(values: &ActionValues) -> Self {
        let mut best = 0;
        let mut max = f32::MIN;
        for (i, &v) in values.iter().enumerate() {
            if v > max {
                max = v;
                best = i;
            }
        }
        Self::from_repr(best).unwrap_or(Action::Up)
    }
}
