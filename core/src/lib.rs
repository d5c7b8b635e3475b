#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use placement::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod placement;
mod types;

/// Cells around the first reveal that are kept free of mines, in the worst case.
const SAFE_ZONE_CELLS: u32 = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    rows: Coord,
    cols: Coord,
    mines: CellCount,
}

impl GameConfig {
    pub(crate) const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Validates the board shape and mine count.
    ///
    /// The mines must fit outside a full 3x3 safe zone, so `mines < rows * cols - 8`.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let total = u32::from(rows) * u32::from(cols);
        if rows == 0 || cols == 0 || u32::from(mines) + SAFE_ZONE_CELLS > total {
            log::warn!(
                "Rejected board configuration {}x{} with {} mines",
                rows,
                cols,
                mines
            );
            return Err(GameError::InvalidConfiguration);
        }
        Ok(Self::new_unchecked(rows, cols, mines))
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.rows && coords.1 < self.cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}

/// Classic board presets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked(9, 9, 10),
            Self::Medium => GameConfig::new_unchecked(16, 16, 40),
            Self::Hard => GameConfig::new_unchecked(16, 30, 99),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Unchanged,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    Unchanged,
    Continue,
    Won,
    Lost,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            Unchanged => false,
            Continue => true,
            Won => true,
            Lost => true,
        }
    }
}
