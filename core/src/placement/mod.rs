use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

/// Chooses where the mines of a board go, keeping the 3x3 zone around `safe`
/// free of mines.
pub trait MinePlacer {
    fn place(self, config: GameConfig, safe: Coord2) -> Result<Array2<bool>>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStrategy {
    /// Draw random cells until enough of them land outside the safe zone.
    #[default]
    Rejection,
    /// Shuffle the cells outside the safe zone and take the first ones.
    Shuffled,
}

impl PlacementStrategy {
    pub fn place(self, seed: u64, config: GameConfig, safe: Coord2) -> Result<Array2<bool>> {
        match self {
            Self::Rejection => RejectionPlacer::new(seed).place(config, safe),
            Self::Shuffled => ShuffledPlacer::new(seed).place(config, safe),
        }
    }
}

/// Number of cells a mine may be placed on, or `InvalidConfiguration` when the
/// mines would not fit outside the safe zone.
fn available_cells(config: GameConfig, safe: Coord2) -> Result<CellCount> {
    let safe = config.validate_coords(safe)?;
    // the safe cell itself plus its in-bounds neighbors
    let excluded = 1 + NeighborIter::new(safe, config.size()).count() as CellCount;
    let available = config.total_cells() - excluded;

    if config.mines() > available {
        log::warn!(
            "Cannot fit {} mines outside the safe zone at {:?}, only {} cells available",
            config.mines(),
            safe,
            available
        );
        return Err(GameError::InvalidConfiguration);
    }
    Ok(available)
}

/// Adjacent mine count for every cell of `mines`, mine cells included.
pub fn adjacent_counts(mines: &Array2<bool>) -> Array2<u8> {
    Array2::from_shape_fn(mines.dim(), |(row, col)| {
        let coords = (row as Coord, col as Coord);
        mines
            .iter_neighbors(coords)
            .filter(|&pos| mines[pos.to_nd_index()])
            .count() as u8
    })
}
