use alloc::vec::Vec;
use rand::prelude::*;

use super::*;

/// Rejection sampling: pick uniformly random cells and discard the ones that are
/// already mined or inside the safe zone.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectionPlacer {
    seed: u64,
}

impl RejectionPlacer {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlacer for RejectionPlacer {
    fn place(self, config: GameConfig, safe: Coord2) -> Result<Array2<bool>> {
        available_cells(config, safe)?;

        let mut mines: Array2<bool> = Array2::default(config.size().to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed = 0;
        let mut draws: u32 = 0;

        while placed < config.mines() {
            let coords = (
                rng.random_range(0..config.rows()),
                rng.random_range(0..config.cols()),
            );
            draws += 1;

            if is_within_one(coords, safe) || mines[coords.to_nd_index()] {
                continue;
            }
            mines[coords.to_nd_index()] = true;
            placed += 1;
        }

        log::debug!(
            "Placed {} mines around safe cell {:?} in {} draws",
            placed,
            safe,
            draws
        );
        Ok(mines)
    }
}

/// Shuffled candidate list: draws without replacement from the cells outside the
/// safe zone, so the number of random draws is bounded by the mine count.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffledPlacer {
    seed: u64,
}

impl ShuffledPlacer {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlacer for ShuffledPlacer {
    fn place(self, config: GameConfig, safe: Coord2) -> Result<Array2<bool>> {
        let available = available_cells(config, safe)?;

        let (rows, cols) = config.size();
        let mut candidates: Vec<Coord2> = Vec::with_capacity(available.into());
        for row in 0..rows {
            for col in 0..cols {
                if !is_within_one((row, col), safe) {
                    candidates.push((row, col));
                }
            }
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let (chosen, _) = candidates.partial_shuffle(&mut rng, config.mines().into());

        let mut mines: Array2<bool> = Array2::default(config.size().to_nd_index());
        for &coords in chosen.iter() {
            mines[coords.to_nd_index()] = true;
        }

        log::debug!(
            "Placed {} mines around safe cell {:?} from {} candidates",
            chosen.len(),
            safe,
            available
        );
        Ok(mines)
    }
}
