use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell. Flagged cells are still hidden.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    has_mine: bool,
    state: CellState,
    adjacent_mine_count: u8,
}

impl Cell {
    pub const fn has_mine(self) -> bool {
        self.has_mine
    }

    pub const fn state(self) -> CellState {
        self.state
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self.state, CellState::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    /// Number of mines among the neighbors, only meaningful when the cell has no mine.
    pub const fn adjacent_mine_count(self) -> u8 {
        self.adjacent_mine_count
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub(crate) fn arm(&mut self, has_mine: bool, adjacent_mine_count: u8) {
        self.has_mine = has_mine;
        self.adjacent_mine_count = adjacent_mine_count;
    }
}

/// What the presentation layer should draw for a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// Unflagged mine exposed after a loss.
    Mine,
    /// The mine that ended the game.
    Exploded,
}
