use alloc::collections::VecDeque;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Result of a reveal: the outcome and every cell it opened, in reveal order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    pub outcome: RevealOutcome,
    pub opened: Vec<Coord2>,
}

impl Reveal {
    const fn unchanged() -> Self {
        Self {
            outcome: RevealOutcome::Unchanged,
            opened: Vec::new(),
        }
    }
}

/// Cells to show after a loss: the mine that went off and every unflagged mine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Exposure {
    pub exploded: Coord2,
    pub mines: Vec<Coord2>,
}

/// Read-only view of a session for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub rows: Coord,
    pub cols: Coord,
    pub phase: Phase,
    pub mine_count: CellCount,
    pub flags_placed: CellCount,
    pub mines_remaining: i32,
    pub cells: Array2<CellView>,
}

impl Snapshot {
    /// `None` when `coords` lies outside the board.
    pub fn cell(&self, coords: Coord2) -> Option<CellView> {
        self.cells.get(coords.to_nd_index()).copied()
    }
}

/// A single game: the board plus everything needed to play it to the end.
///
/// Mines are placed on the first reveal, around the revealed cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSession {
    config: GameConfig,
    board: Array2<Cell>,
    flags_placed: CellCount,
    phase: Phase,
    first_move_done: bool,
    seed: u64,
    strategy: PlacementStrategy,
    exploded: Option<Coord2>,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_strategy(config, seed, PlacementStrategy::default())
    }

    pub fn with_strategy(config: GameConfig, seed: u64, strategy: PlacementStrategy) -> Self {
        log::debug!(
            "New {}x{} session with {} mines, seed {}, {:?} placement",
            config.rows(),
            config.cols(),
            config.mines(),
            seed,
            strategy
        );
        Self {
            config,
            board: Array2::default(config.size().to_nd_index()),
            flags_placed: 0,
            phase: Phase::NotStarted,
            first_move_done: false,
            seed,
            strategy,
            exploded: None,
        }
    }

    pub fn create(rows: Coord, cols: Coord, mine_count: CellCount, seed: u64) -> Result<Self> {
        Ok(Self::new(GameConfig::new(rows, cols, mine_count)?, seed))
    }

    /// Fresh session with the same configuration and placement strategy.
    pub fn reset(&self, seed: u64) -> Self {
        Self::with_strategy(self.config, seed, self.strategy)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn rows(&self) -> Coord {
        self.config.rows()
    }

    pub fn cols(&self) -> Coord {
        self.config.cols()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed
    }

    /// Mines minus flags, negative when more flags than mines are placed.
    pub fn mines_remaining(&self) -> i32 {
        i32::from(self.config.mines()) - i32::from(self.flags_placed)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn first_move_done(&self) -> bool {
        self.first_move_done
    }

    pub fn strategy(&self) -> PlacementStrategy {
        self.strategy
    }

    pub fn board(&self) -> &Array2<Cell> {
        &self.board
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.config.validate_coords(coords)?;
        Ok(self.board[coords.to_nd_index()])
    }

    pub fn exploded(&self) -> Option<Coord2> {
        self.exploded
    }

    /// Cells the presentation layer should expose once the game is lost.
    pub fn exposure(&self) -> Option<Exposure> {
        if self.phase != Phase::Lost {
            return None;
        }
        let exploded = self.exploded?;
        let mines = self
            .board
            .indexed_iter()
            .filter(|(_, cell)| cell.has_mine() && !cell.is_flagged())
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect();
        Some(Exposure { exploded, mines })
    }

    pub fn snapshot(&self) -> Snapshot {
        let lost = self.phase == Phase::Lost;
        let cells = Array2::from_shape_fn(self.board.dim(), |index| {
            let cell = self.board[index];
            match (cell.state(), cell.has_mine()) {
                (CellState::Flagged, _) => CellView::Flagged,
                (CellState::Revealed, true) => CellView::Exploded,
                (CellState::Revealed, false) => CellView::Revealed(cell.adjacent_mine_count()),
                (CellState::Hidden, true) if lost => CellView::Mine,
                (CellState::Hidden, _) => CellView::Hidden,
            }
        });

        Snapshot {
            rows: self.rows(),
            cols: self.cols(),
            phase: self.phase,
            mine_count: self.mine_count(),
            flags_placed: self.flags_placed,
            mines_remaining: self.mines_remaining(),
            cells,
        }
    }

    /// True when every cell without a mine is revealed. Flags do not matter.
    pub fn check_win(&self) -> bool {
        self.board
            .iter()
            .all(|cell| cell.has_mine() || cell.is_revealed())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<Reveal> {
        let coords = self.config.validate_coords(coords)?;

        if self.phase.is_terminal() || !self.board[coords.to_nd_index()].is_hidden() {
            return Ok(Reveal::unchanged());
        }

        if !self.first_move_done {
            self.place_mines(coords)?;
            self.first_move_done = true;
            self.phase = Phase::Playing;
        }

        if self.board[coords.to_nd_index()].has_mine() {
            self.board[coords.to_nd_index()].set_state(CellState::Revealed);
            self.exploded = Some(coords);
            self.phase = Phase::Lost;
            log::debug!("Mine revealed at {:?}, game lost", coords);
            return Ok(Reveal {
                outcome: RevealOutcome::Lost,
                opened: alloc::vec![coords],
            });
        }

        let opened = self.flood_reveal(coords);

        let outcome = if self.check_win() {
            self.phase = Phase::Won;
            log::debug!("All safe cells revealed, game won");
            RevealOutcome::Won
        } else {
            RevealOutcome::Continue
        };
        Ok(Reveal { outcome, opened })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.config.validate_coords(coords)?;

        if self.phase.is_terminal() {
            return Ok(FlagOutcome::Unchanged);
        }

        let cell = &mut self.board[coords.to_nd_index()];
        Ok(match cell.state() {
            CellState::Hidden => {
                cell.set_state(CellState::Flagged);
                self.flags_placed += 1;
                FlagOutcome::Flagged
            }
            CellState::Flagged => {
                cell.set_state(CellState::Hidden);
                self.flags_placed = self.flags_placed.saturating_sub(1);
                FlagOutcome::Unflagged
            }
            CellState::Revealed => FlagOutcome::Unchanged,
        })
    }

    /// Arms the board, keeping the cell states (flags placed before the first
    /// reveal survive placement).
    fn place_mines(&mut self, safe: Coord2) -> Result<()> {
        let mines = self.strategy.place(self.seed, self.config, safe)?;
        let counts = adjacent_counts(&mines);

        for (index, cell) in self.board.indexed_iter_mut() {
            cell.arm(mines[index], counts[index]);
        }
        Ok(())
    }

    /// Opens `start` and cascades through zero cells. Flagged cells stop the
    /// cascade and are left untouched.
    fn flood_reveal(&mut self, start: Coord2) -> Vec<Coord2> {
        let mut opened = Vec::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = &mut self.board[visit_coords.to_nd_index()];
            if !cell.is_hidden() {
                continue;
            }

            cell.set_state(CellState::Revealed);
            let count = cell.adjacent_mine_count();
            opened.push(visit_coords);
            log::trace!("Revealed {:?}, adjacent mines: {}", visit_coords, count);

            if count == 0 {
                to_visit.extend(
                    self.board
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.board[pos.to_nd_index()].is_hidden()),
                );
            }
        }

        opened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Session whose mines are fixed, bypassing random placement.
    fn armed(rows: Coord, cols: Coord, mines: &[Coord2]) -> GameSession {
        let config = GameConfig::new_unchecked(rows, cols, mines.len() as CellCount);
        let mut session = GameSession::new(config, 0);
        let mut mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        for &coords in mines {
            mask[coords.to_nd_index()] = true;
        }
        let counts = adjacent_counts(&mask);
        for (index, cell) in session.board.indexed_iter_mut() {
            cell.arm(mask[index], counts[index]);
        }
        session.first_move_done = true;
        session.phase = Phase::Playing;
        session
    }

    fn mines_of(session: &GameSession) -> Vec<Coord2> {
        session
            .board()
            .indexed_iter()
            .filter(|(_, cell)| cell.has_mine())
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }

    fn serialized(session: &GameSession) -> alloc::string::String {
        serde_json::to_string(session).unwrap()
    }

    #[test]
    fn new_session_is_hidden_and_unarmed() {
        let session = GameSession::create(9, 9, 10, 1).unwrap();

        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(!session.first_move_done());
        assert_eq!(session.flags_placed(), 0);
        assert!(session.board().iter().all(|cell| cell.is_hidden() && !cell.has_mine()));
        assert!(!session.check_win());
    }

    #[test]
    fn create_rejects_invalid_configuration() {
        assert_eq!(
            GameSession::create(9, 9, 73, 1),
            Err(GameError::InvalidConfiguration)
        );
        assert_eq!(
            GameSession::create(0, 9, 0, 1),
            Err(GameError::InvalidConfiguration)
        );
    }

    #[test]
    fn first_reveal_places_mines_outside_safe_zone() {
        let mut session = GameSession::new(Difficulty::Easy.config(), 1234);

        let reveal = session.reveal((4, 4)).unwrap();

        assert_ne!(reveal.outcome, RevealOutcome::Lost);
        assert!(session.first_move_done());
        let mines = mines_of(&session);
        assert_eq!(mines.len(), 10);
        assert!(mines.iter().all(|&pos| !is_within_one(pos, (4, 4))));
        // the safe centre has no adjacent mines, so it always cascades
        assert!(reveal.opened.len() >= 9);
        assert_eq!(session.cell((4, 4)).unwrap().adjacent_mine_count(), 0);
    }

    #[test]
    fn adjacency_sum_matches_mine_neighbor_pairs() {
        let mut session = GameSession::new(Difficulty::Easy.config(), 99);
        session.reveal((4, 4)).unwrap();

        let board = session.board();
        let count_sum: usize = board
            .iter()
            .filter(|cell| !cell.has_mine())
            .map(|cell| usize::from(cell.adjacent_mine_count()))
            .sum();
        let pairs: usize = mines_of(&session)
            .into_iter()
            .map(|mine| {
                board
                    .iter_neighbors(mine)
                    .filter(|&pos| !board[pos.to_nd_index()].has_mine())
                    .count()
            })
            .sum();

        assert_eq!(count_sum, pairs);
    }

    #[test]
    fn adjacency_matches_brute_force_on_random_boards() {
        for seed in 0..32 {
            for strategy in [PlacementStrategy::Rejection, PlacementStrategy::Shuffled] {
                let mut session =
                    GameSession::with_strategy(Difficulty::Medium.config(), seed, strategy);
                session.reveal(((seed % 16) as Coord, 0)).unwrap();

                let board = session.board();
                let (rows, cols) = board.dim();
                for ((row, col), cell) in board.indexed_iter() {
                    if cell.has_mine() {
                        continue;
                    }
                    let mut expected = 0;
                    for r in row.saturating_sub(1)..=(row + 1).min(rows - 1) {
                        for c in col.saturating_sub(1)..=(col + 1).min(cols - 1) {
                            if (r, c) != (row, col) && board[[r, c]].has_mine() {
                                expected += 1;
                            }
                        }
                    }
                    assert_eq!(cell.adjacent_mine_count(), expected, "cell ({row}, {col})");
                }
            }
        }
    }

    #[test]
    fn zero_mine_board_cascades_everywhere() {
        let mut session = GameSession::create(3, 3, 0, 5).unwrap();

        let reveal = session.reveal((0, 0)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::Won);
        assert_eq!(reveal.opened.len(), 9);
        assert_eq!(reveal.opened[0], (0, 0));
        assert!(session.board().iter().all(|cell| cell.is_revealed()));
        assert_eq!(session.phase(), Phase::Won);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // . . . .
        // . . . .
        // . . . 1
        // . . 1 *
        let mut session = armed(4, 4, &[(3, 3)]);

        let reveal = session.reveal((0, 0)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::Won);
        assert_eq!(reveal.opened.len(), 15);
        assert_eq!(session.cell((2, 2)).unwrap().adjacent_mine_count(), 1);
        assert!(session.cell((3, 3)).unwrap().is_hidden());
    }

    #[test]
    fn numbered_cell_does_not_cascade() {
        let mut session = armed(3, 3, &[(0, 0)]);

        let reveal = session.reveal((1, 1)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::Continue);
        assert_eq!(reveal.opened, [(1, 1)]);
        assert_eq!(session.board().iter().filter(|cell| cell.is_revealed()).count(), 1);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut session = armed(1, 5, &[(0, 4)]);
        session.toggle_flag((0, 1)).unwrap();

        let reveal = session.reveal((0, 0)).unwrap();

        assert_eq!(reveal.opened, [(0, 0)]);
        assert!(session.cell((0, 1)).unwrap().is_flagged());
        assert!(session.cell((0, 2)).unwrap().is_hidden());
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut session = armed(4, 4, &[(3, 3), (0, 3)]);
        session.reveal((0, 0)).unwrap();
        let before = serialized(&session);

        let again = session.reveal((0, 0)).unwrap();

        assert_eq!(again, Reveal::unchanged());
        assert_eq!(serialized(&session), before);
    }

    #[test]
    fn reveal_on_flagged_cell_keeps_flag() {
        let mut session = armed(3, 3, &[(2, 2)]);
        session.toggle_flag((0, 0)).unwrap();

        let reveal = session.reveal((0, 0)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::Unchanged);
        assert!(session.cell((0, 0)).unwrap().is_flagged());
    }

    #[test]
    fn flagged_first_click_does_not_start_game() {
        let mut session = GameSession::new(Difficulty::Easy.config(), 3);
        assert_eq!(session.toggle_flag((2, 2)), Ok(FlagOutcome::Flagged));

        assert_eq!(session.reveal((2, 2)).unwrap().outcome, RevealOutcome::Unchanged);
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(!session.first_move_done());
    }

    #[test]
    fn flags_survive_mine_placement() {
        let mut session = GameSession::new(Difficulty::Easy.config(), 8);
        session.toggle_flag((0, 0)).unwrap();

        session.reveal((8, 8)).unwrap();

        assert!(session.cell((0, 0)).unwrap().is_flagged());
        assert_eq!(session.flags_placed(), 1);
    }

    #[test]
    fn hitting_mine_loses_and_freezes_board() {
        let mut session = armed(3, 3, &[(0, 0), (2, 2)]);
        session.toggle_flag((2, 2)).unwrap();

        let reveal = session.reveal((0, 0)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::Lost);
        assert_eq!(reveal.opened, [(0, 0)]);
        assert_eq!(session.phase(), Phase::Lost);
        assert_eq!(session.exploded(), Some((0, 0)));

        let before = serialized(&session);
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(session.reveal((row, col)).unwrap(), Reveal::unchanged());
                assert_eq!(session.toggle_flag((row, col)), Ok(FlagOutcome::Unchanged));
            }
        }
        assert_eq!(serialized(&session), before);
    }

    #[test]
    fn exposure_lists_unflagged_mines() {
        let mut session = armed(3, 3, &[(0, 0), (0, 2), (2, 2)]);
        assert_eq!(session.exposure(), None);
        session.toggle_flag((2, 2)).unwrap();

        session.reveal((0, 0)).unwrap();

        let exposure = session.exposure().unwrap();
        assert_eq!(exposure.exploded, (0, 0));
        assert_eq!(exposure.mines, [(0, 0), (0, 2)]);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.cell((0, 0)), Some(CellView::Exploded));
        assert_eq!(snapshot.cell((0, 2)), Some(CellView::Mine));
        assert_eq!(snapshot.cell((2, 2)), Some(CellView::Flagged));
        assert_eq!(snapshot.cell((1, 1)), Some(CellView::Hidden));
    }

    #[test]
    fn check_win_ignores_flags() {
        let mut session = armed(2, 2, &[(0, 0)]);
        session.reveal((0, 1)).unwrap();
        session.reveal((1, 0)).unwrap();
        assert!(!session.check_win());
        session.toggle_flag((0, 0)).unwrap();
        assert!(!session.check_win());

        let reveal = session.reveal((1, 1)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::Won);
        assert!(session.check_win());
        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(session.toggle_flag((0, 0)), Ok(FlagOutcome::Unchanged));
        assert!(session.cell((0, 0)).unwrap().is_flagged());
    }

    #[test]
    fn toggle_flag_twice_restores_state() {
        let mut session = armed(3, 3, &[(2, 2)]);

        assert_eq!(session.toggle_flag((1, 1)), Ok(FlagOutcome::Flagged));
        assert_eq!(session.flags_placed(), 1);
        assert_eq!(session.mines_remaining(), 0);
        assert_eq!(session.toggle_flag((1, 1)), Ok(FlagOutcome::Unflagged));

        assert_eq!(session.flags_placed(), 0);
        assert!(!session.cell((1, 1)).unwrap().is_flagged());
        assert!(session.cell((1, 1)).unwrap().is_hidden());
    }

    #[test]
    fn flags_may_exceed_mine_count() {
        let mut session = armed(3, 3, &[(2, 2)]);
        session.toggle_flag((0, 0)).unwrap();
        session.toggle_flag((0, 1)).unwrap();
        session.toggle_flag((0, 2)).unwrap();

        assert_eq!(session.flags_placed(), 3);
        assert_eq!(session.mines_remaining(), -2);
    }

    #[test]
    fn toggle_flag_ignores_revealed_cells() {
        let mut session = armed(3, 3, &[(2, 2)]);
        session.reveal((1, 1)).unwrap();

        assert_eq!(session.toggle_flag((1, 1)), Ok(FlagOutcome::Unchanged));
        assert_eq!(session.flags_placed(), 0);
    }

    #[test]
    fn out_of_bounds_leaves_session_unchanged() {
        let mut session = GameSession::new(Difficulty::Easy.config(), 11);
        let before = serialized(&session);

        assert_eq!(session.reveal((9, 9)), Err(GameError::OutOfBounds));
        assert_eq!(session.reveal((9, 0)), Err(GameError::OutOfBounds));
        assert_eq!(session.toggle_flag((0, 9)), Err(GameError::OutOfBounds));
        assert_eq!(session.cell((9, 9)), Err(GameError::OutOfBounds));

        assert_eq!(serialized(&session), before);
        assert_eq!(session.phase(), Phase::NotStarted);
    }

    #[test]
    fn reset_keeps_config_and_strategy() {
        let mut session =
            GameSession::with_strategy(Difficulty::Medium.config(), 1, PlacementStrategy::Shuffled);
        session.reveal((0, 0)).unwrap();
        session.toggle_flag((15, 15)).ok();

        let fresh = session.reset(2);

        assert_eq!(fresh.config(), Difficulty::Medium.config());
        assert_eq!(fresh.strategy(), PlacementStrategy::Shuffled);
        assert_eq!(fresh.phase(), Phase::NotStarted);
        assert_eq!(fresh.flags_placed(), 0);
    }

    #[test]
    fn snapshot_reports_counters() {
        let mut session = armed(3, 3, &[(0, 0), (2, 2)]);
        session.toggle_flag((2, 2)).unwrap();
        session.reveal((0, 2)).unwrap();

        let snapshot = session.snapshot();

        assert_eq!((snapshot.rows, snapshot.cols), (3, 3));
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(snapshot.mine_count, 2);
        assert_eq!(snapshot.flags_placed, 1);
        assert_eq!(snapshot.mines_remaining, 1);
        assert_eq!(snapshot.cell((0, 2)), Some(CellView::Revealed(0)));
        assert_eq!(snapshot.cell((1, 1)), Some(CellView::Revealed(2)));
        assert_eq!(snapshot.cell((2, 2)), Some(CellView::Flagged));
        assert_eq!(snapshot.cell((0, 0)), Some(CellView::Hidden));
        assert_eq!(snapshot.cell((2, 0)), Some(CellView::Hidden));
        assert_eq!(snapshot.cell((3, 0)), None);
        assert_eq!(snapshot.cell((0, 3)), None);
    }
}
