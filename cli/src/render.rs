use sweeper_core::{CellView, Phase, Snapshot};

pub fn glyph(view: CellView) -> char {
    match view {
        CellView::Hidden => '#',
        CellView::Flagged => 'F',
        CellView::Revealed(0) => '.',
        CellView::Revealed(count) => char::from(b'0' + count),
        CellView::Mine => '*',
        CellView::Exploded => 'X',
    }
}

pub fn phase_message(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::NotStarted | Phase::Playing => None,
        Phase::Won => Some("You won!"),
        Phase::Lost => Some("Boom! You lost."),
    }
}

/// Board with row and column labels, one cell every three characters.
pub fn render_board(snapshot: &Snapshot) -> String {
    let header: String = (0..snapshot.cols).map(|col| format!("{col:>3}")).collect();
    let mut out = format!("   {header}\n");

    for (row, cells) in snapshot.cells.outer_iter().enumerate() {
        let line: String = cells
            .iter()
            .map(|&view| format!("{:>3}", glyph(view)))
            .collect();
        out.push_str(&format!("{row:>3}{line}\n"));
    }

    out
}

pub fn render_status(snapshot: &Snapshot, elapsed_secs: u64) -> String {
    let mut status = format!(
        "Mines: {}  Time: {}s",
        snapshot.mines_remaining, elapsed_secs
    );
    if let Some(message) = phase_message(snapshot.phase) {
        status.push_str("  ");
        status.push_str(message);
    }
    status
}
