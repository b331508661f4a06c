//! Human-readable rendering of search states.
//!
//! Renders a `SearchState` as multi-line text using the compact `Card`
//! representation: face-down cards are shown as "XX", face-up cards with
//! their `short_str()` rank/suit code. Useful for debugging deals and for
//! logging winning lines in a form a person can follow.

use crate::card::{Card, Rank, Suit};
use crate::moves::Move;
use crate::tableau::{SearchState, NUM_COLS};

/// Format a single card for display, either face-up or face-down.
pub fn format_card_visible(card: Card, face_up: bool) -> String {
    if face_up {
        card.short_str()
    } else {
        "XX".to_string()
    }
}

/// Render only the foundation row.
///
/// Foundations are stored as rank numbers (0..=13); each slot shows its
/// top card, e.g. `[AH]` or `[KD]`, or `[  ]` when empty.
pub fn render_foundations(state: &SearchState) -> String {
    let mut s = String::new();
    s.push_str("Foundations: ");
    for (i, &rank_num) in state.foundations.iter().enumerate() {
        if rank_num == 0 {
            s.push_str("[  ] ");
        } else {
            let card = Card::new(Suit::from_u8(i as u8), Rank::from_u8(rank_num - 1));
            s.push('[');
            s.push_str(&card.short_str());
            s.push_str("] ");
        }
    }
    s.trim_end().to_string()
}

/// Render the stock on a single line.
///
/// The solver treats the stock as an unordered reserve, so only the count
/// is shown; there is no meaningful "top" to reveal.
pub fn render_stock(state: &SearchState) -> String {
    if state.stock.is_empty() {
        "Stock: [empty]".to_string()
    } else {
        format!("Stock: [{} cards]", state.stock.len())
    }
}

/// Render all tableau columns as a multi-line string.
///
/// Columns are arranged in 7 vertical stacks, each cell three characters
/// wide. Rows run from the buried end downward, so the face-down "XX"
/// cells come first and the playable edge of each column is its lowest
/// non-empty row.
pub fn render_columns(state: &SearchState) -> String {
    let mut s = String::new();

    s.push_str("Columns:\n");
    s.push_str("      ");
    for col_idx in 0..NUM_COLS {
        s.push_str(&format!(" C{} ", col_idx + 1));
    }
    s.push('\n');

    let max_height = state.columns.iter().map(|c| c.len()).max().unwrap_or(0);
    if max_height == 0 {
        return s;
    }

    for row in 0..max_height {
        s.push_str("      ");
        for col in &state.columns {
            if row >= col.len() {
                s.push_str("    ");
            } else {
                let rep = format_card_visible(col.cards[row], row >= col.face_down);
                s.push_str(&format!("{:>3} ", rep));
            }
        }
        s.push('\n');
    }

    s
}

/// Render a full state (foundations, stock, and columns).
pub fn render_state(state: &SearchState) -> String {
    format!(
        "{}\n{}\n\n{}",
        render_foundations(state),
        render_stock(state),
        render_columns(state)
    )
}

/// Describe a move sequence starting from `state`, one numbered move per
/// line. The state is advanced while describing so each line names the
/// cards as they stand when the move is made.
pub fn describe_line(state: &SearchState, line: &[Move]) -> String {
    let mut s = String::new();
    let mut cursor = state.clone();
    for (i, mv) in line.iter().enumerate() {
        s.push_str(&format!("{:3}. {}\n", i + 1, mv.describe(&cursor)));
        mv.apply(&mut cursor);
    }
    s
}
