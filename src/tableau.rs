//! The solver's game position: tableau columns, stock, and foundations.
//!
//! `SearchState` is the unit the solvers clone and mutate. It deliberately
//! has no waste pile: under draw-1 with unlimited recycling every stock card
//! is eventually reachable, so the search treats the stock as a multiset it
//! may pull from in any order. That is a strictly larger move set than real
//! play, which is exactly what a solvability oracle wants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::{Card, CARDS_PER_DECK, NUM_RANKS, NUM_SUITS};

/// Number of tableau columns in Klondike.
pub const NUM_COLS: usize = 7;

/// Validation failure for a `deck_order` permutation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck order must contain exactly 52 indices, got {0}")]
    WrongLength(usize),
    #[error("card index {0} out of range 0..=51")]
    OutOfRange(u8),
    #[error("duplicate card index {0}")]
    Duplicate(u8),
}

/// One tableau column, stored bottom-to-top.
///
/// The first `face_down` cards (counted from the bottom) are face-down;
/// everything above them is face-up. Individual cards carry no face-up
/// flag of their own, the watermark is the single source of truth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub cards: Vec<Card>,
    pub face_down: usize,
}

impl Column {
    pub fn new() -> Self {
        Column {
            cards: Vec::new(),
            face_down: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Topmost card, if any (face-up or not).
    #[inline]
    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    /// The face-up portion of the column, bottom-to-top.
    #[inline]
    pub fn face_up_cards(&self) -> &[Card] {
        &self.cards[self.face_down..]
    }

    /// Number of face-up cards.
    #[inline]
    pub fn face_up_count(&self) -> usize {
        self.cards.len() - self.face_down
    }

    /// After cards were removed from the top, flip the newly exposed card
    /// if the face-up region just emptied. Returns true when a flip
    /// happened (the solvers treat this as search progress).
    #[inline]
    pub fn flip_exposed_after_removal(&mut self) -> bool {
        if !self.cards.is_empty() && self.face_down == self.cards.len() {
            self.face_down -= 1;
            true
        } else {
            false
        }
    }
}

impl Default for Column {
    fn default() -> Self {
        Column::new()
    }
}

/// A full search position.
///
/// Foundations are stored as `foundations[suit] = 0..=13`: 0 means the
/// pile is empty, N > 0 means the top card has rank number N. The pile
/// contents are implied, since foundations grow strictly Ace..King.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub columns: [Column; NUM_COLS],
    pub stock: Vec<Card>,
    pub foundations: [u8; NUM_SUITS as usize],
}

impl SearchState {
    /// Deal a position from a 52-element permutation of card indices.
    ///
    /// Columns receive 1, 2, ... 7 cards in order (only the last card per
    /// column face-up); the remaining 24 cards become the stock. Malformed
    /// input fails fast with a `DeckError` rather than producing a corrupt
    /// state.
    pub fn deal_from_permutation(deck_order: &[u8]) -> Result<Self, DeckError> {
        if deck_order.len() != CARDS_PER_DECK as usize {
            return Err(DeckError::WrongLength(deck_order.len()));
        }
        let mut seen = [false; CARDS_PER_DECK as usize];
        for &idx in deck_order {
            if idx >= CARDS_PER_DECK {
                return Err(DeckError::OutOfRange(idx));
            }
            if seen[idx as usize] {
                return Err(DeckError::Duplicate(idx));
            }
            seen[idx as usize] = true;
        }

        let mut columns: [Column; NUM_COLS] = Default::default();
        let mut pos = 0usize;
        for (col_idx, col) in columns.iter_mut().enumerate() {
            let count = col_idx + 1;
            col.cards
                .extend(deck_order[pos..pos + count].iter().map(|&i| Card(i)));
            col.face_down = count - 1;
            pos += count;
        }

        let stock: Vec<Card> = deck_order[pos..].iter().map(|&i| Card(i)).collect();

        Ok(SearchState {
            columns,
            stock,
            foundations: [0; NUM_SUITS as usize],
        })
    }

    /// Total number of cards already on the foundations.
    #[inline]
    pub fn foundation_total(&self) -> u32 {
        self.foundations.iter().map(|&f| f as u32).sum()
    }

    /// True when all four foundations have reached the King.
    #[inline]
    pub fn is_won(&self) -> bool {
        self.foundations.iter().all(|&f| f == NUM_RANKS)
    }

    /// True when no tableau card remains face-down.
    ///
    /// This is the precondition for the greedy-finish shortcut: once every
    /// tableau card is visible, finishing is a matter of ordering only.
    #[inline]
    pub fn all_face_up(&self) -> bool {
        self.columns.iter().all(|c| c.face_down == 0)
    }

    /// Total face-down cards across the tableau.
    #[inline]
    pub fn face_down_total(&self) -> usize {
        self.columns.iter().map(|c| c.face_down).sum()
    }

    /// Number of empty tableau columns.
    #[inline]
    pub fn empty_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.is_empty()).count()
    }

    /// Columns that still hold face-down cards, as a 7-bit mask.
    #[inline]
    pub fn blocked_mask(&self) -> u8 {
        let mut mask = 0u8;
        for (i, col) in self.columns.iter().enumerate() {
            if col.face_down > 0 {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Total cards in play (tableau + stock + foundations). Always 52 for
    /// states produced by legal move application; checked in tests.
    pub fn total_cards(&self) -> u32 {
        let tableau: u32 = self.columns.iter().map(|c| c.len() as u32).sum();
        tableau + self.stock.len() as u32 + self.foundation_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::shuffled_deck_from_seed;

    #[test]
    fn deal_shape_is_correct_for_valid_permutations() {
        for seed in [1u32, 42, 2025, 987654] {
            let order = shuffled_deck_from_seed(seed);
            let state = SearchState::deal_from_permutation(&order).unwrap();

            for (i, col) in state.columns.iter().enumerate() {
                assert_eq!(col.len(), i + 1, "column {i} card count");
                assert_eq!(col.face_down, i, "column {i} face-down count");
                assert_eq!(col.face_up_count(), 1, "column {i} face-up count");
            }
            assert_eq!(state.stock.len(), 24);
            assert_eq!(state.foundation_total(), 0);
            assert_eq!(state.total_cards(), 52);
        }
    }

    #[test]
    fn deal_rejects_wrong_length() {
        let short = [0u8; 51];
        assert_eq!(
            SearchState::deal_from_permutation(&short),
            Err(DeckError::WrongLength(51))
        );
    }

    #[test]
    fn deal_rejects_out_of_range_index() {
        let mut order = shuffled_deck_from_seed(7);
        order[10] = 52;
        assert_eq!(
            SearchState::deal_from_permutation(&order),
            Err(DeckError::OutOfRange(52))
        );
    }

    #[test]
    fn deal_rejects_duplicates() {
        let mut order = shuffled_deck_from_seed(7);
        order[3] = order[40];
        assert!(matches!(
            SearchState::deal_from_permutation(&order),
            Err(DeckError::Duplicate(_))
        ));
    }

    #[test]
    fn flip_exposed_only_fires_when_face_up_region_empties() {
        let mut col = Column::new();
        col.cards = vec![Card(0), Card(1), Card(2)];
        col.face_down = 2;

        // Face-up card still present: no flip.
        assert!(!col.flip_exposed_after_removal());
        assert_eq!(col.face_down, 2);

        // Remove the face-up card; now the top face-down card must flip.
        col.cards.pop();
        assert!(col.flip_exposed_after_removal());
        assert_eq!(col.face_down, 1);

        // Empty column never flips.
        col.cards.clear();
        col.face_down = 0;
        assert!(!col.flip_exposed_after_removal());
    }

    #[test]
    fn won_state_detection() {
        let order = shuffled_deck_from_seed(3);
        let mut state = SearchState::deal_from_permutation(&order).unwrap();
        assert!(!state.is_won());
        state.foundations = [13, 13, 13, 13];
        assert!(state.is_won());
    }
}
