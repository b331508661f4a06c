//! Hand-constructed deck orders with known solver outcomes.
//!
//! Randomly shuffled deals make poor regression anchors: whether they are
//! solvable, and how hard they are, is exactly what the solvers exist to
//! discover. The deals here are built so their outcome is provable by
//! inspection, which gives the search tests fixed points to assert
//! against.

use crate::card::CARDS_PER_DECK;

const DECK: usize = CARDS_PER_DECK as usize;

/// A deal with zero legal opening moves.
///
/// Construction (card indices are `suit * 13 + rank`, suits C/D/H/S,
/// rank 0 = Ace):
///
///   - The seven exposed tableau tops are all *black odd-rank* cards
///     (3C 5C 7C 9C JC KC 3S). No top is an Ace, so nothing goes to a
///     foundation; all tops share a color, so no top stacks on another.
///   - The stock holds only black non-Ace cards and *red odd-rank*
///     non-Ace cards. Black stock cards can never land on the black
///     tops; a red stock card would need an even rank one below an odd
///     top, and every red stock rank is odd.
///   - All four Aces (and every red even card) are buried face-down.
///
/// No column is empty and the foundations start bare, so foundation
/// returns and King relocations are off the table too. The move
/// generator provably returns nothing, which makes the deal the one
/// case where "unsolvable" is decided without a single move.
pub fn unplayable_deck() -> [u8; DECK] {
    // 3C 5C 7C 9C JC KC 3S
    let tops: [u8; 7] = [2, 4, 6, 8, 10, 12, 41];

    // Face-down: Aces, the leftover even clubs, and the red even cards.
    let buried: [u8; 21] = [
        0, 13, 26, 39, // AC AD AH AS
        1, 3, 5, 7, 9, // 2C 4C 6C 8C TC
        14, 16, 18, 20, 22, 24, // 2D 4D 6D 8D TD QD
        27, 29, 31, 33, 35, 37, // 2H 4H 6H 8H TH QH
    ];

    // Stock: red odd ranks, the remaining spades, and the Queen of clubs.
    let stock: [u8; 24] = [
        15, 17, 19, 21, 23, 25, // 3D 5D 7D 9D JD KD
        28, 30, 32, 34, 36, 38, // 3H 5H 7H 9H JH KH
        40, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, // spades minus AS and 3S
        11, // QC
    ];

    let mut deck = [0u8; DECK];
    let mut hidden = 0;
    let mut pos = 0;
    for (col, &top) in tops.iter().enumerate() {
        for _ in 0..col {
            deck[pos] = buried[hidden];
            hidden += 1;
            pos += 1;
        }
        deck[pos] = top;
        pos += 1;
    }
    deck[28..].copy_from_slice(&stock);
    deck
}

/// A deal that is winnable by foundation play alone.
///
/// Every tableau column is dealt in strictly descending rank order from
/// bottom to top, so the exposed card is always its column's minimum.
/// The globally lowest unplayed rank therefore always sits on a column
/// top or in the stock, and its foundation is always one below it; the
/// argument holds inductively all the way to a won game. The
/// low ranks (Aces through 3s, plus spares of 4..=9) start in the stock.
pub fn easy_win_deck() -> [u8; DECK] {
    // Rank runs per column, bottom to top, by rank number (A = 1).
    const RUNS: [&[u8]; 7] = [
        &[13],
        &[13, 12],
        &[13, 12, 11],
        &[13, 12, 11, 10],
        &[12, 11, 10, 9, 8],
        &[11, 10, 9, 8, 7, 6],
        &[10, 9, 8, 7, 6, 5, 4],
    ];

    let mut deck = [0u8; DECK];
    let mut used = [false; DECK];
    // Rotate suits per rank so no rank repeats a suit across columns.
    let mut next_suit = [0u8; 14];

    let mut pos = 0;
    for run in RUNS {
        for &rank in run {
            let suit = next_suit[rank as usize];
            next_suit[rank as usize] += 1;
            let index = suit * 13 + (rank - 1);
            deck[pos] = index;
            used[index as usize] = true;
            pos += 1;
        }
    }

    // Everything not dealt goes to the stock, low cards first.
    for index in 0..DECK {
        if !used[index] {
            deck[pos] = index as u8;
            pos += 1;
        }
    }
    deck
}
