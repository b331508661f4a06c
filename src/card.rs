//! Card, Suit, and Rank types for a standard 52-card deck.
//!
//! - `Card` is a compact 1-byte representation (0..=51).
//! - `Suit` and `Rank` give human-readable structure on top of that.
//!
//! The index mapping is suit-major, rank-ascending:
//! ```text
//! index = suit as u8 * 13 + rank as u8
//! ```
//! with suits ordered Clubs, Diamonds, Hearts, Spades and ranks Ace..King.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;

/// A playing card represented compactly as an index in 0..=51.
///
/// Two cards are equal exactly when they have the same suit and rank;
/// there is no per-instance identity beyond that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Card(pub u8);

/// The four suits, in canonical deck order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

/// The thirteen ranks. Ace is lowest (discriminant 0); use
/// `Card::rank_number()` for the 1..=13 convention the foundations use.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King, // 12
}

impl Card {
    /// Create a new card from a suit and rank.
    #[inline]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card(suit as u8 * NUM_RANKS + rank as u8)
    }

    /// Create a card from a raw index in 0..=51.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `index >= 52`.
    #[inline]
    pub fn from_index(index: u8) -> Self {
        debug_assert!(index < CARDS_PER_DECK);
        Card(index)
    }

    /// Return the raw 0..=51 index of this card.
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Return the suit of this card.
    #[inline]
    pub fn suit(self) -> Suit {
        Suit::from_u8(self.0 / NUM_RANKS)
    }

    /// 0-based suit index (0..=3).
    #[inline]
    pub fn suit_index(self) -> u8 {
        self.0 / NUM_RANKS
    }

    /// Return the rank of this card.
    #[inline]
    pub fn rank(self) -> Rank {
        Rank::from_u8(self.0 % NUM_RANKS)
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn rank_number(self) -> u8 {
        self.0 % NUM_RANKS + 1
    }

    /// True for hearts and diamonds.
    #[inline]
    pub fn is_red(self) -> bool {
        matches!(self.suit(), Suit::Hearts | Suit::Diamonds)
    }

    /// True if the two cards have opposite colors.
    #[inline]
    pub fn opposite_color(self, other: Card) -> bool {
        self.is_red() != other.is_red()
    }

    /// Short string like "AH", "7C", "TD", "KS".
    pub fn short_str(self) -> String {
        const RANK_CHARS: [char; NUM_RANKS as usize] = [
            'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
        ];
        let r = RANK_CHARS[(self.0 % NUM_RANKS) as usize];
        let s = self.suit().short_char();
        format!("{r}{s}")
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_str())
    }
}

impl Suit {
    /// All suits in canonical deck order.
    pub const ALL: [Suit; NUM_SUITS as usize] = [
        Suit::Clubs,
        Suit::Diamonds,
        Suit::Hearts,
        Suit::Spades,
    ];

    /// Construct a suit from a small integer 0..=3.
    ///
    /// # Panics
    ///
    /// Panics if `v >= 4`.
    #[inline]
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            3 => Suit::Spades,
            _ => panic!("invalid suit: {v}"),
        }
    }

    /// Single-character representation: 'C', 'D', 'H', or 'S'.
    #[inline]
    pub fn short_char(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }

    /// True for hearts and diamonds.
    #[inline]
    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

impl Rank {
    /// All ranks in ascending order (Ace..King).
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Construct a rank from a small integer 0..=12.
    ///
    /// # Panics
    ///
    /// Panics if `v >= 13`.
    #[inline]
    pub fn from_u8(v: u8) -> Self {
        debug_assert!(v < NUM_RANKS, "invalid rank: {v}");
        Rank::ALL[v as usize]
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}

/// Generate the canonical 52-card deck: suit-major, rank-ascending.
pub fn standard_deck() -> [Card; CARDS_PER_DECK as usize] {
    let mut cards = [Card(0); CARDS_PER_DECK as usize];
    for (i, card) in cards.iter_mut().enumerate() {
        *card = Card(i as u8);
    }
    cards
}

/// Return a deterministically shuffled permutation of [0..52) given a
/// 32-bit seed.
///
/// This uses a simple LCG-driven Fisher-Yates shuffle so that the solver
/// and its tests can generate "random-looking" decks without pulling in
/// external RNG crates, and with full reproducibility across runs.
pub fn shuffled_deck_from_seed(seed: u32) -> [u8; CARDS_PER_DECK as usize] {
    let mut order = [0u8; CARDS_PER_DECK as usize];
    for (i, v) in order.iter_mut().enumerate() {
        *v = i as u8;
    }

    let mut state = seed;
    let mut lcg = move || {
        // Constants from Numerical Recipes; not cryptographic, just stable.
        state = state.wrapping_mul(1664525).wrapping_add(1013904223);
        state
    };

    let len = order.len();
    for i in (1..len).rev() {
        let r = (lcg() as usize) % (i + 1);
        order.swap(i, r);
    }

    order
}
