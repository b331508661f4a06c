//! Deck ingestion: bracketed index lists and seed files.
//!
//! Deals reach the solver from two directions: explicit permutations
//! dumped by other tools as bracketed integer lists like `[51, 32, 3, ...]`
//! (each integer a `Card::index()`), and 32-bit shuffle seeds. This module
//! is the one canonical parsing path for both, whether the input arrives
//! as a CLI flag or as a text file holding several deals.

use std::fs;
use std::path::Path;

use anyhow::Context;
use thiserror::Error;

use crate::card::{shuffled_deck_from_seed, CARDS_PER_DECK};
use crate::tableau::DeckError;

const DECK_LEN: usize = CARDS_PER_DECK as usize;

/// A deal plus the label it is reported under (seed, file name, ...).
#[derive(Clone, Debug)]
pub struct DeckSpec {
    pub label: String,
    /// The exact deck permutation in dealing order.
    pub deck: [u8; DECK_LEN],
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing '[' or ']' around the deck list")]
    MissingBrackets,
    #[error("could not parse {0:?} as a card index")]
    BadNumber(String),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Parse a single bracketed integer list (e.g. "[1, 2, 3]") into a deck.
///
/// The list must contain exactly 52 integers, each in 0..=51, with no
/// duplicates.
pub fn parse_bracketed_deck_list(s: &str) -> Result<[u8; DECK_LEN], ParseError> {
    let open = s.find('[').ok_or(ParseError::MissingBrackets)?;
    let close = s.rfind(']').ok_or(ParseError::MissingBrackets)?;
    if close <= open {
        return Err(ParseError::MissingBrackets);
    }

    let inner = &s[open + 1..close];
    let mut nums: Vec<u8> = Vec::with_capacity(DECK_LEN);
    for part in inner.split(',') {
        let t = part.trim();
        if t.is_empty() {
            continue;
        }
        let v: u8 = t
            .parse()
            .map_err(|_| ParseError::BadNumber(t.to_string()))?;
        nums.push(v);
    }

    if nums.len() != DECK_LEN {
        return Err(DeckError::WrongLength(nums.len()).into());
    }
    let mut seen = [false; DECK_LEN];
    let mut deck = [0u8; DECK_LEN];
    for (i, &v) in nums.iter().enumerate() {
        if v as usize >= DECK_LEN {
            return Err(DeckError::OutOfRange(v).into());
        }
        if seen[v as usize] {
            return Err(DeckError::Duplicate(v).into());
        }
        seen[v as usize] = true;
        deck[i] = v;
    }
    Ok(deck)
}

fn is_deck_chars_only(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii_digit() || c == ',' || c.is_ascii_whitespace() || c == '[' || c == ']'
    })
}

/// Look back through nearby text for a "seed NNN" / "game NNN" style label.
fn sniff_label_near(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let mut best_pos: Option<usize> = None;
    for key in ["game", "seed", "deal"] {
        if let Some(p) = lower.rfind(key) {
            best_pos = Some(best_pos.map_or(p, |bp| bp.max(p)));
        }
    }
    let tail = &text[best_pos?..];

    let start = tail.find(|c: char| c.is_ascii_digit())?;
    let digits: String = tail[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Extract every bracketed deck list from arbitrary text.
///
/// Accepts the full stdout of a deal-dumping tool, descriptive lines
/// included, as well as "just the list" files. Bracketed runs that do not
/// parse as a valid 52-card permutation are skipped silently.
pub fn extract_decks_from_text(text: &str, default_label: &str) -> Vec<DeckSpec> {
    let bytes = text.as_bytes();
    let mut out: Vec<DeckSpec> = Vec::new();
    let mut deck_index = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j] != b']' {
            j += 1;
        }
        if j >= bytes.len() {
            break;
        }

        let candidate = &text[i..=j];
        if is_deck_chars_only(candidate) {
            if let Ok(deck) = parse_bracketed_deck_list(candidate) {
                let lookback = &text[i.saturating_sub(256)..i];
                let label = sniff_label_near(lookback).unwrap_or_else(|| {
                    deck_index += 1;
                    format!("{}#{}", default_label, deck_index)
                });
                out.push(DeckSpec { label, deck });
            }
        }
        i = j + 1;
    }

    out
}

/// Load decks from a text file containing one or more dumped deals.
pub fn load_decks_from_file(path: &Path) -> anyhow::Result<Vec<DeckSpec>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read deck file '{}'", path.display()))?;
    let default_label = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "deck_file".to_string());
    Ok(extract_decks_from_text(&text, &default_label))
}

/// Deterministic deal from a 32-bit shuffle seed.
pub fn deck_from_seed(seed: u32) -> DeckSpec {
    DeckSpec {
        label: format!("seed:{}", seed),
        deck: shuffled_deck_from_seed(seed),
    }
}

/// Load one seed per line from a file and generate decks for each.
///
/// Blank lines are ignored; `#` starts a comment, whole-line or trailing.
pub fn load_seeds_from_file(path: &Path) -> anyhow::Result<Vec<DeckSpec>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read seed file '{}'", path.display()))?;

    let mut out: Vec<DeckSpec> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let mut s = line;
        if let Some(p) = s.find('#') {
            s = &s[..p];
        }
        let s = s.trim();
        if s.is_empty() {
            continue;
        }
        let seed: u32 = s.parse().with_context(|| {
            format!(
                "could not parse seed on line {} of '{}' (line was {:?})",
                lineno + 1,
                path.display(),
                line
            )
        })?;
        out.push(deck_from_seed(seed));
    }
    Ok(out)
}
