//! Public solving surface: options, result types, and strategy dispatch.
//!
//! `solve` is the one call external code needs: give it a 52-element deck
//! permutation and a `SolveOptions`, get back a `SolveResult`. The two
//! strategies behind it (`dfs`, `atomic`) are qualitatively different
//! searches sharing the same legality kernel; both are bounded by the same
//! node and wall-clock budgets so a call always returns.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::atomic;
use crate::dfs;
use crate::moves::Move;
use crate::tableau::{DeckError, SearchState};

/// Which search strategy to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Exhaustive depth-first backtracking with transposition pruning.
    Dfs,
    /// Flip-by-flip frontier search over atomic states.
    Atomic,
}

/// How the atomic solver re-ranks flip candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum RankingStrategy {
    /// Fewest moves to the flip, then most overall progress.
    LeastSteps,
    /// Attack the column with the deepest face-down blockage first.
    MostCovered,
    /// Most-covered primary key plus the needed-ranks weighting.
    Blended,
}

/// All solver knobs, with defaults matching the call contract. The
/// `max_*`/`relax_*` fields past `max_time_ms` only affect the atomic
/// strategy.
#[derive(Clone, Debug)]
pub struct SolveOptions {
    pub strategy: Strategy,
    /// Hard cap on move applications across the whole solve.
    pub max_nodes: u64,
    /// Wall-clock deadline in milliseconds.
    pub max_time_ms: u64,
    /// Cap on move applications within one per-frame flip search.
    pub max_local_nodes: u64,
    /// Step cap for a flip-approach sequence at shallow depths.
    pub max_approach_steps: usize,
    /// Ceiling the step cap may relax to late in the game.
    pub max_approach_steps_high: usize,
    /// Flip depth past which the step cap starts relaxing.
    pub relax_at_depth: usize,
    /// How much the step cap grows per flip past `relax_at_depth`.
    pub approach_steps_increment: usize,
    /// Filter candidate paths that empty a column for no King.
    pub avoid_empty_unless_king: bool,
    /// Allow skipping ancestor frames unrelated to the current dead end.
    pub enable_backjump: bool,
    pub ranking: RankingStrategy,
    /// Weight `Blended` ranking by how many blocked columns' immediate
    /// needs the resulting state can satisfy.
    pub use_needed_ranks: bool,
    /// Entry bound on the per-fingerprint candidate cache; the cache is
    /// cleared wholesale when it grows past this.
    pub max_atomic_cache: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            strategy: Strategy::Dfs,
            max_nodes: 200_000,
            max_time_ms: 5_000,
            max_local_nodes: 20_000,
            max_approach_steps: 24,
            max_approach_steps_high: 96,
            relax_at_depth: 16,
            approach_steps_increment: 8,
            avoid_empty_unless_king: true,
            enable_backjump: true,
            ranking: RankingStrategy::Blended,
            use_needed_ranks: true,
            max_atomic_cache: 50_000,
        }
    }
}

/// Why a search stopped short of an answer.
///
/// `None` in `SolveStats::cutoff_reason` together with `solvable: false`
/// means the reachable space was exhausted, a proof of unsolvability.
/// `Nodes`/`Time` mean "unknown, budget ran out"; `Exhausted` means the
/// atomic solver ran out of candidates, which its heuristics (backjump,
/// step caps) keep from being a proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutoffReason {
    Time,
    Nodes,
    Exhausted,
}

/// Coarse difficulty classification derived purely from node count.
///
/// This is a solver-budget-dependent proxy for human difficulty, not a
/// calibrated metric; it is only attached to solvable results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Trivial,
    Easy,
    Moderate,
    Challenging,
    Hard,
    Brutal,
}

impl Difficulty {
    pub fn from_nodes(nodes: u64) -> Self {
        match nodes {
            0..=99 => Difficulty::Trivial,
            100..=999 => Difficulty::Easy,
            1_000..=9_999 => Difficulty::Moderate,
            10_000..=49_999 => Difficulty::Challenging,
            50_000..=199_999 => Difficulty::Hard,
            _ => Difficulty::Brutal,
        }
    }
}

/// Counters reported by every solve call, win or not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Move applications performed.
    pub nodes: u64,
    /// Deepest move depth (DFS) or flip depth (atomic) reached.
    pub depth: usize,
    /// Wall-clock time spent.
    pub time_ms: u64,
    pub cutoff_reason: Option<CutoffReason>,
}

/// Outcome of a solve call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Whether a winning line was found. `false` with a `Nodes`/`Time`
    /// cutoff means undetermined, not proven unsolvable.
    pub solvable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Full move sequence from the dealt position to a won position,
    /// when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_line: Option<Vec<Move>>,
    pub stats: SolveStats,
}

/// Solve a deal given as a 52-element permutation of card indices.
///
/// Malformed input fails fast with a `DeckError`; search inconclusiveness
/// is not an error but a result value (see `CutoffReason`).
pub fn solve(deck_order: &[u8], opts: &SolveOptions) -> Result<SolveResult, DeckError> {
    let state = SearchState::deal_from_permutation(deck_order)?;
    Ok(solve_state(state, opts))
}

/// Solve from an already-constructed state. Used by `solve` and by tests
/// that build synthetic positions.
pub fn solve_state(state: SearchState, opts: &SolveOptions) -> SolveResult {
    let mut result = match opts.strategy {
        Strategy::Dfs => dfs::solve(state, opts),
        Strategy::Atomic => atomic::solve(state, opts),
    };
    if result.solvable {
        result.difficulty = Some(Difficulty::from_nodes(result.stats.nodes));
    }
    result
}
