//! Atomic-flip frontier search.
//!
//! Where the DFS solver walks the game tree move by move, this strategy
//! walks it *flip by flip*. An atomic state is a normalized position (all
//! safe foundation moves already applied). From an atomic state we run a
//! small breadth-first search whose only goal is to find the shortest move
//! sequences that turn at least one face-down tableau card face-up,
//! directly or as a side effect of the safe auto-play that follows the
//! move. Each such sequence is a candidate; candidates are ranked, the
//! best is committed, and search continues from the resulting atomic
//! state. When a branch dies we backtrack across atomic frames, not
//! individual moves, optionally backjumping past ancestors whose
//! committed path is provably unrelated to the current obstruction.
//!
//! The per-frame flip search is capped in both steps and expansions, and
//! the cap relaxes with flip depth: late-game positions legitimately need
//! longer maneuvering sequences to expose the last few cards.

use std::collections::VecDeque;
use std::time::Instant;

use ahash::{AHashMap, AHashSet};
use log::{debug, trace};
use serde::Serialize;
use thiserror::Error;

use crate::card::Rank;
use crate::moves::{
    can_drop_on_foundation, greedy_finish, list_moves, normalize_safe_to_foundation, Move,
    MoveKind,
};
use crate::search::{CutoffReason, RankingStrategy, SolveOptions, SolveResult, SolveStats};
use crate::tableau::{DeckError, SearchState};
use crate::zobrist::fingerprint;

/// A move path from an atomic state to the next one, plus the metrics the
/// ranking strategies order by. The resulting state itself is not stored;
/// committing a candidate replays `path` from the frame snapshot, which is
/// deterministic.
#[derive(Clone, Debug, Serialize)]
pub struct Candidate {
    /// Full move sequence, including the trailing safe auto-play.
    pub path: Vec<Move>,
    /// Fingerprint of the normalized state the path leads to.
    pub result_fp: u64,
    /// Flip-search depth at which the sequence was found (moves before
    /// the auto-play tail).
    pub steps: usize,
    /// Stock pulls along the path.
    pub stock_uses: u32,
    /// Foundation-to-tableau returns along the path.
    pub foundation_returns: u32,
    /// The flipped column with the deepest face-down blockage.
    pub flipped_col: u8,
    /// Face-down cards that sat in `flipped_col` before the flip.
    pub covered: usize,
    /// Tableau columns the path touches, as a 7-bit mask.
    pub touched: u8,
    result_face_down: usize,
    result_foundation: u32,
    result_empty: usize,
    needed_score: i32,
}

/// Failure when replaying a candidate path against a snapshot.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("move {0} of the path is not legal in the reached state")]
    IllegalMove(usize),
}

/// One atomic frame plus its ranked candidates, for callers that want to
/// walk the recommendation one flip at a time instead of solving outright.
#[derive(Clone, Debug, Serialize)]
pub struct AtomicFrameView {
    /// The normalized root position.
    pub snapshot: SearchState,
    /// Ranked flip candidates; the first entry is the solver's pick.
    pub candidates: Vec<Candidate>,
}

// ----- Internal machinery -----

/// Which move kinds a staged flip-search pass may use. The trivial passes
/// run first so that risk-free flips (pure foundation traffic, then
/// foundation plus stock) are always among the candidates even when the
/// full pass finds something shorter.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Pass {
    FoundationOnly,
    StockAndFoundation,
    Full,
}

impl Pass {
    fn allows(self, kind: MoveKind) -> bool {
        match self {
            Pass::FoundationOnly => matches!(
                kind,
                MoveKind::TableauToFoundation { .. } | MoveKind::StockToFoundation { .. }
            ),
            Pass::StockAndFoundation => !matches!(kind, MoveKind::TableauToTableau { .. }),
            Pass::Full => true,
        }
    }
}

/// Per-invocation search context: budgets, node counter, and the bounded
/// candidate cache. Private to one solve call; nothing here is shared
/// across invocations, so concurrent solves cannot corrupt each other.
struct Ctx<'a> {
    opts: &'a SolveOptions,
    started: Instant,
    nodes: u64,
    cache: AHashMap<u64, CacheEntry>,
}

struct CacheEntry {
    candidates: Vec<Candidate>,
    /// Result fingerprints of candidates already committed from this
    /// position, in this or any earlier visit.
    tried: AHashSet<u64>,
}

impl<'a> Ctx<'a> {
    fn new(opts: &'a SolveOptions) -> Self {
        Ctx {
            opts,
            started: Instant::now(),
            nodes: 0,
            cache: AHashMap::new(),
        }
    }

    fn over_budget(&self) -> Option<CutoffReason> {
        if self.nodes >= self.opts.max_nodes {
            return Some(CutoffReason::Nodes);
        }
        if self.started.elapsed().as_millis() as u64 >= self.opts.max_time_ms {
            return Some(CutoffReason::Time);
        }
        None
    }

    /// Candidates for a position, memoized per fingerprint. The cache is
    /// cleared wholesale when it outgrows its bound; a cleared entry only
    /// costs recomputation.
    fn candidates_for(
        &mut self,
        state: &SearchState,
        fp: u64,
        flip_depth: usize,
    ) -> Result<Vec<Candidate>, CutoffReason> {
        if let Some(entry) = self.cache.get(&fp) {
            return Ok(entry.candidates.clone());
        }
        let cands = find_flip_candidates(self, state, flip_depth)?;
        if self.cache.len() >= self.opts.max_atomic_cache {
            debug!("atomic: candidate cache overflow, clearing");
            self.cache.clear();
        }
        self.cache.insert(
            fp,
            CacheEntry {
                candidates: cands.clone(),
                tried: AHashSet::new(),
            },
        );
        Ok(cands)
    }

    fn is_tried(&self, fp: u64, result_fp: u64) -> bool {
        self.cache
            .get(&fp)
            .is_some_and(|e| e.tried.contains(&result_fp))
    }

    fn mark_tried(&mut self, fp: u64, result_fp: u64) {
        if let Some(entry) = self.cache.get_mut(&fp) {
            entry.tried.insert(result_fp);
        }
    }
}

struct AtomicFrame {
    snapshot: SearchState,
    fp: u64,
    candidates: Vec<Candidate>,
    cursor: usize,
    /// The committed path that produced this frame from its parent (the
    /// root frame stores the initial normalization moves).
    path_from_parent: Vec<Move>,
    /// Column mask of `path_from_parent`, for the backjump test.
    touched_from_parent: u8,
}

/// The flip-search step cap for a frame at the given flip depth. Shallow
/// frames use the base cap; past `relax_at_depth` the cap grows linearly
/// up to the high ceiling.
fn approach_cap(flip_depth: usize, opts: &SolveOptions) -> usize {
    if flip_depth <= opts.relax_at_depth {
        opts.max_approach_steps
    } else {
        let extra = (flip_depth - opts.relax_at_depth) * opts.approach_steps_increment;
        (opts.max_approach_steps + extra).min(opts.max_approach_steps_high)
    }
}

/// Columns a move touches, as a 7-bit mask. Stock and foundation slots
/// are not columns and contribute nothing.
fn touched_mask(kind: MoveKind) -> u8 {
    match kind {
        MoveKind::TableauToFoundation { src } => 1 << src,
        MoveKind::TableauToTableau { src, dst, .. } => (1 << src) | (1 << dst),
        MoveKind::StockToFoundation { .. } => 0,
        MoveKind::StockToTableau { dst, .. } => 1 << dst,
        MoveKind::FoundationToTableau { dst, .. } => 1 << dst,
    }
}

/// True for tableau moves that would leave their source column empty
/// without flipping anything and without moving a King-led run. Filtered
/// out under `avoid_empty_unless_king`: an empty column is only worth
/// creating for a King, and a King-led full column has nowhere legal to
/// go anyway.
fn empties_for_no_king(state: &SearchState, mv: Move) -> bool {
    match mv.kind {
        MoveKind::TableauToTableau { src, start, .. } => {
            let col = &state.columns[src as usize];
            start == 0 && col.face_down == 0 && col.cards[0].rank() != Rank::King
        }
        _ => false,
    }
}

struct BfsNode {
    state: SearchState,
    path: Vec<Move>,
    stock_uses: u32,
    foundation_returns: u32,
    touched: u8,
}

/// Breadth-first flip search from an atomic snapshot: staged trivial
/// passes first, then the full pass, each collecting every first-hit flip
/// sequence at its own minimal depth. Candidates are deduplicated by
/// resulting fingerprint and ranked before returning.
fn find_flip_candidates(
    ctx: &mut Ctx,
    snapshot: &SearchState,
    flip_depth: usize,
) -> Result<Vec<Candidate>, CutoffReason> {
    let cap = approach_cap(flip_depth, ctx.opts);
    let mut found: Vec<Candidate> = Vec::new();
    let mut seen_results: AHashSet<u64> = AHashSet::new();

    for pass in [Pass::FoundationOnly, Pass::StockAndFoundation, Pass::Full] {
        bfs_pass(ctx, snapshot, pass, cap, &mut found, &mut seen_results)?;
    }

    rank_candidates(&mut found, ctx.opts);
    trace!(
        "atomic: {} candidates at flip depth {} (cap {})",
        found.len(),
        flip_depth,
        cap
    );
    Ok(found)
}

fn bfs_pass(
    ctx: &mut Ctx,
    root: &SearchState,
    pass: Pass,
    cap: usize,
    found: &mut Vec<Candidate>,
    seen_results: &mut AHashSet<u64>,
) -> Result<(), CutoffReason> {
    let mut visited: AHashSet<u64> = AHashSet::new();
    visited.insert(fingerprint(root));

    let mut queue: VecDeque<BfsNode> = VecDeque::new();
    queue.push_back(BfsNode {
        state: root.clone(),
        path: Vec::new(),
        stock_uses: 0,
        foundation_returns: 0,
        touched: 0,
    });

    let mut local_nodes: u64 = 0;
    let mut hit_depth: Option<usize> = None;

    while let Some(node) = queue.pop_front() {
        // Once flips were found, finish collecting that depth and stop.
        if let Some(d) = hit_depth {
            if node.path.len() + 1 > d {
                break;
            }
        }
        if node.path.len() >= cap {
            continue;
        }

        for mv in list_moves(&node.state) {
            if !pass.allows(mv.kind) {
                continue;
            }
            if ctx.opts.avoid_empty_unless_king && empties_for_no_king(&node.state, mv) {
                continue;
            }
            if let Some(cutoff) = ctx.over_budget() {
                return Err(cutoff);
            }
            if local_nodes >= ctx.opts.max_local_nodes {
                // Local cap: keep whatever this pass found so far.
                return Ok(());
            }

            let mut child = node.state.clone();
            let undo = mv.apply(&mut child);
            ctx.nodes += 1;
            local_nodes += 1;

            let mut path = node.path.clone();
            path.push(mv);
            let touched = node.touched | touched_mask(mv.kind);
            let stock_uses = node.stock_uses
                + matches!(
                    mv.kind,
                    MoveKind::StockToFoundation { .. } | MoveKind::StockToTableau { .. }
                ) as u32;
            let foundation_returns = node.foundation_returns
                + matches!(mv.kind, MoveKind::FoundationToTableau { .. }) as u32;
            let steps = node.path.len() + 1;

            // A flip may come from the move itself or from the safe
            // auto-play that follows it.
            let mut result = child.clone();
            let auto = normalize_safe_to_foundation(&mut result, true);
            ctx.nodes += auto.len() as u64;
            local_nodes += auto.len() as u64;

            if undo.flipped || result.face_down_total() < child.face_down_total() {
                path.extend(auto);
                let result_fp = fingerprint(&result);
                if seen_results.insert(result_fp) {
                    found.push(make_candidate(
                        root,
                        &result,
                        result_fp,
                        path,
                        steps,
                        stock_uses,
                        foundation_returns,
                        touched,
                        ctx.opts,
                    ));
                }
                hit_depth.get_or_insert(steps);
                continue;
            }

            if hit_depth.is_none() {
                let fp = fingerprint(&child);
                if visited.insert(fp) {
                    queue.push_back(BfsNode {
                        state: child,
                        path,
                        stock_uses,
                        foundation_returns,
                        touched,
                    });
                }
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn make_candidate(
    root: &SearchState,
    result: &SearchState,
    result_fp: u64,
    path: Vec<Move>,
    steps: usize,
    stock_uses: u32,
    foundation_returns: u32,
    touched: u8,
    opts: &SolveOptions,
) -> Candidate {
    // Which columns flipped, and which of them was the deepest blockage.
    let mut flipped_col = 0u8;
    let mut covered = 0usize;
    for (c, (before, after)) in root.columns.iter().zip(result.columns.iter()).enumerate() {
        if after.face_down < before.face_down && before.face_down >= covered {
            covered = before.face_down;
            flipped_col = c as u8;
        }
    }

    let needed_score = if opts.use_needed_ranks {
        needed_ranks_score(result, flipped_col)
    } else {
        0
    };

    Candidate {
        path,
        result_fp,
        steps,
        stock_uses,
        foundation_returns,
        flipped_col,
        covered,
        touched,
        result_face_down: result.face_down_total(),
        result_foundation: result.foundation_total(),
        result_empty: result.empty_columns(),
        needed_score,
    }
}

/// Score a state by how many of the still-blocked columns' immediate
/// needs are currently satisfiable: the frontier card can go up to its
/// foundation, onto an exposed card one rank above of opposite color, or
/// (for a frontier King) into an existing empty column.
fn needed_ranks_score(state: &SearchState, exclude: u8) -> i32 {
    let mut score = 0;
    for (c, col) in state.columns.iter().enumerate() {
        if c == exclude as usize || col.face_down == 0 || col.face_up_count() == 0 {
            continue;
        }
        let frontier = col.cards[col.face_down];

        if frontier.rank() == Rank::King {
            if state.empty_columns() > 0 {
                score += 1;
            }
            continue;
        }
        if can_drop_on_foundation(frontier, state.foundations[frontier.suit_index() as usize]) {
            score += 1;
            continue;
        }
        let receivable = state.columns.iter().enumerate().any(|(d, other)| {
            d != c
                && other.face_up_count() > 0
                && other.top().is_some_and(|top| {
                    top.rank_number() == frontier.rank_number() + 1
                        && top.opposite_color(frontier)
                })
        });
        if receivable {
            score += 1;
        }
    }
    score
}

/// Order candidates best-first under the selected strategy. Sorting is
/// stable, so BFS discovery order breaks any remaining ties and the whole
/// solver stays deterministic.
fn rank_candidates(cands: &mut [Candidate], opts: &SolveOptions) {
    match opts.ranking {
        RankingStrategy::LeastSteps => cands.sort_by(|a, b| {
            a.steps
                .cmp(&b.steps)
                .then(a.result_face_down.cmp(&b.result_face_down))
                .then(b.result_foundation.cmp(&a.result_foundation))
                .then(b.result_empty.cmp(&a.result_empty))
                .then(
                    (a.stock_uses + a.foundation_returns)
                        .cmp(&(b.stock_uses + b.foundation_returns)),
                )
        }),
        RankingStrategy::MostCovered => cands.sort_by(|a, b| {
            b.covered
                .cmp(&a.covered)
                .then(a.steps.cmp(&b.steps))
                .then(a.result_face_down.cmp(&b.result_face_down))
                .then(b.result_foundation.cmp(&a.result_foundation))
                .then(b.result_empty.cmp(&a.result_empty))
        }),
        RankingStrategy::Blended => cands.sort_by(|a, b| {
            b.covered
                .cmp(&a.covered)
                .then(b.needed_score.cmp(&a.needed_score))
                .then(a.steps.cmp(&b.steps))
                .then(
                    (a.stock_uses + a.foundation_returns)
                        .cmp(&(b.stock_uses + b.foundation_returns)),
                )
                .then(a.touched.count_ones().cmp(&b.touched.count_ones()))
        }),
    }
}

// ----- The frame-level state machine -----

/// Run the atomic-flip search from the given position.
pub fn solve(state: SearchState, opts: &SolveOptions) -> SolveResult {
    let mut ctx = Ctx::new(opts);
    let mut root = state;
    let root_moves = normalize_safe_to_foundation(&mut root, true);
    ctx.nodes += root_moves.len() as u64;

    let finish = |ctx: &Ctx,
                  solvable: bool,
                  line: Option<Vec<Move>>,
                  depth: usize,
                  cutoff: Option<CutoffReason>| {
        SolveResult {
            solvable,
            difficulty: None,
            winning_line: line,
            stats: SolveStats {
                nodes: ctx.nodes,
                depth,
                time_ms: ctx.started.elapsed().as_millis() as u64,
                cutoff_reason: cutoff,
            },
        }
    };

    if let Some(tail) = greedy_finish(&root) {
        let mut line = root_moves;
        line.extend(tail);
        return finish(&ctx, true, Some(line), 0, None);
    }
    if list_moves(&root).is_empty() {
        // Not finishable and no legal move at all: proven unsolvable,
        // independent of any search heuristic.
        return finish(&ctx, false, None, 0, None);
    }

    let root_fp = fingerprint(&root);
    let root_candidates = match ctx.candidates_for(&root, root_fp, 0) {
        Ok(c) => c,
        Err(cutoff) => return finish(&ctx, false, None, 0, Some(cutoff)),
    };

    let mut stack: Vec<AtomicFrame> = vec![AtomicFrame {
        snapshot: root,
        fp: root_fp,
        candidates: root_candidates,
        cursor: 0,
        path_from_parent: root_moves,
        touched_from_parent: 0,
    }];
    let mut max_flip_depth = 1usize;

    loop {
        if let Some(cutoff) = ctx.over_budget() {
            debug!("atomic: budget hit at flip depth {}", stack.len());
            return finish(&ctx, false, None, max_flip_depth, Some(cutoff));
        }

        let Some(frame) = stack.last_mut() else {
            // Every atomic frame ran out of candidates. Because of the
            // step caps and the backjump heuristic this is not a proof of
            // unsolvability, only of this strategy's exhaustion.
            debug!("atomic: frame stack exhausted after {} nodes", ctx.nodes);
            return finish(
                &ctx,
                false,
                None,
                max_flip_depth,
                Some(CutoffReason::Exhausted),
            );
        };

        // Pick the next candidate not already tried from this position.
        let mut picked: Option<Candidate> = None;
        while frame.cursor < frame.candidates.len() {
            let c = &frame.candidates[frame.cursor];
            frame.cursor += 1;
            if !ctx.is_tried(frame.fp, c.result_fp) {
                picked = Some(c.clone());
                break;
            }
        }

        let Some(candidate) = picked else {
            // Backtrack across atomic frames; optionally backjump past
            // ancestors whose committed path never touched any column
            // that is blocked in the dead-end position.
            let dead = stack.pop().expect("frame checked above");
            let blocked = dead.snapshot.blocked_mask();
            let mut child = dead;
            while opts.enable_backjump && !stack.is_empty() {
                if child.touched_from_parent & blocked != 0 {
                    break;
                }
                debug!(
                    "atomic: backjump past frame at flip depth {}",
                    stack.len()
                );
                child = stack.pop().expect("stack checked non-empty");
            }
            continue;
        };

        ctx.mark_tried(frame.fp, candidate.result_fp);

        // Commit: replay the path from the stored snapshot.
        let mut next = frame.snapshot.clone();
        for mv in &candidate.path {
            mv.apply(&mut next);
        }
        ctx.nodes += candidate.path.len() as u64;
        debug_assert_eq!(fingerprint(&next), candidate.result_fp);

        if let Some(tail) = greedy_finish(&next) {
            let mut line: Vec<Move> = Vec::new();
            for f in &stack {
                line.extend_from_slice(&f.path_from_parent);
            }
            line.extend_from_slice(&candidate.path);
            line.extend(tail);
            return finish(&ctx, true, Some(line), max_flip_depth, None);
        }

        let next_fp = candidate.result_fp;
        let flip_depth = stack.len();
        let next_candidates = match ctx.candidates_for(&next, next_fp, flip_depth) {
            Ok(c) => c,
            Err(cutoff) => return finish(&ctx, false, None, max_flip_depth, Some(cutoff)),
        };

        stack.push(AtomicFrame {
            snapshot: next,
            fp: next_fp,
            candidates: next_candidates,
            cursor: 0,
            path_from_parent: candidate.path.clone(),
            touched_from_parent: candidate.touched,
        });
        max_flip_depth = max_flip_depth.max(stack.len());
    }
}

// ----- Incremental stepping surface -----

/// Compute the root atomic frame for a deal: the normalized snapshot and
/// its ranked flip candidates. Lets a caller walk the recommendation one
/// atomic transition at a time instead of requesting a full solve; if a
/// budget runs out mid-search the view is returned with an empty
/// candidate list.
pub fn atomic_frame(deck_order: &[u8], opts: &SolveOptions) -> Result<AtomicFrameView, DeckError> {
    let mut snapshot = SearchState::deal_from_permutation(deck_order)?;
    normalize_safe_to_foundation(&mut snapshot, true);

    let mut ctx = Ctx::new(opts);
    let candidates = find_flip_candidates(&mut ctx, &snapshot, 0).unwrap_or_default();
    Ok(AtomicFrameView {
        snapshot,
        candidates,
    })
}

/// Replay a candidate path against a snapshot, validating each move
/// against the legal move set of the state it is applied to, and return
/// the re-normalized resulting snapshot.
pub fn apply_path(snapshot: &SearchState, path: &[Move]) -> Result<SearchState, PathError> {
    let mut state = snapshot.clone();
    for (i, mv) in path.iter().enumerate() {
        if !list_moves(&state).contains(mv) {
            return Err(PathError::IllegalMove(i));
        }
        mv.apply(&mut state);
    }
    normalize_safe_to_foundation(&mut state, true);
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical_decks::{easy_win_deck, unplayable_deck};
    use crate::card::{shuffled_deck_from_seed, Card, Suit};
    use crate::search::Strategy;
    use crate::tableau::Column;

    fn opts() -> SolveOptions {
        SolveOptions {
            strategy: Strategy::Atomic,
            ..SolveOptions::default()
        }
    }

    fn card(text: &str) -> Card {
        let bytes = text.as_bytes();
        let rank = match bytes[0] {
            b'A' => 0,
            b'T' => 9,
            b'J' => 10,
            b'Q' => 11,
            b'K' => 12,
            d => d - b'1',
        };
        let suit = match bytes[1] {
            b'C' => Suit::Clubs,
            b'D' => Suit::Diamonds,
            b'H' => Suit::Hearts,
            b'S' => Suit::Spades,
            _ => panic!("bad suit"),
        };
        Card(suit as u8 * 13 + rank)
    }

    fn empty_state() -> SearchState {
        SearchState {
            columns: Default::default(),
            stock: Vec::new(),
            foundations: [0; 4],
        }
    }

    fn column(face_down: &[&str], face_up: &[&str]) -> Column {
        let mut col = Column::new();
        col.cards.extend(face_down.iter().map(|s| card(s)));
        col.face_down = col.cards.len();
        col.cards.extend(face_up.iter().map(|s| card(s)));
        col
    }

    #[test]
    fn unplayable_deal_is_proven_unsolvable() {
        let order = unplayable_deck();
        let state = SearchState::deal_from_permutation(&order).unwrap();
        let result = solve(state, &opts());
        assert!(!result.solvable);
        assert_eq!(result.stats.nodes, 0);
        assert_eq!(result.stats.cutoff_reason, None);
    }

    #[test]
    fn easy_win_deal_solves() {
        let order = easy_win_deck();
        let state = SearchState::deal_from_permutation(&order).unwrap();
        let result = solve(state.clone(), &opts());
        assert!(result.solvable);

        let mut replay = state;
        for mv in result.winning_line.as_deref().unwrap() {
            mv.apply(&mut replay);
        }
        assert!(replay.is_won());
    }

    #[test]
    fn atomic_solver_is_deterministic() {
        let order = shuffled_deck_from_seed(4242);
        let run = || {
            let state = SearchState::deal_from_permutation(&order).unwrap();
            solve(
                state,
                &SolveOptions {
                    max_nodes: 30_000,
                    max_time_ms: 60_000,
                    ..opts()
                },
            )
        };
        let a = run();
        let b = run();
        assert_eq!(a.solvable, b.solvable);
        assert_eq!(a.stats.nodes, b.stats.nodes);
        assert_eq!(a.stats.cutoff_reason, b.stats.cutoff_reason);

        let frame_a = atomic_frame(&order, &opts()).unwrap();
        let frame_b = atomic_frame(&order, &opts()).unwrap();
        assert_eq!(
            frame_a.candidates.first().map(|c| c.path.clone()),
            frame_b.candidates.first().map(|c| c.path.clone())
        );
    }

    #[test]
    fn buried_king_is_preferred_over_emptying_a_column() {
        // Column 0 hides a King under its single face-down slot; exposing
        // it takes one move. A second flip would exist via first emptying
        // column 6, which the avoid-empty filter rejects.
        let mut state = empty_state();
        state.columns[0] = column(&["KS"], &["9H"]);
        state.columns[1] = column(&[], &["TS"]);
        state.columns[2] = column(&[], &["9S"]);
        state.columns[3] = column(&[], &["5S"]);
        state.columns[4] = column(&[], &["JS"]);
        state.columns[5] = column(&["7H"], &["KC"]);
        state.columns[6] = column(&[], &["4D"]);

        let o = opts();
        let mut ctx = Ctx::new(&o);
        let cands = find_flip_candidates(&mut ctx, &state, 0).unwrap();
        assert!(!cands.is_empty());
        assert_eq!(cands[0].flipped_col, 0, "must expose the buried King");
        for c in &cands {
            for (i, mv) in c.path.iter().enumerate() {
                // Replay prefix to check no move empties a column.
                let mut replay = state.clone();
                for prior in &c.path[..i] {
                    prior.apply(&mut replay);
                }
                assert!(!empties_for_no_king(&replay, *mv));
            }
        }
    }

    #[test]
    fn avoid_empty_filter_gates_emptying_paths() {
        // The only flip requires emptying column 6 first (4D onto 5S) so
        // the King in column 5 gains a landing spot. The remaining
        // columns hold inert black cards with no legal moves of their
        // own, so no column starts out empty.
        let mut state = empty_state();
        state.columns[0] = column(&[], &["9C"]);
        state.columns[1] = column(&[], &["TS"]);
        state.columns[2] = column(&[], &["JC"]);
        state.columns[3] = column(&[], &["5S"]);
        state.columns[4] = column(&[], &["8S"]);
        state.columns[5] = column(&["7H"], &["KC"]);
        state.columns[6] = column(&[], &["4D"]);

        let avoid = opts();
        let mut ctx = Ctx::new(&avoid);
        let cands = find_flip_candidates(&mut ctx, &state, 0).unwrap();
        assert!(cands.is_empty(), "emptying path must be filtered out");

        let allow = SolveOptions {
            avoid_empty_unless_king: false,
            ..opts()
        };
        let mut ctx = Ctx::new(&allow);
        let cands = find_flip_candidates(&mut ctx, &state, 0).unwrap();
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].flipped_col, 5);
        assert_eq!(cands[0].steps, 2);
    }

    #[test]
    fn dead_end_frames_unwind_with_and_without_backjump() {
        // Both hidden cards can be exposed (9H and 9D each have two
        // landing spots) but no ace exists, so every atomic frame dies
        // and the whole stack must unwind. Backjumping skips the root's
        // remaining candidates once a fully-exposed dead end is reached;
        // plain backtracking grinds through all of them. Either way the
        // search must terminate with a drained stack, not a budget hit.
        let mut state = empty_state();
        state.columns[0] = column(&["QS"], &["9H"]);
        state.columns[1] = column(&[], &["TS"]);
        state.columns[2] = column(&["8C"], &["9D"]);
        state.columns[3] = column(&[], &["TC"]);

        let with_jump = solve(state.clone(), &opts());
        assert!(!with_jump.solvable);
        assert_eq!(with_jump.winning_line, None);
        assert_eq!(with_jump.stats.cutoff_reason, Some(CutoffReason::Exhausted));

        let plain = solve(
            state,
            &SolveOptions {
                enable_backjump: false,
                ..opts()
            },
        );
        assert!(!plain.solvable);
        assert_eq!(plain.stats.cutoff_reason, Some(CutoffReason::Exhausted));
        // Both runs share the same deterministic prefix; the plain run
        // then commits the candidates the backjump skipped.
        assert!(plain.stats.nodes >= with_jump.stats.nodes);
    }

    #[test]
    fn tiny_candidate_cache_clears_and_stays_deterministic() {
        let order = shuffled_deck_from_seed(77);
        let o = SolveOptions {
            max_atomic_cache: 1,
            max_nodes: 20_000,
            max_time_ms: 60_000,
            ..opts()
        };
        let run = || solve(SearchState::deal_from_permutation(&order).unwrap(), &o);
        let a = run();
        let b = run();
        assert_eq!(a.solvable, b.solvable);
        assert_eq!(a.stats.nodes, b.stats.nodes);
        assert_eq!(a.stats.cutoff_reason, b.stats.cutoff_reason);
    }

    #[test]
    fn trivial_pass_candidates_survive_ranking() {
        // A flip reachable purely through safe foundation traffic must be
        // among the candidates even when a tableau shuffle also flips.
        let mut state = empty_state();
        state.columns[0] = column(&["KD"], &["AC"]);
        state.columns[1] = column(&["QH"], &["8C"]);
        state.columns[2] = column(&[], &["9D"]);

        let o = opts();
        let mut ctx = Ctx::new(&o);
        let cands = find_flip_candidates(&mut ctx, &state, 0).unwrap();
        let flipped: Vec<u8> = cands.iter().map(|c| c.flipped_col).collect();
        assert!(flipped.contains(&0), "foundation-only flip missing");
        assert!(flipped.contains(&1), "tableau flip missing");
    }

    #[test]
    fn approach_cap_relaxes_with_depth() {
        let o = opts();
        assert_eq!(approach_cap(0, &o), o.max_approach_steps);
        assert_eq!(approach_cap(o.relax_at_depth, &o), o.max_approach_steps);
        assert_eq!(
            approach_cap(o.relax_at_depth + 1, &o),
            o.max_approach_steps + o.approach_steps_increment
        );
        assert_eq!(approach_cap(1_000, &o), o.max_approach_steps_high);
    }

    #[test]
    fn apply_path_validates_moves() {
        let order = shuffled_deck_from_seed(10);
        let frame = atomic_frame(&order, &opts()).unwrap();
        if let Some(best) = frame.candidates.first() {
            let next = apply_path(&frame.snapshot, &best.path).unwrap();
            assert_eq!(fingerprint(&next), best.result_fp);
        }

        // A nonsense move must be rejected, not applied.
        let bogus = Move::new(MoveKind::TableauToFoundation { src: 0 });
        let mut doomed = empty_state();
        doomed.columns[0] = column(&[], &["9H"]);
        assert_eq!(
            apply_path(&doomed, &[bogus]),
            Err(PathError::IllegalMove(0))
        );
    }

    #[test]
    fn ranking_strategies_stay_deterministic() {
        let order = shuffled_deck_from_seed(303);
        for ranking in [
            RankingStrategy::LeastSteps,
            RankingStrategy::MostCovered,
            RankingStrategy::Blended,
        ] {
            let o = SolveOptions {
                ranking,
                ..opts()
            };
            let a = atomic_frame(&order, &o).unwrap();
            let b = atomic_frame(&order, &o).unwrap();
            let paths_a: Vec<_> = a.candidates.iter().map(|c| c.path.clone()).collect();
            let paths_b: Vec<_> = b.candidates.iter().map(|c| c.path.clone()).collect();
            assert_eq!(paths_a, paths_b);
        }
    }
}
