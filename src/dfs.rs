//! Exhaustive depth-first search over the move graph.
//!
//! The search keeps a single live `SearchState` and mutates it in place:
//! each frame on the explicit stack remembers the ordered move list for
//! its position, a cursor into it, and the inverse record for the move
//! that produced the frame. Backtracking undoes that move. Recursion is
//! never used; winning lines routinely run hundreds of plies deep.
//!
//! Transposition pruning keys on the structural fingerprint: a position
//! already reached at an equal or shallower depth is a dead branch. The
//! depth condition matters because a shallower revisit may still lead to
//! lines the deeper first visit would have cut on the depth budget.

use std::time::Instant;

use ahash::AHashMap;
use log::{debug, trace};

use crate::moves::{greedy_finish, list_moves, Move, MoveList, Undo};
use crate::search::{CutoffReason, SolveOptions, SolveResult, SolveStats};
use crate::tableau::SearchState;
use crate::zobrist::fingerprint;

struct Frame {
    moves: MoveList,
    cursor: usize,
    /// The move (and its inverse record) that led into this frame.
    /// `None` only for the root frame.
    produced_by: Option<(Move, Undo)>,
}

/// Run the exhaustive DFS from the given position.
pub fn solve(mut state: SearchState, opts: &SolveOptions) -> SolveResult {
    let started = Instant::now();
    let mut nodes: u64 = 0;
    let mut max_depth: usize = 0;

    let finish = |solvable: bool,
                  line: Option<Vec<Move>>,
                  nodes: u64,
                  depth: usize,
                  cutoff: Option<CutoffReason>| {
        SolveResult {
            solvable,
            difficulty: None,
            winning_line: line,
            stats: SolveStats {
                nodes,
                depth,
                time_ms: started.elapsed().as_millis() as u64,
                cutoff_reason: cutoff,
            },
        }
    };

    // Greedy shortcut at the root: an already-finishable position (which
    // includes an already-won one) needs no search at all.
    if let Some(tail) = greedy_finish(&state) {
        return finish(true, Some(tail), 0, 0, None);
    }

    let root_moves = list_moves(&state);
    if root_moves.is_empty() {
        // Zero legal moves and not finishable: proven unsolvable.
        return finish(false, None, 0, 0, None);
    }

    let mut best_depth: AHashMap<u64, usize> = AHashMap::new();
    best_depth.insert(fingerprint(&state), 0);

    let mut stack: Vec<Frame> = vec![Frame {
        moves: root_moves,
        cursor: 0,
        produced_by: None,
    }];
    let mut line: Vec<Move> = Vec::new();

    loop {
        // Budgets are checked before every step so the search degrades
        // gracefully instead of hanging.
        if nodes >= opts.max_nodes {
            debug!("dfs: node budget hit at depth {}", line.len());
            return finish(false, None, nodes, max_depth, Some(CutoffReason::Nodes));
        }
        if started.elapsed().as_millis() as u64 >= opts.max_time_ms {
            debug!("dfs: time budget hit at depth {}", line.len());
            return finish(false, None, nodes, max_depth, Some(CutoffReason::Time));
        }

        let Some(frame) = stack.last_mut() else {
            // The whole reachable space is explored: proven unsolvable.
            debug!("dfs: search space exhausted after {} nodes", nodes);
            return finish(false, None, nodes, max_depth, None);
        };

        if frame.cursor >= frame.moves.len() {
            let frame = stack.pop().expect("frame checked above");
            if let Some((mv, undo)) = frame.produced_by {
                mv.undo(&mut state, &undo);
                line.pop();
            }
            continue;
        }

        let mv = frame.moves[frame.cursor];
        frame.cursor += 1;

        let undo = mv.apply(&mut state);
        nodes += 1;
        line.push(mv);
        max_depth = max_depth.max(line.len());
        trace!("dfs: node {} depth {} {:?}", nodes, line.len(), mv.kind);

        if state.is_won() {
            return finish(true, Some(line), nodes, max_depth, None);
        }
        if state.all_face_up() {
            if let Some(tail) = greedy_finish(&state) {
                line.extend(tail);
                return finish(true, Some(line), nodes, max_depth, None);
            }
        }

        let fp = fingerprint(&state);
        let depth = line.len();
        if let Some(&seen) = best_depth.get(&fp) {
            if seen <= depth {
                mv.undo(&mut state, &undo);
                line.pop();
                continue;
            }
        }
        best_depth.insert(fp, depth);

        let moves = list_moves(&state);
        if moves.is_empty() {
            mv.undo(&mut state, &undo);
            line.pop();
            continue;
        }

        stack.push(Frame {
            moves,
            cursor: 0,
            produced_by: Some((mv, undo)),
        });
    }
}
