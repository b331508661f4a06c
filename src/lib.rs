//! Budgeted solvability search for Klondike (draw-1, unlimited recycle).
//!
//! The crate answers one question about a dealt position: can it be won,
//! within explicit node and wall-clock budgets? Two strategies share the
//! same legality kernel: an exhaustive DFS that can prove unsolvability
//! when it drains the reachable space, and an atomic-flip frontier search
//! that treats face-down flips as the unit of progress and scales to
//! deals the DFS cannot finish.
//!
//! The solver plays a slightly abstracted game: there is no waste pile,
//! and the stock is an unordered reserve any card of which may be pulled
//! directly. Under draw-1 rules with unlimited recycling every stock card
//! is reachable at any time, so the abstraction preserves solvability
//! while collapsing the bookkeeping states that only shuffle the waste.

pub mod atomic;
pub mod canonical_decks;
pub mod card;
pub mod decks;
pub mod dfs;
pub mod display;
pub mod moves;
pub mod search;
pub mod stats;
pub mod tableau;
pub mod zobrist;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use serde::Serialize;

use crate::decks::DeckSpec;
use crate::search::{RankingStrategy, SolveOptions, SolveResult, Strategy};
use crate::stats::BatchStats;

/// Decide whether Klondike deals are winnable, within explicit budgets.
#[derive(Parser, Debug)]
#[command(name = "klondike_oracle", version, about)]
struct Cli {
    /// Seed for a deterministic shuffled deal.
    #[arg(long, default_value_t = 1)]
    seed: u32,

    /// Solve this many consecutive seeds starting at --seed.
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// Explicit deal as a bracketed list of card indices, e.g. "[0, 1, ...]".
    #[arg(long)]
    deck: Option<String>,

    /// File containing one or more bracketed deck lists.
    #[arg(long)]
    deck_file: Option<PathBuf>,

    /// File containing one shuffle seed per line ('#' starts a comment).
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Search strategy.
    #[arg(long, value_enum, default_value = "atomic")]
    strategy: Strategy,

    /// Candidate ranking for the atomic strategy.
    #[arg(long, value_enum, default_value = "blended")]
    ranking: RankingStrategy,

    /// Node budget (move applications) per deal.
    #[arg(long, default_value_t = 200_000)]
    max_nodes: u64,

    /// Wall-clock budget per deal, in milliseconds.
    #[arg(long, default_value_t = 5_000)]
    max_time_ms: u64,

    /// Keep candidate paths that empty a column for no King.
    #[arg(long)]
    allow_empty: bool,

    /// Disable backjumping across unrelated atomic frames.
    #[arg(long)]
    no_backjump: bool,

    /// Emit one JSON object per deal instead of text.
    #[arg(long)]
    json: bool,

    /// Print the winning line when one is found.
    #[arg(long)]
    show_line: bool,

    /// Render the dealt position before solving it.
    #[arg(long)]
    show_state: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    label: &'a str,
    #[serde(flatten)]
    result: &'a SolveResult,
}

fn gather_decks(cli: &Cli) -> anyhow::Result<Vec<DeckSpec>> {
    let mut specs: Vec<DeckSpec> = Vec::new();

    if let Some(list) = &cli.deck {
        let deck = decks::parse_bracketed_deck_list(list).context("invalid --deck list")?;
        specs.push(DeckSpec {
            label: "cli".to_string(),
            deck,
        });
    }
    if let Some(path) = &cli.deck_file {
        let found = decks::load_decks_from_file(path)?;
        if found.is_empty() {
            bail!("no deck lists found in '{}'", path.display());
        }
        specs.extend(found);
    }
    if let Some(path) = &cli.seed_file {
        specs.extend(decks::load_seeds_from_file(path)?);
    }

    // Seeded deals are the fallback when nothing explicit was given.
    if specs.is_empty() {
        for seed in cli.seed..cli.seed.saturating_add(cli.count) {
            specs.push(decks::deck_from_seed(seed));
        }
    }
    Ok(specs)
}

fn report_text(spec: &DeckSpec, result: &SolveResult, cli: &Cli) {
    let verdict = if result.solvable {
        "solvable"
    } else if result.stats.cutoff_reason.is_none() {
        "unsolvable"
    } else {
        "undetermined"
    };
    print!(
        "{}: {} (nodes {}, depth {}, {} ms",
        spec.label, verdict, result.stats.nodes, result.stats.depth, result.stats.time_ms
    );
    if let Some(d) = result.difficulty {
        print!(", difficulty {:?}", d);
    }
    if let Some(c) = result.stats.cutoff_reason {
        print!(", cutoff {:?}", c);
    }
    println!(")");

    if cli.show_line {
        if let Some(line) = &result.winning_line {
            // Winning lines start from the dealt position.
            if let Ok(state) = tableau::SearchState::deal_from_permutation(&spec.deck) {
                print!("{}", display::describe_line(&state, line));
            }
        }
    }
}

/// Entry point for the `klondike_oracle` binary.
pub fn run() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let opts = SolveOptions {
        strategy: cli.strategy,
        ranking: cli.ranking,
        max_nodes: cli.max_nodes,
        max_time_ms: cli.max_time_ms,
        avoid_empty_unless_king: !cli.allow_empty,
        enable_backjump: !cli.no_backjump,
        ..SolveOptions::default()
    };

    let specs = gather_decks(&cli)?;
    info!(
        "solving {} deal(s) with strategy {:?}",
        specs.len(),
        cli.strategy
    );

    let mut batch = BatchStats::default();
    for spec in &specs {
        if cli.show_state {
            let state = tableau::SearchState::deal_from_permutation(&spec.deck)
                .with_context(|| format!("deal '{}' is malformed", spec.label))?;
            println!("{}", display::render_state(&state));
        }

        let result = search::solve(&spec.deck, &opts)
            .with_context(|| format!("deal '{}' is malformed", spec.label))?;

        if cli.json {
            let report = Report {
                label: &spec.label,
                result: &result,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            report_text(spec, &result, &cli);
        }
        batch.record(&result);
    }

    if specs.len() > 1 && !cli.json {
        println!(
            "batch: {} deals, {} solvable, {} unsolvable, {} undetermined ({:.1}% solvable, {} nodes, {} ms)",
            batch.deals,
            batch.solvable,
            batch.unsolvable,
            batch.undetermined,
            batch.solvable_rate() * 100.0,
            batch.total_nodes,
            batch.total_time_ms
        );
    }
    Ok(())
}
