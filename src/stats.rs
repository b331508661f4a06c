//! Aggregate counters for batch solving runs.

use serde::Serialize;

use crate::search::SolveResult;

#[derive(Default, Debug, Serialize)]
pub struct BatchStats {
    pub deals: u64,
    pub solvable: u64,
    pub unsolvable: u64,
    /// Budget ran out before an answer either way.
    pub undetermined: u64,
    pub total_nodes: u64,
    pub total_time_ms: u64,
}

impl BatchStats {
    pub fn record(&mut self, result: &SolveResult) {
        self.deals += 1;
        if result.solvable {
            self.solvable += 1;
        } else if result.stats.cutoff_reason.is_none() {
            self.unsolvable += 1;
        } else {
            self.undetermined += 1;
        }
        self.total_nodes += result.stats.nodes;
        self.total_time_ms += result.stats.time_ms;
    }

    pub fn solvable_rate(&self) -> f64 {
        if self.deals == 0 {
            0.0
        } else {
            self.solvable as f64 / self.deals as f64
        }
    }
}
