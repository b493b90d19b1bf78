//Mcsplit
//Copyright (C) 2024-2025 The mcsplit developers
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Mutable run state threaded through every call of the search. It is owned by the caller for
/// the duration of one solver invocation and collects the branching counters, the bookkeeping
/// of the best solution found so far and the shared cancellation flag.
///
/// Cancellation is cooperative: the flag is stored by a timer thread or by the solver itself
/// when its node limit is exceeded, and polled at the entry of every recursive call. A
/// cancelled run is not an error; `is_cancelled` distinguishes it from an exhausted one.
pub struct SearchStats {
    /// Number of recursive calls
    nodes: u64,
    /// Number of branches pruned by the bound
    cut_branches: u64,
    /// Number of positive-gain reward updates
    conflicts: u64,
    /// Value of the node counter when the incumbent was last improved
    best_nodes: u64,
    /// Value of the cut-branch counter, plus one, when the incumbent was last improved
    best_count: u64,
    /// Time at which the incumbent was last improved
    best_find: Duration,
    start: Instant,
    abort: Arc<AtomicBool>,
    cancelled: bool,
}

impl SearchStats {

    pub fn new() -> Self {
        Self {
            nodes: 0,
            cut_branches: 0,
            conflicts: 0,
            best_nodes: 0,
            best_count: 0,
            best_find: Duration::ZERO,
            start: Instant::now(),
            abort: Arc::new(AtomicBool::new(false)),
            cancelled: false,
        }
    }

    pub fn node(&mut self) {
        self.nodes += 1;
    }

    pub fn cut_branch(&mut self) {
        self.cut_branches += 1;
    }

    pub fn conflict(&mut self) {
        self.conflicts += 1;
    }

    /// Records that the incumbent was improved at the current point of the search
    pub fn improvement(&mut self) {
        self.best_count = self.cut_branches + 1;
        self.best_nodes = self.nodes;
        self.best_find = self.start.elapsed();
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn cut_branches(&self) -> u64 {
        self.cut_branches
    }

    pub fn conflicts(&self) -> u64 {
        self.conflicts
    }

    pub fn best_nodes(&self) -> u64 {
        self.best_nodes
    }

    pub fn best_count(&self) -> u64 {
        self.best_count
    }

    pub fn best_find(&self) -> Duration {
        self.best_find
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The shared cancellation flag, to be handed to a timer thread
    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    pub fn request_abort(&mut self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    /// Marks the run as cancelled instead of exhausted. Called by the solver when it observes
    /// the abort flag.
    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Nodes:                      {}", self.nodes)?;
        writeln!(f, "Cut branches:               {}", self.cut_branches)?;
        writeln!(f, "Conflicts:                  {}", self.conflicts)?;
        writeln!(f, "Best nodes:                 {}", self.best_nodes)?;
        writeln!(f, "Best count:                 {}", self.best_count)?;
        writeln!(f, "CPU time (ms):              {}", self.elapsed().as_millis())?;
        write!(f, "FindBest time (ms):         {}", self.best_find.as_millis())
    }
}

#[cfg(test)]
mod test_statistics {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let stats = SearchStats::new();
        assert_eq!(0, stats.nodes());
        assert_eq!(0, stats.cut_branches());
        assert_eq!(0, stats.conflicts());
        assert!(!stats.is_aborted());
        assert!(!stats.is_cancelled());
    }

    #[test]
    fn improvement_snapshots_the_counters() {
        let mut stats = SearchStats::new();
        stats.node();
        stats.node();
        stats.cut_branch();
        stats.improvement();
        assert_eq!(2, stats.best_nodes());
        assert_eq!(2, stats.best_count());
    }

    #[test]
    fn abort_flag_is_shared() {
        let mut stats = SearchStats::new();
        let flag = stats.abort_flag();
        assert!(!stats.is_aborted());
        flag.store(true, std::sync::atomic::Ordering::Relaxed);
        assert!(stats.is_aborted());
        stats.mark_cancelled();
        assert!(stats.is_cancelled());
    }
}
