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

use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::bidomain::VtxPair;
use crate::statistics::SearchStats;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Heuristic {
    /// Smallest max(left_len, right_len)
    MinMax,
    /// Smallest left_len * right_len
    MinProduct,
    /// Smallest sum of the left vertex indices (a proxy for the highest degrees once the
    /// vertices are sorted by decreasing degree)
    DegreeSum,
    /// Smallest sum of the learned vertex rewards
    RewardBased,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum PolicyMode {
    /// Swap to the other reward table
    Change,
    /// Zero the active reward table
    Reset,
    /// Reinitialize the active reward table with random values
    Random,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum VertexOrdering {
    /// Decreasing degree
    Degree,
    /// Decreasing PageRank
    Pagerank,
    /// Decreasing betweenness centrality (parallel Brandes)
    Betweenness,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum GraphFormat {
    /// DIMACS: p/e/n lines
    Dimacs,
    /// LAD: one degree-prefixed adjacency row per vertex
    Lad,
    /// Plain ASCII: header, one label per vertex, one edge per line
    Ascii,
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Heuristic::MinMax => write!(f, "min-max"),
            Heuristic::MinProduct => write!(f, "min-product"),
            Heuristic::DegreeSum => write!(f, "degree-sum"),
            Heuristic::RewardBased => write!(f, "reward-based"),
        }
    }
}

impl std::fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyMode::Change => write!(f, "change"),
            PolicyMode::Reset => write!(f, "reset"),
            PolicyMode::Random => write!(f, "random"),
        }
    }
}

impl std::fmt::Display for VertexOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VertexOrdering::Degree => write!(f, "degree"),
            VertexOrdering::Pagerank => write!(f, "pagerank"),
            VertexOrdering::Betweenness => write!(f, "betweenness"),
        }
    }
}

impl std::fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphFormat::Dimacs => write!(f, "dimacs"),
            GraphFormat::Lad => write!(f, "lad"),
            GraphFormat::Ascii => write!(f, "ascii"),
        }
    }
}

/// All the knobs of one solver invocation, bundled so that no configuration outlives it
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub heuristic: Heuristic,
    /// Solve the maximum common CONNECTED subgraph problem
    pub connected: bool,
    pub directed: bool,
    pub edge_labelled: bool,
    pub vertex_labelled: bool,
    /// Try a goal of n0 first and decrement it on failure, instead of growing from empty
    pub big_first: bool,
    pub policy: PolicyMode,
    /// The policy switch threshold is coefficient * min(n0, n1)
    pub policy_coefficient: f64,
    /// Abort the search after this many recursive calls
    pub node_limit: Option<u64>,
    /// Abort the search after this many seconds
    pub timeout: Option<u64>,
    pub quiet: bool,
    /// If set, serialize every branching decision to this file
    pub export: Option<PathBuf>,
}

impl SearchConfig {
    /// Directed or edge-labelled graphs split adjacent vertices per edge label instead of into
    /// a single bucket
    pub fn multiway(&self) -> bool {
        self.directed || self.edge_labelled
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::MinMax,
            connected: false,
            directed: false,
            edge_labelled: false,
            vertex_labelled: false,
            big_first: false,
            policy: PolicyMode::Change,
            policy_coefficient: 2.0,
            node_limit: None,
            timeout: None,
            quiet: true,
            export: None,
        }
    }
}

/// The mapping found by one solver invocation, together with a summary of the run. The
/// assignment refers to the vertex ids of the input graphs (any reordering applied before the
/// search has been undone).
pub struct Solution {
    assignment: Vec<VtxPair>,
    nodes: u64,
    cut_branches: u64,
    conflicts: u64,
    time: Duration,
    cancelled: bool,
}

impl Solution {

    pub fn new(assignment: Vec<VtxPair>, stats: &SearchStats) -> Self {
        Self {
            assignment,
            nodes: stats.nodes(),
            cut_branches: stats.cut_branches(),
            conflicts: stats.conflicts(),
            time: stats.elapsed(),
            cancelled: stats.is_cancelled(),
        }
    }

    pub fn size(&self) -> usize {
        self.assignment.len()
    }

    pub fn assignment(&self) -> &[VtxPair] {
        &self.assignment
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

    pub fn time(&self) -> Duration {
        self.time
    }

    /// True when the search was stopped by the timeout or the node limit rather than running to
    /// exhaustion; the mapping is then a valid but possibly non-optimal one
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn print(&self) {
        println!("{}", self);
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Solution size {}", self.assignment.len())?;
        for pair in self.assignment.iter() {
            write!(f, "({} -> {}) ", pair.v, pair.w)?;
        }
        writeln!(f)?;
        writeln!(f, "Nodes:                      {}", self.nodes)?;
        writeln!(f, "Cut branches:               {}", self.cut_branches)?;
        writeln!(f, "Conflicts:                  {}", self.conflicts)?;
        write!(f, "CPU time (ms):              {}", self.time.as_millis())?;
        if self.cancelled {
            write!(f, "\nTIMEOUT")?;
        }
        Ok(())
    }
}
