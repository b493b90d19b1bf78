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

// Re-export the modules
pub mod args;
pub mod branching;
pub mod common;
pub mod core;
pub mod export;
pub mod heuristics;
pub mod parsers;
pub mod preprocess;
pub mod reward;
pub mod solver;
pub mod statistics;
pub mod timeout;

use sysinfo::System;

use crate::core::graph::Graph;
use crate::reward::DoubleQRewards;
use crate::statistics::SearchStats;
use crate::timeout::SearchTimeout;

pub use args::Args;
pub use common::*;
pub use solver::{check_solution, mcs, Solver};

/// Reads the two input graphs, reorders their vertices, runs one solver invocation and
/// returns the mapping expressed in the original vertex ids
pub fn search(args: Args) -> Solution {
    let config = args.solver_config();
    let g0 = parsers::read_graph(
        args.input1(),
        args.format(),
        config.directed,
        config.edge_labelled,
        config.vertex_labelled,
    );
    let g1 = parsers::read_graph(
        args.input2(),
        args.format(),
        config.directed,
        config.edge_labelled,
        config.vertex_labelled,
    );

    let workers = if args.jobs() == 0 { available_workers() } else { args.jobs() };
    let (mut g0_sorted, vv0) = preprocess::sort_vertices(&g0, g1.is_dense(), args.ordering(), workers);
    let (mut g1_sorted, vv1) = preprocess::sort_vertices(&g1, g0.is_dense(), args.ordering(), workers);
    g0_sorted.pack_leaves();
    g1_sorted.pack_leaves();

    let solution = solve_sorted(&g0_sorted, &g1_sorted, &config, &vv0, &vv1);
    if !check_solution(&g0, &g1, solution.assignment()) {
        panic!("The solver returned an invalid mapping");
    }
    solution
}

fn solve_sorted(g0: &Graph, g1: &Graph, config: &SearchConfig, vv0: &[usize], vv1: &[usize]) -> Solution {
    let mut rewards = DoubleQRewards::new(
        g0.number_vertices(),
        g1.number_vertices(),
        config.policy,
        config.policy_coefficient,
    );
    let mut stats = SearchStats::new();
    let timer = config.timeout.map(|seconds| SearchTimeout::start(seconds, stats.abort_flag()));
    let mut assignment = mcs(g0, g1, &mut rewards, config, &mut stats);
    if let Some(timer) = timer {
        timer.stop();
    }
    preprocess::invert_ordering(&mut assignment, vv0, vv1);
    Solution::new(assignment, &stats)
}

fn available_workers() -> usize {
    let sys = System::new_all();
    sys.cpus().len().max(1)
}
