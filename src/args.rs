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

use clap::Parser;

use std::path::PathBuf;

use crate::common::{GraphFormat, Heuristic, PolicyMode, SearchConfig, VertexOrdering};

#[derive(Parser)]
#[clap(name="mcsplit", version, author, about)]
pub struct Args {
    /// The first input graph (the pattern)
    #[clap(value_parser)]
    input1: PathBuf,
    /// The second input graph (the target)
    #[clap(value_parser)]
    input2: PathBuf,
    /// Input format of the two graphs
    #[clap(short, long, value_enum, default_value_t=GraphFormat::Dimacs)]
    format: GraphFormat,
    /// Bidomain selection heuristic
    #[clap(long, value_enum, default_value_t=Heuristic::MinMax)]
    heuristic: Heuristic,
    /// Vertex ordering applied before the search
    #[clap(long, value_enum, default_value_t=VertexOrdering::Degree)]
    ordering: VertexOrdering,
    /// Solve the maximum common CONNECTED subgraph problem
    #[clap(short, long, action, conflicts_with="directed")]
    connected: bool,
    /// Use directed graphs
    #[clap(short='i', long, action)]
    directed: bool,
    /// Use edge and vertex labels
    #[clap(short='a', long, action, conflicts_with="vertex_labelled_only")]
    labelled: bool,
    /// Use vertex labels, but not edge labels
    #[clap(short='x', long, action)]
    vertex_labelled_only: bool,
    /// First try to find an induced subgraph isomorphism, then decrement the target size
    #[clap(short, long, action)]
    big_first: bool,
    /// Reward policy switch mode
    #[clap(long, value_enum, default_value_t=PolicyMode::Change)]
    policy: PolicyMode,
    /// The policy switch threshold is this coefficient times min(n0, n1)
    #[clap(long, default_value_t=2.0)]
    policy_coefficient: f64,
    /// Stops the search after this many recursive calls
    #[clap(long)]
    node_limit: Option<u64>,
    /// Stops the search after timeout seconds
    #[clap(short, long)]
    timeout: Option<u64>,
    /// Number of threads for the vertex-ordering pre-pass (0 = one per core)
    #[clap(short, long, default_value_t=0)]
    jobs: usize,
    /// Quiet output
    #[clap(short, long, action)]
    quiet: bool,
    /// If present, serialize every branching decision to this file
    #[clap(long)]
    export: Option<PathBuf>,
}

impl Args {

    pub fn input1(&self) -> &PathBuf {
        &self.input1
    }

    pub fn input2(&self) -> &PathBuf {
        &self.input2
    }

    pub fn format(&self) -> GraphFormat {
        self.format
    }

    pub fn ordering(&self) -> VertexOrdering {
        self.ordering
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Bundles the solver-facing subset of the arguments. The labelling flags fold into the
    /// two modes the solver distinguishes: `-a` enables both, `-x` only vertex labels.
    pub fn solver_config(&self) -> SearchConfig {
        SearchConfig {
            heuristic: self.heuristic,
            connected: self.connected,
            directed: self.directed,
            edge_labelled: self.labelled,
            vertex_labelled: self.labelled || self.vertex_labelled_only,
            big_first: self.big_first,
            policy: self.policy,
            policy_coefficient: self.policy_coefficient,
            node_limit: self.node_limit,
            timeout: self.timeout,
            quiet: self.quiet,
            export: self.export.clone(),
        }
    }
}
