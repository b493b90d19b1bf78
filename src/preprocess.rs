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

//! Vertex reordering applied before the search. High-centrality vertices are branched on
//! first, which tightens the bound early. The permutation is inverted on the returned
//! assignment so that callers only ever see the original vertex ids.

use crate::common::VertexOrdering;
use crate::core::bidomain::VtxPair;
use crate::core::graph::Graph;
use crate::heuristics::{Betweenness, Degree, PageRank, SortHeuristic};

/// Scores the vertices with the chosen centrality measure and returns the graph relabelled by
/// decreasing score, together with the permutation that was applied. When the opposite graph
/// is dense the order is reversed. The sort is stable, so equal scores keep their original
/// relative order.
pub fn sort_vertices(
    g: &Graph,
    other_dense: bool,
    ordering: VertexOrdering,
    workers: usize,
) -> (Graph, Vec<usize>) {
    let heuristic: Box<dyn SortHeuristic> = match ordering {
        VertexOrdering::Degree => Box::new(Degree),
        VertexOrdering::Pagerank => Box::new(PageRank),
        VertexOrdering::Betweenness => Box::new(Betweenness::new(workers)),
    };
    let scores = heuristic.scores(g);
    let mut vv: Vec<usize> = (0..g.number_vertices()).collect();
    vv.sort_by(|&a, &b| {
        if other_dense {
            scores[a].cmp(&scores[b])
        } else {
            scores[b].cmp(&scores[a])
        }
    });
    (g.induced_subgraph(&vv), vv)
}

/// Maps an assignment over sorted graphs back to the original vertex ids
pub fn invert_ordering(solution: &mut [VtxPair], vv0: &[usize], vv1: &[usize]) {
    for pair in solution.iter_mut() {
        pair.v = vv0[pair.v];
        pair.w = vv1[pair.w];
    }
}
