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

pub mod betweenness;
pub mod pagerank;

use crate::core::graph::Graph;

pub use betweenness::Betweenness;
pub use pagerank::PageRank;

/// A centrality measure used to order the vertices before the search. Scores are integers so
/// that the subsequent stable sort is exact.
pub trait SortHeuristic {
    fn scores(&self, g: &Graph) -> Vec<i64>;
}

/// Plain degree centrality
#[derive(Default)]
pub struct Degree;

impl SortHeuristic for Degree {
    fn scores(&self, g: &Graph) -> Vec<i64> {
        g.degrees().iter().map(|&d| d as i64).collect()
    }
}
