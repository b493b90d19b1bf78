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

use nalgebra::{DMatrix, DVector};

use super::SortHeuristic;
use crate::core::graph::Graph;

const DAMPING_FACTOR: f64 = 0.85;
const EPSILON: f64 = 0.00001;

/// Power-iteration PageRank over the column-stochastic transition matrix. Vertices without
/// neighbours distribute their rank uniformly. The dense matrix is wasteful for large sparse
/// graphs but the pre-pass runs once per input.
#[derive(Default)]
pub struct PageRank;

impl SortHeuristic for PageRank {
    fn scores(&self, g: &Graph) -> Vec<i64> {
        let n = g.number_vertices();
        if n == 0 {
            return vec![];
        }
        let mut transition = DMatrix::<f64>::zeros(n, n);
        for j in 0..n {
            let out_links = g.degree(j);
            if out_links == 0 {
                for i in 0..n {
                    transition[(i, j)] = 1.0 / n as f64;
                }
            } else {
                for i in g.neighbours(j) {
                    transition[(i, j)] = 1.0 / out_links as f64;
                }
            }
        }
        let teleport = DVector::from_element(n, (1.0 - DAMPING_FACTOR) / n as f64);
        let mut p = DVector::from_element(n, 1.0 / n as f64);
        loop {
            let ranks = &transition * &p * DAMPING_FACTOR + &teleport;
            let error: f64 = (&ranks - &p).abs().sum();
            p = ranks;
            if error < EPSILON {
                break;
            }
        }
        p.iter().map(|&rank| (rank / EPSILON) as i64).collect()
    }
}
