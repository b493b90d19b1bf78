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

//! Betweenness centrality with Brandes' algorithm, parallelized over the source vertices.
//! Workers claim sources by decrementing a shared atomic counter, accumulate into a
//! thread-local vector and merge it into the shared accumulator under a single mutex once the
//! counter runs out. There is no other shared mutable state during the parallel phase.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicIsize, Ordering};

use super::SortHeuristic;
use crate::core::graph::Graph;

pub struct Betweenness {
    pub workers: usize,
}

impl Betweenness {

    pub fn new(workers: usize) -> Self {
        Self { workers }
    }

    /// One Brandes iteration: the dependency of `source` on every other vertex, accumulated
    /// into `bc_local`
    fn process(g: &Graph, source: usize, bc_local: &mut [f64]) {
        let n = g.number_vertices();
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![vec![]; n];
        let mut sigma = vec![0u64; n];
        let mut dist = vec![-1i64; n];
        let mut delta = vec![0.0f64; n];
        sigma[source] = 1;
        dist[source] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for w in g.neighbours(v) {
                if dist[w] < 0 {
                    queue.push_back(w);
                    dist[w] = dist[v] + 1;
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Vertices leave the stack in order of non-increasing distance
        while let Some(v) = stack.pop() {
            for &p in predecessors[v].iter() {
                delta[p] += (sigma[p] as f64 / sigma[v] as f64) * (1.0 + delta[v]);
            }
            if v != source {
                bc_local[v] += delta[v];
            }
        }
    }
}

impl SortHeuristic for Betweenness {
    fn scores(&self, g: &Graph) -> Vec<i64> {
        let n = g.number_vertices();
        let accumulator = Mutex::new(vec![0.0f64; n]);
        let next = AtomicIsize::new(n as isize - 1);
        rayon::scope(|s| {
            for _ in 0..self.workers.max(1) {
                s.spawn(|_| {
                    let mut local = vec![0.0f64; n];
                    loop {
                        let claimed = next.fetch_sub(1, Ordering::SeqCst);
                        if claimed < 0 {
                            break;
                        }
                        Self::process(g, claimed as usize, &mut local);
                    }
                    let mut shared = accumulator.lock().unwrap();
                    for (total, value) in shared.iter_mut().zip(local.iter()) {
                        *total += value;
                    }
                });
            }
        });
        accumulator.into_inner().unwrap().iter().map(|&bc| (bc * 100.0) as i64).collect()
    }
}
