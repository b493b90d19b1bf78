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

//! This module implements the labelled graph consumed by the solver. The graph is stored as a
//! dense adjacency matrix of edge labels, with 0 meaning "no edge". For directed graphs an edge
//! (u, v) stores its label in the low 16 bits of `adj[u][v]` and mirrors it in the high 16 bits
//! of `adj[v][u]`, so that `get(u, v) != 0` holds whenever u and v are adjacent in either
//! direction and two directed edges are compatible iff their encoded labels are equal.

/// The key under which pendant neighbours are grouped: the vertex label of the pendant and the
/// label of the edge leading to it.
pub type LeafKey = (u32, u32);

/// A labelled graph with optional directed edges. Vertices are identified by their index in
/// `[0, n)`. The `leaves` structure is empty until [Graph::pack_leaves] is called.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Number of vertices
    n: usize,
    /// Label of each vertex. All zero when the graphs are not vertex-labelled.
    labels: Vec<u32>,
    /// Adjacency matrix of edge labels, 0 = no edge
    adj: Vec<Vec<u32>>,
    /// For each vertex, its pendant neighbours grouped by (vertex label, edge label) and sorted
    /// by that key
    leaves: Vec<Vec<(LeafKey, Vec<usize>)>>,
    directed: bool,
}

impl Graph {

    /// Creates a graph with `n` vertices, no edges and all labels set to 0
    pub fn new(n: usize, directed: bool) -> Self {
        Self {
            n,
            labels: vec![0; n],
            adj: vec![vec![0; n]; n],
            leaves: vec![vec![]; n],
            directed,
        }
    }

    pub fn number_vertices(&self) -> usize {
        self.n
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn label(&self, v: usize) -> u32 {
        self.labels[v]
    }

    pub fn set_label(&mut self, v: usize, label: u32) {
        self.labels[v] = label;
    }

    /// Returns the label of the edge between `u` and `v`, or 0 if there is none. For directed
    /// graphs the returned value encodes both orientations; it is non-zero whenever the two
    /// vertices are adjacent in at least one direction.
    pub fn get(&self, u: usize, v: usize) -> u32 {
        self.adj[u][v]
    }

    /// Adds an edge between `u` and `v` with the given label (1 for unlabelled graphs).
    /// Self-loops are ignored.
    pub fn add_edge(&mut self, u: usize, v: usize, label: u32) {
        if u == v {
            return;
        }
        if self.directed {
            self.adj[u][v] |= label & 0xFFFF;
            self.adj[v][u] |= label << 16;
        } else {
            self.adj[u][v] = label;
            self.adj[v][u] = label;
        }
    }

    /// Iterates over the vertices adjacent to `v`, in either direction for directed graphs
    pub fn neighbours(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj[v].iter().enumerate().filter(|&(_, &label)| label != 0).map(|(u, _)| u)
    }

    /// Number of vertices adjacent to `v`
    pub fn degree(&self, v: usize) -> usize {
        self.adj[v].iter().filter(|&&label| label != 0).count()
    }

    pub fn degrees(&self) -> Vec<usize> {
        (0..self.n).map(|v| self.degree(v)).collect()
    }

    /// A graph is dense when more than half of the possible edges are present. The degree sum
    /// counts every edge twice, hence the comparison against n * (n - 1).
    pub fn is_dense(&self) -> bool {
        self.degrees().iter().sum::<usize>() > self.n * (self.n - 1)
    }

    pub fn leaves(&self, v: usize) -> &[(LeafKey, Vec<usize>)] {
        &self.leaves[v]
    }

    /// Groups, for each vertex, its pendant neighbours (degree 1) by (vertex label, edge label).
    /// The groups are sorted by key so that two graphs can be merge-joined during the search.
    /// Must be called again after any structural modification.
    pub fn pack_leaves(&mut self) {
        let degrees = self.degrees();
        for v in 0..self.n {
            let mut groups: Vec<(LeafKey, Vec<usize>)> = vec![];
            for u in 0..self.n {
                if self.adj[v][u] == 0 || degrees[u] != 1 {
                    continue;
                }
                let key = (self.labels[u], self.adj[v][u]);
                match groups.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, group)) => group.push(u),
                    None => groups.push((key, vec![u])),
                }
            }
            groups.sort_by_key(|(k, _)| *k);
            self.leaves[v] = groups;
        }
    }

    /// Returns the graph induced by the permutation `vv`: vertex i of the new graph is vertex
    /// `vv[i]` of this one. The `leaves` structure is not carried over.
    pub fn induced_subgraph(&self, vv: &[usize]) -> Graph {
        let mut g = Graph::new(vv.len(), self.directed);
        for (i, &v) in vv.iter().enumerate() {
            g.labels[i] = self.labels[v];
            for (j, &w) in vv.iter().enumerate() {
                g.adj[i][j] = self.adj[v][w];
            }
        }
        g
    }
}
