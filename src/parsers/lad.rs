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

//! This module provides a parser for graphs in LAD format: the first line holds the number of
//! vertices, then one line per vertex with its degree followed by that many 0-indexed
//! neighbours
//!
//! 4
//! 1 1
//! 2 0 2
//! 2 1 3
//! 1 2
//!
//! The format carries no labels.

use std::path::Path;

use super::{lines_from_file, parse_token};
use crate::core::graph::Graph;

pub fn graph_from_lad(filepath: &Path, directed: bool) -> Graph {
    let lines = lines_from_file(filepath);
    let mut rows = lines.iter().filter(|l| !l.trim().is_empty());
    let n: usize = match rows.next() {
        Some(header) => parse_token(header.trim(), "the number of vertices"),
        None => panic!("Empty LAD file {}", filepath.display()),
    };
    let mut graph = Graph::new(n, directed);
    for v in 0..n {
        let row = match rows.next() {
            Some(r) => r,
            None => panic!("Missing adjacency row for vertex {}", v),
        };
        let tokens: Vec<&str> = row.split_whitespace().collect();
        let degree: usize = parse_token(tokens[0], "a degree");
        for token in tokens[1..1 + degree].iter() {
            let w: usize = parse_token(token, "a neighbour");
            graph.add_edge(v, w, 1);
        }
    }
    graph
}
