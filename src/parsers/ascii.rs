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

//! This module provides a parser for a plain ASCII graph format. The header holds the vertex
//! and edge counts, followed by one label line per vertex and one `u v label` line per edge,
//! all 0-indexed
//!
//! 3 2
//! 1
//! 1
//! 2
//! 0 1 1
//! 1 2 1

use std::path::Path;

use super::{lines_from_file, parse_token};
use crate::core::graph::Graph;

pub fn graph_from_ascii(
    filepath: &Path,
    directed: bool,
    edge_labelled: bool,
    vertex_labelled: bool,
) -> Graph {
    let lines = lines_from_file(filepath);
    let mut rows = lines.iter().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = match rows.next() {
        Some(h) => h.split_whitespace().collect(),
        None => panic!("Empty ASCII file {}", filepath.display()),
    };
    let n: usize = parse_token(header[0], "the number of vertices");
    let e: usize = parse_token(header[1], "the number of edges");
    let mut graph = Graph::new(n, directed);
    for v in 0..n {
        let row = match rows.next() {
            Some(r) => r,
            None => panic!("Missing label for vertex {}", v),
        };
        if vertex_labelled {
            graph.set_label(v, parse_token(row.trim(), "a vertex label"));
        }
    }
    for i in 0..e {
        let row = match rows.next() {
            Some(r) => r,
            None => panic!("Missing edge line {}", i),
        };
        let tokens: Vec<&str> = row.split_whitespace().collect();
        let u: usize = parse_token(tokens[0], "a vertex");
        let v: usize = parse_token(tokens[1], "a vertex");
        let label: u32 = if edge_labelled && tokens.len() > 2 {
            parse_token(tokens[2], "an edge label")
        } else {
            1
        };
        graph.add_edge(u, v, label);
    }
    graph
}

#[cfg(test)]
mod test_ascii {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_labels_and_edges() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"3 2\n1\n1\n2\n0 1 4\n1 2 1\n").unwrap();
        let g = graph_from_ascii(file.path(), false, true, true);
        assert_eq!(3, g.number_vertices());
        assert_eq!(1, g.label(0));
        assert_eq!(2, g.label(2));
        assert_eq!(4, g.get(0, 1));
        assert_eq!(1, g.get(1, 2));
    }

    #[test]
    fn unlabelled_modes_drop_the_labels() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"2 1\n3\n3\n0 1 9\n").unwrap();
        let g = graph_from_ascii(file.path(), false, false, false);
        assert_eq!(0, g.label(0));
        assert_eq!(1, g.get(0, 1));
    }

    #[test]
    #[should_panic(expected = "Missing edge line")]
    fn truncated_files_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"2 1\n0\n0\n").unwrap();
        graph_from_ascii(file.path(), false, false, false);
    }
}
