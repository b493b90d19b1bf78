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

//! This module provides a parser for graphs in DIMACS format. An example of valid file is
//! given next
//!
//! c This line is a comment
//! c The problem line declares 4 vertices and 3 edges
//! p edge 4 3
//! c An optional n line assigns label 2 to vertex 1 (vertices are 1-indexed)
//! n 1 2
//! c One e line per edge, with an optional trailing edge label
//! e 1 2
//! e 2 3
//! e 3 4
//!
//! Vertex labels default to 0 and edge labels to 1 when absent or when the corresponding
//! labelling mode is off.

use std::path::Path;

use super::{lines_from_file, parse_token};
use crate::core::graph::Graph;

pub fn graph_from_dimacs(
    filepath: &Path,
    directed: bool,
    edge_labelled: bool,
    vertex_labelled: bool,
) -> Graph {
    let mut graph: Option<Graph> = None;
    for line in lines_from_file(filepath) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        match tokens[0] {
            "c" => {},
            "p" => {
                let n: usize = parse_token(tokens[2], "the number of vertices");
                graph = Some(Graph::new(n, directed));
            },
            "n" => {
                let g = graph.as_mut().unwrap_or_else(|| panic!("n line before the problem line"));
                if vertex_labelled {
                    let v: usize = parse_token::<usize>(tokens[1], "a vertex") - 1;
                    let label: u32 = parse_token(tokens[2], "a vertex label");
                    g.set_label(v, label);
                }
            },
            "e" => {
                let g = graph.as_mut().unwrap_or_else(|| panic!("e line before the problem line"));
                let u: usize = parse_token::<usize>(tokens[1], "a vertex") - 1;
                let v: usize = parse_token::<usize>(tokens[2], "a vertex") - 1;
                let label: u32 = if edge_labelled && tokens.len() > 3 {
                    parse_token(tokens[3], "an edge label")
                } else {
                    1
                };
                g.add_edge(u, v, label);
            },
            _ => {},
        }
    }
    match graph {
        Some(g) => g,
        None => panic!("Missing problem line in {}", filepath.display()),
    }
}

#[cfg(test)]
mod test_dimacs {
    use super::*;
    use std::io::Write;

    fn write_instance(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_vertices_edges_and_labels() {
        let file = write_instance("c a comment\np edge 3 2\nn 1 5\ne 1 2\ne 2 3 7\n");
        let g = graph_from_dimacs(file.path(), false, true, true);
        assert_eq!(3, g.number_vertices());
        assert_eq!(5, g.label(0));
        assert_eq!(0, g.label(1));
        assert_eq!(1, g.get(0, 1));
        assert_eq!(7, g.get(1, 2));
        assert_eq!(0, g.get(0, 2));
    }

    #[test]
    fn unlabelled_modes_drop_the_labels() {
        let file = write_instance("p edge 2 1\nn 1 5\ne 1 2 7\n");
        let g = graph_from_dimacs(file.path(), false, false, false);
        assert_eq!(0, g.label(0));
        assert_eq!(1, g.get(0, 1));
    }

    #[test]
    fn directed_edges_keep_their_orientation() {
        let file = write_instance("p edge 2 1\ne 1 2\n");
        let g = graph_from_dimacs(file.path(), true, false, false);
        assert_eq!(1, g.get(0, 1));
        assert_eq!(1 << 16, g.get(1, 0));
    }

    #[test]
    #[should_panic(expected = "Missing problem line")]
    fn a_file_without_problem_line_is_rejected() {
        let file = write_instance("c nothing here\n");
        graph_from_dimacs(file.path(), false, false, false);
    }
}
