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

pub mod ascii;
pub mod dimacs;
pub mod lad;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::GraphFormat;
use crate::core::graph::Graph;

use ascii::*;
use dimacs::*;
use lad::*;

/// Reads a graph in the given format. Labels are kept only under the matching labelling mode:
/// vertex labels are zeroed unless `vertex_labelled`, edge labels collapse to 1 unless
/// `edge_labelled`, mirroring how the solver compares them.
pub fn read_graph(
    filepath: &Path,
    format: GraphFormat,
    directed: bool,
    edge_labelled: bool,
    vertex_labelled: bool,
) -> Graph {
    match format {
        GraphFormat::Dimacs => graph_from_dimacs(filepath, directed, edge_labelled, vertex_labelled),
        GraphFormat::Lad => graph_from_lad(filepath, directed),
        GraphFormat::Ascii => graph_from_ascii(filepath, directed, edge_labelled, vertex_labelled),
    }
}

/// Opens a file and returns its lines, panicking with a readable message on I/O problems
pub(crate) fn lines_from_file(filepath: &Path) -> Vec<String> {
    let file = match File::open(filepath) {
        Ok(f) => f,
        Err(e) => panic!("Could not open {}: {}", filepath.display(), e),
    };
    let reader = BufReader::new(file);
    reader
        .lines()
        .map(|l| match l {
            Ok(line) => line,
            Err(e) => panic!("Problem while reading file: {}", e),
        })
        .collect()
}

pub(crate) fn parse_token<T: std::str::FromStr>(token: &str, what: &str) -> T {
    match token.parse::<T>() {
        Ok(v) => v,
        Err(_) => panic!("Could not parse {} from '{}'", what, token),
    }
}
