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

//! This module serializes branching decisions for offline dataset generation. Each decision is
//! written as one fixed little-endian binary record:
//!
//! ```text
//! count: i32, candidates: [i32; count], scores: [i32; count]
//! ```
//!
//! The sink is a pure consumer: it never influences the search. It does however cross-check
//! that the chosen vertex belongs to the candidate set it was given; a mismatch means the
//! instrumentation is broken and aborts the run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct SearchDataExporter {
    writer: BufWriter<File>,
}

impl SearchDataExporter {

    pub fn new(path: &Path) -> Self {
        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => panic!("Could not create the export file: {}", e),
        };
        Self { writer: BufWriter::new(file) }
    }

    /// Records one branching decision: the candidate vertices of the inspected range and their
    /// scores, in the same order
    pub fn record(&mut self, candidates: &[usize], scores: &[f64], chosen: usize) {
        if !candidates.contains(&chosen) {
            panic!("Exported vertex {} is missing from its bidomain", chosen);
        }
        let mut buffer: Vec<u8> = Vec::with_capacity(4 + 8 * candidates.len());
        buffer.extend_from_slice(&(candidates.len() as i32).to_le_bytes());
        for &vtx in candidates {
            buffer.extend_from_slice(&(vtx as i32).to_le_bytes());
        }
        for &score in scores {
            buffer.extend_from_slice(&(score as i32).to_le_bytes());
        }
        if let Err(e) = self.writer.write_all(&buffer) {
            panic!("Could not write the search data: {}", e);
        }
    }
}
