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

//! This module implements the partition of the still-unmatched vertices into bidomains. A
//! bidomain pairs a range of the shared `left` vertex buffer with a range of the shared `right`
//! buffer; every vertex of the left range may still be mapped onto every vertex of the right
//! range. The ranges of distinct bidomains never overlap.
//!
//! Membership in a range is purely positional. Removing a vertex swaps it to the boundary of
//! its range and shrinks the logical length by one:
//!
//! ```text
//! range [30, 5, 12, 45], len 4   --- remove 5 --->   [30, 45, 12, | 5], len 3
//! ```
//!
//! Restoring the previous state only grows the length back: the removed vertex still sits right
//! after the boundary, so the content is already correct. All grouping operations performed
//! during the search (adjacency partition, matched-vertex filtering) are in-place swaps of the
//! same kind, which is what makes O(1) restoration possible.

use std::cmp::min;

use crate::core::graph::Graph;

/// One matched pair of the mapping under construction: vertex `v` of the pattern graph mapped
/// onto vertex `w` of the target graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VtxPair {
    pub v: usize,
    pub w: usize,
}

impl VtxPair {
    pub fn new(v: usize, w: usize) -> Self {
        Self { v, w }
    }
}

/// A pair of candidate ranges: `[l, l + left_len)` into the left buffer and `[r, r + right_len)`
/// into the right buffer. `is_adjacent` is true when the vertices of this bidomain are adjacent
/// to the most recently matched pair; the connected variant of the problem only branches on
/// adjacent bidomains once the mapping is non-empty.
#[derive(Debug, Clone, Copy)]
pub struct Bidomain {
    pub l: usize,
    pub r: usize,
    pub left_len: usize,
    pub right_len: usize,
    pub is_adjacent: bool,
}

impl Bidomain {
    pub fn new(l: usize, r: usize, left_len: usize, right_len: usize, is_adjacent: bool) -> Self {
        Self { l, r, left_len, right_len, is_adjacent }
    }
}

/// The outcome of splitting the bidomain list for a chosen pair: the rewritten list, the
/// integer information gain fed to the reward engine, and the number of pairs committed to the
/// mapping (1 plus the forced leaf matches).
#[derive(Debug)]
pub struct SplitOutcome {
    pub new_domains: Vec<Bidomain>,
    pub gain: i64,
    pub pairs_added: usize,
}

/// Upper bound on the number of additional pairs the given bidomains can still produce. Each
/// bidomain contributes at most min(left_len, right_len) pairs.
pub fn calc_bound(domains: &[Bidomain]) -> usize {
    domains.iter().map(|bd| min(bd.left_len, bd.right_len)).sum()
}

/// Groups the vertices of `arr[start..start + len]` adjacent to `index` in front of the range,
/// via in-place swaps, and returns how many there are. Only the grouping matters; the relative
/// order within each half is not preserved.
pub fn partition(arr: &mut [usize], start: usize, len: usize, g: &Graph, index: usize) -> usize {
    let mut i = 0;
    for j in 0..len {
        if g.get(index, arr[start + j]) != 0 {
            arr.swap(start + i, start + j);
            i += 1;
        }
    }
    i
}

/// Groups the still-unmatched vertices of `arr[start..start + len]` in front of the range and
/// returns how many there are. Used to filter out forced leaf matches from non-adjacent
/// bidomains.
pub fn remove_matched_vertices(arr: &mut [usize], start: usize, len: usize, matched: &[bool]) -> usize {
    let mut p = 0;
    for i in 0..len {
        if !matched[arr[start + i]] {
            arr.swap(start + i, start + p);
            p += 1;
        }
    }
    p
}

/// Removes the vertex at `remove_idx` (relative to `start`) from a range by swapping it to the
/// boundary and shrinking `len`
pub fn remove_vtx_from_array(arr: &mut [usize], start: usize, len: &mut usize, remove_idx: usize) {
    *len -= 1;
    arr.swap(start + remove_idx, start + *len);
}

/// Removes a bidomain from the list. Order of the list is irrelevant, so the last entry takes
/// its place.
pub fn remove_bidomain(domains: &mut Vec<Bidomain>, idx: usize) {
    domains.swap_remove(idx);
}

#[cfg(test)]
mod test_bidomain {
    use super::*;

    #[test]
    fn bound_sums_the_smaller_sides() {
        let domains = vec![
            Bidomain::new(0, 0, 3, 2, false),
            Bidomain::new(3, 2, 1, 4, true),
            Bidomain::new(4, 6, 2, 2, false),
        ];
        assert_eq!(5, calc_bound(&domains));
        assert_eq!(0, calc_bound(&[]));
    }

    #[test]
    fn remove_and_restore_round_trip() {
        let mut arr = vec![30, 5, 12, 45];
        let mut len = 4;
        remove_vtx_from_array(&mut arr, 0, &mut len, 1);
        assert_eq!(3, len);
        assert_eq!(vec![30, 45, 12, 5], arr);
        // Growing the length back restores the set: the removed element sits at the boundary
        len += 1;
        let mut restored = arr[0..len].to_vec();
        restored.sort();
        assert_eq!(vec![5, 12, 30, 45], restored);
    }

    #[test]
    fn partition_groups_adjacent_vertices_first() {
        let mut g = Graph::new(5, false);
        g.add_edge(0, 2, 1);
        g.add_edge(0, 4, 1);
        let mut arr = vec![1, 2, 3, 4];
        let k = partition(&mut arr, 0, 4, &g, 0);
        assert_eq!(2, k);
        let mut adjacent = arr[0..k].to_vec();
        adjacent.sort();
        assert_eq!(vec![2, 4], adjacent);
        let mut rest = arr[k..4].to_vec();
        rest.sort();
        assert_eq!(vec![1, 3], rest);
    }

    #[test]
    fn partition_respects_range_boundaries() {
        let mut g = Graph::new(4, false);
        g.add_edge(0, 3, 1);
        let mut arr = vec![9, 1, 3, 9];
        let k = partition(&mut arr, 1, 2, &g, 0);
        assert_eq!(1, k);
        assert_eq!(vec![9, 3, 1, 9], arr);
    }

    #[test]
    fn matched_vertices_are_swapped_out() {
        let mut matched = vec![false; 6];
        matched[2] = true;
        matched[5] = true;
        let mut arr = vec![2, 3, 5, 1];
        let p = remove_matched_vertices(&mut arr, 0, 4, &matched);
        assert_eq!(2, p);
        let mut kept = arr[0..p].to_vec();
        kept.sort();
        assert_eq!(vec![1, 3], kept);
    }

    #[test]
    fn remove_bidomain_is_swap_remove() {
        let mut domains = vec![
            Bidomain::new(0, 0, 1, 1, false),
            Bidomain::new(1, 1, 2, 2, false),
            Bidomain::new(3, 3, 3, 3, false),
        ];
        remove_bidomain(&mut domains, 0);
        assert_eq!(2, domains.len());
        assert_eq!(3, domains[0].left_len);
    }
}
