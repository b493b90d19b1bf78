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

//! The branch-and-bound search for a maximum common (connected) subgraph. One recursive call
//! owns one bidomain list; the left/right vertex buffers, the matched flags and the mapping
//! under construction are shared across the whole recursion and mutated destructively, so
//! every branch restores them exactly before its sibling runs. The search is strictly
//! sequential and depth-first; the only synchronization primitive is the cancellation flag.

use std::time::Duration;

use rustc_hash::FxHashSet;

use crate::branching::{select_bidomain, select_v_index, select_w_index};
use crate::common::SearchConfig;
use crate::core::bidomain::{
    calc_bound, partition, remove_bidomain, remove_matched_vertices, remove_vtx_from_array,
    Bidomain, SplitOutcome, VtxPair,
};
use crate::core::graph::Graph;
use crate::export::SearchDataExporter;
use crate::reward::Rewards;
use crate::statistics::SearchStats;

/// Runs one solver invocation and returns the largest mapping found. `stats` is owned by the
/// caller and reflects the run once this returns; the incumbent it describes is valid even
/// when the run was cancelled.
pub fn mcs<R: Rewards>(
    g0: &Graph,
    g1: &Graph,
    rewards: &mut R,
    config: &SearchConfig,
    stats: &mut SearchStats,
) -> Vec<VtxPair> {
    Solver::new(g0, g1, rewards, config, stats).search()
}

/// Checks that a mapping is a common subgraph: matching vertex labels, no repeated endpoint,
/// and pairwise consistent edges under the configured directed/labelled semantics
pub fn check_solution(g0: &Graph, g1: &Graph, solution: &[VtxPair]) -> bool {
    let mut used_left = vec![false; g0.number_vertices()];
    let mut used_right = vec![false; g1.number_vertices()];
    for (i, p0) in solution.iter().enumerate() {
        if used_left[p0.v] || used_right[p0.w] {
            return false;
        }
        used_left[p0.v] = true;
        used_right[p0.w] = true;
        if g0.label(p0.v) != g1.label(p0.w) {
            return false;
        }
        for p1 in solution[i + 1..].iter() {
            if g0.get(p0.v, p1.v) != g1.get(p0.w, p1.w) {
                return false;
            }
        }
    }
    true
}

/// State of one solver invocation. Nothing in here outlives the invocation: the buffers are
/// created by [Solver::search] and the references are handed back when it returns.
pub struct Solver<'a, R: Rewards> {
    g0: &'a Graph,
    g1: &'a Graph,
    config: &'a SearchConfig,
    /// Learned branching priorities, updated after every split
    rewards: &'a mut R,
    stats: &'a mut SearchStats,
    /// Shared buffer of pattern vertex ids; bidomains view disjoint ranges of it
    left: Vec<usize>,
    /// Shared buffer of target vertex ids
    right: Vec<usize>,
    /// Mirrors membership of each pattern vertex in `current`
    g0_matched: Vec<bool>,
    g1_matched: Vec<bool>,
    /// The mapping of the branch being explored
    current: Vec<VtxPair>,
    /// Best mapping found so far; its length never decreases within one invocation
    incumbent: Vec<VtxPair>,
    exporter: Option<SearchDataExporter>,
}

impl<'a, R: Rewards> Solver<'a, R> {

    pub fn new(
        g0: &'a Graph,
        g1: &'a Graph,
        rewards: &'a mut R,
        config: &'a SearchConfig,
        stats: &'a mut SearchStats,
    ) -> Self {
        let exporter = config.export.as_ref().map(|path| SearchDataExporter::new(path));
        Self {
            g0,
            g1,
            config,
            rewards,
            stats,
            left: vec![],
            right: vec![],
            g0_matched: vec![false; g0.number_vertices()],
            g1_matched: vec![false; g1.number_vertices()],
            current: vec![],
            incumbent: vec![],
            exporter,
        }
    }

    pub fn search(&mut self) -> Vec<VtxPair> {
        let domains = self.init_domains();
        if self.config.big_first {
            let left_init = self.left.clone();
            let right_init = self.right.clone();
            for k in 0..self.g0.number_vertices() {
                let goal = self.g0.number_vertices() - k;
                self.left.copy_from_slice(&left_init);
                self.right.copy_from_slice(&right_init);
                let mut domains_copy = domains.clone();
                self.current.clear();
                self.solve(&mut domains_copy, goal);
                if self.incumbent.len() == goal || self.stats.is_aborted() {
                    break;
                }
                if !self.config.quiet {
                    println!("Upper bound: {}", goal - 1);
                }
            }
        } else {
            let mut domains = domains;
            self.solve(&mut domains, 1);
        }
        std::mem::take(&mut self.incumbent)
    }

    /// Creates one bidomain per label appearing in both graphs, filling the left/right buffers
    /// with the vertices carrying that label. Labels are visited in increasing order so that
    /// the initial layout is deterministic.
    fn init_domains(&mut self) -> Vec<Bidomain> {
        let g0 = self.g0;
        let g1 = self.g1;
        let left_labels: FxHashSet<u32> = (0..g0.number_vertices()).map(|v| g0.label(v)).collect();
        let right_labels: FxHashSet<u32> = (0..g1.number_vertices()).map(|v| g1.label(v)).collect();
        let mut labels: Vec<u32> = left_labels.intersection(&right_labels).copied().collect();
        labels.sort_unstable();
        let mut domains = vec![];
        for label in labels {
            let start_l = self.left.len();
            let start_r = self.right.len();
            self.left.extend((0..g0.number_vertices()).filter(|&v| g0.label(v) == label));
            self.right.extend((0..g1.number_vertices()).filter(|&v| g1.label(v) == label));
            let left_len = self.left.len() - start_l;
            let right_len = self.right.len() - start_r;
            domains.push(Bidomain::new(start_l, start_r, left_len, right_len, false));
        }
        domains
    }

    fn solve(&mut self, domains: &mut Vec<Bidomain>, goal: usize) {
        if self.stats.is_aborted() {
            self.stats.mark_cancelled();
            return;
        }
        self.stats.node();
        if let Some(limit) = self.config.node_limit {
            if self.stats.nodes() > limit {
                self.stats.request_abort();
                self.stats.mark_cancelled();
                return;
            }
        }

        if self.current.len() > self.incumbent.len() {
            // Printing every improvement floods the log on easy instances, so close
            // discoveries are reported once
            let report = !self.config.quiet
                && self.stats.elapsed().saturating_sub(self.stats.best_find()) > Duration::from_millis(1);
            self.incumbent.clear();
            self.incumbent.extend_from_slice(&self.current);
            self.stats.improvement();
            if report {
                println!("Incumbent size: {}", self.incumbent.len());
            }
            self.rewards.update_policy_counter(true);
        }

        let bound = self.current.len() + calc_bound(domains);
        if bound <= self.incumbent.len() || bound < goal {
            self.stats.cut_branch();
            return;
        }
        if self.config.big_first && self.incumbent.len() == goal {
            return;
        }

        let Some(bd_idx) =
            select_bidomain(domains, &self.left, &*self.rewards, self.config, self.current.len())
        else {
            // In the connected case there may be nothing left to branch on
            return;
        };
        let bd = domains[bd_idx];

        let tmp_idx = select_v_index(&self.left, &*self.rewards, bd.l, bd.left_len).unwrap();
        let v = self.left[bd.l + tmp_idx];
        self.export_vertex_decision(bd, v);
        remove_vtx_from_array(&mut self.left, bd.l, &mut domains[bd_idx].left_len, tmp_idx);
        self.rewards.update_policy_counter(false);

        // Try every partner w, best pair reward first. The chosen w is parked in the slot
        // hidden by the decremented right_len, so the split below never hands it to a child
        // domain, and the tried set prevents re-selection.
        let mut wselected = vec![false; self.g1.number_vertices()];
        domains[bd_idx].right_len -= 1;
        let right_len = domains[bd_idx].right_len;
        for _ in 0..=right_len {
            let r = domains[bd_idx].r;
            let tmp_idx = select_w_index(
                &self.right,
                &*self.rewards,
                r,
                right_len + 1,
                &wselected,
                v,
                self.g0,
                self.g1,
                &self.g0_matched,
                &self.g1_matched,
            )
            .unwrap();
            let w = self.right[r + tmp_idx];
            wselected[w] = true;
            self.export_partner_decision(r, right_len + 1, v, w);
            self.right.swap(r + tmp_idx, r + right_len);
            self.rewards.update_policy_counter(false);

            let before = self.current.len();
            let split = self.split_domains(domains, v, w);
            self.rewards.update_rewards(&split, v, w, &mut *self.stats);
            let mut new_domains = split.new_domains;
            self.solve(&mut new_domains, goal);

            // Undo every pair committed inside this branch, forced leaf matches included,
            // before the sibling branch reuses the shared buffers
            while self.current.len() > before {
                let pair = self.current.pop().unwrap();
                self.g0_matched[pair.v] = false;
                self.g1_matched[pair.w] = false;
            }
            if self.stats.is_aborted() {
                break;
            }
        }
        domains[bd_idx].right_len += 1;
        if domains[bd_idx].left_len == 0 {
            remove_bidomain(domains, bd_idx);
        }
        // The branch where v stays unmatched
        self.solve(domains, goal);
    }

    /// Commits (v, w) and the forced leaf matches, then rewrites the bidomain list: each old
    /// bidomain is partitioned in place into its subset adjacent to the new pair and the rest,
    /// and in multiway mode the adjacent subset is further split per edge label. Children with
    /// an empty side are dropped; the information gain measures how much the bound shrank.
    fn split_domains(&mut self, domains: &[Bidomain], v: usize, w: usize) -> SplitOutcome {
        let g0 = self.g0;
        let g1 = self.g1;
        self.current.push(VtxPair::new(v, w));
        self.g0_matched[v] = true;
        self.g1_matched[w] = true;

        // Pendant neighbours of equal label are interchangeable once their parents are
        // matched, so they are committed pairwise without branching
        let mut leaves_matched = 0;
        let leaves0 = g0.leaves(v);
        let leaves1 = g1.leaves(w);
        let (mut i, mut j) = (0, 0);
        while i < leaves0.len() && j < leaves1.len() {
            if leaves0[i].0 < leaves1[j].0 {
                i += 1;
            } else if leaves0[i].0 > leaves1[j].0 {
                j += 1;
            } else {
                let leaf0 = &leaves0[i].1;
                let leaf1 = &leaves1[j].1;
                let (mut p, mut q) = (0, 0);
                while p < leaf0.len() && q < leaf1.len() {
                    if self.g0_matched[leaf0[p]] {
                        p += 1;
                    } else if self.g1_matched[leaf1[q]] {
                        q += 1;
                    } else {
                        self.current.push(VtxPair::new(leaf0[p], leaf1[q]));
                        self.g0_matched[leaf0[p]] = true;
                        self.g1_matched[leaf1[q]] = true;
                        leaves_matched += 1;
                        p += 1;
                        q += 1;
                    }
                }
                i += 1;
                j += 1;
            }
        }

        let multiway = self.config.multiway();
        let mut new_domains: Vec<Bidomain> = Vec::with_capacity(domains.len());
        let mut gain: i64 = 0;
        for old_bd in domains.iter() {
            let l = old_bd.l;
            let r = old_bd.r;
            // Forced leaf matches can sit in non-adjacent bidomains; swap them out before
            // partitioning
            let (unmatched_left, unmatched_right) = if leaves_matched > 0 && !old_bd.is_adjacent {
                (
                    remove_matched_vertices(&mut self.left, l, old_bd.left_len, &self.g0_matched),
                    remove_matched_vertices(&mut self.right, r, old_bd.right_len, &self.g1_matched),
                )
            } else {
                (old_bd.left_len, old_bd.right_len)
            };
            let left_len = partition(&mut self.left, l, unmatched_left, g0, v);
            let right_len = partition(&mut self.right, r, unmatched_right, g1, w);
            let left_len_noedge = unmatched_left - left_len;
            let right_len_noedge = unmatched_right - right_len;
            gain += old_bd.left_len.min(old_bd.right_len) as i64
                - left_len.min(right_len) as i64
                - left_len_noedge.min(right_len_noedge) as i64;
            if left_len_noedge > 0 && right_len_noedge > 0 {
                new_domains.push(Bidomain::new(
                    l + left_len,
                    r + right_len,
                    left_len_noedge,
                    right_len_noedge,
                    old_bd.is_adjacent,
                ));
            }
            if multiway && left_len > 0 && right_len > 0 {
                // One child per edge label appearing on both sides; grouping by label only
                // needs a sort followed by a merge-join
                self.left[l..l + left_len].sort_unstable_by_key(|&a| g0.get(v, a));
                self.right[r..r + right_len].sort_unstable_by_key(|&a| g1.get(w, a));
                let l_top = l + left_len;
                let r_top = r + right_len;
                let (mut li, mut ri) = (l, r);
                while li < l_top && ri < r_top {
                    let left_label = g0.get(v, self.left[li]);
                    let right_label = g1.get(w, self.right[ri]);
                    if left_label < right_label {
                        li += 1;
                    } else if left_label > right_label {
                        ri += 1;
                    } else {
                        let lmin = li;
                        let rmin = ri;
                        while li < l_top && g0.get(v, self.left[li]) == left_label {
                            li += 1;
                        }
                        while ri < r_top && g1.get(w, self.right[ri]) == left_label {
                            ri += 1;
                        }
                        new_domains.push(Bidomain::new(lmin, rmin, li - lmin, ri - rmin, true));
                    }
                }
            } else if left_len > 0 && right_len > 0 {
                new_domains.push(Bidomain::new(l, r, left_len, right_len, true));
            }
        }
        SplitOutcome { new_domains, gain, pairs_added: 1 + leaves_matched }
    }

    fn export_vertex_decision(&mut self, bd: Bidomain, chosen: usize) {
        if self.exporter.is_none() {
            return;
        }
        let candidates = self.left[bd.l..bd.l + bd.left_len].to_vec();
        let scores: Vec<f64> = candidates.iter().map(|&x| self.rewards.vertex_reward(x, false)).collect();
        self.exporter.as_mut().unwrap().record(&candidates, &scores, chosen);
    }

    fn export_partner_decision(&mut self, r: usize, len: usize, v: usize, chosen: usize) {
        if self.exporter.is_none() {
            return;
        }
        let candidates = self.right[r..r + len].to_vec();
        let scores: Vec<f64> = candidates.iter().map(|&x| self.rewards.pair_reward(v, x, false)).collect();
        self.exporter.as_mut().unwrap().record(&candidates, &scores, chosen);
    }
}

#[cfg(test)]
mod test_solver {
    use super::*;
    use crate::common::{Heuristic, PolicyMode};
    use crate::reward::DoubleQRewards;

    fn run(g0: &Graph, g1: &Graph, config: &SearchConfig) -> (Vec<VtxPair>, SearchStats) {
        let mut rewards = DoubleQRewards::new(
            g0.number_vertices(),
            g1.number_vertices(),
            config.policy,
            config.policy_coefficient,
        );
        let mut stats = SearchStats::new();
        let solution = mcs(g0, g1, &mut rewards, config, &mut stats);
        (solution, stats)
    }

    fn triangle() -> Graph {
        let mut g = Graph::new(3, false);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 2, 1);
        g.add_edge(0, 2, 1);
        g
    }

    fn path(n: usize) -> Graph {
        let mut g = Graph::new(n, false);
        for v in 0..n - 1 {
            g.add_edge(v, v + 1, 1);
        }
        g
    }

    #[test]
    fn identical_triangles_map_completely() {
        let g0 = triangle();
        let g1 = triangle();
        let (solution, stats) = run(&g0, &g1, &SearchConfig::default());
        assert_eq!(3, solution.len());
        assert!(check_solution(&g0, &g1, &solution));
        assert!(!stats.is_cancelled());
    }

    #[test]
    fn connected_mode_maps_a_path_onto_an_edge() {
        let g0 = path(4);
        let g1 = path(2);
        let config = SearchConfig { connected: true, ..SearchConfig::default() };
        let (solution, _) = run(&g0, &g1, &config);
        assert_eq!(2, solution.len());
        assert!(check_solution(&g0, &g1, &solution));
    }

    #[test]
    fn label_conflicts_limit_the_mapping_to_one_pair() {
        // Two isolated vertices labelled A, B against an edge labelled B, A: either vertex can
        // be mapped alone but the edge can never be reproduced
        let mut g0 = Graph::new(2, false);
        g0.set_label(0, 1);
        g0.set_label(1, 2);
        let mut g1 = Graph::new(2, false);
        g1.set_label(0, 2);
        g1.set_label(1, 1);
        g1.add_edge(0, 1, 1);
        let config = SearchConfig { vertex_labelled: true, ..SearchConfig::default() };
        let (solution, _) = run(&g0, &g1, &config);
        assert_eq!(1, solution.len());
        assert!(check_solution(&g0, &g1, &solution));
    }

    #[test]
    fn empty_graphs_yield_an_empty_mapping() {
        let g0 = Graph::new(0, false);
        let g1 = Graph::new(0, false);
        let (solution, stats) = run(&g0, &g1, &SearchConfig::default());
        assert!(solution.is_empty());
        assert!(!stats.is_cancelled());
    }

    #[test]
    fn directed_edges_must_agree_on_orientation() {
        let mut g0 = Graph::new(2, true);
        g0.add_edge(0, 1, 1);
        let mut g1 = Graph::new(2, true);
        g1.add_edge(1, 0, 1);
        let config = SearchConfig { directed: true, ..SearchConfig::default() };
        let (solution, _) = run(&g0, &g1, &config);
        assert_eq!(2, solution.len());
        assert!(check_solution(&g0, &g1, &solution));
        // The only 2-mapping reverses the vertices
        let mut pairs = solution.clone();
        pairs.sort_by_key(|p| p.v);
        assert_eq!(vec![VtxPair::new(0, 1), VtxPair::new(1, 0)], pairs);
    }

    #[test]
    fn forced_leaf_matching_keeps_the_mapping_sound() {
        // Stars with 3 and 2 pendant leaves; the common subgraph is the smaller star
        let mut g0 = Graph::new(4, false);
        g0.add_edge(0, 1, 1);
        g0.add_edge(0, 2, 1);
        g0.add_edge(0, 3, 1);
        g0.pack_leaves();
        let mut g1 = Graph::new(3, false);
        g1.add_edge(0, 1, 1);
        g1.add_edge(0, 2, 1);
        g1.pack_leaves();
        let config = SearchConfig { connected: true, ..SearchConfig::default() };
        let (solution, _) = run(&g0, &g1, &config);
        assert_eq!(3, solution.len());
        assert!(check_solution(&g0, &g1, &solution));
    }

    #[test]
    fn the_node_limit_cancels_without_corruption() {
        let g0 = path(6);
        let g1 = path(5);
        let config = SearchConfig { node_limit: Some(1), ..SearchConfig::default() };
        let (solution, stats) = run(&g0, &g1, &config);
        assert!(stats.is_cancelled());
        assert!(check_solution(&g0, &g1, &solution));
        let (full, _) = run(&g0, &g1, &SearchConfig::default());
        assert!(solution.len() <= full.len());
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let g0 = path(5);
        let g1 = triangle();
        let config = SearchConfig { heuristic: Heuristic::MinProduct, ..SearchConfig::default() };
        let (sol_a, stats_a) = run(&g0, &g1, &config);
        let (sol_b, stats_b) = run(&g0, &g1, &config);
        assert_eq!(sol_a, sol_b);
        assert_eq!(stats_a.nodes(), stats_b.nodes());
        assert_eq!(stats_a.cut_branches(), stats_b.cut_branches());
        assert_eq!(stats_a.conflicts(), stats_b.conflicts());
    }

    #[test]
    fn the_incumbent_never_exceeds_the_initial_bound() {
        let g0 = path(5);
        let g1 = path(3);
        let mut rewards = DoubleQRewards::new(5, 3, PolicyMode::Change, 2.0);
        let mut stats = SearchStats::new();
        let config = SearchConfig::default();
        let mut solver = Solver::new(&g0, &g1, &mut rewards, &config, &mut stats);
        let domains = solver.init_domains();
        let initial_bound = calc_bound(&domains);
        solver.left.clear();
        solver.right.clear();
        let solution = solver.search();
        assert!(solution.len() <= initial_bound);
    }

    #[test]
    fn big_first_finds_the_same_size() {
        let g0 = path(5);
        let g1 = path(4);
        let (grown, _) = run(&g0, &g1, &SearchConfig::default());
        let config = SearchConfig { big_first: true, ..SearchConfig::default() };
        let (big_first, _) = run(&g0, &g1, &config);
        assert_eq!(grown.len(), big_first.len());
        assert!(check_solution(&g0, &g1, &big_first));
    }

    #[test]
    fn every_heuristic_agrees_on_the_optimum() {
        let g0 = path(5);
        let g1 = triangle();
        let mut sizes = vec![];
        for heuristic in [Heuristic::MinMax, Heuristic::MinProduct, Heuristic::DegreeSum, Heuristic::RewardBased] {
            let config = SearchConfig { heuristic, ..SearchConfig::default() };
            let (solution, _) = run(&g0, &g1, &config);
            assert!(check_solution(&g0, &g1, &solution));
            sizes.push(solution.len());
        }
        assert!(sizes.windows(2).all(|s| s[0] == s[1]));
    }

    #[test]
    fn backtracking_restores_the_shared_state() {
        let g0 = path(4);
        let g1 = triangle();
        let mut rewards = DoubleQRewards::new(4, 3, PolicyMode::Change, 2.0);
        let mut stats = SearchStats::new();
        let config = SearchConfig::default();
        let mut solver = Solver::new(&g0, &g1, &mut rewards, &config, &mut stats);
        let mut domains = solver.init_domains();
        let mut left_entry = solver.left.clone();
        let mut right_entry = solver.right.clone();
        solver.solve(&mut domains, 1);
        // The buffers hold the same vertex sets as on entry, and no pair or flag survived
        left_entry.sort_unstable();
        right_entry.sort_unstable();
        let mut left_exit = solver.left.clone();
        let mut right_exit = solver.right.clone();
        left_exit.sort_unstable();
        right_exit.sort_unstable();
        assert_eq!(left_entry, left_exit);
        assert_eq!(right_entry, right_exit);
        assert!(solver.current.is_empty());
        assert!(solver.g0_matched.iter().all(|&m| !m));
        assert!(solver.g1_matched.iter().all(|&m| !m));
    }

    #[test]
    fn split_reports_the_bound_reduction() {
        // Matching the middle of a path splits its unique bidomain into the two endpoints
        let g0 = path(3);
        let g1 = path(3);
        let mut rewards = DoubleQRewards::new(3, 3, PolicyMode::Change, 2.0);
        let mut stats = SearchStats::new();
        let config = SearchConfig::default();
        let mut solver = Solver::new(&g0, &g1, &mut rewards, &config, &mut stats);
        let mut domains = solver.init_domains();
        // Take v = 1, w = 1 out of the bidomain, as the search would before splitting
        let v_pos = solver.left.iter().position(|&x| x == 1).unwrap();
        remove_vtx_from_array(&mut solver.left, 0, &mut domains[0].left_len, v_pos);
        let w_pos = solver.right.iter().position(|&x| x == 1).unwrap();
        remove_vtx_from_array(&mut solver.right, 0, &mut domains[0].right_len, w_pos);
        let split = solver.split_domains(&domains, 1, 1);
        assert_eq!(1, split.pairs_added);
        assert_eq!(1, split.new_domains.len());
        assert_eq!(2, split.new_domains[0].left_len);
        assert_eq!(2, split.new_domains[0].right_len);
        assert!(split.new_domains[0].is_adjacent);
        // min(2, 2) of the shrunk bidomain against min(2, 2) of its adjacent child
        assert_eq!(0, split.gain);
    }
}
