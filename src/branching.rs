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

use crate::common::{Heuristic, SearchConfig};
use crate::core::bidomain::Bidomain;
use crate::core::graph::Graph;
use crate::reward::Rewards;

/// Weight of one already-matched neighbour when scoring a candidate pair. Pairs that extend the
/// connectivity of the partial mapping dominate the learned pair reward.
const OVERLAP_BONUS: f64 = 100.0;

/// Selects the bidomain to branch on: the one with the smallest score under the configured
/// heuristic, breaking ties on the smallest vertex that [select_v_index] would pick in it.
/// Non-adjacent bidomains are skipped in connected mode once the mapping is non-empty, so this
/// returns None when no branching is possible.
pub fn select_bidomain<R: Rewards>(
    domains: &[Bidomain],
    left: &[usize],
    rewards: &R,
    config: &SearchConfig,
    current_matching_size: usize,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut min_score = f64::MAX;
    let mut min_tie_breaker = usize::MAX;
    for (i, bd) in domains.iter().enumerate() {
        if config.connected && current_matching_size > 0 && !bd.is_adjacent {
            continue;
        }
        let score = match config.heuristic {
            Heuristic::MinMax => bd.left_len.max(bd.right_len) as f64,
            Heuristic::MinProduct => (bd.left_len * bd.right_len) as f64,
            Heuristic::DegreeSum => left[bd.l..bd.l + bd.left_len].iter().sum::<usize>() as f64,
            Heuristic::RewardBased => left[bd.l..bd.l + bd.left_len]
                .iter()
                .map(|&v| rewards.vertex_reward(v, true))
                .sum(),
        };
        if score < min_score {
            min_score = score;
            min_tie_breaker = left[bd.l + select_v_index(left, rewards, bd.l, bd.left_len).unwrap()];
            best = Some(i);
        } else if score == min_score {
            let tie_breaker = left[bd.l + select_v_index(left, rewards, bd.l, bd.left_len).unwrap()];
            if tie_breaker < min_tie_breaker {
                min_tie_breaker = tie_breaker;
                best = Some(i);
            }
        }
    }
    best
}

/// Selects, within `left[start..start + len]`, the position of the vertex with the maximal
/// learned reward, ties broken on the smallest vertex id
pub fn select_v_index<R: Rewards>(left: &[usize], rewards: &R, start: usize, len: usize) -> Option<usize> {
    let mut idx: Option<usize> = None;
    let mut max_reward = -1.0;
    let mut best_vtx = usize::MAX;
    for i in 0..len {
        let vtx = left[start + i];
        let reward = rewards.vertex_reward(vtx, false);
        if reward > max_reward || (reward == max_reward && vtx < best_vtx) {
            idx = Some(i);
            best_vtx = vtx;
            max_reward = reward;
        }
    }
    idx
}

/// Selects, within `right[start..start + len]`, the position of the best untried partner for
/// `v`: maximal pair reward plus a bonus for every already-matched neighbour of either
/// endpoint, ties broken on the smallest vertex id
#[allow(clippy::too_many_arguments)]
pub fn select_w_index<R: Rewards>(
    right: &[usize],
    rewards: &R,
    start: usize,
    len: usize,
    wselected: &[bool],
    v: usize,
    g0: &Graph,
    g1: &Graph,
    g0_matched: &[bool],
    g1_matched: &[bool],
) -> Option<usize> {
    let v_overlap = matched_neighbours(g0, g0_matched, v);
    let mut idx: Option<usize> = None;
    let mut max_score = -1.0;
    let mut best_vtx = usize::MAX;
    for i in 0..len {
        let vtx = right[start + i];
        if wselected[vtx] {
            continue;
        }
        let overlap = (v_overlap + matched_neighbours(g1, g1_matched, vtx)) as f64;
        let score = rewards.pair_reward(v, vtx, false) + OVERLAP_BONUS * overlap;
        if score > max_score || (score == max_score && vtx < best_vtx) {
            idx = Some(i);
            best_vtx = vtx;
            max_score = score;
        }
    }
    idx
}

fn matched_neighbours(g: &Graph, matched: &[bool], v: usize) -> usize {
    g.neighbours(v).filter(|&u| matched[u]).count()
}
