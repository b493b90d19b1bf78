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

//! This module implements the learned rewards that guide the branching decisions. A reward is
//! an accumulated score: every domain split that shrinks the candidate space (positive
//! information gain) credits the chosen vertex and the chosen pair. Two independent policy
//! tables are maintained and the engine switches between them when the search stalls, which
//! diversifies the explored region without restarting.

use crate::common::PolicyMode;
use crate::core::bidomain::SplitOutcome;
use crate::statistics::SearchStats;

/// Ceiling above which a vertex table is halved
pub const VERTEX_REWARD_CEILING: f64 = 1e5;
/// Ceiling above which a pair table is halved
pub const PAIR_REWARD_CEILING: f64 = 1e9;

const NUMBER_POLICIES: usize = 2;

/// Interface of the reward engine consumed by the solver. One concrete implementation is
/// provided; alternate table layouts (e.g., a single pair table shared by all vertices) can be
/// plugged in behind this trait.
pub trait Rewards {
    /// Learned priority of mapping vertex `v` of the pattern graph. When `normalized` is true
    /// the score is scaled into [0, 1] by the current maximum of the active table.
    fn vertex_reward(&self, v: usize, normalized: bool) -> f64;
    /// Learned priority of the pair (v, w)
    fn pair_reward(&self, v: usize, w: usize, normalized: bool) -> f64;
    /// Credits (v, w) with the information gain of a split
    fn update_rewards(&mut self, split: &SplitOutcome, v: usize, w: usize, stats: &mut SearchStats);
    /// Resets the policy counter on an incumbent improvement, increments it otherwise. When the
    /// counter exceeds its threshold the active policy is switched.
    fn update_policy_counter(&mut self, improved: bool);
}

/// The double-table reward engine: one vertex table per policy, and per left vertex one pair
/// table per policy. Scores are halved table-wide whenever an entry exceeds its ceiling, which
/// keeps the magnitudes bounded while preserving the relative ordering.
pub struct DoubleQRewards {
    /// Per policy, the accumulated score of each left vertex
    vertex: Vec<Vec<f64>>,
    /// Per left vertex and policy, the accumulated score of each right vertex
    pair: Vec<Vec<Vec<f64>>>,
    /// Largest entry of each vertex table, kept for normalization
    vertex_max: Vec<f64>,
    current_policy: usize,
    switch_counter: usize,
    /// Number of non-improving decisions after which the policy is switched
    threshold: usize,
    mode: PolicyMode,
    n0: usize,
}

impl DoubleQRewards {

    pub fn new(n0: usize, n1: usize, mode: PolicyMode, coefficient: f64) -> Self {
        Self {
            vertex: vec![vec![0.0; n0]; NUMBER_POLICIES],
            pair: vec![vec![vec![0.0; n1]; NUMBER_POLICIES]; n0],
            vertex_max: vec![0.0; NUMBER_POLICIES],
            current_policy: 0,
            switch_counter: 0,
            threshold: (coefficient * n0.min(n1) as f64) as usize,
            mode,
            n0,
        }
    }

    pub fn current_policy(&self) -> usize {
        self.current_policy
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    fn switch_policy(&mut self) {
        match self.mode {
            PolicyMode::Change => {
                self.current_policy = 1 - self.current_policy;
            },
            PolicyMode::Reset => {
                let p = self.current_policy;
                self.vertex[p].iter_mut().for_each(|x| *x = 0.0);
                self.vertex_max[p] = 0.0;
                for v in 0..self.n0 {
                    self.pair[v][p].iter_mut().for_each(|x| *x = 0.0);
                }
            },
            PolicyMode::Random => {
                let p = self.current_policy;
                self.vertex[p].iter_mut().for_each(|x| *x = rand::random::<f64>());
                self.vertex_max[p] = self.vertex[p].iter().copied().fold(0.0, f64::max);
                for v in 0..self.n0 {
                    self.pair[v][p].iter_mut().for_each(|x| *x = rand::random::<f64>());
                }
            },
        }
    }
}

impl Rewards for DoubleQRewards {

    fn vertex_reward(&self, v: usize, normalized: bool) -> f64 {
        let score = self.vertex[self.current_policy][v];
        if normalized {
            let max = self.vertex_max[self.current_policy];
            if max > 0.0 { score / max } else { 0.0 }
        } else {
            score
        }
    }

    fn pair_reward(&self, v: usize, w: usize, normalized: bool) -> f64 {
        let table = &self.pair[v][self.current_policy];
        let score = table[w];
        if normalized {
            let max = table.iter().copied().fold(0.0, f64::max);
            if max > 0.0 { score / max } else { 0.0 }
        } else {
            score
        }
    }

    /// The credited amount is the information gain of the split, plus a bonus of one per child
    /// domain for the first policy table. Both policy tables are updated on every split; a
    /// positive amount is counted as a single conflict.
    fn update_rewards(&mut self, split: &SplitOutcome, v: usize, w: usize, stats: &mut SearchStats) {
        for p in 0..NUMBER_POLICIES {
            let bonus = if p == 0 { split.new_domains.len() as i64 } else { 0 };
            let amount = split.gain + bonus;
            if amount <= 0 {
                continue;
            }
            if p == 0 {
                stats.conflict();
            }
            self.vertex[p][v] += amount as f64;
            if self.vertex[p][v] > self.vertex_max[p] {
                self.vertex_max[p] = self.vertex[p][v];
            }
            self.pair[v][p][w] += amount as f64;
            if self.vertex[p][v] > VERTEX_REWARD_CEILING {
                self.vertex[p].iter_mut().for_each(|x| *x /= 2.0);
                self.vertex_max[p] /= 2.0;
            }
            if self.pair[v][p][w] > PAIR_REWARD_CEILING {
                self.pair[v][p].iter_mut().for_each(|x| *x /= 2.0);
            }
        }
    }

    fn update_policy_counter(&mut self, improved: bool) {
        if improved {
            self.switch_counter = 0;
        } else {
            self.switch_counter += 1;
            if self.switch_counter > self.threshold {
                self.switch_counter = 0;
                self.switch_policy();
            }
        }
    }
}

#[cfg(test)]
mod test_rewards {
    use assert_float_eq::*;

    use super::*;
    use crate::core::bidomain::{Bidomain, SplitOutcome};

    fn split_with_gain(gain: i64, children: usize) -> SplitOutcome {
        SplitOutcome {
            new_domains: (0..children).map(|i| Bidomain::new(i, i, 1, 1, true)).collect(),
            gain,
            pairs_added: 1,
        }
    }

    #[test]
    fn positive_gain_credits_both_tables() {
        let mut rewards = DoubleQRewards::new(4, 4, PolicyMode::Change, 2.0);
        let mut stats = SearchStats::new();
        rewards.update_rewards(&split_with_gain(3, 2), 1, 2, &mut stats);
        // First policy table gets the child-count bonus, the second does not
        assert_float_absolute_eq!(5.0, rewards.vertex[0][1]);
        assert_float_absolute_eq!(3.0, rewards.vertex[1][1]);
        assert_float_absolute_eq!(5.0, rewards.pair[1][0][2]);
        assert_float_absolute_eq!(3.0, rewards.pair[1][1][2]);
        assert_eq!(1, stats.conflicts());
    }

    #[test]
    fn non_positive_gain_is_ignored() {
        let mut rewards = DoubleQRewards::new(4, 4, PolicyMode::Change, 2.0);
        let mut stats = SearchStats::new();
        rewards.update_rewards(&split_with_gain(0, 0), 0, 0, &mut stats);
        assert_float_absolute_eq!(0.0, rewards.vertex_reward(0, false));
        assert_eq!(0, stats.conflicts());
    }

    #[test]
    fn halving_preserves_the_argmax() {
        let mut rewards = DoubleQRewards::new(3, 3, PolicyMode::Change, 2.0);
        let mut stats = SearchStats::new();
        rewards.update_rewards(&split_with_gain(10, 0), 0, 0, &mut stats);
        rewards.update_rewards(&split_with_gain(30, 0), 1, 1, &mut stats);
        let argmax_before = (0..3).max_by(|&a, &b| {
            rewards.vertex_reward(a, false).partial_cmp(&rewards.vertex_reward(b, false)).unwrap()
        }).unwrap();
        // Push vertex 1 over the ceiling so that the whole table is halved
        rewards.update_rewards(&split_with_gain(VERTEX_REWARD_CEILING as i64, 0), 1, 1, &mut stats);
        let argmax_after = (0..3).max_by(|&a, &b| {
            rewards.vertex_reward(a, false).partial_cmp(&rewards.vertex_reward(b, false)).unwrap()
        }).unwrap();
        assert_eq!(argmax_before, argmax_after);
        assert!(rewards.vertex_reward(1, false) <= VERTEX_REWARD_CEILING);
        assert_float_absolute_eq!(5.0, rewards.vertex_reward(0, false));
    }

    #[test]
    fn normalized_rewards_are_scaled_by_the_maximum() {
        let mut rewards = DoubleQRewards::new(3, 3, PolicyMode::Change, 2.0);
        let mut stats = SearchStats::new();
        rewards.update_rewards(&split_with_gain(5, 0), 0, 1, &mut stats);
        rewards.update_rewards(&split_with_gain(10, 0), 2, 1, &mut stats);
        assert_float_absolute_eq!(0.5, rewards.vertex_reward(0, true));
        assert_float_absolute_eq!(1.0, rewards.vertex_reward(2, true));
        assert_float_absolute_eq!(0.0, rewards.vertex_reward(1, true));
    }

    #[test]
    fn change_mode_swaps_the_active_table() {
        let mut rewards = DoubleQRewards::new(2, 2, PolicyMode::Change, 1.0);
        assert_eq!(2, rewards.threshold());
        assert_eq!(0, rewards.current_policy());
        for _ in 0..3 {
            rewards.update_policy_counter(false);
        }
        assert_eq!(1, rewards.current_policy());
        // The counter restarts after a switch
        rewards.update_policy_counter(false);
        assert_eq!(1, rewards.current_policy());
    }

    #[test]
    fn improvement_resets_the_counter() {
        let mut rewards = DoubleQRewards::new(2, 2, PolicyMode::Change, 1.0);
        rewards.update_policy_counter(false);
        rewards.update_policy_counter(false);
        rewards.update_policy_counter(true);
        rewards.update_policy_counter(false);
        assert_eq!(0, rewards.current_policy());
    }

    #[test]
    fn reset_mode_zeroes_the_active_table() {
        let mut rewards = DoubleQRewards::new(2, 2, PolicyMode::Reset, 0.5);
        let mut stats = SearchStats::new();
        rewards.update_rewards(&split_with_gain(4, 0), 0, 1, &mut stats);
        assert_float_absolute_eq!(4.0, rewards.vertex_reward(0, false));
        for _ in 0..2 {
            rewards.update_policy_counter(false);
        }
        assert_eq!(0, rewards.current_policy());
        assert_float_absolute_eq!(0.0, rewards.vertex_reward(0, false));
        assert_float_absolute_eq!(0.0, rewards.pair_reward(0, 1, false));
    }
}
