use criterion::{criterion_group, criterion_main, Criterion};

use mcsplit::common::{Heuristic, SearchConfig};
use mcsplit::core::graph::Graph;
use mcsplit::reward::DoubleQRewards;
use mcsplit::solver::mcs;
use mcsplit::statistics::SearchStats;

fn circulant(n: usize, strides: &[usize]) -> Graph {
    let mut g = Graph::new(n, false);
    for v in 0..n {
        for &s in strides {
            g.add_edge(v, (v + s) % n, 1);
        }
    }
    g.pack_leaves();
    g
}

macro_rules! set_up_solvers {
    ($c:ident, $($name:literal: [$g0:expr, $g1:expr, $heuristic:ident],)*) => {
        $(
            let g0 = $g0;
            let g1 = $g1;
            let config = SearchConfig { heuristic: Heuristic::$heuristic, ..SearchConfig::default() };
            $c.bench_function($name, |b| b.iter(|| {
                let mut rewards = DoubleQRewards::new(
                    g0.number_vertices(),
                    g1.number_vertices(),
                    config.policy,
                    config.policy_coefficient,
                );
                let mut stats = SearchStats::new();
                mcs(&g0, &g1, &mut rewards, &config, &mut stats)
            }));
        )*
    }
}

pub fn bench(c: &mut Criterion) {
    set_up_solvers! {
        c,
        "circulant_10_9_min_max": [circulant(10, &[1, 2]), circulant(9, &[1, 3]), MinMax],
        "circulant_10_9_min_product": [circulant(10, &[1, 2]), circulant(9, &[1, 3]), MinProduct],
        "circulant_12_8_reward_based": [circulant(12, &[1, 4]), circulant(8, &[1, 2]), RewardBased],
    }
}

criterion_group!(benches, bench);
criterion_main!(benches);
