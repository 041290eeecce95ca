//! Property tests for the selector, the concentration bounds, and score
//! folding.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use beamex::{
    hoeffding_bounds, hoeffding_half_width, BinGrid, BinRange, Candidate, Error, FidelityMetric,
    Metric, Resampler, SampleBatch, Sampler, ScoreKind, Score, SimpleMatching, SizeMetric,
    Structure, select_top_m,
};

/// Deterministic oracle stand-in: each structure has a fixed hit rate, and a
/// batch of n points carries round(rate * n) matching labels.
struct RateSampler {
    rates: HashMap<Structure, f64>,
}

impl Sampler for RateSampler {
    fn fit_discretizer(&mut self, _grid: &BinGrid) -> Result<(), Error> {
        Ok(())
    }

    fn sample(&mut self, structure: &Structure, n_points: usize) -> Result<SampleBatch, Error> {
        let rate = self.rates[structure];
        let hits = (rate * n_points as f64).round() as usize;
        let labels: Vec<u32> = (0..n_points).map(|i| u32::from(i < hits)).collect();
        Ok(SampleBatch {
            points: vec![vec![0.0]; n_points],
            labels,
        })
    }
}

fn estimated_arm(bin: u32, rate: f64, n: usize) -> Candidate {
    let (lb, ub) = hoeffding_bounds(rate, n, 0.05);
    Candidate::new(
        Structure::new(vec![BinRange::new(0, bin)]),
        Score::exact(f64::from(bin)),
        Score::estimated(rate, lb, ub, n),
    )
}

fn batch_with_labels(labels: Vec<u32>) -> SampleBatch {
    SampleBatch {
        points: labels.iter().map(|_| vec![0.0]).collect(),
        labels,
    }
}

/// Well-separated hit rates in a random order: gaps of 0.18 dominate both the
/// tolerance and the interval floor a few refinement batches can reach.
fn separated_rates() -> impl Strategy<Value = Vec<f64>> {
    (2usize..=5)
        .prop_flat_map(|k| {
            let rates: Vec<f64> = (0..k).map(|i| 0.05 + 0.18 * i as f64).collect();
            Just(rates).prop_shuffle()
        })
}

proptest! {
    #[test]
    fn exact_selection_is_sort_and_truncate(
        widths in proptest::collection::vec(0u32..1_000, 1..20),
        m in 1usize..25,
    ) {
        let utility = SizeMetric;
        let restriction = FidelityMetric::new(SimpleMatching::new(1));
        let mut pool: Vec<Candidate> = widths
            .iter()
            .map(|&w| {
                Candidate::new(
                    Structure::new(vec![BinRange::new(0, w)]),
                    Score::exact(f64::from(w)),
                    Score::exact(0.0),
                )
            })
            .collect();
        let entrants: Vec<usize> = (0..pool.len()).collect();
        let mut sampler = RateSampler { rates: HashMap::new() };
        let mut ctx = Resampler {
            sampler: &mut sampler,
            utility: &utility,
            restriction: &restriction,
        };

        let top = select_top_m(
            &mut pool,
            &entrants,
            m,
            0.01,
            ScoreKind::Utility,
            &utility,
            &mut ctx,
            100,
        )
        .unwrap();

        let mut expected = entrants.clone();
        expected.sort_by(|&a, &b| widths[b].cmp(&widths[a]));
        expected.truncate(m);
        prop_assert_eq!(top, expected);
    }

    #[test]
    fn estimated_selection_finds_the_true_top_m_of_separated_arms(
        rates in separated_rates(),
        m in 1usize..=5,
    ) {
        let m = m.min(rates.len());
        let fidelity = FidelityMetric::new(SimpleMatching::new(1));
        let utility = SizeMetric;
        let mut pool: Vec<Candidate> = rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| estimated_arm(i as u32, rate, 100))
            .collect();
        let mut sampler = RateSampler {
            rates: pool
                .iter()
                .zip(&rates)
                .map(|(c, &r)| (c.structure.clone(), r))
                .collect(),
        };
        let entrants: Vec<usize> = (0..pool.len()).collect();
        let mut ctx = Resampler {
            sampler: &mut sampler,
            utility: &utility,
            restriction: &fidelity,
        };

        let top = select_top_m(
            &mut pool,
            &entrants,
            m,
            0.05,
            ScoreKind::Restriction,
            &fidelity,
            &mut ctx,
            10_000,
        )
        .unwrap();

        let mut by_rate = entrants.clone();
        by_rate.sort_by(|&a, &b| rates[b].total_cmp(&rates[a]));
        let expected: HashSet<usize> = by_rate.into_iter().take(m).collect();
        let got: HashSet<usize> = top.iter().copied().collect();
        prop_assert_eq!(got.len(), top.len(), "selection must not repeat an arm");
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn selection_is_a_bounded_subset_of_the_entrants(
        rates in proptest::collection::vec(0.0f64..=1.0, 1..8),
        m in 1usize..8,
    ) {
        let fidelity = FidelityMetric::new(SimpleMatching::new(1));
        let utility = SizeMetric;
        let mut pool: Vec<Candidate> = rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| estimated_arm(i as u32, rate, 100))
            .collect();
        let mut sampler = RateSampler {
            rates: pool
                .iter()
                .zip(&rates)
                .map(|(c, &r)| (c.structure.clone(), r))
                .collect(),
        };
        let entrants: Vec<usize> = (0..pool.len()).collect();
        let mut ctx = Resampler {
            sampler: &mut sampler,
            utility: &utility,
            restriction: &fidelity,
        };

        // Arbitrary rates may be statistically indistinguishable, so hitting
        // the round budget is an acceptable outcome; a wrong-shaped success
        // never is.
        match select_top_m(
            &mut pool,
            &entrants,
            m,
            0.05,
            ScoreKind::Restriction,
            &fidelity,
            &mut ctx,
            200,
        ) {
            Ok(top) => {
                prop_assert!(top.len() <= m);
                if m >= entrants.len() {
                    prop_assert_eq!(top.len(), entrants.len());
                }
                let mut seen = HashSet::new();
                for idx in &top {
                    prop_assert!(entrants.contains(idx));
                    prop_assert!(seen.insert(*idx), "duplicate index {}", idx);
                }
            }
            Err(Error::UnresolvedBounds { rounds }) => prop_assert_eq!(rounds, 200),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn hoeffding_interval_narrows_with_evidence_and_significance(
        mean in 0.0f64..=1.0,
        n1 in 1usize..10_000,
        extra in 1usize..10_000,
        p in 0.001f64..0.5,
    ) {
        let n2 = n1 + extra;
        prop_assert!(hoeffding_half_width(n2, p) < hoeffding_half_width(n1, p));
        prop_assert!(hoeffding_half_width(n1, p * 1.5) < hoeffding_half_width(n1, p));

        let (lb, ub) = hoeffding_bounds(mean, n1, p);
        prop_assert!(lb <= mean && mean <= ub);
        prop_assert!((mean - lb - (ub - mean)).abs() < 1e-12, "interval must be symmetric");
    }

    #[test]
    fn fold_order_never_changes_the_combined_estimate(
        labels in proptest::collection::vec(0u32..=1, 2..200),
        split in 1usize..199,
    ) {
        let split = split.min(labels.len() - 1);
        let metric = FidelityMetric::new(SimpleMatching::new(1));
        let region = Structure::from_point_bins(&[0]);
        let (head, tail) = labels.split_at(split);

        let whole = metric
            .calculate(&batch_with_labels(labels.clone()), &region, None)
            .unwrap();
        let forward = {
            let first = metric
                .calculate(&batch_with_labels(head.to_vec()), &region, None)
                .unwrap();
            metric
                .calculate(&batch_with_labels(tail.to_vec()), &region, Some(&first))
                .unwrap()
        };
        let backward = {
            let first = metric
                .calculate(&batch_with_labels(tail.to_vec()), &region, None)
                .unwrap();
            metric
                .calculate(&batch_with_labels(head.to_vec()), &region, Some(&first))
                .unwrap()
        };

        prop_assert!((whole.score() - forward.score()).abs() < 1e-12);
        prop_assert!((forward.score() - backward.score()).abs() < 1e-12);
        prop_assert_eq!(whole.n_points, labels.len());
        prop_assert_eq!(forward.n_points, backward.n_points);
    }

    #[test]
    fn grown_structures_contain_their_origin(
        bins in proptest::collection::vec((0u32..50, 0u32..10), 1..6),
        feature_pick in 0usize..6,
        grow_left in 0u32..5,
        grow_right in 0u32..5,
    ) {
        let origin = Structure::new(
            bins.iter()
                .map(|&(low, extent)| BinRange::new(low, low + extent))
                .collect(),
        );
        let feature = feature_pick % origin.n_features();
        let old = origin.range(feature);
        let wider = BinRange::new(old.low.saturating_sub(grow_left), old.high + grow_right);

        let grown = origin.grown(feature, wider).unwrap();
        prop_assert!(grown.contains(&origin));
        prop_assert!(grown.total_width() >= origin.total_width());
        if wider == old {
            prop_assert_eq!(&grown, &origin);
        } else {
            prop_assert!(origin != grown);
            let mut seen = HashSet::new();
            seen.insert(origin.clone());
            prop_assert!(seen.insert(grown), "distinct regions must hash apart");
        }
    }
}
