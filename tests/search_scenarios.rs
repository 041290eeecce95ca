//! End-to-end search scenarios on synthetic tabular data.
//!
//! All scenarios use seeded samplers, so outcomes are reproducible.

use beamex::{
    Anywhere, BinRange, BoundedNeighborhood, ExplainOptions, Explainer, FidelityMetric,
    Restriction, SimpleMatching, SizeMetric, StepExpandStrategy, Structure, TabularSampler,
    Termination, UniformDiscretizer,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 1-D training rows spanning [0, 1] so a 10-bin uniform grid has decile edges.
fn rows_1d() -> (Vec<Vec<f64>>, Vec<u32>) {
    let x: Vec<Vec<f64>> = (0..=100).map(|i| vec![f64::from(i) / 100.0]).collect();
    let y = vec![1; x.len()];
    (x, y)
}

fn explainer_1d(predict: impl Fn(&[f64]) -> u32 + 'static, seed: u64) -> Explainer {
    init_logs();
    let mut explainer = Explainer::new(
        UniformDiscretizer::new(10),
        TabularSampler::with_seed(predict, seed),
        StepExpandStrategy::new(1),
    );
    let (x, y) = rows_1d();
    explainer.fit(&x, &y).unwrap();
    explainer
}

fn fidelity_at_least(minimum: f64) -> Restriction {
    Restriction::new(FidelityMetric::new(SimpleMatching::new(1)), minimum)
}

fn options(beam_size: usize, n_iterations: usize) -> ExplainOptions {
    ExplainOptions {
        tolerance: 0.01,
        n_iterations,
        beam_size,
    }
}

#[test]
fn constant_class_region_grows_one_bin_per_round() {
    // Fidelity is 1.0 everywhere, so growth is limited only by the round count:
    // from [3,3], five rounds of single-step beam-1 growth reach width 4 in the
    // hall of fame (the fifth round's novel offspring is not selected yet).
    let mut explainer = explainer_1d(|_| 1, 11);
    let report = explainer
        .explain_report(
            &[0.32],
            &SizeMetric,
            &Anywhere,
            &fidelity_at_least(0.9),
            options(1, 5),
        )
        .unwrap();

    assert_eq!(report.termination, Termination::Exhausted);
    assert_eq!(report.rounds, 5);
    let range = report.best.structure.range(0);
    assert!(range.low <= 3 && 3 <= range.high, "factual bin must stay inside");
    assert_eq!(report.best.structure.total_width(), 4);
}

#[test]
fn constant_class_region_converges_at_the_grid_boundary() {
    let mut explainer = explainer_1d(|_| 1, 13);
    let report = explainer
        .explain_report(
            &[0.32],
            &SizeMetric,
            &Anywhere,
            &fidelity_at_least(0.9),
            options(1, 50),
        )
        .unwrap();

    assert_eq!(report.termination, Termination::Converged);
    assert_eq!(report.best.structure.range(0), BinRange::new(0, 9));
}

#[test]
fn growth_stops_where_fidelity_provably_drops() {
    // Class flips at 0.5: bins 0..=4 are pure class 1, bin 5 dilutes any
    // region that includes it to ~0.83 fidelity, provably below 0.9.
    let mut explainer = explainer_1d(|p| u32::from(p[0] < 0.5), 17);
    let report = explainer
        .explain_report(
            &[0.32],
            &SizeMetric,
            &Anywhere,
            &fidelity_at_least(0.9),
            options(1, 50),
        )
        .unwrap();

    assert_eq!(report.termination, Termination::Converged);
    assert_eq!(report.best.structure.range(0), BinRange::new(0, 4));
    // The best explanation is provably faithful.
    assert!(report.best.restriction_score.lb() > 0.9 - 0.01);
}

#[test]
fn five_round_budget_reports_exhaustion_before_the_frontier() {
    let mut explainer = explainer_1d(|p| u32::from(p[0] < 0.5), 17);
    let report = explainer
        .explain_report(
            &[0.32],
            &SizeMetric,
            &Anywhere,
            &fidelity_at_least(0.9),
            options(1, 5),
        )
        .unwrap();

    assert_eq!(report.termination, Termination::Exhausted);
    assert_eq!(report.best.structure.range(0), BinRange::new(0, 4));
}

#[test]
fn factual_point_at_the_edge_grows_inward_only() {
    let mut explainer = explainer_1d(|_| 1, 19);
    let report = explainer
        .explain_report(
            &[0.95],
            &SizeMetric,
            &Anywhere,
            &fidelity_at_least(0.9),
            options(1, 3),
        )
        .unwrap();

    let range = report.best.structure.range(0);
    assert_eq!(range.high, 9, "right edge cannot move past the grid");
    assert!(range.low >= 7, "three rounds can grow at most three bins");
}

#[test]
fn bounded_neighborhood_fences_the_search() {
    let mut explainer = explainer_1d(|_| 1, 23);
    let fence = BoundedNeighborhood::new(Structure::new(vec![BinRange::new(2, 6)]));
    let report = explainer
        .explain_report(
            &[0.32],
            &SizeMetric,
            &fence,
            &fidelity_at_least(0.9),
            options(1, 50),
        )
        .unwrap();

    assert_eq!(report.termination, Termination::Converged);
    assert_eq!(report.best.structure.range(0), BinRange::new(2, 6));
}

#[test]
fn two_feature_search_respects_the_class_boundary() {
    // Class 1 iff both coordinates are below 0.5.
    let x: Vec<Vec<f64>> = (0..=20)
        .flat_map(|i| (0..=20).map(move |j| vec![f64::from(i) / 20.0, f64::from(j) / 20.0]))
        .collect();
    let y: Vec<u32> = x.iter().map(|p| u32::from(p[0] < 0.5 && p[1] < 0.5)).collect();

    init_logs();
    let mut explainer = Explainer::new(
        UniformDiscretizer::new(10),
        TabularSampler::with_seed(|p: &[f64]| u32::from(p[0] < 0.5 && p[1] < 0.5), 29),
        StepExpandStrategy::new(1),
    );
    explainer.fit(&x, &y).unwrap();

    let report = explainer
        .explain_report(
            &[0.32, 0.41],
            &SizeMetric,
            &Anywhere,
            &fidelity_at_least(0.9),
            options(2, 4),
        )
        .unwrap();

    let structure = &report.best.structure;
    assert!(structure.contains(&Structure::from_point_bins(&[3, 4])));
    for feature in 0..2 {
        assert!(
            structure.range(feature).high <= 4,
            "feature {feature} crossed the class boundary: {structure:?}"
        );
    }
    assert!(report.best.restriction_score.lb() > 0.9 - 0.01);
}

#[test]
fn repeated_explains_reuse_the_fitted_state() {
    let mut explainer = explainer_1d(|p| u32::from(p[0] < 0.5), 31);
    let first = explainer
        .explain(
            &[0.32],
            &SizeMetric,
            &Anywhere,
            &fidelity_at_least(0.9),
            options(1, 50),
        )
        .unwrap();
    let second = explainer
        .explain(
            &[0.12],
            &SizeMetric,
            &Anywhere,
            &fidelity_at_least(0.9),
            options(1, 50),
        )
        .unwrap();
    assert_eq!(first.structure.range(0), BinRange::new(0, 4));
    assert_eq!(second.structure.range(0), BinRange::new(0, 4));
}
