//! `beamex`: beam-search decision-region explanations for black-box
//! predictors, with bandit-style adaptive sampling.
//!
//! Given a fitted discretization of feature space and a predictor reachable
//! only through sampling, `beamex` searches for a minimal, high-fidelity
//! hyper-rectangular region ("explanation") around a queried point. Candidate
//! regions are grown by beam search and scored with two interval-valued
//! statistics estimated from finite samples:
//!
//! - a **utility** (the objective, e.g. region size — [`SizeMetric`]), and
//! - a **restriction** (a constraint statistic, e.g. fidelity — the fraction
//!   of sampled points in the region sharing the queried point's predicted
//!   class, [`FidelityMetric`]).
//!
//! The statistical engine treats candidates as arms of a bandit:
//!
//! - [`select_top_m`]: LUCB-style best/worst-arm elimination that returns the
//!   `m` candidates most likely to be the true top-`m`, requesting more
//!   samples only where the ranking is not yet provably settled within a
//!   tolerance. Exact (sample-free) metrics bypass the loop with a stable
//!   sort, keyed off [`Metric::is_estimation`].
//! - [`is_valid`]: a sequential validity test deciding whether one candidate
//!   provably exceeds a [`Restriction`] threshold, narrowing its confidence
//!   interval adaptively instead of fixing a sample size upfront.
//! - [`Explainer`]: the beam-search driver consuming both across rounds,
//!   deduplicating the combinatorial structure space by value and keeping a
//!   hall of fame so the best explanation seen is never lost.
//!
//! **Goals:**
//! - **Deterministic by default**: samplers are seedable; same seed + data →
//!   same explanation.
//! - **Sample-frugal**: adaptive sampling spends oracle calls only on
//!   contested comparisons, splitting each refinement between the two closest
//!   competitors.
//! - **Bounded**: every sequential loop carries a hard resolution budget and
//!   surfaces [`Error::UnresolvedBounds`] instead of stalling on a
//!   confidence-interval floor.
//! - **Replaceable policy**: discretization ([`Discretizer`]), sampling
//!   ([`Sampler`]), expansion ([`ExpandStrategy`]), neighborhood bounds
//!   ([`Neighborhood`]) and match signals ([`GroupingMeasure`]) are traits
//!   with tabular reference implementations.
//!
//! **Non-goals:**
//! - Not a model-training library: the predictor is a black box.
//! - No dataset loading, plotting, or CLI.
//!
//! # Example
//!
//! ```
//! use beamex::{
//!     Anywhere, ExplainOptions, Explainer, FidelityMetric, Restriction, SimpleMatching,
//!     SizeMetric, StepExpandStrategy, TabularSampler, UniformDiscretizer,
//! };
//!
//! // A 1-D dataset on [0, 1] and a predictor that flips class at 0.5.
//! let x: Vec<Vec<f64>> = (0..=100).map(|i| vec![f64::from(i) / 100.0]).collect();
//! let y: Vec<u32> = x.iter().map(|p| u32::from(p[0] < 0.5)).collect();
//!
//! let mut explainer = Explainer::new(
//!     UniformDiscretizer::new(10),
//!     TabularSampler::with_seed(|p: &[f64]| u32::from(p[0] < 0.5), 7),
//!     StepExpandStrategy::new(1),
//! );
//! explainer.fit(&x, &y).unwrap();
//!
//! let restriction = Restriction::new(FidelityMetric::new(SimpleMatching::new(1)), 0.9);
//! let best = explainer
//!     .explain(&[0.32], &SizeMetric, &Anywhere, &restriction, ExplainOptions::default())
//!     .unwrap();
//!
//! // The region contains the queried point's bin and stays on the class-1 side.
//! assert!(best.structure.range(0).low <= 3 && 3 <= best.structure.range(0).high);
//! ```

#![forbid(unsafe_code)]

mod bounds;
pub use bounds::*;

mod candidate;
pub use candidate::*;

mod discretizer;
pub use discretizer::*;

mod error;
pub use error::*;

mod expand;
pub use expand::*;

mod explainer;
pub use explainer::*;

mod grouping;
pub use grouping::*;

mod mab;
pub use mab::*;

mod metric;
pub use metric::*;

mod neighborhood;
pub use neighborhood::*;

mod sampler;
pub use sampler::*;

mod score;
pub use score::*;

mod structure;
pub use structure::*;

mod validity;
pub use validity::*;
