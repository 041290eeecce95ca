//! Beam-search driver over the region space.
//!
//! The [`Explainer`] grows a discretized region around a queried point: each
//! round it keeps the `beam_size` best candidates (valid ones ranked by
//! utility, with spare beam slots backfilled from invalid candidates ranked by
//! restriction-closeness), expands the survivors through the expansion policy,
//! and folds the survivors into a hall of fame so the overall best explanation
//! is never lost to a later, worse round. Structures are deduplicated across
//! the whole run by value, so re-deriving a region never re-scores it.

use std::collections::HashSet;

use log::debug;

use crate::candidate::{Candidate, Resampler, ScoreKind};
use crate::discretizer::Discretizer;
use crate::error::Error;
use crate::expand::ExpandStrategy;
use crate::mab::select_top_m;
use crate::metric::Metric;
use crate::neighborhood::Neighborhood;
use crate::sampler::Sampler;
use crate::structure::Structure;
use crate::validity::is_valid;

/// A restriction a valid candidate must provably satisfy.
pub struct Restriction {
    /// The constraint statistic (e.g. fidelity).
    pub metric: Box<dyn Metric>,
    /// The threshold the statistic must provably exceed.
    pub minimum_value: f64,
}

impl Restriction {
    /// A restriction requiring `metric` to provably exceed `minimum_value`.
    #[must_use]
    pub fn new(metric: impl Metric + 'static, minimum_value: f64) -> Self {
        Self {
            metric: Box::new(metric),
            minimum_value,
        }
    }
}

/// Per-call search parameters.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplainOptions {
    /// Slack allowed when comparing confidence bounds.
    pub tolerance: f64,
    /// Iteration cap before the search reports [`Termination::Exhausted`].
    pub n_iterations: usize,
    /// Candidates carried into the next round.
    pub beam_size: usize,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            n_iterations: 50,
            beam_size: 5,
        }
    }
}

/// Construction-time configuration for the [`Explainer`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplainerConfig {
    /// Samples drawn for every newly materialized candidate.
    pub initial_sampling_size: usize,
    /// Cap on resampling rounds inside one adaptive loop (selector round or
    /// validity test) before it surfaces [`Error::UnresolvedBounds`].
    pub max_resolution_rounds: usize,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            initial_sampling_size: 100,
            max_resolution_rounds: 1_000,
        }
    }
}

/// Why a search run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// A round produced zero novel offspring across the whole beam.
    Converged,
    /// The iteration cap was reached.
    Exhausted,
}

/// Outcome of one `explain` call, with search diagnostics.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// The single best explanation found.
    pub best: Candidate,
    /// Why the search stopped.
    pub termination: Termination,
    /// Rounds actually run.
    pub rounds: usize,
    /// Distinct structures materialized over the run.
    pub structures_visited: usize,
}

/// Explicit lifecycle state, checked at every public entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unfitted,
    Fitted,
}

/// Beam-search explainer over discretized decision regions.
pub struct Explainer {
    discretizer: Box<dyn Discretizer>,
    sampler: Box<dyn Sampler>,
    expand: Box<dyn ExpandStrategy>,
    cfg: ExplainerConfig,
    state: Lifecycle,
}

impl Explainer {
    /// An explainer with the default configuration.
    #[must_use]
    pub fn new(
        discretizer: impl Discretizer + 'static,
        sampler: impl Sampler + 'static,
        expand: impl ExpandStrategy + 'static,
    ) -> Self {
        Self::with_config(discretizer, sampler, expand, ExplainerConfig::default())
    }

    /// An explainer with an explicit configuration.
    #[must_use]
    pub fn with_config(
        discretizer: impl Discretizer + 'static,
        sampler: impl Sampler + 'static,
        expand: impl ExpandStrategy + 'static,
        cfg: ExplainerConfig,
    ) -> Self {
        Self {
            discretizer: Box::new(discretizer),
            sampler: Box::new(sampler),
            expand: Box::new(expand),
            cfg,
            state: Lifecycle::Unfitted,
        }
    }

    /// Fit the process-wide state: the sampler's dataset view and the
    /// discretizer's bin grid. Set once; read-only during `explain`.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[u32]) -> Result<(), Error> {
        self.sampler.dataset_fit(x)?;
        self.discretizer.fit(x, y)?;
        self.state = Lifecycle::Fitted;
        Ok(())
    }

    /// The single best explanation for `point`.
    pub fn explain(
        &mut self,
        point: &[f64],
        utility: &dyn Metric,
        neighborhood: &dyn Neighborhood,
        restriction: &Restriction,
        options: ExplainOptions,
    ) -> Result<Candidate, Error> {
        Ok(self
            .explain_report(point, utility, neighborhood, restriction, options)?
            .best)
    }

    /// Like [`Explainer::explain`], returning search diagnostics as well.
    pub fn explain_report(
        &mut self,
        point: &[f64],
        utility: &dyn Metric,
        neighborhood: &dyn Neighborhood,
        restriction: &Restriction,
        options: ExplainOptions,
    ) -> Result<SearchReport, Error> {
        if self.state == Lifecycle::Unfitted {
            return Err(Error::NotFitted("Explainer"));
        }
        let grid = self.discretizer.grid()?.clone();
        self.sampler.fit_discretizer(&grid)?;
        self.expand.fit_discretizer(&grid)?;

        run_search(
            self.discretizer.as_ref(),
            self.sampler.as_mut(),
            self.expand.as_ref(),
            self.cfg,
            point,
            utility,
            neighborhood,
            restriction,
            options,
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn run_search(
    discretizer: &dyn Discretizer,
    sampler: &mut dyn Sampler,
    expand: &dyn ExpandStrategy,
    cfg: ExplainerConfig,
    point: &[f64],
    utility: &dyn Metric,
    neighborhood: &dyn Neighborhood,
    restriction: &Restriction,
    options: ExplainOptions,
) -> Result<SearchReport, Error> {
    let mut ctx = Resampler {
        sampler,
        utility,
        restriction: restriction.metric.as_ref(),
    };

    let factual_structure = discretizer.to_structure(point)?;
    let mut pool: Vec<Candidate> = Vec::new();
    let mut visited: HashSet<Structure> = HashSet::new();

    visited.insert(factual_structure.clone());
    pool.push(ctx.create_candidate(factual_structure, cfg.initial_sampling_size)?);

    let mut current: Vec<usize> = vec![0];
    let mut hall_of_fame: Vec<usize> = Vec::new();
    let mut termination = Termination::Exhausted;
    let mut rounds = 0usize;

    for round in 0..options.n_iterations {
        rounds = round + 1;
        let surviving = select_beam(
            &mut pool,
            &current,
            options.beam_size,
            options.tolerance,
            utility,
            restriction,
            &mut ctx,
            cfg.max_resolution_rounds,
        )?;

        let mut only_old = true;
        let mut novel: Vec<usize> = Vec::new();
        for &idx in &surviving {
            let offspring = expand.expand(&pool[idx].structure, neighborhood)?;
            for structure in offspring {
                if !visited.insert(structure.clone()) {
                    continue;
                }
                pool.push(ctx.create_candidate(structure, cfg.initial_sampling_size)?);
                novel.push(pool.len() - 1);
                only_old = false;
            }
        }

        debug!(
            "round {rounds}: beam={} novel={} visited={}",
            surviving.len(),
            novel.len(),
            visited.len()
        );

        // Re-rank the hall of fame together with this round's survivors, so
        // the best explanation seen so far is never displaced by recency.
        let mut contenders = hall_of_fame;
        contenders.extend(surviving);
        let mut seen = HashSet::new();
        contenders.retain(|&idx| seen.insert(idx));
        hall_of_fame = select_beam(
            &mut pool,
            &contenders,
            options.beam_size,
            options.tolerance,
            utility,
            restriction,
            &mut ctx,
            cfg.max_resolution_rounds,
        )?;

        current = novel;
        if only_old {
            termination = Termination::Converged;
            break;
        }
    }

    let best_idx = select_beam(
        &mut pool,
        &hall_of_fame,
        1,
        options.tolerance,
        utility,
        restriction,
        &mut ctx,
        cfg.max_resolution_rounds,
    )?
    .first()
    .copied()
    // A zero-iteration search never filled the hall of fame; the factual
    // candidate is all there is.
    .unwrap_or(0);

    Ok(SearchReport {
        best: pool[best_idx].clone(),
        termination,
        rounds,
        structures_visited: visited.len(),
    })
}

/// One beam-selection pass: valid candidates ranked by utility, spare slots
/// backfilled from invalid candidates ranked by restriction-closeness.
#[allow(clippy::too_many_arguments)]
fn select_beam(
    pool: &mut [Candidate],
    entrants: &[usize],
    k: usize,
    tolerance: f64,
    utility: &dyn Metric,
    restriction: &Restriction,
    ctx: &mut Resampler<'_>,
    max_rounds: usize,
) -> Result<Vec<usize>, Error> {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for &idx in entrants {
        if is_valid(&mut pool[idx], restriction, tolerance, ctx, max_rounds)? {
            valid.push(idx);
        } else {
            invalid.push(idx);
        }
    }

    let mut beam = select_top_m(
        pool,
        &valid,
        k,
        tolerance,
        ScoreKind::Utility,
        utility,
        ctx,
        max_rounds,
    )?;
    if beam.len() < k {
        let backfill = select_top_m(
            pool,
            &invalid,
            k - beam.len(),
            tolerance,
            ScoreKind::Restriction,
            restriction.metric.as_ref(),
            ctx,
            max_rounds,
        )?;
        beam.extend(backfill);
    }
    Ok(beam)
}
