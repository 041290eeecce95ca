//! Candidate explanations and the shared resampling primitive.
//!
//! The driver owns all candidates in an index-addressed arena (`Vec`), with a
//! separate visited-set keyed by [`Structure`] value-hash for dedup. A
//! candidate is created once per distinct structure and mutated in place as
//! sampling accrues: its scores are replaced by count-weighted folds that
//! never discard prior evidence.

use crate::error::Error;
use crate::metric::Metric;
use crate::sampler::Sampler;
use crate::score::Score;
use crate::structure::Structure;

/// Which of a candidate's two statistics a selection pass ranks on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// The objective being optimized (e.g. region size).
    Utility,
    /// The constraint statistic (e.g. fidelity).
    Restriction,
}

/// A candidate explanation: a region plus its current score estimates.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The region this candidate explains.
    pub structure: Structure,
    /// Current utility estimate.
    pub utility_score: Score,
    /// Current restriction estimate.
    pub restriction_score: Score,
}

impl Candidate {
    /// A candidate from a structure and its initial scores.
    #[must_use]
    pub fn new(structure: Structure, utility_score: Score, restriction_score: Score) -> Self {
        Self {
            structure,
            utility_score,
            restriction_score,
        }
    }

    /// The score backing `kind`.
    #[must_use]
    pub fn score(&self, kind: ScoreKind) -> &Score {
        match kind {
            ScoreKind::Utility => &self.utility_score,
            ScoreKind::Restriction => &self.restriction_score,
        }
    }
}

/// The "request n more samples for this candidate" primitive shared by the
/// selector and the validity tester.
///
/// Draws a fresh batch from the sampler and folds **both** metrics' scores in
/// place, so every sample contributes to utility and restriction alike.
pub struct Resampler<'a> {
    /// Region sampler wired to the oracle.
    pub sampler: &'a mut dyn Sampler,
    /// Utility metric.
    pub utility: &'a dyn Metric,
    /// Restriction metric.
    pub restriction: &'a dyn Metric,
}

impl Resampler<'_> {
    /// Draw `n_points` inside `candidate`'s region and fold both scores.
    pub fn resample(&mut self, candidate: &mut Candidate, n_points: usize) -> Result<(), Error> {
        let batch = self.sampler.sample(&candidate.structure, n_points)?;
        candidate.utility_score =
            self.utility
                .calculate(&batch, &candidate.structure, Some(&candidate.utility_score))?;
        candidate.restriction_score = self.restriction.calculate(
            &batch,
            &candidate.structure,
            Some(&candidate.restriction_score),
        )?;
        Ok(())
    }

    /// Materialize a fresh candidate: draw the initial batch (possibly from a
    /// cache) and score both metrics from scratch.
    pub fn create_candidate(
        &mut self,
        structure: Structure,
        n_points: usize,
    ) -> Result<Candidate, Error> {
        let batch = self.sampler.initial_sampling(&structure, n_points)?;
        let utility_score = self.utility.calculate(&batch, &structure, None)?;
        let restriction_score = self.restriction.calculate(&batch, &structure, None)?;
        Ok(Candidate::new(structure, utility_score, restriction_score))
    }
}
