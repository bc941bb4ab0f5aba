use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;

use gsears_core::errors::GseaError;
use gsears_core::models::{GeneSet, RankedList};

use crate::ranking::RankingOrder;
use crate::score::enrichment_score;

/// Seed base for permutation rounds; round `i` uses `seed_base + i`.
pub const DEFAULT_SEED_BASE: u64 = 2000;

///
/// Source of per-gene association scores.
///
/// Implementations wrap whatever produced the ranking (a two-group
/// expression comparison, a pre-ranked score column) behind one function:
/// given an optional sample relabeling, return the full score vector.
/// Must be deterministic for identical relabelings, and safely callable
/// from multiple permutation rounds at once (hence the `Sync` bound).
///
pub trait RankingProvider: Sync {
    /// Number of genes in the universe.
    fn num_genes(&self) -> usize;

    /// Number of samples behind the ranking; 1 for pre-ranked input with
    /// no group structure.
    fn num_samples(&self) -> usize;

    /// Recompute the score vector. `relabeling` is a permutation of
    /// `0..num_samples()`: sample `s` takes the group label of sample
    /// `relabeling[s]`. `None` means the original labeling.
    fn compute(&self, relabeling: Option<&[usize]>) -> anyhow::Result<RankedList>;
}

/// Coarse progress reporting; ticked once per completed permutation round.
pub trait Progress: Sync {
    fn advance(&self, amount: u64);
}

impl Progress for indicatif::ProgressBar {
    fn advance(&self, amount: u64) {
        self.inc(amount);
    }
}

/// How the null distribution resamples the data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermutationMode {
    /// Shuffle the sample -> group assignment and recompute the ranking
    /// through the provider. Requires group structure behind the scores.
    Label,
    /// Shuffle the observed score vector itself. The only choice for
    /// pre-ranked input.
    Ranking,
}

///
/// Drives repeated re-ranking and re-scoring under permutation, producing
/// one null enrichment-score distribution per gene set.
///
/// Rounds are independent (each derives its own rng from
/// `seed_base + round`) and run on the rayon pool, each writing a disjoint
/// row of the rounds x sets matrix. Identical configuration reproduces the
/// null distributions bit for bit regardless of thread count.
///
pub struct PermutationEngine<'a> {
    provider: &'a dyn RankingProvider,
    mode: PermutationMode,
    rounds: usize,
    seed_base: u64,
    weight_exponent: f64,
    progress: Option<&'a dyn Progress>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> PermutationEngine<'a> {
    pub fn new(provider: &'a dyn RankingProvider, mode: PermutationMode, rounds: usize) -> Self {
        Self {
            provider,
            mode,
            rounds,
            seed_base: DEFAULT_SEED_BASE,
            weight_exponent: 1.0,
            progress: None,
            cancel: None,
        }
    }

    pub fn seed_base(mut self, seed_base: u64) -> Self {
        self.seed_base = seed_base;
        self
    }

    pub fn weight_exponent(mut self, p: f64) -> Self {
        self.weight_exponent = p;
        self
    }

    pub fn progress(mut self, progress: &'a dyn Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn cancel_flag(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    ///
    /// Null enrichment scores for every gene set: one inner vector per
    /// set, one value per round, in round order.
    ///
    /// A provider failure in any round aborts the whole call (null arrays
    /// must stay length-aligned across sets), as does cancellation;
    /// partially filled distributions are discarded, never returned.
    ///
    pub fn null_scores(
        &self,
        observed: &RankedList,
        gene_sets: &[GeneSet],
    ) -> Result<Vec<Vec<f64>>, GseaError> {
        if observed.is_empty() {
            return Err(GseaError::EmptyUniverse);
        }
        if self.mode == PermutationMode::Label && self.provider.num_samples() < 2 {
            return Err(GseaError::LabelPermutationUnsupported {
                samples: self.provider.num_samples(),
            });
        }

        let n_sets = gene_sets.len();
        if n_sets == 0 {
            return Ok(Vec::new());
        }

        let mut matrix = vec![0.0f64; self.rounds * n_sets];
        matrix
            .par_chunks_mut(n_sets)
            .enumerate()
            .try_for_each(|(round, row)| {
                if let Some(flag) = self.cancel {
                    if flag.load(Ordering::Relaxed) {
                        return Err(GseaError::Cancelled);
                    }
                }

                let scores = self.permuted_scores(observed, round)?;
                let ranking = RankingOrder::from_scores(&scores);
                for (cell, gene_set) in row.iter_mut().zip(gene_sets) {
                    *cell = enrichment_score(gene_set, &scores, &ranking, self.weight_exponent);
                }

                if let Some(progress) = self.progress {
                    progress.advance(1);
                }
                Ok(())
            })?;

        // rows are rounds; flip into one null array per gene set
        let mut nulls: Vec<Vec<f64>> = (0..n_sets)
            .map(|_| Vec::with_capacity(self.rounds))
            .collect();
        for row in matrix.chunks(n_sets) {
            for (null, &es) in nulls.iter_mut().zip(row) {
                null.push(es);
            }
        }

        Ok(nulls)
    }

    fn permuted_scores(&self, observed: &RankedList, round: usize) -> Result<Vec<f64>, GseaError> {
        let mut rng = StdRng::seed_from_u64(self.seed_base + round as u64);

        match self.mode {
            PermutationMode::Label => {
                let mut relabeling: Vec<usize> = (0..self.provider.num_samples()).collect();
                relabeling.shuffle(&mut rng);

                let ranked = self
                    .provider
                    .compute(Some(&relabeling))
                    .map_err(|source| GseaError::Provider { round, source })?;
                Ok(ranked.scores)
            }
            PermutationMode::Ranking => {
                let mut scores = observed.scores.clone();
                scores.shuffle(&mut rng);
                Ok(scores)
            }
        }
    }
}
