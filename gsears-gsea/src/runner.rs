use std::sync::atomic::AtomicBool;

use fxhash::FxHashMap;

use gsears_core::errors::GseaError;
use gsears_core::models::{GeneSet, GseaResult};

use crate::permutation::{
    DEFAULT_SEED_BASE, PermutationEngine, PermutationMode, Progress, RankingProvider,
};
use crate::ranking::RankingOrder;
use crate::score::enrichment_score;
use crate::significance::significance;

///
/// Configuration for a full GSEA run.
///
/// The size band (`min_size`, `max_size`, `min_part`) filters gene sets
/// before any scoring: a set is kept when
/// `min_size <= matched_size <= max_size` and the matched fraction of the
/// original set is at least `min_part`.
///
#[derive(Clone, Debug)]
pub struct GseaConfig {
    /// Number of permutation rounds behind the null distributions.
    pub permutations: usize,
    /// Weighting exponent applied to member scores.
    pub weight_exponent: f64,
    /// Label or ranking permutation.
    pub mode: PermutationMode,
    /// Round `i` shuffles with seed `seed_base + i`.
    pub seed_base: u64,
    pub min_size: usize,
    pub max_size: usize,
    pub min_part: f64,
}

impl Default for GseaConfig {
    fn default() -> Self {
        Self {
            permutations: 100,
            weight_exponent: 1.0,
            mode: PermutationMode::Label,
            seed_base: DEFAULT_SEED_BASE,
            min_size: 3,
            max_size: 1000,
            min_part: 0.1,
        }
    }
}

///
/// Batch GSEA over a collection of named gene sets.
///
/// Holds the registered sets, filters them to the configured size band,
/// scores them against the observed ranking, drives the permutation
/// engine for the null distributions and runs the significance estimator,
/// emitting one [`GseaResult`] per surviving set.
///
#[derive(Default)]
pub struct Gsea {
    gene_sets: Vec<GeneSet>,
}

impl Gsea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gene set. Names must be unique.
    pub fn add_gene_set(&mut self, gene_set: GeneSet) -> Result<(), GseaError> {
        if self.gene_sets.iter().any(|s| s.name == gene_set.name) {
            return Err(GseaError::DuplicateGeneSet(gene_set.name));
        }
        self.gene_sets.push(gene_set);
        Ok(())
    }

    pub fn add_gene_sets(
        &mut self,
        gene_sets: impl IntoIterator<Item = GeneSet>,
    ) -> Result<(), GseaError> {
        for gene_set in gene_sets {
            self.add_gene_set(gene_set)?;
        }
        Ok(())
    }

    /// Registered sets within the configured size band, for a universe of
    /// `num_genes` genes. Sets that would violate the scorer's
    /// `matched_size < n` precondition are dropped here as well.
    fn select(&self, num_genes: usize, config: &GseaConfig) -> Vec<GeneSet> {
        self.gene_sets
            .iter()
            .filter(|s| {
                let matched = s.matched_size();
                matched >= config.min_size.max(1)
                    && matched <= config.max_size
                    && matched < num_genes
                    && s.matched_part() >= config.min_part
            })
            .cloned()
            .collect()
    }

    /// Run the full pipeline. See [`Gsea::compute_with`] for progress
    /// reporting and cancellation.
    pub fn compute(
        &self,
        provider: &dyn RankingProvider,
        config: &GseaConfig,
    ) -> Result<FxHashMap<String, GseaResult>, GseaError> {
        self.compute_with(provider, config, None, None)
    }

    pub fn compute_with(
        &self,
        provider: &dyn RankingProvider,
        config: &GseaConfig,
        progress: Option<&dyn Progress>,
        cancel: Option<&AtomicBool>,
    ) -> Result<FxHashMap<String, GseaResult>, GseaError> {
        let num_genes = provider.num_genes();
        let selected = self.select(num_genes, config);
        if selected.is_empty() {
            // no ranking work when nothing survives the size band
            log::debug!("no gene sets within the configured size limits");
            return Ok(FxHashMap::default());
        }

        let observed = provider
            .compute(None)
            .map_err(GseaError::ObservedRanking)?;
        if observed.is_empty() {
            return Err(GseaError::EmptyUniverse);
        }

        let ranking = RankingOrder::from_scores(&observed.scores);
        let observed_scores: Vec<f64> = selected
            .iter()
            .map(|s| enrichment_score(s, &observed.scores, &ranking, config.weight_exponent))
            .collect();

        let mut engine = PermutationEngine::new(provider, config.mode, config.permutations)
            .seed_base(config.seed_base)
            .weight_exponent(config.weight_exponent);
        if let Some(progress) = progress {
            engine = engine.progress(progress);
        }
        if let Some(cancel) = cancel {
            engine = engine.cancel_flag(cancel);
        }
        let nulls = engine.null_scores(&observed, &selected)?;

        let estimates = significance(&observed_scores, &nulls);

        let results = selected
            .into_iter()
            .zip(estimates)
            .map(|(gene_set, estimate)| {
                let result = GseaResult {
                    es: estimate.es,
                    nes: estimate.nes,
                    p: estimate.p,
                    fdr: estimate.fdr,
                    size: gene_set.size,
                    matched_size: gene_set.matched_size(),
                };
                (gene_set.name, result)
            })
            .collect();

        Ok(results)
    }
}
