//! Ranking providers: concrete sources of per-gene association scores.
//!
//! [`ExpressionRanking`] scores each gene of a genes x samples matrix
//! against a two-group sample labeling (signal-to-noise or t-statistic);
//! [`PreRanked`] wraps an externally computed score column for input with
//! no sample structure.

use anyhow::{Context, Result, bail, ensure};

use gsears_core::models::RankedList;

use crate::permutation::RankingProvider;

/// Per-gene score of a two-group comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankingMeasure {
    /// `(mean_a - mean_b) / (std_a + std_b)` with sample standard
    /// deviations (ddof = 1).
    SignalToNoise,
    /// Two-sample t-statistic with unpooled variances.
    TStatistic,
}

///
/// A genes x samples expression matrix with a group label per sample.
///
/// Rows are genes, columns are samples; `labels[s]` assigns sample `s` to
/// group `0` or `1`. Each group needs at least two samples so the sample
/// standard deviation is defined for every gene.
///
#[derive(Clone, Debug)]
pub struct ExpressionMatrix {
    values: Vec<Vec<f64>>,
    labels: Vec<usize>,
}

impl ExpressionMatrix {
    pub fn new(values: Vec<Vec<f64>>, labels: Vec<usize>) -> Result<Self> {
        ensure!(!values.is_empty(), "expression matrix has no genes");

        let samples = values[0].len();
        for (gene, row) in values.iter().enumerate() {
            ensure!(
                row.len() == samples,
                "gene {gene} has {} values, expected {samples}",
                row.len()
            );
        }
        ensure!(
            labels.len() == samples,
            "{} labels for {samples} samples",
            labels.len()
        );

        for (sample, &label) in labels.iter().enumerate() {
            ensure!(
                label < 2,
                "sample {sample} has group label {label}, expected 0 or 1"
            );
        }
        for group in 0..2 {
            let count = labels.iter().filter(|&&label| label == group).count();
            ensure!(
                count >= 2,
                "group {group} has {count} samples, need at least 2"
            );
        }

        Ok(Self { values, labels })
    }

    pub fn num_genes(&self) -> usize {
        self.values.len()
    }

    pub fn num_samples(&self) -> usize {
        self.labels.len()
    }
}

///
/// Ranking provider over a two-group expression matrix.
///
/// The relabeling permutation from the permutation engine is applied to
/// the label vector, so label-shuffled rankings come out of the exact
/// same scoring path as the observed one.
///
pub struct ExpressionRanking {
    matrix: ExpressionMatrix,
    measure: RankingMeasure,
}

impl ExpressionRanking {
    pub fn new(matrix: ExpressionMatrix, measure: RankingMeasure) -> Self {
        Self { matrix, measure }
    }

    /// Signal-to-noise ranking, the usual default for two-group GSEA.
    pub fn signal_to_noise(matrix: ExpressionMatrix) -> Self {
        Self::new(matrix, RankingMeasure::SignalToNoise)
    }

    fn score_gene(&self, row: &[f64], labels: &[usize]) -> f64 {
        let group_a: Vec<f64> = select(row, labels, 0);
        let group_b: Vec<f64> = select(row, labels, 1);

        let (mean_a, std_a) = mean_and_std(&group_a);
        let (mean_b, std_b) = mean_and_std(&group_b);

        let denominator = match self.measure {
            RankingMeasure::SignalToNoise => std_a + std_b,
            RankingMeasure::TStatistic => {
                let var_a = std_a * std_a;
                let var_b = std_b * std_b;
                (var_a / group_a.len() as f64 + var_b / group_b.len() as f64).sqrt()
            }
        };

        if denominator == 0.0 {
            // constant gene in both groups; uninformative
            return 0.0;
        }
        (mean_a - mean_b) / denominator
    }
}

impl RankingProvider for ExpressionRanking {
    fn num_genes(&self) -> usize {
        self.matrix.num_genes()
    }

    fn num_samples(&self) -> usize {
        self.matrix.num_samples()
    }

    fn compute(&self, relabeling: Option<&[usize]>) -> Result<RankedList> {
        let labels: Vec<usize> = match relabeling {
            None => self.matrix.labels.clone(),
            Some(permutation) => {
                ensure!(
                    permutation.len() == self.matrix.num_samples(),
                    "relabeling permutes {} samples, matrix has {}",
                    permutation.len(),
                    self.matrix.num_samples()
                );
                permutation
                    .iter()
                    .map(|&source| {
                        self.matrix
                            .labels
                            .get(source)
                            .copied()
                            .with_context(|| format!("relabeling references sample {source}"))
                    })
                    .collect::<Result<_>>()?
            }
        };

        let scores = self
            .matrix
            .values
            .iter()
            .map(|row| self.score_gene(row, &labels))
            .collect();
        Ok(RankedList::new(scores))
    }
}

///
/// A fixed, externally computed score column (single-column pre-ranked
/// input). Only ranking permutation applies; there are no labels to
/// shuffle.
///
pub struct PreRanked {
    scores: RankedList,
}

impl PreRanked {
    pub fn new(scores: impl Into<RankedList>) -> Self {
        Self {
            scores: scores.into(),
        }
    }
}

impl RankingProvider for PreRanked {
    fn num_genes(&self) -> usize {
        self.scores.len()
    }

    fn num_samples(&self) -> usize {
        1
    }

    fn compute(&self, relabeling: Option<&[usize]>) -> Result<RankedList> {
        if relabeling.is_some() {
            bail!("pre-ranked input has no sample structure to relabel");
        }
        Ok(self.scores.clone())
    }
}

fn select(row: &[f64], labels: &[usize], group: usize) -> Vec<f64> {
    row.iter()
        .zip(labels)
        .filter(|&(_, &label)| label == group)
        .map(|(&value, _)| value)
        .collect()
}

/// Mean and sample standard deviation (ddof = 1).
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn two_gene_matrix() -> ExpressionMatrix {
        // gene 0 separates the groups, gene 1 does not
        ExpressionMatrix::new(
            vec![
                vec![4.0, 6.0, 1.0, 3.0],
                vec![2.0, 2.0, 2.0, 2.0],
            ],
            vec![0, 0, 1, 1],
        )
        .unwrap()
    }

    #[rstest]
    fn test_signal_to_noise_hand_computed() {
        let ranking = ExpressionRanking::signal_to_noise(two_gene_matrix());
        let scores = ranking.compute(None).unwrap();

        // group a: mean 5, std sqrt(2); group b: mean 2, std sqrt(2)
        let expected = 3.0 / (2.0 * 2.0f64.sqrt());
        assert!((scores.scores[0] - expected).abs() < 1e-12);
    }

    #[rstest]
    fn test_constant_gene_scores_zero() {
        let ranking = ExpressionRanking::signal_to_noise(two_gene_matrix());
        let scores = ranking.compute(None).unwrap();
        assert_eq!(scores.scores[1], 0.0);
    }

    #[rstest]
    fn test_t_statistic_hand_computed() {
        let ranking = ExpressionRanking::new(two_gene_matrix(), RankingMeasure::TStatistic);
        let scores = ranking.compute(None).unwrap();

        // both variances are 2, n = 2 each: t = 3 / sqrt(2)
        let expected = 3.0 / 2.0f64.sqrt();
        assert!((scores.scores[0] - expected).abs() < 1e-12);
    }

    #[rstest]
    fn test_identity_relabeling_matches_observed() {
        let ranking = ExpressionRanking::signal_to_noise(two_gene_matrix());
        let observed = ranking.compute(None).unwrap();
        let relabeled = ranking.compute(Some(&[0, 1, 2, 3])).unwrap();
        assert_eq!(observed, relabeled);
    }

    #[rstest]
    fn test_group_swap_negates_the_score() {
        let ranking = ExpressionRanking::signal_to_noise(two_gene_matrix());
        let observed = ranking.compute(None).unwrap();
        let swapped = ranking.compute(Some(&[2, 3, 0, 1])).unwrap();
        assert!((observed.scores[0] + swapped.scores[0]).abs() < 1e-12);
    }

    #[rstest]
    fn test_relabeling_must_cover_all_samples() {
        let ranking = ExpressionRanking::signal_to_noise(two_gene_matrix());
        assert!(ranking.compute(Some(&[0, 1])).is_err());
        assert!(ranking.compute(Some(&[0, 1, 2, 9])).is_err());
    }

    #[rstest]
    fn test_matrix_validation() {
        // ragged rows
        assert!(ExpressionMatrix::new(vec![vec![1.0, 2.0], vec![1.0]], vec![0, 1]).is_err());
        // label count mismatch
        assert!(ExpressionMatrix::new(vec![vec![1.0, 2.0]], vec![0]).is_err());
        // out-of-range group label
        assert!(
            ExpressionMatrix::new(
                vec![vec![1.0, 2.0, 3.0, 4.0]],
                vec![0, 0, 1, 2]
            )
            .is_err()
        );
        // a group with a single sample has no sample std
        assert!(
            ExpressionMatrix::new(
                vec![vec![1.0, 2.0, 3.0]],
                vec![0, 0, 1]
            )
            .is_err()
        );
    }

    #[rstest]
    fn test_preranked_provider() {
        let provider = PreRanked::new(vec![1.0, -1.0, 0.5]);
        assert_eq!(provider.num_genes(), 3);
        assert_eq!(provider.num_samples(), 1);

        let scores = provider.compute(None).unwrap();
        assert_eq!(scores.scores, vec![1.0, -1.0, 0.5]);

        assert!(provider.compute(Some(&[0])).is_err());
    }
}
