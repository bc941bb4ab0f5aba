///
/// Per-gene-set output of a full GSEA run.
///
/// Created once per compute call and immutable afterwards. `fdr` may carry
/// the sentinel `1e9` when the pooled background has no values on the
/// matching sign side.
///
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GseaResult {
    /// Enrichment score against the observed ranking.
    pub es: f64,
    /// Enrichment score normalized by the mean magnitude of same-signed
    /// null scores.
    pub nes: f64,
    /// Nominal permutation p-value.
    pub p: f64,
    /// Pooled false-discovery-rate q-value.
    pub fdr: f64,
    /// Cardinality of the gene set before matching.
    pub size: usize,
    /// Number of members matched against the gene universe.
    pub matched_size: usize,
}
