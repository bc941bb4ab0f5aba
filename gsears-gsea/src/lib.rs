//! Gene set enrichment analysis over ranked gene lists.
//!
//! Given genes ranked by their association with a phenotype, this crate
//! scores whether a predefined gene set clusters toward either extreme of
//! the ranking and estimates the significance of that clustering by
//! permutation, with pooled FDR control across many sets:
//!
//! - [`ranking`]: stable descending order of a score vector and its inverse
//! - [`score`]: the sparse running-sum enrichment score
//! - [`permutation`]: null distributions via label or ranking permutation
//! - [`significance`]: nominal p-values, normalized scores and FDR q-values
//! - [`measures`]: ranking providers over two-group expression data
//! - [`runner`]: the batch pipeline tying the pieces together
//!
//! # Example
//!
//! ```
//! use gsears_core::models::GeneSet;
//! use gsears_gsea::measures::PreRanked;
//! use gsears_gsea::runner::{Gsea, GseaConfig};
//! use gsears_gsea::PermutationMode;
//!
//! let provider = PreRanked::new(vec![5.0, 4.0, 3.0, 2.0, 1.0, -1.0, -2.0, -3.0, -4.0, -5.0]);
//!
//! let mut gsea = Gsea::new();
//! gsea.add_gene_set(GeneSet::from_indices("extremes", vec![0, 1, 8, 9])).unwrap();
//!
//! let config = GseaConfig {
//!     mode: PermutationMode::Ranking,
//!     min_size: 1,
//!     ..GseaConfig::default()
//! };
//! let results = gsea.compute(&provider, &config).unwrap();
//! assert!((results["extremes"].es - 0.5).abs() < 1e-9);
//! ```

pub mod measures;
pub mod permutation;
pub mod ranking;
pub mod runner;
pub mod score;
pub mod significance;

// re-exports
pub use permutation::{PermutationEngine, PermutationMode, Progress, RankingProvider};
pub use ranking::RankingOrder;
pub use runner::{Gsea, GseaConfig};
pub use score::enrichment_score;
pub use significance::{FDR_UNDEFINED, Significance, significance};
