//! Core data model for gsears: gene set enrichment analysis over ranked
//! gene lists.
//!
//! This crate holds the types shared by the gsears algorithm crates:
//!
//! - [`RankedList`]: per-gene association scores indexed by a stable gene index
//! - [`GeneSet`]: a named subset of the gene universe, expressed as indices
//! - [`GseaResult`]: the per-set output record (es, nes, p, fdr, sizes)
//! - [`GseaError`]: the shared error taxonomy
//!
//! No algorithms live here; see the `gsears-gsea` crate for scoring,
//! permutation and significance estimation.

pub mod errors;
pub mod models;

// re-exports
pub use errors::GseaError;
pub use models::{GeneSet, GseaResult, RankedList};
