pub mod gene_set;
pub mod ranked_list;
pub mod result;

// re-export for cleaner imports
pub use self::gene_set::GeneSet;
pub use self::ranked_list::RankedList;
pub use self::result::GseaResult;
