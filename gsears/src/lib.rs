#[cfg(feature = "core")]
#[doc(inline)]
pub use gsears_core as core;

#[cfg(feature = "gsea")]
#[doc(inline)]
pub use gsears_gsea as gsea;
