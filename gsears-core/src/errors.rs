use thiserror::Error;

#[derive(Error, Debug)]
pub enum GseaError {
    #[error("ranking provider failed computing the observed ranking")]
    ObservedRanking(#[source] anyhow::Error),

    #[error("ranking provider failed on permutation round {round}")]
    Provider {
        round: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("computation cancelled")]
    Cancelled,

    #[error("label permutation requires at least two samples, provider reports {samples}")]
    LabelPermutationUnsupported { samples: usize },

    #[error("ranking provider returned an empty score vector")]
    EmptyUniverse,

    #[error("gene set {0:?} is already registered")]
    DuplicateGeneSet(String),
}
