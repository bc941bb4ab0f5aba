///
/// A full vector of per-gene association scores.
///
/// Scores are indexed by a stable gene index `0..n-1` shared with every
/// [`GeneSet`](crate::models::GeneSet) evaluated against the list. The
/// scores themselves may be any real numbers, including negative and zero;
/// ordering and rank lookup are derived downstream and recomputed whenever
/// the list changes (new data or a new permutation).
///
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedList {
    pub scores: Vec<f64>,
}

impl RankedList {
    pub fn new(scores: Vec<f64>) -> Self {
        Self { scores }
    }

    /// Number of genes in the universe.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }
}

impl From<Vec<f64>> for RankedList {
    fn from(scores: Vec<f64>) -> Self {
        Self { scores }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_vec() {
        let list = RankedList::from(vec![1.0, -2.0, 0.0]);
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty());
        assert_eq!(list.as_slice(), &[1.0, -2.0, 0.0]);
    }
}
