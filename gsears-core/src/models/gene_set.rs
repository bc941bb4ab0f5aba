///
/// A named gene set, expressed as indices into the gene universe of a
/// [`RankedList`](crate::models::RankedList).
///
/// `size` is the cardinality of the set before gene matching; `indices`
/// holds only the members that matched the universe, so
/// `matched_size() <= size`. Scoring requires `1 <= matched_size() < n`
/// where `n` is the universe size.
///
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneSet {
    pub name: String,
    pub size: usize,
    pub indices: Vec<usize>,
}

impl GeneSet {
    pub fn new(name: impl Into<String>, size: usize, indices: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            size,
            indices,
        }
    }

    /// A gene set whose members all matched the universe.
    pub fn from_indices(name: impl Into<String>, indices: Vec<usize>) -> Self {
        let size = indices.len();
        Self::new(name, size, indices)
    }

    /// Number of members matched against the gene universe.
    pub fn matched_size(&self) -> usize {
        self.indices.len()
    }

    /// Fraction of the original set that matched the universe.
    pub fn matched_part(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        self.matched_size() as f64 / self.size as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matched_size_and_part() {
        let set = GeneSet::new("ribosome", 10, vec![0, 4, 7]);
        assert_eq!(set.matched_size(), 3);
        assert_eq!(set.matched_part(), 0.3);
    }

    #[test]
    fn test_from_indices_counts_all_as_matched() {
        let set = GeneSet::from_indices("proteasome", vec![1, 2, 3]);
        assert_eq!(set.size, 3);
        assert_eq!(set.matched_part(), 1.0);
    }

    #[test]
    fn test_empty_original_set_has_zero_part() {
        let set = GeneSet::new("empty", 0, vec![]);
        assert_eq!(set.matched_part(), 0.0);
    }
}
