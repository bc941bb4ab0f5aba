use gsears_core::models::GeneSet;

use crate::ranking::RankingOrder;

///
/// Enrichment score of one gene set against one ranking.
///
/// Walks only the member genes (plus gap bookkeeping), so a set of `m`
/// genes costs O(m log m) instead of a full O(n) pass over the ranking.
/// The running sum gains `|score|^p / W` at each member's rank position
/// and loses `1 / (n - m)` for every non-member in between; the returned
/// value is whichever running extreme has the larger magnitude, positive
/// extreme winning ties.
///
/// A set whose member weights sum to zero carries no ranking information
/// and scores `0.0`.
///
/// # Arguments:
/// - gene_set: member indices, must satisfy `0 < matched_size < n`
/// - scores: per-gene association scores the ranking was built from
/// - ranking: descending order of `scores`
/// - p: weighting exponent applied to member scores (1.0 for the standard
///   weighted statistic)
///
pub fn enrichment_score(
    gene_set: &GeneSet,
    scores: &[f64],
    ranking: &RankingOrder,
    p: f64,
) -> f64 {
    let n = scores.len();
    let m = gene_set.matched_size();
    assert!(
        m > 0 && m < n,
        "gene set {:?} must satisfy 0 < matched_size < n (matched_size={m}, n={n})",
        gene_set.name,
    );

    // (rank position, weight) per member, walked best-to-worst
    let mut hits: Vec<(usize, f64)> = gene_set
        .indices
        .iter()
        .map(|&gene| (ranking.rank_of[gene], scores[gene].abs().powf(p)))
        .collect();

    let total: f64 = hits.iter().map(|&(_, weight)| weight).sum();
    if total == 0.0 {
        log::debug!(
            "gene set {:?}: member weights sum to zero, scoring 0.0",
            gene_set.name
        );
        return 0.0;
    }

    hits.sort_unstable_by_key(|&(pos, _)| pos);

    let step_out = -1.0 / (n - m) as f64;

    let mut csum = 0.0;
    let mut max_sum = 0.0;
    let mut min_sum = 0.0;
    let mut last = 0usize;

    for (pos, weight) in hits {
        // accumulated decrement for the run of non-members since `last`
        csum += step_out * (pos - last) as f64;
        if csum < min_sum {
            min_sum = csum;
        }

        csum += weight / total;
        if csum > max_sum {
            max_sum = csum;
        }

        last = pos + 1;
    }

    // trailing run of non-members
    csum += step_out * (n - last) as f64;
    if csum < min_sum {
        min_sum = csum;
    }

    if max_sum.abs() >= min_sum.abs() {
        max_sum
    } else {
        min_sum
    }
}
