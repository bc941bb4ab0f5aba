//! Nominal p-values, normalized enrichment scores and pooled FDR
//! q-values from observed scores plus permutation null distributions.
//!
//! Degenerate inputs never abort a batch: an empty sign side falls back
//! to `p = 1.0` or `nes = 0.0`, and an empty FDR denominator reports the
//! [`FDR_UNDEFINED`] sentinel.

/// Sentinel q-value reported when an FDR denominator is empty.
pub const FDR_UNDEFINED: f64 = 1e9;

/// Per-gene-set significance estimates, aligned with the input order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Significance {
    pub es: f64,
    pub nes: f64,
    pub p: f64,
    pub fdr: f64,
}

///
/// Convert observed enrichment scores and their null distributions into
/// nominal p-values, normalized scores and pooled FDR q-values.
///
/// `observed[k]` and `nulls[k]` describe the same gene set; the output is
/// aligned by the same index. Null arrays must all have the same length
/// (one value per permutation round).
///
/// The FDR background pools every normalized null value across all sets,
/// then compares each set's NES against that pool and against the
/// population of observed NES values, counting by binary search over
/// sorted arrays.
///
pub fn significance(observed: &[f64], nulls: &[Vec<f64>]) -> Vec<Significance> {
    assert_eq!(
        observed.len(),
        nulls.len(),
        "one null distribution per observed score"
    );

    let n_sets = observed.len();

    let mut p_values = Vec::with_capacity(n_sets);
    let mut nes_values = Vec::with_capacity(n_sets);
    let mut pooled: Vec<f64> = Vec::with_capacity(n_sets * nulls.first().map_or(0, Vec::len));

    for (&es, null) in observed.iter().zip(nulls) {
        p_values.push(nominal_p(es, null));

        let (mean_pos, mean_neg) = signed_means(null);
        nes_values.push(normalize_with(es, mean_pos, mean_neg));
        pooled.extend(null.iter().map(|&s| normalize_with(s, mean_pos, mean_neg)));
    }

    pooled.sort_unstable_by(f64::total_cmp);
    let mut sorted_nes = nes_values.clone();
    sorted_nes.sort_unstable_by(f64::total_cmp);

    observed
        .iter()
        .zip(&nes_values)
        .zip(&p_values)
        .map(|((&es, &nes), &p)| Significance {
            es,
            nes,
            p,
            fdr: fdr(nes, &pooled, &sorted_nes),
        })
        .collect()
}

///
/// Nominal permutation p-value of `es` against its own null distribution,
/// using the sign side matching the observed score. An empty side falls
/// back to 1.0.
///
pub fn nominal_p(es: f64, null: &[f64]) -> f64 {
    let (extreme, side) = if es < 0.0 {
        (
            null.iter().filter(|&&a| a <= es).count(),
            null.iter().filter(|&&a| a < 0.0).count(),
        )
    } else {
        (
            null.iter().filter(|&&a| a >= es).count(),
            null.iter().filter(|&&a| a >= 0.0).count(),
        )
    };

    if side == 0 {
        log::debug!("no null scores on the matching sign side, p falls back to 1.0");
        return 1.0;
    }

    extreme as f64 / side as f64
}

///
/// Rescale `s` by the mean of the same-signed null values, preserving the
/// sign of `s`. Zero stays zero; an undefined or zero mean falls back to
/// 0.0.
///
pub fn normalize(s: f64, null: &[f64]) -> f64 {
    let (mean_pos, mean_neg) = signed_means(null);
    normalize_with(s, mean_pos, mean_neg)
}

/// Means of the non-negative and the negative null values; `None` for an
/// empty side.
fn signed_means(null: &[f64]) -> (Option<f64>, Option<f64>) {
    let mut pos = (0.0, 0usize);
    let mut neg = (0.0, 0usize);
    for &a in null {
        if a >= 0.0 {
            pos.0 += a;
            pos.1 += 1;
        } else {
            neg.0 += a;
            neg.1 += 1;
        }
    }

    let mean = |(sum, count): (f64, usize)| (count > 0).then(|| sum / count as f64);
    (mean(pos), mean(neg))
}

fn normalize_with(s: f64, mean_pos: Option<f64>, mean_neg: Option<f64>) -> f64 {
    if s == 0.0 {
        return 0.0;
    }

    let mean = if s >= 0.0 { mean_pos } else { mean_neg };
    let Some(mean) = mean else {
        log::debug!("no null scores on the matching sign side, nes falls back to 0.0");
        return 0.0;
    };
    if mean == 0.0 {
        return 0.0;
    }

    // for s < 0 the mean is negative, so the quotient keeps the sign of s
    if s >= 0.0 { s / mean } else { -s / mean }
}

/// searchsorted left: first position where `x` could be inserted keeping
/// `sorted` ascending.
fn lower_bound(sorted: &[f64], x: f64) -> usize {
    sorted.partition_point(|&a| a < x)
}

/// searchsorted right.
fn upper_bound(sorted: &[f64], x: f64) -> usize {
    sorted.partition_point(|&a| a <= x)
}

///
/// Pooled FDR q-value for one normalized score.
///
/// `top` is the fraction of same-signed pooled background values at least
/// as extreme as `nes`; `down` is the same fraction over the observed NES
/// population; the q-value is their ratio. Empty denominators report
/// [`FDR_UNDEFINED`].
///
fn fdr(nes: f64, pooled: &[f64], sorted_nes: &[f64]) -> f64 {
    let (all_pos, all_extreme, obs_pos, obs_extreme) = if nes >= 0.0 {
        (
            pooled.len() - lower_bound(pooled, 0.0),
            pooled.len() - lower_bound(pooled, nes),
            sorted_nes.len() - lower_bound(sorted_nes, 0.0),
            sorted_nes.len() - lower_bound(sorted_nes, nes),
        )
    } else {
        (
            lower_bound(pooled, 0.0),
            upper_bound(pooled, nes),
            lower_bound(sorted_nes, 0.0),
            upper_bound(sorted_nes, nes),
        )
    };

    if all_pos == 0 || obs_pos == 0 || obs_extreme == 0 {
        log::debug!("empty FDR denominator, reporting the undefined sentinel");
        return FDR_UNDEFINED;
    }

    let top = all_extreme as f64 / all_pos as f64;
    let down = obs_extreme as f64 / obs_pos as f64;
    top / down
}
