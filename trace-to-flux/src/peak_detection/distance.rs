use std::collections::BTreeSet;

use super::Peak;

/// Visits peaks from highest to lowest (equal heights in index order) and
/// keeps each one unless a peak already kept lies fewer than `dist` samples
/// away. Returns the kept peaks in index order.
pub(crate) fn select_by_distance(mut peaks: Vec<Peak>, dist: usize) -> Vec<Peak> {
    peaks.sort_by(|a, b| {
        b.height
            .total_cmp(&a.height)
            .then_with(|| a.index.cmp(&b.index))
    });

    let reach = dist.saturating_sub(1);
    let mut kept = BTreeSet::new();
    let mut selected: Vec<Peak> = peaks
        .into_iter()
        .filter(|peak| {
            let neighbourhood = peak.index.saturating_sub(reach)..=peak.index.saturating_add(reach);
            let is_clear = kept.range(neighbourhood).next().is_none();
            if is_clear {
                kept.insert(peak.index);
            }
            is_clear
        })
        .collect();

    selected.sort_by_key(|peak| peak.index);
    selected
}
