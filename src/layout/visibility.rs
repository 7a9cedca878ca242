use super::types::PlacedLabelSeries;

/// Vertical pixels needed to stack every label with mandatory spacing.
pub(super) fn required_height(labels: &[PlacedLabelSeries], min_spacing: f32) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }
    let heights: f32 = labels.iter().map(|label| label.bounds.height).sum();
    heights + (labels.len() - 1) as f32 * min_spacing
}

pub(super) fn fits(labels: &[PlacedLabelSeries], span: f32, min_spacing: f32) -> bool {
    required_height(labels, min_spacing) <= span + 1e-3
}

/// Pick the subset of series that survives an over-height placement.
///
/// Works from the initial, pre-collision placements to avoid compounding
/// errors from an already-overflowing resolution. Returns surviving names;
/// the caller re-resolves that subset.
pub(super) fn select_visible(
    initial: &[PlacedLabelSeries],
    span: f32,
    min_spacing: f32,
    importance: Option<&[String]>,
) -> Vec<String> {
    if initial.len() <= 1 {
        return initial.iter().map(|label| label.name().to_string()).collect();
    }
    match importance {
        Some(ranking) => select_by_importance(initial, span, min_spacing, ranking),
        None => select_evenly(initial, span, min_spacing),
    }
}

/// Greedily keep the most important series until the next one would no
/// longer fit, then drop the rest. Unknown names are skipped; series absent
/// from the ranking count as least important, in input order.
fn select_by_importance(
    initial: &[PlacedLabelSeries],
    span: f32,
    min_spacing: f32,
    ranking: &[String],
) -> Vec<String> {
    let mut order: Vec<usize> = Vec::with_capacity(initial.len());
    for name in ranking {
        if let Some(idx) = initial.iter().position(|label| label.name() == name)
            && !order.contains(&idx)
        {
            order.push(idx);
        }
    }
    for idx in 0..initial.len() {
        if !order.contains(&idx) {
            order.push(idx);
        }
    }

    let mut kept = Vec::new();
    let mut used = 0.0f32;
    for idx in order {
        let mut needed = initial[idx].bounds.height;
        if !kept.is_empty() {
            needed += min_spacing;
        }
        if used + needed > span + 1e-3 {
            break;
        }
        used += needed;
        kept.push(initial[idx].name().to_string());
    }
    kept
}

/// Default policy: retain the largest count that can fit, spread evenly over
/// the vertical order (first and last always retained when two or more
/// survive). Deterministic by construction.
fn select_evenly(initial: &[PlacedLabelSeries], span: f32, min_spacing: f32) -> Vec<String> {
    let mut order: Vec<usize> = (0..initial.len()).collect();
    order.sort_by(|&a, &b| {
        initial[a]
            .mid_y
            .partial_cmp(&initial[b].mid_y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| initial[a].name().cmp(initial[b].name()))
    });

    // Upper bound on the retained count: the k smallest heights must fit.
    let mut sorted_heights: Vec<f32> = initial.iter().map(|label| label.bounds.height).collect();
    sorted_heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut k_max = 0usize;
    let mut acc = 0.0f32;
    for (count, height) in sorted_heights.iter().enumerate() {
        let mut needed = *height;
        if count > 0 {
            needed += min_spacing;
        }
        if acc + needed > span + 1e-3 {
            break;
        }
        acc += needed;
        k_max = count + 1;
    }

    let last = order.len() - 1;
    for k in (1..=k_max).rev() {
        let picks: Vec<usize> = if k == 1 {
            vec![order[last / 2]]
        } else {
            (0..k)
                .map(|i| {
                    let slot = (i as f32 * last as f32 / (k - 1) as f32).round() as usize;
                    order[slot.min(last)]
                })
                .collect()
        };
        let mut total = 0.0f32;
        for (count, &idx) in picks.iter().enumerate() {
            total += initial[idx].bounds.height;
            if count > 0 {
                total += min_spacing;
            }
        }
        if total <= span + 1e-3 {
            return picks
                .iter()
                .map(|&idx| initial[idx].name().to_string())
                .collect();
        }
    }
    Vec::new()
}
