use super::types::PlacedLabelSeries;

/// Displacements smaller than this do not count for level bookkeeping.
const DISPLACEMENT_EPS: f32 = 0.01;

/// A resolution group: a run of mutually colliding labels stacked as one
/// rigid body. Records live in an arena indexed by stable ids; a merge
/// appends a new record and marks both inputs consumed.
#[derive(Debug)]
struct GroupRecord {
    /// Indices into the label vector, in vertical order.
    members: Vec<usize>,
    consumed: bool,
}

#[derive(Debug, Clone, Copy)]
struct GroupBox {
    top: f32,
    bottom: f32,
}

impl GroupBox {
    fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Iteratively merge colliding adjacent labels into stacked groups until no
/// collisions remain, then derive per-label displacement levels.
///
/// Labels are returned sorted ascending by `mid_y`; the no-overlap invariant
/// holds for every adjacent pair unless a merged group is taller than the
/// band itself, which the visibility filter resolves afterwards.
pub(super) fn resolve_overlaps(
    mut labels: Vec<PlacedLabelSeries>,
    y_min: f32,
    y_max: f32,
    min_spacing: f32,
) -> Vec<PlacedLabelSeries> {
    labels.sort_by(|a, b| {
        a.mid_y
            .partial_cmp(&b.mid_y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name().cmp(b.name()))
    });

    if labels.len() < 2 {
        return labels;
    }

    let mut arena: Vec<GroupRecord> = (0..labels.len())
        .map(|idx| GroupRecord {
            members: vec![idx],
            consumed: false,
        })
        .collect();
    let mut active: Vec<usize> = (0..arena.len()).collect();

    loop {
        let mut merged_at: Option<usize> = None;
        for pos in 0..active.len().saturating_sub(1) {
            let top_box = group_box(&arena[active[pos]], &labels);
            let bottom_box = group_box(&arena[active[pos + 1]], &labels);
            if top_box.bottom + min_spacing > bottom_box.top {
                merged_at = Some(pos);
                break;
            }
        }
        let Some(pos) = merged_at else {
            break;
        };

        let new_id = merge_groups(
            &mut arena,
            &mut labels,
            active[pos],
            active[pos + 1],
            y_min,
            y_max,
            min_spacing,
        );
        active.remove(pos + 1);
        active[pos] = new_id;
        if active.len() <= 1 {
            break;
        }
    }

    for &group_id in &active {
        assign_levels(&arena[group_id], &mut labels);
    }

    labels
}

fn group_box(group: &GroupRecord, labels: &[PlacedLabelSeries]) -> GroupBox {
    let first = group.members[0];
    let last = group.members[group.members.len() - 1];
    GroupBox {
        top: labels[first].bounds.top(),
        bottom: labels[last].bounds.bottom(),
    }
}

fn merge_groups(
    arena: &mut Vec<GroupRecord>,
    labels: &mut [PlacedLabelSeries],
    top_id: usize,
    bottom_id: usize,
    y_min: f32,
    y_max: f32,
    min_spacing: f32,
) -> usize {
    let top_box = group_box(&arena[top_id], labels);
    let bottom_box = group_box(&arena[bottom_id], labels);
    let top_count = arena[top_id].members.len();
    let bottom_count = arena[bottom_id].members.len();
    let total_count = (top_count + bottom_count) as f32;

    let overlap = top_box.bottom - bottom_box.top + min_spacing;
    let merged_height = top_box.height() + min_spacing + bottom_box.height();

    // Pull the merge point toward the smaller group so large clusters stay
    // more stable.
    let mut target_y = top_box.top - overlap * (bottom_count as f32 / total_count);

    // Shift by the net overflow to stay in-band when possible. A group
    // taller than the band still overflows; the visibility filter owns that.
    let overflow_top = (y_min - target_y).max(0.0);
    let overflow_bottom = (target_y + merged_height - y_max).max(0.0);
    target_y += overflow_top - overflow_bottom;

    let mut members = Vec::with_capacity(top_count + bottom_count);
    members.extend_from_slice(&arena[top_id].members);
    members.extend_from_slice(&arena[bottom_id].members);
    arena[top_id].consumed = true;
    arena[bottom_id].consumed = true;

    let mut y = target_y;
    for &idx in &members {
        labels[idx].bounds.y = y;
        labels[idx].repositions += 1;
        y += labels[idx].bounds.height + min_spacing;
    }

    arena.push(GroupRecord {
        members,
        consumed: false,
    });
    arena.len() - 1
}

/// Walk a group's members accumulating the sign of each displacement; a run
/// of same-direction displacements pushes the level further while undisplaced
/// members hold it. Levels are normalized so the group minimum is 0 and
/// every member records the group's level span.
fn assign_levels(group: &GroupRecord, labels: &mut [PlacedLabelSeries]) {
    let mut level = 0i32;
    let mut levels = Vec::with_capacity(group.members.len());
    for &idx in &group.members {
        let dy = labels[idx].bounds.y - labels[idx].orig_bounds.y;
        if dy > DISPLACEMENT_EPS {
            level += 1;
        } else if dy < -DISPLACEMENT_EPS {
            level -= 1;
        }
        levels.push(level);
    }
    let min_level = levels.iter().copied().min().unwrap_or(0);
    let max_level = levels.iter().copied().max().unwrap_or(0);
    let total_levels = max_level - min_level + 1;
    for (walked, &idx) in group.members.iter().enumerate() {
        labels[idx].level = levels[walked] - min_level;
        labels[idx].total_levels = total_levels;
    }
}

/// True when any label's final position diverges enough from its natural one
/// that leader lines are needed to keep the mapping unambiguous.
pub(super) fn needs_connector_lines(labels: &[PlacedLabelSeries]) -> bool {
    labels.iter().any(|label| label.total_levels > 1)
}
