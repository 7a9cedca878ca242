use crate::config::LayoutConfig;
use crate::scale::ValueScale;
use crate::theme::Theme;

use super::types::{Bounds, PlacedLabelSeries, SizedLabelSeries, VerticalAlign};

/// Compute each label's natural, un-collided target position and clamp it to
/// the band. Labels are independent at this stage.
pub(super) fn place_labels(
    sized: Vec<SizedLabelSeries>,
    scale: &dyn ValueScale,
    align: VerticalAlign,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<PlacedLabelSeries> {
    let (y_min, y_max) = scale.band();
    let line_height = theme.font_size * config.label_line_height;
    sized
        .into_iter()
        .map(|entry| place_label(entry, scale, align, line_height, y_min, y_max))
        .collect()
}

fn place_label(
    sized: SizedLabelSeries,
    scale: &dyn ValueScale,
    align: VerticalAlign,
    line_height: f32,
    y_min: f32,
    y_max: f32,
) -> PlacedLabelSeries {
    let mid_y = scale.place(sized.series.value);
    let natural = match align {
        VerticalAlign::Middle => mid_y - sized.height / 2.0,
        // Single-line baseline near the top of the data value.
        VerticalAlign::Top => mid_y - line_height,
        VerticalAlign::Bottom => mid_y,
    };
    // Clamp in this exact order so degenerate bands still terminate.
    let clamped = natural.max(y_min).min(y_max - sized.height);

    let orig_bounds = Bounds {
        y: natural,
        width: sized.width,
        height: sized.height,
    };
    let bounds = Bounds {
        y: clamped,
        ..orig_bounds
    };
    PlacedLabelSeries {
        sized,
        orig_bounds,
        bounds,
        mid_y,
        repositions: 0,
        level: 0,
        total_levels: 1,
    }
}
