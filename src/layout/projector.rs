use crate::config::LayoutConfig;

use super::resolver::needs_connector_lines;
use super::types::{ConnectorLine, PlacedLabelSeries, RenderLabelSeries, TextAnchor};

/// Convert the final placement into renderable coordinates, leader-line
/// endpoints and hover/focus opacity. All x values are relative to the
/// series marker, signed by the text anchor direction.
pub(super) fn project_labels(
    placed: Vec<PlacedLabelSeries>,
    anchor: TextAnchor,
    config: &LayoutConfig,
) -> Vec<RenderLabelSeries> {
    let needs_connectors = needs_connector_lines(&placed);
    let sign = match anchor {
        TextAnchor::Start => 1.0f32,
        TextAnchor::End => -1.0f32,
    };

    let connector_extent = if needs_connectors {
        config.connector_line_width
    } else {
        0.0
    };
    let label_x = sign * (config.marker_margin + connector_extent);
    let connector = if needs_connectors {
        Some(ConnectorLine {
            start_x: sign * (config.marker_margin * 0.5),
            end_x: sign * (config.marker_margin * 0.5 + config.connector_line_width),
        })
    } else {
        None
    };

    let any_hovered = placed.iter().any(|label| label.sized.series.hovered);
    let any_focused = placed.iter().any(|label| label.sized.series.focused);

    placed
        .into_iter()
        .map(|label| {
            let series = &label.sized.series;
            let foreground = match (any_hovered, any_focused) {
                (false, false) => true,
                (true, true) => series.hovered || series.focused,
                (true, false) => series.hovered,
                (false, true) => series.focused,
            };
            let opacity = if foreground {
                1.0
            } else {
                config.muted_opacity
            };
            let label_coords = (label_x, label.bounds.y);
            RenderLabelSeries {
                placed: label,
                label_coords,
                connector_line: connector,
                opacity,
            }
        })
        .collect()
}
