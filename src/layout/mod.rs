//! Endpoint label layout pipeline: sizing, naive placement, overlap
//! resolution, visibility filtering and render projection. Pure and
//! synchronous; recomputed from scratch on every call.

mod placer;
mod projector;
mod resolver;
mod sizer;
mod text;
mod types;
mod visibility;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::scale::ValueScale;
use crate::text_metrics::{CharTableMeasurer, FontTextMeasurer, TextMeasure};
use crate::theme::Theme;

pub use types::{
    Bounds, ConnectorLine, LabelSeries, PlacedLabelSeries, RenderLabelSeries, SizedLabelSeries,
    TextAnchor, VerticalAlign,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    #[serde(default)]
    pub align: VerticalAlign,
    #[serde(default)]
    pub anchor: TextAnchor,
    /// Series names, most important first, consulted only under space
    /// pressure.
    #[serde(default)]
    pub importance: Option<Vec<String>>,
}

/// Run the full pipeline with an injected measurement capability.
///
/// Returns renderable labels sorted by vertical position. Labels that cannot
/// fit the band are dropped entirely, never truncated; surviving labels are
/// guaranteed non-overlapping.
pub fn layout_labels(
    series: &[LabelSeries],
    scale: &dyn ValueScale,
    measurer: &dyn TextMeasure,
    theme: &Theme,
    config: &LayoutConfig,
    options: &LayoutOptions,
) -> Vec<RenderLabelSeries> {
    if series.is_empty() {
        return Vec::new();
    }

    let sized = sizer::size_labels(series, measurer, theme, config);
    let initial = placer::place_labels(sized, scale, options.align, theme, config);

    let (y_min, y_max) = scale.band();
    let span = y_max - y_min;

    // Heights are fixed after sizing, so the over-height check on the
    // initial placement equals the check on the resolved one.
    let resolved = if initial.len() <= 1 || visibility::fits(&initial, span, config.min_spacing) {
        resolver::resolve_overlaps(initial, y_min, y_max, config.min_spacing)
    } else {
        let kept = visibility::select_visible(
            &initial,
            span,
            config.min_spacing,
            options.importance.as_deref(),
        );
        let surviving: Vec<PlacedLabelSeries> = initial
            .into_iter()
            .filter(|label| kept.iter().any(|name| name == label.name()))
            .collect();
        resolver::resolve_overlaps(surviving, y_min, y_max, config.min_spacing)
    };

    projector::project_labels(resolved, options.anchor, config)
}

/// Pipeline entry with the measurer chosen from configuration: the system
/// font database by default, the calibrated character table when
/// `fast_text_metrics` is set.
pub fn layout_labels_default(
    series: &[LabelSeries],
    scale: &dyn ValueScale,
    theme: &Theme,
    config: &LayoutConfig,
    options: &LayoutOptions,
) -> Vec<RenderLabelSeries> {
    if config.fast_text_metrics {
        layout_labels(series, scale, &CharTableMeasurer, theme, config, options)
    } else {
        layout_labels(series, scale, &FontTextMeasurer, theme, config, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::LinearScale;

    fn fixtures() -> (Theme, LayoutConfig) {
        let mut theme = Theme::chart_default();
        theme.font_size = 20.0;
        let mut config = LayoutConfig::default();
        config.label_line_height = 1.0;
        config.fast_text_metrics = true;
        (theme, config)
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let (theme, config) = fixtures();
        let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        let rendered = layout_labels_default(
            &[],
            &scale,
            &theme,
            &config,
            &LayoutOptions::default(),
        );
        assert!(rendered.is_empty());
    }

    #[test]
    fn surviving_labels_never_overlap_after_culling() {
        let (theme, config) = fixtures();
        let scale = LinearScale::new((0.0, 10.0), (0.0, 70.0));
        let series: Vec<LabelSeries> = (0..8)
            .map(|i| LabelSeries::new(format!("s{i}"), "Label", i as f32))
            .collect();
        let rendered = layout_labels_default(
            &series,
            &scale,
            &theme,
            &config,
            &LayoutOptions::default(),
        );
        assert!(rendered.len() < series.len());
        assert!(!rendered.is_empty());
        for pair in rendered.windows(2) {
            let gap = pair[1].placed.bounds.top() - pair[0].placed.bounds.bottom();
            assert!(gap >= config.min_spacing - 1e-3);
        }
    }

    #[test]
    fn output_is_sorted_by_vertical_position() {
        let (theme, config) = fixtures();
        let scale = LinearScale::new((0.0, 10.0), (300.0, 0.0));
        let series = vec![
            LabelSeries::new("low", "Low", 1.0),
            LabelSeries::new("high", "High", 9.0),
            LabelSeries::new("mid", "Mid", 5.0),
        ];
        let rendered = layout_labels_default(
            &series,
            &scale,
            &theme,
            &config,
            &LayoutOptions::default(),
        );
        // Inverted range: high values land at small y.
        let names: Vec<&str> = rendered.iter().map(|label| label.name()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }
}
