use crate::config::LayoutConfig;
use crate::text_metrics::{FontParams, TextMeasure};
use crate::theme::Theme;

use super::text::measure_block;
use super::types::{LabelSeries, SizedLabelSeries};

/// Turn each raw label into a sized box via the measurement capability.
/// Total over its domain: any string, including empty, yields a valid box.
pub(super) fn size_labels(
    series: &[LabelSeries],
    measurer: &dyn TextMeasure,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<SizedLabelSeries> {
    series
        .iter()
        .map(|entry| size_label(entry, measurer, theme, config))
        .collect()
}

fn size_label(
    series: &LabelSeries,
    measurer: &dyn TextMeasure,
    theme: &Theme,
    config: &LayoutConfig,
) -> SizedLabelSeries {
    let font_weight = label_font_weight(series, theme);
    let label_font = FontParams {
        family: theme.font_family.as_str(),
        size: theme.font_size,
        weight: font_weight,
        line_height: config.label_line_height,
    };
    let label_box = measure_block(&series.label, measurer, &label_font, config.max_label_width);

    let mut width = label_box.width;
    let mut height = label_box.height;
    let mut annotation_height = 0.0;
    if let Some(annotation) = series.annotation.as_deref() {
        let annotation_font = FontParams {
            family: theme.font_family.as_str(),
            size: theme.font_size * config.annotation_font_scale,
            weight: theme.font_weight,
            line_height: config.label_line_height,
        };
        let annotation_box = measure_block(
            annotation,
            measurer,
            &annotation_font,
            config.annotation_max_width,
        );
        width = width.max(annotation_box.width);
        if annotation_box.height > 0.0 {
            annotation_height = annotation_box.height + config.annotation_padding;
            height += annotation_height;
        }
    }

    SizedLabelSeries {
        series: series.clone(),
        width,
        height,
        annotation_height,
        font_weight,
    }
}

/// Weight priority: active hover/focus, then a bolded formatted value, then
/// the configured weight.
fn label_font_weight(series: &LabelSeries, theme: &Theme) -> u16 {
    if series.hovered || series.focused {
        theme.bold_font_weight
    } else if series.formatted_value.is_some() {
        theme.bold_font_weight
    } else {
        theme.font_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::CharTableMeasurer;

    fn fixtures() -> (Theme, LayoutConfig) {
        let mut theme = Theme::chart_default();
        theme.font_size = 10.0;
        let mut config = LayoutConfig::default();
        config.label_line_height = 1.0;
        (theme, config)
    }

    #[test]
    fn plain_label_uses_configured_weight() {
        let (theme, config) = fixtures();
        let sized = size_label(
            &LabelSeries::new("a", "Alpha", 1.0),
            &CharTableMeasurer,
            &theme,
            &config,
        );
        assert_eq!(sized.font_weight, theme.font_weight);
        assert!((sized.height - 10.0).abs() < 1e-4);
        assert_eq!(sized.annotation_height, 0.0);
    }

    #[test]
    fn formatted_value_bolds_the_label() {
        let (theme, config) = fixtures();
        let mut series = LabelSeries::new("a", "Alpha", 1.0);
        series.formatted_value = Some("1.0%".to_string());
        let sized = size_label(&series, &CharTableMeasurer, &theme, &config);
        assert_eq!(sized.font_weight, theme.bold_font_weight);
    }

    #[test]
    fn hover_outranks_formatted_value() {
        let (theme, config) = fixtures();
        let mut series = LabelSeries::new("a", "Alpha", 1.0);
        series.formatted_value = Some("1.0%".to_string());
        series.hovered = true;
        let sized = size_label(&series, &CharTableMeasurer, &theme, &config);
        assert_eq!(sized.font_weight, theme.bold_font_weight);
    }

    #[test]
    fn annotation_adds_padded_height_and_widens() {
        let (theme, mut config) = fixtures();
        config.annotation_padding = 3.0;
        config.annotation_font_scale = 0.8;
        let mut series = LabelSeries::new("a", "ii", 1.0);
        series.annotation = Some("a much longer annotation".to_string());
        let sized = size_label(&series, &CharTableMeasurer, &theme, &config);
        // label line (10) + annotation line (8) + padding (3)
        assert!((sized.height - 21.0).abs() < 1e-4);
        assert!((sized.annotation_height - 11.0).abs() < 1e-4);
        let label_only = size_label(
            &LabelSeries::new("a", "ii", 1.0),
            &CharTableMeasurer,
            &theme,
            &config,
        );
        assert!(sized.width > label_only.width);
    }

    #[test]
    fn empty_label_yields_zero_box() {
        let (theme, config) = fixtures();
        let sized = size_label(
            &LabelSeries::new("a", "", 1.0),
            &CharTableMeasurer,
            &theme,
            &config,
        );
        assert_eq!(sized.width, 0.0);
        assert_eq!(sized.height, 0.0);
    }
}
