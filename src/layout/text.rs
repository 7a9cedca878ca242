use crate::text_metrics::{FontParams, LabelBox, TextMeasure};

/// Measure a possibly multi-line text block, word-wrapping each line at
/// `max_width` pixels. Width is the widest wrapped line, height the sum of
/// line heights. Any input, including the empty string, yields a valid box.
pub(super) fn measure_block(
    text: &str,
    measurer: &dyn TextMeasure,
    font: &FontParams,
    max_width: f32,
) -> LabelBox {
    let mut width = 0.0f32;
    let mut height = 0.0f32;
    for raw in split_lines(text) {
        for line in wrap_line(&raw, measurer, font, max_width) {
            let measured = measurer.measure(&line, font);
            width = width.max(measured.width);
            height += measured.height;
        }
    }
    LabelBox { width, height }
}

pub(super) fn split_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\\n", "\n");
    normalized
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

pub(super) fn wrap_line(
    line: &str,
    measurer: &dyn TextMeasure,
    font: &FontParams,
    max_width: f32,
) -> Vec<String> {
    if measurer.measure(line, font).width <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if measurer.measure(&candidate, font).width > max_width {
            if !current.is_empty() {
                lines.push(current.clone());
                current.clear();
            }
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::CharTableMeasurer;

    fn font() -> FontParams<'static> {
        FontParams {
            family: "sans-serif",
            size: 16.0,
            weight: 400,
            line_height: 1.0,
        }
    }

    #[test]
    fn split_lines_handles_escaped_newlines() {
        assert_eq!(split_lines("a\\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn split_lines_trims_whitespace() {
        assert_eq!(split_lines("  hello  \n  world  "), vec!["hello", "world"]);
    }

    #[test]
    fn wrap_line_does_not_wrap_short_text() {
        let result = wrap_line("short", &CharTableMeasurer, &font(), 1000.0);
        assert_eq!(result, vec!["short"]);
    }

    #[test]
    fn wrap_line_splits_long_text() {
        let result = wrap_line(
            "this is a rather long line that should be wrapped",
            &CharTableMeasurer,
            &font(),
            100.0,
        );
        assert!(result.len() > 1, "expected wrapping, got {:?}", result);
    }

    #[test]
    fn measure_block_sums_line_heights() {
        let block = measure_block("one\ntwo", &CharTableMeasurer, &font(), 1000.0);
        assert!((block.height - 32.0).abs() < 1e-4);
        assert!(block.width > 0.0);
    }

    #[test]
    fn measure_block_empty_string_is_zero_box() {
        let block = measure_block("", &CharTableMeasurer, &font(), 1000.0);
        assert_eq!(block.width, 0.0);
        assert_eq!(block.height, 0.0);
    }
}
