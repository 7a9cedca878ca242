use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Minimum vertical gap enforced between any two rendered labels.
    pub min_spacing: f32,
    /// Horizontal gap between the series marker and the label text.
    pub marker_margin: f32,
    /// Horizontal extent of the connector leader line.
    pub connector_line_width: f32,
    /// Pixel width labels wrap at.
    pub max_label_width: f32,
    /// Annotations wrap at their own, tighter cap.
    pub annotation_max_width: f32,
    /// Gap between the label block and its annotation block.
    pub annotation_padding: f32,
    /// Annotation font size as a fraction of the label font size.
    pub annotation_font_scale: f32,
    pub label_line_height: f32,
    /// Opacity applied to series in the background of a hover/focus state.
    pub muted_opacity: f32,
    /// Skip the font database and size labels from the calibrated
    /// per-character table only.
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_spacing: 2.0,
            marker_margin: 8.0,
            connector_line_width: 12.0,
            max_label_width: 200.0,
            annotation_max_width: 150.0,
            annotation_padding: 2.0,
            annotation_font_scale: 0.8,
            label_line_height: 1.2,
            muted_opacity: 0.3,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    font_weight: Option<u16>,
    bold_font_weight: Option<u16>,
    label_color: Option<String>,
    annotation_color: Option<String>,
    connector_color: Option<String>,
    background: Option<String>,
    min_spacing: Option<f32>,
    marker_margin: Option<f32>,
    connector_line_width: Option<f32>,
    max_label_width: Option<f32>,
    annotation_max_width: Option<f32>,
    annotation_padding: Option<f32>,
    annotation_font_scale: Option<f32>,
    label_line_height: Option<f32>,
    muted_opacity: Option<f32>,
    fast_text_metrics: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    // Accept hand-written config files with comments/trailing commas.
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(&contents)?,
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "print" {
            config.theme = Theme::print();
        } else if theme_name == "chart" || theme_name == "default" {
            config.theme = Theme::chart_default();
        }
    }

    if let Some(v) = parsed.font_family {
        config.theme.font_family = v;
    }
    if let Some(v) = parsed.font_size {
        config.theme.font_size = v;
    }
    if let Some(v) = parsed.font_weight {
        config.theme.font_weight = v;
    }
    if let Some(v) = parsed.bold_font_weight {
        config.theme.bold_font_weight = v;
    }
    if let Some(v) = parsed.label_color {
        config.theme.label_color = v;
    }
    if let Some(v) = parsed.annotation_color {
        config.theme.annotation_color = v;
    }
    if let Some(v) = parsed.connector_color {
        config.theme.connector_color = v;
    }
    if let Some(v) = parsed.background {
        config.theme.background = v;
    }
    if let Some(v) = parsed.min_spacing {
        config.layout.min_spacing = v;
    }
    if let Some(v) = parsed.marker_margin {
        config.layout.marker_margin = v;
    }
    if let Some(v) = parsed.connector_line_width {
        config.layout.connector_line_width = v;
    }
    if let Some(v) = parsed.max_label_width {
        config.layout.max_label_width = v;
    }
    if let Some(v) = parsed.annotation_max_width {
        config.layout.annotation_max_width = v;
    }
    if let Some(v) = parsed.annotation_padding {
        config.layout.annotation_padding = v;
    }
    if let Some(v) = parsed.annotation_font_scale {
        config.layout.annotation_font_scale = v;
    }
    if let Some(v) = parsed.label_line_height {
        config.layout.label_line_height = v;
    }
    if let Some(v) = parsed.muted_opacity {
        config.layout.muted_opacity = v;
    }
    if let Some(v) = parsed.fast_text_metrics {
        config.layout.fast_text_metrics = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.min_spacing, 2.0);
        assert_eq!(config.theme.font_weight, 400);
    }

    #[test]
    fn json_overrides_apply() {
        let mut file = tempfile_named();
        write!(
            file.1,
            "{{\"theme\": \"print\", \"minSpacing\": 5.5, \"fontSize\": 11}}"
        )
        .unwrap();
        let config = load_config(Some(&file.0)).unwrap();
        assert_eq!(config.layout.min_spacing, 5.5);
        assert_eq!(config.theme.font_size, 11.0);
        assert_eq!(config.theme.bold_font_weight, Theme::print().bold_font_weight);
        let _ = std::fs::remove_file(&file.0);
    }

    #[test]
    fn json5_fallback_accepts_comments() {
        let mut file = tempfile_named();
        write!(
            file.1,
            "{{\n  // tighter stacking\n  minSpacing: 1.0,\n}}"
        )
        .unwrap();
        let config = load_config(Some(&file.0)).unwrap();
        assert_eq!(config.layout.min_spacing, 1.0);
        let _ = std::fs::remove_file(&file.0);
    }

    fn tempfile_named() -> (std::path::PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!(
            "endlabel-config-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
