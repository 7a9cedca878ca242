use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    /// CSS-style weight used for idle labels.
    pub font_weight: u16,
    /// Weight applied to hovered/focused labels and labels carrying a
    /// formatted value.
    pub bold_font_weight: u16,
    pub label_color: String,
    pub annotation_color: String,
    pub connector_color: String,
    pub background: String,
}

impl Theme {
    pub fn chart_default() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            font_weight: 400,
            bold_font_weight: 700,
            label_color: "#1C2430".to_string(),
            annotation_color: "#7A8AA6".to_string(),
            connector_color: "#C7D2E5".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn print() -> Self {
        Self {
            font_family: "Georgia, \"Times New Roman\", serif".to_string(),
            font_size: 12.0,
            font_weight: 400,
            bold_font_weight: 600,
            label_color: "#111111".to_string(),
            annotation_color: "#555555".to_string(),
            connector_color: "#999999".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::chart_default()
    }
}
