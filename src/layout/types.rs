use serde::{Deserialize, Serialize};

/// One named annotation tied to a single data value. Caller input, immutable
/// for the duration of a layout pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSeries {
    /// Unique key within one pass.
    pub name: String,
    /// Display text. May contain explicit newlines.
    pub label: String,
    pub value: f32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub formatted_value: Option<String>,
    #[serde(default)]
    pub hovered: bool,
    #[serde(default)]
    pub focused: bool,
}

impl LabelSeries {
    pub fn new(name: impl Into<String>, label: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            value,
            color: None,
            annotation: None,
            formatted_value: None,
            hovered: false,
            focused: false,
        }
    }
}

/// Vertical extent of a label box. Horizontal placement is resolved by the
/// projector, so only `width` is carried along for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when the boxes come closer vertically than `spacing`.
    pub fn collides(&self, other: &Bounds, spacing: f32) -> bool {
        self.bottom() + spacing > other.top() && other.bottom() + spacing > self.top()
    }
}

/// A label with its measured box. One-to-one with [`LabelSeries`].
#[derive(Debug, Clone, Serialize)]
pub struct SizedLabelSeries {
    pub series: LabelSeries,
    pub width: f32,
    pub height: f32,
    /// Height of the annotation block included in `height`, zero if absent.
    pub annotation_height: f32,
    /// Weight the label was measured with; renderers should draw with it.
    pub font_weight: u16,
}

/// A label with a resolved vertical position.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedLabelSeries {
    pub sized: SizedLabelSeries,
    /// Naive, unclamped target box.
    pub orig_bounds: Bounds,
    /// Current box, possibly displaced by stacking.
    pub bounds: Bounds,
    /// Axis-mapped center of the data value.
    pub mid_y: f32,
    /// Times `bounds.y` was rewritten during stacking.
    pub repositions: u32,
    /// Accumulated directional displacement within the resolution group.
    pub level: i32,
    /// Level span (`max - min + 1`) of the group this label resolved in.
    pub total_levels: i32,
}

impl PlacedLabelSeries {
    pub fn name(&self) -> &str {
        &self.sized.series.name
    }
}

/// Leader-line endpoints, x-relative to the series marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectorLine {
    pub start_x: f32,
    pub end_x: f32,
}

/// Final renderable label.
#[derive(Debug, Clone, Serialize)]
pub struct RenderLabelSeries {
    pub placed: PlacedLabelSeries,
    /// Text anchor position, x-relative to the series marker.
    pub label_coords: (f32, f32),
    pub connector_line: Option<ConnectorLine>,
    pub opacity: f32,
}

impl RenderLabelSeries {
    pub fn name(&self) -> &str {
        self.placed.name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    #[default]
    Start,
    End,
}
