#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod request;
pub mod scale;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use layout::{
    LabelSeries, LayoutOptions, RenderLabelSeries, TextAnchor, VerticalAlign, layout_labels,
    layout_labels_default,
};
pub use request::{LayoutRequest, RequestError, parse_request};
pub use scale::{LinearScale, ValueScale};
pub use theme::Theme;
