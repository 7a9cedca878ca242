use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{LabelSeries, LayoutOptions};
use crate::scale::LinearScale;

/// One self-contained layout pass as accepted on the CLI/debug surface:
/// the series records, the axis mapping and the pass options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub series: Vec<LabelSeries>,
    pub scale: LinearScale,
    #[serde(flatten)]
    pub options: LayoutOptions,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid layout request: {0}")]
    Parse(String),
    #[error("duplicate series name: {0}")]
    DuplicateSeries(String),
    #[error("series {name}: value {value} is not finite")]
    NonFiniteValue { name: String, value: f32 },
    #[error("scale domain/range must be finite")]
    NonFiniteScale,
}

/// Parse a request from JSON, falling back to JSON5 for hand-written input.
pub fn parse_request(text: &str) -> Result<LayoutRequest, RequestError> {
    let request: LayoutRequest = match serde_json::from_str(text) {
        Ok(request) => request,
        Err(json_err) => {
            json5::from_str(text).map_err(|_| RequestError::Parse(json_err.to_string()))?
        }
    };
    request.validate()?;
    Ok(request)
}

impl LayoutRequest {
    /// The core layout is total over its domain, so the only rejections are
    /// inputs it could not meaningfully interpret at all.
    pub fn validate(&self) -> Result<(), RequestError> {
        for (idx, entry) in self.series.iter().enumerate() {
            if !entry.value.is_finite() {
                return Err(RequestError::NonFiniteValue {
                    name: entry.name.clone(),
                    value: entry.value,
                });
            }
            if self.series[..idx].iter().any(|prior| prior.name == entry.name) {
                return Err(RequestError::DuplicateSeries(entry.name.clone()));
            }
        }
        let (d0, d1) = self.scale.domain;
        let (r0, r1) = self.scale.range;
        if ![d0, d1, r0, r1].iter().all(|v| v.is_finite()) {
            return Err(RequestError::NonFiniteScale);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "series": [{"name": "a", "label": "Alpha", "value": 1.0}],
        "scale": {"domain": [0.0, 10.0], "range": [200.0, 0.0]}
    }"#;

    #[test]
    fn minimal_request_parses_with_defaults() {
        let request = parse_request(MINIMAL).unwrap();
        assert_eq!(request.series.len(), 1);
        assert_eq!(request.options.align, crate::layout::VerticalAlign::Middle);
        assert_eq!(request.options.anchor, crate::layout::TextAnchor::Start);
        assert!(request.options.importance.is_none());
    }

    #[test]
    fn json5_input_is_accepted() {
        let text = r#"{
            // comment
            series: [{name: "a", label: "Alpha", value: 1}],
            scale: {domain: [0, 1], range: [0, 100]},
            anchor: "end",
        }"#;
        let request = parse_request(text).unwrap();
        assert_eq!(request.options.anchor, crate::layout::TextAnchor::End);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let text = r#"{
            "series": [
                {"name": "a", "label": "x", "value": 1.0},
                {"name": "a", "label": "y", "value": 2.0}
            ],
            "scale": {"domain": [0.0, 1.0], "range": [0.0, 1.0]}
        }"#;
        let err = parse_request(text).unwrap_err();
        assert!(matches!(err, RequestError::DuplicateSeries(name) if name == "a"));
    }

    #[test]
    fn garbage_reports_a_parse_error() {
        let err = parse_request("not json at all {{{").unwrap_err();
        assert!(matches!(err, RequestError::Parse(_)));
    }

    #[test]
    fn non_finite_scale_is_rejected() {
        let request = LayoutRequest {
            series: Vec::new(),
            scale: LinearScale::new((0.0, f32::NAN), (0.0, 1.0)),
            options: LayoutOptions::default(),
        };
        assert!(matches!(
            request.validate(),
            Err(RequestError::NonFiniteScale)
        ));
    }
}
