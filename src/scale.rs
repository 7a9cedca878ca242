use serde::{Deserialize, Serialize};

/// The vertical axis mapping consumed by the pipeline. Supplied once per
/// layout pass and never mutated by it.
pub trait ValueScale {
    /// Pixel position of a data value.
    fn place(&self, value: f32) -> f32;
    /// The pixel range labels must stay inside, as supplied by the caller
    /// (may be inverted, e.g. SVG y-down axes).
    fn range(&self) -> (f32, f32);

    /// Range normalized to `(min, max)`.
    fn band(&self) -> (f32, f32) {
        let (a, b) = self.range();
        (a.min(b), a.max(b))
    }
}

/// Plain linear value-to-pixel mapping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f32, f32),
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self { domain, range }
    }
}

impl ValueScale for LinearScale {
    fn place(&self, value: f32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            // Degenerate domain: every value lands mid-range.
            return (r0 + r1) * 0.5;
        }
        let t = (value - d0) / span;
        r0 + t * (r1 - r0)
    }

    fn range(&self) -> (f32, f32) {
        self.range
    }
}
