use super::histogram::Domain;
use peerchart_common::Orientation;
use serde::{Deserialize, Serialize};

/// Affine map from a numeric domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: Domain,
    pub range: (f64, f64),
    pub orientation: Orientation,
    pub round: bool,
}

/// Map `domain` onto `[0, length]`, or `[length, 0]` when descending.
pub fn compute_scale(domain: Domain, length: f64, orientation: Orientation) -> LinearScale {
    let range = match orientation {
        Orientation::Ascending => (0.0, length),
        Orientation::Descending => (length, 0.0),
    };
    LinearScale { domain, range, orientation, round: false }
}

impl LinearScale {
    /// Round outputs to whole pixels.
    pub fn rounded(mut self) -> Self {
        self.round = true;
        self
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (r0, r1) = self.range;
        let span = self.domain.span();
        let out = if span == 0.0 {
            (r0 + r1) / 2.0
        } else if v == self.domain.min {
            r0
        } else if v == self.domain.max {
            r1
        } else {
            r0 + (v - self.domain.min) / span * (r1 - r0)
        };
        if self.round { out.round() } else { out }
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (r0, r1) = self.range;
        if r1 == r0 {
            return self.domain.min;
        }
        self.domain.min + (px - r0) / (r1 - r0) * self.domain.span()
    }

    /// Pixel length of the range, regardless of orientation.
    pub fn length(&self) -> f64 {
        (self.range.1 - self.range.0).abs()
    }
}
