//! Speed curves applied to raw keyframe factors.
//!
//! Every key carries a curve type and up to four control values; the curve of the
//! left key of a bracket remaps the linear factor before values are blended.

pub mod functions;

use serde::{Deserialize, Serialize};

use functions::{bezier_ease, polynomial_curve};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    /// Hold the left value until the next key is reached.
    Instant,
    #[default]
    Linear,
    Quadratic,
    Cubic,
    Quartic,
    Quintic,
    /// Easing curve with control points (c1, c2) and (c3, c4).
    Bezier,
}

/// Curve descriptor stored on a key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    #[serde(default, rename = "type")]
    pub kind: CurveType,
    #[serde(default)]
    pub c1: f32,
    #[serde(default)]
    pub c2: f32,
    #[serde(default)]
    pub c3: f32,
    #[serde(default)]
    pub c4: f32,
}

impl Curve {
    pub const LINEAR: Curve = Curve {
        kind: CurveType::Linear,
        c1: 0.0,
        c2: 0.0,
        c3: 0.0,
        c4: 0.0,
    };

    pub fn new(kind: CurveType, c: [f32; 4]) -> Self {
        Self {
            kind,
            c1: c[0],
            c2: c[1],
            c3: c[2],
            c4: c[3],
        }
    }

    /// Remap a raw linear factor through this curve.
    pub fn apply(&self, factor: f32) -> f32 {
        match self.kind {
            CurveType::Instant => 0.0,
            CurveType::Linear => factor,
            CurveType::Quadratic => polynomial_curve(&[0.0, self.c1, 1.0], factor),
            CurveType::Cubic => polynomial_curve(&[0.0, self.c1, self.c2, 1.0], factor),
            CurveType::Quartic => {
                polynomial_curve(&[0.0, self.c1, self.c2, self.c3, 1.0], factor)
            }
            CurveType::Quintic => polynomial_curve(
                &[0.0, self.c1, self.c2, self.c3, self.c4, 1.0],
                factor,
            ),
            CurveType::Bezier => bezier_ease(factor, self.c1, self.c2, self.c3, self.c4),
        }
    }
}
