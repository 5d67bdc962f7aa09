//! Cubic Bezier curves and tangent sampling

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A control point in the unit square, as `[x, y]`.
pub type Point = [f64; 2];

/// Cubic Bezier curve with fixed (0,0) -> (1,1) endpoints.
///
/// The x axis is normalized playback time and the y axis normalized progress,
/// so the tangent slope dy/dx at a point is the instantaneous velocity of
/// whatever the curve animates. Only the two interior control points are
/// stored; the anchors are implicit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierCurve {
    pub p1: Point,
    pub p2: Point,
}

/// Point on a curve together with the tangent slope there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub x: f64,
    pub y: f64,
    pub slope: f64,
}

/// Linear interpolation between two points, `t * b + (1 - t) * a`.
#[inline]
fn lerp(t: f64, a: Point, b: Point) -> Point {
    [t * b[0] + (1.0 - t) * a[0], t * b[1] + (1.0 - t) * a[1]]
}

fn validate_point(point: Point, name: &'static str) -> Result<(), Error> {
    let in_range = |c: f64| c.is_finite() && (0.0..=1.0).contains(&c);
    if in_range(point[0]) && in_range(point[1]) {
        Ok(())
    } else {
        Err(Error::InvalidCurve {
            point: name,
            coords: point,
        })
    }
}

impl BezierCurve {
    /// Create a curve from its two interior control points.
    ///
    /// Both points must be finite and inside the unit square.
    pub fn new(p1: Point, p2: Point) -> Result<Self, Error> {
        let curve = Self { p1, p2 };
        curve.validate()?;
        Ok(curve)
    }

    /// Re-check the control points, for curves built from untrusted data.
    pub fn validate(&self) -> Result<(), Error> {
        validate_point(self.p1, "P1")?;
        validate_point(self.p2, "P2")
    }

    /// The identity mapping: y(x) = x, with x(t) = t exactly.
    #[must_use]
    pub fn linear() -> Self {
        Self {
            p1: [1.0 / 3.0, 1.0 / 3.0],
            p2: [2.0 / 3.0, 2.0 / 3.0],
        }
    }

    /// Slow start: accelerates from rest.
    #[must_use]
    pub fn ease_in() -> Self {
        Self {
            p1: [0.42, 0.0],
            p2: [1.0, 1.0],
        }
    }

    /// Slow finish: decelerates into the endpoint.
    #[must_use]
    pub fn ease_out() -> Self {
        Self {
            p1: [0.0, 0.0],
            p2: [0.58, 1.0],
        }
    }

    /// Slow start and finish with a fast middle.
    #[must_use]
    pub fn ease_in_out() -> Self {
        Self {
            p1: [0.42, 0.0],
            p2: [0.58, 1.0],
        }
    }

    /// Evaluate the curve at parameter `t`, clamped to [0, 1].
    ///
    /// De Casteljau construction: the four control points are interpolated
    /// pairwise at `t` to give Q0..Q2, those to give R0, R1, and those to
    /// give the curve point B. The tangent slope comes from the last
    /// intermediate pair: `(R1.y - R0.y) / (R1.x - R0.x)`.
    ///
    /// A vertical tangent (zero run, nonzero rise) yields a signed infinity;
    /// a fully degenerate tangent (R0 == R1) yields 0.0. The slope is never
    /// NaN.
    #[must_use]
    pub fn sample(&self, t: f64) -> CurveSample {
        let t = t.clamp(0.0, 1.0);

        let p0 = [0.0, 0.0];
        let p3 = [1.0, 1.0];

        let q0 = lerp(t, p0, self.p1);
        let q1 = lerp(t, self.p1, self.p2);
        let q2 = lerp(t, self.p2, p3);

        let r0 = lerp(t, q0, q1);
        let r1 = lerp(t, q1, q2);

        let b = lerp(t, r0, r1);

        let run = r1[0] - r0[0];
        let rise = r1[1] - r0[1];
        let slope = if run == 0.0 {
            if rise == 0.0 {
                0.0
            } else {
                rise.signum() * f64::INFINITY
            }
        } else {
            rise / run
        };

        CurveSample {
            x: b[0],
            y: b[1],
            slope,
        }
    }
}

impl Default for BezierCurve {
    fn default() -> Self {
        Self::linear()
    }
}
