//! Spline curves that particles can be bound to.
//!
//! Provides curve types for interpolation:
//! - [`Polyline`] - Piecewise linear paths
//! - [`CubicBezier`] / [`BezierSpline`] - Cubic Bezier segments and chains
//! - [`CatmullRom`] - Catmull-Rom splines (pass through control points)
//!
//! The `Vec3` variants implement [`SplineProvider`], which adds nearest-point
//! projection and oriented evaluation over a normalized `[0, 1]` domain.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod frame;
mod provider;
mod provider_impl;

pub use frame::{euler_angles, orientation_from_forward};
pub use provider::{nearest_parameter, Projected, ProjectionSettings, SplinePoint, SplineProvider};

/// Trait for types that can be interpolated along a curve.
pub trait Interpolatable:
    Clone
    + Copy
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<f32, Output = Self>
{
}

impl Interpolatable for Vec3 {}

/// A piecewise linear path through a list of points.
///
/// Each segment spans an equal share of the parameter range.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polyline<T: Interpolatable> {
    /// Vertices, in order.
    pub points: Vec<T>,
}

impl<T: Interpolatable> Polyline<T> {
    /// Creates a polyline through the given points.
    pub fn new(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Creates a single straight segment.
    pub fn line(start: T, end: T) -> Self {
        Self::new(vec![start, end])
    }

    /// Returns the number of segments.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Evaluates the polyline at parameter t (0 to segment_count).
    ///
    /// Returns `None` if there are no points.
    pub fn position_at_segment(&self, t: f32) -> Option<T> {
        match self.points.len() {
            0 => None,
            1 => Some(self.points[0]),
            _ => {
                let (segment, local_t) = locate(t, self.segment_count());
                Some(lerp(
                    self.points[segment],
                    self.points[segment + 1],
                    local_t,
                ))
            }
        }
    }

    /// Evaluates the derivative at parameter t (0 to segment_count).
    ///
    /// Returns `None` if there are fewer than two points.
    pub fn derivative_at_segment(&self, t: f32) -> Option<T> {
        if self.points.len() < 2 {
            return None;
        }
        let (segment, _) = locate(t, self.segment_count());
        Some(self.points[segment + 1] - self.points[segment])
    }
}

/// A cubic Bezier curve segment.
///
/// Defined by 4 control points: start (P0), control 1 (P1), control 2 (P2), end (P3).
/// The curve passes through P0 and P3, and is influenced by P1 and P2.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicBezier<T: Interpolatable> {
    /// Start point.
    pub p0: T,
    /// First control point.
    pub p1: T,
    /// Second control point.
    pub p2: T,
    /// End point.
    pub p3: T,
}

impl<T: Interpolatable> CubicBezier<T> {
    /// Creates a new cubic Bezier curve.
    pub fn new(p0: T, p1: T, p2: T, p3: T) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluates the curve at parameter t (0 to 1).
    pub fn evaluate(&self, t: f32) -> T {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        // B(t) = (1-t)³P0 + 3(1-t)²tP1 + 3(1-t)t²P2 + t³P3
        self.p0 * mt3 + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * t3
    }

    /// Evaluates the derivative (tangent) at parameter t.
    pub fn derivative(&self, t: f32) -> T {
        let t2 = t * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;

        // B'(t) = 3(1-t)²(P1-P0) + 6(1-t)t(P2-P1) + 3t²(P3-P2)
        (self.p1 - self.p0) * (3.0 * mt2)
            + (self.p2 - self.p1) * (6.0 * mt * t)
            + (self.p3 - self.p2) * (3.0 * t2)
    }
}

/// A Catmull-Rom spline that passes through all control points.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatmullRom<T: Interpolatable> {
    /// Control points (the curve passes through all of them).
    pub points: Vec<T>,
}

impl<T: Interpolatable> CatmullRom<T> {
    /// Creates a new Catmull-Rom spline.
    pub fn new(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Returns the number of segments.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Evaluates the spline at parameter t (0 to segment_count).
    ///
    /// Returns `None` if the spline has no control points.
    pub fn position_at_segment(&self, t: f32) -> Option<T> {
        match self.points.len() {
            0 => None,
            1 => Some(self.points[0]),
            _ => {
                let (segment, local_t) = locate(t, self.segment_count());
                let [p0, p1, p2, p3] = self.segment_points(segment);
                Some(catmull_rom_segment(p0, p1, p2, p3, local_t))
            }
        }
    }

    /// Evaluates the derivative at parameter t (0 to segment_count).
    ///
    /// Returns `None` if the spline has fewer than two control points.
    pub fn derivative_at_segment(&self, t: f32) -> Option<T> {
        if self.points.len() < 2 {
            return None;
        }
        let (segment, local_t) = locate(t, self.segment_count());
        let [p0, p1, p2, p3] = self.segment_points(segment);
        Some(catmull_rom_derivative(p0, p1, p2, p3, local_t))
    }

    /// The four control points influencing a segment, with the ends repeated.
    fn segment_points(&self, segment: usize) -> [T; 4] {
        let n = self.points.len();
        let i0 = segment.saturating_sub(1);
        let i2 = (segment + 1).min(n - 1);
        let i3 = (segment + 2).min(n - 1);
        [
            self.points[i0],
            self.points[segment],
            self.points[i2],
            self.points[i3],
        ]
    }
}

impl<T: Interpolatable> Default for CatmullRom<T> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

/// A piecewise cubic Bezier spline with continuity.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BezierSpline<T: Interpolatable> {
    /// Bezier segments.
    pub segments: Vec<CubicBezier<T>>,
}

impl<T: Interpolatable> BezierSpline<T> {
    /// Creates an empty spline.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Creates from a list of points with automatic tangents.
    pub fn from_points(points: &[T]) -> Self {
        if points.len() < 2 {
            return Self::new();
        }

        let tangent_scale = 0.25;
        let segments = (0..points.len() - 1)
            .map(|i| {
                let p0 = points[i];
                let p3 = points[i + 1];

                let t0 = if i == 0 {
                    p3 - p0
                } else {
                    points[i + 1] - points[i - 1]
                };
                let t1 = if i + 2 >= points.len() {
                    p3 - p0
                } else {
                    points[i + 2] - points[i]
                };

                CubicBezier::new(p0, p0 + t0 * tangent_scale, p3 - t1 * tangent_scale, p3)
            })
            .collect();

        Self { segments }
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the spline is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Evaluates the spline at parameter t (0 to len).
    ///
    /// Returns `None` if the spline has no segments.
    pub fn position_at_segment(&self, t: f32) -> Option<T> {
        if self.segments.is_empty() {
            return None;
        }
        let (segment, local_t) = locate(t, self.segments.len());
        Some(self.segments[segment].evaluate(local_t))
    }

    /// Evaluates the derivative at parameter t (0 to len).
    ///
    /// Returns `None` if the spline has no segments.
    pub fn derivative_at_segment(&self, t: f32) -> Option<T> {
        if self.segments.is_empty() {
            return None;
        }
        let (segment, local_t) = locate(t, self.segments.len());
        Some(self.segments[segment].derivative(local_t))
    }
}

impl<T: Interpolatable> Default for BezierSpline<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Linear interpolation between two values.
fn lerp<T: Interpolatable>(a: T, b: T, t: f32) -> T {
    a * (1.0 - t) + b * t
}

/// Splits a parameter in `[0, segments]` into a segment index and local t.
///
/// `segments` must be non-zero.
fn locate(t: f32, segments: usize) -> (usize, f32) {
    let t_clamped = if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, segments as f32)
    };
    let segment = (t_clamped.floor() as usize).min(segments - 1);
    (segment, t_clamped - segment as f32)
}

/// Evaluates a single Catmull-Rom segment.
fn catmull_rom_segment<T: Interpolatable>(p0: T, p1: T, p2: T, p3: T, t: f32) -> T {
    let t2 = t * t;
    let t3 = t2 * t;

    // P(t) = 0.5 * [(2P1) + (-P0 + P2)t + (2P0 - 5P1 + 4P2 - P3)t² + (-P0 + 3P1 - 3P2 + P3)t³]
    let [c0, c1, c2, c3] = catmull_rom_coefficients(p0, p1, p2, p3);
    (c0 + c1 * t + c2 * t2 + c3 * t3) * 0.5
}

/// Evaluates the derivative of a single Catmull-Rom segment.
fn catmull_rom_derivative<T: Interpolatable>(p0: T, p1: T, p2: T, p3: T, t: f32) -> T {
    let [_, c1, c2, c3] = catmull_rom_coefficients(p0, p1, p2, p3);
    (c1 + c2 * (2.0 * t) + c3 * (3.0 * t * t)) * 0.5
}

fn catmull_rom_coefficients<T: Interpolatable>(p0: T, p1: T, p2: T, p3: T) -> [T; 4] {
    [
        p1 * 2.0,
        p2 - p0,
        p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3,
        p1 * 3.0 - p0 - p2 * 3.0 + p3,
    ]
}
