//! Oriented evaluation and nearest-point projection over a normalized domain.

use glam::{Quat, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::frame::orientation_from_forward;

/// A position and orientation on a spline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplinePoint {
    /// Position on the curve.
    pub position: Vec3,
    /// Orientation whose local +Z follows the curve direction.
    pub rotation: Quat,
}

/// Controls the nearest-point search in [`nearest_parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectionSettings {
    /// Uniform samples taken over `[0, 1]` before refinement.
    pub samples: usize,
    /// Maximum Newton refinement steps.
    pub iterations: usize,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            samples: 64,
            iterations: 8,
        }
    }
}

/// A 3D curve that can be queried by a normalized parameter `t` in `[0, 1]`.
///
/// Implementors supply position and derivative; projection, direction and
/// orientation are derived from those.
pub trait SplineProvider {
    /// Position at `t`.
    fn position_at(&self, t: f32) -> Vec3;

    /// Derivative of the position with respect to `t`.
    fn tangent_at(&self, t: f32) -> Vec3;

    /// Reference up vector used to build orientation frames.
    fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Settings used by [`project_to_parameter`](Self::project_to_parameter).
    fn projection(&self) -> ProjectionSettings {
        ProjectionSettings::default()
    }

    /// Unit direction of travel at `t`, or zero where the curve is degenerate.
    fn forward(&self, t: f32) -> Vec3 {
        self.tangent_at(t).normalize_or_zero()
    }

    /// Position and orientation at `t`.
    fn evaluate(&self, t: f32) -> SplinePoint {
        SplinePoint {
            position: self.position_at(t),
            rotation: orientation_from_forward(self.forward(t), self.up()),
        }
    }

    /// Parameter of the curve point closest to `point`.
    fn project_to_parameter(&self, point: Vec3) -> f32 {
        nearest_parameter(self, point, self.projection())
    }
}

impl<S: SplineProvider + ?Sized> SplineProvider for &S {
    fn position_at(&self, t: f32) -> Vec3 {
        (**self).position_at(t)
    }

    fn tangent_at(&self, t: f32) -> Vec3 {
        (**self).tangent_at(t)
    }

    fn up(&self) -> Vec3 {
        (**self).up()
    }

    fn projection(&self) -> ProjectionSettings {
        (**self).projection()
    }

    fn forward(&self, t: f32) -> Vec3 {
        (**self).forward(t)
    }

    fn evaluate(&self, t: f32) -> SplinePoint {
        (**self).evaluate(t)
    }

    fn project_to_parameter(&self, point: Vec3) -> f32 {
        (**self).project_to_parameter(point)
    }
}

/// Finds the parameter of the point on `spline` closest to `point`.
///
/// Takes `settings.samples + 1` uniform samples, keeps the first strictly
/// closest one, then refines it with Newton steps along the tangent. A step
/// that does not bring the curve point closer ends the refinement.
pub fn nearest_parameter<S: SplineProvider + ?Sized>(
    spline: &S,
    point: Vec3,
    settings: ProjectionSettings,
) -> f32 {
    let samples = settings.samples.max(1);
    let mut best_t = 0.0;
    let mut best_dist = f32::MAX;

    for i in 0..=samples {
        let t = i as f32 / samples as f32;
        let dist = spline.position_at(t).distance_squared(point);
        if dist < best_dist {
            best_dist = dist;
            best_t = t;
        }
    }

    for _ in 0..settings.iterations {
        let d = spline.tangent_at(best_t);
        let d_len_sq = d.length_squared();
        if d_len_sq < 1e-10 {
            break;
        }

        let diff = spline.position_at(best_t) - point;
        let next_t = (best_t - diff.dot(d) / d_len_sq).clamp(0.0, 1.0);
        let next_dist = spline.position_at(next_t).distance_squared(point);
        if !(next_dist < best_dist) {
            break;
        }
        best_t = next_t;
        best_dist = next_dist;
    }

    best_t
}

/// Wraps a spline with custom projection settings and up vector.
#[derive(Debug, Clone, Copy)]
pub struct Projected<S> {
    spline: S,
    settings: ProjectionSettings,
    up: Vec3,
}

impl<S: SplineProvider> Projected<S> {
    /// Wraps `spline`, keeping its up vector.
    pub fn new(spline: S, settings: ProjectionSettings) -> Self {
        let up = spline.up();
        Self {
            spline,
            settings,
            up,
        }
    }

    /// Overrides the up vector used for orientation.
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }
}

impl<S: SplineProvider> SplineProvider for Projected<S> {
    fn position_at(&self, t: f32) -> Vec3 {
        self.spline.position_at(t)
    }

    fn tangent_at(&self, t: f32) -> Vec3 {
        self.spline.tangent_at(t)
    }

    fn up(&self) -> Vec3 {
        self.up
    }

    fn projection(&self) -> ProjectionSettings {
        self.settings
    }

    fn forward(&self, t: f32) -> Vec3 {
        self.spline.forward(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatmullRom, Polyline};
    use std::f32::consts::FRAC_PI_2;

    fn x_axis() -> Polyline<Vec3> {
        Polyline::line(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0))
    }

    #[test]
    fn test_project_onto_line() {
        let line = x_axis();
        let t = line.project_to_parameter(Vec3::new(5.0, 3.0, 0.0));
        assert!((t - 0.5).abs() < 1e-4);

        let t = line.project_to_parameter(Vec3::new(2.5, -1.0, 4.0));
        assert!((t - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_project_past_ends_clamps() {
        let line = x_axis();
        assert_eq!(line.project_to_parameter(Vec3::new(-5.0, 1.0, 0.0)), 0.0);
        assert_eq!(line.project_to_parameter(Vec3::new(15.0, 1.0, 0.0)), 1.0);
    }

    #[test]
    fn test_newton_refines_between_samples() {
        let line = Projected::new(
            x_axis(),
            ProjectionSettings {
                samples: 4,
                iterations: 8,
            },
        );
        let t = line.project_to_parameter(Vec3::new(3.3, 2.0, 0.0));
        assert!((t - 0.33).abs() < 1e-4);
    }

    #[test]
    fn test_projection_on_curve() {
        let spline = CatmullRom::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(6.0, 2.0, 0.0),
        ]);

        // Projecting a point that lies on the curve returns that point.
        let target = spline.position_at(0.4);
        let t = spline.project_to_parameter(target);
        assert!(spline.position_at(t).distance(target) < 1e-3);
    }

    #[test]
    fn test_projection_never_worse_than_samples() {
        let spline = CatmullRom::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 3.0, 0.0),
            Vec3::new(3.0, -1.0, 1.0),
            Vec3::new(4.0, 0.0, 0.0),
        ]);
        let point = Vec3::new(2.0, 1.0, 2.0);

        let t = spline.project_to_parameter(point);
        let best = spline.position_at(t).distance(point);
        for i in 0..=64 {
            let sample = spline.position_at(i as f32 / 64.0).distance(point);
            assert!(best <= sample + 1e-5);
        }
    }

    #[test]
    fn test_evaluate_orientation_follows_tangent() {
        let line = x_axis();
        let point = line.evaluate(0.5);

        assert!((point.position - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
        assert!((point.rotation * Vec3::Z - Vec3::X).length() < 1e-5);
        assert!((point.rotation * Vec3::Y - Vec3::Y).length() < 1e-5);
        assert!(point
            .rotation
            .abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2), 1e-5));
    }

    #[test]
    fn test_forward_is_unit() {
        let line = x_axis();
        assert!((line.forward(0.3) - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_spline() {
        let empty: Polyline<Vec3> = Polyline::default();
        assert_eq!(empty.project_to_parameter(Vec3::ONE), 0.0);
        assert_eq!(empty.forward(0.5), Vec3::ZERO);
        assert_eq!(empty.evaluate(0.5).rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_projected_up_override() {
        let vertical = Polyline::line(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0));
        let wrapped = Projected::new(&vertical, ProjectionSettings::default()).with_up(Vec3::Z);

        let rotation = wrapped.evaluate(0.5).rotation;
        assert!((rotation * Vec3::Z - Vec3::Y).length() < 1e-5);
        // Local +Y leans toward the overridden up vector.
        assert!((rotation * Vec3::Y).dot(Vec3::Z) > 0.99);
    }

    /// Line along +X whose reported direction is overridden to +Z.
    struct SteeredLine;

    impl SplineProvider for SteeredLine {
        fn position_at(&self, t: f32) -> Vec3 {
            Vec3::new(10.0 * t, 0.0, 0.0)
        }

        fn tangent_at(&self, _t: f32) -> Vec3 {
            Vec3::new(10.0, 0.0, 0.0)
        }

        fn forward(&self, _t: f32) -> Vec3 {
            Vec3::Z
        }
    }

    #[test]
    fn test_projected_keeps_inner_forward() {
        let wrapped = Projected::new(SteeredLine, ProjectionSettings::default());

        assert_eq!(wrapped.forward(0.5), Vec3::Z);
        let rotation = wrapped.evaluate(0.5).rotation;
        assert!((rotation * Vec3::Z - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_inherent_and_provider_domains_agree() {
        let poly = Polyline::new(vec![
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
        ]);

        // Provider t is normalized, the inherent one spans segments.
        let normalized = SplineProvider::evaluate(&poly, 0.5).position;
        let per_segment = poly.position_at_segment(1.0).unwrap();
        assert!((normalized - per_segment).length() < 1e-5);
        assert!((poly.evaluate(0.5).position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }
}
