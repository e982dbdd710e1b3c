//! SplineProvider implementations for the Vec3 curve types.
//!
//! Each curve's native parameter range is rescaled to `[0, 1]`; tangents are
//! scaled by the same factor so they stay derivatives of the normalized curve.

use crate::{BezierSpline, CatmullRom, Polyline, SplineProvider};
use glam::Vec3;

impl SplineProvider for Polyline<Vec3> {
    fn position_at(&self, t: f32) -> Vec3 {
        let scale = self.segment_count() as f32;
        self.position_at_segment(t * scale).unwrap_or(Vec3::ZERO)
    }

    fn tangent_at(&self, t: f32) -> Vec3 {
        let scale = self.segment_count() as f32;
        self.derivative_at_segment(t * scale).map_or(Vec3::ZERO, |d| d * scale)
    }
}

impl SplineProvider for CatmullRom<Vec3> {
    fn position_at(&self, t: f32) -> Vec3 {
        let scale = self.segment_count() as f32;
        self.position_at_segment(t * scale).unwrap_or(Vec3::ZERO)
    }

    fn tangent_at(&self, t: f32) -> Vec3 {
        let scale = self.segment_count() as f32;
        self.derivative_at_segment(t * scale).map_or(Vec3::ZERO, |d| d * scale)
    }
}

impl SplineProvider for BezierSpline<Vec3> {
    fn position_at(&self, t: f32) -> Vec3 {
        let scale = self.len() as f32;
        self.position_at_segment(t * scale).unwrap_or(Vec3::ZERO)
    }

    fn tangent_at(&self, t: f32) -> Vec3 {
        let scale = self.len() as f32;
        self.derivative_at_segment(t * scale).map_or(Vec3::ZERO, |d| d * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_tangent<S: SplineProvider>(spline: &S) {
        let h = 1e-3;
        for &t in &[0.1, 0.37, 0.8] {
            let fd = (spline.position_at(t + h) - spline.position_at(t - h)) / (2.0 * h);
            let d = spline.tangent_at(t);
            assert!((fd - d).length() < 0.05 * d.length().max(1.0), "t={t}");
        }
    }

    #[test]
    fn test_normalized_endpoints() {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 1.0, 0.0),
        ];
        let poly = Polyline::new(points.clone());
        let catmull = CatmullRom::new(points.clone());
        let bezier = BezierSpline::from_points(&points);

        let splines: [&dyn SplineProvider; 3] = [&poly, &catmull, &bezier];
        for spline in splines {
            assert!((spline.position_at(0.0) - points[0]).length() < 1e-4);
            assert!((spline.position_at(1.0) - points[2]).length() < 1e-4);
        }
    }

    #[test]
    fn test_tangents_are_normalized_derivatives() {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 1.0, 1.0),
            Vec3::new(4.0, 0.0, 0.0),
        ];
        check_tangent(&Polyline::new(points.clone()));
        check_tangent(&CatmullRom::new(points.clone()));
        check_tangent(&BezierSpline::from_points(&points));
    }

    #[test]
    fn test_empty_curves_are_inert() {
        let catmull: CatmullRom<Vec3> = CatmullRom::default();
        let bezier: BezierSpline<Vec3> = BezierSpline::new();
        assert_eq!(catmull.position_at(0.5), Vec3::ZERO);
        assert_eq!(catmull.tangent_at(0.5), Vec3::ZERO);
        assert_eq!(bezier.position_at(0.5), Vec3::ZERO);
        assert_eq!(bezier.tangent_at(0.5), Vec3::ZERO);
    }
}
