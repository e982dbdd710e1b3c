//! Snapping particle state onto a spline.

use glam::Vec3;
use rhizome_tether_particle::Particle;
use rhizome_tether_spline::{euler_angles, SplineProvider};
use serde::{Deserialize, Serialize};

/// Which particle attributes are overwritten from the spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowOptions {
    /// Move particles onto the nearest spline point.
    pub position: bool,
    /// Keep only the tangential part of each particle's velocity.
    pub velocity: bool,
    /// Align particle rotation with the spline orientation.
    pub rotation: bool,
}

impl FollowOptions {
    /// Every attribute follows the spline.
    pub const ALL: Self = Self {
        position: true,
        velocity: true,
        rotation: true,
    };

    /// Nothing follows the spline.
    pub const NONE: Self = Self {
        position: false,
        velocity: false,
        rotation: false,
    };

    /// Only the position follows the spline.
    pub fn position_only() -> Self {
        Self {
            position: true,
            ..Self::NONE
        }
    }

    /// Only the velocity follows the spline.
    pub fn velocity_only() -> Self {
        Self {
            velocity: true,
            ..Self::NONE
        }
    }

    /// Only the rotation follows the spline.
    pub fn rotation_only() -> Self {
        Self {
            rotation: true,
            ..Self::NONE
        }
    }

    /// Returns true if any attribute follows the spline.
    pub fn is_active(&self) -> bool {
        self.position || self.velocity || self.rotation
    }
}

/// Projects `vector` onto the line spanned by `direction`.
///
/// A (near) zero `direction` yields zero.
pub fn project_onto_vector(vector: Vec3, direction: Vec3) -> Vec3 {
    let len_sq = direction.length_squared();
    if len_sq < 1e-12 {
        return Vec3::ZERO;
    }
    direction * (vector.dot(direction) / len_sq)
}

/// Overwrites the selected attributes of every particle in `particles` from
/// the spline point nearest to it. Returns how many particles were processed.
///
/// Does nothing, and queries nothing, when no option is set.
pub fn synchronize<S: SplineProvider + ?Sized>(
    particles: &mut [Particle],
    spline: &S,
    options: FollowOptions,
) -> usize {
    if !options.is_active() {
        return 0;
    }

    for particle in particles.iter_mut() {
        let t = spline.project_to_parameter(particle.position);
        let point = spline.evaluate(t);

        if options.position {
            particle.position = point.position;
        }
        if options.velocity {
            particle.velocity = project_onto_vector(particle.velocity, spline.forward(t));
        }
        if options.rotation {
            particle.rotation = euler_angles(point.rotation);
        }
    }

    particles.len()
}
