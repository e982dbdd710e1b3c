//! Binds particle state to a spline, once per frame.
//!
//! - [`synchronize`] - snaps a slice of particles to a spline
//! - [`SplineFollower`] - per-tick hook that fetches, synchronizes and writes
//!   back a [`ParticleSource`]'s particles
//! - [`ParticleCache`] - grow-only scratch buffer the follower fetches into
//! - [`FollowConfig`] - JSON-loadable follower settings
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use rhizome_tether_follow::{FollowOptions, SplineFollower};
//! use rhizome_tether_particle::{Particle, ParticleSystem};
//! use rhizome_tether_spline::Polyline;
//!
//! let spline = Polyline::line(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
//! let mut system = ParticleSystem::new(64);
//! system.spawn(Particle::new(Vec3::new(5.0, 3.0, 0.0)));
//!
//! let mut follower = SplineFollower::new(FollowOptions::position_only());
//! follower.late_update(Some(&mut system), Some(&spline));
//!
//! assert!((system.particles()[0].position - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
//! ```

mod cache;
mod config;
mod follower;
mod sync;

pub use cache::ParticleCache;
pub use config::{ConfigError, FollowConfig, MAX_PROJECTION_ITERATIONS, MAX_PROJECTION_SAMPLES};
pub use follower::SplineFollower;
pub use sync::{project_onto_vector, synchronize, FollowOptions};

pub use rhizome_tether_particle::{ParticleSource, SimulationSpace};
pub use rhizome_tether_spline::{SplinePoint, SplineProvider};
