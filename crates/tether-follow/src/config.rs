//! Host-side follower configuration.

use glam::Vec3;
use rhizome_tether_spline::{Projected, ProjectionSettings, SplineProvider};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::follower::SplineFollower;
use crate::sync::FollowOptions;

/// Errors that can occur while loading a [`FollowConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input was not valid configuration JSON.
    #[error("invalid follow config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Projection settings outside the accepted ranges.
    #[error("projection {field} must be in {min}..={max}, got {value}")]
    InvalidProjection {
        /// Offending field name.
        field: &'static str,
        /// Value that was rejected.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },
}

/// Upper bound on [`ProjectionSettings::samples`] accepted from configuration.
///
/// Each projection evaluates the spline `samples + 1` times per particle.
pub const MAX_PROJECTION_SAMPLES: usize = 4096;

/// Upper bound on [`ProjectionSettings::iterations`] accepted from configuration.
pub const MAX_PROJECTION_ITERATIONS: usize = 64;

/// Serializable settings for a [`SplineFollower`].
///
/// Every field is optional in the serialized form:
///
/// ```json
/// { "follow": { "position": true, "velocity": true }, "projection": { "samples": 128 } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    /// Attributes overwritten from the spline.
    pub follow: FollowOptions,
    /// Nearest-point search settings.
    pub projection: ProjectionSettings,
    /// Up vector for orientation frames; the spline's own when absent.
    pub up: Option<Vec3>,
}

impl FollowConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks values serde cannot.
    ///
    /// `samples` must be in `1..=`[`MAX_PROJECTION_SAMPLES`] and `iterations`
    /// at most [`MAX_PROJECTION_ITERATIONS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let projection = &self.projection;
        check_range("samples", projection.samples, 1, MAX_PROJECTION_SAMPLES)?;
        check_range("iterations", projection.iterations, 0, MAX_PROJECTION_ITERATIONS)
    }

    /// Creates a follower with these options.
    pub fn follower(&self) -> SplineFollower {
        SplineFollower::new(self.follow)
    }

    /// Wraps `spline` so it projects and orients with these settings.
    pub fn apply<S: SplineProvider>(&self, spline: S) -> Projected<S> {
        let projected = Projected::new(spline, self.projection);
        match self.up {
            Some(up) => projected.with_up(up),
            None => projected,
        }
    }
}

fn check_range(
    field: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProjection {
            field,
            value,
            min,
            max,
        })
    }
}
