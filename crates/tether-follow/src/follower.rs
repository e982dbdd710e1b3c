//! Per-tick hook that drives [`synchronize`] against a particle source.

use rhizome_tether_particle::{ParticleSource, SimulationSpace};
use rhizome_tether_spline::SplineProvider;

use crate::cache::ParticleCache;
use crate::sync::{synchronize, FollowOptions};

/// Binds a particle source to a spline, once per frame.
///
/// Call [`late_update`](Self::late_update) from the host's tick after the
/// particle simulation has advanced for that tick.
#[derive(Debug, Clone, Default)]
pub struct SplineFollower {
    /// Attributes overwritten from the spline.
    pub options: FollowOptions,
    cache: ParticleCache,
}

impl SplineFollower {
    /// Creates a follower with the given options.
    pub fn new(options: FollowOptions) -> Self {
        Self {
            options,
            cache: ParticleCache::new(),
        }
    }

    /// The follower's scratch buffer.
    pub fn cache(&self) -> &ParticleCache {
        &self.cache
    }

    /// Fetches the live particles from `source`, snaps them to `spline`, and
    /// writes them back. Returns how many particles were written back.
    ///
    /// Idle when no option is set or either reference is missing: nothing is
    /// allocated, queried, or changed. Otherwise the source is switched to
    /// [`SimulationSpace::World`] first, since projection works on world
    /// coordinates.
    pub fn late_update<P, S>(&mut self, source: Option<&mut P>, spline: Option<&S>) -> usize
    where
        P: ParticleSource + ?Sized,
        S: SplineProvider + ?Sized,
    {
        let (Some(source), Some(spline)) = (source, spline) else {
            return 0;
        };
        if !self.options.is_active() {
            return 0;
        }

        if source.simulation_space() != SimulationSpace::World {
            log::debug!(
                "forcing world simulation space (was {:?})",
                source.simulation_space()
            );
            source.set_simulation_space(SimulationSpace::World);
        }

        self.cache.ensure_capacity(source.max_particles());

        let count = source.get_particles(self.cache.as_mut_slice());
        let particles = self.cache.prefix_mut(count);
        synchronize(particles, spline, self.options);
        source.set_particles(particles);

        log::trace!("synchronized {} particles to spline", particles.len());
        particles.len()
    }
}
