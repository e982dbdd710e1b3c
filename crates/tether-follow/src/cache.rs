//! Reusable particle buffer owned by a follower.

use rhizome_tether_particle::Particle;

/// Scratch buffer particles are fetched into each frame.
///
/// Grows to the largest capacity ever requested and never shrinks. Contents
/// are not preserved across growth: the buffer is refilled in full every
/// frame.
#[derive(Debug, Clone, Default)]
pub struct ParticleCache {
    particles: Option<Vec<Particle>>,
}

impl ParticleCache {
    /// Creates an unallocated cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes room for at least `required` particles.
    ///
    /// Reallocates to exactly `required` slots when the cache is unallocated
    /// or smaller, and returns whether it did.
    pub fn ensure_capacity(&mut self, required: usize) -> bool {
        if self.capacity() >= required && self.is_allocated() {
            return false;
        }

        log::debug!(
            "growing particle cache from {} to {} slots",
            self.capacity(),
            required
        );
        self.particles = Some(vec![Particle::default(); required]);
        true
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.particles.as_ref().map_or(0, Vec::len)
    }

    /// Returns true once a buffer has been allocated.
    pub fn is_allocated(&self) -> bool {
        self.particles.is_some()
    }

    /// All slots, including stale ones past the last fetched count.
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        self.particles.as_deref_mut().unwrap_or_default()
    }

    /// The first `count` slots, clamped to the capacity.
    pub fn prefix_mut(&mut self, count: usize) -> &mut [Particle] {
        let slots = self.as_mut_slice();
        let count = count.min(slots.len());
        &mut slots[..count]
    }
}
