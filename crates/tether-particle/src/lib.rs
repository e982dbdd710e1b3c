//! Particle buffers for spline-following effects.
//!
//! Provides the [`Particle`] record, the [`ParticleSource`] trait through which
//! a particle buffer is fetched and written back, and [`ParticleSystem`], an
//! in-memory buffer with emitters that implements it.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single particle with position, velocity, rotation, and lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Particle {
    /// Position in simulation space.
    pub position: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// Rotation as Euler angles in radians (about X, Y, Z).
    pub rotation: Vec3,
    /// Current age in seconds.
    pub age: f32,
    /// Total lifetime in seconds.
    pub lifetime: f32,
    /// Size (can be used for rendering).
    pub size: f32,
    /// Color (RGBA).
    pub color: [f32; 4],
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            age: 0.0,
            lifetime: 1.0,
            size: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Particle {
    /// Creates a new particle at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sets the velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Returns true if the particle is still alive.
    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }
}

/// Coordinate frame particle attributes are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SimulationSpace {
    /// Relative to the owning object's transform.
    #[default]
    Local,
    /// Absolute world coordinates.
    World,
}

/// A particle buffer that can be fetched, mutated, and written back.
///
/// This is the surface a frame synchronizer sees: a configured maximum, a
/// simulation space setting, and a copy-out / copy-in pair for the live
/// particles.
pub trait ParticleSource {
    /// Maximum number of live particles the source can hold.
    fn max_particles(&self) -> usize;

    /// Current simulation space.
    fn simulation_space(&self) -> SimulationSpace;

    /// Changes the simulation space.
    fn set_simulation_space(&mut self, space: SimulationSpace);

    /// Copies live particles into `buffer` and returns how many were copied.
    ///
    /// At most `buffer.len()` particles are copied.
    fn get_particles(&self, buffer: &mut [Particle]) -> usize;

    /// Replaces the live particles with `particles`.
    ///
    /// Particles past [`max_particles`](Self::max_particles) are dropped.
    fn set_particles(&mut self, particles: &[Particle]);
}

/// Describes how particles are spawned.
pub trait Emitter: Send + Sync {
    /// Spawns a new particle with initial properties.
    fn emit(&self, rng: &mut ParticleRng) -> Particle;
}

/// Simple random number generator for particle systems.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParticleRng {
    state: u64,
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

impl ParticleRng {
    /// Creates a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        // xorshift never leaves zero
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a random f32 in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit the f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Returns a random f32 in [min, max).
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns a random point on a unit sphere.
    pub fn unit_sphere(&mut self) -> Vec3 {
        loop {
            let x = self.range(-1.0, 1.0);
            let y = self.range(-1.0, 1.0);
            let z = self.range(-1.0, 1.0);
            let len_sq = x * x + y * y + z * z;
            if len_sq > 0.0001 && len_sq <= 1.0 {
                return Vec3::new(x, y, z).normalize();
            }
        }
    }
}

// ============================================================================
// Particle system
// ============================================================================

/// In-memory particle buffer with a fixed maximum.
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
    simulation_space: SimulationSpace,
    rng: ParticleRng,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ParticleSystem {
    /// Creates a new particle system with the given capacity.
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            max_particles,
            simulation_space: SimulationSpace::default(),
            rng: ParticleRng::default(),
        }
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ParticleRng::new(seed);
        self
    }

    /// Sets the simulation space.
    pub fn with_simulation_space(mut self, space: SimulationSpace) -> Self {
        self.simulation_space = space;
        self
    }

    /// Changes the maximum particle count, dropping the newest particles
    /// above the new limit.
    pub fn set_max_particles(&mut self, max_particles: usize) {
        self.max_particles = max_particles;
        self.particles.truncate(max_particles);
    }

    /// Returns the current particle count.
    pub fn count(&self) -> usize {
        self.particles.len()
    }

    /// Returns true if the system is at capacity.
    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.max_particles
    }

    /// Returns a slice of all live particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Adds a single particle if there is room. Returns false when full.
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.is_full() {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Emits particles from the given emitter.
    pub fn emit(&mut self, emitter: &dyn Emitter, count: usize) {
        let available = self.max_particles.saturating_sub(self.particles.len());
        let to_emit = count.min(available);

        for _ in 0..to_emit {
            let particle = emitter.emit(&mut self.rng);
            self.particles.push(particle);
        }
    }

    /// Advances particles by `dt`: moves them along their velocity, ages
    /// them, and removes the dead.
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.position += particle.velocity * dt;
            particle.age += dt;
        }

        self.particles.retain(|p| p.is_alive());
    }

    /// Clears all particles.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl ParticleSource for ParticleSystem {
    fn max_particles(&self) -> usize {
        self.max_particles
    }

    fn simulation_space(&self) -> SimulationSpace {
        self.simulation_space
    }

    fn set_simulation_space(&mut self, space: SimulationSpace) {
        self.simulation_space = space;
    }

    fn get_particles(&self, buffer: &mut [Particle]) -> usize {
        let count = self.particles.len().min(buffer.len());
        buffer[..count].copy_from_slice(&self.particles[..count]);
        count
    }

    fn set_particles(&mut self, particles: &[Particle]) {
        let count = particles.len().min(self.max_particles);
        self.particles.clear();
        self.particles.extend_from_slice(&particles[..count]);
    }
}

// ============================================================================
// Built-in Emitters
// ============================================================================

/// Emits particles from a single point.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointEmitter {
    /// Emission position.
    pub position: Vec3,
    /// Initial velocity direction.
    pub direction: Vec3,
    /// Velocity spread (0 = along `direction`, 1 = any direction).
    pub spread: f32,
    /// Minimum initial speed.
    pub speed_min: f32,
    /// Maximum initial speed.
    pub speed_max: f32,
    /// Minimum lifetime.
    pub lifetime_min: f32,
    /// Maximum lifetime.
    pub lifetime_max: f32,
    /// Initial size.
    pub size: f32,
    /// Initial color.
    pub color: [f32; 4],
}

impl Default for PointEmitter {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::Y,
            spread: 0.5,
            speed_min: 1.0,
            speed_max: 2.0,
            lifetime_min: 1.0,
            lifetime_max: 2.0,
            size: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Emitter for PointEmitter {
    fn emit(&self, rng: &mut ParticleRng) -> Particle {
        let base = self.direction.normalize_or_zero();
        let dir = if self.spread > 0.0 {
            let random_dir = rng.unit_sphere();
            let spread_amount = rng.next_f32() * self.spread;
            base.lerp(random_dir, spread_amount).normalize_or_zero()
        } else {
            base
        };

        let speed = rng.range(self.speed_min, self.speed_max);
        let lifetime = rng.range(self.lifetime_min, self.lifetime_max);

        Particle {
            position: self.position,
            velocity: dir * speed,
            rotation: Vec3::ZERO,
            age: 0.0,
            lifetime,
            size: self.size,
            color: self.color,
        }
    }
}

/// Emits particles from a sphere surface or volume.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SphereEmitter {
    /// Center position.
    pub center: Vec3,
    /// Sphere radius.
    pub radius: f32,
    /// If true, emit from volume; if false, emit from surface.
    pub volume: bool,
    /// Minimum initial speed (outward from center).
    pub speed_min: f32,
    /// Maximum initial speed.
    pub speed_max: f32,
    /// Minimum lifetime.
    pub lifetime_min: f32,
    /// Maximum lifetime.
    pub lifetime_max: f32,
    /// Initial size.
    pub size: f32,
    /// Initial color.
    pub color: [f32; 4],
}

impl Default for SphereEmitter {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
            volume: false,
            speed_min: 1.0,
            speed_max: 2.0,
            lifetime_min: 1.0,
            lifetime_max: 2.0,
            size: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Emitter for SphereEmitter {
    fn emit(&self, rng: &mut ParticleRng) -> Particle {
        let dir = rng.unit_sphere();
        let dist = if self.volume {
            self.radius * rng.next_f32().powf(1.0 / 3.0)
        } else {
            self.radius
        };

        let speed = rng.range(self.speed_min, self.speed_max);
        let lifetime = rng.range(self.lifetime_min, self.lifetime_max);

        Particle {
            position: self.center + dir * dist,
            velocity: dir * speed,
            rotation: Vec3::ZERO,
            age: 0.0,
            lifetime,
            size: self.size,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_lifetime() {
        let mut p = Particle::new(Vec3::ZERO);
        p.lifetime = 2.0;

        assert!(p.is_alive());

        p.age = 1.0;
        assert!(p.is_alive());

        p.age = 2.0;
        assert!(!p.is_alive());
    }

    #[test]
    fn test_particle_rng() {
        let mut rng = ParticleRng::new(42);

        for _ in 0..100 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }

        for _ in 0..100 {
            let v = rng.range(5.0, 10.0);
            assert!((5.0..10.0).contains(&v));
        }
    }

    #[test]
    fn test_particle_rng_zero_seed() {
        let mut rng = ParticleRng::new(0);
        let a = rng.next_f32();
        let b = rng.next_f32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_particle_rng_unit_sphere() {
        let mut rng = ParticleRng::new(42);

        for _ in 0..100 {
            let v = rng.unit_sphere();
            assert!((v.length() - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_particle_system_emit() {
        let mut system = ParticleSystem::new(100);
        let emitter = PointEmitter::default();

        system.emit(&emitter, 10);
        assert_eq!(system.count(), 10);

        system.emit(&emitter, 50);
        assert_eq!(system.count(), 60);
    }

    #[test]
    fn test_particle_system_capacity() {
        let mut system = ParticleSystem::new(10);
        let emitter = PointEmitter::default();

        system.emit(&emitter, 100);
        assert_eq!(system.count(), 10);
        assert!(system.is_full());
        assert!(!system.spawn(Particle::default()));
    }

    #[test]
    fn test_particle_system_update() {
        let mut system = ParticleSystem::new(100);
        system.spawn(Particle::new(Vec3::ZERO).with_velocity(Vec3::X));
        system.spawn(Particle {
            lifetime: 0.05,
            ..Default::default()
        });

        system.update(0.1);

        assert_eq!(system.count(), 1);
        assert!((system.particles()[0].position - Vec3::new(0.1, 0.0, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_set_max_particles_truncates() {
        let mut system = ParticleSystem::new(10);
        system.emit(&PointEmitter::default(), 10);

        system.set_max_particles(4);
        assert_eq!(system.count(), 4);
        assert_eq!(system.max_particles(), 4);
    }

    #[test]
    fn test_get_particles_bounded_by_buffer() {
        let mut system = ParticleSystem::new(10);
        system.emit(&PointEmitter::default(), 6);

        let mut small = vec![Particle::default(); 4];
        assert_eq!(system.get_particles(&mut small), 4);

        let mut large = vec![Particle::default(); 10];
        assert_eq!(system.get_particles(&mut large), 6);
        assert_eq!(&large[..6], system.particles());
    }

    #[test]
    fn test_set_particles_replaces_live_set() {
        let mut system = ParticleSystem::new(3);
        system.emit(&PointEmitter::default(), 3);

        let replacement = [Particle::new(Vec3::ONE), Particle::new(Vec3::NEG_ONE)];
        system.set_particles(&replacement);
        assert_eq!(system.particles(), &replacement);

        let too_many = [Particle::default(); 5];
        system.set_particles(&too_many);
        assert_eq!(system.count(), 3);
    }

    #[test]
    fn test_simulation_space() {
        let mut system = ParticleSystem::new(1);
        assert_eq!(system.simulation_space(), SimulationSpace::Local);

        system.set_simulation_space(SimulationSpace::World);
        assert_eq!(system.simulation_space(), SimulationSpace::World);
    }

    #[test]
    fn test_sphere_emitter() {
        let mut system = ParticleSystem::new(100);
        let emitter = SphereEmitter {
            center: Vec3::ZERO,
            radius: 1.0,
            volume: false,
            ..Default::default()
        };

        system.emit(&emitter, 50);

        for p in system.particles() {
            assert!((p.position.length() - 1.0).abs() < 0.001);
        }
    }
}
