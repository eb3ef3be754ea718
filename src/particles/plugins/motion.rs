use glam::Vec2;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::particles::particle::ParticleMut;
use crate::particles::plugin::{EmitterContext, EmitterPlugin};

/// Gives every new particle the same acceleration (e.g. gravity).
#[derive(Debug, Clone, Copy)]
pub struct ConstantAcceleration(pub Vec2);

impl EmitterPlugin for ConstantAcceleration {
    fn initialize(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>) {
        particle.particle.acceleration = self.0;
    }
}

fn sample_between(rng: &mut StdRng, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.random_range(lo..=hi)
}

/// Initial velocity drawn per axis from `[min, max]`.
#[derive(Debug)]
pub struct RandomVelocity {
    min: Vec2,
    max: Vec2,
    rng: StdRng,
}

impl RandomVelocity {
    #[must_use]
    pub fn new(min: Vec2, max: Vec2, seed: u64) -> Self {
        Self {
            min,
            max,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EmitterPlugin for RandomVelocity {
    fn initialize(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>) {
        particle.particle.velocity = Vec2::new(
            sample_between(&mut self.rng, self.min.x, self.max.x),
            sample_between(&mut self.rng, self.min.y, self.max.y),
        );
    }
}

/// Places new particles uniformly inside a rectangle centred on the emitter.
#[derive(Debug)]
pub struct SpawnArea {
    half_extents: Vec2,
    rng: StdRng,
}

impl SpawnArea {
    #[must_use]
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            half_extents: Vec2::new(width.abs(), height.abs()) * 0.5,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EmitterPlugin for SpawnArea {
    fn initialize(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>) {
        let h = self.half_extents;
        particle.node.transform.position = Vec2::new(
            sample_between(&mut self.rng, -h.x, h.x),
            sample_between(&mut self.rng, -h.y, h.y),
        );
    }
}

/// Rotates particles at a constant angular speed (radians per second).
#[derive(Debug, Clone, Copy)]
pub struct Spin {
    pub radians_per_second: f32,
}

impl EmitterPlugin for Spin {
    fn update(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>, dt: f32) {
        particle.node.transform.rotate(self.radians_per_second * dt);
    }
}
