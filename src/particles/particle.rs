use glam::Vec2;

use crate::pool::Poolable;
use crate::scene::NodeKey;
use crate::scene::node::Node;

/// Simulation state of one pooled particle.
///
/// The visual side (position, alpha, tint...) lives on the particle's scene
/// node; this struct only carries what the integrator and the plugins need.
#[derive(Debug, Clone)]
pub struct Particle {
    node: NodeKey,
    /// Added to the node position every step.
    pub velocity: Vec2,
    /// Added to `velocity` every step.
    pub acceleration: Vec2,
    pub elapsed_time: f32,
    pub lifetime: f32,
    pub is_alive: bool,
    pool_slot: Option<usize>,
}

impl Particle {
    #[must_use]
    pub fn new(node: NodeKey) -> Self {
        Self {
            node,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            elapsed_time: 0.0,
            lifetime: 0.0,
            is_alive: false,
            pool_slot: None,
        }
    }

    /// The scene node this particle drives. Stable for the particle's whole
    /// pooled lifetime.
    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// `elapsed_time / lifetime` clamped to `[0, 1]`. A zero lifetime counts
    /// as fully aged.
    #[must_use]
    pub fn age_fraction(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.elapsed_time / self.lifetime).clamp(0.0, 1.0)
    }

    pub(crate) fn respawn(&mut self, lifetime: f32) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.elapsed_time = 0.0;
        self.lifetime = lifetime;
        self.is_alive = true;
    }
}

impl Poolable for Particle {
    fn pool_slot(&self) -> Option<usize> {
        self.pool_slot
    }

    fn set_pool_slot(&mut self, slot: Option<usize>) {
        self.pool_slot = slot;
    }
}

/// Mutable view of a live particle together with its node, handed to
/// per-particle plugin hooks.
pub struct ParticleMut<'a> {
    pub particle: &'a mut Particle,
    pub node: &'a mut Node,
}

impl ParticleMut<'_> {
    #[inline]
    #[must_use]
    pub fn age_fraction(&self) -> f32 {
        self.particle.age_fraction()
    }
}
