use crate::particles::particle::ParticleMut;
use crate::particles::plugin::{EmitterContext, EmitterPlugin};
use crate::resources::Color;

#[inline]
fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Interpolates node alpha from `start` to `end` over the particle's life.
#[derive(Debug, Clone, Copy)]
pub struct AlphaOverLife {
    pub start: f32,
    pub end: f32,
}

impl EmitterPlugin for AlphaOverLife {
    fn initialize(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>) {
        particle.node.set_alpha(self.start);
    }

    fn update(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>, _dt: f32) {
        let t = particle.age_fraction();
        particle.node.set_alpha(lerp(self.start, self.end, t));
    }
}

/// Interpolates uniform scale over the particle's life.
#[derive(Debug, Clone, Copy)]
pub struct ScaleOverLife {
    pub start: f32,
    pub end: f32,
}

impl EmitterPlugin for ScaleOverLife {
    fn initialize(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>) {
        particle.node.transform.set_uniform_scale(self.start);
    }

    fn update(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>, _dt: f32) {
        let t = particle.age_fraction();
        particle
            .node
            .transform
            .set_uniform_scale(lerp(self.start, self.end, t));
    }
}

/// Interpolates the node tint over the particle's life.
#[derive(Debug, Clone, Copy)]
pub struct TintOverLife {
    pub start: Color,
    pub end: Color,
}

impl EmitterPlugin for TintOverLife {
    fn initialize(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>) {
        particle.node.set_tint(self.start);
    }

    fn update(&mut self, _ctx: &mut EmitterContext<'_>, particle: &mut ParticleMut<'_>, _dt: f32) {
        let t = particle.age_fraction();
        particle.node.set_tint(self.start.lerp(self.end, t));
    }
}
