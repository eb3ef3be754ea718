use crate::particles::plugin::{EmitterContext, EmitterPlugin};

/// Fades the emission rate linearly to zero over `duration` seconds.
///
/// The starting rate is sampled on the first update, so the fade composes
/// with whatever rate the emitter was configured with.
#[derive(Debug, Clone)]
pub struct EmissionFade {
    duration: f32,
    elapsed: f32,
    start_rate: Option<f32>,
}

impl EmissionFade {
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            start_rate: None,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

impl EmitterPlugin for EmissionFade {
    fn update_global(&mut self, ctx: &mut EmitterContext<'_>, dt: f32) {
        let start = *self.start_rate.get_or_insert(ctx.params.emission_rate);
        self.elapsed += dt;
        let remaining = if self.duration > 0.0 {
            (1.0 - self.elapsed / self.duration).max(0.0)
        } else {
            0.0
        };
        ctx.params.emission_rate = start * remaining;
    }
}
