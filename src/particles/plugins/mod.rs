//! Built-in emitter plugins.

pub mod appearance;
pub mod emission;
pub mod motion;

pub use appearance::{AlphaOverLife, ScaleOverLife, TintOverLife};
pub use emission::EmissionFade;
pub use motion::{ConstantAcceleration, RandomVelocity, SpawnArea, Spin};
