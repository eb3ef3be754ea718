//! Pooled Particle System
//!
//! - [`ParticleEmitter`]: spawns, simulates and reclaims particles from a
//!   fixed [`Pool`](crate::pool::Pool)
//! - [`EmitterPlugin`]: optional per-emitter behaviour hooks
//! - [`plugins`]: ready-made behaviours

pub mod emitter;
pub mod particle;
pub mod plugin;
pub mod plugins;

pub use emitter::{EmitterParams, ParticleEmitter, spawn_attempts};
pub use particle::{Particle, ParticleMut};
pub use plugin::{EmitterContext, EmitterPlugin, PluginChain, PluginId};
