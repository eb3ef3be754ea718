//! Shared resources referenced by scene nodes.
//!
//! - [`Color`]: RGB tint with multiplicative composition
//! - [`Material`] / [`Shader`]: opaque, identity-compared handles
//! - [`Geometry`]: CPU-side vertex buffers with a dirty flag

pub mod color;
pub mod geometry;
pub mod material;

pub use color::Color;
pub use geometry::{Bounds, Geometry};
pub use material::{Material, MaterialId, Shader};
