#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Canopy: a retained-mode 2D scene graph.
//!
//! Composes hierarchical transforms, assigns draw depths, groups opaque
//! same-material nodes into batches, and drives pooled particle emitters,
//! all without per-frame allocation in the steady state.
//!
//! ```rust,ignore
//! use canopy::{Material, RecordingRenderer, Scene, Shader, ShapeKind};
//!
//! let material = Material::new("flat", Shader::new("flat"));
//! let mut scene = Scene::new();
//! scene
//!     .build_node("Box")
//!     .shape(ShapeKind::Rect { width: 32.0, height: 32.0 }, material)
//!     .with_position(10.0, 10.0)
//!     .build()?;
//!
//! let mut renderer = RecordingRenderer::new();
//! scene.update(1.0 / 60.0, &mut renderer);
//! ```

pub mod errors;
pub mod particles;
pub mod pool;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod utils;

pub use errors::{CanopyError, Result};
pub use particles::{EmitterPlugin, ParticleEmitter};
pub use pool::{IndexedSet, Pool};
pub use renderer::{RecordingRenderer, Renderer};
pub use resources::{Bounds, Color, Geometry, Material, MaterialId, Shader};
pub use scene::{
    BatchGroup, EmitterKey, Node, NodeKey, NodeKind, RenderPlan, Scene, SceneGraph, ShapeKind,
    SpriteSheet, Transform,
};
pub use settings::{EmitterConfig, SceneSettings};
pub use utils::{IdGenerator, NodeId};
