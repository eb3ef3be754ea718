//! Scene Graph
//!
//! Hierarchy, composition and per-frame render planning:
//! - [`Node`]: a drawable or container entity with a local [`Transform`]
//! - [`SceneGraph`]: arena owning every node, enforces the tree invariants
//! - [`RenderPlan`]: depth assignment plus batch classification for a frame
//! - [`Scene`]: root node, emitters and pre-update listeners; drives a frame

pub mod batch;
pub mod builder;
pub mod graph;
pub mod node;
pub mod plan;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

pub use batch::{BATCH_ALPHA_EPSILON, BatchGroup, can_batch};
pub use builder::NodeBuilder;
pub use graph::SceneGraph;
pub use node::{FrameState, Node, NodeKind, ShapeKind, SpriteSheet};
pub use plan::{PlanStats, RenderPlan};
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
    pub struct EmitterKey;
}
