//! Renderer Interface
//!
//! The scene never talks to a graphics API directly. Each frame
//! [`Scene::update`](crate::scene::Scene::update) drives an implementation of
//! [`Renderer`] in a fixed order:
//!
//! 1. [`pre_update`](Renderer::pre_update)
//! 2. `set_depth_test(true)`, then [`draw_batch`](Renderer::draw_batch) per batch
//! 3. `set_depth_test(false)`, then [`draw_node`](Renderer::draw_node) per single
//! 4. [`draw_bounding_box`](Renderer::draw_bounding_box) per single, when enabled
//!
//! Batched nodes carry their assigned depth in
//! [`Node::depth`](crate::scene::Node::depth) so depth testing resolves their
//! order; singles are submitted already sorted.

pub mod recording;

pub use recording::{DrawCommand, RecordingRenderer};

use crate::scene::batch::BatchGroup;
use crate::scene::graph::SceneGraph;
use crate::scene::node::Node;

/// Draw backend driven by [`Scene::update`](crate::scene::Scene::update).
pub trait Renderer {
    /// Called once per frame before any draw call.
    fn pre_update(&mut self) {}

    fn set_depth_test(&mut self, _enabled: bool) {}

    /// Draws every member of `batch`; members are looked up in `graph`.
    fn draw_batch(&mut self, batch: &BatchGroup, graph: &SceneGraph);

    fn draw_node(&mut self, node: &Node);

    /// Debug overlay for a singly drawn node.
    fn draw_bounding_box(&mut self, _node: &Node) {}
}
