use crate::resources::{Bounds, MaterialId};
use crate::scene::NodeKey;
use crate::scene::batch::BatchGroup;
use crate::scene::graph::SceneGraph;
use crate::scene::node::Node;
use crate::utils::id::NodeId;

use super::Renderer;

/// One call received by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    PreUpdate,
    DepthTest(bool),
    Batch {
        material: MaterialId,
        members: Vec<NodeKey>,
    },
    Node {
        id: NodeId,
        depth: f64,
        alpha: f32,
    },
    BoundingBox {
        id: NodeId,
        bounds: Option<Bounds>,
    },
}

/// Headless renderer that records the calls it receives.
///
/// Commands accumulate across frames until [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Ids of singly drawn nodes, in submission order.
    pub fn drawn_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Node { id, .. } => Some(*id),
            _ => None,
        })
    }

    pub fn batches(&self) -> impl Iterator<Item = (MaterialId, &[NodeKey])> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Batch { material, members } => Some((*material, members.as_slice())),
            _ => None,
        })
    }

    #[must_use]
    pub fn count_bounding_boxes(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::BoundingBox { .. }))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn pre_update(&mut self) {
        self.commands.push(DrawCommand::PreUpdate);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.commands.push(DrawCommand::DepthTest(enabled));
    }

    fn draw_batch(&mut self, batch: &BatchGroup, _graph: &SceneGraph) {
        self.commands.push(DrawCommand::Batch {
            material: batch.material_id(),
            members: batch.members().to_vec(),
        });
    }

    fn draw_node(&mut self, node: &Node) {
        self.commands.push(DrawCommand::Node {
            id: node.id(),
            depth: node.depth(),
            alpha: node.world_alpha(),
        });
    }

    fn draw_bounding_box(&mut self, node: &Node) {
        self.commands.push(DrawCommand::BoundingBox {
            id: node.id(),
            bounds: node.world_bounds(),
        });
    }
}
