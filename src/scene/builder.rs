use glam::Vec2;

use crate::errors::Result;
use crate::resources::{Color, Material};
use crate::scene::NodeKey;
use crate::scene::node::{Node, ShapeKind, SpriteSheet};
use crate::scene::scene::Scene;

/// Fluent node construction, see [`Scene::build_node`].
///
/// ```rust,ignore
/// let ball = scene
///     .build_node("Ball")
///     .shape(ShapeKind::Circle { radius: 8.0, segments: 24 }, material)
///     .with_position(120.0, 40.0)
///     .build()?;
/// ```
pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    node: Node,
    parent: Option<NodeKey>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            node: Node::new(name),
            parent: None,
        }
    }

    // === Spatial ===

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.node.transform.position = Vec2::new(x, y);
        self
    }

    #[must_use]
    pub fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.node.transform.anchor = Vec2::new(x, y);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.node.transform.rotation = radians;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, s: f32) -> Self {
        self.node.transform.scale = Vec2::splat(s);
        self
    }

    // === Appearance ===

    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.node.set_alpha(alpha);
        self
    }

    #[must_use]
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.node.set_tint(tint);
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.node.visible = visible;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.node.material = Some(material);
        self
    }

    // === Variant ===

    #[must_use]
    pub fn shape(self, shape: ShapeKind, material: Material) -> Self {
        self.with_template(Node::shape(shape, material))
    }

    #[must_use]
    pub fn static_image(self, width: f32, height: f32, material: Material) -> Self {
        self.with_template(Node::static_image(width, height, material))
    }

    #[must_use]
    pub fn sprite_sheet(self, sheet: SpriteSheet, frame_size: Vec2, material: Material) -> Self {
        self.with_template(Node::sprite_sheet(sheet, frame_size, material))
    }

    fn with_template(mut self, template: Node) -> Self {
        self.node.kind = template.kind;
        self.node.geometry = template.geometry;
        self.node.material = template.material;
        self
    }

    // === Hierarchy ===

    #[must_use]
    pub fn with_parent(mut self, parent: NodeKey) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Inserts the node, attaching it to the chosen parent or the root.
    pub fn build(self) -> Result<NodeKey> {
        match self.parent {
            Some(parent) => self.scene.add_to_parent(self.node, parent),
            None => self.scene.add_node(self.node),
        }
    }
}
