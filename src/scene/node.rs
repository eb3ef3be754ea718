use glam::{Mat4, Vec2};

use crate::resources::{Bounds, Color, Geometry, Material, MaterialId};
use crate::scene::NodeKey;
use crate::scene::transform::Transform;
use crate::utils::id::NodeId;

/// Primitive outline preconfigured by [`Node::shape`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Rect { width: f32, height: f32 },
    Circle { radius: f32, segments: u16 },
}

/// Grid-based frame animation over a texture atlas.
///
/// Frames are numbered row-major starting at the top-left cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub columns: u32,
    pub rows: u32,
    pub frame_count: u32,
    /// Seconds each frame stays on screen. Non-positive values freeze the sheet.
    pub frame_duration: f32,
    pub looping: bool,
    current_frame: u32,
    elapsed: f32,
}

impl SpriteSheet {
    #[must_use]
    pub fn new(columns: u32, rows: u32, frame_duration: f32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            frame_count: columns * rows,
            frame_duration,
            looping: true,
            current_frame: 0,
            elapsed: 0.0,
        }
    }

    /// Limits playback to the first `count` cells (for partially filled atlases).
    #[must_use]
    pub fn with_frame_count(mut self, count: u32) -> Self {
        self.frame_count = count.clamp(1, self.columns * self.rows);
        self
    }

    #[must_use]
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    #[inline]
    #[must_use]
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Advances the frame timer. Returns `true` if the visible frame changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.frame_duration <= 0.0 || self.frame_count <= 1 {
            return false;
        }
        let start = self.current_frame;
        self.elapsed += dt;
        while self.elapsed >= self.frame_duration {
            self.elapsed -= self.frame_duration;
            let next = self.current_frame + 1;
            if next < self.frame_count {
                self.current_frame = next;
            } else if self.looping {
                self.current_frame = 0;
            } else {
                self.elapsed = 0.0;
                break;
            }
        }
        self.current_frame != start
    }

    /// Jumps to `frame` (wrapped into range). Returns `true` if it changed.
    pub fn set_frame(&mut self, frame: u32) -> bool {
        let frame = frame % self.frame_count;
        let changed = frame != self.current_frame;
        self.current_frame = frame;
        self.elapsed = 0.0;
        changed
    }

    /// Atlas UV rectangle of `frame`.
    #[must_use]
    pub fn uv_rect(&self, frame: u32) -> (Vec2, Vec2) {
        let cell = Vec2::new(1.0 / self.columns as f32, 1.0 / self.rows as f32);
        let col = (frame % self.columns) as f32;
        let row = (frame / self.columns) as f32;
        let min = Vec2::new(col * cell.x, row * cell.y);
        (min, min + cell)
    }
}

/// Which variant of node this is, and the variant-specific state.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure container.
    Group,
    Shape(ShapeKind),
    StaticImage { width: f32, height: f32 },
    SpriteSheet(SpriteSheet),
    /// Pooled by a [`ParticleEmitter`](crate::particles::ParticleEmitter).
    Particle,
    /// Root of a particle system; its live particles are its children.
    Emitter,
}

/// Per-frame scratch written by the scene traversal.
///
/// Only nodes reached by the last traversal (visible, attached under the
/// scene root) hold meaningful values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub depth: f64,
    pub world_matrix: Mat4,
    pub world_color: Color,
    pub world_alpha: f32,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            depth: 0.0,
            world_matrix: Mat4::IDENTITY,
            world_color: Color::WHITE,
            world_alpha: 1.0,
        }
    }
}

/// A scene graph entity.
///
/// # Hierarchy
///
/// Nodes live in a [`SceneGraph`](crate::scene::SceneGraph) arena and refer
/// to each other by [`NodeKey`]:
/// - `children`: ordered, exclusively owned; a node has at most one parent
/// - `parent`: non-owning back reference (`None` for the root and for
///   detached nodes)
///
/// Both sides are kept in sync by the graph; they are not writable here.
///
/// # Appearance
///
/// `alpha` and `tint` compose multiplicatively with every ancestor. Use
/// [`set_alpha`](Self::set_alpha) / [`set_tint`](Self::set_tint) to clamp
/// into the renderable range.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub name: String,

    // === Hierarchy ===
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    // === Spatial / Appearance ===
    pub transform: Transform,
    pub visible: bool,
    pub alpha: f32,
    pub tint: Color,

    // === Render Data ===
    pub material: Option<Material>,
    pub geometry: Geometry,

    pub(crate) kind: NodeKind,
    pub(crate) frame: FrameState,
}

impl Node {
    /// Creates an empty container node.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_kind(name, NodeKind::Group, Geometry::new(), None)
    }

    pub(crate) fn with_kind(
        name: &str,
        kind: NodeKind,
        geometry: Geometry,
        material: Option<Material>,
    ) -> Self {
        Self {
            id: NodeId::UNASSIGNED,
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            alpha: 1.0,
            tint: Color::WHITE,
            material,
            geometry,
            kind,
            frame: FrameState::default(),
        }
    }

    // ========================================================================
    // Variant constructors
    // ========================================================================

    #[must_use]
    pub fn group(name: &str) -> Self {
        Self::new(name)
    }

    #[must_use]
    pub fn shape(shape: ShapeKind, material: Material) -> Self {
        let geometry = match shape {
            ShapeKind::Rect { width, height } => Geometry::quad(width, height),
            ShapeKind::Circle { radius, segments } => Geometry::circle(radius, segments),
        };
        Self::with_kind("Shape", NodeKind::Shape(shape), geometry, Some(material))
    }

    #[must_use]
    pub fn static_image(width: f32, height: f32, material: Material) -> Self {
        Self::with_kind(
            "StaticImage",
            NodeKind::StaticImage { width, height },
            Geometry::quad(width, height),
            Some(material),
        )
    }

    /// A quad of `frame_size` showing the current frame of `sheet`.
    #[must_use]
    pub fn sprite_sheet(sheet: SpriteSheet, frame_size: Vec2, material: Material) -> Self {
        let mut geometry = Geometry::quad(frame_size.x, frame_size.y);
        let (min, max) = sheet.uv_rect(sheet.current_frame());
        geometry.set_uv_rect(min, max);
        Self::with_kind(
            "SpriteSheet",
            NodeKind::SpriteSheet(sheet),
            geometry,
            Some(material),
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Unique id; [`NodeId::UNASSIGNED`] until inserted into a graph.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub fn sprite_sheet_mut(&mut self) -> Option<&mut SpriteSheet> {
        match &mut self.kind {
            NodeKind::SpriteSheet(sheet) => Some(sheet),
            _ => None,
        }
    }

    #[must_use]
    pub fn material_id(&self) -> Option<MaterialId> {
        self.material.as_ref().map(Material::id)
    }

    /// Sets alpha clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Sets the tint with every channel clamped to `[0, 1]`.
    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint.clamped();
    }

    // ========================================================================
    // Per-frame results
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    /// Draw-order depth assigned by the last traversal.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> f64 {
        self.frame.depth
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Mat4 {
        &self.frame.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_color(&self) -> Color {
        self.frame.world_color
    }

    #[inline]
    #[must_use]
    pub fn world_alpha(&self) -> f32 {
        self.frame.world_alpha
    }

    /// Geometry bounds in world space, as of the last traversal.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Bounds> {
        self.geometry
            .bounds()
            .map(|b| b.transform(&self.frame.world_matrix))
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}
