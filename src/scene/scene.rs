use std::fmt;

use slotmap::SlotMap;

use crate::errors::{CanopyError, Result};
use crate::particles::ParticleEmitter;
use crate::renderer::Renderer;
use crate::resources::Material;
use crate::scene::builder::NodeBuilder;
use crate::scene::graph::SceneGraph;
use crate::scene::node::{Node, NodeKind};
use crate::scene::plan::RenderPlan;
use crate::scene::{EmitterKey, NodeKey};
use crate::settings::{EmitterConfig, SceneSettings};
use crate::utils::id::IdGenerator;

/// Closure run at the start of every [`Scene::update`], before traversal.
pub type PreUpdateListener = Box<dyn FnMut(&mut SceneGraph, f32)>;

/// Scene container and per-frame driver.
///
/// Owns the node arena with its root node, the registered particle emitters
/// and pre-update listeners, and the render plan reused from frame to frame.
///
/// # Frame
///
/// [`update`](Self::update) runs emitters and listeners, advances sprite
/// sheets, rebuilds the [`RenderPlan`] and submits it to a [`Renderer`].
pub struct Scene {
    graph: SceneGraph,
    root: NodeKey,
    pub settings: SceneSettings,

    emitters: SlotMap<EmitterKey, ParticleEmitter>,
    /// Registration order; slot order changes once keys are reused.
    emitter_order: Vec<EmitterKey>,
    listeners: Vec<PreUpdateListener>,

    plan: RenderPlan,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("nodes", &self.graph.len())
            .field("root", &self.root)
            .field("settings", &self.settings)
            .field("emitters", &self.emitters.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(SceneGraph::new(), SceneSettings::default())
    }

    pub fn with_settings(settings: SceneSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::from_parts(SceneGraph::new(), settings))
    }

    /// Uses `ids` for every node created in this scene, the root included.
    pub fn with_id_generator(ids: IdGenerator, settings: SceneSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::from_parts(SceneGraph::with_id_generator(ids), settings))
    }

    fn from_parts(mut graph: SceneGraph, settings: SceneSettings) -> Self {
        let root = graph.insert(Node::group("Root"));
        Self {
            graph,
            root,
            settings,
            emitters: SlotMap::with_key(),
            emitter_order: Vec::new(),
            listeners: Vec::new(),
            plan: RenderPlan::new(),
        }
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&Node> {
        self.graph.get(key)
    }

    #[inline]
    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.graph.get_mut(key)
    }

    /// Starts a fluent node definition; the node lands under the root unless
    /// a parent is given.
    pub fn build_node(&mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    /// Inserts `node` as the last child of the root.
    pub fn add_node(&mut self, node: Node) -> Result<NodeKey> {
        self.add_to_parent(node, self.root)
    }

    pub fn add_to_parent(&mut self, node: Node, parent: NodeKey) -> Result<NodeKey> {
        if !self.graph.contains(parent) {
            return Err(CanopyError::NodeNotFound(parent));
        }
        let key = self.graph.insert(node);
        if let Err(err) = self.graph.add_child(parent, key) {
            self.graph.destroy(key);
            return Err(err);
        }
        Ok(key)
    }

    /// Moves `child` under `parent`, see [`SceneGraph::add_child`].
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey) -> Result<()> {
        self.graph.add_child(parent, child)
    }

    /// Destroys `key` and its subtree. The root cannot be removed, and
    /// neither can a pooled particle node (its emitter owns it).
    ///
    /// Emitters whose node was part of the subtree are dropped with their
    /// pooled particles. Returns how many nodes were removed.
    pub fn remove_node(&mut self, key: NodeKey) -> usize {
        if key == self.root {
            log::warn!("Refusing to remove the scene root");
            return 0;
        }
        if matches!(self.graph.get(key).map(Node::kind), Some(NodeKind::Particle)) {
            log::warn!("Refusing to remove pooled particle node {key:?}; remove its emitter instead");
            return 0;
        }
        let mut removed = self.graph.destroy(key);

        let orphaned: Vec<EmitterKey> = self
            .emitters
            .iter()
            .filter(|(_, emitter)| !self.graph.contains(emitter.node()))
            .map(|(emitter_key, _)| emitter_key)
            .collect();
        for emitter_key in orphaned {
            if let Some(emitter) = self.emitters.remove(emitter_key) {
                let before = self.graph.len();
                emitter.destroy(&mut self.graph);
                removed += before - self.graph.len();
            }
        }
        let emitters = &self.emitters;
        self.emitter_order.retain(|&k| emitters.contains_key(k));
        removed
    }

    // ========================================================================
    // Emitters & listeners
    // ========================================================================

    /// Creates an emitter and attaches its node under `parent` (the root when
    /// `None`). Emitters update at the start of every frame, in the order they
    /// were added.
    pub fn add_emitter(
        &mut self,
        config: &EmitterConfig,
        material: Material,
        parent: Option<NodeKey>,
    ) -> Result<EmitterKey> {
        let parent = parent.unwrap_or(self.root);
        if !self.graph.contains(parent) {
            return Err(CanopyError::NodeNotFound(parent));
        }
        let emitter = ParticleEmitter::new(&mut self.graph, config, material)?;
        if let Err(err) = self.graph.add_child(parent, emitter.node()) {
            emitter.destroy(&mut self.graph);
            return Err(err);
        }
        let key = self.emitters.insert(emitter);
        self.emitter_order.push(key);
        Ok(key)
    }

    #[must_use]
    pub fn emitter(&self, key: EmitterKey) -> Option<&ParticleEmitter> {
        self.emitters.get(key)
    }

    pub fn emitter_mut(&mut self, key: EmitterKey) -> Option<&mut ParticleEmitter> {
        self.emitters.get_mut(key)
    }

    /// Unregisters the emitter and removes its nodes from the scene.
    pub fn remove_emitter(&mut self, key: EmitterKey) -> bool {
        match self.emitters.remove(key) {
            Some(emitter) => {
                emitter.destroy(&mut self.graph);
                self.emitter_order.retain(|&k| k != key);
                true
            }
            None => false,
        }
    }

    /// Registers a closure run every frame after the emitters, before
    /// traversal.
    pub fn add_pre_update_listener(&mut self, listener: impl FnMut(&mut SceneGraph, f32) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Plan produced by the last [`update`](Self::update).
    #[inline]
    #[must_use]
    pub fn render_plan(&self) -> &RenderPlan {
        &self.plan
    }

    /// Advances the scene by `dt` seconds and draws it through `renderer`.
    pub fn update<R: Renderer + ?Sized>(&mut self, dt: f32, renderer: &mut R) {
        for &key in &self.emitter_order {
            if let Some(emitter) = self.emitters.get_mut(key) {
                emitter.update(dt, &mut self.graph);
            }
        }
        for listener in &mut self.listeners {
            listener(&mut self.graph, dt);
        }
        self.graph.advance_sprites(dt);

        renderer.pre_update();

        self.plan.rebuild(&mut self.graph, self.root, &self.settings);
        let stats = self.plan.stats();
        log::trace!(
            "Frame plan: {} batches ({} nodes), {} singles",
            stats.batches,
            stats.batched_nodes,
            stats.singles
        );

        renderer.set_depth_test(true);
        for batch in self.plan.batches() {
            renderer.draw_batch(batch, &self.graph);
        }

        renderer.set_depth_test(false);
        for &key in self.plan.singles() {
            if let Some(node) = self.graph.get(key) {
                renderer.draw_node(node);
            }
        }

        if self.settings.draw_bounding_boxes {
            for &key in self.plan.singles() {
                if let Some(node) = self.graph.get(key) {
                    renderer.draw_bounding_box(node);
                }
            }
        }
    }
}
