//! Emitter plugins.
//!
//! A plugin customises particle behaviour through four optional hooks that
//! the emitter calls at fixed points of its update (see
//! [`ParticleEmitter::update`](crate::particles::ParticleEmitter::update)):
//!
//! | Hook | When |
//! |---|---|
//! | [`update_global`](EmitterPlugin::update_global) | once, before spawning |
//! | [`initialize`](EmitterPlugin::initialize) | per particle, on spawn |
//! | [`update`](EmitterPlugin::update) | per surviving particle, after integration |
//! | [`update_end_global`](EmitterPlugin::update_end_global) | once, at the end |
//!
//! # Editing the chain from a hook
//!
//! Hooks receive an [`EmitterContext`] through which they can add or remove
//! plugins. Such edits are queued and applied before the next pass over the
//! chain starts, so a pass always sees the chain as it was when the pass
//! began.

use std::fmt;

use crate::particles::emitter::EmitterParams;
use crate::particles::particle::ParticleMut;
use crate::scene::NodeKey;

/// Behaviour attached to a [`ParticleEmitter`](crate::particles::ParticleEmitter).
///
/// Every hook defaults to a no-op.
pub trait EmitterPlugin {
    /// A particle was just taken from the pool and attached.
    fn initialize(&mut self, _ctx: &mut EmitterContext<'_>, _particle: &mut ParticleMut<'_>) {}

    /// A live particle was integrated this step.
    fn update(&mut self, _ctx: &mut EmitterContext<'_>, _particle: &mut ParticleMut<'_>, _dt: f32) {
    }

    fn update_global(&mut self, _ctx: &mut EmitterContext<'_>, _dt: f32) {}

    fn update_end_global(&mut self, _ctx: &mut EmitterContext<'_>, _dt: f32) {}
}

/// Identifies a plugin within one emitter's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginId(u64);

pub(crate) enum PluginEdit {
    Add(PluginId, Box<dyn EmitterPlugin>),
    Remove(PluginId),
}

/// Edits requested while a pass is running.
#[derive(Default)]
pub(crate) struct EditQueue {
    next_id: u64,
    pending: Vec<PluginEdit>,
}

impl EditQueue {
    fn allocate(&mut self) -> PluginId {
        self.next_id += 1;
        PluginId(self.next_id)
    }

    fn push_add(&mut self, plugin: Box<dyn EmitterPlugin>) -> PluginId {
        let id = self.allocate();
        self.pending.push(PluginEdit::Add(id, plugin));
        id
    }
}

/// Handed to every hook: the emitter's live parameters plus chain editing.
pub struct EmitterContext<'a> {
    /// Spawn parameters, read at the next spawn phase.
    pub params: &'a mut EmitterParams,
    emitter: NodeKey,
    edits: &'a mut EditQueue,
}

impl EmitterContext<'_> {
    /// The emitter's own node.
    #[inline]
    #[must_use]
    pub fn emitter_node(&self) -> NodeKey {
        self.emitter
    }

    /// Queues `plugin` for appending; it runs from the next pass on.
    pub fn add_plugin(&mut self, plugin: impl EmitterPlugin + 'static) -> PluginId {
        self.edits.push_add(Box::new(plugin))
    }

    /// Queues removal of `id`; the plugin still finishes the current pass.
    pub fn remove_plugin(&mut self, id: PluginId) {
        self.edits.pending.push(PluginEdit::Remove(id));
    }
}

/// Ordered plugin list of one emitter.
#[derive(Default)]
pub struct PluginChain {
    entries: Vec<(PluginId, Box<dyn EmitterPlugin>)>,
    edits: EditQueue,
}

impl fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginChain")
            .field("plugins", &self.ids().collect::<Vec<_>>())
            .field("pending", &self.edits.pending.len())
            .finish()
    }
}

impl PluginChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PluginId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    #[must_use]
    pub fn contains(&self, id: PluginId) -> bool {
        self.entries.iter().any(|(existing, _)| *existing == id)
    }

    /// Appends immediately (no pass is running).
    pub fn push(&mut self, plugin: Box<dyn EmitterPlugin>) -> PluginId {
        let id = self.edits.push_add(plugin);
        self.apply_pending();
        id
    }

    /// Removes immediately. Returns `false` for unknown ids.
    pub fn remove(&mut self, id: PluginId) -> bool {
        self.apply_pending();
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    /// Runs `hook` on every plugin in chain order as one pass.
    pub(crate) fn run(
        &mut self,
        params: &mut EmitterParams,
        emitter: NodeKey,
        mut hook: impl FnMut(&mut dyn EmitterPlugin, &mut EmitterContext<'_>),
    ) {
        self.apply_pending();
        if self.entries.is_empty() {
            return;
        }
        let mut ctx = EmitterContext {
            params,
            emitter,
            edits: &mut self.edits,
        };
        for (_, plugin) in &mut self.entries {
            hook(plugin.as_mut(), &mut ctx);
        }
    }

    fn apply_pending(&mut self) {
        for edit in self.edits.pending.drain(..) {
            match edit {
                PluginEdit::Add(id, plugin) => self.entries.push((id, plugin)),
                PluginEdit::Remove(id) => self.entries.retain(|(existing, _)| *existing != id),
            }
        }
    }
}
