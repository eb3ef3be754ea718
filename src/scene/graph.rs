//! Node arena and hierarchy operations.
//!
//! [`SceneGraph`] owns every node and is the only place where parent/child
//! links are written, which keeps them mutual: `child.parent == Some(p)` iff
//! `p.children` contains `child`, exactly once.
//!
//! Attaching rejects self-parenting and cycles up front, so the recursive
//! traversals elsewhere in the crate never need to guard against them.

use glam::Mat4;
use slotmap::SlotMap;

use crate::errors::{CanopyError, Result};
use crate::resources::Color;
use crate::scene::NodeKey;
use crate::scene::node::{Node, NodeKind};
use crate::utils::id::IdGenerator;

/// Arena of nodes plus the id sequence that names them.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    ids: IdGenerator,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(IdGenerator::new())
    }

    /// Creates a graph drawing node ids from `ids`.
    #[must_use]
    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            ids,
        }
    }

    // ========================================================================
    // Arena
    // ========================================================================

    /// Inserts a detached node and assigns its id.
    ///
    /// Any hierarchy links the value carried (e.g. a clone of another node)
    /// are dropped; use [`add_child`](Self::add_child) to place it.
    pub fn insert(&mut self, mut node: Node) -> NodeKey {
        node.id = self.ids.next_id();
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// Removes `key` and its whole subtree from the arena.
    /// Returns how many nodes were removed.
    pub fn destroy(&mut self, key: NodeKey) -> usize {
        if !self.nodes.contains_key(key) {
            return 0;
        }
        self.detach(key);

        let mut removed = 0;
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Appends `child` to `parent`'s children.
    ///
    /// A child that already has a parent is moved (detached first), including
    /// when that parent is `parent` itself, in which case it moves to the end.
    ///
    /// # Errors
    ///
    /// Fails without mutating anything if either key is dead, if
    /// `child == parent`, or if `child` is an ancestor of `parent`.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        let parent_id = self
            .nodes
            .get(parent)
            .ok_or(CanopyError::NodeNotFound(parent))?
            .id;
        let child_id = self
            .nodes
            .get(child)
            .ok_or(CanopyError::NodeNotFound(child))?
            .id;

        if parent == child {
            log::warn!("Rejected attaching node {child_id} to itself");
            return Err(CanopyError::SelfParenting(child_id));
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Rejected attaching node {child_id} under its descendant {parent_id}");
            return Err(CanopyError::CycleDetected {
                parent: parent_id,
                child: child_id,
            });
        }

        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Removes `child` from `parent`. No-op (returns `false`) if `child` is
    /// not one of `parent`'s children.
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> bool {
        let Some(p) = self.nodes.get_mut(parent) else {
            return false;
        };
        let Some(pos) = p.children.iter().position(|&c| c == child) else {
            return false;
        };
        p.children.remove(pos);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
        true
    }

    /// Detaches `child` from whatever parent it has.
    pub fn detach(&mut self, child: NodeKey) -> bool {
        match self.nodes.get(child).and_then(|c| c.parent) {
            Some(parent) => self.remove_child(parent, child),
            None => false,
        }
    }

    /// Iterates the ancestors of `key`, nearest first.
    pub fn ancestors(&self, key: NodeKey) -> Ancestors<'_> {
        Ancestors {
            nodes: &self.nodes,
            next: self.nodes.get(key).and_then(|n| n.parent),
        }
    }

    /// True if `ancestor` lies on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        self.ancestors(node).any(|k| k == ancestor)
    }

    // ========================================================================
    // Composition queries
    // ========================================================================

    /// World matrix of `key`, composed root-to-node from the current local
    /// matrices. Recomputed from scratch on every call.
    #[must_use]
    pub fn world_matrix(&self, key: NodeKey) -> Option<Mat4> {
        let node = self.nodes.get(key)?;
        let local = node.transform.local_matrix();
        match node.parent {
            Some(parent) => Some(self.world_matrix(parent)? * local),
            None => Some(local),
        }
    }

    /// Effective tint and alpha of `key`: the product of its own values and
    /// every ancestor's.
    #[must_use]
    pub fn composed_color(&self, key: NodeKey) -> Option<(Color, f32)> {
        let node = self.nodes.get(key)?;
        match node.parent {
            Some(parent) => {
                let (color, alpha) = self.composed_color(parent)?;
                Some((color * node.tint, alpha * node.alpha))
            }
            None => Some((node.tint, node.alpha)),
        }
    }

    // ========================================================================
    // Sprite sheets
    // ========================================================================

    /// Shows `frame` on a sprite-sheet node, rewriting its UVs.
    /// Returns `Ok(false)` for nodes that are not sprite sheets.
    pub fn set_sprite_frame(&mut self, key: NodeKey, frame: u32) -> Result<bool> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or(CanopyError::NodeNotFound(key))?;
        let NodeKind::SpriteSheet(sheet) = &mut node.kind else {
            return Ok(false);
        };
        sheet.set_frame(frame);
        let (min, max) = sheet.uv_rect(sheet.current_frame());
        node.geometry.set_uv_rect(min, max);
        Ok(true)
    }

    /// Steps every sprite-sheet node by `dt`; returns how many changed frame.
    pub fn advance_sprites(&mut self, dt: f32) -> usize {
        let mut changed = 0;
        for node in self.nodes.values_mut() {
            let NodeKind::SpriteSheet(sheet) = &mut node.kind else {
                continue;
            };
            if sheet.advance(dt) {
                let (min, max) = sheet.uv_rect(sheet.current_frame());
                node.geometry.set_uv_rect(min, max);
                changed += 1;
            }
        }
        changed
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut SlotMap<NodeKey, Node> {
        &mut self.nodes
    }
}

/// Iterator over a node's ancestors, see [`SceneGraph::ancestors`].
pub struct Ancestors<'a> {
    nodes: &'a SlotMap<NodeKey, Node>,
    next: Option<NodeKey>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let current = self.next?;
        self.next = self.nodes.get(current).and_then(|n| n.parent);
        Some(current)
    }
}
