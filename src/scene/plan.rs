//! Per-frame render plan: depth assignment and batch classification.
//!
//! One recursive walk over the visible tree does three things for every
//! child it reaches:
//!
//! 1. **Depth**: a parent's depth interval `[min, max]` is split into `n`
//!    equal slices, one per child (`diff = (max - min) / n`). Child `i` sits
//!    at `min + diff * i` and its own children share the narrowed interval
//!    `[depth + diff / 10, depth + 9 * diff / 10]`, so a subtree never
//!    reaches into the next sibling's slice. The result is a total order
//!    consistent with pre-order without sorting.
//! 2. **Composition**: world matrix, tint and alpha are composed from the
//!    parent's frame state.
//! 3. **Classification**: opaque nodes (see [`can_batch`]) join the
//!    [`BatchGroup`] of their material when auto-batching is on; everything
//!    else drawable goes to the ordered singles list.
//!
//! Invisible children are skipped together with their subtrees. Batching a
//! node does not stop the walk; its children are classified independently.
//!
//! Buffers are reused between frames; only the first appearance of a
//! material allocates.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::resources::MaterialId;
use crate::scene::NodeKey;
use crate::scene::batch::{BatchGroup, can_batch};
use crate::scene::graph::SceneGraph;
use crate::scene::node::{FrameState, Node};
use crate::settings::SceneSettings;

/// Counts reported after each rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub batches: usize,
    pub batched_nodes: usize,
    pub singles: usize,
}

/// Ordered singles plus material-keyed batches for one frame.
#[derive(Debug, Default)]
pub struct RenderPlan {
    singles: Vec<NodeKey>,
    batches: Vec<BatchGroup>,
    batch_lookup: FxHashMap<MaterialId, usize>,
}

impl RenderPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes drawn one by one, in draw order.
    #[inline]
    #[must_use]
    pub fn singles(&self) -> &[NodeKey] {
        &self.singles
    }

    /// Batches in order of first use during the walk.
    #[inline]
    #[must_use]
    pub fn batches(&self) -> &[BatchGroup] {
        &self.batches
    }

    #[must_use]
    pub fn batch_for(&self, material: MaterialId) -> Option<&BatchGroup> {
        self.batch_lookup.get(&material).map(|&i| &self.batches[i])
    }

    #[must_use]
    pub fn stats(&self) -> PlanStats {
        PlanStats {
            batches: self.batches.len(),
            batched_nodes: self.batches.iter().map(BatchGroup::len).sum(),
            singles: self.singles.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.singles.is_empty() && self.batches.is_empty()
    }

    /// Recomputes the plan for the tree under `root`.
    ///
    /// The root itself is never drawn; it receives `depth_range[0]` and its
    /// own local matrix, tint and alpha. An invisible root yields an empty
    /// plan.
    pub fn rebuild(&mut self, graph: &mut SceneGraph, root: NodeKey, settings: &SceneSettings) {
        self.singles.clear();
        for batch in &mut self.batches {
            batch.clear();
        }

        let [depth_min, depth_max] = settings.depth_range;
        let nodes = graph.nodes_mut();
        let root_visible = match nodes.get_mut(root) {
            Some(node) => {
                node.frame = FrameState {
                    depth: depth_min,
                    world_matrix: node.transform.local_matrix(),
                    world_color: node.tint,
                    world_alpha: node.alpha,
                };
                node.visible
            }
            None => false,
        };

        if root_visible {
            self.classify(nodes, root, depth_min, depth_max, settings.auto_batch);
        }
        self.drop_empty_batches();
    }

    fn classify(
        &mut self,
        nodes: &mut SlotMap<NodeKey, Node>,
        key: NodeKey,
        depth_min: f64,
        depth_max: f64,
        auto_batch: bool,
    ) {
        let (count, parent_frame) = {
            let node = &nodes[key];
            (node.children.len(), node.frame)
        };
        if count == 0 {
            return;
        }

        let diff = (depth_max - depth_min) / count as f64;
        for i in 0..count {
            let child_key = nodes[key].children[i];
            let depth = depth_min + diff * i as f64;

            let Some(child) = nodes.get_mut(child_key) else {
                continue;
            };
            if !child.visible {
                continue;
            }
            child.frame.depth = depth;

            let batch_key = if auto_batch && can_batch(child) {
                child.material_id()
            } else {
                None
            };
            match batch_key {
                Some(material) => self.insert_batched(material, child_key, child),
                None if child.material.is_some() => self.singles.push(child_key),
                None => {}
            }

            child.frame.world_matrix = parent_frame.world_matrix * child.transform.local_matrix();
            child.frame.world_color = parent_frame.world_color * child.tint;
            child.frame.world_alpha = parent_frame.world_alpha * child.alpha;

            self.classify(
                nodes,
                child_key,
                depth + diff / 10.0,
                depth + 9.0 * diff / 10.0,
                auto_batch,
            );
        }
    }

    fn insert_batched(&mut self, material: MaterialId, key: NodeKey, node: &mut Node) {
        let index = match self.batch_lookup.get(&material) {
            Some(&index) => index,
            None => {
                let Some(handle) = node.material.clone() else {
                    return;
                };
                self.batches.push(BatchGroup::new(handle));
                let index = self.batches.len() - 1;
                self.batch_lookup.insert(material, index);
                index
            }
        };

        if let Err(err) = self.batches[index].add(key, node) {
            log::error!("Batch lookup returned the wrong group: {err}");
            self.singles.push(key);
        }
    }

    fn drop_empty_batches(&mut self) {
        if self.batches.iter().all(|b| !b.is_empty()) {
            return;
        }
        self.batches.retain(|b| !b.is_empty());
        self.batch_lookup.clear();
        for (index, batch) in self.batches.iter().enumerate() {
            self.batch_lookup.insert(batch.material_id(), index);
        }
    }
}
