use crate::errors::{CanopyError, Result};
use crate::resources::{Material, MaterialId};
use crate::scene::NodeKey;
use crate::scene::node::Node;

/// Maximum distance from full opacity a node may have and still be batched.
pub const BATCH_ALPHA_EPSILON: f32 = 1e-4;

/// Single-node batchability predicate.
///
/// A batch uploads one color/alpha uniform for all of its members, so only
/// effectively opaque nodes qualify; anything else is drawn on its own where
/// its alpha can be uploaded individually.
#[inline]
#[must_use]
pub fn can_batch(node: &Node) -> bool {
    (1.0 - node.alpha).abs() <= BATCH_ALPHA_EPSILON
}

/// Nodes sharing one material, offered to the renderer as one draw unit.
///
/// Membership is rebuilt by every traversal; members keep traversal order.
#[derive(Debug, Clone)]
pub struct BatchGroup {
    material: Material,
    members: Vec<NodeKey>,
}

impl BatchGroup {
    #[must_use]
    pub fn new(material: Material) -> Self {
        Self {
            material,
            members: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    #[inline]
    #[must_use]
    pub fn material_id(&self) -> MaterialId {
        self.material.id()
    }

    #[inline]
    #[must_use]
    pub fn members(&self) -> &[NodeKey] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.members.contains(&key)
    }

    /// Accepts `node` (stored under `key`) into the group.
    ///
    /// On acceptance the node's alpha is snapped to exactly `1.0`; callers
    /// are expected to have checked [`can_batch`], so this only removes the
    /// sub-epsilon residue.
    ///
    /// # Errors
    ///
    /// [`CanopyError::MaterialMismatch`] if the node does not hold this
    /// group's material. The node is left untouched.
    pub fn add(&mut self, key: NodeKey, node: &mut Node) -> Result<()> {
        let same = node
            .material
            .as_ref()
            .is_some_and(|m| m.id() == self.material.id());
        if !same {
            return Err(CanopyError::MaterialMismatch {
                expected: self.material.id(),
                found: node.material_id(),
            });
        }
        node.alpha = 1.0;
        self.members.push(key);
        Ok(())
    }

    /// Removes `key`; returns `false` if it was not a member.
    pub fn remove(&mut self, key: NodeKey) -> bool {
        match self.members.iter().position(|&k| k == key) {
            Some(pos) => {
                self.members.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }
}
