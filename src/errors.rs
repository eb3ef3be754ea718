//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`CanopyError`] covers the failure modes of the core:
//! - Structural violations of the scene graph (self-parenting, cycles)
//! - Lookups of nodes that are no longer alive
//! - Batch membership mismatches
//! - Configuration loading and validation
//!
//! Resource exhaustion is deliberately *not* an error: an exhausted pool
//! returns `None` and the emitter simply stops spawning for that frame.
//!
//! # Usage
//!
//! ```rust,ignore
//! use canopy::errors::{CanopyError, Result};
//!
//! fn reparent(scene: &mut Scene, child: NodeKey, parent: NodeKey) -> Result<()> {
//!     scene.graph_mut().add_child(parent, child)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::resources::material::MaterialId;
use crate::scene::NodeKey;
use crate::utils::id::NodeId;

/// The main error type for the Canopy scene graph.
#[derive(Error, Debug)]
pub enum CanopyError {
    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// A node was asked to become its own child.
    #[error("Cannot attach node {0} to itself")]
    SelfParenting(NodeId),

    /// The child is an ancestor of the requested parent.
    #[error("Attaching node {child} under node {parent} would create a cycle")]
    CycleDetected {
        /// The node that was supposed to receive the child
        parent: NodeId,
        /// The node that is already an ancestor of `parent`
        child: NodeId,
    },

    /// The key does not refer to a live node of this graph.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeKey),

    // ========================================================================
    // Batching Errors
    // ========================================================================
    /// A node was offered to a batch group keyed by another material.
    #[error("Material mismatch: batch expects {expected}, node has {found:?}")]
    MaterialMismatch {
        /// Material the batch group was created for
        expected: MaterialId,
        /// Material carried by the rejected node
        found: Option<MaterialId>,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Alias for `Result<T, CanopyError>`.
pub type Result<T> = std::result::Result<T, CanopyError>;
