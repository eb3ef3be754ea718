//! Scene & Emitter Configuration
//!
//! Plain data structs with serde support, so a driver can keep them in a
//! JSON file next to its assets.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use canopy::settings::{EmitterConfig, SceneSettings};
//!
//! // Defaults: auto-batching on, no bounding boxes, depth range [0, 1]
//! let settings = SceneSettings::default();
//!
//! // Partial JSON is fine, missing fields fall back to defaults
//! let settings = SceneSettings::from_json_str(r#"{ "draw_bounding_boxes": true }"#)?;
//!
//! let sparks = EmitterConfig {
//!     pool_size: 256,
//!     emission_rate: 8.0,
//!     ..Default::default()
//! };
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{CanopyError, Result};

// ---------------------------------------------------------------------------
// SceneSettings
// ---------------------------------------------------------------------------

/// Traversal and render-order settings of a [`Scene`](crate::scene::Scene).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Merge opaque same-material nodes into batches. When off every
    /// drawable node is submitted singly in traversal order.
    pub auto_batch: bool,
    /// Run the bounding-box overlay pass over singly drawn nodes.
    pub draw_bounding_boxes: bool,
    /// Depth interval partitioned among the root's children.
    pub depth_range: [f64; 2],
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            auto_batch: true,
            draw_bounding_boxes: false,
            depth_range: [0.0, 1.0],
        }
    }
}

impl SceneSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        parse_validated(json, Self::validate)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        let [min, max] = self.depth_range;
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(CanopyError::InvalidConfig(format!(
                "depth_range must be a finite, increasing interval, got [{min}, {max}]"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EmitterConfig
// ---------------------------------------------------------------------------

/// Construction parameters of a [`ParticleEmitter`](crate::particles::ParticleEmitter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Number of particles pre-allocated; the pool never grows.
    pub pool_size: usize,
    /// Spawn attempts per update (rounded up).
    pub emission_rate: f32,
    /// Seconds a particle lives, copied onto it at spawn.
    pub lifetime: f32,
    /// Width and height of each particle quad.
    pub particle_size: [f32; 2],
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            pool_size: 128,
            emission_rate: 4.0,
            lifetime: 1.0,
            particle_size: [8.0, 8.0],
        }
    }
}

impl EmitterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        parse_validated(json, Self::validate)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(CanopyError::InvalidConfig(
                "pool_size must be at least 1".to_string(),
            ));
        }
        if !self.emission_rate.is_finite() || self.emission_rate < 0.0 {
            return Err(CanopyError::InvalidConfig(format!(
                "emission_rate must be finite and non-negative, got {}",
                self.emission_rate
            )));
        }
        if !self.lifetime.is_finite() || self.lifetime < 0.0 {
            return Err(CanopyError::InvalidConfig(format!(
                "lifetime must be finite and non-negative, got {}",
                self.lifetime
            )));
        }
        Ok(())
    }
}

fn parse_validated<T: DeserializeOwned>(json: &str, validate: fn(&T) -> Result<()>) -> Result<T> {
    let value: T = serde_json::from_str(json)?;
    validate(&value)?;
    Ok(value)
}
