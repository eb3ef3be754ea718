use std::cell::Cell;

use glam::{Mat4, Vec2};

/// Snapshot of the fields the cached matrix was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trs {
    position: Vec2,
    anchor: Vec2,
    rotation: f32,
    scale: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct CachedMatrix {
    source: Trs,
    matrix: Mat4,
}

/// Local 2D affine transform of a node.
///
/// The local matrix is always
/// `T(position) · R(rotation) · T(-anchor) · S(scale)`: the anchor is the
/// pivot the node rotates and scales around, expressed in scaled local
/// units, and `position` places that pivot in the parent's space.
///
/// # Caching
///
/// Fields are public and may be written freely. The matrix is cached and
/// rebuilt lazily by comparing the current fields against the snapshot it was
/// built from (shadow-state check), so reads always see the latest values.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec2,
    pub anchor: Vec2,
    /// Radians, counter-clockwise.
    pub rotation: f32,
    pub scale: Vec2,

    cache: Cell<Option<CachedMatrix>>,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            anchor: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            cache: Cell::new(None),
        }
    }

    #[must_use]
    pub fn from_position(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::new()
        }
    }

    fn trs(&self) -> Trs {
        Trs {
            position: self.position,
            anchor: self.anchor,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    fn compose(trs: &Trs) -> Mat4 {
        Mat4::from_translation(trs.position.extend(0.0))
            * Mat4::from_rotation_z(trs.rotation)
            * Mat4::from_translation((-trs.anchor).extend(0.0))
            * Mat4::from_scale(trs.scale.extend(1.0))
    }

    /// Returns the local matrix and whether it had to be rebuilt.
    fn refresh(&self) -> (Mat4, bool) {
        let current = self.trs();
        if let Some(cached) = self.cache.get()
            && cached.source == current
        {
            return (cached.matrix, false);
        }
        let matrix = Self::compose(&current);
        self.cache.set(Some(CachedMatrix {
            source: current,
            matrix,
        }));
        (matrix, true)
    }

    /// Brings the cached matrix up to date.
    /// Returns `true` if any field changed since the last refresh.
    pub fn update_local_matrix(&mut self) -> bool {
        self.refresh().1
    }

    /// The local matrix for the current field values.
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        self.refresh().0
    }

    /// Forces the next read to rebuild the matrix.
    pub fn mark_dirty(&mut self) {
        self.cache.set(None);
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn set_anchor(&mut self, x: f32, y: f32) {
        self.anchor = Vec2::new(x, y);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.rotation += radians;
    }

    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vec2::splat(s);
    }

    /// Maps a point from this node's space into its parent's space.
    #[must_use]
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.local_matrix()
            .transform_point3(point.extend(0.0))
            .truncate()
    }

    /// Restores the identity transform.
    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.anchor = Vec2::ZERO;
        self.rotation = 0.0;
        self.scale = Vec2::ONE;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
