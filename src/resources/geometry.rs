use glam::{Mat4, Vec2, Vec4};

/// Axis-aligned rectangle in 2D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest bounds enclosing every point; `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Re-encloses the four transformed corners.
    #[must_use]
    pub fn transform(&self, matrix: &Mat4) -> Bounds {
        let corners = [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ];
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for corner in corners {
            let p = matrix.transform_point3(corner.extend(0.0)).truncate();
            min = min.min(p);
            max = max.max(p);
        }
        Bounds::new(min, max)
    }
}

/// CPU-side vertex data for one node.
///
/// The renderer uploads the buffers when [`is_dirty`](Self::is_dirty) is set
/// and clears the flag with [`take_dirty`](Self::take_dirty). Every mutating
/// helper here marks the geometry dirty.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    positions: Vec<Vec2>,
    uvs: Vec<Vec2>,
    colors: Vec<Vec4>,
    indices: Vec<u16>,
    dirty: bool,
}

impl Geometry {
    /// Empty geometry, used by container nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Two-triangle quad spanning `(0, 0)..(width, height)` with full UVs.
    #[must_use]
    pub fn quad(width: f32, height: f32) -> Self {
        Self {
            positions: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(width, 0.0),
                Vec2::new(width, height),
                Vec2::new(0.0, height),
            ],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            colors: vec![Vec4::ONE; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
            dirty: true,
        }
    }

    /// Triangle fan around the origin.
    #[must_use]
    pub fn circle(radius: f32, segments: u16) -> Self {
        let segments = segments.max(3);
        let mut positions = Vec::with_capacity(usize::from(segments) + 1);
        let mut uvs = Vec::with_capacity(usize::from(segments) + 1);
        positions.push(Vec2::ZERO);
        uvs.push(Vec2::splat(0.5));
        for i in 0..segments {
            let angle = f32::from(i) / f32::from(segments) * std::f32::consts::TAU;
            let dir = Vec2::from_angle(angle);
            positions.push(dir * radius);
            uvs.push(dir * 0.5 + Vec2::splat(0.5));
        }

        let mut indices = Vec::with_capacity(usize::from(segments) * 3);
        for i in 1..=segments {
            let next = if i == segments { 1 } else { i + 1 };
            indices.extend_from_slice(&[0, i, next]);
        }

        Self {
            colors: vec![Vec4::ONE; positions.len()],
            positions,
            uvs,
            indices,
            dirty: true,
        }
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    #[must_use]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    #[must_use]
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    #[must_use]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Remaps the UVs of a quad onto `min..max` (a sub-rectangle of the atlas).
    /// Ignored for non-quad geometry.
    pub fn set_uv_rect(&mut self, min: Vec2, max: Vec2) {
        if self.uvs.len() != 4 {
            return;
        }
        self.uvs[0] = Vec2::new(min.x, min.y);
        self.uvs[1] = Vec2::new(max.x, min.y);
        self.uvs[2] = Vec2::new(max.x, max.y);
        self.uvs[3] = Vec2::new(min.x, max.y);
        self.dirty = true;
    }

    /// Sets every vertex color.
    pub fn fill_color(&mut self, color: Vec4) {
        self.colors.fill(color);
        self.dirty = true;
    }

    /// Local-space bounds of the vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.positions.iter().copied())
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the dirty flag and clears it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
