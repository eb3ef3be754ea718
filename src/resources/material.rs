//! Opaque material and shader handles.
//!
//! The scene graph never looks inside a material. It only needs identity:
//! two nodes can share a draw batch exactly when they hold the *same*
//! material, not an equal-looking one. Handles are therefore `Arc`-backed
//! and compare by their [`MaterialId`], which is minted once per
//! [`Material::new`] call and survives cloning.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Identity of a [`Material`]; the batch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(Uuid);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct ShaderInner {
    id: Uuid,
    label: Cow<'static, str>,
}

/// Handle to a compiled program owned by the renderer.
#[derive(Debug, Clone)]
pub struct Shader(Arc<ShaderInner>);

impl Shader {
    #[must_use]
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self(Arc::new(ShaderInner {
            id: Uuid::new_v4(),
            label: label.into(),
        }))
    }

    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0.label
    }
}

impl PartialEq for Shader {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}
impl Eq for Shader {}

#[derive(Debug)]
struct MaterialInner {
    id: MaterialId,
    label: Cow<'static, str>,
    shader: Shader,
}

/// Shared, read-mostly material handle.
#[derive(Debug, Clone)]
pub struct Material(Arc<MaterialInner>);

impl Material {
    #[must_use]
    pub fn new(label: impl Into<Cow<'static, str>>, shader: Shader) -> Self {
        Self(Arc::new(MaterialInner {
            id: MaterialId(Uuid::new_v4()),
            label: label.into(),
            shader,
        }))
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> MaterialId {
        self.0.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0.label
    }

    #[must_use]
    pub fn shader(&self) -> &Shader {
        &self.0.shader
    }

    /// True when both handles point at the same material.
    #[inline]
    #[must_use]
    pub fn same_as(&self, other: &Material) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}
impl Eq for Material {}
impl std::hash::Hash for Material {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}
