//! Per-draw submission records and the providers that produce them.

use std::any::Any;
use std::sync::Arc;

use starmesh_core::material::Material;
use starmesh_core::math::{Mat4, Vec3, transform_point};
use starmesh_core::mesh::MeshPart;
use starmesh_core::model::{Model, Node};
use starmesh_core::pool::{Pool, Poolable};

use crate::environment::Environment;
use crate::shader::ShaderHandle;

/// One draw: a mesh part with a material at a world transform.
///
/// Renderables are taken from a [`Pool`] when submitted and returned to it
/// when the batch flushes, so they must not be kept across frames.
#[derive(Debug, Clone)]
pub struct Renderable {
    pub world_transform: Mat4,
    pub mesh_part: Option<Arc<MeshPart>>,
    pub material: Option<Arc<Material>>,
    pub environment: Option<Arc<Environment>>,
    /// Skinning matrices; empty for static geometry.
    pub bones: Vec<Mat4>,
    /// Shader chosen for the draw. Set by the batch, or preset as a hint for
    /// the shader provider.
    pub shader: Option<ShaderHandle>,
    pub user_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl Poolable for Renderable {
    fn new_empty() -> Self {
        Self {
            world_transform: Mat4::identity(),
            mesh_part: None,
            material: None,
            environment: None,
            bones: Vec::new(),
            shader: None,
            user_data: None,
        }
    }

    fn reset(&mut self) {
        self.world_transform = Mat4::identity();
        self.mesh_part = None;
        self.material = None;
        self.environment = None;
        self.bones.clear();
        self.shader = None;
        self.user_data = None;
    }
}

impl Renderable {
    /// Whether the material enables blending.
    pub fn is_blended(&self) -> bool {
        self.material.as_ref().is_some_and(|m| m.is_blended())
    }

    /// The mesh part's local center mapped through the world transform.
    pub fn world_center(&self) -> Vec3 {
        let center = self
            .mesh_part
            .as_ref()
            .map_or_else(Vec3::zeros, |p| p.center);
        transform_point(&self.world_transform, &center)
    }
}

/// Something that can be turned into renderables.
pub trait RenderableProvider {
    /// Append renderables obtained from `pool` to `out`.
    fn renderables(&self, out: &mut Vec<Renderable>, pool: &mut Pool<Renderable>);
}

/// A [`Model`] placed in the world.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    pub model: Arc<Model>,
    pub transform: Mat4,
    pub user_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl ModelInstance {
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            transform: Mat4::identity(),
            user_data: None,
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_user_data(mut self, user_data: Arc<dyn Any + Send + Sync>) -> Self {
        self.user_data = Some(user_data);
        self
    }

    fn collect(&self, node: &Node, out: &mut Vec<Renderable>, pool: &mut Pool<Renderable>) {
        for part in node.parts.iter().filter(|p| p.enabled) {
            let mut r = pool.obtain();
            r.world_transform = self.transform * node.global_transform;
            r.mesh_part = Some(Arc::clone(&part.mesh_part));
            r.material = Some(Arc::clone(&part.material));
            r.user_data = self.user_data.clone();
            out.push(r);
        }
        for child in &node.children {
            self.collect(child, out, pool);
        }
    }
}

/// One renderable per enabled node part, depth-first, with the world
/// transform `instance transform * node global transform`.
impl RenderableProvider for ModelInstance {
    fn renderables(&self, out: &mut Vec<Renderable>, pool: &mut Pool<Renderable>) {
        for node in &self.model.nodes {
            self.collect(node, out, pool);
        }
    }
}

impl<T: RenderableProvider + ?Sized> RenderableProvider for &T {
    fn renderables(&self, out: &mut Vec<Renderable>, pool: &mut Pool<Renderable>) {
        (**self).renderables(out, pool);
    }
}

static_assertions::assert_impl_all!(Renderable: Send, Sync);
static_assertions::assert_impl_all!(ModelInstance: Send, Sync);
