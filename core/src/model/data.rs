use std::sync::Arc;

use crate::material::Material;
use crate::math::Vec3;
use crate::mesh::{Mesh, MeshPart};

use super::node::Node;

/// A hierarchy of nodes plus registries of everything they reference.
///
/// The registries hold each material, mesh and mesh part once, compared by
/// pointer. `managed` lists meshes whose lifetime the model is responsible
/// for.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub nodes: Vec<Node>,
    pub materials: Vec<Arc<Material>>,
    pub meshes: Vec<Arc<Mesh>>,
    pub mesh_parts: Vec<Arc<MeshPart>>,
    managed: Vec<Arc<Mesh>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take responsibility for `mesh`. Adding the same mesh twice is a no-op.
    pub fn manage(&mut self, mesh: Arc<Mesh>) {
        push_unique(&mut self.managed, mesh);
    }

    pub fn managed(&self) -> &[Arc<Mesh>] {
        &self.managed
    }

    pub(crate) fn take_managed(&mut self) -> Vec<Arc<Mesh>> {
        std::mem::take(&mut self.managed)
    }

    /// Recompute local and global transforms of every node.
    pub fn calculate_transforms(&mut self) {
        for node in &mut self.nodes {
            node.calculate_transforms(None);
        }
    }

    /// Depth-first lookup of a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find_map(|n| n.find(id))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find_map(|n| n.find_mut(id))
    }

    /// Axis-aligned bounds of all enabled parts under the current global
    /// transforms, or `None` for an empty model.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut bounds = None;
        for node in &self.nodes {
            node.extend_bounds(&mut bounds);
        }
        bounds
    }
}

/// Rebuild the material, mesh and mesh-part registries of `model` from the
/// parts its nodes reference.
///
/// Every referenced mesh also becomes managed by the model. Calling this
/// twice gives the same registries.
pub fn rebuild_references(model: &mut Model) {
    model.materials.clear();
    model.meshes.clear();
    model.mesh_parts.clear();

    let mut materials = Vec::new();
    let mut meshes = Vec::new();
    let mut mesh_parts = Vec::new();
    for node in &model.nodes {
        node.visit(&mut |n| {
            for part in &n.parts {
                push_unique(&mut materials, Arc::clone(&part.material));
                if push_unique(&mut mesh_parts, Arc::clone(&part.mesh_part)) {
                    push_unique(&mut meshes, Arc::clone(&part.mesh_part.mesh));
                }
            }
        });
    }
    for mesh in &meshes {
        model.manage(Arc::clone(mesh));
    }
    model.materials = materials;
    model.meshes = meshes;
    model.mesh_parts = mesh_parts;
}

fn push_unique<T>(list: &mut Vec<Arc<T>>, item: Arc<T>) -> bool {
    if list.iter().any(|x| Arc::ptr_eq(x, &item)) {
        false
    } else {
        list.push(item);
        true
    }
}
