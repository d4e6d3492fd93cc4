//! Model node hierarchy.

use std::sync::Arc;

use crate::material::Material;
use crate::math::{Mat4, Quat, Vec3, mat4_from_scale_rotation_translation, quat_identity, transform_point};
use crate::mesh::MeshPart;

/// A mesh part drawn with a material.
#[derive(Debug, Clone)]
pub struct NodePart {
    pub mesh_part: Arc<MeshPart>,
    pub material: Arc<Material>,
    /// Disabled parts are skipped when producing renderables.
    pub enabled: bool,
}

impl NodePart {
    pub fn new(mesh_part: Arc<MeshPart>, material: Arc<Material>) -> Self {
        Self {
            mesh_part,
            material,
            enabled: true,
        }
    }
}

/// Node in a model's hierarchy.
///
/// The local transform is derived from translation, rotation and scale by
/// [`calculate_transforms`](Self::calculate_transforms); the global
/// transform is the parent's global transform times the local one.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// When false the global transform ignores the parent.
    pub inherit_transform: bool,
    pub local_transform: Mat4,
    pub global_transform: Mat4,
    pub parts: Vec<NodePart>,
    pub children: Vec<Node>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            translation: Vec3::zeros(),
            rotation: quat_identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            inherit_transform: true,
            local_transform: Mat4::identity(),
            global_transform: Mat4::identity(),
            parts: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_inherit_transform(mut self, inherit: bool) -> Self {
        self.inherit_transform = inherit;
        self
    }

    #[must_use]
    pub fn with_part(mut self, part: NodePart) -> Self {
        self.parts.push(part);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Recompute local and global transforms for this node and its subtree.
    ///
    /// `parent` is the parent's global transform, `None` for root nodes.
    pub fn calculate_transforms(&mut self, parent: Option<&Mat4>) {
        self.local_transform =
            mat4_from_scale_rotation_translation(self.scale, self.rotation, self.translation);
        self.global_transform = match parent {
            Some(p) if self.inherit_transform => p * self.local_transform,
            _ => self.local_transform,
        };
        let global = self.global_transform;
        for child in &mut self.children {
            child.calculate_transforms(Some(&global));
        }
    }

    /// Depth-first search for a node by id, including this node.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Visit this node and its descendants depth-first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Axis-aligned bounds of the enabled parts of this subtree, in the
    /// space of the global transforms.
    pub fn extend_bounds(&self, bounds: &mut Option<(Vec3, Vec3)>) {
        for part in self.parts.iter().filter(|p| p.enabled) {
            let mp = &part.mesh_part;
            if mp.size == 0 {
                continue;
            }
            let h = mp.half_extents;
            for corner in 0..8u32 {
                let sign = Vec3::new(
                    if corner & 1 == 0 { -1.0 } else { 1.0 },
                    if corner & 2 == 0 { -1.0 } else { 1.0 },
                    if corner & 4 == 0 { -1.0 } else { 1.0 },
                );
                let p = transform_point(&self.global_transform, &(mp.center + h.component_mul(&sign)));
                *bounds = Some(match *bounds {
                    Some((min, max)) => (min.inf(&p), max.sup(&p)),
                    None => (p, p),
                });
            }
        }
        for child in &self.children {
            child.extend_bounds(bounds);
        }
    }
}
