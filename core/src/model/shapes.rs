//! One-call model constructors.
//!
//! Each `create_*` method assembles a complete [`Model`] holding a single
//! node with the named shape. The builder must not be in the middle of
//! another model.

use std::sync::Arc;

use crate::color::Color;
use crate::error::MeshResult;
use crate::material::Material;
use crate::math::{Vec2, Vec3, mat4_from_translation};
use crate::mesh::shapes::{Arrow, Cone, Cylinder, Ring, UvSphere};
use crate::mesh::spheres::{self, IcoSphere, OctahedronSphere, SubdivisionSphere};
use crate::mesh::{PrimitiveTopology, VertexInfo, VertexSink, VertexUsage};

use super::builder::ModelBuilder;
use super::data::Model;

/// Vertical offset of the downward-facing copy of a ring, keeping the two
/// faces from z-fighting.
const RING_BACKFACE_OFFSET: f32 = 0.00001;

impl ModelBuilder {
    fn assemble(&mut self, f: impl FnOnce(&mut Self) -> MeshResult<()>) -> MeshResult<Model> {
        self.begin()?;
        if let Err(e) = f(self) {
            self.cancel();
            return Err(e);
        }
        self.end()
    }

    pub fn create_box(
        &mut self,
        width: f32,
        height: f32,
        depth: f32,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        self.assemble(|mb| {
            mb.part_usage("box", topology, usage, material)?
                .box_sized(width, height, depth)
        })
    }

    /// Single quad with corners in counter-clockwise order.
    pub fn create_rect(
        &mut self,
        corners: [Vec3; 4],
        normal: Vec3,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        let [c00, c10, c11, c01] = corners;
        self.assemble(|mb| {
            mb.part_usage("rect", topology, usage, material)?
                .rect_normal(c00, c10, c11, c01, normal)
        })
    }

    pub fn create_cylinder(
        &mut self,
        cylinder: &Cylinder,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        self.assemble(|mb| {
            mb.part_usage("cylinder", topology, usage, material)?
                .cylinder(cylinder)
        })
    }

    pub fn create_cone(
        &mut self,
        cone: &Cone,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        self.assemble(|mb| mb.part_usage("cone", topology, usage, material)?.cone(cone))
    }

    pub fn create_sphere(
        &mut self,
        sphere: &UvSphere,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        self.assemble(|mb| mb.part_usage("sphere", topology, usage, material)?.sphere(sphere))
    }

    pub fn create_capsule(
        &mut self,
        radius: f32,
        height: f32,
        divisions: u32,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        self.assemble(|mb| {
            mb.part_usage("capsule", topology, usage, material)?
                .capsule(radius, height, divisions)
        })
    }

    pub fn create_arrow(
        &mut self,
        arrow: &Arrow,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        self.assemble(|mb| mb.part_usage("arrow", topology, usage, material)?.arrow(arrow))
    }

    /// Red, green and blue arrows along +X, +Y and +Z in one part.
    ///
    /// The colors only show up if `usage` contains a color attribute.
    pub fn create_xyz_coordinates(
        &mut self,
        axis_length: f32,
        cap_length: f32,
        stem_thickness: f32,
        divisions: u32,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        self.assemble(|mb| {
            let mut b = mb.part_usage("xyz", topology, usage, material)?;
            for (axis, color) in [
                (Vec3::x(), Color::RED),
                (Vec3::y(), Color::GREEN),
                (Vec3::z(), Color::BLUE),
            ] {
                b.set_color(Some(color));
                b.arrow(
                    &Arrow::new(Vec3::zeros(), axis * axis_length)
                        .with_cap_length(cap_length)
                        .with_stem_thickness(stem_thickness)
                        .with_divisions(divisions),
                )?;
            }
            Ok(())
        })
    }

    /// Square of side `side` in the XZ plane, facing down, split into a
    /// `divisions_u` x `divisions_v` grid.
    pub fn create_plane(
        &mut self,
        side: f32,
        divisions_u: u32,
        divisions_v: u32,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        let hs = side * 0.5;
        let down = -Vec3::y();
        let c00 = VertexInfo::pnu(Vec3::new(-hs, 0.0, -hs), down, Vec2::new(0.0, 0.0));
        let c10 = VertexInfo::pnu(Vec3::new(hs, 0.0, -hs), down, Vec2::new(0.0, 1.0));
        let c11 = VertexInfo::pnu(Vec3::new(hs, 0.0, hs), down, Vec2::new(1.0, 1.0));
        let c01 = VertexInfo::pnu(Vec3::new(-hs, 0.0, hs), down, Vec2::new(1.0, 0.0));
        self.assemble(|mb| {
            let mut b = mb.part_usage("plane", topology, usage, material)?;
            crate::mesh::shapes::patch_vertices(&mut b, &c00, &c10, &c11, &c01, divisions_u, divisions_v)
        })
    }

    /// Grid of lines in the XZ plane centered on the origin, with
    /// `x_divisions` cells of width `x_size` and `z_divisions` cells of
    /// depth `z_size`.
    pub fn create_line_grid(
        &mut self,
        x_divisions: u32,
        z_divisions: u32,
        x_size: f32,
        z_size: f32,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        let hx = x_divisions as f32 * x_size * 0.5;
        let hz = z_divisions as f32 * z_size * 0.5;
        self.assemble(|mb| {
            let mut b = mb.part_usage("lines", PrimitiveTopology::LineList, usage, material)?;
            let lines = x_divisions as usize + z_divisions as usize + 2;
            b.reserve_vertices(lines * 2)?;
            b.ensure_indices(lines * 2);
            let mut segment = |from: Vec3, to: Vec3| -> MeshResult<()> {
                let a = b.vertex(&VertexInfo::new().with_position(from))?;
                let c = b.vertex(&VertexInfo::new().with_position(to))?;
                b.line(a, c)
            };
            for i in 0..=x_divisions {
                let x = -hx + i as f32 * x_size;
                segment(Vec3::new(x, 0.0, hz), Vec3::new(x, 0.0, -hz))?;
            }
            for j in 0..=z_divisions {
                let z = -hz + j as f32 * z_size;
                segment(Vec3::new(-hx, 0.0, z), Vec3::new(hx, 0.0, z))?;
            }
            Ok(())
        })
    }

    /// Icosphere, split over several `"icosphere"` parts when its flattened
    /// vertex count exceeds the assembler's vertex margin.
    pub fn create_icosphere(
        &mut self,
        radius: f32,
        divisions: u32,
        flip_normals: bool,
        hard_edges: bool,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        let geometry = IcoSphere::create(radius, divisions, flip_normals, hard_edges)?;
        let total = geometry.faces.len();
        let per_part = (self.config().vertex_margin as usize / 3).clamp(1, u32::MAX as usize / 3);
        self.assemble(|mb| {
            let mut start = 0;
            while start < total {
                let mut b = mb.part_usage("icosphere", topology, usage, Arc::clone(&material))?;
                spheres::emit_faces(&mut b, &geometry, start, per_part)?;
                start += per_part;
            }
            if total > per_part {
                log::debug!("icosphere split into {} parts", total.div_ceil(per_part));
            }
            Ok(())
        })
    }

    pub fn create_octahedron_sphere(
        &mut self,
        radius: f32,
        divisions: u32,
        flip_normals: bool,
        hard_edges: bool,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        let faces = OctahedronSphere::face_count(divisions.min(OctahedronSphere::MAX_DIVISIONS));
        self.assemble(|mb| {
            mb.part_usage("octahedronsphere", topology, usage, material)?
                .octahedron_sphere(radius, divisions, flip_normals, hard_edges, 0, faces)
        })
    }

    /// Two-sided ring: an upward face and a downward face just below it.
    pub fn create_ring(
        &mut self,
        inner_radius: f32,
        outer_radius: f32,
        divisions: u32,
        topology: PrimitiveTopology,
        material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        self.assemble(|mb| add_ring(mb, inner_radius, outer_radius, divisions, topology, &material, usage))
    }

    /// Sphere of diameter `sphere_diameter` surrounded by a two-sided ring,
    /// as for a ringed planet.
    pub fn create_sphere_ring(
        &mut self,
        sphere_diameter: f32,
        divisions_u: u32,
        divisions_v: u32,
        inner_radius: f32,
        outer_radius: f32,
        ring_divisions: u32,
        topology: PrimitiveTopology,
        sphere_material: Arc<Material>,
        ring_material: Arc<Material>,
        usage: VertexUsage,
    ) -> MeshResult<Model> {
        let d = sphere_diameter;
        self.assemble(|mb| {
            mb.part_usage("sphere", topology, usage, sphere_material)?
                .sphere(&UvSphere::new(d, d, d, divisions_u, divisions_v))?;
            add_ring(mb, inner_radius, outer_radius, ring_divisions, topology, &ring_material, usage)
        })
    }
}

fn add_ring(
    mb: &mut ModelBuilder,
    inner_radius: f32,
    outer_radius: f32,
    divisions: u32,
    topology: PrimitiveTopology,
    material: &Arc<Material>,
    usage: VertexUsage,
) -> MeshResult<()> {
    let ring = Ring::new(inner_radius, outer_radius, divisions);
    mb.part_usage("ring", topology, usage, Arc::clone(material))?
        .ring(&ring)?;
    mb.part_usage("ring", topology, usage, Arc::clone(material))?.ring(
        &ring
            .with_flip_normals(true)
            .with_transform(mat4_from_translation(Vec3::new(0.0, -RING_BACKFACE_OFFSET, 0.0))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::model::AssemblerConfig;

    fn material() -> Arc<Material> {
        Arc::new(Material::new("test"))
    }

    const TRIANGLES: PrimitiveTopology = PrimitiveTopology::TriangleList;

    #[test]
    fn test_create_box() {
        let mut mb = ModelBuilder::new();
        let model = mb
            .create_box(1.0, 2.0, 3.0, TRIANGLES, material(), VertexUsage::POSITION)
            .unwrap();

        assert_eq!(model.nodes.len(), 1);
        assert_eq!(model.mesh_parts[0].id, "box");
        assert_eq!(model.meshes[0].vertex_count(), 8);
        assert_eq!(model.meshes[0].index_count(), 36);
        assert!((model.mesh_parts[0].half_extents - Vec3::new(0.5, 1.0, 1.5)).norm() < 1e-6);
        assert!(!mb.is_building());
    }

    #[test]
    fn test_failed_create_resets_builder() {
        let mut mb = ModelBuilder::new();
        let err = mb
            .create_capsule(1.0, 1.0, 8, TRIANGLES, material(), VertexUsage::POSITION)
            .unwrap_err();
        assert!(matches!(err, MeshError::CapsuleTooShort { .. }));
        assert!(!mb.is_building());
        assert!(mb
            .create_capsule(1.0, 4.0, 8, TRIANGLES, material(), VertexUsage::POSITION)
            .is_ok());
    }

    #[test]
    fn test_create_line_grid() {
        let mut mb = ModelBuilder::new();
        let model = mb
            .create_line_grid(4, 2, 1.0, 0.5, material(), VertexUsage::POSITION)
            .unwrap();

        let part = &model.mesh_parts[0];
        assert_eq!(part.topology, PrimitiveTopology::LineList);
        assert_eq!(part.size, 2 * (5 + 3));
        assert!((part.half_extents - Vec3::new(2.0, 0.0, 0.5)).norm() < 1e-6);
    }

    #[test]
    fn test_create_line_grid_rejects_huge_divisions() {
        let mut mb = ModelBuilder::new();
        let err = mb
            .create_line_grid(u32::MAX, u32::MAX, 1.0, 1.0, material(), VertexUsage::POSITION)
            .unwrap_err();
        assert_eq!(err, MeshError::TooManyVertices { limit: u32::MAX });
        assert!(!mb.is_building());
    }

    #[test]
    fn test_create_xyz_coordinates_colors() {
        let mut mb = ModelBuilder::new();
        let model = mb
            .create_xyz_coordinates(
                1.0,
                0.1,
                0.1,
                5,
                TRIANGLES,
                material(),
                VertexUsage::POSITION | VertexUsage::COLOR_UNPACKED,
            )
            .unwrap();

        assert_eq!(model.mesh_parts.len(), 1);
        let mesh = &model.meshes[0];
        let stride = mesh.layout().stride();
        let color_at = |v: usize| &mesh.vertices()[v * stride + 3..v * stride + 7];
        assert_eq!(color_at(0), Color::RED.to_array());
        assert_eq!(color_at(mesh.vertex_count() - 1), Color::BLUE.to_array());
    }

    #[test]
    fn test_create_plane() {
        let mut mb = ModelBuilder::new();
        let model = mb
            .create_plane(2.0, 2, 3, TRIANGLES, material(), VertexUsage::POSITION | VertexUsage::NORMAL)
            .unwrap();

        assert_eq!(model.meshes[0].vertex_count(), 3 * 4);
        assert_eq!(model.mesh_parts[0].size, 2 * 3 * 6);
        assert!((model.mesh_parts[0].half_extents - Vec3::new(1.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_create_icosphere_single_part() {
        let mut mb = ModelBuilder::new();
        let model = mb
            .create_icosphere(1.0, 2, false, false, TRIANGLES, material(), VertexUsage::POSITION)
            .unwrap();
        assert_eq!(model.mesh_parts.len(), 1);
        assert_eq!(model.mesh_parts[0].size, 320 * 3);
    }

    #[test]
    fn test_create_icosphere_chunks() {
        let mut mb = ModelBuilder::with_config(AssemblerConfig::default().with_vertex_margin(300));
        let model = mb
            .create_icosphere(1.0, 2, false, false, TRIANGLES, material(), VertexUsage::POSITION)
            .unwrap();

        assert_eq!(model.mesh_parts.len(), 4);
        assert!(model.mesh_parts.iter().all(|p| p.id == "icosphere"));
        let faces: usize = model.mesh_parts.iter().map(|p| p.size / 3).sum();
        assert_eq!(faces, 320);
        assert_eq!(model.meshes.len(), 4);
    }

    #[test]
    fn test_create_octahedron_sphere() {
        let mut mb = ModelBuilder::new();
        let model = mb
            .create_octahedron_sphere(1.0, 1, false, true, TRIANGLES, material(), VertexUsage::POSITION)
            .unwrap();
        assert_eq!(model.mesh_parts.len(), 1);
        assert_eq!(model.mesh_parts[0].size, 32 * 3);

        assert!(mb
            .create_octahedron_sphere(1.0, 7, false, true, TRIANGLES, material(), VertexUsage::POSITION)
            .is_err());
    }

    #[test]
    fn test_create_sphere_ring() {
        let mut mb = ModelBuilder::new();
        let planet = material();
        let rings = material();
        let model = mb
            .create_sphere_ring(
                1.0,
                16,
                8,
                1.0,
                2.0,
                32,
                TRIANGLES,
                Arc::clone(&planet),
                Arc::clone(&rings),
                VertexUsage::POSITION | VertexUsage::NORMAL | VertexUsage::TEX_COORDS,
            )
            .unwrap();

        let ids: Vec<_> = model.nodes[0].parts.iter().map(|p| p.mesh_part.id.as_str()).collect();
        assert_eq!(ids, ["sphere", "ring", "ring"]);
        assert_eq!(model.materials.len(), 2);
        assert!(Arc::ptr_eq(&model.nodes[0].parts[2].material, &rings));
        assert_eq!(model.meshes.len(), 1);

        let under = &model.nodes[0].parts[2].mesh_part;
        assert!(under.center.y < 0.0);
    }
}
