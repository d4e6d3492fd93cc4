use std::sync::Arc;

use starmesh_core::color::Color;
use starmesh_core::material::Material;
use starmesh_core::math::{Mat4, Vec3, mat4_from_translation};
use starmesh_core::mesh::obj::{dump_obj, write_obj};
use starmesh_core::mesh::shapes::{Arrow, Cylinder, Ring, UvSphere};
use starmesh_core::mesh::spheres::{IcoSphere, SubdivisionSphere};
use starmesh_core::mesh::{
    MeshBuilder, PrimitiveTopology, VertexAttributeSemantic, VertexLayout, VertexSink, VertexUsage,
};
use starmesh_core::model::{AssemblerConfig, ModelBuilder, rebuild_references};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ---------------------------------------------------------------------------
// Builder → model pipeline
// ---------------------------------------------------------------------------

#[test]
fn assemble_multi_node_model() {
    init_logging();
    let mut mb = ModelBuilder::new();
    let hull = Arc::new(Material::new("hull"));
    let glass = Arc::new(Material::new("glass"));
    let layout = VertexLayout::position_normal_uv();

    mb.begin().unwrap();
    mb.node().unwrap().translation = Vec3::new(0.0, 0.0, -10.0);
    mb.part("body", PrimitiveTopology::TriangleList, Arc::clone(&layout), Arc::clone(&hull))
        .unwrap()
        .cylinder(&Cylinder::new(1.0, 4.0, 1.0, 16))
        .unwrap();
    mb.part("dome", PrimitiveTopology::TriangleList, Arc::clone(&layout), glass)
        .unwrap()
        .sphere(
            &UvSphere::new(1.0, 1.0, 1.0, 16, 8)
                .with_angles_v(0.0, 90.0)
                .with_transform(mat4_from_translation(Vec3::new(0.0, 2.0, 0.0))),
        )
        .unwrap();
    mb.node().unwrap().translation = Vec3::new(3.0, 0.0, 0.0);
    mb.part("fin", PrimitiveTopology::TriangleList, layout, hull)
        .unwrap()
        .box_sized(0.1, 1.0, 1.0)
        .unwrap();
    let mut model = mb.end().unwrap();

    assert_eq!(model.nodes.len(), 2);
    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.mesh_parts.len(), 3);
    assert_eq!(model.materials.len(), 2);

    // Parts tile the shared index buffer without gaps.
    let mut end = 0;
    for part in &model.mesh_parts {
        assert_eq!(part.offset, end);
        end += part.size;
    }
    assert_eq!(end, model.meshes[0].index_count());

    let (min, max) = model.bounds().unwrap();
    assert!(min.z < -10.0);
    assert!(max.x > 3.0);

    let before = model.mesh_parts.len();
    rebuild_references(&mut model);
    assert_eq!(model.mesh_parts.len(), before);
}

#[test]
fn indices_stay_in_range() {
    init_logging();
    let mut builder = MeshBuilder::new();
    builder
        .begin(VertexLayout::tangent_space(), PrimitiveTopology::TriangleList)
        .unwrap();
    builder.part("capsule", PrimitiveTopology::TriangleList).unwrap();
    builder.capsule(0.5, 3.0, 12).unwrap();
    builder.part("arrow", PrimitiveTopology::TriangleList).unwrap();
    builder
        .arrow(&Arrow::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)))
        .unwrap();
    builder.part("ring", PrimitiveTopology::TriangleList).unwrap();
    builder.ring(&Ring::new(1.0, 2.0, 24)).unwrap();
    builder.part("ico", PrimitiveTopology::TriangleList).unwrap();
    builder.icosphere(1.0, 2, false, true, 0, usize::MAX).unwrap();
    let built = builder.end().unwrap();

    let count = built.mesh.vertex_count() as u32;
    assert!(built.mesh.indices().iter().all(|&i| i < count));
    assert!(built.parts.iter().all(|p| p.size % 3 == 0));
    assert!(builder.scratch().is_empty());
}

#[test]
fn normals_stay_unit_under_vertex_transform() {
    let mut builder = MeshBuilder::new();
    builder
        .begin(VertexLayout::position_normal(), PrimitiveTopology::TriangleList)
        .unwrap();
    let stretch = Mat4::new_nonuniform_scaling(&Vec3::new(4.0, 1.0, 0.25));
    builder.set_vertex_transform(Some(stretch)).unwrap();
    builder.sphere(&UvSphere::new(1.0, 1.0, 1.0, 12, 6)).unwrap();
    let built = builder.end().unwrap();

    let mesh = &built.mesh;
    let stride = mesh.layout().stride();
    let offset = mesh.layout().offset_of(VertexAttributeSemantic::Normal).unwrap();
    for v in 0..mesh.vertex_count() {
        let n = &mesh.vertices()[v * stride + offset..v * stride + offset + 3];
        let len = Vec3::new(n[0], n[1], n[2]).norm();
        assert!((len - 1.0).abs() < 1e-4, "vertex {v} normal length {len}");
    }
}

#[test]
fn packed_color_layout() {
    let mut builder = MeshBuilder::new();
    builder
        .begin_usage(
            VertexUsage::POSITION | VertexUsage::COLOR_PACKED,
            PrimitiveTopology::PointList,
        )
        .unwrap();
    builder.set_color(Some(Color::GREEN));
    builder.box_sized(1.0, 1.0, 1.0).unwrap();
    let built = builder.end().unwrap();

    assert_eq!(built.mesh.layout().stride(), 4);
    assert_eq!(built.mesh.index_count(), 8);
    let packed = built.mesh.vertices()[3];
    assert_eq!(packed.to_bits(), Color::GREEN.to_packed_float().to_bits());
}

// ---------------------------------------------------------------------------
// Packing across meshes
// ---------------------------------------------------------------------------

#[test]
fn margin_splits_meshes_but_keeps_parts() {
    init_logging();
    let mut mb = ModelBuilder::with_config(AssemblerConfig::default().with_vertex_margin(100));
    let material = Arc::new(Material::new("m"));

    mb.begin().unwrap();
    for i in 0..5 {
        mb.part_usage(
            format!("sphere{i}"),
            PrimitiveTopology::TriangleList,
            VertexUsage::POSITION,
            Arc::clone(&material),
        )
        .unwrap()
        .sphere(&UvSphere::new(1.0, 1.0, 1.0, 8, 8))
        .unwrap();
    }
    let model = mb.end().unwrap();

    // 81 vertices per sphere: a builder takes a second sphere, never a third.
    assert_eq!(model.mesh_parts.len(), 5);
    assert_eq!(model.meshes.len(), 3);
    assert_eq!(model.meshes[0].vertex_count(), 162);
    assert!(model.mesh_parts.iter().all(|p| p.size == 8 * 8 * 6));
}

// ---------------------------------------------------------------------------
// OBJ export
// ---------------------------------------------------------------------------

#[test]
fn obj_dump_matches_geometry() {
    let geometry = IcoSphere::create(2.0, 1, false, false).unwrap();
    let mut text = Vec::new();
    write_obj(&geometry, &mut text).unwrap();
    let text = String::from_utf8(text).unwrap();

    let faces = text.lines().filter(|l| l.starts_with("f ")).count();
    assert_eq!(faces, 80);
    for line in text.lines().filter(|l| l.starts_with("v ")) {
        let coords: Vec<f32> = line[2..].split(' ').map(|c| c.parse().unwrap()).collect();
        let r = Vec3::new(coords[0], coords[1], coords[2]).norm();
        assert!((r - 2.0).abs() < 1e-4);
    }

    let path = std::env::temp_dir().join(format!("starmesh_obj_{}.obj", std::process::id()));
    dump_obj(&geometry, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(written, text);
}
