use crate::{
    coords::{GridMetrics, Vec3},
    generator::{average_normals, ChunkMesh, DensityField, MeshBuilder, Triangle, Triangulator, Uv},
};
use approx::{assert_abs_diff_eq, assert_relative_eq};
use log::debug;

use super::{layered_field, metrics};

const ISO: f32 = 0.5;

fn assert_unit_or_zero(mesh: &ChunkMesh) {
    for n in &mesh.normals {
        let len = n.norm();
        assert!(len == 0.0 || (len - 1.0).abs() < 1e-5, "normal {n:?} has length {len}");
    }
}

#[test]
fn test_empty_stream() {
    let mesh = MeshBuilder::new(metrics(4)).build(&[]);
    assert!(mesh.is_empty());
    assert_eq!(mesh.vertices.len(), 0, "Empty stream should produce no vertices");
    assert_eq!(mesh.normals.len(), 0, "Empty stream should produce no normals");
    assert_eq!(mesh.uvs.len(), 0, "Empty stream should produce no uvs");
}

#[test]
fn test_single_triangle_is_reverse_wound() {
    let mut field = DensityField::from_fn(metrics(4), |_, _, _| ISO + 1.0);
    field.set(2, 2, 2, ISO - 1.0);

    let triangles = Triangulator::new(ISO).triangulate(&field);
    let cell = Triangulator::new(ISO).march(&field, 1, 1, 1);
    assert_eq!(cell.len(), 1, "Only corner 6 of cell (1, 1, 1) is below iso");

    let mesh = MeshBuilder::new(metrics(4)).build(&cell);
    assert_eq!(mesh.vertices, vec![cell[0].a, cell[0].b, cell[0].c]);
    assert_eq!(mesh.indices, vec![2, 1, 0]);
    assert_eq!(mesh.normals.len(), 3);

    let face = (cell[0].b - cell[0].c).cross(&(cell[0].a - cell[0].c)).normalize();
    for n in &mesh.normals {
        assert_abs_diff_eq!(*n, face, epsilon = 1e-6);
    }
    // the flipped face points away from the below-iso corner at (2, 2, 2)
    let centroid = (cell[0].a + cell[0].b + cell[0].c) / 3.0;
    assert!(face.dot(&(centroid - Vec3::new(2.0, 2.0, 2.0))) > 0.0);

    // the point is shared by eight cells, each contributing one triangle
    assert_eq!(triangles.len(), 8);
}

#[test]
fn test_flat_field_forms_horizontal_surface() {
    let _ = env_logger::builder().is_test(true).try_init();

    let p = 6;
    let k = 3;
    let grid = GridMetrics {
        points_per_chunk: p,
        distance: 2.0,
    };
    let field = DensityField::from_fn(grid, |_, _, z| ISO + (z as f32 - k as f32));
    let triangles = Triangulator::new(ISO).triangulate(&field);
    let mesh = MeshBuilder::new(grid).build(&triangles);

    debug!("Flat field mesh: {} triangles", mesh.triangle_count());
    assert_eq!(mesh.triangle_count(), 2 * (p - 1) * (p - 1));

    for v in &mesh.vertices {
        assert_relative_eq!(v.z, k as f32 * grid.distance);
    }
    for n in &mesh.normals {
        assert_abs_diff_eq!(*n, Vec3::z(), epsilon = 1e-6);
    }
}

#[test]
fn test_flat_surface_covers_chunk() {
    let p = 5;
    let field = layered_field(p, ISO, 2);
    let mesh = MeshBuilder::new(metrics(p)).build(&Triangulator::new(ISO).triangulate(&field));

    let span = (p - 1) as f32;
    let (min_x, max_x) = mesh
        .vertices
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v.x), hi.max(v.x)));
    assert_relative_eq!(min_x, 0.0);
    assert_relative_eq!(max_x, span);
}

#[test]
fn test_uvs_follow_grid_columns() {
    let p = 5;
    let grid = GridMetrics {
        points_per_chunk: p,
        distance: 3.0,
    };
    let field = DensityField::from_fn(grid, |_, _, z| ISO + (z as f32 - 2.0));
    let mesh = MeshBuilder::new(grid).build(&Triangulator::new(ISO).triangulate(&field));

    assert_eq!(mesh.uvs.len(), mesh.vertices.len());
    for (v, uv) in mesh.vertices.iter().zip(&mesh.uvs) {
        let column_x = v.x / grid.distance;
        let column_y = v.y / grid.distance;
        assert_abs_diff_eq!(*uv, Uv::new(column_x / (p - 1) as f32, column_y / (p - 1) as f32), epsilon = 1e-6);
        assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
    }
}

#[test]
fn test_vertices_are_not_welded() {
    let field = layered_field(4, ISO, 1);
    let triangles = Triangulator::new(ISO).triangulate(&field);
    let mesh = MeshBuilder::new(metrics(4)).build(&triangles);

    assert_eq!(mesh.vertices.len(), 3 * triangles.len());
    let expected: Vec<u32> = (0..triangles.len() as u32)
        .flat_map(|t| [3 * t + 2, 3 * t + 1, 3 * t])
        .collect();
    assert_eq!(mesh.indices, expected);
}

#[test]
fn test_rebuild_is_idempotent() {
    let field = DensityField::from_fn(metrics(7), |x, y, z| {
        ISO + (x as f32 * 0.7).sin() + (y as f32 * 0.4).cos() - z as f32 * 0.5 + 1.0
    });
    let tri = Triangulator::new(ISO);
    let builder = MeshBuilder::new(metrics(7));

    let first = builder.build(&tri.triangulate(&field));
    let second = builder.build(&tri.triangulate(&field));
    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_unit_or_zero(&first);
}

#[test]
fn test_isolated_vertex_has_zero_normal() {
    let vertices = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(5.0, 5.0, 5.0),
    ];
    let normals = average_normals(&vertices, &[2, 1, 0]);
    assert_abs_diff_eq!(normals[0], -Vec3::z(), epsilon = 1e-6);
    assert_eq!(normals[3], Vec3::zeros());
}

#[test]
fn test_degenerate_face_has_zero_normal() {
    let vertices = vec![Vec3::new(1.0, 1.0, 1.0); 3];
    let normals = average_normals(&vertices, &[2, 1, 0]);
    assert!(normals.iter().all(|n| *n == Vec3::zeros()));
}

#[test]
fn test_normals_are_averaged() {
    // two faces sharing vertex 0 at a right angle
    let vertices = vec![
        Vec3::zeros(),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    ];
    let normals = average_normals(&vertices, &[0, 1, 2, 0, 3, 1]);
    let expected = (Vec3::z() + Vec3::y()).normalize();
    assert_abs_diff_eq!(normals[0], expected, epsilon = 1e-6);
    assert_abs_diff_eq!(normals[2], Vec3::z(), epsilon = 1e-6);
}

#[test]
fn test_buffers_are_flattened() {
    let mesh = MeshBuilder::new(metrics(4)).build(&[Triangle {
        a: Vec3::new(0.0, 0.0, 0.0),
        b: Vec3::new(1.0, 0.0, 0.0),
        c: Vec3::new(0.0, 1.0, 0.0),
    }]);
    let buffers = mesh.to_buffers();
    assert_eq!(buffers.vertices.len(), 9);
    assert_eq!(buffers.normals.len(), 9);
    assert_eq!(buffers.uvs.len(), 6);
    assert_eq!(buffers.indices, vec![2, 1, 0]);
    assert_eq!(&buffers.vertices[3..6], &[1.0, 0.0, 0.0]);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_out_of_range_index_fails_fast() {
    let mut mesh = MeshBuilder::new(metrics(4)).build(&[Triangle {
        a: Vec3::zeros(),
        b: Vec3::x(),
        c: Vec3::y(),
    }]);
    mesh.indices[0] = 7;
    mesh.assert_consistent();
}

#[test]
#[should_panic(expected = "normal buffer")]
fn test_length_mismatch_fails_fast() {
    let mut mesh = MeshBuilder::new(metrics(4)).build(&[Triangle {
        a: Vec3::zeros(),
        b: Vec3::x(),
        c: Vec3::y(),
    }]);
    mesh.normals.pop();
    mesh.assert_consistent();
}
