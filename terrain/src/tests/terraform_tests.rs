use crate::{
    chunk::Chunk,
    config::TerrainConfig,
    coords::{ChunkCoords, GridMetrics, Vec3},
    generator::DensityField,
    terraform::{brush_influence, sculpt_density, BrushStroke, SculptMode, TerraformEditor},
};
use approx::assert_relative_eq;
use test_case::test_case;

use super::small_config;

const ISO: f32 = 0.5;

fn stroke(point: Vec3, radius: f32, direction: f32) -> BrushStroke {
    BrushStroke {
        impact_point: point,
        impact_normal: Vec3::z(),
        brush_radius: radius,
        terraform_strength: 1.0,
        direction,
    }
}

fn flat_config(points_per_chunk: usize) -> TerrainConfig {
    TerrainConfig {
        grid: GridMetrics {
            points_per_chunk,
            distance: 1.0,
        },
        iso_level: ISO,
        ..small_config()
    }
}

/// A built chunk whose surface is the plane `z = k`.
fn flat_chunk(points_per_chunk: usize, k: usize) -> Chunk {
    let config = flat_config(points_per_chunk);
    let field = DensityField::from_fn(config.grid, |_, _, z| ISO + (z as f32 - k as f32));
    let mut chunk = Chunk::with_field(ChunkCoords::new(0, 0), &config, field).unwrap();
    chunk.build();
    chunk
}

#[test_case(0.0, 4.0, 1.0 ; "centre")]
#[test_case(1.0, 4.0, 0.75 ; "inside")]
#[test_case(4.0, 4.0, 0.0 ; "rim")]
#[test_case(9.0, 4.0, 0.0 ; "outside")]
#[test_case(1.0, 0.0, 0.0 ; "zero radius")]
fn test_brush_influence(dist_sq: f32, radius_sq: f32, expected: f32) {
    assert_relative_eq!(brush_influence(dist_sq, radius_sq), expected);
}

#[test]
fn test_density_falloff() {
    let metrics = GridMetrics {
        points_per_chunk: 5,
        distance: 1.0,
    };
    let mut field = DensityField::new(metrics);
    let mut s = stroke(Vec3::new(2.0, 2.0, 2.0), 1.5, 1.0);
    s.terraform_strength = 2.0;

    let touched = sculpt_density(&mut field, Vec3::zeros(), &s);

    // samples at squared distance 0, 1 and 2 fall inside 1.5²
    assert_eq!(touched, 1 + 6 + 12);
    assert_relative_eq!(field.get(2, 2, 2), 2.0);
    assert_relative_eq!(field.get(3, 2, 2), 2.0 * (1.0 - 1.0 / 2.25), epsilon = 1e-6);
    assert_relative_eq!(field.get(3, 3, 2), 2.0 * (1.0 - 2.0 / 2.25), epsilon = 1e-6);
    assert_eq!(field.get(3, 3, 3), 0.0, "Samples outside the brush must be untouched");
    assert_eq!(field.get(0, 0, 0), 0.0);
}

#[test]
fn test_density_rim_adds_nothing() {
    let metrics = GridMetrics {
        points_per_chunk: 5,
        distance: 1.0,
    };
    let mut field = DensityField::from_fn(metrics, |x, y, z| (x + y + z) as f32);
    let before = field.clone();

    sculpt_density(&mut field, Vec3::zeros(), &stroke(Vec3::new(2.0, 2.0, 2.0), 1.0, -3.0));

    assert_relative_eq!(field.get(2, 2, 2), before.get(2, 2, 2) - 3.0);
    for (x, y, z) in [(1, 2, 2), (3, 2, 2), (2, 1, 2), (2, 3, 2), (2, 2, 1), (2, 2, 3)] {
        assert_eq!(field.get(x, y, z), before.get(x, y, z), "rim sample ({x}, {y}, {z}) changed");
    }
}

#[test]
fn test_density_uses_world_position() {
    let metrics = GridMetrics {
        points_per_chunk: 4,
        distance: 2.0,
    };
    let mut field = DensityField::new(metrics);
    let origin = Vec3::new(10.0, -6.0, 0.0);

    // sample (1, 2, 1) sits at origin + (2, 4, 2)
    let touched = sculpt_density(&mut field, origin, &stroke(Vec3::new(12.0, -2.0, 2.0), 0.5, 1.0));
    assert_eq!(touched, 1);
    assert_relative_eq!(field.get(1, 2, 1), 1.0);
}

#[test]
fn test_density_mode_rebuilds_mesh() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut chunk = flat_chunk(6, 3);
    let before = chunk.mesh().clone();
    let editor = TerraformEditor::new(SculptMode::Density);

    let touched = editor.apply(&mut chunk, &stroke(Vec3::new(2.5, 2.5, 3.0), 2.0, -2.0));

    assert!(touched > 0);
    assert_ne!(*chunk.mesh(), before, "Mesh should follow the edited field");
    assert!(chunk.field().get(2, 2, 3) < ISO);
    assert!(
        chunk.mesh().vertices.iter().any(|v| v.z > 3.0),
        "Lowering density should lift the surface locally"
    );

    let mut rebuilt = chunk.clone();
    rebuilt.rebuild();
    assert_eq!(rebuilt.mesh(), chunk.mesh());
}

#[test]
fn test_vertex_mode_displaces_along_normal() {
    let mut chunk = flat_chunk(6, 3);
    let before = chunk.clone();
    let editor = TerraformEditor::new(SculptMode::Vertex);

    let touched = editor.apply(&mut chunk, &stroke(Vec3::new(2.0, 2.0, 3.0), 1.5, 1.0));
    assert!(touched > 0);

    let mesh = chunk.mesh();
    assert_eq!(mesh.indices, before.mesh().indices, "Topology must not change");
    assert_eq!(mesh.vertices.len(), before.mesh().vertices.len());
    assert_eq!(chunk.field(), before.field(), "Vertex sculpting leaves the field alone");

    for (old, new) in before.mesh().vertices.iter().zip(&mesh.vertices) {
        assert_eq!(old.x, new.x);
        assert_eq!(old.y, new.y);
        let dist_sq = (old - Vec3::new(2.0, 2.0, 3.0)).norm_squared();
        let expected = 3.0 + brush_influence(dist_sq, 2.25);
        assert_relative_eq!(new.z, expected, epsilon = 1e-6);
    }

    for n in &mesh.normals {
        let len = n.norm();
        assert!(len == 0.0 || (len - 1.0).abs() < 1e-5);
    }
    assert!(mesh.normals.iter().any(|n| (n - Vec3::z()).norm() > 1e-3), "Normals should be recomputed");
}

#[test]
fn test_vertex_mode_diverges_until_rebuild() {
    let mut chunk = flat_chunk(5, 2);
    let pristine = chunk.mesh().clone();

    TerraformEditor::new(SculptMode::Vertex).apply(&mut chunk, &stroke(Vec3::new(2.0, 2.0, 2.0), 1.0, 0.5));
    assert_ne!(*chunk.mesh(), pristine);

    chunk.rebuild();
    assert_eq!(*chunk.mesh(), pristine);
}

#[test]
fn test_vertex_mode_uses_chunk_local_space() {
    let config = flat_config(5);
    let field = DensityField::from_fn(config.grid, |_, _, z| ISO + (z as f32 - 2.0));
    let mut chunk = Chunk::with_field(ChunkCoords::new(1, 0), &config, field).unwrap();
    chunk.build();
    let before = chunk.mesh().clone();

    // world x = 4 + 1 lands on local x = 1
    let editor = TerraformEditor::new(SculptMode::Vertex);
    editor.apply(&mut chunk, &stroke(Vec3::new(5.0, 1.0, 2.0), 0.1, 1.0));

    for (old, new) in before.vertices.iter().zip(&chunk.mesh().vertices) {
        if *old == Vec3::new(1.0, 1.0, 2.0) {
            assert_relative_eq!(new.z, 3.0);
        } else {
            assert_eq!(old, new);
        }
    }
}

#[test_case(SculptMode::Density)]
#[test_case(SculptMode::Vertex)]
fn test_zero_radius_is_noop(mode: SculptMode) {
    let mut chunk = flat_chunk(5, 2);
    let before = chunk.clone();

    let touched = TerraformEditor::new(mode).apply(&mut chunk, &stroke(Vec3::new(2.0, 2.0, 2.0), 0.0, 5.0));
    assert_eq!(touched, 0);
    assert_eq!(chunk.field(), before.field());
    assert_eq!(chunk.mesh(), before.mesh());
}

#[test]
fn test_stroke_takes_global_strength() {
    let mut config = TerrainConfig::default();
    config.terraform_strength = 4.0;
    let s = BrushStroke::new(Vec3::zeros(), Vec3::z(), 10.0, -0.5, &config);
    assert_relative_eq!(s.peak(), -2.0);
}
