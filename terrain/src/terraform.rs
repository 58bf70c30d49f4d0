// src/terraform.rs

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    chunk::Chunk,
    config::TerrainConfig,
    coords::Vec3,
    generator::{ChunkMesh, DensityField},
    placement::TerrainHit,
};

/// How a stroke changes the terrain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SculptMode {
    /// Add to density samples, then re-march the whole chunk.
    #[default]
    Density,
    /// Push existing mesh vertices along the impact normal and only
    /// recompute normals. The mesh stops matching the density field until
    /// the next full rebuild.
    Vertex,
}

/// A single brush application in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushStroke {
    pub impact_point: Vec3,
    pub impact_normal: Vec3,
    pub brush_radius: f32,
    /// Global multiplier, usually [`TerrainConfig::terraform_strength`].
    pub terraform_strength: f32,
    /// Signed per-stroke strength; the sign picks raise or dig.
    pub direction: f32,
}

impl BrushStroke {
    pub fn new(impact_point: Vec3, impact_normal: Vec3, brush_radius: f32, direction: f32, config: &TerrainConfig) -> Self {
        Self {
            impact_point,
            impact_normal,
            brush_radius,
            terraform_strength: config.terraform_strength,
            direction,
        }
    }

    /// A stroke landing where the collision query hit the terrain.
    pub fn at_hit(hit: &TerrainHit, brush_radius: f32, direction: f32, config: &TerrainConfig) -> Self {
        Self::new(hit.point, hit.normal, brush_radius, direction, config)
    }

    /// The same brush moved to `hit`.
    pub fn aimed_at(&self, hit: &TerrainHit) -> Self {
        Self {
            impact_point: hit.point,
            impact_normal: hit.normal,
            ..*self
        }
    }

    /// Full-strength change at the brush centre.
    pub fn peak(&self) -> f32 {
        self.direction * self.terraform_strength
    }

    fn radius_sq(&self) -> f32 {
        self.brush_radius * self.brush_radius
    }
}

/// Smooth falloff: 1 at the centre, 0 at the rim and beyond.
pub fn brush_influence(dist_sq: f32, radius_sq: f32) -> f32 {
    if radius_sq <= 0.0 {
        return 0.0;
    }
    (1.0 - dist_sq / radius_sq).clamp(0.0, 1.0)
}

/// Applies brush strokes to chunks using one [`SculptMode`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TerraformEditor {
    mode: SculptMode,
}

impl TerraformEditor {
    pub fn new(mode: SculptMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> SculptMode {
        self.mode
    }

    /// Edits `chunk` and brings its mesh up to date. Returns how many
    /// samples or vertices fell inside the brush.
    pub fn apply(&self, chunk: &mut Chunk, stroke: &BrushStroke) -> usize {
        if !(stroke.brush_radius > 0.0) {
            debug!("Ignoring stroke with non-positive radius {}", stroke.brush_radius);
            return 0;
        }

        let origin = chunk.origin();
        trace!(
            "{:?} stroke at {:?} r={} on chunk ({}, {})",
            self.mode,
            stroke.impact_point,
            stroke.brush_radius,
            chunk.coords().x,
            chunk.coords().y
        );

        match self.mode {
            SculptMode::Density => {
                let touched = sculpt_density(chunk.field_mut(), origin, stroke);
                if touched > 0 {
                    chunk.rebuild();
                }
                touched
            }
            SculptMode::Vertex => {
                let local_impact = chunk.to_local(&stroke.impact_point);
                sculpt_vertices(chunk.mesh_mut(), local_impact, stroke)
            }
        }
    }
}

/// Adds `direction · influence · terraform_strength` to every sample
/// within the brush. `origin` is the field's world position.
pub fn sculpt_density(field: &mut DensityField, origin: Vec3, stroke: &BrushStroke) -> usize {
    let radius_sq = stroke.radius_sq();
    let peak = stroke.peak();
    let metrics = *field.metrics();
    let mut touched = 0;

    for (i, value) in field.values_mut().iter_mut().enumerate() {
        let (x, y, z) = metrics.coord(i);
        let world = origin + metrics.local_position(x, y, z);
        let dist_sq = (world - stroke.impact_point).norm_squared();
        if dist_sq > radius_sq {
            continue;
        }
        *value += peak * brush_influence(dist_sq, radius_sq);
        touched += 1;
    }
    touched
}

/// Moves vertices within the brush along the impact normal, then
/// recomputes normals. Indices are left alone. `local_impact` is the
/// stroke's impact point in the mesh's chunk-local space.
pub fn sculpt_vertices(mesh: &mut ChunkMesh, local_impact: Vec3, stroke: &BrushStroke) -> usize {
    let radius_sq = stroke.radius_sq();
    let peak = stroke.peak();
    let normal = stroke.impact_normal.try_normalize(0.0).unwrap_or_else(Vec3::zeros);
    let mut touched = 0;

    for vertex in mesh.vertices.iter_mut() {
        let dist_sq = (*vertex - local_impact).norm_squared();
        if dist_sq > radius_sq {
            continue;
        }
        *vertex += normal * (brush_influence(dist_sq, radius_sq) * peak);
        touched += 1;
    }

    if touched > 0 {
        mesh.recompute_normals();
        mesh.assert_consistent();
    }
    touched
}
