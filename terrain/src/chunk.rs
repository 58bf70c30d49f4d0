// src/chunk.rs

use log::debug;

use crate::{
    config::TerrainConfig,
    coords::{ChunkCoords, GridMetrics, Vec3},
    generator::{ChunkMesh, DensityField, MeshBuilder, NoiseSampler, Triangle, Triangulator},
};

/// One cube of terrain: its density samples and the mesh derived from them.
///
/// Lifecycle is explicit: `new` → `generate` → `build`, then any number of
/// edits followed by `rebuild`. Nothing happens per frame.
#[derive(Clone, Debug)]
pub struct Chunk {
    coords: ChunkCoords,
    config: TerrainConfig,
    field: DensityField,
    mesh: ChunkMesh,
}

impl Chunk {
    pub fn new(coords: ChunkCoords, config: &TerrainConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            coords,
            field: DensityField::new(config.grid),
            mesh: ChunkMesh::default(),
            config: config.clone(),
        })
    }

    /// Wraps an existing field. The field must use the config's grid metrics.
    pub fn with_field(coords: ChunkCoords, config: &TerrainConfig, field: DensityField) -> Result<Self, String> {
        config.validate()?;
        if *field.metrics() != config.grid {
            return Err(format!(
                "density field metrics {:?} do not match config {:?}",
                field.metrics(),
                config.grid
            ));
        }
        Ok(Self {
            coords,
            field,
            mesh: ChunkMesh::default(),
            config: config.clone(),
        })
    }

    pub fn coords(&self) -> ChunkCoords {
        self.coords
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.config.grid
    }

    /// World-space position of sample `(0, 0, 0)`.
    pub fn origin(&self) -> Vec3 {
        self.coords.origin(&self.config.grid)
    }

    /// World-space `(min, max)` corners of the chunk's bounds.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let min = self.origin();
        let span = self.config.grid.chunk_span();
        (min, min + Vec3::new(span, span, span))
    }

    pub fn contains(&self, world: &Vec3) -> bool {
        let (min, max) = self.bounds();
        (0..3).all(|i| world[i] >= min[i] && world[i] <= max[i])
    }

    pub fn to_local(&self, world: &Vec3) -> Vec3 {
        world - self.origin()
    }

    pub fn field(&self) -> &DensityField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut DensityField {
        &mut self.field
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut ChunkMesh {
        &mut self.mesh
    }

    pub fn triangulator(&self) -> Triangulator {
        Triangulator::new(self.config.iso_level)
    }

    /// Overwrites the whole density field from noise.
    pub fn generate(&mut self) {
        NoiseSampler::new(&self.config.noise, &self.config.grid).generate(&mut self.field, self.coords);
    }

    /// Marches every interior cell. Triangles are in grid units.
    pub fn triangulate(&self) -> Vec<Triangle> {
        let triangulator = self.triangulator();
        #[cfg(feature = "parallel")]
        let triangles = triangulator.triangulate_parallel(&self.field);
        #[cfg(not(feature = "parallel"))]
        let triangles = triangulator.triangulate(&self.field);
        triangles
    }

    /// Replaces the mesh with one assembled from the current field.
    pub fn build(&mut self) {
        let triangles = self.triangulate();
        self.mesh = MeshBuilder::new(self.config.grid).build(&triangles);

        debug!(
            "Chunk ({}, {}) meshed: {} triangles",
            self.coords.x,
            self.coords.y,
            self.mesh.triangle_count()
        );
    }

    /// Full re-march after the field changed.
    pub fn rebuild(&mut self) {
        self.build();
    }
}
