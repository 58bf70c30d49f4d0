// src/placement.rs

use std::collections::BTreeMap;

use log::{debug, info};

use crate::{
    chunk::Chunk,
    config::TerrainConfig,
    coords::{ChunkCoords, Vec3},
    terraform::{BrushStroke, SculptMode, TerraformEditor},
};

/// Result of the caller's collision query against the terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainHit {
    pub chunk: ChunkCoords,
    pub point: Vec3,
    pub normal: Vec3,
}

/// A square of chunks laid out edge to edge around the world origin.
pub struct ChunkGrid {
    config: TerrainConfig,
    chunks: BTreeMap<ChunkCoords, Chunk>,
}

impl ChunkGrid {
    /// Places `(2·radius + 1)²` chunks with offsets `-radius..=radius` on
    /// both axes, then generates and meshes each exactly once.
    pub fn spawn(config: &TerrainConfig, radius: u32) -> Result<Self, String> {
        config.validate()?;

        let r = radius as i32;
        let mut chunks = BTreeMap::new();
        for x in -r..=r {
            for y in -r..=r {
                let coords = ChunkCoords::new(x, y);
                let mut chunk = Chunk::new(coords, config)?;
                chunk.generate();
                chunk.build();
                chunks.insert(coords, chunk);
            }
        }

        let grid = Self {
            config: config.clone(),
            chunks,
        };
        info!(
            "Spawned {} chunks ({} triangles total), span {}",
            grid.len(),
            grid.triangle_count(),
            config.grid.chunk_span()
        );
        Ok(grid)
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, coords: ChunkCoords) -> Option<&Chunk> {
        self.chunks.get(&coords)
    }

    pub fn get_mut(&mut self, coords: ChunkCoords) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coords)
    }

    /// Chunks ordered by offset, x first.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn triangle_count(&self) -> usize {
        self.chunks.values().map(|c| c.mesh().triangle_count()).sum()
    }

    /// The placed chunk whose bounds contain `world`. Points on a shared
    /// face resolve to the chunk with the larger offset.
    pub fn locate(&self, world: &Vec3) -> Option<ChunkCoords> {
        if !world.iter().all(|c| c.is_finite()) {
            return None;
        }
        let span = self.config.grid.chunk_span();
        if world.z < 0.0 || world.z > span {
            return None;
        }
        let coords = ChunkCoords::new((world.x / span).floor() as i32, (world.y / span).floor() as i32);
        if self.chunks.contains_key(&coords) {
            return Some(coords);
        }
        // the far face of the outermost chunks
        self.chunks
            .values()
            .find(|c| c.contains(world))
            .map(|c| c.coords())
    }

    /// Applies `stroke` to the chunk named by `hit`, centred on the hit
    /// point and pushing along the hit normal. A missing hit or an unknown
    /// chunk is ignored. Density strokes are also applied to every other
    /// chunk the brush overlaps so shared boundary samples agree.
    ///
    /// Returns whether anything was edited.
    pub fn terraform(&mut self, hit: Option<TerrainHit>, stroke: &BrushStroke, editor: &TerraformEditor) -> bool {
        let Some(hit) = hit else {
            debug!("Terraform without a hit, ignoring");
            return false;
        };
        let Some(chunk) = self.chunks.get_mut(&hit.chunk) else {
            debug!("Terraform hit unknown chunk ({}, {}), ignoring", hit.chunk.x, hit.chunk.y);
            return false;
        };

        let stroke = stroke.aimed_at(&hit);
        let mut touched = editor.apply(chunk, &stroke);

        if editor.mode() == SculptMode::Density {
            for (coords, neighbour) in self.chunks.iter_mut() {
                if *coords != hit.chunk && brush_overlaps(neighbour, &stroke) {
                    touched += editor.apply(neighbour, &stroke);
                }
            }
        }

        touched > 0
    }
}

fn brush_overlaps(chunk: &Chunk, stroke: &BrushStroke) -> bool {
    let (min, max) = chunk.bounds();
    let p = stroke.impact_point;
    let dist_sq: f32 = (0..3)
        .map(|i| {
            let d = (min[i] - p[i]).max(0.0).max(p[i] - max[i]);
            d * d
        })
        .sum();
    dist_sq <= stroke.brush_radius * stroke.brush_radius
}
