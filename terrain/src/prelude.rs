// src/prelude.rs
//! A convenient prelude re-exporting common terrain types.

pub use crate::chunk::Chunk;
pub use crate::config::{NoiseSettings, TerrainConfig};
pub use crate::coords::{ChunkCoords, GridMetrics, Vec3};
pub use crate::generator::{ChunkMesh, DensityField, MeshBuilder, NoiseSampler, Triangle, Triangulator};
pub use crate::placement::{ChunkGrid, TerrainHit};
pub use crate::terraform::{BrushStroke, SculptMode, TerraformEditor};
