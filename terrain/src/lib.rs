// src/lib.rs

//! Chunked marching-cubes terrain.
//!
//! A [`Chunk`](chunk::Chunk) samples layered noise into a density field,
//! marches it into a triangle soup and assembles render buffers from it.
//! [`TerraformEditor`](terraform::TerraformEditor) reshapes the terrain with
//! a spherical brush, and [`ChunkGrid`](placement::ChunkGrid) lays chunks
//! out edge to edge.

pub mod chunk;
pub mod config;
pub mod coords;
pub mod generator;
pub mod placement;
pub mod prelude;
pub mod terraform;

#[cfg(test)]
mod tests;
