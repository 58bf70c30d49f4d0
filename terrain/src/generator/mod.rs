mod density;
mod march;
mod mesh;
pub mod tables;

pub use density::{DensityField, NoiseSampler};
pub use march::{interpolate_vertex, Triangle, Triangulator};
pub use mesh::{average_normals, ChunkMesh, MeshBuffers, MeshBuilder, Uv};

#[cfg(test)]
mod tests;
