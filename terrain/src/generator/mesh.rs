use log::debug;
use nalgebra::Vector2;

use crate::{
    coords::{GridMetrics, Vec3},
    generator::march::Triangle,
};

pub type Uv = Vector2<f32>;

/// Render-ready geometry of one chunk, in chunk-local world units.
///
/// Every triangle owns three fresh vertices; nothing is welded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub vertices: Vec<Vec3>,
    /// One reversed triple `(c, b, a)` per triangle.
    pub indices: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Uv>,
}

/// Flattened buffers in the layout the renderer uploads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Re-averages normals from the current vertex positions, keeping topology.
    pub fn recompute_normals(&mut self) {
        self.normals = average_normals(&self.vertices, &self.indices);
    }

    /// Panics if the buffers disagree with each other. A mismatch means the
    /// assembly and its consumers no longer share a contract.
    pub fn assert_consistent(&self) {
        assert_eq!(self.indices.len() % 3, 0, "index buffer is not a list of triangles");
        assert_eq!(
            self.normals.len(),
            self.vertices.len(),
            "normal buffer does not match vertex buffer"
        );
        assert_eq!(self.uvs.len(), self.vertices.len(), "uv buffer does not match vertex buffer");
        let count = self.vertices.len();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            panic!("index {bad} out of range for {count} vertices");
        }
    }

    pub fn to_buffers(&self) -> MeshBuffers {
        MeshBuffers {
            vertices: self.vertices.iter().flat_map(|v| [v.x, v.y, v.z]).collect(),
            normals: self.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect(),
            uvs: self.uvs.iter().flat_map(|uv| [uv.x, uv.y]).collect(),
            indices: self.indices.clone(),
        }
    }
}

/// Turns a triangle soup into a [`ChunkMesh`].
pub struct MeshBuilder {
    metrics: GridMetrics,
}

impl MeshBuilder {
    pub fn new(metrics: GridMetrics) -> Self {
        Self { metrics }
    }

    pub fn build(&self, triangles: &[Triangle]) -> ChunkMesh {
        let distance = self.metrics.distance;
        let span = self.metrics.chunk_span();

        let mut vertices = Vec::with_capacity(triangles.len() * 3);
        let mut indices = Vec::with_capacity(triangles.len() * 3);

        for tri in triangles {
            let base = vertices.len() as u32;
            vertices.extend([tri.a * distance, tri.b * distance, tri.c * distance]);
            // table winding faces the side below the iso level, flip it
            indices.extend([base + 2, base + 1, base]);
        }

        let normals = average_normals(&vertices, &indices);

        // planar projection onto the chunk's grid columns
        let uvs = vertices.iter().map(|v| Uv::new(v.x / span, v.y / span)).collect();

        let mesh = ChunkMesh {
            vertices,
            indices,
            normals,
            uvs,
        };
        mesh.assert_consistent();

        debug!(
            "Built mesh with {} vertices and {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        mesh
    }
}

/// Face normals accumulated per vertex, then normalized. Vertices no
/// triangle touches, or only degenerate ones, end up as the zero vector.
pub fn average_normals(vertices: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::zeros(); vertices.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (vertices[i1] - vertices[i0]).cross(&(vertices[i2] - vertices[i0]));
        let face = normalize_or_zero(face);
        acc[i0] += face;
        acc[i1] += face;
        acc[i2] += face;
    }

    acc.into_iter().map(normalize_or_zero).collect()
}

fn normalize_or_zero(v: Vec3) -> Vec3 {
    v.try_normalize(0.0).unwrap_or_else(Vec3::zeros)
}
