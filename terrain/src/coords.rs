// src/coords.rs

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A 3D vector in chunk-local or world space.
pub type Vec3 = Vector3<f32>;

/// Chunk offsets on the XY plane. Z is up and chunks are never stacked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoords {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoords {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World-space position of this chunk's first sample.
    pub fn origin(&self, metrics: &GridMetrics) -> Vec3 {
        let span = metrics.chunk_span();
        Vec3::new(self.x as f32 * span, self.y as f32 * span, 0.0)
    }

    /// Offset of this chunk in noise-sample units. Neighbouring chunks share
    /// their boundary column, so the stride is `P - 1` rather than `P`.
    pub fn sample_offset(&self, metrics: &GridMetrics) -> (f64, f64) {
        let stride = metrics.cells_per_axis() as f64;
        (self.x as f64 * stride, self.y as f64 * stride)
    }
}

/// Resolution and spacing of one chunk's sample grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridMetrics {
    /// Samples per axis.
    pub points_per_chunk: usize,
    /// World-space spacing between neighbouring samples.
    pub distance: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            points_per_chunk: 32,
            distance: 100.0,
        }
    }
}

impl GridMetrics {
    pub fn new(points_per_chunk: usize, distance: f32) -> Result<Self, String> {
        let metrics = Self { points_per_chunk, distance };
        metrics.validate()?;
        Ok(metrics)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.points_per_chunk < 2 {
            return Err(format!(
                "points_per_chunk must be at least 2, got {}",
                self.points_per_chunk
            ));
        }
        if !(self.distance > 0.0) || !self.distance.is_finite() {
            return Err(format!("distance must be a positive number, got {}", self.distance));
        }
        Ok(())
    }

    /// Total samples in a chunk (`P³`).
    pub fn point_count(&self) -> usize {
        self.points_per_chunk.pow(3)
    }

    /// Marchable cells per axis. The far boundary column is never marched.
    pub fn cells_per_axis(&self) -> usize {
        self.points_per_chunk - 1
    }

    /// World-space edge length of a chunk, also the spacing between chunk origins.
    pub fn chunk_span(&self) -> f32 {
        self.distance * self.cells_per_axis() as f32
    }

    /// Flat index of sample `(x, y, z)`: `x + P·(y + P·z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let p = self.points_per_chunk;
        debug_assert!(x < p && y < p && z < p, "sample ({x}, {y}, {z}) outside a {p}³ grid");
        x + p * (y + p * z)
    }

    /// Inverse of [`GridMetrics::index`].
    pub fn coord(&self, index: usize) -> (usize, usize, usize) {
        let p = self.points_per_chunk;
        (index % p, (index / p) % p, index / (p * p))
    }

    /// Chunk-local position of a sample, scaled by `distance`.
    pub fn local_position(&self, x: usize, y: usize, z: usize) -> Vec3 {
        Vec3::new(x as f32, y as f32, z as f32) * self.distance
    }
}
