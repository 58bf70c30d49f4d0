mod mesh_tests;

use crate::{coords::GridMetrics, generator::DensityField};

pub(crate) fn metrics(points_per_chunk: usize) -> GridMetrics {
    GridMetrics {
        points_per_chunk,
        distance: 1.0,
    }
}

/// Samples below `iso_level` for `z < k` and at or above it from `z = k`
/// up, crossing exactly at height `k`.
pub(crate) fn layered_field(points_per_chunk: usize, iso_level: f32, k: usize) -> DensityField {
    DensityField::from_fn(metrics(points_per_chunk), |_, _, z| iso_level + (z as f32 - k as f32))
}
