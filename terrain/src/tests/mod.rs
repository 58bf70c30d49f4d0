mod terraform_tests;

use crate::{
    config::{NoiseSettings, TerrainConfig},
    coords::GridMetrics,
};

/// Small chunks with a gentle noise term, so every column crosses the
/// iso level somewhere above the hard floor.
pub(crate) fn small_config() -> TerrainConfig {
    TerrainConfig {
        grid: GridMetrics {
            points_per_chunk: 8,
            distance: 1.0,
        },
        noise: NoiseSettings {
            amplitude: 1.0,
            ..NoiseSettings::default()
        },
        ..TerrainConfig::default()
    }
}
