// src/config.rs

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::coords::GridMetrics;

/// Parameters of the layered noise and the shaping terms added on top of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub seed: u32,
    /// Sample spacing fed to the ridged noise; higher is more chaotic.
    pub frequency: f64,
    /// Fractal layers summed per sample.
    pub octaves: usize,
    /// Scale of the noise term, roughly how tall features get.
    pub amplitude: f32,
    /// Height of the baseline surface as a fraction of the chunk height.
    pub ground_percent: f32,
    /// Below this z the density is forced solid.
    pub hard_floor_z: f32,
    /// Period of the stepped banding term.
    pub terrace_height: u32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            seed: 1337,
            frequency: 0.03,
            octaves: 8,
            amplitude: 5.0,
            ground_percent: 0.2,
            hard_floor_z: 1.0,
            terrace_height: 2,
        }
    }
}

/// Everything a chunk needs besides its offset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Density threshold between the two sides of the surface.
    pub iso_level: f32,
    /// Global multiplier applied to every brush stroke.
    pub terraform_strength: f32,
    pub grid: GridMetrics,
    pub noise: NoiseSettings,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            iso_level: 0.5,
            terraform_strength: 1.0,
            grid: GridMetrics::default(),
            noise: NoiseSettings::default(),
        }
    }
}

impl TerrainConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, String> {
        let config: TerrainConfig =
            toml::from_str(src).map_err(|e| format!("invalid terrain config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::from_toml_str(&src)
    }

    pub fn to_toml_string(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("failed to serialize terrain config: {e}"))
    }

    pub fn validate(&self) -> Result<(), String> {
        self.grid.validate()?;

        if !(0.0..=1.0).contains(&self.iso_level) {
            return Err(format!("iso_level must lie in [0, 1], got {}", self.iso_level));
        }
        if !(self.noise.frequency > 0.0) {
            return Err(format!("frequency must be positive, got {}", self.noise.frequency));
        }
        if self.noise.octaves < 1 {
            return Err("octaves must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.noise.ground_percent) {
            return Err(format!(
                "ground_percent must lie in [0, 1], got {}",
                self.noise.ground_percent
            ));
        }
        if self.noise.terrace_height < 1 {
            return Err("terrace_height must be at least 1".to_string());
        }
        if !self.terraform_strength.is_finite() {
            return Err("terraform_strength must be finite".to_string());
        }
        Ok(())
    }
}
