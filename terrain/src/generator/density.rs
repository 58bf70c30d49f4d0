use log::debug;
use noise::{MultiFractal, NoiseFn, OpenSimplex, RidgedMulti};

use crate::{
    config::NoiseSettings,
    coords::{ChunkCoords, GridMetrics},
};

/// Weight added to every sample below the hard floor.
const HARD_FLOOR_WEIGHT: f32 = 40.0;
/// How quickly the hard floor ramps from nothing to full weight.
const HARD_FLOOR_SHARPNESS: f32 = 3.0;

/// Scalar samples of one chunk, `P³` of them, laid out x-fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityField {
    metrics: GridMetrics,
    data: Vec<f32>,
}

impl DensityField {
    /// A zeroed field.
    pub fn new(metrics: GridMetrics) -> Self {
        Self {
            data: vec![0.0; metrics.point_count()],
            metrics,
        }
    }

    pub fn from_fn(metrics: GridMetrics, f: impl FnMut(usize, usize, usize) -> f32) -> Self {
        let mut field = Self::new(metrics);
        field.fill_with(f);
        field
    }

    /// Overwrites every sample with `f(x, y, z)`.
    pub fn fill_with(&mut self, mut f: impl FnMut(usize, usize, usize) -> f32) {
        let metrics = self.metrics;
        for (i, value) in self.data.iter_mut().enumerate() {
            let (x, y, z) = metrics.coord(i);
            *value = f(x, y, z);
        }
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[self.metrics.index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f32) {
        let i = self.metrics.index(x, y, z);
        self.data[i] = value;
    }

    #[inline]
    pub fn add(&mut self, x: usize, y: usize, z: usize, delta: f32) {
        let i = self.metrics.index(x, y, z);
        self.data[i] += delta;
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Mutable samples in index order. The length cannot change.
    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

/// Ridged fractal noise plus the deterministic shaping terms.
///
/// Cheap to build, so a fresh sampler is made for every generation pass
/// instead of being kept alive on the chunk.
pub struct NoiseSampler {
    noise: RidgedMulti<OpenSimplex>,
    amplitude: f32,
    ground_height: f32,
    hard_floor_z: f32,
    terrace_height: u32,
}

impl NoiseSampler {
    pub fn new(settings: &NoiseSettings, metrics: &GridMetrics) -> Self {
        let noise = RidgedMulti::<OpenSimplex>::new(settings.seed)
            .set_frequency(settings.frequency)
            .set_octaves(settings.octaves);

        Self {
            noise,
            amplitude: settings.amplitude,
            ground_height: settings.ground_percent * metrics.points_per_chunk as f32,
            hard_floor_z: settings.hard_floor_z,
            terrace_height: settings.terrace_height.max(1),
        }
    }

    /// Baseline horizontal surface: positive below `ground_percent·P`, negative above.
    pub fn ground(&self, z: usize) -> f32 {
        -(z as f32) + self.ground_height
    }

    pub fn hard_floor(&self, z: usize) -> f32 {
        ((self.hard_floor_z - z as f32) * HARD_FLOOR_SHARPNESS).clamp(0.0, 1.0) * HARD_FLOOR_WEIGHT
    }

    pub fn terrace(&self, z: usize) -> f32 {
        (z as u32 % self.terrace_height) as f32
    }

    /// Raw ridged noise at a point in sample space, scaled by the amplitude.
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f32 {
        self.noise.get([x, y, z]) as f32 * self.amplitude
    }

    /// Density of local sample `(x, y, z)` in a chunk whose sample-space
    /// offset is `offset`.
    pub fn sample(&self, x: usize, y: usize, z: usize, offset: (f64, f64)) -> f32 {
        let n = self.noise(x as f64 + offset.0, y as f64 + offset.1, z as f64);
        self.ground(z) + n + self.hard_floor(z) + self.terrace(z)
    }

    /// Overwrites the whole field with the density of the chunk at `coords`.
    pub fn generate(&self, field: &mut DensityField, coords: ChunkCoords) {
        let offset = coords.sample_offset(field.metrics());
        field.fill_with(|x, y, z| self.sample(x, y, z, offset));

        debug!(
            "Generated density for chunk ({}, {}): {} samples",
            coords.x,
            coords.y,
            field.len()
        );
    }
}
