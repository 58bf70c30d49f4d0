use crate::{
    coords::Vec3,
    generator::{
        density::DensityField,
        tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE},
    },
};

/// Corner values closer than this are treated as equal when interpolating.
const DEGENERATE_EPSILON: f32 = f32::EPSILON;

/// One triangle in grid units, corners in table order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

/// Stateless marching cubes over a [`DensityField`].
#[derive(Clone, Copy, Debug)]
pub struct Triangulator {
    iso_level: f32,
}

impl Triangulator {
    pub fn new(iso_level: f32) -> Self {
        Self { iso_level }
    }

    pub fn iso_level(&self) -> f32 {
        self.iso_level
    }

    /// Bit `i` is set when corner `i` lies below the iso level.
    pub fn case_index(&self, corners: &[f32; 8]) -> u8 {
        let mut case = 0u8;
        for (i, &value) in corners.iter().enumerate() {
            if value < self.iso_level {
                case |= 1 << i;
            }
        }
        case
    }

    /// Triangles the table emits for `case`, between 0 and 5.
    pub fn triangle_count(case: u8) -> usize {
        TRI_TABLE[case as usize].iter().take_while(|&&e| e >= 0).count() / 3
    }

    /// The 8 corner samples of cell `(x, y, z)` in table order.
    pub fn corner_values(field: &DensityField, x: usize, y: usize, z: usize) -> [f32; 8] {
        let mut corners = [0.0; 8];
        for (value, offset) in corners.iter_mut().zip(CORNER_OFFSETS.iter()) {
            *value = field.get(x + offset[0], y + offset[1], z + offset[2]);
        }
        corners
    }

    /// Triangulates a single cell from its corner values. `origin` is the
    /// cell's minimum corner in grid units. Returns how many triangles were pushed.
    pub fn march_corners(&self, corners: &[f32; 8], origin: Vec3, out: &mut Vec<Triangle>) -> usize {
        let case = self.case_index(corners) as usize;
        let crossed = EDGE_TABLE[case];
        if crossed == 0 {
            return 0;
        }

        let mut edge_points = [Vec3::zeros(); 12];
        for (edge, point) in edge_points.iter_mut().enumerate() {
            if crossed & (1 << edge) == 0 {
                continue;
            }
            let [c1, c2] = EDGE_CORNERS[edge];
            *point = interpolate_vertex(
                origin + corner_offset(c1),
                corners[c1],
                origin + corner_offset(c2),
                corners[c2],
                self.iso_level,
            );
        }

        let before = out.len();
        for tri in TRI_TABLE[case].chunks_exact(3).take_while(|t| t[0] >= 0) {
            out.push(Triangle {
                a: edge_points[tri[0] as usize],
                b: edge_points[tri[1] as usize],
                c: edge_points[tri[2] as usize],
            });
        }
        out.len() - before
    }

    /// Triangulates cell `(x, y, z)` of `field`.
    ///
    /// Cells touching the far boundary have no upper neighbour to sample
    /// and yield nothing.
    pub fn march(&self, field: &DensityField, x: usize, y: usize, z: usize) -> Vec<Triangle> {
        let mut out = Vec::new();
        self.march_into(field, x, y, z, &mut out);
        out
    }

    fn march_into(&self, field: &DensityField, x: usize, y: usize, z: usize, out: &mut Vec<Triangle>) -> usize {
        let cells = field.metrics().cells_per_axis();
        if x >= cells || y >= cells || z >= cells {
            return 0;
        }
        let corners = Self::corner_values(field, x, y, z);
        self.march_corners(&corners, Vec3::new(x as f32, y as f32, z as f32), out)
    }

    fn march_slab(&self, field: &DensityField, z: usize, out: &mut Vec<Triangle>) {
        let cells = field.metrics().cells_per_axis();
        for y in 0..cells {
            for x in 0..cells {
                self.march_into(field, x, y, z, out);
            }
        }
    }

    /// Triangle soup for every interior cell, z-slab by z-slab, x fastest.
    pub fn triangulate(&self, field: &DensityField) -> Vec<Triangle> {
        let mut out = Vec::new();
        for z in 0..field.metrics().cells_per_axis() {
            self.march_slab(field, z, &mut out);
        }
        out
    }

    /// Same output as [`Triangulator::triangulate`], with slabs marched on
    /// the rayon pool and stitched back together in slab order.
    #[cfg(feature = "parallel")]
    pub fn triangulate_parallel(&self, field: &DensityField) -> Vec<Triangle> {
        use rayon::prelude::*;

        (0..field.metrics().cells_per_axis())
            .into_par_iter()
            .map(|z| {
                let mut slab = Vec::new();
                self.march_slab(field, z, &mut slab);
                slab
            })
            .collect::<Vec<_>>()
            .concat()
    }
}

fn corner_offset(corner: usize) -> Vec3 {
    let [dx, dy, dz] = CORNER_OFFSETS[corner];
    Vec3::new(dx as f32, dy as f32, dz as f32)
}

/// Point where the surface crosses the edge `e1 → e2`.
///
/// When the two values are (nearly) equal the crossing is undefined; the
/// edge midpoint is returned instead of dividing by zero. The parameter is
/// clamped so the result never leaves the edge.
pub fn interpolate_vertex(e1: Vec3, v1: f32, e2: Vec3, v2: f32, iso_level: f32) -> Vec3 {
    let dv = v2 - v1;
    if dv.abs() <= DEGENERATE_EPSILON {
        return e1 + (e2 - e1) * 0.5;
    }
    let t = ((iso_level - v1) / dv).clamp(0.0, 1.0);
    e1 + (e2 - e1) * t
}
