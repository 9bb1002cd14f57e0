//! Deformable grid surface
//!
//! A `GRID_EXTENT` x `GRID_EXTENT` plane tessellated into `resolution`
//! segments per axis. Heights and distortion are re-evaluated from the
//! curvature field every frame and kept in row-major matrices (row = z,
//! column = x).

use bevy::asset::RenderAssetUsages;
use bevy::color::{Alpha, ColorToComponents};
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use nalgebra::DMatrix;

use crate::config::{
    GRID_EXTENT, MAX_GRID_FREQUENCY, MAX_GRID_RESOLUTION, MAX_WAVE_AMPLITUDE, MIN_GRID_FREQUENCY,
    MIN_GRID_RESOLUTION, SURFACE_ALPHA, SURFACE_Y_OFFSET, SceneParams,
};
use crate::core::MassSource;
use crate::field::{self, ColorScheme};
use crate::math::{PlanePoint, Real, Vector, clamp_finite, lerp};

/// Lift applied to overlay lines so they do not z-fight the surface.
const LINE_LIFT: Real = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    pub resolution: u32,
    pub grid_frequency: Real,
    pub wave_amplitude: Real,
    pub color_scheme: ColorScheme,
    pub show_grid: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::from_params(&SceneParams::default())
    }
}

impl SurfaceConfig {
    pub fn from_params(params: &SceneParams) -> Self {
        Self {
            resolution: params.grid_resolution,
            grid_frequency: params.grid_frequency,
            wave_amplitude: params.wave_amplitude,
            color_scheme: params.color_scheme,
            show_grid: params.show_grid,
        }
        .sanitized()
    }

    /// Same config with every numeric field forced into its valid range.
    pub fn sanitized(self) -> Self {
        Self {
            resolution: self
                .resolution
                .clamp(MIN_GRID_RESOLUTION, MAX_GRID_RESOLUTION),
            grid_frequency: clamp_finite(
                self.grid_frequency,
                MIN_GRID_FREQUENCY,
                MAX_GRID_FREQUENCY,
                20.0,
            ),
            wave_amplitude: clamp_finite(self.wave_amplitude, 0.0, MAX_WAVE_AMPLITUDE, 0.1),
            ..self
        }
    }
}

/// What a reconfiguration invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceChange {
    #[default]
    Unchanged,
    /// Colors, grid lines or wave settings changed; vertex layout is intact.
    Shading,
    /// Resolution changed; the mesh must be rebuilt.
    Topology,
}

/// One vertex of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub rest_position: PlanePoint,
    pub displaced_height: Real,
    pub distortion: Real,
}

pub struct DeformableGridSurface {
    config: SurfaceConfig,
    heights: DMatrix<Real>,
    distortion: DMatrix<Real>,
}

impl Default for DeformableGridSurface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl DeformableGridSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        let config = config.sanitized();
        let vertices = config.resolution as usize + 1;
        Self {
            config,
            heights: DMatrix::zeros(vertices, vertices),
            distortion: DMatrix::zeros(vertices, vertices),
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn resolution(&self) -> u32 {
        self.config.resolution
    }

    /// Vertices per axis.
    pub fn vertices_per_axis(&self) -> usize {
        self.heights.nrows()
    }

    pub fn vertex_count(&self) -> usize {
        self.heights.len()
    }

    /// Apply a new configuration. The simulation clock is not touched.
    pub fn configure(&mut self, config: SurfaceConfig) -> SurfaceChange {
        let config = config.sanitized();
        if config == self.config {
            return SurfaceChange::Unchanged;
        }
        let change = if config.resolution != self.config.resolution {
            let vertices = config.resolution as usize + 1;
            self.heights = DMatrix::zeros(vertices, vertices);
            self.distortion = DMatrix::zeros(vertices, vertices);
            debug!("surface rebuilt at {} segments", config.resolution);
            SurfaceChange::Topology
        } else {
            SurfaceChange::Shading
        };
        self.config = config;
        change
    }

    /// Rest position of vertex (`row`, `col`) on the plane.
    #[inline]
    pub fn rest_position(&self, row: usize, col: usize) -> PlanePoint {
        let segments = self.config.resolution as Real;
        let half = GRID_EXTENT * 0.5;
        Vec2::new(
            -half + GRID_EXTENT * col as Real / segments,
            -half + GRID_EXTENT * row as Real / segments,
        )
    }

    #[inline]
    pub fn uv(&self, row: usize, col: usize) -> Vec2 {
        let segments = self.config.resolution as Real;
        Vec2::new(col as Real / segments, 1.0 - row as Real / segments)
    }

    /// Re-evaluate every vertex against the current sources.
    pub fn recompute(&mut self, sources: &[MassSource], time: Real) {
        let n = self.vertices_per_axis();
        let amplitude = self.config.wave_amplitude;
        for row in 0..n {
            for col in 0..n {
                let sample = field::evaluate(self.rest_position(row, col), sources, time, amplitude);
                self.heights[(row, col)] = sample.height;
                self.distortion[(row, col)] = sample.curvature;
            }
        }
    }

    pub fn sample(&self, row: usize, col: usize) -> SurfaceSample {
        SurfaceSample {
            rest_position: self.rest_position(row, col),
            displaced_height: self.heights[(row, col)],
            distortion: self.distortion[(row, col)],
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = SurfaceSample> + '_ {
        let n = self.vertices_per_axis();
        (0..n).flat_map(move |row| (0..n).map(move |col| self.sample(row, col)))
    }

    /// Height in world space, bilinearly interpolated between vertices.
    pub fn world_height_at(&self, point: PlanePoint) -> Real {
        let segments = self.config.resolution as Real;
        let half = GRID_EXTENT * 0.5;
        let fx = ((point.x + half) / GRID_EXTENT * segments).clamp(0.0, segments);
        let fz = ((point.y + half) / GRID_EXTENT * segments).clamp(0.0, segments);
        let last = self.vertices_per_axis() - 1;
        let (c0, r0) = (fx.floor() as usize, fz.floor() as usize);
        let (c1, r1) = ((c0 + 1).min(last), (r0 + 1).min(last));
        let (tx, tz) = (fx - c0 as Real, fz - r0 as Real);
        let near = lerp(self.heights[(r0, c0)], self.heights[(r0, c1)], tx);
        let far = lerp(self.heights[(r1, c0)], self.heights[(r1, c1)], tx);
        SURFACE_Y_OFFSET + lerp(near, far, tz)
    }

    /// Overlay polylines in world space, following the deformed surface.
    /// Lines sit where `fract(uv * frequency) == 0.5`. Empty when the grid is
    /// hidden.
    pub fn grid_lines(&self) -> Vec<Vec<Vector>> {
        if !self.config.show_grid {
            return Vec::new();
        }
        let n = self.vertices_per_axis();
        let line_count = self.config.grid_frequency.floor() as usize;
        let half = GRID_EXTENT * 0.5;
        let mut lines = Vec::with_capacity(line_count * 2);

        for k in 0..line_count {
            let offset = -half + GRID_EXTENT * (k as Real + 0.5) / self.config.grid_frequency;
            // Constant x, running along z.
            lines.push(
                (0..n)
                    .map(|row| {
                        let z = self.rest_position(row, 0).y;
                        let point = Vec2::new(offset, z);
                        Vec3::new(offset, self.world_height_at(point) + LINE_LIFT, z)
                    })
                    .collect(),
            );
            // Constant z, running along x.
            lines.push(
                (0..n)
                    .map(|col| {
                        let x = self.rest_position(0, col).x;
                        let point = Vec2::new(x, offset);
                        Vec3::new(x, self.world_height_at(point) + LINE_LIFT, offset)
                    })
                    .collect(),
            );
        }
        lines
    }

    fn positions(&self) -> Vec<[f32; 3]> {
        self.samples()
            .map(|s| [s.rest_position.x, s.displaced_height, s.rest_position.y])
            .collect()
    }

    fn normals(&self) -> Vec<[f32; 3]> {
        let n = self.vertices_per_axis();
        let spacing = GRID_EXTENT / self.config.resolution as Real;
        let mut normals = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let (c0, c1) = (col.saturating_sub(1), (col + 1).min(n - 1));
                let (r0, r1) = (row.saturating_sub(1), (row + 1).min(n - 1));
                let dx = (self.heights[(row, c1)] - self.heights[(row, c0)])
                    / ((c1 - c0) as Real * spacing);
                let dz = (self.heights[(r1, col)] - self.heights[(r0, col)])
                    / ((r1 - r0) as Real * spacing);
                normals.push(Vec3::new(-dx, 1.0, -dz).normalize_or(Vec3::Y).to_array());
            }
        }
        normals
    }

    fn colors(&self) -> Vec<[f32; 4]> {
        // Grid lines are drawn as overlay polylines, so the sheet stays flat.
        self.distortion
            .transpose()
            .iter()
            .map(|&distortion| {
                field::surface_color(distortion, self.config.color_scheme)
                    .with_alpha(SURFACE_ALPHA)
                    .to_f32_array()
            })
            .collect()
    }

    fn uvs(&self) -> Vec<[f32; 2]> {
        let n = self.vertices_per_axis();
        (0..n)
            .flat_map(|row| (0..n).map(move |col| (row, col)))
            .map(|(row, col)| self.uv(row, col).to_array())
            .collect()
    }

    fn indices(&self) -> Vec<u32> {
        let n = self.vertices_per_axis() as u32;
        let segments = n - 1;
        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
        for row in 0..segments {
            for col in 0..segments {
                let a = row * n + col;
                let b = a + 1;
                let c = a + n;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }
        indices
    }

    /// Fresh mesh for the current configuration and heights.
    pub fn build_mesh(&self) -> Mesh {
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals())
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs())
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, self.colors())
        .with_inserted_indices(Indices::U32(self.indices()))
    }

    /// Refresh the per-frame attributes of a mesh built by [`Self::build_mesh`].
    pub fn update_mesh(&self, mesh: &mut Mesh) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions());
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals());
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, self.colors());
    }
}
