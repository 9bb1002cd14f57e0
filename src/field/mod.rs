//! Gravitational curvature of the grid and how it is shaded.

pub mod color_scheme;
pub mod curvature;

pub use color_scheme::ColorScheme;
pub use curvature::{
    FieldSample, color_mix_factor, displaced_height, evaluate, source_curvature, surface_color,
    total_curvature, wave,
};
