pub mod grid_surface;

pub use grid_surface::{DeformableGridSurface, SurfaceChange, SurfaceConfig, SurfaceSample};
