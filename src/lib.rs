pub mod config;
pub mod core;
pub mod fall;
pub mod field;
pub mod math;
pub mod orbit;
pub mod render;
pub mod scene;
pub mod surface;

// Public re-exports for clean API
pub use config::{ConfigError, FallParams, SceneParams, VisualizationType};
pub use crate::core::{MassSource, MassSourceSet, SimulationClock};
pub use fall::{FallMetrics, FallPhase, FreeFallIntegrator, InfallDemo};
pub use field::ColorScheme;
pub use orbit::{OrbitingBody, OrbitingBodyController};
pub use render::{LiveMetrics, SpacetimePlugin};
pub use scene::{
    Completion, FrameReport, MetricsLog, SceneCommand, SceneCommands, SceneCompositor,
    SceneObserver,
};
pub use surface::DeformableGridSurface;
