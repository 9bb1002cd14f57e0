pub mod compositor;

pub use crate::fall::FallMetrics;
pub use compositor::{
    Completion, FrameReport, MetricsLog, SceneCommand, SceneCommands, SceneCompositor,
    SceneObserver,
};
