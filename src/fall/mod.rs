//! Dropped bodies: the free-fall integrator and the scripted infall demo.

pub mod infall;
pub mod integrator;

pub use infall::InfallDemo;
pub use integrator::{
    BodyStep, FallMetrics, FallPhase, FallingBody, FreeFallIntegrator, StepReport,
    net_acceleration, step_body, wind_acceleration,
};
