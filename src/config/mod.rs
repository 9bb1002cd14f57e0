//! Configuration and parameters
//!
//! Tuning constants, the scene and drop parameter resources, and the error
//! type for name lookups.

pub mod constants;
pub mod error;
pub mod fall_params;
pub mod scene_params;

pub use constants::*;
pub use error::ConfigError;
pub use fall_params::*;
pub use scene_params::*;

use bevy::prelude::*;

use crate::math::{Real, clamp_finite};

/// Clamp a user-supplied value, logging when it had to be changed.
pub(crate) fn clamp_logged(name: &str, value: Real, min: Real, max: Real, fallback: Real) -> Real {
    let clamped = clamp_finite(value, min, max, fallback);
    if clamped != value {
        warn!("{name} {value} outside [{min}, {max}], using {clamped}");
    }
    clamped
}
