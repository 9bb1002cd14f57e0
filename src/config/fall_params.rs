use bevy::prelude::*;

use super::constants::*;
use super::{ConfigError, clamp_logged};
use crate::math::Real;

/// A place to drop things: surface gravity and air density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub name: &'static str,
    pub gravity: Real,
    pub air_density: Real,
}

pub const ENVIRONMENTS: [Environment; 6] = [
    Environment { name: "earth", gravity: 9.80665, air_density: 1.225 },
    Environment { name: "moon", gravity: 1.62, air_density: 0.0 },
    Environment { name: "mars", gravity: 3.71, air_density: 0.020 },
    Environment { name: "jupiter", gravity: 24.79, air_density: 0.16 },
    Environment { name: "venus", gravity: 8.87, air_density: 65.0 },
    Environment { name: "space", gravity: 0.0, air_density: 0.0 },
];

pub fn find_environment(name: &str) -> Result<Environment, ConfigError> {
    let wanted = name.trim().to_ascii_lowercase();
    ENVIRONMENTS
        .iter()
        .find(|env| env.name == wanted)
        .copied()
        .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))
}

/// Aerodynamic profile of the dropped object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectShape {
    pub name: &'static str,
    pub drag_coefficient: Real,
    /// Unscaled; multiplied by [`FRONTAL_AREA_SCALE`] before use.
    pub frontal_area: Real,
}

pub const OBJECT_SHAPES: [ObjectShape; 6] = [
    ObjectShape { name: "sphere", drag_coefficient: 0.47, frontal_area: 1.0 },
    ObjectShape { name: "cube", drag_coefficient: 1.05, frontal_area: 1.0 },
    ObjectShape { name: "teardrop", drag_coefficient: 0.04, frontal_area: 0.5 },
    ObjectShape { name: "parachute", drag_coefficient: 1.35, frontal_area: 28.0 },
    ObjectShape { name: "human", drag_coefficient: 0.7, frontal_area: 0.68 },
    ObjectShape { name: "feather", drag_coefficient: 1.0, frontal_area: 0.1 },
];

pub fn find_shape(name: &str) -> Result<ObjectShape, ConfigError> {
    let wanted = name.trim().to_ascii_lowercase();
    OBJECT_SHAPES
        .iter()
        .find(|shape| shape.name == wanted)
        .copied()
        .ok_or_else(|| ConfigError::UnknownShape(name.to_string()))
}

/// Global multiplier on the integration step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlowMotion {
    #[default]
    Off,
    Half,
    Fifth,
}

impl SlowMotion {
    pub fn factor(self) -> Real {
        match self {
            Self::Off => 1.0,
            Self::Half => 0.5,
            Self::Fifth => 0.2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::Half,
            Self::Half => Self::Fifth,
            Self::Fifth => Self::Off,
        }
    }
}

/// Quadratic drag parameters, frontal area already scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragModel {
    pub air_density: Real,
    pub drag_coefficient: Real,
    pub frontal_area: Real,
}

impl DragModel {
    /// `0.5 * rho * v^2 * Cd * A`
    #[inline]
    pub fn force(&self, speed: Real) -> Real {
        0.5 * self.air_density * speed * speed * self.drag_coefficient * self.frontal_area
    }

    /// Speed at which drag balances gravity, or infinity when nothing limits
    /// the fall.
    pub fn terminal_velocity(&self, mass: Real, gravity: Real) -> Real {
        let resistance = self.air_density * self.drag_coefficient * self.frontal_area;
        if resistance <= 0.0 || gravity <= 0.0 || mass <= 0.0 {
            return Real::INFINITY;
        }
        let terminal = (2.0 * mass * gravity / resistance).sqrt();
        if terminal.is_finite() { terminal } else { Real::INFINITY }
    }
}

/// Parameters of the drop simulation.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct FallParams {
    pub mass: Real,
    pub height: Real,
    pub gravity: Real,
    pub environment: Environment,
    pub shape: ObjectShape,
    pub air_resistance: bool,
    pub wind_force: Real,
    pub slow_motion: SlowMotion,
    /// Only set through [`FallParams::set_restitution`] so bounces always lose energy.
    restitution: Real,
}

impl Default for FallParams {
    fn default() -> Self {
        let environment = ENVIRONMENTS[0];
        Self {
            mass: 10.0,
            height: 100.0,
            gravity: environment.gravity,
            environment,
            shape: OBJECT_SHAPES[0],
            air_resistance: true,
            wind_force: 0.0,
            slow_motion: SlowMotion::Off,
            restitution: RESTITUTION,
        }
    }
}

impl FallParams {
    /// Vacuum drop: no drag, no wind.
    pub fn vacuum(height: Real, gravity: Real) -> Self {
        Self::default()
            .with_height(height)
            .with_gravity(gravity)
            .with_air_resistance(false)
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.set_environment(environment);
        self
    }

    pub fn with_shape(mut self, shape: ObjectShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_height(mut self, height: Real) -> Self {
        self.set_height(height);
        self
    }

    pub fn with_gravity(mut self, gravity: Real) -> Self {
        self.set_gravity(gravity);
        self
    }

    pub fn with_mass(mut self, mass: Real) -> Self {
        self.set_mass(mass);
        self
    }

    pub fn with_air_resistance(mut self, enabled: bool) -> Self {
        self.air_resistance = enabled;
        self
    }

    pub fn with_wind_force(mut self, wind: Real) -> Self {
        self.set_wind_force(wind);
        self
    }

    pub fn with_slow_motion(mut self, slow_motion: SlowMotion) -> Self {
        self.slow_motion = slow_motion;
        self
    }

    /// Switching environment also adopts its gravity.
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
        self.gravity = environment.gravity;
    }

    pub fn set_height(&mut self, height: Real) {
        self.height = clamp_logged("drop height", height, MIN_DROP_HEIGHT, MAX_DROP_HEIGHT, 100.0);
    }

    pub fn set_gravity(&mut self, gravity: Real) {
        self.gravity = clamp_logged("gravity", gravity, 0.0, MAX_GRAVITY, 9.80665);
    }

    pub fn set_mass(&mut self, mass: Real) {
        self.mass = clamp_logged("body mass", mass, MIN_BODY_MASS, MAX_BODY_MASS, 10.0);
    }

    pub fn set_wind_force(&mut self, wind: Real) {
        self.wind_force = clamp_logged("wind force", wind, 0.0, MAX_WIND_FORCE, 0.0);
    }

    pub fn with_restitution(mut self, restitution: Real) -> Self {
        self.set_restitution(restitution);
        self
    }

    pub fn restitution(&self) -> Real {
        self.restitution
    }

    pub fn set_restitution(&mut self, restitution: Real) {
        self.restitution =
            clamp_logged("restitution", restitution, 0.0, MAX_RESTITUTION, RESTITUTION);
    }

    /// Drag applies only with air resistance on and an atmosphere present.
    pub fn drag_model(&self) -> Option<DragModel> {
        if !self.air_resistance || self.environment.air_density <= 0.0 {
            return None;
        }
        Some(DragModel {
            air_density: self.environment.air_density,
            drag_coefficient: self.shape.drag_coefficient,
            frontal_area: self.shape.frontal_area * FRONTAL_AREA_SCALE,
        })
    }

    pub fn terminal_velocity(&self) -> Real {
        self.drag_model()
            .map(|drag| drag.terminal_velocity(self.mass, self.gravity))
            .unwrap_or(Real::INFINITY)
    }

    /// Vacuum fall time `sqrt(2h/g)`; infinite without gravity.
    pub fn theoretical_fall_time(&self) -> Real {
        if self.gravity > 0.0 {
            (2.0 * self.height / self.gravity).sqrt()
        } else {
            Real::INFINITY
        }
    }

    pub fn kinetic_energy(&self, speed: Real) -> Real {
        0.5 * self.mass * speed * speed
    }

    pub fn potential_energy(&self, height: Real) -> Real {
        self.mass * self.gravity * height
    }
}
