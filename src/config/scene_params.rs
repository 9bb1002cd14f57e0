use std::str::FromStr;

use bevy::prelude::*;
use rand::Rng;

use super::constants::*;
use super::{ConfigError, clamp_logged};
use crate::field::ColorScheme;
use crate::math::Real;

/// What sits at the center of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisualizationType {
    #[default]
    Planet,
    BlackHole,
}

impl VisualizationType {
    pub fn max_mass_strength(self) -> Real {
        match self {
            Self::Planet => MAX_PLANET_MASS_STRENGTH,
            Self::BlackHole => MAX_BLACK_HOLE_MASS_STRENGTH,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Planet => Self::BlackHole,
            Self::BlackHole => Self::Planet,
        }
    }
}

impl FromStr for VisualizationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planet" => Ok(Self::Planet),
            "blackhole" | "black-hole" | "black_hole" => Ok(Self::BlackHole),
            _ => Err(ConfigError::UnknownVisualization(s.to_string())),
        }
    }
}

/// A user-placed extra mass on the grid plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdditionalMass {
    pub x: Real,
    pub z: Real,
    pub strength: Real,
}

impl AdditionalMass {
    pub fn new(x: Real, z: Real, strength: Real) -> Self {
        Self {
            x: clamp_logged("mass x", x, -ADDITIONAL_MASS_EXTENT, ADDITIONAL_MASS_EXTENT, 0.0),
            z: clamp_logged("mass z", z, -ADDITIONAL_MASS_EXTENT, ADDITIONAL_MASS_EXTENT, 0.0),
            strength: clamp_logged(
                "mass strength",
                strength,
                MIN_ADDITIONAL_STRENGTH,
                MAX_ADDITIONAL_STRENGTH,
                1.0,
            ),
        }
    }

    /// A unit-strength mass dropped somewhere near the center.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(
            rng.random_range(-ADDITIONAL_MASS_SPAWN_EXTENT..ADDITIONAL_MASS_SPAWN_EXTENT),
            rng.random_range(-ADDITIONAL_MASS_SPAWN_EXTENT..ADDITIONAL_MASS_SPAWN_EXTENT),
            1.0,
        )
    }
}

/// Partial edit of an [`AdditionalMass`]; `None` keeps the current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MassUpdate {
    pub x: Option<Real>,
    pub z: Option<Real>,
    pub strength: Option<Real>,
}

/// Parameters of the spacetime scene, edited by the host between frames.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SceneParams {
    pub mass_strength: Real,
    pub time_scale: Real,
    pub is_playing: bool,
    pub planet_count: usize,
    pub visualization: VisualizationType,
    pub grid_resolution: u32,
    pub grid_frequency: Real,
    pub wave_amplitude: Real,
    pub color_scheme: ColorScheme,
    pub show_grid: bool,
    pub additional_masses: Vec<AdditionalMass>,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            mass_strength: 2.0,
            time_scale: 1.0,
            is_playing: true,
            planet_count: 2,
            visualization: VisualizationType::Planet,
            grid_resolution: 150,
            grid_frequency: 20.0,
            wave_amplitude: 0.1,
            color_scheme: ColorScheme::Default,
            show_grid: true,
            additional_masses: Vec::new(),
        }
    }
}

impl SceneParams {
    pub fn with_mass_strength(mut self, strength: Real) -> Self {
        self.set_mass_strength(strength);
        self
    }

    pub fn with_time_scale(mut self, time_scale: Real) -> Self {
        self.set_time_scale(time_scale);
        self
    }

    pub fn with_planet_count(mut self, count: usize) -> Self {
        self.set_planet_count(count);
        self
    }

    pub fn with_visualization(mut self, visualization: VisualizationType) -> Self {
        self.set_visualization(visualization);
        self
    }

    pub fn with_grid_resolution(mut self, resolution: u32) -> Self {
        self.set_grid_resolution(resolution);
        self
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    pub fn set_mass_strength(&mut self, strength: Real) {
        let max = self.visualization.max_mass_strength();
        self.mass_strength = clamp_logged("mass strength", strength, MIN_MASS_STRENGTH, max, 2.0);
    }

    pub fn set_time_scale(&mut self, time_scale: Real) {
        self.time_scale =
            clamp_logged("time scale", time_scale, MIN_TIME_SCALE, MAX_TIME_SCALE, 1.0);
    }

    pub fn set_planet_count(&mut self, count: usize) {
        let clamped = count.clamp(MIN_PLANETS, MAX_PLANETS);
        if clamped != count {
            warn!("planet count {count} outside [{MIN_PLANETS}, {MAX_PLANETS}], using {clamped}");
        }
        self.planet_count = clamped;
    }

    pub fn set_visualization(&mut self, visualization: VisualizationType) {
        self.visualization = visualization;
        // The slider range shrinks when leaving black-hole mode.
        let strength = self.mass_strength;
        self.set_mass_strength(strength);
    }

    pub fn set_grid_resolution(&mut self, resolution: u32) {
        let clamped = resolution.clamp(MIN_GRID_RESOLUTION, MAX_GRID_RESOLUTION);
        if clamped != resolution {
            warn!(
                "grid resolution {resolution} outside [{MIN_GRID_RESOLUTION}, {MAX_GRID_RESOLUTION}], using {clamped}"
            );
        }
        self.grid_resolution = clamped;
    }

    pub fn set_grid_frequency(&mut self, frequency: Real) {
        self.grid_frequency = clamp_logged(
            "grid frequency",
            frequency,
            MIN_GRID_FREQUENCY,
            MAX_GRID_FREQUENCY,
            20.0,
        );
    }

    pub fn set_wave_amplitude(&mut self, amplitude: Real) {
        self.wave_amplitude =
            clamp_logged("wave amplitude", amplitude, 0.0, MAX_WAVE_AMPLITUDE, 0.1);
    }

    pub fn add_mass(&mut self, mass: AdditionalMass) -> Result<usize, ConfigError> {
        if self.additional_masses.len() >= MAX_ADDITIONAL_MASSES {
            return Err(ConfigError::TooManyMasses(MAX_ADDITIONAL_MASSES));
        }
        self.additional_masses
            .push(AdditionalMass::new(mass.x, mass.z, mass.strength));
        Ok(self.additional_masses.len() - 1)
    }

    pub fn remove_mass(&mut self, index: usize) -> Result<AdditionalMass, ConfigError> {
        if index >= self.additional_masses.len() {
            return Err(ConfigError::MassIndexOutOfRange {
                index,
                count: self.additional_masses.len(),
            });
        }
        Ok(self.additional_masses.remove(index))
    }

    pub fn update_mass(&mut self, index: usize, update: MassUpdate) -> Result<(), ConfigError> {
        let count = self.additional_masses.len();
        let mass = self
            .additional_masses
            .get_mut(index)
            .ok_or(ConfigError::MassIndexOutOfRange { index, count })?;
        *mass = AdditionalMass::new(
            update.x.unwrap_or(mass.x),
            update.z.unwrap_or(mass.z),
            update.strength.unwrap_or(mass.strength),
        );
        Ok(())
    }

    /// Primary strength actually fed to the field. A black hole never drops
    /// below [`BLACK_HOLE_MIN_STRENGTH`].
    pub fn effective_mass_strength(&self) -> Real {
        let max = self.visualization.max_mass_strength();
        let strength = crate::math::clamp_finite(self.mass_strength, MIN_MASS_STRENGTH, max, 2.0);
        match self.visualization {
            VisualizationType::Planet => strength,
            VisualizationType::BlackHole => strength.max(BLACK_HOLE_MIN_STRENGTH),
        }
    }

    pub fn effective_time_scale(&self) -> Real {
        crate::math::clamp_finite(self.time_scale, MIN_TIME_SCALE, MAX_TIME_SCALE, 1.0)
    }

    /// Planets are only drawn around a planet-type central body.
    pub fn visible_planet_count(&self) -> usize {
        match self.visualization {
            VisualizationType::Planet => self.planet_count.clamp(MIN_PLANETS, MAX_PLANETS),
            VisualizationType::BlackHole => 0,
        }
    }
}
