use bevy::prelude::*;

use crate::config::{MAX_MASS_SOURCES, SceneParams};
use crate::math::{Real, Vector, vector_is_finite, zero_vector};

/// A point that bends the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassSource {
    pub position: Vector,
    pub strength: Real,
}

impl Default for MassSource {
    fn default() -> Self {
        Self {
            position: zero_vector(),
            strength: 0.0,
        }
    }
}

impl MassSource {
    /// Non-finite positions collapse to the origin and strengths to zero;
    /// negative strengths are clamped to zero.
    pub fn new(position: Vector, strength: Real) -> Self {
        let position = if vector_is_finite(position) {
            position
        } else {
            warn!("mass source position {position:?} is not finite, using origin");
            zero_vector()
        };
        let strength = if strength.is_finite() { strength.max(0.0) } else { 0.0 };
        Self { position, strength }
    }
}

/// The primary mass plus up to two additional ones, in a fixed-size slot array.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassSourceSet {
    slots: [MassSource; MAX_MASS_SOURCES],
    count: usize,
}

impl MassSourceSet {
    pub fn new(primary: MassSource) -> Self {
        let mut slots = [MassSource::default(); MAX_MASS_SOURCES];
        slots[0] = primary;
        Self { slots, count: 1 }
    }

    /// Snapshot of the sources described by `params`. Extra masses beyond the
    /// cap are ignored.
    pub fn from_params(params: &SceneParams, central_position: Vector) -> Self {
        let mut set = Self::new(MassSource::new(
            central_position,
            params.effective_mass_strength(),
        ));
        for mass in params.additional_masses.iter().take(MAX_MASS_SOURCES - 1) {
            set.push(MassSource::new(Vec3::new(mass.x, 0.0, mass.z), mass.strength));
        }
        set
    }

    /// Returns `false` when the set is already full.
    pub fn push(&mut self, source: MassSource) -> bool {
        if self.count >= MAX_MASS_SOURCES {
            return false;
        }
        self.slots[self.count] = source;
        self.count += 1;
        true
    }

    pub fn primary(&self) -> &MassSource {
        &self.slots[0]
    }

    pub fn additional(&self) -> &[MassSource] {
        &self.slots[1..self.count.max(1)]
    }

    pub fn as_slice(&self) -> &[MassSource] {
        &self.slots[..self.count]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
