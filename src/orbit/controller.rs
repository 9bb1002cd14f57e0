//! Orbiting bodies around the central mass
//!
//! Each frame a body advances its angle, computes a target on its orbit and
//! eases its visible position toward that target.

use std::f32::consts::TAU;

use bevy::prelude::*;
use indexmap::IndexMap;
use rand::Rng;

use crate::config::{
    CENTRAL_BODY_SIZE, LABEL_LIFT, MAX_PLANETS, ORBIT_BASE_RADIUS, ORBIT_BASE_SPEED,
    ORBIT_PATH_SEGMENTS, ORBIT_RADIUS_STEP, ORBIT_SMOOTHING, PLANET_BASE_SIZE, PLANET_SIZE_STEP,
    WOBBLE_GAIN, WOBBLE_RATE,
};
use crate::math::{Real, Vector, lerp_vector};

const PLANET_COLORS: [Srgba; MAX_PLANETS] = [
    Srgba::rgb(1.0, 0.596, 0.0),
    Srgba::rgb(0.914, 0.118, 0.388),
    Srgba::rgb(0.129, 0.588, 0.953),
    Srgba::rgb(0.545, 0.765, 0.290),
    Srgba::rgb(1.0, 0.757, 0.027),
];

const CENTRAL_COLOR: Srgba = Srgba::rgb(0.298, 0.686, 0.314);

/// Wobble phase used for the central body.
const CENTRAL_INDEX: i32 = -99;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    pub index: i32,
    pub radius: Real,
    /// Radians per simulated second.
    pub angular_speed: Real,
    pub size: Real,
    pub color: Srgba,
    pub label: String,
    angle: Real,
    smoothed_position: Vector,
    spin: Real,
}

impl OrbitingBody {
    /// Planet number `index` (0-based) with a random starting phase.
    pub fn planet(index: usize, center: Vector, rng: &mut impl Rng) -> Self {
        let radius = ORBIT_BASE_RADIUS + index as Real * ORBIT_RADIUS_STEP;
        Self {
            index: index as i32,
            radius,
            angular_speed: ORBIT_BASE_SPEED / (index as Real + 1.0),
            size: PLANET_BASE_SIZE + index as Real * PLANET_SIZE_STEP,
            color: PLANET_COLORS[index % PLANET_COLORS.len()],
            label: format!("Planet {}", index + 1),
            angle: rng.random_range(0.0..TAU),
            smoothed_position: center + Vec3::X * radius,
            spin: 0.0,
        }
    }

    /// The non-orbiting body at the center.
    pub fn central(center: Vector) -> Self {
        Self {
            index: CENTRAL_INDEX,
            radius: 0.0,
            angular_speed: 0.0,
            size: CENTRAL_BODY_SIZE,
            color: CENTRAL_COLOR,
            label: "Earth".to_string(),
            angle: 0.0,
            smoothed_position: center,
            spin: 0.0,
        }
    }

    pub fn angle(&self) -> Real {
        self.angle
    }

    pub fn smoothed_position(&self) -> Vector {
        self.smoothed_position
    }

    /// Self-rotation about the y axis, for display.
    pub fn spin(&self) -> Real {
        self.spin
    }

    pub fn is_orbiting(&self) -> bool {
        self.radius > 0.0
    }

    /// Point on the orbit for the current angle, with a small vertical wobble.
    pub fn target_position(&self, center: Vector, elapsed: Real) -> Vector {
        let wobble = (elapsed * WOBBLE_RATE + self.index as Real).sin()
            * WOBBLE_GAIN
            * (self.radius / 3.0).max(0.5);
        Vec3::new(
            center.x + self.radius * self.angle.cos(),
            center.y + wobble,
            center.z + self.radius * self.angle.sin(),
        )
    }

    /// One frame: advance the angle, compute the target, ease toward it.
    pub fn advance(&mut self, scaled_delta: Real, is_playing: bool, center: Vector, elapsed: Real) {
        if is_playing && self.is_orbiting() {
            self.angle += scaled_delta * self.angular_speed;
        }
        if is_playing {
            self.spin += scaled_delta * 0.4;
        }
        let target = self.target_position(center, elapsed);
        self.smoothed_position = lerp_vector(self.smoothed_position, target, ORBIT_SMOOTHING);
    }

    /// Where the name label floats: above the body, level with the orbit
    /// plane so it does not follow the wobble.
    pub fn label_anchor(&self, center: Vector) -> Vector {
        Vec3::new(
            self.smoothed_position.x,
            center.y + self.size + LABEL_LIFT,
            self.smoothed_position.z,
        )
    }

    /// Closed dashed-orbit polyline, `None` for the central body.
    pub fn orbit_path(&self, center: Vector) -> Option<Vec<Vector>> {
        if !self.is_orbiting() {
            return None;
        }
        Some(
            (0..=ORBIT_PATH_SEGMENTS)
                .map(|i| {
                    let theta = i as Real / ORBIT_PATH_SEGMENTS as Real * TAU;
                    Vec3::new(
                        center.x + self.radius * theta.cos(),
                        center.y,
                        center.z + self.radius * theta.sin(),
                    )
                })
                .collect(),
        )
    }
}

/// Owns the central body and up to [`MAX_PLANETS`] planets keyed by index.
pub struct OrbitingBodyController {
    center: Vector,
    central: OrbitingBody,
    planets: IndexMap<usize, OrbitingBody>,
}

impl OrbitingBodyController {
    pub fn new(center: Vector) -> Self {
        Self {
            center,
            central: OrbitingBody::central(center),
            planets: IndexMap::new(),
        }
    }

    pub fn center(&self) -> Vector {
        self.center
    }

    pub fn central(&self) -> &OrbitingBody {
        &self.central
    }

    pub fn planet(&self, index: usize) -> Option<&OrbitingBody> {
        self.planets.get(&index)
    }

    pub fn planets(&self) -> impl Iterator<Item = &OrbitingBody> {
        self.planets.values()
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    /// Grow or shrink the roster. Surviving planets keep their phase.
    pub fn set_planet_count(&mut self, count: usize, rng: &mut impl Rng) {
        let count = count.min(MAX_PLANETS);
        if count == self.planets.len() {
            return;
        }
        self.planets.retain(|&index, _| index < count);
        for index in 0..count {
            if !self.planets.contains_key(&index) {
                self.planets
                    .insert(index, OrbitingBody::planet(index, self.center, rng));
            }
        }
        self.planets.sort_keys();
        debug!("orbiting planets: {}", self.planets.len());
    }

    pub fn advance(&mut self, scaled_delta: Real, is_playing: bool, elapsed: Real) {
        // The central body never advances its angle.
        self.central.advance(scaled_delta, false, self.center, elapsed);
        for planet in self.planets.values_mut() {
            planet.advance(scaled_delta, is_playing, self.center, elapsed);
        }
    }

    /// Fresh phases for every planet currently present.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        let count = self.planets.len();
        self.planets.clear();
        self.central = OrbitingBody::central(self.center);
        self.set_planet_count(count, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const CENTER: Vector = Vec3::new(0.0, -1.5, 0.0);

    #[test]
    fn planets_follow_the_roster_layout() {
        let mut rng = StdRng::seed_from_u64(1);
        let planet = OrbitingBody::planet(2, CENTER, &mut rng);
        assert_eq!(planet.radius, 7.0);
        assert_relative_eq!(planet.angular_speed, 0.5 / 3.0);
        assert_relative_eq!(planet.size, 0.56, epsilon = 1e-6);
        assert_eq!(planet.label, "Planet 3");
        assert!((0.0..TAU).contains(&planet.angle()));
    }

    #[test]
    fn label_floats_above_the_body() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut planet = OrbitingBody::planet(1, CENTER, &mut rng);
        planet.advance(0.5, true, CENTER, 1.0);
        let anchor = planet.label_anchor(CENTER);
        assert_eq!(anchor.x, planet.smoothed_position().x);
        assert_eq!(anchor.z, planet.smoothed_position().z);
        assert_relative_eq!(anchor.y, CENTER.y + planet.size + LABEL_LIFT);

        let central = OrbitingBody::central(CENTER);
        assert_eq!(central.label, "Earth");
        let expected = CENTER + Vec3::Y * (CENTRAL_BODY_SIZE + LABEL_LIFT);
        assert!(central.label_anchor(CENTER).distance(expected) < 1e-5);
    }

    #[test]
    fn smoothing_never_teleports() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut planet = OrbitingBody::planet(0, CENTER, &mut rng);
        let before = planet.smoothed_position();
        let target = planet.target_position(CENTER, 0.0);
        planet.advance(0.0, true, CENTER, 0.0);
        let moved = planet.smoothed_position();
        assert_relative_eq!(
            moved.distance(before),
            before.distance(target) * ORBIT_SMOOTHING,
            epsilon = 1e-4
        );
    }

    #[test]
    fn paused_planets_hold_their_angle() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut planet = OrbitingBody::planet(1, CENTER, &mut rng);
        let angle = planet.angle();
        planet.advance(0.5, false, CENTER, 1.0);
        assert_eq!(planet.angle(), angle);
        planet.advance(0.5, true, CENTER, 1.5);
        assert_relative_eq!(planet.angle(), angle + 0.5 * 0.25);
    }

    #[test]
    fn central_body_has_no_orbit() {
        let central = OrbitingBody::central(CENTER);
        assert!(central.orbit_path(CENTER).is_none());
        let mut rng = StdRng::seed_from_u64(4);
        let path = OrbitingBody::planet(0, CENTER, &mut rng)
            .orbit_path(CENTER)
            .unwrap();
        assert_eq!(path.len(), ORBIT_PATH_SEGMENTS + 1);
        assert_relative_eq!(path[0].distance(*path.last().unwrap()), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn changing_count_keeps_other_phases() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut controller = OrbitingBodyController::new(CENTER);
        controller.set_planet_count(3, &mut rng);
        controller.advance(0.3, true, 0.3);
        let phases: Vec<Real> = controller.planets().map(|p| p.angle()).collect();

        controller.set_planet_count(5, &mut rng);
        controller.set_planet_count(2, &mut rng);
        assert_eq!(controller.planet_count(), 2);
        assert_eq!(controller.planet(0).unwrap().angle(), phases[0]);
        assert_eq!(controller.planet(1).unwrap().angle(), phases[1]);
        assert!(controller.planet(2).is_none());

        controller.set_planet_count(9, &mut rng);
        assert_eq!(controller.planet_count(), MAX_PLANETS);
        let indices: Vec<i32> = controller.planets().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }
}
