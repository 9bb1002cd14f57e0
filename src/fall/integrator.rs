//! Free-fall integrator for one dropped body
//!
//! Semi-implicit Euler: the net acceleration (gravity, wind, drag) updates the
//! velocity first, the new velocity then moves the body. Ground contact at
//! y = 0 bounces with restitution and squashes the body.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::config::{
    FallParams, SETTLE_SPEED, SQUASH_BASE, SQUASH_DECAY_RATE, SQUASH_IMPACT_GAIN,
    TERMINAL_CLAMP_RATIO, TRAIL_LENGTH, WIND_X_GAIN, WIND_X_RATE, WIND_Z_GAIN, WIND_Z_RATE,
};
use crate::math::{Real, Vector, zero_vector};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallPhase {
    #[default]
    Idle,
    Falling,
    Grounded,
}

/// Kinematic state of the dropped body. Height is `position.y` in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingBody {
    pub position: Vector,
    pub velocity: Vector,
    pub squash: Real,
    pub resting: bool,
}

impl FallingBody {
    pub fn at_height(height: Real) -> Self {
        Self {
            position: Vec3::new(0.0, height, 0.0),
            velocity: zero_vector(),
            squash: 0.0,
            resting: false,
        }
    }

    pub fn height(&self) -> Real {
        self.position.y
    }

    pub fn speed(&self) -> Real {
        self.velocity.length()
    }
}

/// Live readings pushed to observers once per integrated step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FallMetrics {
    pub height: Real,
    /// Speed in m/s. On the impact frame this is the speed at touchdown.
    pub velocity: Real,
    pub elapsed_time: Real,
    /// Magnitude of the net acceleration.
    pub acceleration: Real,
    pub wind_speed: Real,
    pub impact: bool,
}

/// Result of one pure integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyStep {
    pub body: FallingBody,
    pub acceleration: Vector,
    /// The body touched the ground during this step.
    pub contact: bool,
    /// Downward speed just before touchdown, zero without contact.
    pub impact_speed: Real,
}

/// Lateral oscillating wind acceleration at simulation time `time`.
#[inline]
pub fn wind_acceleration(wind_force: Real, time: Real) -> Vector {
    if wind_force <= 0.0 {
        return zero_vector();
    }
    Vec3::new(
        wind_force * WIND_X_GAIN * (time * WIND_X_RATE).sin(),
        0.0,
        wind_force * WIND_Z_GAIN * (time * WIND_Z_RATE).cos(),
    )
}

/// Gravity plus wind plus drag acting on a body moving at `velocity`.
pub fn net_acceleration(velocity: Vector, time: Real, params: &FallParams) -> Vector {
    let mut acceleration = wind_acceleration(params.wind_force, time);
    if params.gravity > 0.0 {
        acceleration.y -= params.gravity;
    }
    if let Some(drag) = params.drag_model() {
        let speed = velocity.length();
        if speed > 0.0 && params.mass > 0.0 {
            acceleration -= velocity / speed * (drag.force(speed) / params.mass);
        }
    }
    acceleration
}

/// Advance `body` by `dt` seconds (before slow motion is applied).
///
/// Returns `None` when the effective step is not positive.
pub fn step_body(body: FallingBody, time: Real, dt: Real, params: &FallParams) -> Option<BodyStep> {
    let dt = dt * params.slow_motion.factor();
    if !dt.is_finite() || dt <= 0.0 {
        return None;
    }

    let mut next = body;
    if next.resting {
        next.squash = (next.squash - SQUASH_DECAY_RATE * dt).max(0.0);
        return Some(BodyStep {
            body: next,
            acceleration: zero_vector(),
            contact: false,
            impact_speed: 0.0,
        });
    }

    let acceleration = net_acceleration(next.velocity, time, params);
    next.velocity += acceleration * dt;

    // Approximate clamp, not a drag-equilibrium solve.
    let terminal = params.terminal_velocity();
    if terminal.is_finite() && next.velocity.length() >= TERMINAL_CLAMP_RATIO * terminal {
        next.velocity = next.velocity.clamp_length_max(terminal);
    }

    next.position += next.velocity * dt;

    let contact = next.position.y <= 0.0;
    let mut impact_speed = 0.0;
    if contact {
        next.position.y = 0.0;
        impact_speed = (-next.velocity.y).max(0.0);
        next.velocity.y = impact_speed * params.restitution();
        let impact_strength = (next.velocity.y.abs() / params.gravity.max(1.0)).min(1.0);
        next.squash = next.squash.max(SQUASH_BASE + impact_strength * SQUASH_IMPACT_GAIN);

        if impact_speed < SETTLE_SPEED.max(2.0 * params.gravity * dt) {
            next.velocity = zero_vector();
            next.resting = true;
        }
    } else {
        next.squash = (next.squash - SQUASH_DECAY_RATE * dt).max(0.0);
    }

    Some(BodyStep {
        body: next,
        acceleration,
        contact,
        impact_speed,
    })
}

/// What one call to [`FreeFallIntegrator::step`] produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub metrics: FallMetrics,
    pub contact: bool,
    /// The body came to rest and its squash has fully relaxed.
    pub completed: bool,
}

/// Stateful wrapper around [`step_body`]: drop lifecycle, trail, metrics.
#[derive(Debug, Clone)]
pub struct FreeFallIntegrator {
    body: FallingBody,
    start_height: Real,
    phase: FallPhase,
    elapsed: Real,
    trail: VecDeque<Vector>,
    impact_registered: bool,
    last_metrics: Option<FallMetrics>,
}

impl Default for FreeFallIntegrator {
    fn default() -> Self {
        Self::new(FallParams::default().height)
    }
}

impl FreeFallIntegrator {
    pub fn new(start_height: Real) -> Self {
        Self {
            body: FallingBody::at_height(start_height),
            start_height,
            phase: FallPhase::Idle,
            elapsed: 0.0,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            impact_registered: false,
            last_metrics: None,
        }
    }

    pub fn body(&self) -> &FallingBody {
        &self.body
    }

    pub fn phase(&self) -> FallPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != FallPhase::Idle
    }

    pub fn elapsed(&self) -> Real {
        self.elapsed
    }

    pub fn start_height(&self) -> Real {
        self.start_height
    }

    /// Most recent positions, oldest first.
    pub fn trail(&self) -> impl Iterator<Item = &Vector> {
        self.trail.iter()
    }

    pub fn last_metrics(&self) -> Option<FallMetrics> {
        self.last_metrics
    }

    /// Begin a new drop from `params.height`.
    pub fn start(&mut self, params: &FallParams) {
        self.reset(params);
        self.phase = FallPhase::Falling;
        info!(
            "drop started: {:.1} m, g = {:.2}, {} in {}",
            params.height, params.gravity, params.shape.name, params.environment.name
        );
    }

    /// Back to idle at the starting height with no motion, squash or trail.
    pub fn reset(&mut self, params: &FallParams) {
        self.start_height = params.height;
        self.body = FallingBody::at_height(params.height);
        self.phase = FallPhase::Idle;
        self.elapsed = 0.0;
        self.trail.clear();
        self.impact_registered = false;
        self.last_metrics = None;
    }

    /// Integrate one frame. `None` while idle or when `dt` does not advance.
    pub fn step(&mut self, time: Real, dt: Real, params: &FallParams) -> Option<StepReport> {
        if self.phase == FallPhase::Idle {
            return None;
        }
        let step = step_body(self.body, time, dt, params)?;
        self.body = step.body;
        self.elapsed += dt * params.slow_motion.factor();

        if self.trail.len() == TRAIL_LENGTH {
            self.trail.pop_front();
        }
        self.trail.push_back(self.body.position);

        let impact = step.contact && !self.impact_registered;
        if impact {
            self.impact_registered = true;
            info!(
                "impact after {:.3} s at {:.2} m/s",
                self.elapsed, step.impact_speed
            );
        }

        self.phase = if step.contact || self.body.resting {
            FallPhase::Grounded
        } else {
            FallPhase::Falling
        };

        let metrics = FallMetrics {
            height: self.body.height(),
            velocity: if impact { step.impact_speed } else { self.body.speed() },
            elapsed_time: self.elapsed,
            acceleration: step.acceleration.length(),
            wind_speed: params.wind_force,
            impact,
        };
        self.last_metrics = Some(metrics);

        let completed = self.body.resting && self.body.squash <= 0.0;
        if completed {
            self.phase = FallPhase::Idle;
            info!("drop settled after {:.3} s", self.elapsed);
        }

        Some(StepReport {
            metrics,
            contact: step.contact,
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SlowMotion, find_environment};
    use approx::assert_relative_eq;

    #[test]
    fn first_step_is_semi_implicit() {
        let params = FallParams::vacuum(100.0, 10.0);
        let step = step_body(FallingBody::at_height(100.0), 0.0, 0.1, &params).unwrap();
        assert_relative_eq!(step.body.velocity.y, -1.0);
        assert_relative_eq!(step.body.position.y, 99.9, epsilon = 1e-4);
        assert!(!step.contact);
    }

    #[test]
    fn non_positive_steps_are_rejected() {
        let params = FallParams::default();
        let body = FallingBody::at_height(50.0);
        assert!(step_body(body, 0.0, 0.0, &params).is_none());
        assert!(step_body(body, 0.0, -0.1, &params).is_none());
        assert!(step_body(body, 0.0, Real::NAN, &params).is_none());
    }

    #[test]
    fn slow_motion_scales_the_step() {
        let body = FallingBody::at_height(100.0);
        let normal = FallParams::vacuum(100.0, 10.0);
        let slow = normal.clone().with_slow_motion(SlowMotion::Fifth);
        let full = step_body(body, 0.0, 0.02, &normal).unwrap();
        let scaled = step_body(body, 0.0, 0.1, &slow).unwrap();
        assert_relative_eq!(full.body.velocity.y, scaled.body.velocity.y, epsilon = 1e-5);
        assert_relative_eq!(full.body.position.y, scaled.body.position.y, epsilon = 1e-4);
    }

    #[test]
    fn contact_bounces_and_squashes() {
        let params = FallParams::vacuum(100.0, 9.8);
        let mut body = FallingBody::at_height(0.05);
        body.velocity.y = -10.0;
        let step = step_body(body, 0.0, 0.01, &params).unwrap();
        assert!(step.contact);
        assert_eq!(step.body.position.y, 0.0);
        let bounced = step.impact_speed * params.restitution();
        assert_relative_eq!(step.body.velocity.y, bounced);
        let strength = (bounced / 9.8).min(1.0);
        assert_relative_eq!(step.body.squash, SQUASH_BASE + strength * SQUASH_IMPACT_GAIN);
    }

    #[test]
    fn squash_decays_between_impacts() {
        let params = FallParams::vacuum(100.0, 9.8);
        let mut body = FallingBody::at_height(50.0);
        body.squash = 0.6;
        let step = step_body(body, 0.0, 0.1, &params).unwrap();
        assert_relative_eq!(step.body.squash, 0.6 - SQUASH_DECAY_RATE * 0.1);
    }

    #[test]
    fn wind_pushes_sideways_only() {
        let wind = wind_acceleration(20.0, 0.3);
        assert_eq!(wind.y, 0.0);
        assert_relative_eq!(wind.x, 20.0 * WIND_X_GAIN * (0.6_f32).sin());
        assert_eq!(wind_acceleration(0.0, 0.3), Vec3::ZERO);
    }

    #[test]
    fn drag_opposes_motion() {
        let params = FallParams::default();
        let velocity = Vec3::new(0.0, -30.0, 0.0);
        let with_drag = net_acceleration(velocity, 0.0, &params);
        assert!(with_drag.y > -params.gravity);
        let vacuum = FallParams::default().with_air_resistance(false);
        assert_relative_eq!(net_acceleration(velocity, 0.0, &vacuum).y, -vacuum.gravity);
    }

    #[test]
    fn idle_integrator_reports_nothing() {
        let params = FallParams::default();
        let mut integrator = FreeFallIntegrator::default();
        assert!(integrator.step(0.0, 0.016, &params).is_none());
        integrator.start(&params);
        assert!(integrator.step(0.0, 0.016, &params).is_some());
        assert_eq!(integrator.phase(), FallPhase::Falling);
    }

    #[test]
    fn trail_is_bounded() {
        let params = FallParams::default();
        let mut integrator = FreeFallIntegrator::default();
        integrator.start(&params);
        for _ in 0..100 {
            integrator.step(0.0, 0.01, &params);
        }
        assert_eq!(integrator.trail().count(), TRAIL_LENGTH);
    }

    #[test]
    fn drop_settles_and_completes_once() {
        let params = FallParams::vacuum(20.0, 9.8)
            .with_environment(find_environment("mars").unwrap())
            .with_air_resistance(false);
        let mut integrator = FreeFallIntegrator::new(20.0);
        integrator.start(&params);

        let mut impacts = 0;
        let mut completions = 0;
        let mut time = 0.0;
        for _ in 0..20_000 {
            time += 0.005;
            if let Some(report) = integrator.step(time, 0.005, &params) {
                impacts += report.metrics.impact as usize;
                completions += report.completed as usize;
            }
        }
        assert_eq!(impacts, 1);
        assert_eq!(completions, 1);
        assert_eq!(integrator.phase(), FallPhase::Idle);
        assert_eq!(integrator.body().height(), 0.0);
    }
}
