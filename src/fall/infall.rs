use bevy::prelude::*;

use crate::config::{INFALL_RATE, INFALL_START, INFALL_TARGET_LIFT};
use crate::math::{Real, Vector, lerp};

/// Scripted fall of a small object into the central mass.
///
/// Horizontal motion is linear in progress, the vertical coordinate is eased
/// with `1 - (1 - p)^2`.
#[derive(Debug, Clone, PartialEq)]
pub struct InfallDemo {
    start: Vector,
    target: Vector,
    progress: Real,
    active: bool,
}

impl InfallDemo {
    pub fn new(center: Vector) -> Self {
        Self {
            start: Vec3::from_array(INFALL_START),
            target: center + Vec3::Y * INFALL_TARGET_LIFT,
            progress: 0.0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn progress(&self) -> Real {
        self.progress
    }

    pub fn target(&self) -> Vector {
        self.target
    }

    pub fn start(&mut self) {
        self.progress = 0.0;
        self.active = true;
        info!("infall demo started");
    }

    pub fn stop(&mut self) {
        self.progress = 0.0;
        self.active = false;
    }

    pub fn position(&self) -> Vector {
        let p = self.progress.clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - p) * (1.0 - p);
        Vec3::new(
            lerp(self.start.x, self.target.x, p),
            lerp(self.start.y, self.target.y, eased),
            lerp(self.start.z, self.target.z, p),
        )
    }

    /// Advance by a simulated delta. Returns `true` on the frame the object
    /// arrives; the demo is inactive afterwards.
    pub fn advance(&mut self, scaled_delta: Real) -> bool {
        if !self.active || !scaled_delta.is_finite() || scaled_delta <= 0.0 {
            return false;
        }
        self.progress = (self.progress + scaled_delta * INFALL_RATE).min(1.0);
        if self.progress >= 1.0 {
            self.active = false;
            info!("infall demo reached the central mass");
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CENTER: Vector = Vec3::new(0.0, -1.5, 0.0);

    #[test]
    fn starts_at_the_launch_point() {
        let demo = InfallDemo::new(CENTER);
        assert_eq!(demo.position(), Vec3::new(5.0, 5.0, 5.0));
        assert!(!demo.is_active());
    }

    #[test]
    fn vertical_motion_is_eased() {
        let mut demo = InfallDemo::new(CENTER);
        demo.start();
        demo.advance(1.0);
        assert_relative_eq!(demo.progress(), 0.5);
        let position = demo.position();
        assert_relative_eq!(position.x, 2.5);
        // 75% of the drop from 5.0 to -1.1
        assert_relative_eq!(position.y, 5.0 - 6.1 * 0.75, epsilon = 1e-5);
    }

    #[test]
    fn completes_exactly_once() {
        let mut demo = InfallDemo::new(CENTER);
        demo.start();
        let arrivals = (0..10).filter(|_| demo.advance(0.5)).count();
        assert_eq!(arrivals, 1);
        assert!(!demo.is_active());
        assert!(demo.position().distance(demo.target()) < 1e-5);
    }
}
