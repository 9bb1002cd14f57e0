use crate::config::{MAX_TIME_SCALE, MIN_TIME_SCALE};
use crate::math::{Real, clamp_finite};

/// Shared time base of one scene.
///
/// `elapsed` only moves while playing and always by `delta * time_scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    elapsed: Real,
    is_playing: bool,
    time_scale: Real,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            is_playing: true,
            time_scale: 1.0,
        }
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> Real {
        self.elapsed
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn time_scale(&self) -> Real {
        self.time_scale
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn set_time_scale(&mut self, time_scale: Real) {
        self.time_scale = clamp_finite(time_scale, MIN_TIME_SCALE, MAX_TIME_SCALE, 1.0);
    }

    /// Advance by one frame and return the simulated delta (zero while paused).
    pub fn advance(&mut self, delta: Real) -> Real {
        if !self.is_playing || !delta.is_finite() || delta <= 0.0 {
            return 0.0;
        }
        let scaled = delta * self.time_scale;
        self.elapsed += scaled;
        scaled
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
