//! Frame-driven orchestration of the whole scene
//!
//! One `tick` per rendered frame: clock, mass sources, surface, orbits, the
//! active drop and the infall demo, then metrics. Parameter edits arrive as
//! [`SceneCommand`]s and are applied before the next tick.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{
    ACCRETION_DISK_SPIN, AdditionalMass, CENTRAL_MASS_POSITION, Environment, FallParams,
    MassUpdate, ObjectShape, SceneParams, SlowMotion, VisualizationType,
};
use crate::core::{MassSourceSet, SimulationClock};
use crate::fall::{FallMetrics, FreeFallIntegrator, InfallDemo};
use crate::field::ColorScheme;
use crate::math::{Real, Vector};
use crate::orbit::OrbitingBodyController;
use crate::surface::{DeformableGridSurface, SurfaceChange, SurfaceConfig};

/// A "set parameter" message from the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    SetPlaying(bool),
    TogglePlaying,
    SetMassStrength(Real),
    SetTimeScale(Real),
    SetPlanetCount(usize),
    SetVisualization(VisualizationType),
    SetGridResolution(u32),
    SetGridFrequency(Real),
    SetWaveAmplitude(Real),
    SetColorScheme(ColorScheme),
    SetShowGrid(bool),
    /// `None` places a unit mass at a random spot near the center.
    AddMass(Option<AdditionalMass>),
    RemoveMass(usize),
    UpdateMass(usize, MassUpdate),
    SetEnvironment(Environment),
    SetShape(ObjectShape),
    SetDropHeight(Real),
    SetBodyMass(Real),
    SetWindForce(Real),
    SetAirResistance(bool),
    SetSlowMotion(SlowMotion),
    StartFall,
    ResetFall,
    StartInfall,
    Reset,
}

/// Commands queued between frames.
#[derive(Resource, Default, Debug)]
pub struct SceneCommands {
    queue: Vec<SceneCommand>,
}

impl SceneCommands {
    pub fn push(&mut self, command: SceneCommand) {
        self.queue.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SceneCommand> + '_ {
        self.queue.drain(..)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Fall,
    Infall,
}

/// Receives live readings from the compositor.
pub trait SceneObserver {
    fn on_metrics(&mut self, metrics: &FallMetrics);

    fn on_complete(&mut self, _completion: Completion) {}
}

impl SceneObserver for () {
    fn on_metrics(&mut self, _metrics: &FallMetrics) {}
}

/// Observer that records everything, mostly for tests and benches.
#[derive(Debug, Default, Clone)]
pub struct MetricsLog {
    pub samples: Vec<FallMetrics>,
    pub completions: Vec<Completion>,
}

impl SceneObserver for MetricsLog {
    fn on_metrics(&mut self, metrics: &FallMetrics) {
        self.samples.push(*metrics);
    }

    fn on_complete(&mut self, completion: Completion) {
        self.completions.push(completion);
    }
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub elapsed: Real,
    pub scaled_delta: Real,
    pub surface_change: SurfaceChange,
    pub metrics: Option<FallMetrics>,
    pub fall_completed: bool,
    pub infall_completed: bool,
}

/// Owns the clock, the active mass sources and every simulated component.
#[derive(Resource)]
pub struct SceneCompositor {
    clock: SimulationClock,
    central_position: Vector,
    sources: MassSourceSet,
    surface: DeformableGridSurface,
    orbits: OrbitingBodyController,
    fall: FreeFallIntegrator,
    infall: InfallDemo,
    disk_angle: Real,
    rng: StdRng,
    last_report: FrameReport,
}

impl Default for SceneCompositor {
    fn default() -> Self {
        Self::from_rng(StdRng::from_rng(&mut rand::rng()))
    }
}

impl SceneCompositor {
    /// Deterministic orbital phases and mass placement.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        let central_position = Vec3::from_array(CENTRAL_MASS_POSITION);
        let params = SceneParams::default();
        let mut compositor = Self {
            clock: SimulationClock::new(),
            central_position,
            sources: MassSourceSet::from_params(&params, central_position),
            surface: DeformableGridSurface::new(SurfaceConfig::from_params(&params)),
            orbits: OrbitingBodyController::new(central_position),
            fall: FreeFallIntegrator::default(),
            infall: InfallDemo::new(central_position),
            disk_angle: 0.0,
            rng,
            last_report: FrameReport::default(),
        };
        compositor
            .orbits
            .set_planet_count(params.visible_planet_count(), &mut compositor.rng);
        compositor
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn central_position(&self) -> Vector {
        self.central_position
    }

    pub fn sources(&self) -> &MassSourceSet {
        &self.sources
    }

    pub fn surface(&self) -> &DeformableGridSurface {
        &self.surface
    }

    pub fn orbits(&self) -> &OrbitingBodyController {
        &self.orbits
    }

    pub fn fall(&self) -> &FreeFallIntegrator {
        &self.fall
    }

    pub fn infall(&self) -> &InfallDemo {
        &self.infall
    }

    /// Accretion disk rotation in radians.
    pub fn disk_angle(&self) -> Real {
        self.disk_angle
    }

    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }

    /// Apply one parameter edit. Takes effect on the next tick.
    pub fn apply_command(
        &mut self,
        command: SceneCommand,
        scene: &mut SceneParams,
        fall: &mut FallParams,
    ) {
        debug!("scene command {command:?}");
        match command {
            SceneCommand::SetPlaying(playing) => scene.is_playing = playing,
            SceneCommand::TogglePlaying => scene.is_playing = !scene.is_playing,
            SceneCommand::SetMassStrength(strength) => scene.set_mass_strength(strength),
            SceneCommand::SetTimeScale(time_scale) => scene.set_time_scale(time_scale),
            SceneCommand::SetPlanetCount(count) => scene.set_planet_count(count),
            SceneCommand::SetVisualization(visualization) => {
                scene.set_visualization(visualization)
            }
            SceneCommand::SetGridResolution(resolution) => scene.set_grid_resolution(resolution),
            SceneCommand::SetGridFrequency(frequency) => scene.set_grid_frequency(frequency),
            SceneCommand::SetWaveAmplitude(amplitude) => scene.set_wave_amplitude(amplitude),
            SceneCommand::SetColorScheme(scheme) => scene.color_scheme = scheme,
            SceneCommand::SetShowGrid(show) => scene.show_grid = show,
            SceneCommand::AddMass(mass) => {
                let mass = mass.unwrap_or_else(|| AdditionalMass::random(&mut self.rng));
                if let Err(err) = scene.add_mass(mass) {
                    warn!("cannot add mass: {err}");
                }
            }
            SceneCommand::RemoveMass(index) => {
                if let Err(err) = scene.remove_mass(index) {
                    warn!("cannot remove mass: {err}");
                }
            }
            SceneCommand::UpdateMass(index, update) => {
                if let Err(err) = scene.update_mass(index, update) {
                    warn!("cannot update mass: {err}");
                }
            }
            SceneCommand::SetEnvironment(environment) => fall.set_environment(environment),
            SceneCommand::SetShape(shape) => fall.shape = shape,
            SceneCommand::SetDropHeight(height) => {
                fall.set_height(height);
                if !self.fall.is_active() {
                    self.fall.reset(fall);
                }
            }
            SceneCommand::SetBodyMass(mass) => fall.set_mass(mass),
            SceneCommand::SetWindForce(wind) => fall.set_wind_force(wind),
            SceneCommand::SetAirResistance(enabled) => fall.air_resistance = enabled,
            SceneCommand::SetSlowMotion(slow_motion) => fall.slow_motion = slow_motion,
            SceneCommand::StartFall => self.fall.start(fall),
            SceneCommand::ResetFall => self.fall.reset(fall),
            SceneCommand::StartInfall => self.infall.start(),
            SceneCommand::Reset => {
                *scene = SceneParams::default();
                self.reset(scene, fall);
            }
        }
    }

    /// Zero the clock and put every body back where it started.
    pub fn reset(&mut self, scene: &SceneParams, fall: &FallParams) {
        self.clock.reset();
        self.orbits = OrbitingBodyController::new(self.central_position);
        self.orbits
            .set_planet_count(scene.visible_planet_count(), &mut self.rng);
        self.fall.reset(fall);
        self.infall.stop();
        self.disk_angle = 0.0;
        self.sources = MassSourceSet::from_params(scene, self.central_position);
        self.last_report = FrameReport::default();
        info!("scene reset");
    }

    /// Advance the scene by one rendered frame of `delta` wall seconds.
    pub fn tick(
        &mut self,
        delta: Real,
        scene: &SceneParams,
        fall: &FallParams,
        observer: &mut impl SceneObserver,
    ) -> FrameReport {
        self.clock.set_playing(scene.is_playing);
        self.clock.set_time_scale(scene.effective_time_scale());
        let scaled_delta = self.clock.advance(delta);
        let elapsed = self.clock.elapsed();

        self.sources = MassSourceSet::from_params(scene, self.central_position);

        let surface_change = self.surface.configure(SurfaceConfig::from_params(scene));
        self.surface.recompute(self.sources.as_slice(), elapsed);

        self.orbits
            .set_planet_count(scene.visible_planet_count(), &mut self.rng);
        self.orbits
            .advance(scaled_delta, self.clock.is_playing(), elapsed);
        if scene.visualization == VisualizationType::BlackHole {
            self.disk_angle = (self.disk_angle + scaled_delta * ACCRETION_DISK_SPIN)
                % std::f32::consts::TAU;
        }

        let step = self.fall.step(elapsed, scaled_delta, fall);
        let infall_completed = self.infall.advance(scaled_delta);

        let metrics = step.map(|report| report.metrics);
        let fall_completed = step.is_some_and(|report| report.completed);
        if let Some(metrics) = &metrics {
            observer.on_metrics(metrics);
        }
        if fall_completed {
            observer.on_complete(Completion::Fall);
        }
        if infall_completed {
            observer.on_complete(Completion::Infall);
        }

        self.last_report = FrameReport {
            elapsed,
            scaled_delta,
            surface_change,
            metrics,
            fall_completed,
            infall_completed,
        };
        self.last_report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_scene_has_two_planets_and_one_source() {
        let compositor = SceneCompositor::with_seed(7);
        assert_eq!(compositor.orbits().planet_count(), 2);
        assert_eq!(compositor.sources().len(), 1);
        assert_eq!(compositor.clock().elapsed(), 0.0);
    }

    #[test]
    fn commands_edit_parameters() {
        let mut compositor = SceneCompositor::with_seed(7);
        let mut scene = SceneParams::default();
        let mut fall = FallParams::default();
        compositor.apply_command(SceneCommand::SetTimeScale(10.0), &mut scene, &mut fall);
        compositor.apply_command(SceneCommand::AddMass(None), &mut scene, &mut fall);
        compositor.apply_command(SceneCommand::AddMass(None), &mut scene, &mut fall);
        compositor.apply_command(SceneCommand::AddMass(None), &mut scene, &mut fall);
        compositor.apply_command(SceneCommand::TogglePlaying, &mut scene, &mut fall);
        assert_eq!(scene.time_scale, 3.0);
        assert_eq!(scene.additional_masses.len(), 2);
        assert!(!scene.is_playing);

        compositor.tick(0.016, &scene, &fall, &mut ());
        assert_eq!(compositor.sources().len(), 3);
        assert_eq!(compositor.clock().elapsed(), 0.0);
    }

    #[test]
    fn black_hole_hides_planets_and_spins_the_disk() {
        let mut compositor = SceneCompositor::with_seed(7);
        let scene = SceneParams::default().with_visualization(VisualizationType::BlackHole);
        let fall = FallParams::default();
        compositor.tick(1.0, &scene, &fall, &mut ());
        assert_eq!(compositor.orbits().planet_count(), 0);
        assert_relative_eq!(compositor.disk_angle(), ACCRETION_DISK_SPIN);
        assert_relative_eq!(compositor.sources().primary().strength, 8.0);
    }

    #[test]
    fn resolution_change_is_reported_once() {
        let mut compositor = SceneCompositor::with_seed(7);
        let scene = SceneParams::default().with_grid_resolution(60);
        let fall = FallParams::default();
        let first = compositor.tick(0.016, &scene, &fall, &mut ());
        let second = compositor.tick(0.016, &scene, &fall, &mut ());
        assert_eq!(first.surface_change, SurfaceChange::Topology);
        assert_eq!(second.surface_change, SurfaceChange::Unchanged);
        assert_eq!(compositor.surface().vertices_per_axis(), 61);
    }
}
