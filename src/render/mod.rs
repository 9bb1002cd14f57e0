//! Bevy front end for [`SceneCompositor`]
//!
//! The plugin owns the scene resources and runs one compositor tick per
//! frame, then mirrors the simulated state onto meshes, transforms, gizmos
//! and screen-space name labels.

mod bodies;
mod gizmos;
mod mesh;

use bevy::prelude::*;

use crate::config::{FallParams, SceneParams};
use crate::fall::FallMetrics;
use crate::math::Real;
use crate::scene::{Completion, SceneCommand, SceneCommands, SceneCompositor, SceneObserver};

pub use bodies::{
    AccretionDiskView, BlackHoleView, BodyLabel, CentralBodyView, FallingBodyView, InfallView,
    MassMarker, PlanetView, fall_view_position,
};
pub use mesh::SurfaceView;

/// Where the drop column is drawn, away from the grid's center.
pub const FALL_VIEW_ORIGIN: Vec3 = Vec3::new(-14.0, -2.0, -14.0);
/// World units per simulated meter of drop height.
pub const FALL_VIEW_SCALE: Real = 0.1;

/// Latest readings for on-screen display.
#[derive(Resource, Default, Debug, Clone)]
pub struct LiveMetrics {
    pub latest: Option<FallMetrics>,
    pub peak_speed: Real,
    pub last_completion: Option<Completion>,
    samples: u64,
}

impl LiveMetrics {
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl SceneObserver for LiveMetrics {
    fn on_metrics(&mut self, metrics: &FallMetrics) {
        self.latest = Some(*metrics);
        self.peak_speed = self.peak_speed.max(metrics.velocity);
        self.samples += 1;
        if self.samples % 60 == 0 {
            debug!(
                "fall: h={:.2} m v={:.2} m/s a={:.2} m/s^2 t={:.2} s",
                metrics.height, metrics.velocity, metrics.acceleration, metrics.elapsed_time
            );
        }
    }

    fn on_complete(&mut self, completion: Completion) {
        self.last_completion = Some(completion);
        info!("{completion:?} completed");
    }
}

pub struct SpacetimePlugin;

impl Plugin for SpacetimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneParams>()
            .init_resource::<FallParams>()
            .init_resource::<SceneCommands>()
            .init_resource::<LiveMetrics>()
            .init_resource::<SceneCompositor>();
        app.add_systems(Startup, (mesh::spawn_surface, bodies::spawn_bodies));
        app.add_systems(
            Update,
            (
                apply_scene_commands,
                tick_scene,
                mesh::upload_surface_mesh,
                bodies::sync_planets,
                bodies::sync_central_bodies,
                bodies::sync_body_labels,
                bodies::sync_mass_markers,
                bodies::sync_falling_body,
                bodies::sync_infall,
                gizmos::draw_grid_lines,
                gizmos::draw_orbit_paths,
                gizmos::draw_fall_trail,
            )
                .chain(),
        );
    }
}

fn apply_scene_commands(
    mut queue: ResMut<SceneCommands>,
    mut compositor: ResMut<SceneCompositor>,
    mut scene: ResMut<SceneParams>,
    mut fall: ResMut<FallParams>,
    mut live: ResMut<LiveMetrics>,
) {
    if queue.is_empty() {
        return;
    }
    for command in queue.drain() {
        if matches!(
            command,
            SceneCommand::StartFall | SceneCommand::ResetFall | SceneCommand::Reset
        ) {
            live.clear();
        }
        compositor.apply_command(command, &mut scene, &mut fall);
    }
}

fn tick_scene(
    time: Res<Time>,
    scene: Res<SceneParams>,
    fall: Res<FallParams>,
    mut compositor: ResMut<SceneCompositor>,
    mut live: ResMut<LiveMetrics>,
) {
    compositor.tick(time.delta_secs(), &scene, &fall, &mut *live);
}
