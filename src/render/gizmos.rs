use bevy::color::Alpha;
use bevy::prelude::*;

use super::bodies::fall_view_position;
use crate::config::GRID_LINE_ALPHA;
use crate::scene::SceneCompositor;

const ORBIT_PATH_ALPHA: f32 = 0.35;

pub(super) fn draw_grid_lines(compositor: Res<SceneCompositor>, mut gizmos: Gizmos) {
    let surface = compositor.surface();
    let (flat, _) = surface.config().color_scheme.colors();
    let color = flat.with_alpha(GRID_LINE_ALPHA);
    for line in surface.grid_lines() {
        gizmos.linestrip(line, color);
    }
}

pub(super) fn draw_orbit_paths(compositor: Res<SceneCompositor>, mut gizmos: Gizmos) {
    let orbits = compositor.orbits();
    for planet in orbits.planets() {
        if let Some(path) = planet.orbit_path(orbits.center()) {
            gizmos.linestrip(path, planet.color.with_alpha(ORBIT_PATH_ALPHA));
        }
    }
}

pub(super) fn draw_fall_trail(compositor: Res<SceneCompositor>, mut gizmos: Gizmos) {
    let fall = compositor.fall();
    if !fall.is_active() {
        return;
    }
    gizmos.linestrip(
        fall.trail().map(|position| fall_view_position(*position)),
        Color::srgba(1.0, 0.5, 0.4, 0.5),
    );
}
