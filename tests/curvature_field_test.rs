//! Curvature field properties
//!
//! The well is finite everywhere, never negative, falls off with distance and
//! adds up across sources.

use approx::assert_relative_eq;
use bevy::prelude::*;
use spacetime_sim::config::{MIN_GRID_RESOLUTION, SURFACE_Y_OFFSET};
use spacetime_sim::core::MassSource;
use spacetime_sim::field::{evaluate, total_curvature};
use spacetime_sim::surface::{DeformableGridSurface, SurfaceConfig};

fn source(x: f32, z: f32, strength: f32) -> MassSource {
    MassSource::new(Vec3::new(x, 0.0, z), strength)
}

#[test]
fn curvature_is_finite_and_non_negative() {
    let strengths = [0.0, 0.4, 2.0, 6.0, 12.0];
    for &strength in &strengths {
        let sources = [
            source(0.0, 0.0, strength),
            source(3.0, -2.0, strength),
            source(-7.5, 4.0, strength),
        ];
        for ix in -50..=50 {
            for iz in -50..=50 {
                let point = Vec2::new(ix as f32 * 0.5, iz as f32 * 0.5);
                let curvature = total_curvature(point, &sources);
                assert!(curvature.is_finite(), "non-finite at {point:?}");
                assert!(curvature >= 0.0, "negative at {point:?}");
            }
        }
        // Exactly on top of a source.
        assert!(total_curvature(Vec2::new(3.0, -2.0), &sources).is_finite());
    }
}

#[test]
fn negative_strength_is_clamped_at_the_boundary() {
    let sources = [source(0.0, 0.0, -5.0)];
    assert_eq!(total_curvature(Vec2::new(1.0, 1.0), &sources), 0.0);
}

#[test]
fn single_source_decays_with_distance() {
    let sources = [source(0.0, 0.0, 2.0)];
    let mut previous = f32::INFINITY;
    for step in 1..=250 {
        let distance = 0.1 + step as f32 * 0.1;
        let curvature = total_curvature(Vec2::new(distance, 0.0), &sources);
        assert!(
            curvature < previous,
            "curvature rose at distance {distance}: {curvature} >= {previous}"
        );
        previous = curvature;
    }
}

#[test]
fn height_sinks_with_curvature_when_still() {
    let sources = [source(0.0, 0.0, 2.0)];
    let near = evaluate(Vec2::new(1.0, 0.0), &sources, 0.0, 0.0);
    let far = evaluate(Vec2::new(4.0, 0.0), &sources, 0.0, 0.0);
    assert!(near.height < far.height);
    assert_relative_eq!(near.height, -near.curvature * 2.0);
}

#[test]
fn pair_midpoint_is_deeper_than_a_lone_source() {
    // Two sources one unit from the midpoint, a third far away.
    let sources = [
        source(-1.0, 0.0, 1.0),
        source(1.0, 0.0, 1.0),
        source(8.0, 8.0, 1.0),
    ];
    let midpoint = Vec2::new(0.0, 0.0);
    let beside_lone = Vec2::new(9.0, 8.0);
    let combined = total_curvature(midpoint, &sources);
    let lone = total_curvature(beside_lone, &sources);
    assert!(combined > lone, "{combined} <= {lone}");

    // The deformed surface agrees.
    let mut surface = DeformableGridSurface::new(SurfaceConfig {
        resolution: MIN_GRID_RESOLUTION,
        wave_amplitude: 0.0,
        ..SurfaceConfig::default()
    });
    surface.recompute(&sources, 0.0);
    let mid_height = surface.world_height_at(midpoint);
    let lone_height = surface.world_height_at(beside_lone);
    assert!(mid_height < lone_height);
    assert!(mid_height < SURFACE_Y_OFFSET);
}
