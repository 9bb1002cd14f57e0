/// Simple custom benchmarking without criterion
use std::time::Instant;

use bevy::prelude::*;
use spacetime_sim::config::{AdditionalMass, FallParams, SceneParams};
use spacetime_sim::core::{MassSource, MassSourceSet};
use spacetime_sim::fall::FreeFallIntegrator;
use spacetime_sim::surface::{DeformableGridSurface, SurfaceConfig};
use spacetime_sim::{MetricsLog, SceneCompositor};

fn time_it<F: FnMut()>(name: &str, iterations: usize, mut f: F) {
    // Warmup
    for _ in 0..5 {
        f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    let elapsed = start.elapsed();

    let avg_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    println!("{}: {:.3}ms avg ({} iterations)", name, avg_ms, iterations);
}

fn three_sources() -> MassSourceSet {
    let mut sources = MassSourceSet::new(MassSource::new(Vec3::new(0.0, -1.5, 0.0), 2.0));
    sources.push(MassSource::new(Vec3::new(3.0, 0.0, -2.0), 1.0));
    sources.push(MassSource::new(Vec3::new(-4.0, 0.0, 1.0), 1.5));
    sources
}

fn main() {
    println!("\n=== Spacetime Benchmarks ===\n");

    println!("--- Surface Deformation ---");
    let sources = three_sources();
    for &resolution in &[50, 150, 300] {
        let params = SceneParams::default().with_grid_resolution(resolution);
        let mut surface = DeformableGridSurface::new(SurfaceConfig::from_params(&params));
        let mut time = 0.0;
        time_it(&format!("recompute (res={})", resolution), 50, || {
            time += 0.016;
            surface.recompute(sources.as_slice(), time);
        });

        let mut mesh = surface.build_mesh();
        time_it(&format!("update_mesh (res={})", resolution), 20, || {
            surface.update_mesh(&mut mesh);
        });
    }

    println!("\n--- Grid Lines ---");
    for &frequency in &[5.0, 20.0, 50.0] {
        let mut params = SceneParams::default();
        params.set_grid_frequency(frequency);
        let mut surface = DeformableGridSurface::new(SurfaceConfig::from_params(&params));
        surface.recompute(sources.as_slice(), 1.0);
        time_it(&format!("grid_lines (freq={})", frequency), 50, || {
            let lines = surface.grid_lines();
            assert!(!lines.is_empty());
        });
    }

    println!("\n--- Free Fall ---");
    let params = FallParams::default();
    time_it("1000 steps at 1 ms", 100, || {
        let mut integrator = FreeFallIntegrator::new(params.height);
        integrator.start(&params);
        for i in 0..1000 {
            integrator.step(i as f32 * 0.001, 0.001, &params);
        }
    });

    println!("\n--- Compositor Tick ---");
    let mut scene = SceneParams::default().with_planet_count(5);
    scene.add_mass(AdditionalMass::new(3.0, -2.0, 1.0)).ok();
    scene.add_mass(AdditionalMass::new(-4.0, 1.0, 1.5)).ok();
    let fall = FallParams::default();
    let mut compositor = SceneCompositor::with_seed(42);
    let mut log = MetricsLog::default();
    time_it("tick (res=150, 5 planets, 3 sources)", 100, || {
        compositor.tick(1.0 / 60.0, &scene, &fall, &mut log);
    });

    println!("\n=== Benchmarks Complete ===\n");
}
