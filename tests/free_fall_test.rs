//! Free-fall integrator scenarios
//!
//! Vacuum drops against the closed form, bounce damping, the terminal
//! velocity clamp, zero gravity and reset.

use approx::assert_relative_eq;
use spacetime_sim::config::{FallParams, find_environment, find_shape};
use spacetime_sim::fall::{FallPhase, FallingBody, FreeFallIntegrator, step_body};

const DT: f32 = 0.001;

#[test]
fn vacuum_drop_matches_closed_form() {
    let params = FallParams::vacuum(100.0, 9.8);
    let mut integrator = FreeFallIntegrator::new(params.height);
    integrator.start(&params);

    let mut time = 0.0;
    let mut landing = None;
    for _ in 0..10_000 {
        time += DT;
        let Some(report) = integrator.step(time, DT, &params) else {
            break;
        };
        if report.metrics.impact {
            landing = Some(report.metrics);
            break;
        }
    }

    let landing = landing.expect("body never reached the ground");
    assert_relative_eq!(landing.elapsed_time, 4.5175, epsilon = 0.02);
    assert_relative_eq!(landing.velocity, 44.27, epsilon = 0.1);
    assert_eq!(landing.height, 0.0);
    assert_relative_eq!(
        landing.elapsed_time,
        params.theoretical_fall_time(),
        epsilon = 0.02
    );
}

#[test]
fn impact_is_flagged_exactly_once() {
    let params = FallParams::vacuum(30.0, 9.8);
    let mut integrator = FreeFallIntegrator::new(params.height);
    integrator.start(&params);

    let mut impacts = 0;
    let mut time = 0.0;
    for _ in 0..60_000 {
        time += DT;
        match integrator.step(time, DT, &params) {
            Some(report) => impacts += report.metrics.impact as usize,
            None => break,
        }
    }
    assert_eq!(impacts, 1);
    assert_eq!(integrator.phase(), FallPhase::Idle);
}

#[test]
fn bounce_peaks_strictly_decrease() {
    let params = FallParams::vacuum(50.0, 9.8);
    let mut body = FallingBody::at_height(params.height);
    let mut peaks = Vec::new();
    let mut current_peak = body.height();
    let mut time = 0.0;

    for _ in 0..200_000 {
        let step = step_body(body, time, DT, &params).expect("positive step");
        body = step.body;
        time += DT;
        if step.contact {
            peaks.push(current_peak);
            current_peak = 0.0;
            if body.resting {
                break;
            }
        } else {
            current_peak = current_peak.max(body.height());
        }
    }

    assert!(body.resting, "body never settled");
    assert!(peaks.len() >= 4, "too few bounces: {peaks:?}");
    for pair in peaks.windows(2) {
        assert!(pair[1] < pair[0], "peaks did not decrease: {peaks:?}");
    }
}

#[test]
fn overly_bouncy_request_still_loses_height() {
    let params = FallParams::vacuum(50.0, 9.8).with_restitution(1.5);
    let mut body = FallingBody::at_height(params.height);
    let mut peaks = Vec::new();
    let mut current_peak = body.height();
    let mut time = 0.0;

    for _ in 0..200_000 {
        let step = step_body(body, time, DT, &params).expect("positive step");
        body = step.body;
        time += DT;
        if step.contact {
            peaks.push(current_peak);
            current_peak = 0.0;
            if peaks.len() > 6 {
                break;
            }
        } else {
            current_peak = current_peak.max(body.height());
        }
    }

    assert!(peaks.len() > 6, "too few bounces: {peaks:?}");
    for pair in peaks.windows(2) {
        assert!(pair[1] < pair[0], "peaks did not decrease: {peaks:?}");
    }
}

#[test]
fn terminal_velocity_is_never_exceeded() {
    // Only dense atmospheres or large areas get close within 200 m.
    for (environment, shape) in [("earth", "parachute"), ("venus", "sphere"), ("venus", "cube")] {
        let params = FallParams::default()
            .with_height(200.0)
            .with_environment(find_environment(environment).unwrap())
            .with_shape(find_shape(shape).unwrap());
        let terminal = params.terminal_velocity();
        assert!(terminal.is_finite());

        let mut body = FallingBody::at_height(params.height);
        let mut time = 0.0;
        let mut fastest: f32 = 0.0;
        for _ in 0..100_000 {
            let step = step_body(body, time, DT, &params).unwrap();
            body = step.body;
            time += DT;
            if step.contact {
                break;
            }
            fastest = fastest.max(body.speed());
            assert!(
                body.speed() <= terminal * 1.001,
                "{shape}: {} > {terminal}",
                body.speed()
            );
        }
        assert!(fastest > terminal * 0.9, "{shape} never approached terminal velocity");
    }
}

#[test]
fn parachute_terminal_velocity_value() {
    let params = FallParams::default().with_shape(find_shape("parachute").unwrap());
    let expected = (2.0 * 10.0 * 9.80665_f32 / (1.225 * 1.35 * 0.28)).sqrt();
    assert_relative_eq!(params.terminal_velocity(), expected, epsilon = 1e-3);
}

#[test]
fn zero_gravity_keeps_height() {
    let params = FallParams::default()
        .with_environment(find_environment("space").unwrap())
        .with_wind_force(20.0);
    assert_eq!(params.gravity, 0.0);
    assert_eq!(params.terminal_velocity(), f32::INFINITY);

    let mut integrator = FreeFallIntegrator::new(params.height);
    integrator.start(&params);
    let mut time = 0.0;
    for _ in 0..20_000 {
        time += DT;
        let report = integrator.step(time, DT, &params).unwrap();
        assert_eq!(report.metrics.height, params.height);
        assert!(!report.metrics.impact);
    }
    assert_eq!(integrator.phase(), FallPhase::Falling);
}

#[test]
fn reset_while_falling_restores_the_start() {
    let params = FallParams::default().with_height(80.0);
    let mut integrator = FreeFallIntegrator::new(params.height);
    integrator.start(&params);
    let mut time = 0.0;
    for _ in 0..1_500 {
        time += DT;
        integrator.step(time, DT, &params);
    }
    assert!(integrator.body().height() < 80.0);

    integrator.reset(&params);
    assert_eq!(*integrator.body(), FallingBody::at_height(80.0));
    assert_eq!(integrator.body().squash, 0.0);
    assert_eq!(integrator.phase(), FallPhase::Idle);
    assert_eq!(integrator.elapsed(), 0.0);
    assert_eq!(integrator.trail().count(), 0);
    assert!(integrator.step(time, DT, &params).is_none());
}
