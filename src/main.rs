use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use clap::Parser;
use spacetime_sim::config::{ENVIRONMENTS, OBJECT_SHAPES, find_environment, find_shape};
use spacetime_sim::{
    ColorScheme, ConfigError, FallParams, LiveMetrics, SceneCommand, SceneCommands,
    SceneCompositor, SceneParams, SpacetimePlugin, VisualizationType,
};

/// Interactive spacetime curvature and free-fall visualizer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of orbiting planets (1-5)
    #[arg(long, default_value_t = 2)]
    planets: usize,

    /// Strength of the central mass
    #[arg(long, default_value_t = 2.0)]
    mass: f32,

    /// default, cool, warm, neon or cosmic
    #[arg(long, default_value = "default")]
    color_scheme: String,

    /// Grid segments per axis (50-300)
    #[arg(long, default_value_t = 150)]
    resolution: u32,

    /// Start with a black hole at the center
    #[arg(long)]
    black_hole: bool,

    /// Drop environment (earth, moon, mars, jupiter, venus, space)
    #[arg(long, default_value = "earth")]
    environment: String,

    /// Dropped object shape (sphere, cube, teardrop, parachute, human, feather)
    #[arg(long, default_value = "sphere")]
    shape: String,

    /// Drop height in meters (10-200)
    #[arg(long, default_value_t = 100.0)]
    height: f32,
}

impl Args {
    fn scene_params(&self) -> Result<SceneParams, ConfigError> {
        let visualization = if self.black_hole {
            VisualizationType::BlackHole
        } else {
            VisualizationType::Planet
        };
        Ok(SceneParams::default()
            .with_visualization(visualization)
            .with_mass_strength(self.mass)
            .with_planet_count(self.planets)
            .with_grid_resolution(self.resolution)
            .with_color_scheme(self.color_scheme.parse()?))
    }

    fn fall_params(&self) -> Result<FallParams, ConfigError> {
        Ok(FallParams::default()
            .with_environment(find_environment(&self.environment)?)
            .with_shape(find_shape(&self.shape)?)
            .with_height(self.height))
    }
}

fn init(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(8.0, 6.0, 8.0).looking_at(Vec3::new(0.0, -1.5, 0.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 2_000_000.0,
            range: 60.0,
            ..default()
        },
        Transform::from_xyz(-6.0, 8.0, -4.0),
    ));
}

fn controls(
    input: Res<ButtonInput<KeyCode>>,
    scene: Res<SceneParams>,
    fall: Res<FallParams>,
    mut queue: ResMut<SceneCommands>,
) {
    if input.just_pressed(KeyCode::Space) {
        queue.push(SceneCommand::TogglePlaying);
    }
    if input.just_pressed(KeyCode::ArrowUp) {
        queue.push(SceneCommand::SetMassStrength(scene.mass_strength + 0.2));
    }
    if input.just_pressed(KeyCode::ArrowDown) {
        queue.push(SceneCommand::SetMassStrength(scene.mass_strength - 0.2));
    }
    if input.just_pressed(KeyCode::ArrowRight) {
        queue.push(SceneCommand::SetTimeScale(scene.time_scale + 0.1));
    }
    if input.just_pressed(KeyCode::ArrowLeft) {
        queue.push(SceneCommand::SetTimeScale(scene.time_scale - 0.1));
    }
    if input.just_pressed(KeyCode::KeyP) {
        queue.push(SceneCommand::SetPlanetCount(scene.planet_count + 1));
    }
    if input.just_pressed(KeyCode::KeyO) {
        queue.push(SceneCommand::SetPlanetCount(scene.planet_count.saturating_sub(1)));
    }
    if input.just_pressed(KeyCode::KeyM) {
        queue.push(SceneCommand::AddMass(None));
    }
    if input.just_pressed(KeyCode::KeyN) && !scene.additional_masses.is_empty() {
        queue.push(SceneCommand::RemoveMass(scene.additional_masses.len() - 1));
    }
    if input.just_pressed(KeyCode::KeyG) {
        queue.push(SceneCommand::SetShowGrid(!scene.show_grid));
    }
    if input.just_pressed(KeyCode::KeyC) {
        queue.push(SceneCommand::SetColorScheme(scene.color_scheme.next()));
    }
    if input.just_pressed(KeyCode::KeyR) {
        queue.push(SceneCommand::SetGridResolution(scene.grid_resolution + 25));
    }
    if input.just_pressed(KeyCode::KeyF) {
        queue.push(SceneCommand::SetGridResolution(
            scene.grid_resolution.saturating_sub(25),
        ));
    }
    if input.just_pressed(KeyCode::BracketRight) {
        queue.push(SceneCommand::SetGridFrequency(scene.grid_frequency + 5.0));
    }
    if input.just_pressed(KeyCode::BracketLeft) {
        queue.push(SceneCommand::SetGridFrequency(scene.grid_frequency - 5.0));
    }
    if input.just_pressed(KeyCode::KeyX) {
        queue.push(SceneCommand::SetWaveAmplitude(scene.wave_amplitude + 0.05));
    }
    if input.just_pressed(KeyCode::KeyZ) {
        queue.push(SceneCommand::SetWaveAmplitude(scene.wave_amplitude - 0.05));
    }
    if input.just_pressed(KeyCode::KeyB) {
        queue.push(SceneCommand::SetVisualization(scene.visualization.toggled()));
    }
    if input.just_pressed(KeyCode::KeyD) {
        queue.push(SceneCommand::StartFall);
    }
    if input.just_pressed(KeyCode::Backspace) {
        queue.push(SceneCommand::ResetFall);
    }
    if input.just_pressed(KeyCode::Enter) {
        queue.push(SceneCommand::Reset);
    }
    if input.just_pressed(KeyCode::KeyI) {
        queue.push(SceneCommand::StartInfall);
    }
    if input.just_pressed(KeyCode::KeyS) {
        queue.push(SceneCommand::SetSlowMotion(fall.slow_motion.next()));
    }
    if input.just_pressed(KeyCode::KeyW) {
        let wind = if fall.wind_force > 0.0 { 0.0 } else { 20.0 };
        queue.push(SceneCommand::SetWindForce(wind));
    }
    if input.just_pressed(KeyCode::KeyA) {
        queue.push(SceneCommand::SetAirResistance(!fall.air_resistance));
    }
    if input.just_pressed(KeyCode::KeyE) {
        let current = ENVIRONMENTS
            .iter()
            .position(|env| env.name == fall.environment.name)
            .unwrap_or(0);
        let next = ENVIRONMENTS[(current + 1) % ENVIRONMENTS.len()];
        queue.push(SceneCommand::SetEnvironment(next));
    }
    if input.just_pressed(KeyCode::KeyH) {
        let current = OBJECT_SHAPES
            .iter()
            .position(|shape| shape.name == fall.shape.name)
            .unwrap_or(0);
        let next = OBJECT_SHAPES[(current + 1) % OBJECT_SHAPES.len()];
        queue.push(SceneCommand::SetShape(next));
    }
}

#[derive(Component)]
struct DiagnosticsText;

fn setup_diagnostics(mut commands: Commands) {
    commands.spawn((
        Text::default(),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        DiagnosticsText,
    ));
}

fn update_diagnostics(
    diagnostics: Res<DiagnosticsStore>,
    scene: Res<SceneParams>,
    fall: Res<FallParams>,
    compositor: Res<SceneCompositor>,
    live: Res<LiveMetrics>,
    mut query: Query<&mut Text, With<DiagnosticsText>>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);

    let mut lines = vec![
        format!("FPS: {fps:.1}"),
        format!(
            "t = {:.2} s x{:.1} {}",
            compositor.clock().elapsed(),
            scene.time_scale,
            if scene.is_playing { "" } else { "(paused)" }
        ),
        format!(
            "Mass: {:.1} ({:?})  Planets: {}  Extra masses: {}",
            scene.effective_mass_strength(),
            scene.visualization,
            compositor.orbits().planet_count(),
            scene.additional_masses.len()
        ),
        format!(
            "Grid: {} seg, {} lines, wave {:.2}, {}",
            scene.grid_resolution, scene.grid_frequency, scene.wave_amplitude, scene.color_scheme
        ),
        format!(
            "Drop: {} in {} ({:.0} m, {:.0} kg, wind {:.0} N, drag {}, {:?})",
            fall.shape.name,
            fall.environment.name,
            fall.height,
            fall.mass,
            fall.wind_force,
            if fall.air_resistance { "on" } else { "off" },
            fall.slow_motion
        ),
    ];

    let terminal = fall.terminal_velocity();
    if terminal.is_finite() {
        lines.push(format!("Terminal velocity: {terminal:.1} m/s"));
    }
    if let Some(metrics) = live.latest {
        lines.push(format!(
            "h = {:.2} m  v = {:.2} m/s  a = {:.2} m/s^2  t = {:.2} s{}",
            metrics.height,
            metrics.velocity,
            metrics.acceleration,
            metrics.elapsed_time,
            if metrics.impact { "  IMPACT" } else { "" }
        ));
        lines.push(format!(
            "KE = {:.0} J  PE = {:.0} J  peak v = {:.2} m/s",
            fall.kinetic_energy(metrics.velocity),
            fall.potential_energy(metrics.height),
            live.peak_speed
        ));
    }

    for mut text in &mut query {
        text.0 = lines.join("\n");
    }
}

fn main() {
    let args = Args::parse();
    let (scene, fall) = match args.scene_params().and_then(|scene| Ok((scene, args.fall_params()?))) {
        Ok(params) => params,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("color schemes: {:?}", ColorScheme::ALL.map(|scheme| scheme.name()));
            std::process::exit(2);
        }
    };

    // Park the drop body at the requested height before the first frame.
    let mut queue = SceneCommands::default();
    queue.push(SceneCommand::ResetFall);

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(SpacetimePlugin)
        .insert_resource(scene)
        .insert_resource(fall)
        .insert_resource(queue)
        .add_systems(Startup, (init, setup_diagnostics))
        .add_systems(Update, (controls, update_diagnostics))
        .run();
}
