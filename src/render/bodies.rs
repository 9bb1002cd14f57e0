use bevy::prelude::*;

use super::{FALL_VIEW_ORIGIN, FALL_VIEW_SCALE};
use crate::config::{SceneParams, VisualizationType};
use crate::math::{Vector, plane_point};
use crate::scene::SceneCompositor;

#[derive(Component)]
pub struct PlanetView {
    pub index: usize,
}

#[derive(Component)]
pub struct CentralBodyView;

#[derive(Component)]
pub struct BlackHoleView;

#[derive(Component)]
pub struct AccretionDiskView;

#[derive(Component)]
pub struct MassMarker {
    pub index: usize,
}

#[derive(Component)]
pub struct FallingBodyView;

#[derive(Component)]
pub struct InfallView;

/// Screen-space name tag following an orbiting body (or the central one).
#[derive(Component)]
pub struct BodyLabel {
    pub index: i32,
}

/// Lift of mass markers above the deformed surface.
const MARKER_LIFT: f32 = 0.3;

const BLACK_HOLE_LABEL: &str = "Black Hole";
const BLACK_HOLE_LABEL_LIFT: f32 = 3.3;
const LABEL_FONT_SIZE: f32 = 14.0;

/// Map a simulated drop position into the drop column next to the grid.
pub fn fall_view_position(position: Vector) -> Vector {
    FALL_VIEW_ORIGIN + position * FALL_VIEW_SCALE
}

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

pub(super) fn spawn_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    compositor: Res<SceneCompositor>,
) {
    let center = compositor.central_position();
    let central = compositor.orbits().central();

    commands.spawn((
        CentralBodyView,
        Mesh3d(meshes.add(Sphere::new(central.size * 0.5))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: central.color.into(),
            ..default()
        })),
        Transform::from_translation(center),
    ));

    commands.spawn((
        BlackHoleView,
        Mesh3d(meshes.add(Sphere::new(0.8))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::BLACK,
            unlit: true,
            ..default()
        })),
        Transform::from_translation(center),
        Visibility::Hidden,
    ));

    commands.spawn((
        AccretionDiskView,
        Mesh3d(meshes.add(Torus::new(1.2, 2.4))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 0.6, 0.2, 0.8),
            emissive: LinearRgba::rgb(2.0, 0.8, 0.2),
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::from_translation(center).with_scale(Vec3::new(1.0, 0.1, 1.0)),
        Visibility::Hidden,
    ));

    let start = compositor.fall().body().position;
    commands.spawn((
        FallingBodyView,
        Mesh3d(meshes.add(Sphere::new(0.4))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.3, 0.3),
            ..default()
        })),
        Transform::from_translation(fall_view_position(start)),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(4.0, 4.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.25, 0.3),
            ..default()
        })),
        Transform::from_translation(FALL_VIEW_ORIGIN - Vec3::Y * 0.4),
    ));

    commands.spawn((
        InfallView,
        Mesh3d(meshes.add(Sphere::new(0.2))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.9, 1.0),
            emissive: LinearRgba::rgb(0.5, 0.5, 0.8),
            ..default()
        })),
        Transform::from_translation(compositor.infall().position()),
        Visibility::Hidden,
    ));
}

/// Keep one entity per orbiting planet, spawning and despawning as the
/// roster changes.
pub(super) fn sync_planets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    compositor: Res<SceneCompositor>,
    mut views: Query<(Entity, &PlanetView, &mut Transform)>,
) {
    let orbits = compositor.orbits();
    let mut present = Vec::with_capacity(orbits.planet_count());

    for (entity, view, mut transform) in views.iter_mut() {
        match orbits.planet(view.index) {
            Some(planet) => {
                transform.translation = planet.smoothed_position();
                transform.rotation = Quat::from_rotation_y(planet.spin());
                present.push(view.index);
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for planet in orbits.planets() {
        let index = planet.index as usize;
        if present.contains(&index) {
            continue;
        }
        commands.spawn((
            PlanetView { index },
            Mesh3d(meshes.add(Sphere::new(planet.size * 0.5))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: planet.color.into(),
                ..default()
            })),
            Transform::from_translation(planet.smoothed_position()),
        ));
    }
}

/// Swap between the planet and the black hole at the center.
pub(super) fn sync_central_bodies(
    compositor: Res<SceneCompositor>,
    scene: Res<SceneParams>,
    mut central: Query<
        (&mut Transform, &mut Visibility),
        (
            With<CentralBodyView>,
            Without<BlackHoleView>,
            Without<AccretionDiskView>,
        ),
    >,
    mut black_hole: Query<
        &mut Visibility,
        (
            With<BlackHoleView>,
            Without<CentralBodyView>,
            Without<AccretionDiskView>,
        ),
    >,
    mut disk: Query<
        (&mut Transform, &mut Visibility),
        (
            With<AccretionDiskView>,
            Without<CentralBodyView>,
            Without<BlackHoleView>,
        ),
    >,
) {
    let is_black_hole = scene.visualization == VisualizationType::BlackHole;
    let body = compositor.orbits().central();

    for (mut transform, mut visible) in central.iter_mut() {
        transform.translation = body.smoothed_position();
        transform.rotation = Quat::from_rotation_y(body.spin());
        *visible = visibility(!is_black_hole);
    }
    for mut visible in black_hole.iter_mut() {
        *visible = visibility(is_black_hole);
    }
    for (mut transform, mut visible) in disk.iter_mut() {
        transform.rotation = Quat::from_rotation_y(compositor.disk_angle());
        *visible = visibility(is_black_hole);
    }
}

/// Project each body's label anchor to the screen and move its text node
/// there. Labels behind the camera are hidden.
pub(super) fn sync_body_labels(
    mut commands: Commands,
    compositor: Res<SceneCompositor>,
    scene: Res<SceneParams>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut labels: Query<(Entity, &BodyLabel, &mut Node, &mut Text, &mut Visibility)>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let orbits = compositor.orbits();
    let center = orbits.center();
    let central = orbits.central();

    let mut wanted: Vec<(i32, &str, Vector)> = orbits
        .planets()
        .map(|planet| (planet.index, planet.label.as_str(), planet.label_anchor(center)))
        .collect();
    if scene.visualization == VisualizationType::BlackHole {
        wanted.push((
            central.index,
            BLACK_HOLE_LABEL,
            center + Vec3::Y * BLACK_HOLE_LABEL_LIFT,
        ));
    } else {
        wanted.push((central.index, central.label.as_str(), central.label_anchor(center)));
    }

    let mut present = Vec::with_capacity(wanted.len());
    for (entity, label, mut node, mut text, mut visible) in labels.iter_mut() {
        let Some(&(_, name, anchor)) = wanted.iter().find(|(index, ..)| *index == label.index)
        else {
            commands.entity(entity).despawn();
            continue;
        };
        present.push(label.index);
        if text.0 != name {
            text.0 = name.to_string();
        }
        match camera.world_to_viewport(camera_transform, anchor) {
            Ok(screen) => {
                node.left = Val::Px(screen.x);
                node.top = Val::Px(screen.y);
                *visible = Visibility::Visible;
            }
            Err(_) => *visible = Visibility::Hidden,
        }
    }

    for &(index, name, _) in wanted.iter().filter(|(index, ..)| !present.contains(index)) {
        commands.spawn((
            BodyLabel { index },
            Text::new(name),
            TextFont {
                font_size: LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
        ));
    }
}

/// One marker per additional mass, resting on the deformed surface.
pub(super) fn sync_mass_markers(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    compositor: Res<SceneCompositor>,
    mut markers: Query<(Entity, &MassMarker, &mut Transform)>,
) {
    let additional = compositor.sources().additional();
    let surface = compositor.surface();
    let marker_position = |position: Vector| {
        Vec3::new(
            position.x,
            surface.world_height_at(plane_point(position)) + MARKER_LIFT,
            position.z,
        )
    };

    let mut present = Vec::with_capacity(additional.len());
    for (entity, marker, mut transform) in markers.iter_mut() {
        match additional.get(marker.index) {
            Some(source) => {
                transform.translation = marker_position(source.position);
                transform.scale = Vec3::splat(0.5 + source.strength * 0.2);
                present.push(marker.index);
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for (index, source) in additional.iter().enumerate() {
        if present.contains(&index) {
            continue;
        }
        commands.spawn((
            MassMarker { index },
            Mesh3d(meshes.add(Sphere::new(0.5))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.8, 0.8, 0.95),
                ..default()
            })),
            Transform::from_translation(marker_position(source.position))
                .with_scale(Vec3::splat(0.5 + source.strength * 0.2)),
        ));
    }
}

/// Position the dropped body and squash it on impact.
pub(super) fn sync_falling_body(
    compositor: Res<SceneCompositor>,
    mut views: Query<&mut Transform, With<FallingBodyView>>,
) {
    let body = compositor.fall().body();
    for mut transform in views.iter_mut() {
        transform.translation = fall_view_position(body.position);
        transform.scale = Vec3::new(
            1.0 + body.squash * 0.5,
            (1.0 - body.squash).max(0.1),
            1.0 + body.squash * 0.5,
        );
    }
}

pub(super) fn sync_infall(
    compositor: Res<SceneCompositor>,
    mut views: Query<(&mut Transform, &mut Visibility), With<InfallView>>,
) {
    let infall = compositor.infall();
    for (mut transform, mut visible) in views.iter_mut() {
        transform.translation = infall.position();
        *visible = visibility(infall.is_active());
    }
}
