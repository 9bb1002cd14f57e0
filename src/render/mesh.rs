use bevy::prelude::*;

use crate::config::SURFACE_Y_OFFSET;
use crate::scene::SceneCompositor;
use crate::surface::SurfaceChange;

/// The deformed grid mesh.
#[derive(Component)]
pub struct SurfaceView;

pub(super) fn spawn_surface(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    compositor: Res<SceneCompositor>,
) {
    let material = StandardMaterial {
        base_color: Color::WHITE,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        perceptual_roughness: 0.8,
        ..default()
    };
    commands.spawn((
        SurfaceView,
        Mesh3d(meshes.add(compositor.surface().build_mesh())),
        MeshMaterial3d(materials.add(material)),
        Transform::from_xyz(0.0, SURFACE_Y_OFFSET, 0.0),
    ));
}

/// Push this frame's heights and colors into the mesh asset.
pub(super) fn upload_surface_mesh(
    compositor: Res<SceneCompositor>,
    mut meshes: ResMut<Assets<Mesh>>,
    views: Query<&Mesh3d, With<SurfaceView>>,
) {
    let surface = compositor.surface();
    let rebuild = compositor.last_report().surface_change == SurfaceChange::Topology;
    for handle in &views {
        let Some(mesh) = meshes.get_mut(&handle.0) else {
            continue;
        };
        if rebuild {
            *mesh = surface.build_mesh();
        } else {
            surface.update_mesh(mesh);
        }
    }
}
