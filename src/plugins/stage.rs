// Static stage: the player camera, lighting, and the placeholder room used
// when no scanned environment mesh is streamed in. The panel poses match the
// fallback surface set so arrows land where targets spawn.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::plugins::arrow::{Collidable, CollidableKind, ENVIRONMENT_GROUP};

#[derive(Component)]
pub struct PlayerCamera;

pub struct StagePlugin;
impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_stage);
    }
}

fn spawn_stage(
    mut commands: Commands,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(0.0, 1.6, 0.0),
            ..default()
        },
        PlayerCamera,
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 6_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(4.0, 8.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        spawn_room_colliders(&mut commands, None);
        return;
    };

    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.38, 0.42),
        perceptual_roughness: 0.9,
        ..default()
    });
    spawn_room_colliders(&mut commands, Some((&mut *meshes, material)));
}

struct Panel {
    position: Vec3,
    half_extents: Vec3,
}

fn spawn_room_colliders(
    commands: &mut Commands,
    visuals: Option<(&mut Assets<Mesh>, Handle<StandardMaterial>)>,
) {
    // Floor and two side walls, mirroring the fallback surface poses.
    let panels = [
        Panel { position: Vec3::new(0.0, 0.0, -5.0), half_extents: Vec3::new(2.0, 0.02, 2.0) },
        Panel { position: Vec3::new(2.0, 1.5, -3.0), half_extents: Vec3::new(0.02, 1.0, 1.0) },
        Panel { position: Vec3::new(-2.0, 1.5, -3.0), half_extents: Vec3::new(0.02, 1.0, 1.0) },
    ];

    let mesh_handles = visuals.map(|(meshes, material)| {
        let handles: Vec<Handle<Mesh>> = panels
            .iter()
            .map(|p| {
                meshes.add(Mesh::from(Cuboid::new(
                    p.half_extents.x * 2.0,
                    p.half_extents.y * 2.0,
                    p.half_extents.z * 2.0,
                )))
            })
            .collect();
        (handles, material)
    });

    for (i, panel) in panels.iter().enumerate() {
        let mut entity = commands.spawn((
            SpatialBundle::from_transform(Transform::from_translation(panel.position)),
            Collider::cuboid(panel.half_extents.x, panel.half_extents.y, panel.half_extents.z),
            CollisionGroups::new(ENVIRONMENT_GROUP, Group::ALL),
            Collidable { kind: CollidableKind::Environment },
        ));
        if let Some((handles, material)) = &mesh_handles {
            entity.insert((handles[i].clone(), material.clone()));
        }
    }
}
