// Arrow flight simulation: hand-integrated kinematics with a two-phase model
// (drag-damped flight, then dead-arrow ballistic fall), ray-based collision
// against registered collidables, and attach / plant resolution.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::plugins::config::{ArrowTuning, GameConfig};
use crate::plugins::menu::{MenuButton, MenuHitEvent};
use crate::plugins::target::{Target, TargetStruckEvent};

pub const TARGET_GROUP: Group = Group::GROUP_1;
pub const ENVIRONMENT_GROUP: Group = Group::GROUP_2;

const SURFACE_OFFSET: f32 = 0.1; // lift off the hit surface to avoid z-fighting
const ORIENT_SPEED_MIN: f32 = 0.1;

/// Forward-only flight states. An arrow never returns to `Flying` once it has
/// started falling, and never moves again once attached or planted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowMode {
    Flying,
    Falling,
    Attached,
    Planted,
}

impl ArrowMode {
    pub fn in_flight(self) -> bool {
        matches!(self, ArrowMode::Flying | ArrowMode::Falling)
    }
}

#[derive(Component)]
pub struct Arrow;

#[derive(Component)]
pub struct ArrowKinematic {
    pub velocity: Vec3,
    pub mode: ArrowMode,
    pub lifetime: f32,
    pub has_collided: bool, // one-shot latch against double resolution
}

impl ArrowKinematic {
    pub fn launched(velocity: Vec3) -> Self {
        Self { velocity, mode: ArrowMode::Flying, lifetime: 0.0, has_collided: false }
    }
}

/// Registered collidable classification, resolved by walking the hit
/// collider's ancestry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollidableKind {
    Target,
    Environment,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Collidable {
    pub kind: CollidableKind,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ArrowCollisionEvent {
    pub arrow: Entity,
    pub hit: Entity,
    pub point: Vec3,
    pub normal: Option<Vec3>,
}

// Delayed shrink-and-remove for arrows stuck in the environment.
#[derive(Component)]
pub struct PlantedArrow {
    delay: Timer,
    shrink: Timer,
    base_scale: Vec3,
}

#[derive(Resource)]
pub struct ArrowAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// One integration step. Returns the displacement for the tick; the velocity
/// and mode are updated in place.
pub fn step_flight(kin: &mut ArrowKinematic, dt: f32, tuning: &ArrowTuning) -> Vec3 {
    let speed = kin.velocity.length();

    if kin.mode == ArrowMode::Flying && speed < tuning.fall_speed_threshold {
        kin.mode = ArrowMode::Falling;
    }

    match kin.mode {
        ArrowMode::Flying => {
            let mut accel = Vec3::NEG_Y * tuning.gravity;
            if speed > 1e-4 {
                // Quadratic drag opposing the velocity.
                accel += kin.velocity / speed * (-tuning.drag_coefficient * speed * speed / tuning.mass);
            }
            kin.velocity += accel * dt;
        }
        ArrowMode::Falling => {
            // Strong real gravity, no drag.
            kin.velocity.y -= tuning.fall_gravity * dt;
        }
        _ => return Vec3::ZERO,
    }

    kin.velocity * dt
}

pub fn spawn_arrow(
    commands: &mut Commands,
    assets: Option<&ArrowAssets>,
    position: Vec3,
    rotation: Quat,
    speed: f32,
) -> Entity {
    let velocity = rotation * Vec3::NEG_Z * speed;
    let mut arrow = commands.spawn((
        SpatialBundle::from_transform(
            Transform::from_translation(position).with_rotation(rotation),
        ),
        Arrow,
        ArrowKinematic::launched(velocity),
    ));
    if let Some(assets) = assets {
        arrow.with_children(|parent| {
            parent.spawn(PbrBundle {
                mesh: assets.mesh.clone(),
                material: assets.material.clone(),
                // Shaft mesh is Y-aligned; arrows fly along -Z.
                transform: Transform::from_rotation(Quat::from_rotation_x(
                    -std::f32::consts::FRAC_PI_2,
                )),
                ..default()
            });
        });
    }
    arrow.id()
}

// ----------------------- Plugin -----------------------

pub struct ArrowPlugin;
impl Plugin for ArrowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .add_event::<ArrowCollisionEvent>()
            .add_event::<TargetStruckEvent>()
            .add_event::<MenuHitEvent>()
            .add_systems(Startup, setup_arrow_assets)
            .add_systems(
                FixedUpdate,
                (arrow_flight, resolve_arrow_collisions.after(arrow_flight)),
            )
            .add_systems(Update, update_planted_arrows);
    }
}

fn setup_arrow_assets(
    mut commands: Commands,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    // Headless runs carry no asset storage; arrows then fly without visuals.
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        return;
    };
    commands.insert_resource(ArrowAssets {
        mesh: meshes.add(Mesh::from(bevy::math::primitives::Cylinder::new(0.008, 0.6))),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.45, 0.30, 0.15),
            ..default()
        }),
    });
}

fn arrow_flight(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    rapier: Option<Res<RapierContext>>,
    mut q_arrows: Query<(Entity, &mut Transform, &mut ArrowKinematic), With<Arrow>>,
    q_buttons: Query<(&GlobalTransform, &MenuButton)>,
    mut ev_menu: EventWriter<MenuHitEvent>,
    mut ev_collision: EventWriter<ArrowCollisionEvent>,
) {
    let dt = 1.0 / 60.0;
    let tuning = cfg.arrow;

    'arrows: for (entity, mut transform, mut kin) in &mut q_arrows {
        if kin.has_collided || !kin.mode.in_flight() {
            continue;
        }

        kin.lifetime += dt;
        if kin.lifetime > tuning.max_lifetime {
            info!("arrow removed at lifetime ceiling t={:.1}s", kin.lifetime);
            commands.entity(entity).despawn_recursive();
            continue;
        }
        // Shorter cutoff for arrows that never hit anything.
        if kin.lifetime > tuning.no_hit_expiry {
            info!("arrow expired with no collision after {:.0}s", tuning.no_hit_expiry);
            commands.entity(entity).despawn_recursive();
            continue;
        }

        let displacement = step_flight(&mut kin, dt, &tuning);
        let speed = kin.velocity.length();
        if speed > ORIENT_SPEED_MIN {
            transform.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, kin.velocity / speed);
        }

        // Interactive menu elements are reachable by arrow impact and
        // short-circuit normal flight.
        let position = transform.translation;
        for (button_global, button) in &q_buttons {
            if button_global.translation().distance(position) < button.radius {
                info!("menu button hit by arrow");
                ev_menu.send(MenuHitEvent { action: button.action });
                kin.has_collided = true;
                commands.entity(entity).despawn_recursive();
                continue 'arrows;
            }
        }

        let ray_len = displacement.length();
        let ray_dir = if ray_len > 1e-6 {
            displacement / ray_len
        } else {
            kin.velocity.normalize_or_zero()
        };
        if ray_dir == Vec3::ZERO {
            continue;
        }

        if let Some(rapier) = rapier.as_ref() {
            // 1.2x margin guards against tunneling at high tick displacement.
            let filter = QueryFilter::new().exclude_collider(entity).groups(
                CollisionGroups::new(Group::ALL, TARGET_GROUP | ENVIRONMENT_GROUP),
            );
            if let Some((hit, intersection)) = rapier.cast_ray_and_get_normal(
                position,
                ray_dir,
                (ray_len * 1.2).max(1e-3),
                true,
                filter,
            ) {
                if intersection.time_of_impact <= ray_len {
                    kin.has_collided = true;
                    let normal = intersection.normal;
                    ev_collision.send(ArrowCollisionEvent {
                        arrow: entity,
                        hit,
                        point: intersection.point,
                        normal: (normal.length_squared() > 1e-6).then_some(normal),
                    });
                    continue;
                }
            }
        }

        transform.translation += displacement;
    }
}

fn resolve_arrow_collisions(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut ev_collision: EventReader<ArrowCollisionEvent>,
    q_collidable: Query<&Collidable>,
    q_parents: Query<&Parent>,
    mut q_arrows: Query<(&mut Transform, &mut ArrowKinematic), With<Arrow>>,
    q_targets: Query<&GlobalTransform, With<Target>>,
    mut ev_struck: EventWriter<TargetStruckEvent>,
) {
    for collision in ev_collision.read() {
        let Ok((mut arrow_t, mut kin)) = q_arrows.get_mut(collision.arrow) else {
            continue;
        };
        if !kin.mode.in_flight() {
            continue;
        }

        // A hit on unregistered geometry counts as environment.
        let (owner, kind) = find_collidable(collision.hit, &q_collidable, &q_parents)
            .unwrap_or((collision.hit, CollidableKind::Environment));

        match kind {
            CollidableKind::Target => {
                let Ok(target_global) = q_targets.get(owner) else {
                    plant_arrow(&mut commands, &cfg.arrow, collision, &mut arrow_t, &mut kin);
                    continue;
                };
                ev_struck.send(TargetStruckEvent {
                    target: owner,
                    arrow: collision.arrow,
                    world_impact: collision.point,
                });

                // Re-parent under the target, preserving world rotation; the
                // arrow's lifecycle is now bound to the target.
                let offset_point =
                    collision.point + collision.normal.unwrap_or(Vec3::ZERO) * SURFACE_OFFSET;
                let (_, target_rot, _) = target_global.to_scale_rotation_translation();
                let world_rot = arrow_t.rotation;
                arrow_t.translation =
                    target_global.affine().inverse().transform_point3(offset_point);
                arrow_t.rotation = target_rot.inverse() * world_rot;
                kin.velocity = Vec3::ZERO;
                kin.mode = ArrowMode::Attached;
                commands.entity(collision.arrow).set_parent(owner);
            }
            CollidableKind::Environment => {
                plant_arrow(&mut commands, &cfg.arrow, collision, &mut arrow_t, &mut kin);
            }
        }
    }
}

fn plant_arrow(
    commands: &mut Commands,
    tuning: &ArrowTuning,
    collision: &ArrowCollisionEvent,
    arrow_t: &mut Transform,
    kin: &mut ArrowKinematic,
) {
    // Missing face normal is tolerated: the offset step is simply skipped.
    arrow_t.translation = collision.point + collision.normal.unwrap_or(Vec3::ZERO) * SURFACE_OFFSET;
    kin.velocity = Vec3::ZERO;
    kin.mode = ArrowMode::Planted;
    commands.entity(collision.arrow).insert(PlantedArrow {
        delay: Timer::from_seconds(tuning.plant_delay, TimerMode::Once),
        shrink: Timer::from_seconds(tuning.plant_shrink, TimerMode::Once),
        base_scale: arrow_t.scale,
    });
}

fn find_collidable(
    hit: Entity,
    q_collidable: &Query<&Collidable>,
    q_parents: &Query<&Parent>,
) -> Option<(Entity, CollidableKind)> {
    let mut current = hit;
    loop {
        if let Ok(collidable) = q_collidable.get(current) {
            return Some((current, collidable.kind));
        }
        match q_parents.get(current) {
            Ok(parent) => current = parent.get(),
            Err(_) => return None,
        }
    }
}

fn update_planted_arrows(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Transform, &mut PlantedArrow)>,
) {
    for (entity, mut transform, mut planted) in &mut q {
        if !planted.delay.tick(time.delta()).finished() {
            continue;
        }
        planted.shrink.tick(time.delta());
        transform.scale = planted.base_scale * (1.0 - planted.shrink.fraction());
        if planted.shrink.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
