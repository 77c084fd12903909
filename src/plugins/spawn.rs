// Spawn planner: converts detected surfaces into target placements under
// distance, view-angle and spacing constraints.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::plugins::anchor::AnchorRegistry;
use crate::plugins::arrow::{Collidable, CollidableKind, TARGET_GROUP};
use crate::plugins::config::{GameConfig, SpawnTuning};
use crate::plugins::session::{Difficulty, GamePhase};
use crate::plugins::stage::PlayerCamera;
use crate::plugins::surface::{Surface, SurfaceKind, SurfaceRegistry};
use crate::plugins::target::{Destroying, MovingTarget, Target, ZoneRadii};

#[derive(Debug, Clone, Copy)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub rotation: Quat,
    pub kind: SurfaceKind,
    pub is_real: bool,
    pub normal: Vec3,
}

/// Yaw-only look-at: the target stands upright and swivels toward the camera.
pub fn yaw_toward(from: Vec3, to: Vec3) -> Quat {
    let dir = to - from;
    Quat::from_rotation_y((-dir.x).atan2(-dir.z))
}

/// Placement on a classified surface, randomized within 60% of its extents.
pub fn propose_from_surface(
    surface: &Surface,
    camera_pos: Vec3,
    default_target_height: f32,
    cfg: &SpawnTuning,
    rng: &mut impl Rng,
) -> SpawnPoint {
    match surface.kind {
        SurfaceKind::Horizontal => {
            let mut position = surface.position;
            position.x += (rng.gen::<f32>() - 0.5) * surface.width * 0.6;
            position.z += (rng.gen::<f32>() - 0.5) * surface.height * 0.6;
            if surface.normal.y < -0.5 {
                // Ceiling-like: hang outward along the normal.
                position += surface.normal * cfg.ceiling_offset;
            } else {
                position.y += default_target_height;
            }
            SpawnPoint {
                position,
                rotation: yaw_toward(position, camera_pos),
                kind: SurfaceKind::Horizontal,
                is_real: surface.is_real,
                normal: surface.normal,
            }
        }
        _ => {
            let normal = surface.normal;
            let perpendicular = Vec3::new(-normal.z, 0.0, normal.x).normalize_or_zero();
            let mut position =
                surface.position + perpendicular * ((rng.gen::<f32>() - 0.5) * surface.width * 0.6);
            position.y += (rng.gen::<f32>() - 0.5) * surface.height * 0.6;
            position += normal * cfg.vertical_offset;
            SpawnPoint {
                position,
                rotation: Quat::from_rotation_arc(Vec3::NEG_Z, normal),
                kind: SurfaceKind::Vertical,
                is_real: surface.is_real,
                normal,
            }
        }
    }
}

/// Placement straight off the latest hit-test pose.
pub fn propose_from_hit_test(surface: &Surface, camera_pos: Vec3, cfg: &SpawnTuning) -> SpawnPoint {
    let normal = surface.normal;
    let is_ceiling = normal.y <= -0.5;
    let is_floor = normal.y >= 0.5;

    if is_floor || is_ceiling {
        let position = surface.position
            + normal * if is_ceiling { cfg.ceiling_offset + 0.1 } else { cfg.ceiling_offset };
        let mut rotation = yaw_toward(position, camera_pos);
        if is_ceiling {
            rotation *= Quat::from_rotation_x(std::f32::consts::PI);
        }
        SpawnPoint { position, rotation, kind: SurfaceKind::Horizontal, is_real: true, normal }
    } else {
        let position = surface.position + normal * cfg.vertical_offset;
        SpawnPoint {
            position,
            rotation: Quat::from_rotation_arc(Vec3::NEG_Z, normal),
            kind: SurfaceKind::Vertical,
            is_real: true,
            normal,
        }
    }
}

/// Distance / view-angle / spacing gate. The cone widens after the first
/// target so later spawns are not forced directly ahead.
pub fn validate_spawn(
    point: &SpawnPoint,
    camera_pos: Vec3,
    camera_forward: Vec3,
    first_spawned: bool,
    active_positions: &[Vec3],
    cfg: &SpawnTuning,
) -> bool {
    let distance = point.position.distance(camera_pos);
    if distance < cfg.min_distance || distance > cfg.max_distance {
        return false;
    }

    let to_target = (point.position - camera_pos).normalize_or_zero();
    let angle = camera_forward.angle_between(to_target).to_degrees();
    let max_angle = if first_spawned { cfg.max_angle_deg } else { cfg.first_max_angle_deg };
    if angle > max_angle {
        return false;
    }

    !active_positions
        .iter()
        .any(|p| p.distance(point.position) < cfg.min_spacing)
}

/// Flip the yaw 180 degrees when the computed forward points away from the
/// player, so the scoring face is always visible.
pub fn ensure_facing_camera(point: &mut SpawnPoint, camera_pos: Vec3) {
    let to_camera = (camera_pos - point.position).normalize_or_zero();
    let forward = point.rotation * Vec3::NEG_Z;
    let back = point.rotation * Vec3::Z;
    if forward.dot(to_camera) < back.dot(to_camera) || forward.dot(to_camera) < 0.0 {
        point.rotation = Quat::from_rotation_y(std::f32::consts::PI) * point.rotation;
    }
}

// ----------------------- Plugin -----------------------

#[derive(Resource)]
pub struct SpawnState {
    pub timer: Timer,
    pub first_spawned: bool,
}
impl Default for SpawnState {
    fn default() -> Self {
        Self { timer: Timer::from_seconds(0.5, TimerMode::Repeating), first_spawned: false }
    }
}
impl SpawnState {
    pub fn reset(&mut self) {
        self.timer.reset();
        self.first_spawned = false;
    }
}

#[derive(Resource)]
pub struct TargetAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

pub struct SpawnPlugin;
impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SpawnState::default())
            .init_resource::<GameConfig>()
            .init_resource::<GamePhase>()
            .init_resource::<AnchorRegistry>()
            .add_systems(Startup, (configure_spawn_timer, setup_target_assets))
            .add_systems(Update, spawn_targets);
    }
}

fn configure_spawn_timer(cfg: Res<GameConfig>, mut state: ResMut<SpawnState>) {
    state.timer = Timer::from_seconds(cfg.spawn.interval, TimerMode::Repeating);
}

fn setup_target_assets(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        return;
    };
    commands.insert_resource(TargetAssets {
        mesh: meshes.add(Mesh::from(bevy::math::primitives::Cylinder::new(
            cfg.target.outer_radius,
            0.04,
        ))),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.85, 0.15, 0.12),
            ..default()
        }),
    });
}

fn spawn_targets(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<GameConfig>,
    phase: Res<GamePhase>,
    mut state: ResMut<SpawnState>,
    registry: Res<SurfaceRegistry>,
    mut anchors: ResMut<AnchorRegistry>,
    assets: Option<Res<TargetAssets>>,
    q_camera: Query<&GlobalTransform, With<PlayerCamera>>,
    q_targets: Query<&Transform, (With<Target>, Without<Destroying>)>,
) {
    if *phase != GamePhase::Running {
        return;
    }
    if !state.timer.tick(time.delta()).just_finished() {
        return;
    }

    let active_positions: Vec<Vec3> = q_targets.iter().map(|t| t.translation).collect();
    if active_positions.len() >= cfg.spawn.max_targets {
        return;
    }

    let now = time.elapsed_seconds();
    if !registry.has_available_surface(now, &cfg.surface, cfg.session.require_real_surfaces) {
        return;
    }
    let Ok(camera) = q_camera.get_single() else {
        return; // no camera yet: no valid spawn this tick
    };
    let camera_pos = camera.translation();
    let camera_forward = *camera.forward();

    let mut rng = rand::thread_rng();

    // Hit-test surfaces win over the generic classified lists.
    let proposal = if registry.hit_test_active(now, cfg.surface.hit_test_recency) {
        registry
            .latest_hit_test()
            .map(|s| propose_from_hit_test(s, camera_pos, &cfg.spawn))
    } else {
        None
    };
    let proposal = proposal.or_else(|| {
        pick_surface(&registry, cfg.spawn.preferred_surface, &mut rng).map(|s| {
            propose_from_surface(
                &s,
                camera_pos,
                cfg.surface.default_target_height,
                &cfg.spawn,
                &mut rng,
            )
        })
    });
    let Some(mut point) = proposal else {
        return;
    };

    if !validate_spawn(
        &point,
        camera_pos,
        camera_forward,
        state.first_spawned,
        &active_positions,
        &cfg.spawn,
    ) {
        return;
    }
    ensure_facing_camera(&mut point, camera_pos);

    let (mut points, hp) = cfg.session.difficulty.roll(&mut rng);
    if point.kind == SurfaceKind::Vertical {
        points = (points as f32 * cfg.spawn.vertical_bonus).floor() as u32;
    }
    let scale = rng.gen_range(cfg.spawn.min_scale..cfg.spawn.max_scale);
    let radii = ZoneRadii::new(
        cfg.target.center_radius,
        cfg.target.middle_radius,
        cfg.target.outer_radius,
    );

    let entity = commands
        .spawn((
            SpatialBundle::from_transform(
                Transform::from_translation(point.position)
                    .with_rotation(point.rotation)
                    .with_scale(Vec3::splat(scale)),
            ),
            Target::new(points, hp, radii, point.kind),
            Collidable { kind: CollidableKind::Target },
        ))
        .with_children(|parent| {
            // Disc mesh and collider are Y-aligned; stand them up so the
            // scoring face spans the parent's local XY plane.
            let face = Transform::from_rotation(Quat::from_rotation_x(
                std::f32::consts::FRAC_PI_2,
            ));
            let mut child = parent.spawn((
                SpatialBundle::from_transform(face),
                Collider::cylinder(0.02, cfg.target.outer_radius),
                CollisionGroups::new(TARGET_GROUP, Group::ALL),
            ));
            if let Some(assets) = assets.as_ref() {
                child.insert((assets.mesh.clone(), assets.material.clone()));
            }
        })
        .id();

    // Hard sessions mix in drifting targets.
    if cfg.session.difficulty == Difficulty::Hard && rng.gen::<f32>() < 0.3 {
        commands
            .entity(entity)
            .insert(MovingTarget { origin: point.position, elapsed: 0.0 });
    }

    if point.is_real {
        if let Some(anchor) = anchors.create(point.position, point.rotation) {
            anchors.attach(anchor, entity);
        }
    }

    state.first_spawned = true;
    info!(
        "target spawned points={} hp={} kind={:?} scale={:.2} real={}",
        points, hp, point.kind, scale, point.is_real
    );
}

/// Picks from the classified lists. A `Horizontal`/`Vertical` preference is
/// strict; `Random` draws either, weighted by how many of each were detected.
pub fn pick_surface(
    registry: &SurfaceRegistry,
    preferred: SurfaceKind,
    rng: &mut impl Rng,
) -> Option<Surface> {
    match preferred {
        SurfaceKind::Horizontal => registry.horizontal.first().copied(),
        SurfaceKind::Vertical => registry.vertical.first().copied(),
        SurfaceKind::Random => {
            let total = registry.horizontal.len() + registry.vertical.len();
            if total == 0 {
                return None;
            }
            if rng.gen::<f32>() < registry.horizontal.len() as f32 / total as f32 {
                registry.horizontal.first().copied()
            } else {
                registry.vertical.first().copied().or_else(|| registry.horizontal.first().copied())
            }
        }
    }
}
