// Target entity: precision-zone scoring, HP, per-arrow hit dedup, and the
// destruction / feedback animations.
use bevy::prelude::*;
use std::collections::HashSet;

use crate::plugins::surface::SurfaceKind;

const HIT_FLASH_SECONDS: f32 = 0.15;
const DESTROY_SECONDS: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Bullseye,
    Middle,
    Outer,
    Edge,
}

impl Zone {
    pub fn multiplier(self) -> f32 {
        match self {
            Zone::Bullseye => 3.0,
            Zone::Middle => 2.0,
            Zone::Outer => 1.0,
            Zone::Edge => 0.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::Bullseye => "bullseye",
            Zone::Middle => "middle",
            Zone::Outer => "outer",
            Zone::Edge => "edge",
        }
    }

    fn scale_bump(self) -> f32 {
        match self {
            Zone::Bullseye => 1.3,
            Zone::Middle => 1.2,
            _ => 1.1,
        }
    }
}

/// Concentric scoring radii in target-local space. Local-space comparison makes
/// scoring scale-invariant: a small target has proportionally small world zones.
#[derive(Debug, Clone, Copy)]
pub struct ZoneRadii {
    pub center: f32,
    pub middle: f32,
    pub outer: f32,
}

impl ZoneRadii {
    /// Radii are sorted so `center < middle < outer` always holds.
    pub fn new(a: f32, b: f32, c: f32) -> Self {
        let mut r = [a, b, c];
        r.sort_by(|x, y| x.total_cmp(y));
        Self { center: r[0], middle: r[1], outer: r[2] }
    }

    /// Boundaries are inclusive on the inner zone: a hit at exactly the middle
    /// radius scores middle, not outer.
    pub fn zone_for(&self, planar_distance: f32) -> Zone {
        if planar_distance <= self.center {
            Zone::Bullseye
        } else if planar_distance <= self.middle {
            Zone::Middle
        } else if planar_distance <= self.outer {
            Zone::Outer
        } else {
            Zone::Edge
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HitOutcome {
    pub zone: Zone,
    pub multiplier: f32,
    pub points: u32,
    pub distance: f32,
    pub destroyed: bool,
}

#[derive(Component)]
pub struct Target {
    pub base_points: u32,
    pub hp: u32,
    pub hit_count: u32,
    pub radii: ZoneRadii,
    pub surface_kind: SurfaceKind,
    hit_by: HashSet<Entity>,
}

impl Target {
    pub fn new(base_points: u32, hp: u32, radii: ZoneRadii, surface_kind: SurfaceKind) -> Self {
        Self {
            base_points,
            hp: hp.max(1),
            hit_count: 0,
            radii,
            surface_kind,
            hit_by: HashSet::new(),
        }
    }

    /// Scoring entry point. Idempotent per arrow: a second hit by the same
    /// arrow identity is a no-op, as is any hit on an already destroyed target.
    pub fn apply_hit(
        &mut self,
        arrow: Entity,
        world_impact: Vec3,
        target_global: &GlobalTransform,
    ) -> Option<HitOutcome> {
        if self.hp == 0 || !self.hit_by.insert(arrow) {
            return None;
        }

        self.hit_count += 1;
        self.hp -= 1;

        // Planar distance in local space, ignoring the depth axis.
        let local = target_global.affine().inverse().transform_point3(world_impact);
        let distance = local.truncate().length();
        let zone = self.radii.zone_for(distance);
        let points = (self.base_points as f32 * zone.multiplier()).floor() as u32;

        Some(HitOutcome {
            zone,
            multiplier: zone.multiplier(),
            points,
            distance,
            destroyed: self.hp == 0,
        })
    }
}

// ----------------------- Events -----------------------

/// Raw impact handed to the scoring system by the flight simulation (or tests).
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetStruckEvent {
    pub target: Entity,
    pub arrow: Entity,
    pub world_impact: Vec3,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct TargetHitEvent {
    pub target: Entity,
    pub points: u32,
    pub zone: Zone,
    pub multiplier: f32,
    pub position: Vec3,
    pub surface_kind: SurfaceKind,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct TargetDestroyedEvent {
    pub target: Entity,
    pub points: u32,
    pub bonus_points: u32,
    pub total_hits: u32,
    pub surface_kind: SurfaceKind,
}

// ----------------------- Animation components -----------------------

#[derive(Component)]
pub struct HitFlash {
    restore_scale: Vec3,
    timer: Timer,
}

#[derive(Component)]
pub struct Destroying {
    timer: Timer,
    base_scale: Vec3,
    base_rotation: Quat,
}

/// Fixed periodic path for movable targets, independent of hit state.
#[derive(Component)]
pub struct MovingTarget {
    pub origin: Vec3,
    pub elapsed: f32,
}

// ----------------------- Plugin -----------------------

pub struct TargetPlugin;
impl Plugin for TargetPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TargetStruckEvent>()
            .add_event::<TargetHitEvent>()
            .add_event::<TargetDestroyedEvent>()
            .add_systems(FixedUpdate, process_target_strikes)
            .add_systems(Update, (update_hit_flash, update_destroying, update_moving_targets));
    }
}

fn process_target_strikes(
    mut commands: Commands,
    mut ev_struck: EventReader<TargetStruckEvent>,
    mut q_targets: Query<(
        &mut Target,
        &GlobalTransform,
        &mut Transform,
        Option<&HitFlash>,
        Option<&Destroying>,
    )>,
    mut ev_hit: EventWriter<TargetHitEvent>,
    mut ev_destroyed: EventWriter<TargetDestroyedEvent>,
) {
    for struck in ev_struck.read() {
        let Ok((mut target, global, mut transform, flash, destroying)) =
            q_targets.get_mut(struck.target)
        else {
            continue; // target already gone this frame
        };
        if destroying.is_some() {
            continue;
        }
        let Some(outcome) = target.apply_hit(struck.arrow, struck.world_impact, global) else {
            continue;
        };

        info!(
            "target hit zone={} distance={:.3} points={} hp_left={}",
            outcome.zone.label(),
            outcome.distance,
            outcome.points,
            target.hp
        );

        ev_hit.send(TargetHitEvent {
            target: struck.target,
            points: outcome.points,
            zone: outcome.zone,
            multiplier: outcome.multiplier,
            position: transform.translation,
            surface_kind: target.surface_kind,
        });

        if outcome.destroyed {
            commands.entity(struck.target).insert(Destroying {
                timer: Timer::from_seconds(DESTROY_SECONDS, TimerMode::Once),
                base_scale: transform.scale,
                base_rotation: transform.rotation,
            });
            ev_destroyed.send(TargetDestroyedEvent {
                target: struck.target,
                points: target.base_points,
                bonus_points: (outcome.points as f32 * 0.5).floor() as u32,
                total_hits: target.hit_count,
                surface_kind: target.surface_kind,
            });
        } else if flash.is_none() {
            let restore = transform.scale;
            transform.scale = restore * outcome.zone.scale_bump();
            commands.entity(struck.target).insert(HitFlash {
                restore_scale: restore,
                timer: Timer::from_seconds(HIT_FLASH_SECONDS, TimerMode::Once),
            });
        }
    }
}

fn update_hit_flash(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Transform, &mut HitFlash), Without<Destroying>>,
) {
    for (entity, mut transform, mut flash) in &mut q {
        if flash.timer.tick(time.delta()).finished() {
            transform.scale = flash.restore_scale;
            commands.entity(entity).remove::<HitFlash>();
        }
    }
}

// Shrink-and-spin, then despawn together with any attached arrows.
fn update_destroying(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Transform, &mut Destroying)>,
) {
    for (entity, mut transform, mut anim) in &mut q {
        anim.timer.tick(time.delta());
        let progress = anim.timer.fraction();
        transform.scale = anim.base_scale * (1.0 - progress);
        transform.rotation =
            anim.base_rotation * Quat::from_rotation_y(progress * std::f32::consts::TAU);
        if anim.timer.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

fn update_moving_targets(
    time: Res<Time>,
    mut q: Query<(&mut Transform, &mut MovingTarget), Without<Destroying>>,
) {
    for (mut transform, mut moving) in &mut q {
        moving.elapsed += time.delta_seconds();
        let t = moving.elapsed * 2.0;
        transform.translation = moving.origin
            + Vec3::new(t.sin() * 1.5, t.cos() * 0.5, (t * 0.5).sin());
    }
}
