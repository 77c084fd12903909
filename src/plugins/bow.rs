// Bow draw mechanics: two tracked hands nock, draw and release; draw distance
// maps to arrow speed. A single-click desktop fallback fires from the camera.
use bevy::prelude::*;

use crate::plugins::arrow::{spawn_arrow, ArrowAssets};
use crate::plugins::config::GameConfig;
use crate::plugins::stage::PlayerCamera;

#[derive(Event, Debug, Clone, Copy)]
pub struct ArrowShotEvent {
    pub position: Vec3,
    pub speed: f32,
}

/// Two independently tracked hand poses plus the trigger line, fed by an
/// external device-pose source. `None` hands mean tracking is not available.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct HandPoses {
    pub left: Option<Transform>,
    pub right: Option<Transform>,
    pub trigger_pressed: bool,
}

#[derive(Resource, Debug, Default)]
pub struct DrawState {
    pub nocked: bool,
    pub draw_distance: f32,
    prev_trigger: bool,
}

pub struct BowPlugin;
impl Plugin for BowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<HandPoses>()
            .init_resource::<DrawState>()
            .add_event::<ArrowShotEvent>()
            .add_systems(Update, (update_bow_draw, desktop_fire));
    }
}

fn update_bow_draw(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    hands: Res<HandPoses>,
    mut draw: ResMut<DrawState>,
    assets: Option<Res<ArrowAssets>>,
    mut ev_shot: EventWriter<ArrowShotEvent>,
) {
    let (Some(left), Some(right)) = (hands.left, hands.right) else {
        draw.nocked = false;
        draw.prev_trigger = hands.trigger_pressed;
        return;
    };

    let pressed = hands.trigger_pressed;
    let separation = left.translation.distance(right.translation);

    if pressed && !draw.prev_trigger {
        if separation < cfg.bow.snap_distance {
            draw.nocked = true;
            draw.draw_distance = separation;
            info!("string nocked separation={:.2}", separation);
        } else {
            info!(
                "too far to nock separation={:.2} snap={:.2}",
                separation, cfg.bow.snap_distance
            );
        }
    }

    if draw.nocked {
        draw.draw_distance = separation;
    }

    if !pressed && draw.prev_trigger && draw.nocked {
        draw.nocked = false;
        if draw.draw_distance < cfg.bow.min_draw_distance {
            info!("draw released short distance={:.2}", draw.draw_distance);
        } else {
            let ratio = (draw.draw_distance / cfg.bow.max_draw_distance).min(1.0);
            let speed = cfg.bow.min_arrow_speed
                + (cfg.bow.max_arrow_speed - cfg.bow.min_arrow_speed) * ratio;
            // The holding hand's grip points down the forearm; compensate so
            // the arrow leaves along the aim line.
            let rotation = left.rotation * Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);
            spawn_arrow(&mut commands, assets.as_deref(), left.translation, rotation, speed);
            ev_shot.send(ArrowShotEvent { position: left.translation, speed });
            info!(
                "arrow shot draw={:.2} power={:.0}% speed={:.1}",
                draw.draw_distance,
                ratio * 100.0,
                speed
            );
        }
    }

    draw.prev_trigger = pressed;
}

// Mouse fallback when no hands are tracked. Menus stay reachable by arrow, so
// firing is not gated on the session phase.
fn desktop_fire(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    hands: Res<HandPoses>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    assets: Option<Res<ArrowAssets>>,
    q_camera: Query<&GlobalTransform, With<PlayerCamera>>,
    mut ev_shot: EventWriter<ArrowShotEvent>,
) {
    let Some(buttons) = buttons else {
        return; // headless: no pointer to fall back to
    };
    if hands.left.is_some() || !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(camera) = q_camera.get_single() else {
        return;
    };
    let (_, rotation, translation) = camera.to_scale_rotation_translation();
    let position = translation + *camera.forward() * 0.2;
    spawn_arrow(&mut commands, assets.as_deref(), position, rotation, cfg.bow.desktop_speed);
    ev_shot.send(ArrowShotEvent { position, speed: cfg.bow.desktop_speed });
}
