use archery_xr::prelude::*;
use bevy::prelude::*;

fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(BowPlugin);
    app
}

fn hands(left: Vec3, right: Vec3, trigger: bool) -> HandPoses {
    HandPoses {
        left: Some(Transform::from_translation(left)),
        right: Some(Transform::from_translation(right)),
        trigger_pressed: trigger,
    }
}

fn shot_speeds(app: &mut App) -> Vec<f32> {
    let events = app.world().resource::<Events<ArrowShotEvent>>();
    let mut reader = events.get_reader();
    reader.read(events).map(|e| e.speed).collect()
}

#[test]
fn full_draw_fires_at_max_speed() {
    let mut app = build_app();
    // Hands together, trigger down: nock.
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0), true));
    app.update();
    // Pull out to the full draw length.
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), true));
    app.update();
    // Release.
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), false));
    app.update();

    let speeds = shot_speeds(&mut app);
    assert_eq!(speeds.len(), 1);
    assert!((speeds[0] - 80.0).abs() < 1e-3, "ratio clamps at 1.0, got {}", speeds[0]);
}

#[test]
fn short_draws_cancel_the_shot() {
    let mut app = build_app();
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0), true));
    app.update();
    // Barely pulled: below the minimum draw distance.
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(0.11, 0.0, 0.0), false));
    app.update();
    assert!(shot_speeds(&mut app).is_empty());
    // No arrow entity either.
    let mut q = app.world_mut().query::<&Arrow>();
    assert_eq!(q.iter(app.world()).count(), 0);
}

#[test]
fn trigger_far_from_the_string_does_not_nock() {
    let mut app = build_app();
    // Hands a meter apart when the trigger comes down: no nock, and the
    // release distance is irrelevant.
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), true));
    app.update();
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), false));
    app.update();
    assert!(shot_speeds(&mut app).is_empty());
}

#[test]
fn draw_distance_maps_into_the_speed_band() {
    let mut app = build_app();
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0), true));
    app.update();
    // Half of the maximum draw.
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(0.225, 0.0, 0.0), false));
    app.update();

    let speeds = shot_speeds(&mut app);
    assert_eq!(speeds.len(), 1);
    let expected = 8.0 + (80.0 - 8.0) * 0.5;
    assert!((speeds[0] - expected).abs() < 1e-3);
}

#[test]
fn losing_tracking_drops_the_nock() {
    let mut app = build_app();
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0), true));
    app.update();
    // Tracking loss mid-draw.
    app.world_mut().insert_resource(HandPoses::default());
    app.update();
    // Hands return with the trigger already up: nothing fires.
    app.world_mut()
        .insert_resource(hands(Vec3::ZERO, Vec3::new(0.4, 0.0, 0.0), false));
    app.update();
    assert!(shot_speeds(&mut app).is_empty());
}
