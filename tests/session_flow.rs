use archery_xr::prelude::*;
use bevy::prelude::*;

fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SessionPlugin)
        .add_plugins(TargetPlugin);
    app
}

#[test]
fn menu_action_starts_the_session() {
    let mut app = build_app();
    assert_eq!(*app.world().resource::<GamePhase>(), GamePhase::Menu);

    app.world_mut().send_event(MenuHitEvent { action: MenuAction::Start });
    app.update();

    assert_eq!(*app.world().resource::<GamePhase>(), GamePhase::Running);
    let score = app.world().resource::<Score>();
    assert_eq!(score.total_score, 0);
    assert_eq!(score.remaining_time, 60);
}

#[test]
fn replay_is_ignored_from_the_menu() {
    let mut app = build_app();
    app.world_mut().send_event(MenuHitEvent { action: MenuAction::Replay });
    app.update();
    assert_eq!(*app.world().resource::<GamePhase>(), GamePhase::Menu);
}

#[test]
fn replay_restarts_after_the_end() {
    let mut app = build_app();
    app.world_mut().insert_resource(GamePhase::Ended);
    app.world_mut().insert_resource(Score {
        total_score: 120,
        total_hits: 5,
        arrows_shot: 9,
        remaining_time: 0,
    });

    app.world_mut().send_event(MenuHitEvent { action: MenuAction::Replay });
    app.update();

    assert_eq!(*app.world().resource::<GamePhase>(), GamePhase::Running);
    let score = app.world().resource::<Score>();
    assert_eq!(score.total_score, 0);
    assert_eq!(score.arrows_shot, 0);
    assert_eq!(score.remaining_time, 60);
}

#[test]
fn strikes_flow_into_the_score() {
    let mut app = build_app();
    app.world_mut().insert_resource(GamePhase::Running);
    app.world_mut().insert_resource(Score { remaining_time: 60, ..default() });

    let radii = ZoneRadii::new(0.1, 0.3, 0.5);
    let target = app
        .world_mut()
        .spawn((
            Transform::default(),
            GlobalTransform::default(),
            Target::new(10, 1, radii, SurfaceKind::Vertical),
        ))
        .id();
    let arrow = app.world_mut().spawn_empty().id();

    app.world_mut().send_event(TargetStruckEvent {
        target,
        arrow,
        world_impact: Vec3::ZERO,
    });
    // Strike resolution runs on the fixed schedule, aggregation on Update.
    app.world_mut().run_schedule(FixedUpdate);
    app.update();

    let score = app.world().resource::<Score>();
    assert_eq!(score.total_hits, 1);
    // Bullseye 30 plus the 15 destruction bonus.
    assert_eq!(score.total_score, 45);
    assert!(
        app.world().get::<Target>(target).is_some(),
        "destruction animates out instead of despawning instantly"
    );
}

#[test]
fn streaks_never_inflate_the_score() {
    // Full scoring stack: the combo is a stats readout, not a points modifier.
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SessionPlugin)
        .add_plugins(TargetPlugin)
        .add_plugins(ComboPlugin);
    app.world_mut().insert_resource(GamePhase::Running);
    app.world_mut().insert_resource(Score { remaining_time: 60, ..default() });

    let radii = ZoneRadii::new(0.1, 0.3, 0.5);
    let target = app
        .world_mut()
        .spawn((
            Transform::default(),
            GlobalTransform::default(),
            Target::new(10, 2, radii, SurfaceKind::Vertical),
        ))
        .id();

    for _ in 0..2 {
        let arrow = app.world_mut().spawn_empty().id();
        app.world_mut().send_event(TargetStruckEvent {
            target,
            arrow,
            world_impact: Vec3::ZERO,
        });
        app.world_mut().run_schedule(FixedUpdate);
        app.update();
    }

    let combo = app.world().resource::<ComboState>();
    assert!(combo.multiplier > 1.0, "back-to-back bullseyes must chain");
    let score = app.world().resource::<Score>();
    assert_eq!(score.total_hits, 2);
    // Two raw bullseyes at 30 plus the 15 destruction bonus, no streak bonus.
    assert_eq!(score.total_score, 75);
}

#[test]
fn stale_hits_are_dropped_when_the_session_starts() {
    let mut app = build_app();
    let ghost = app.world_mut().spawn_empty().id();
    // A hit landing while still on the menu must never count.
    app.world_mut().send_event(TargetHitEvent {
        target: ghost,
        points: 30,
        zone: Zone::Bullseye,
        multiplier: 3.0,
        position: Vec3::ZERO,
        surface_kind: SurfaceKind::Vertical,
    });
    app.update();

    app.world_mut().send_event(MenuHitEvent { action: MenuAction::Start });
    app.update();
    app.update();

    assert_eq!(*app.world().resource::<GamePhase>(), GamePhase::Running);
    let score = app.world().resource::<Score>();
    assert_eq!(score.total_hits, 0);
    assert_eq!(score.total_score, 0);
}

#[test]
fn shots_are_counted_only_while_running() {
    let mut app = build_app();
    app.world_mut().send_event(ArrowShotEvent { position: Vec3::ZERO, speed: 45.0 });
    app.update();
    assert_eq!(app.world().resource::<Score>().arrows_shot, 0);

    app.world_mut().insert_resource(GamePhase::Running);
    app.world_mut().send_event(ArrowShotEvent { position: Vec3::ZERO, speed: 45.0 });
    app.update();
    assert_eq!(app.world().resource::<Score>().arrows_shot, 1);
}

#[test]
fn countdown_ends_the_session_and_clears_targets() {
    let mut app = build_app();
    app.world_mut().insert_resource(GamePhase::Running);
    app.world_mut().insert_resource(Score { remaining_time: 1, ..default() });
    // Near-zero period so any real frame delta completes a second.
    app.world_mut()
        .insert_resource(CountdownTimer(Timer::from_seconds(1e-6, TimerMode::Repeating)));

    let radii = ZoneRadii::new(0.1, 0.3, 0.5);
    let target = app
        .world_mut()
        .spawn((
            Transform::default(),
            GlobalTransform::default(),
            Target::new(10, 1, radii, SurfaceKind::Vertical),
        ))
        .id();

    for _ in 0..20 {
        app.update();
        if *app.world().resource::<GamePhase>() == GamePhase::Ended {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    assert_eq!(*app.world().resource::<GamePhase>(), GamePhase::Ended);
    assert!(app.world().get_entity(target).is_none(), "targets are cleared at the end");

    let events = app.world().resource::<Events<GameEndedEvent>>();
    let mut reader = events.get_reader();
    assert!(reader.read(events).next().is_some());
}
