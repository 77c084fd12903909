use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use archery_xr::prelude::*;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.06, 0.07, 0.10)))
        .insert_resource(Msaa::Sample4)
        .insert_resource(AmbientLight {
            color: Color::srgb(0.55, 0.55, 0.60),
            brightness: 400.0,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window { title: "Archery XR".into(), ..default() }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(ConfigPlugin)   // RON tuning tables (loaded before everything)
        .add_plugins(CoreSimPlugin)  // fixed 60 Hz timing
        .add_plugins(StagePlugin)    // camera, light, fallback room
        .add_plugins(SurfacePlugin)  // surface detection + stability
        .add_plugins(AnchorPlugin)   // bounded world anchors
        .add_plugins(SessionPlugin)  // phases, countdown, score
        .add_plugins(SpawnPlugin)    // target placement
        .add_plugins(TargetPlugin)   // zone scoring + lifecycle
        .add_plugins(ArrowPlugin)    // flight sim + collision
        .add_plugins(BowPlugin)      // draw / release input
        .add_plugins(ComboPlugin)    // streak multiplier
        .add_plugins(MenuPlugin)     // arrow-driven menus
        .add_plugins(HudPlugin)      // score readout
        .run();
}
