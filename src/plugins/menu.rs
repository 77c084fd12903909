// World-space menus that arrows interact with. Buttons are plain spheres of
// influence; an arrow passing inside the radius counts as a press.
use bevy::prelude::*;

use crate::plugins::session::{GameEndedEvent, GamePhase};

const BUTTON_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Replay,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct MenuHitEvent {
    pub action: MenuAction,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct MenuButton {
    pub radius: f32,
    pub action: MenuAction,
}

#[derive(Component)]
struct MenuRoot;

#[derive(Resource, Default)]
struct MenuAssets {
    panel_mesh: Option<Handle<Mesh>>,
    button_mesh: Option<Handle<Mesh>>,
    panel_material: Option<Handle<StandardMaterial>>,
    button_material: Option<Handle<StandardMaterial>>,
}

pub struct MenuPlugin;
impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GamePhase>()
            .add_event::<MenuHitEvent>()
            .add_event::<GameEndedEvent>()
            .init_resource::<MenuAssets>()
            .add_systems(Startup, (setup_menu_assets, spawn_main_menu).chain())
            .add_systems(Update, (close_menu_on_action, spawn_end_menu, keyboard_shortcuts));
    }
}

fn setup_menu_assets(
    mut menu_assets: ResMut<MenuAssets>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        return;
    };
    menu_assets.panel_mesh = Some(meshes.add(Mesh::from(Cuboid::new(1.2, 0.8, 0.02))));
    menu_assets.button_mesh = Some(meshes.add(Mesh::from(Sphere::new(0.12))));
    menu_assets.panel_material = Some(materials.add(StandardMaterial {
        base_color: Color::srgba(0.1, 0.12, 0.2, 0.85),
        alpha_mode: AlphaMode::Blend,
        ..default()
    }));
    menu_assets.button_material = Some(materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.8, 0.3),
        emissive: LinearRgba::rgb(0.1, 0.6, 0.2),
        ..default()
    }));
}

fn spawn_main_menu(mut commands: Commands, menu_assets: Res<MenuAssets>) {
    spawn_menu(&mut commands, &menu_assets, MenuAction::Start);
}

fn spawn_menu(commands: &mut Commands, assets: &MenuAssets, action: MenuAction) {
    let root = commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_xyz(0.0, 1.6, -2.0)),
            MenuRoot,
        ))
        .id();
    if let (Some(mesh), Some(material)) = (&assets.panel_mesh, &assets.panel_material) {
        commands.entity(root).insert((mesh.clone(), material.clone()));
    }

    let button = commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_xyz(0.0, -0.15, 0.05)),
            MenuButton { radius: BUTTON_RADIUS, action },
        ))
        .id();
    if let (Some(mesh), Some(material)) = (&assets.button_mesh, &assets.button_material) {
        commands.entity(button).insert((mesh.clone(), material.clone()));
    }
    commands.entity(button).set_parent(root);
}

fn close_menu_on_action(
    mut commands: Commands,
    mut ev_menu: EventReader<MenuHitEvent>,
    q_roots: Query<Entity, With<MenuRoot>>,
) {
    if ev_menu.read().next().is_none() {
        return;
    }
    for root in &q_roots {
        commands.entity(root).despawn_recursive();
    }
}

fn spawn_end_menu(
    mut commands: Commands,
    menu_assets: Res<MenuAssets>,
    mut ev_ended: EventReader<GameEndedEvent>,
) {
    for ev in ev_ended.read() {
        info!(
            "session over score={} hits={} arrows={}",
            ev.final_score, ev.hits, ev.arrows
        );
        spawn_menu(&mut commands, &menu_assets, MenuAction::Replay);
    }
}

// Keyboard convenience for desktop runs without a tracked bow.
fn keyboard_shortcuts(
    phase: Res<GamePhase>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut ev_menu: EventWriter<MenuHitEvent>,
) {
    let Some(keys) = keys else {
        return;
    };
    if !keys.just_pressed(KeyCode::Enter) {
        return;
    }
    match *phase {
        GamePhase::Menu => {
            ev_menu.send(MenuHitEvent { action: MenuAction::Start });
        }
        GamePhase::Ended => {
            ev_menu.send(MenuHitEvent { action: MenuAction::Replay });
        }
        GamePhase::Running => {}
    }
}
