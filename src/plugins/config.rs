// Game configuration loading (RON) & tuning resources.
use bevy::prelude::*;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;

use crate::plugins::session::Difficulty;
use crate::plugins::surface::SurfaceKind;

// ----------------------- Tuning sections -----------------------

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ArrowTuning {
    pub gravity: f32,              // gentle pull while flying
    pub mass: f32,
    pub drag_coefficient: f32,     // quadratic drag scale
    pub fall_speed_threshold: f32, // below this the arrow goes ballistic
    pub fall_gravity: f32,
    pub max_lifetime: f32,
    pub no_hit_expiry: f32,        // redundant removal when nothing was hit
    pub plant_delay: f32,
    pub plant_shrink: f32,
}
impl Default for ArrowTuning {
    fn default() -> Self {
        Self {
            gravity: 0.005,
            mass: 0.001,
            drag_coefficient: 0.0005,
            fall_speed_threshold: 4.0,
            fall_gravity: 9.8,
            max_lifetime: 8.0,
            no_hit_expiry: 5.0,
            plant_delay: 5.0,
            plant_shrink: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct BowTuning {
    pub min_arrow_speed: f32,
    pub max_arrow_speed: f32,
    pub min_draw_distance: f32, // release below this cancels the shot
    pub max_draw_distance: f32,
    pub snap_distance: f32,     // hands must be this close to nock
    pub desktop_speed: f32,     // fixed speed for the mouse fallback
}
impl Default for BowTuning {
    fn default() -> Self {
        Self {
            min_arrow_speed: 8.0,
            max_arrow_speed: 80.0,
            min_draw_distance: 0.12,
            max_draw_distance: 0.45,
            snap_distance: 0.2,
            desktop_speed: 45.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct TargetTuning {
    pub center_radius: f32,
    pub middle_radius: f32,
    pub outer_radius: f32,
}
impl Default for TargetTuning {
    fn default() -> Self {
        Self { center_radius: 0.1, middle_radius: 0.3, outer_radius: 0.5 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SurfaceTuning {
    pub max_distance: f32,
    pub min_surface_area: f32,
    pub stability_frames: u32,     // confirmations before a real surface counts
    pub stability_expiry: f32,     // seconds unseen before a bucket is purged
    pub default_target_height: f32,
    pub hit_test_recency: f32,     // how long the hit-test feed stays "active"
    pub allow_fallback: bool,
}
impl Default for SurfaceTuning {
    fn default() -> Self {
        Self {
            max_distance: 10.0,
            min_surface_area: 0.25,
            stability_frames: 3,
            stability_expiry: 3.0,
            default_target_height: 0.5,
            hit_test_recency: 30.0,
            allow_fallback: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SpawnTuning {
    pub interval: f32,
    pub max_targets: usize,
    pub preferred_surface: SurfaceKind, // Random draws from both lists
    pub min_distance: f32,
    pub max_distance: f32,
    pub first_max_angle_deg: f32, // tight cone for the very first target
    pub max_angle_deg: f32,
    pub min_spacing: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub vertical_bonus: f32,
    pub vertical_offset: f32,     // outward margin off a wall
    pub ceiling_offset: f32,
}
impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval: 0.5,
            max_targets: 3,
            preferred_surface: SurfaceKind::Random,
            min_distance: 1.5,
            max_distance: 10.0,
            first_max_angle_deg: 30.0,
            max_angle_deg: 60.0,
            min_spacing: 0.5,
            min_scale: 0.2,
            max_scale: 0.5,
            vertical_bonus: 1.2,
            vertical_offset: 0.2,
            ceiling_offset: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SessionTuning {
    pub game_time: u32,
    pub difficulty: Difficulty,
    pub require_real_surfaces: bool,
    pub auto_start: bool, // begin as soon as a usable surface shows up
}
impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            game_time: 60,
            difficulty: Difficulty::Normal,
            require_real_surfaces: true,
            auto_start: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ComboTuning {
    pub timeout: f32,
    pub max_multiplier: f32,
}
impl Default for ComboTuning {
    fn default() -> Self {
        Self { timeout: 2.0, max_multiplier: 5.0 }
    }
}

#[derive(Resource, Debug, Deserialize, Clone, Copy, Default)]
#[serde(default)]
pub struct GameConfig {
    pub arrow: ArrowTuning,
    pub bow: BowTuning,
    pub target: TargetTuning,
    pub surface: SurfaceTuning,
    pub spawn: SpawnTuning,
    pub session: SessionTuning,
    pub combo: ComboTuning,
}

// ----------------------- Plugin -----------------------

pub struct ConfigPlugin;
impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GameConfig::default())
            .add_systems(PreStartup, load_config);
    }
}

fn load_config(mut commands: Commands) {
    #[cfg(target_arch = "wasm32")]
    {
        // Embed the config at compile time for web (no filesystem access in browser).
        let data = include_str!("../../assets/config/game.ron");
        match ron::from_str::<GameConfig>(data) {
            Ok(cfg) => commands.insert_resource(cfg),
            Err(e) => error!("Failed to parse embedded config: {e}"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = "assets/config/game.ron";
        match fs::read_to_string(path) {
            Ok(data) => match ron::from_str::<GameConfig>(&data) {
                Ok(cfg) => commands.insert_resource(cfg),
                Err(e) => error!("Failed to parse {path}: {e}"),
            },
            Err(_) => warn!("No config at {path}, using defaults"),
        }
    }
}
