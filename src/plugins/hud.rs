use bevy::prelude::*;

use crate::plugins::combo::ComboState;
use crate::plugins::session::{GamePhase, Score};

#[derive(Component)]
pub struct Hud;

pub struct HudPlugin;
impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(Update, update_hud);
    }
}

fn setup_hud(mut commands: Commands) {
    commands
        .spawn(
            TextBundle::from_section(
                "Time: -- | Score: 0",
                TextStyle { font_size: 22.0, color: Color::WHITE, ..default() },
            )
            .with_style(Style {
                position_type: PositionType::Absolute,
                left: Val::Px(12.0),
                top: Val::Px(8.0),
                ..default()
            }),
        )
        .insert(Hud);
}

fn update_hud(
    phase: Res<GamePhase>,
    score: Res<Score>,
    combo: Option<Res<ComboState>>,
    mut q_text: Query<&mut Text, With<Hud>>,
) {
    let Ok(mut text) = q_text.get_single_mut() else {
        return;
    };
    let mut line = match *phase {
        GamePhase::Menu => "Shoot the panel to start".to_string(),
        GamePhase::Running => format!(
            "Time: {}s | Score: {} | Hits: {} | Arrows: {}",
            score.remaining_time, score.total_score, score.total_hits, score.arrows_shot
        ),
        GamePhase::Ended => format!(
            "Final: {} ({} hits, {} arrows) | Shoot the panel to replay",
            score.total_score, score.total_hits, score.arrows_shot
        ),
    };
    if let Some(combo) = combo {
        if combo.combo > 1 {
            line.push_str(&format!(" | Combo x{} ({:.1}x)", combo.combo, combo.multiplier));
        }
    }
    text.sections[0].value = line;
}
