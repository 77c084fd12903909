// Session controller: phase machine, countdown, spawn cadence reset, score
// aggregation, and difficulty presets.
use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::plugins::bow::ArrowShotEvent;
use crate::plugins::config::GameConfig;
use crate::plugins::menu::{MenuAction, MenuHitEvent};
use crate::plugins::spawn::SpawnState;
use crate::plugins::surface::SurfaceRegistry;
use crate::plugins::target::{Target, TargetDestroyedEvent, TargetHitEvent};

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Menu,
    Running,
    Ended,
}

#[derive(Resource, Debug, Default)]
pub struct Score {
    pub total_score: u32,
    pub total_hits: u32,
    pub arrows_shot: u32,
    pub remaining_time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Base points and hit-point roll for a freshly spawned target.
    pub fn roll(self, rng: &mut impl Rng) -> (u32, u32) {
        match self {
            Difficulty::Easy => (10, 1),
            Difficulty::Normal => (15, if rng.gen::<f32>() > 0.7 { 2 } else { 1 }),
            Difficulty::Hard => (20, rng.gen_range(1..=3)),
        }
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub struct GameEndedEvent {
    pub final_score: u32,
    pub hits: u32,
    pub arrows: u32,
}

#[derive(Resource)]
pub struct CountdownTimer(pub Timer);
impl Default for CountdownTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(1.0, TimerMode::Repeating))
    }
}

pub struct SessionPlugin;
impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<GamePhase>()
            .init_resource::<Score>()
            .init_resource::<SpawnState>()
            .init_resource::<CountdownTimer>()
            .add_event::<MenuHitEvent>()
            .add_event::<ArrowShotEvent>()
            .add_event::<TargetHitEvent>()
            .add_event::<TargetDestroyedEvent>()
            .add_event::<GameEndedEvent>()
            .add_systems(Update, (start_session, run_countdown, aggregate_score));
    }
}

// Starts on menu action or replay. When auto start is configured the session
// also begins as soon as a usable surface has been confirmed, since the
// headset flow has no pointer to click with.
fn start_session(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut phase: ResMut<GamePhase>,
    mut score: ResMut<Score>,
    mut spawn_state: ResMut<SpawnState>,
    mut countdown: ResMut<CountdownTimer>,
    mut ev_menu: EventReader<MenuHitEvent>,
    registry: Option<Res<SurfaceRegistry>>,
) {
    let mut begin = false;
    for ev in ev_menu.read() {
        match ev.action {
            MenuAction::Start if *phase == GamePhase::Menu => begin = true,
            MenuAction::Replay if *phase == GamePhase::Ended => begin = true,
            _ => {}
        }
    }
    if !begin && *phase == GamePhase::Menu && cfg.session.auto_start {
        if let Some(registry) = registry.as_ref() {
            begin = registry.has_available_surface(
                time.elapsed_seconds(),
                &cfg.surface,
                cfg.session.require_real_surfaces,
            );
        }
    }
    if !begin {
        return;
    }

    *score = Score { remaining_time: cfg.session.game_time, ..default() };
    spawn_state.reset();
    countdown.0.reset();
    *phase = GamePhase::Running;
    info!(
        "session started time={}s difficulty={:?}",
        cfg.session.game_time, cfg.session.difficulty
    );
}

fn run_countdown(
    mut commands: Commands,
    time: Res<Time>,
    mut phase: ResMut<GamePhase>,
    mut score: ResMut<Score>,
    mut countdown: ResMut<CountdownTimer>,
    mut ev_ended: EventWriter<GameEndedEvent>,
    q_targets: Query<Entity, With<Target>>,
) {
    if *phase != GamePhase::Running {
        return;
    }
    if !countdown.0.tick(time.delta()).just_finished() {
        return;
    }

    score.remaining_time = score.remaining_time.saturating_sub(1);
    if score.remaining_time > 0 {
        return;
    }

    // Countdown hit zero: stop the session and surface the results.
    *phase = GamePhase::Ended;
    for target in &q_targets {
        commands.entity(target).despawn_recursive();
    }
    info!(
        "session ended score={} hits={} arrows={}",
        score.total_score, score.total_hits, score.arrows_shot
    );
    ev_ended.send(GameEndedEvent {
        final_score: score.total_score,
        hits: score.total_hits,
        arrows: score.arrows_shot,
    });
}

fn aggregate_score(
    phase: Res<GamePhase>,
    mut score: ResMut<Score>,
    mut ev_hit: EventReader<TargetHitEvent>,
    mut ev_destroyed: EventReader<TargetDestroyedEvent>,
    mut ev_shot: EventReader<ArrowShotEvent>,
) {
    if *phase != GamePhase::Running {
        // Drop anything emitted outside the session window so it cannot be
        // counted retroactively on the next start.
        ev_hit.clear();
        ev_destroyed.clear();
        ev_shot.clear();
        return;
    }
    for hit in ev_hit.read() {
        if hit.points == 0 {
            continue;
        }
        score.total_hits += 1;
        score.total_score += hit.points;
    }
    for destroyed in ev_destroyed.read() {
        score.total_score += destroyed.bonus_points;
    }
    for _ in ev_shot.read() {
        score.arrows_shot += 1;
    }
}
