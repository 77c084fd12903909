// Combo streaks: consecutive hits inside a rolling window grow a score
// multiplier, bullseyes count double, silence resets the chain.
use bevy::prelude::*;

use crate::plugins::config::{ComboTuning, GameConfig};
use crate::plugins::session::GamePhase;
use crate::plugins::target::{TargetHitEvent, Zone};

#[derive(Resource, Debug)]
pub struct ComboState {
    pub combo: u32,
    pub max_combo: u32,
    pub multiplier: f32,
    last_hit: f32,
    active: bool,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            combo: 0,
            max_combo: 0,
            multiplier: 1.0,
            last_hit: 0.0,
            active: false,
        }
    }
}

impl ComboState {
    pub fn register_hit(&mut self, zone: Zone, now: f32, tuning: &ComboTuning) {
        if self.active && now - self.last_hit <= tuning.timeout {
            self.combo += if zone == Zone::Bullseye { 2 } else { 1 };
        } else {
            self.combo = 1;
            self.active = true;
        }
        self.last_hit = now;
        self.max_combo = self.max_combo.max(self.combo);
        self.multiplier = (1.0 + self.combo as f32 * 0.2).min(tuning.max_multiplier);
    }

    /// Returns true when an active streak just lapsed.
    pub fn expire(&mut self, now: f32, tuning: &ComboTuning) -> bool {
        if !self.active || now - self.last_hit <= tuning.timeout {
            return false;
        }
        let lapsed = self.combo > 1;
        self.active = false;
        self.combo = 0;
        self.multiplier = 1.0;
        lapsed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct ComboPlugin;
impl Plugin for ComboPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<GamePhase>()
            .init_resource::<ComboState>()
            .add_event::<TargetHitEvent>()
            .add_systems(Update, (track_combo_hits, expire_combo));
    }
}

fn track_combo_hits(
    cfg: Res<GameConfig>,
    time: Res<Time>,
    phase: Res<GamePhase>,
    mut combo: ResMut<ComboState>,
    mut ev_hit: EventReader<TargetHitEvent>,
) {
    if *phase != GamePhase::Running {
        ev_hit.clear();
        combo.reset();
        return;
    }
    let now = time.elapsed_seconds();
    for ev in ev_hit.read() {
        if ev.points == 0 {
            continue;
        }
        combo.register_hit(ev.zone, now, &cfg.combo);
        if combo.combo > 1 {
            info!("combo x{} multiplier={:.1}", combo.combo, combo.multiplier);
        }
    }
}

fn expire_combo(
    cfg: Res<GameConfig>,
    time: Res<Time>,
    mut combo: ResMut<ComboState>,
) {
    if combo.expire(time.elapsed_seconds(), &cfg.combo) {
        info!("combo lapsed");
    }
}
