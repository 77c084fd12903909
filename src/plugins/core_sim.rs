use bevy::prelude::*;
use bevy::time::Fixed;

use crate::plugins::session::GamePhase;

// Core simulation timing. One logical thread of control: gameplay integration
// runs on the fixed 60 Hz schedule, cosmetic animation on Update.
#[derive(Resource, Default, Debug)]
pub struct SimState {
    pub tick: u64,
    pub elapsed_seconds: f32,
}
impl SimState {
    pub fn advance_fixed(&mut self) {
        self.tick += 1;
        self.elapsed_seconds = self.tick as f32 / 60.0;
    }
}

pub struct CoreSimPlugin;
impl Plugin for CoreSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimState::default())
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_systems(FixedUpdate, tick_state);
    }
}

fn tick_state(mut sim: ResMut<SimState>, phase: Option<Res<GamePhase>>) {
    if let Some(phase) = phase {
        if *phase == GamePhase::Ended {
            return; // freeze simulation timing once the session is over
        }
    }
    sim.advance_fixed();
}
