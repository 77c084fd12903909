// World-anchor registry: bounded pose handles that keep spawned entities
// pinned to a surface. Oldest anchors are evicted when the cap is reached,
// and anchors whose entity has despawned are dropped on a slow cleanup tick.
use bevy::prelude::*;
use bevy::utils::HashMap;
use std::collections::VecDeque;

const MAX_ANCHORS: usize = 30;
const CLEANUP_INTERVAL: f32 = 5.0;

#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    pub position: Vec3,
    pub rotation: Quat,
    pub entity: Option<Entity>,
}

#[derive(Resource)]
pub struct AnchorRegistry {
    anchors: HashMap<u32, Anchor>,
    order: VecDeque<u32>,
    next_id: u32,
    pub max_anchors: usize,
}

impl Default for AnchorRegistry {
    fn default() -> Self {
        Self {
            anchors: HashMap::default(),
            order: VecDeque::new(),
            next_id: 0,
            max_anchors: MAX_ANCHORS,
        }
    }
}

impl AnchorRegistry {
    pub fn create(&mut self, position: Vec3, rotation: Quat) -> Option<u32> {
        if self.anchors.len() >= self.max_anchors {
            if let Some(oldest) = self.order.pop_front() {
                self.anchors.remove(&oldest);
                info!("anchor evicted id={oldest}");
            }
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.anchors.insert(id, Anchor { position, rotation, entity: None });
        self.order.push_back(id);
        Some(id)
    }

    pub fn attach(&mut self, id: u32, entity: Entity) {
        if let Some(anchor) = self.anchors.get_mut(&id) {
            anchor.entity = Some(entity);
        }
    }

    pub fn get(&self, id: u32) -> Option<&Anchor> {
        self.anchors.get(&id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Drops every anchor whose attached entity no longer satisfies `alive`.
    /// Unattached anchors are kept.
    pub fn retain_live(&mut self, alive: impl Fn(Entity) -> bool) -> usize {
        let before = self.anchors.len();
        self.anchors
            .retain(|_, anchor| anchor.entity.map_or(true, &alive));
        self.order.retain(|id| self.anchors.contains_key(id));
        before - self.anchors.len()
    }
}

#[derive(Resource)]
struct CleanupTimer(Timer);

pub struct AnchorPlugin;
impl Plugin for AnchorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnchorRegistry>()
            .insert_resource(CleanupTimer(Timer::from_seconds(
                CLEANUP_INTERVAL,
                TimerMode::Repeating,
            )))
            .add_systems(Update, cleanup_dead_anchors);
    }
}

fn cleanup_dead_anchors(
    time: Res<Time>,
    mut timer: ResMut<CleanupTimer>,
    mut registry: ResMut<AnchorRegistry>,
    q_entities: Query<Entity>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    let dropped = registry.retain_live(|entity| q_entities.get(entity).is_ok());
    if dropped > 0 {
        info!("anchors cleaned dropped={} remaining={}", dropped, registry.len());
    }
}
