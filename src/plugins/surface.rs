// Surface model: sample ingestion, stability tracking, classification and
// the hit-test feed that the spawn planner prefers over the generic lists.
use bevy::prelude::*;
use bevy::utils::HashMap;
use serde::Deserialize;
use std::collections::VecDeque;

use crate::plugins::config::{GameConfig, SurfaceTuning};
use crate::plugins::stage::PlayerCamera;

const HIT_TEST_KEEP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SurfaceKind {
    Horizontal,
    Vertical,
    Random,
}

/// Raw surface pose as delivered by a hit-testing device (or the mock feed).
#[derive(Event, Debug, Clone, Copy)]
pub struct SurfaceSampleEvent {
    pub position: Vec3,
    pub rotation: Quat,
    pub normal: Vec3,
    pub width: f32,
    pub height: f32,
    pub is_real: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Surface {
    pub position: Vec3,
    pub rotation: Quat,
    pub normal: Vec3,
    pub width: f32,
    pub height: f32,
    pub is_real: bool,
    pub stability: u32,
    pub kind: SurfaceKind,
}

/// The ambiguous band around 0.7 is deliberately treated as vertical.
pub fn classify_normal(normal: Vec3) -> SurfaceKind {
    if normal.normalize_or_zero().y.abs() > 0.7 {
        SurfaceKind::Horizontal
    } else {
        SurfaceKind::Vertical
    }
}

struct StabilityEntry {
    count: u32,
    last_seen: f32,
}

#[derive(Resource, Default)]
pub struct SurfaceRegistry {
    history: HashMap<IVec3, StabilityEntry>,
    real: HashMap<IVec3, SurfaceSampleEvent>,
    transient: Vec<SurfaceSampleEvent>, // non-real samples, replaced each refresh
    pub horizontal: Vec<Surface>,
    pub vertical: Vec<Surface>,
    hit_test: VecDeque<Surface>,
    last_hit_test: Option<f32>,
}

impl SurfaceRegistry {
    /// Coarse spatial bucket (0.1-unit grid) used to key repeated detections.
    pub fn quantize(position: Vec3) -> IVec3 {
        (position * 10.0).round().as_ivec3()
    }

    pub fn stability_of(&self, position: Vec3) -> u32 {
        self.history
            .get(&Self::quantize(position))
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Record one detection. Expired buckets are purged before the increment,
    /// so a surface unseen past the expiry window restarts at 1.
    pub fn note_sample(&mut self, sample: SurfaceSampleEvent, now: f32, expiry: f32) {
        self.purge_expired(now, expiry);

        if !sample.is_real {
            self.transient.push(sample);
            return;
        }

        let key = Self::quantize(sample.position);
        let entry = self.history.entry(key).or_insert(StabilityEntry { count: 0, last_seen: now });
        entry.count += 1;
        entry.last_seen = now;
        self.real.insert(key, sample);

        let stability = entry.count;
        self.hit_test.push_front(Surface {
            position: sample.position,
            rotation: sample.rotation,
            normal: sample.normal.normalize_or_zero(),
            width: sample.width,
            height: sample.height,
            is_real: true,
            stability,
            kind: classify_normal(sample.normal),
        });
        self.hit_test.truncate(HIT_TEST_KEEP);
        self.last_hit_test = Some(now);
    }

    pub fn purge_expired(&mut self, now: f32, expiry: f32) {
        self.history.retain(|_, e| now - e.last_seen <= expiry);
        let history = &self.history;
        self.real.retain(|k, _| history.contains_key(k));
    }

    fn validate(&self, sample: &SurfaceSampleEvent, camera_pos: Vec3, cfg: &SurfaceTuning) -> bool {
        if camera_pos.distance(sample.position) > cfg.max_distance {
            return false;
        }
        if sample.width * sample.height < cfg.min_surface_area {
            return false;
        }
        if sample.is_real && self.stability_of(sample.position) < cfg.stability_frames {
            return false;
        }
        true
    }

    /// Rebuild the classified lists from confirmed real surfaces, plus the
    /// mock set when fallback is allowed.
    pub fn refresh(&mut self, camera_pos: Vec3, cfg: &SurfaceTuning) {
        self.horizontal.clear();
        self.vertical.clear();

        let mut candidates: Vec<SurfaceSampleEvent> = self.real.values().copied().collect();
        if cfg.allow_fallback {
            candidates.extend(mock_samples());
        }
        candidates.append(&mut self.transient);

        for sample in candidates {
            if !self.validate(&sample, camera_pos, cfg) {
                continue;
            }
            let normal = sample.normal.normalize_or_zero();
            let kind = classify_normal(normal);
            let surface = Surface {
                position: sample.position,
                rotation: sample.rotation,
                normal,
                width: sample.width,
                height: sample.height,
                is_real: sample.is_real,
                stability: if sample.is_real { self.stability_of(sample.position) } else { 0 },
                kind,
            };
            match kind {
                SurfaceKind::Horizontal => self.horizontal.push(surface),
                _ => self.vertical.push(surface),
            }
        }
    }

    pub fn hit_test_active(&self, now: f32, recency: f32) -> bool {
        match self.last_hit_test {
            Some(t) => now - t < recency,
            None => false,
        }
    }

    pub fn latest_hit_test(&self) -> Option<&Surface> {
        self.hit_test.front()
    }

    pub fn has_real_surface(&self) -> bool {
        self.horizontal.iter().chain(self.vertical.iter()).any(|s| s.is_real)
    }

    /// Spawn gate: an active hit-test result counts, otherwise the classified
    /// lists must hold something (real when the session demands it).
    pub fn has_available_surface(&self, now: f32, cfg: &SurfaceTuning, require_real: bool) -> bool {
        if self.hit_test_active(now, cfg.hit_test_recency) && self.latest_hit_test().is_some() {
            return true;
        }
        if self.horizontal.is_empty() && self.vertical.is_empty() {
            return false;
        }
        if !require_real {
            return true;
        }
        self.has_real_surface()
    }
}

/// Fixed fallback set for devices without hit-testing: two walls and a floor
/// matching the stage geometry.
pub fn mock_samples() -> [SurfaceSampleEvent; 3] {
    let wall = |position: Vec3, normal: Vec3| SurfaceSampleEvent {
        position,
        rotation: Quat::from_rotation_arc(Vec3::Z, normal),
        normal,
        width: 2.0,
        height: 2.0,
        is_real: false,
    };
    [
        wall(Vec3::new(2.0, 1.5, -3.0), Vec3::NEG_X),
        wall(Vec3::new(-2.0, 1.5, -3.0), Vec3::X),
        SurfaceSampleEvent {
            position: Vec3::new(0.0, 0.0, -5.0),
            rotation: Quat::from_rotation_arc(Vec3::Z, Vec3::Y),
            normal: Vec3::Y,
            width: 4.0,
            height: 4.0,
            is_real: false,
        },
    ]
}

// ----------------------- Plugin -----------------------

#[derive(Resource)]
struct RefreshTimer(Timer);

pub struct SurfacePlugin;
impl Plugin for SurfacePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .add_event::<SurfaceSampleEvent>()
            .insert_resource(SurfaceRegistry::default())
            .insert_resource(RefreshTimer(Timer::from_seconds(0.1, TimerMode::Repeating)))
            .add_systems(Update, (ingest_samples, refresh_registry).chain());
    }
}

fn ingest_samples(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut registry: ResMut<SurfaceRegistry>,
    mut samples: EventReader<SurfaceSampleEvent>,
) {
    let now = time.elapsed_seconds();
    for sample in samples.read() {
        registry.note_sample(*sample, now, cfg.surface.stability_expiry);
    }
}

fn refresh_registry(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut timer: ResMut<RefreshTimer>,
    mut registry: ResMut<SurfaceRegistry>,
    q_camera: Query<&GlobalTransform, With<PlayerCamera>>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    let camera_pos = q_camera
        .get_single()
        .map(|t| t.translation())
        .unwrap_or(Vec3::new(0.0, 1.6, 0.0));
    registry.purge_expired(time.elapsed_seconds(), cfg.surface.stability_expiry);
    registry.refresh(camera_pos, &cfg.surface);
}
