use archery_xr::plugins::config::SpawnTuning;
use archery_xr::plugins::spawn::{
    ensure_facing_camera, pick_surface, propose_from_hit_test, propose_from_surface,
    validate_spawn, yaw_toward,
};
use archery_xr::prelude::*;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const CAMERA: Vec3 = Vec3::new(0.0, 1.6, 0.0);
const FORWARD: Vec3 = Vec3::NEG_Z;

fn tuning() -> SpawnTuning {
    SpawnTuning::default()
}

fn point_at(position: Vec3) -> SpawnPoint {
    SpawnPoint {
        position,
        rotation: yaw_toward(position, CAMERA),
        kind: SurfaceKind::Vertical,
        is_real: false,
        normal: Vec3::Z,
    }
}

fn wall_surface(position: Vec3, normal: Vec3) -> Surface {
    Surface {
        position,
        rotation: Quat::from_rotation_arc(Vec3::Z, normal),
        normal,
        width: 2.0,
        height: 2.0,
        is_real: true,
        stability: 3,
        kind: archery_xr::plugins::surface::classify_normal(normal),
    }
}

#[test]
fn distance_band_is_enforced() {
    let cfg = tuning();
    let near = point_at(Vec3::new(0.0, 1.6, -1.0));
    let far = point_at(Vec3::new(0.0, 1.6, -15.0));
    let good = point_at(Vec3::new(0.0, 1.6, -4.0));
    assert!(!validate_spawn(&near, CAMERA, FORWARD, true, &[], &cfg));
    assert!(!validate_spawn(&far, CAMERA, FORWARD, true, &[], &cfg));
    assert!(validate_spawn(&good, CAMERA, FORWARD, true, &[], &cfg));
}

#[test]
fn first_target_uses_the_tight_cone() {
    let cfg = tuning();
    // 45 degrees off the view axis.
    let oblique = point_at(Vec3::new(3.0, 1.6, -3.0));
    assert!(
        !validate_spawn(&oblique, CAMERA, FORWARD, false, &[], &cfg),
        "45 degrees exceeds the 30 degree first-target cone"
    );
    assert!(
        validate_spawn(&oblique, CAMERA, FORWARD, true, &[], &cfg),
        "45 degrees fits the widened 60 degree cone"
    );
}

#[test]
fn spacing_rejects_crowded_placements() {
    let cfg = tuning();
    let point = point_at(Vec3::new(0.0, 1.6, -3.0));
    let crowded = [Vec3::new(0.0, 1.6, -3.3)];
    let spread = [Vec3::new(0.0, 1.6, -4.0)];
    assert!(!validate_spawn(&point, CAMERA, FORWARD, true, &crowded, &cfg));
    assert!(validate_spawn(&point, CAMERA, FORWARD, true, &spread, &cfg));
}

#[test]
fn yaw_toward_faces_the_observer() {
    let position = Vec3::new(0.0, 1.0, -3.0);
    let rotation = yaw_toward(position, CAMERA);
    let forward = rotation * Vec3::NEG_Z;
    let to_camera = (CAMERA - position).normalize();
    // Yaw-only: the horizontal components must line up.
    assert!(forward.y.abs() < 1e-6);
    assert!(forward.dot(Vec3::new(to_camera.x, 0.0, to_camera.z).normalize()) > 0.999);
}

#[test]
fn backwards_placements_get_flipped() {
    let mut point = point_at(Vec3::new(0.0, 1.6, -3.0));
    // Identity forward is -Z, pointing away from a camera behind the target.
    point.rotation = Quat::IDENTITY;
    ensure_facing_camera(&mut point, CAMERA);
    let forward = point.rotation * Vec3::NEG_Z;
    let to_camera = (CAMERA - point.position).normalize();
    assert!(forward.dot(to_camera) > 0.0, "scoring face must look at the player");
}

#[test]
fn wall_placements_stand_off_the_surface() {
    let cfg = tuning();
    let mut rng = StdRng::seed_from_u64(7);
    let surface = wall_surface(Vec3::new(-2.0, 1.5, -3.0), Vec3::X);
    let point = propose_from_surface(&surface, CAMERA, 0.5, &cfg, &mut rng);
    assert_eq!(point.kind, SurfaceKind::Vertical);
    // Offset along the wall normal, randomized only along the wall plane.
    assert!((point.position.x - (-2.0 + cfg.vertical_offset)).abs() < 1e-5);
    let face = point.rotation * Vec3::NEG_Z;
    assert!(face.dot(surface.normal) > 0.999);
}

#[test]
fn floor_placements_rise_to_target_height() {
    let cfg = tuning();
    let mut rng = StdRng::seed_from_u64(7);
    let surface = wall_surface(Vec3::new(0.0, 0.0, -5.0), Vec3::Y);
    let point = propose_from_surface(&surface, CAMERA, 0.5, &cfg, &mut rng);
    assert_eq!(point.kind, SurfaceKind::Horizontal);
    assert!((point.position.y - 0.5).abs() < 1e-5);
    // Randomization stays within 60% of the extents.
    assert!((point.position.x).abs() <= 0.6 + 1e-5);
    assert!((point.position.z + 5.0).abs() <= 0.6 + 1e-5);
}

#[test]
fn ceiling_placements_hang_below() {
    let cfg = tuning();
    let mut rng = StdRng::seed_from_u64(7);
    let surface = wall_surface(Vec3::new(0.0, 2.5, -3.0), Vec3::NEG_Y);
    let point = propose_from_surface(&surface, CAMERA, 0.5, &cfg, &mut rng);
    assert!((point.position.y - (2.5 - cfg.ceiling_offset)).abs() < 1e-5);
}

#[test]
fn hit_test_floor_pose_spawns_upright() {
    let cfg = tuning();
    let surface = wall_surface(Vec3::new(0.0, 0.0, -3.0), Vec3::Y);
    let point = propose_from_hit_test(&surface, CAMERA, &cfg);
    assert_eq!(point.kind, SurfaceKind::Horizontal);
    assert!(point.position.y > 0.0);
    assert!(point.is_real);
}

#[test]
fn hit_test_wall_pose_faces_outward() {
    let cfg = tuning();
    let surface = wall_surface(Vec3::new(2.0, 1.5, -3.0), Vec3::NEG_X);
    let point = propose_from_hit_test(&surface, CAMERA, &cfg);
    assert_eq!(point.kind, SurfaceKind::Vertical);
    assert!((point.position.x - (2.0 - cfg.vertical_offset)).abs() < 1e-5);
    let face = point.rotation * Vec3::NEG_Z;
    assert!(face.dot(surface.normal) > 0.999);
}

#[test]
fn surface_preference_is_strict_but_random_takes_anything() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut registry = SurfaceRegistry::default();
    registry
        .vertical
        .push(wall_surface(Vec3::new(2.0, 1.5, -3.0), Vec3::NEG_X));

    assert!(pick_surface(&registry, SurfaceKind::Horizontal, &mut rng).is_none());
    assert!(pick_surface(&registry, SurfaceKind::Vertical, &mut rng).is_some());
    let picked = pick_surface(&registry, SurfaceKind::Random, &mut rng);
    assert_eq!(picked.map(|s| s.kind), Some(SurfaceKind::Vertical));
}

#[test]
fn difficulty_presets_roll_expected_ranges() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        assert_eq!(Difficulty::Easy.roll(&mut rng), (10, 1));
        let (points, hp) = Difficulty::Normal.roll(&mut rng);
        assert_eq!(points, 15);
        assert!((1..=2).contains(&hp));
        let (points, hp) = Difficulty::Hard.roll(&mut rng);
        assert_eq!(points, 20);
        assert!((1..=3).contains(&hp));
    }
}
