use archery_xr::prelude::*;
use bevy::prelude::*;

#[test]
fn creation_is_bounded_fifo() {
    let mut registry = AnchorRegistry::default();
    let mut ids = Vec::new();
    for i in 0..35 {
        let id = registry
            .create(Vec3::new(i as f32, 0.0, 0.0), Quat::IDENTITY)
            .unwrap();
        ids.push(id);
    }
    assert_eq!(registry.len(), registry.max_anchors);
    // The five oldest were evicted, the newest survive.
    for id in &ids[..5] {
        assert!(registry.get(*id).is_none());
    }
    for id in &ids[5..] {
        assert!(registry.get(*id).is_some());
    }
}

#[test]
fn anchors_keep_their_pose() {
    let mut registry = AnchorRegistry::default();
    let rotation = Quat::from_rotation_y(1.0);
    let id = registry.create(Vec3::new(1.0, 2.0, -3.0), rotation).unwrap();
    let anchor = registry.get(id).unwrap();
    assert_eq!(anchor.position, Vec3::new(1.0, 2.0, -3.0));
    assert_eq!(anchor.rotation, rotation);
    assert!(anchor.entity.is_none());
}

#[test]
fn cleanup_drops_anchors_with_dead_entities() {
    let mut world = World::new();
    let alive = world.spawn_empty().id();
    let dead = world.spawn_empty().id();
    world.despawn(dead);

    let mut registry = AnchorRegistry::default();
    let a = registry.create(Vec3::ZERO, Quat::IDENTITY).unwrap();
    let b = registry.create(Vec3::X, Quat::IDENTITY).unwrap();
    let c = registry.create(Vec3::Y, Quat::IDENTITY).unwrap();
    registry.attach(a, alive);
    registry.attach(b, dead);
    // c stays unattached and must survive cleanup.

    let dropped = registry.retain_live(|e| world.get_entity(e).is_some());
    assert_eq!(dropped, 1);
    assert!(registry.get(a).is_some());
    assert!(registry.get(b).is_none());
    assert!(registry.get(c).is_some());
}
