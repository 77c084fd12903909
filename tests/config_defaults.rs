use archery_xr::prelude::*;

#[test]
fn shipped_config_parses() {
    let data = include_str!("../assets/config/game.ron");
    let cfg: GameConfig = ron::from_str(data).expect("game.ron must stay parseable");
    assert_eq!(cfg.session.game_time, 60);
    assert_eq!(cfg.spawn.max_targets, 3);
    assert_eq!(cfg.spawn.preferred_surface, SurfaceKind::Random);
    assert!(cfg.surface.allow_fallback);
}

#[test]
fn defaults_match_the_tuning_tables() {
    let cfg = GameConfig::default();
    assert!((cfg.arrow.fall_speed_threshold - 4.0).abs() < 1e-6);
    assert!((cfg.bow.max_arrow_speed - 80.0).abs() < 1e-6);
    assert!((cfg.target.outer_radius - 0.5).abs() < 1e-6);
    assert_eq!(cfg.surface.stability_frames, 3);
    assert_eq!(cfg.session.difficulty, Difficulty::Normal);
}

#[test]
fn partial_config_falls_back_per_field() {
    let cfg: GameConfig =
        ron::from_str("GameConfig(session: SessionTuning(game_time: 30))").expect("parse");
    assert_eq!(cfg.session.game_time, 30);
    // Untouched sections keep their defaults.
    assert_eq!(cfg.session.difficulty, Difficulty::Normal);
    assert!((cfg.bow.desktop_speed - 45.0).abs() < 1e-6);
}
