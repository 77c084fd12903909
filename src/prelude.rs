//! Convenience re-exports for frequently used types & plugins.
pub use crate::plugins::anchor::{Anchor, AnchorPlugin, AnchorRegistry};
pub use crate::plugins::arrow::{
    spawn_arrow, step_flight, Arrow, ArrowCollisionEvent, ArrowKinematic, ArrowMode,
    ArrowPlugin, Collidable, CollidableKind, PlantedArrow,
};
pub use crate::plugins::bow::{ArrowShotEvent, BowPlugin, DrawState, HandPoses};
pub use crate::plugins::combo::{ComboPlugin, ComboState};
pub use crate::plugins::config::{ConfigPlugin, GameConfig};
pub use crate::plugins::core_sim::{CoreSimPlugin, SimState};
pub use crate::plugins::hud::{Hud, HudPlugin};
pub use crate::plugins::menu::{MenuAction, MenuButton, MenuHitEvent, MenuPlugin};
pub use crate::plugins::session::{
    CountdownTimer, Difficulty, GameEndedEvent, GamePhase, Score, SessionPlugin,
};
pub use crate::plugins::spawn::{SpawnPlugin, SpawnPoint, SpawnState};
pub use crate::plugins::stage::{PlayerCamera, StagePlugin};
pub use crate::plugins::surface::{
    classify_normal, Surface, SurfaceKind, SurfacePlugin, SurfaceRegistry, SurfaceSampleEvent,
};
pub use crate::plugins::target::{
    Target, TargetDestroyedEvent, TargetHitEvent, TargetPlugin, TargetStruckEvent, Zone,
    ZoneRadii,
};
