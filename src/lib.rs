//! Library entry for integration tests & external tooling.
//! Exposes plugin modules and a prelude for common types.

pub mod plugins {
    pub mod core_sim;
    pub mod config;
    pub mod stage;
    pub mod surface;
    pub mod anchor;
    pub mod spawn;
    pub mod target;
    pub mod arrow;
    pub mod bow;
    pub mod session;
    pub mod combo;
    pub mod menu;
    pub mod hud;
}
pub mod prelude;
