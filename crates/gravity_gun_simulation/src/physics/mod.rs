//! Physics слой gravity gun
//!
//! - `backend` — trait seam между gun логикой и физическим движком
//! - `handle` — grab attachment (velocity drive к target pose)
//! - `headless` — детерминированный backend для тестов/headless
//! - `rapier` — backend поверх bevy_rapier3d

pub mod backend;
pub mod handle;
pub mod headless;
pub mod rapier;

// Re-export основных типов
pub use backend::{BodyBounds, BodyVelocity, GravityGunBackend, ProbeHit};
pub use handle::{drive_physics_handles, PhysicsHandle};
pub use headless::{
    integrate_sim_bodies, HeadlessPhysics, HeadlessPhysicsPlugin, HeadlessPhysicsSettings,
    SimBody, SimBodyKind, SimShape,
};
pub use rapier::{RapierBackend, RapierGravityGunPlugin};
