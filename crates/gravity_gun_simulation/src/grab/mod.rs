//! Grab domain — захват и удержание объекта перед игроком
//!
//! Состояния: Idle (ничего не держим, следим за прицелом) и Holding
//! (handle тянет объект к точке перед камерой).
//!
//! Per-tick (FixedUpdate, `tick_grabbers`):
//! - Holding: принудительный release (unequip / self-overlap / слишком далеко / тело пропало),
//!   иначе обновить target pose handle
//! - Idle: probe на grab_range → `CanGrabChanged` только на переходе

pub mod events;
pub mod grabber;
pub mod systems;


pub use events::{CanGrabChanged, ObjectGrabbed, ObjectReleased, ReleaseReason};
pub use grabber::{clamp_release_velocity, hover_distance, ObjectGrabber};
pub use systems::{attempt_grab, held_object, release_held, tick_grabber, tick_grabbers, toggle_grab, GrabToggle};
