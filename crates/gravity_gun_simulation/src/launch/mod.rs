//! Launch domain — бросок объекта импульсом
//!
//! Два пути:
//! - `launch_from_viewport` — бросить конкретное тело (обычно только что отпущенное)
//! - `launch_by_probe` — найти тело лучом на `hit_range` и бросить его
//!
//! Скорость после импульса нормализуется на СЛЕДУЮЩЕМ fixed step
//! (`LaunchVelocityAdjustment` через next-step очередь): импульс становится
//! скоростью только после physics step.

pub mod events;
pub mod launcher;

#[cfg(test)]
mod launch_tests;

pub use events::{LaunchFailed, LaunchSucceeded};
pub use launcher::{
    apply_launch_impulse, launch_by_probe, launch_from_viewport, LaunchVelocityAdjustment,
    ObjectLauncher,
};
