//! Simulation clock для cooldown'ов gun
//!
//! Источник — `Time<Fixed>`: внутри FixedUpdate это время текущего шага,
//! снаружи (Update, тесты) — время последнего выполненного шага.

use bevy::prelude::*;

/// Секунды симуляции (0 если fixed clock ещё не создан)
pub fn simulation_time(world: &World) -> f32 {
    world
        .get_resource::<Time<Fixed>>()
        .map(|time| time.elapsed_secs())
        .unwrap_or(0.0)
}
