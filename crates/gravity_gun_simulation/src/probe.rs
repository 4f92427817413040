//! Line-of-sight probe — один луч по simulated телам
//!
//! Используется grabber'ом (aim + grab) и launcher'ом (бросок без захвата).
//! Промах — нормальный исход, не ошибка; побочных эффектов нет.

use bevy::prelude::*;

use crate::physics::{GravityGunBackend, ProbeHit};
use crate::shared::{attach_parent, Viewpoint};

/// Луч от `origin` вдоль `direction` длиной `max_range`.
///
/// Исключает сам gun и его носителя (игрок не должен ловить собственную капсулу).
/// Нулевое направление → `None`.
pub fn probe<B: GravityGunBackend>(
    world: &mut World,
    gun: Entity,
    origin: Vec3,
    direction: Vec3,
    max_range: f32,
) -> Option<ProbeHit> {
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO || max_range <= 0.0 {
        return None;
    }

    let ignore: Vec<Entity> = std::iter::once(gun)
        .chain(attach_parent(world, gun))
        .collect();

    B::cast_ray(world, origin, direction, max_range, &ignore)
}

/// Probe вдоль взгляда
pub fn probe_from_viewpoint<B: GravityGunBackend>(
    world: &mut World,
    gun: Entity,
    view: &Viewpoint,
    max_range: f32,
) -> Option<ProbeHit> {
    probe::<B>(world, gun, view.position, view.forward(), max_range)
}
