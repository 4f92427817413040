//! Grab операции и per-tick update
//!
//! Все функции работают с `&mut World` (exclusive systems): probe, физика и
//! observers вызываются синхронно, без Commands и без задержки на кадр.

use bevy::prelude::*;

use super::events::{CanGrabChanged, ObjectGrabbed, ObjectReleased, ReleaseReason};
use super::grabber::{clamp_release_velocity, hover_distance, ObjectGrabber};
use crate::error::GrabRejection;
use crate::logger::log;
use crate::physics::{GravityGunBackend, PhysicsHandle};
use crate::probe::probe_from_viewpoint;
use crate::shared::{attach_parent, sample_viewpoint, simulation_time, Viewpoint};

/// Результат toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabToggle {
    Grabbed(Entity),
    Released(Entity),
}

/// Что gun держит сейчас (состояние на последнем тике, без перепроверки)
pub fn held_object(world: &World, gun: Entity) -> Option<Entity> {
    world.get::<PhysicsHandle>(gun)?.grabbed()
}

/// Holding → release, Idle → попытка захвата
pub fn toggle_grab<B: GravityGunBackend>(world: &mut World, gun: Entity) -> Result<GrabToggle, GrabRejection> {
    if let Some(object) = release_held::<B>(world, gun, ReleaseReason::Manual) {
        return Ok(GrabToggle::Released(object));
    }

    attempt_grab::<B>(world, gun).map(GrabToggle::Grabbed)
}

/// Схватить то, что под прицелом
pub fn attempt_grab<B: GravityGunBackend>(world: &mut World, gun: Entity) -> Result<Entity, GrabRejection> {
    let now = simulation_time(world);
    let (Some(grabber), Some(handle)) = (world.get::<ObjectGrabber>(gun), world.get::<PhysicsHandle>(gun)) else {
        return Err(GrabRejection::MissingGrabber);
    };

    if !grabber.has_reloaded(now) {
        return Err(GrabRejection::Cooldown {
            remaining: grabber.cooldown_remaining(now),
        });
    }
    if let Some(held) = handle.grabbed() {
        return Err(GrabRejection::AlreadyHolding(held));
    }
    let settings = *grabber.settings();

    let view = sample_viewpoint(world, gun).ok_or(GrabRejection::MissingViewpoint)?;
    let hit = probe_from_viewpoint::<B>(world, gun, &view, settings.grab_range)
        .ok_or(GrabRejection::NothingInRange)?;
    let object = hit.body;

    // Игрок стоит на ящике — не даём поднять самого себя
    if carrier_overlaps::<B>(world, gun, object) {
        return Err(GrabRejection::SelfOverlap(object));
    }

    let pose = B::body_pose(world, object).ok_or(GrabRejection::TargetLost(object))?;
    let bounds = B::body_bounds(world, object).ok_or(GrabRejection::TargetLost(object))?;

    let relative_rotation = view.rotation.inverse() * pose.rotation;
    let grab_distance = (pose.translation - view.position)
        .length()
        .min(settings.maximum_hover_distance);

    let Some(mut handle) = world.get_mut::<PhysicsHandle>(gun) else {
        return Err(GrabRejection::MissingGrabber);
    };
    handle.grab(object, &pose, bounds.center, pose.rotation);

    if let Some(mut grabber) = world.get_mut::<ObjectGrabber>(gun) {
        grabber.begin_hold(relative_rotation, grab_distance);
    }

    log(&format!(
        "🧲 Grabbed {:?} (gun {:?}, hit at {:.1}, hover {:.1})",
        object, gun, hit.distance, grab_distance
    ));
    world.trigger(ObjectGrabbed { gun, object });

    Ok(object)
}

/// Отпустить объект (no-op если ничего не держим)
///
/// Возвращает отпущенное тело. Слишком быструю скорость срезает до
/// `max_release_velocity`, чтобы объект не вылетал из рук пулей.
pub fn release_held<B: GravityGunBackend>(world: &mut World, gun: Entity, reason: ReleaseReason) -> Option<Entity> {
    let object = held_object(world, gun)?;

    let max_speed = world
        .get::<ObjectGrabber>(gun)
        .map(|grabber| grabber.settings().max_release_velocity);

    if let (Some(max_speed), Some(velocity)) = (max_speed, B::velocity(world, object)) {
        if let Some(clamped) = clamp_release_velocity(velocity, max_speed) {
            B::set_velocity(world, object, clamped);
        }
    }

    if let Some(mut handle) = world.get_mut::<PhysicsHandle>(gun) {
        handle.release();
    }

    let now = simulation_time(world);
    if let Some(mut grabber) = world.get_mut::<ObjectGrabber>(gun) {
        grabber.record_release(now);
    }

    log(&format!("🫳 Released {:?} (gun {:?}, {:?})", object, gun, reason));
    world.trigger(ObjectReleased { gun, object, reason });

    Some(object)
}

/// Per-tick update одного grabber'а
pub fn tick_grabber<B: GravityGunBackend>(world: &mut World, gun: Entity) {
    let Some(mut grabber) = world.get_mut::<ObjectGrabber>(gun) else {
        return;
    };
    if grabber.take_announcement() {
        world.trigger(CanGrabChanged { gun, can_grab: false });
    }

    let Some(view) = sample_viewpoint(world, gun) else {
        return;
    };

    match held_object(world, gun) {
        Some(object) => update_holding::<B>(world, gun, object, &view),
        None => update_aim::<B>(world, gun, &view),
    }
}

/// System: tick всех grabber'ов (порядок по Entity — детерминизм)
pub fn tick_grabbers<B: GravityGunBackend>(world: &mut World) {
    let mut guns: Vec<Entity> = world
        .query_filtered::<Entity, With<ObjectGrabber>>()
        .iter(world)
        .collect();
    guns.sort();

    for gun in guns {
        tick_grabber::<B>(world, gun);
    }
}

fn update_holding<B: GravityGunBackend>(world: &mut World, gun: Entity, object: Entity, view: &Viewpoint) {
    let Some(grabber) = world.get::<ObjectGrabber>(gun) else {
        return;
    };
    let force_release_distance = grabber.settings().force_release_distance;
    let initial_grab_distance = grabber.initial_grab_distance();
    let initial_relative_rotation = grabber.initial_relative_rotation();

    let (Some(bounds), Some(closest)) = (
        B::body_bounds(world, object),
        B::distance_to_surface(world, object, view.position),
    ) else {
        release_held::<B>(world, gun, ReleaseReason::TargetLost);
        return;
    };

    let Some(carrier) = attach_parent(world, gun) else {
        release_held::<B>(world, gun, ReleaseReason::Unequipped);
        return;
    };

    if B::is_overlapping(world, carrier, object) {
        release_held::<B>(world, gun, ReleaseReason::SelfOverlap);
        return;
    }

    if closest > force_release_distance {
        release_held::<B>(world, gun, ReleaseReason::TooFar);
        return;
    }

    let distance_to_center = (bounds.center - view.position).length();
    let hover = hover_distance(distance_to_center, closest, initial_grab_distance);

    if let Some(mut handle) = world.get_mut::<PhysicsHandle>(gun) {
        handle.set_target(view.point_at(hover), view.rotation * initial_relative_rotation);
    }
}

fn update_aim<B: GravityGunBackend>(world: &mut World, gun: Entity, view: &Viewpoint) {
    let Some(range) = world
        .get::<ObjectGrabber>(gun)
        .map(|grabber| grabber.settings().grab_range)
    else {
        return;
    };

    let hit = probe_from_viewpoint::<B>(world, gun, view, range).map(|hit| hit.body);

    let Some(mut grabber) = world.get_mut::<ObjectGrabber>(gun) else {
        return;
    };
    if let Some(can_grab) = grabber.update_aim(hit) {
        world.trigger(CanGrabChanged { gun, can_grab });
    }
}

fn carrier_overlaps<B: GravityGunBackend>(world: &World, gun: Entity, object: Entity) -> bool {
    attach_parent(world, gun).is_some_and(|carrier| B::is_overlapping(world, carrier, object))
}
