//! Rapier backend (bevy_rapier3d)
//!
//! Работает с компонентами bevy_rapier напрямую:
//! - probe: `Collider::cast_ray` по всем `RigidBody::Dynamic` (collider на том же entity)
//! - скорость: `Velocity` (добавляется если не было)
//! - импульс: `ExternalImpulse` (rapier сбрасывает его после step),
//!   крутящий момент — относительно центра масс (`ReadMassProperties`)
//! - позы: `GlobalTransform` (collider может сидеть на child entity)
//!
//! Rapier должен работать в FixedUpdate
//! (`RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule()`),
//! gun системы ставятся ДО `PhysicsSet::SyncBackend`.

use bevy::prelude::*;
use bevy_rapier3d::parry::shape::Shape as _;
use bevy_rapier3d::plugin::PhysicsSet;
use bevy_rapier3d::prelude::*;

use super::{BodyBounds, BodyVelocity, GravityGunBackend, ProbeHit};
use crate::{GravityGunPlugin, GravityGunSystems};

/// Допуск касания для overlap проверки (метры — rapier сцены обычно в метрах)
pub const RAPIER_CONTACT_SKIN: f32 = 0.02;

pub struct RapierBackend;

impl RapierBackend {
    fn world_pose(global: &GlobalTransform) -> Transform {
        global.compute_transform()
    }

    fn collider_bounds(collider: &Collider, global: &GlobalTransform) -> BodyBounds {
        let aabb = collider.raw.compute_local_aabb();
        let center = aabb.center();
        let half_extents = aabb.half_extents();

        BodyBounds::from_local_box(
            &Self::world_pose(global),
            Vec3::new(center.x, center.y, center.z),
            Vec3::new(half_extents.x, half_extents.y, half_extents.z),
        )
    }
}

impl GravityGunBackend for RapierBackend {
    fn cast_ray(
        world: &mut World,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        ignore: &[Entity],
    ) -> Option<ProbeHit> {
        let mut nearest: Option<ProbeHit> = None;

        let mut bodies = world.query::<(Entity, &RigidBody, &Collider, &GlobalTransform)>();
        for (entity, body, collider, global) in bodies.iter(world) {
            if !matches!(body, RigidBody::Dynamic) || ignore.contains(&entity) {
                continue;
            }

            let (_, rotation, translation) = global.to_scale_rotation_translation();
            let Some(distance) = collider.cast_ray(
                translation,
                rotation,
                origin,
                direction,
                max_range,
                true,
            ) else {
                continue;
            };

            if nearest.is_none_or(|hit| distance < hit.distance) {
                nearest = Some(ProbeHit {
                    body: entity,
                    collider: entity,
                    point: origin + direction * distance,
                    distance,
                });
            }
        }

        nearest
    }

    fn body_pose(world: &World, body: Entity) -> Option<Transform> {
        world.get::<RigidBody>(body)?;
        world.get::<GlobalTransform>(body).map(Self::world_pose)
    }

    fn body_bounds(world: &World, body: Entity) -> Option<BodyBounds> {
        let collider = world.get::<Collider>(body)?;
        let global = world.get::<GlobalTransform>(body)?;
        Some(Self::collider_bounds(collider, global))
    }

    fn distance_to_surface(world: &World, body: Entity, point: Vec3) -> Option<f32> {
        let collider = world.get::<Collider>(body)?;
        let (_, rotation, translation) = world.get::<GlobalTransform>(body)?.to_scale_rotation_translation();
        Some(collider.distance_to_point(translation, rotation, point, true))
    }

    fn velocity(world: &World, body: Entity) -> Option<BodyVelocity> {
        world.get::<RigidBody>(body)?;
        // Без Velocity компонента rapier скорость не отдаёт — считаем что тело стоит
        let velocity = world.get::<Velocity>(body).copied().unwrap_or_default();
        Some(BodyVelocity {
            linear: velocity.linvel,
            angular: velocity.angvel,
        })
    }

    fn set_velocity(world: &mut World, body: Entity, velocity: BodyVelocity) {
        let Ok(mut entity) = world.get_entity_mut(body) else {
            return;
        };

        if let Some(mut current) = entity.get_mut::<Velocity>() {
            current.linvel = velocity.linear;
            current.angvel = velocity.angular;
        } else {
            entity.insert(Velocity {
                linvel: velocity.linear,
                angvel: velocity.angular,
            });
        }
    }

    fn apply_impulse_at_point(world: &mut World, body: Entity, impulse: Vec3, point: Vec3) {
        let Ok(mut entity) = world.get_entity_mut(body) else {
            return;
        };
        let Some(global) = entity.get::<GlobalTransform>().copied() else {
            return;
        };
        // Без ReadMassProperties (ещё не посчитаны) — origin тела
        let local_center = entity
            .get::<ReadMassProperties>()
            .map(|mass| mass.get().local_center_of_mass)
            .unwrap_or(Vec3::ZERO);
        let center = global.transform_point(local_center);
        let torque_impulse = (point - center).cross(impulse);

        if let Some(mut external) = entity.get_mut::<ExternalImpulse>() {
            external.impulse += impulse;
            external.torque_impulse += torque_impulse;
        } else {
            entity.insert(ExternalImpulse {
                impulse,
                torque_impulse,
            });
        }
    }

    fn is_overlapping(world: &World, a: Entity, b: Entity) -> bool {
        let (Some(bounds_a), Some(bounds_b)) = (Self::body_bounds(world, a), Self::body_bounds(world, b)) else {
            return false;
        };
        bounds_a.overlaps(&bounds_b, RAPIER_CONTACT_SKIN)
    }
}

/// Gravity gun поверх bevy_rapier3d
///
/// Сам `RapierPhysicsPlugin` не добавляет — host настраивает физику сам.
pub struct RapierGravityGunPlugin;

impl Plugin for RapierGravityGunPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(GravityGunPlugin::<RapierBackend>::default())
            // Наши системы запускаются ДО rapier physics step
            .configure_sets(FixedUpdate, GravityGunSystems.before(PhysicsSet::SyncBackend));
    }
}
