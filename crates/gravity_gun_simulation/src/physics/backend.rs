//! Physics backend seam для gravity gun
//!
//! ECS владеет состоянием gun (cooldowns, handle, lifecycle), а физику
//! (лучи, скорости, импульсы) выполняет backend. Два backend'а:
//! - `HeadlessPhysics` — детерминированный, для тестов и headless симуляции
//! - `RapierBackend` — поверх bevy_rapier3d компонентов
//!
//! Все функции ассоциированные (без `self`) и работают с `World` напрямую:
//! gun системы exclusive, backend сам решает какие компоненты читать.

use bevy::prelude::*;

/// Результат probe: ближайшее simulated тело на луче
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Rigid body ("actor") — то, что хватаем/бросаем
    pub body: Entity,
    /// Collider, в который попал луч (может совпадать с body)
    pub collider: Entity,
    /// Мировая точка попадания
    pub point: Vec3,
    /// Дистанция от origin до точки попадания
    pub distance: f32,
}

/// World-space AABB тела
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyBounds {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl BodyBounds {
    /// AABB повёрнутого local box (center/half_extents в local space тела)
    pub fn from_local_box(transform: &Transform, local_center: Vec3, local_half_extents: Vec3) -> Self {
        let rotation = Mat3::from_quat(transform.rotation);
        let abs_rotation = Mat3::from_cols(
            rotation.x_axis.abs(),
            rotation.y_axis.abs(),
            rotation.z_axis.abs(),
        );

        Self {
            center: transform.translation + transform.rotation * local_center,
            half_extents: abs_rotation * local_half_extents,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Пересечение AABB с допуском `skin` (касание = overlap)
    pub fn overlaps(&self, other: &BodyBounds, skin: f32) -> bool {
        let gap = (self.center - other.center).abs() - (self.half_extents + other.half_extents);
        gap.max_element() <= skin
    }
}

/// Линейная + угловая скорость тела
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyVelocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Доступ gravity gun к физическому миру
///
/// Контракт:
/// - `cast_ray` видит только dynamic (simulated) тела, `direction` нормализован
/// - любое `None`/`false` для despawned entity — нормальный исход, не ошибка
/// - `apply_impulse_at_point` влияет на скорость только после следующего physics step
pub trait GravityGunBackend: Send + Sync + 'static {
    fn cast_ray(
        world: &mut World,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        ignore: &[Entity],
    ) -> Option<ProbeHit>;

    fn body_pose(world: &World, body: Entity) -> Option<Transform>;

    fn body_bounds(world: &World, body: Entity) -> Option<BodyBounds>;

    /// Дистанция от `point` до ближайшей точки collision геометрии (0 если внутри)
    fn distance_to_surface(world: &World, body: Entity, point: Vec3) -> Option<f32>;

    fn velocity(world: &World, body: Entity) -> Option<BodyVelocity>;

    fn set_velocity(world: &mut World, body: Entity, velocity: BodyVelocity);

    fn apply_impulse_at_point(world: &mut World, body: Entity, impulse: Vec3, point: Vec3);

    fn is_overlapping(world: &World, a: Entity, b: Entity) -> bool;
}
