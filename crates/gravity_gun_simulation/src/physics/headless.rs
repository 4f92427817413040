//! Headless physics backend (без Rapier)
//!
//! Минимальная детерминированная rigid-body симуляция для тестов и
//! headless прогонов: шары и кубоиды, импульсы, gravity, damping.
//! Контактов между телами нет — gravity gun они не нужны.
//!
//! Порядок внутри FixedUpdate: gun системы → `integrate_sim_bodies`.
//! Импульс копится в `SimBody` и превращается в скорость только на
//! следующей интеграции (как в настоящем physics step).

use bevy::prelude::*;

use super::{BodyBounds, BodyVelocity, GravityGunBackend, ProbeHit};
use crate::GravityGunSystems;

/// Допуск касания для overlap проверки (мировые единицы)
pub const CONTACT_SKIN: f32 = 1.0;

/// Форма тела (в local space, центр = origin)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum SimShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

impl SimShape {
    fn local_half_extents(&self) -> Vec3 {
        match *self {
            SimShape::Ball { radius } => Vec3::splat(radius),
            SimShape::Cuboid { half_extents } => half_extents,
        }
    }

    /// Диагональ тензора инерции (local space) для массы `mass`
    fn inertia(&self, mass: f32) -> Vec3 {
        match *self {
            SimShape::Ball { radius } => Vec3::splat(0.4 * mass * radius * radius),
            SimShape::Cuboid { half_extents } => {
                let size_sq = (half_extents * 2.0) * (half_extents * 2.0);
                Vec3::new(
                    size_sq.y + size_sq.z,
                    size_sq.x + size_sq.z,
                    size_sq.x + size_sq.y,
                ) * (mass / 12.0)
            }
        }
    }
}

/// Кем управляется тело
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SimBodyKind {
    /// Simulated: probe видит, импульсы/gravity работают
    Dynamic,
    /// Двигается извне (игрок), probe не видит
    Kinematic,
    /// Неподвижная геометрия
    Static,
}

/// Rigid body headless backend'а
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct SimBody {
    pub shape: SimShape,
    pub kind: SimBodyKind,
    pub mass: f32,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Linear damping (1/сек)
    pub linear_damping: f32,
    pub(crate) pending_impulse: Vec3,
    pub(crate) pending_torque_impulse: Vec3,
}

impl SimBody {
    pub fn dynamic(shape: SimShape, mass: f32) -> Self {
        Self {
            shape,
            kind: SimBodyKind::Dynamic,
            mass,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            linear_damping: 0.0,
            pending_impulse: Vec3::ZERO,
            pending_torque_impulse: Vec3::ZERO,
        }
    }

    pub fn kinematic(shape: SimShape) -> Self {
        Self {
            kind: SimBodyKind::Kinematic,
            ..Self::dynamic(shape, 0.0)
        }
    }

    pub fn fixed(shape: SimShape) -> Self {
        Self {
            kind: SimBodyKind::Static,
            ..Self::dynamic(shape, 0.0)
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == SimBodyKind::Dynamic
    }

    pub fn pending_impulse(&self) -> Vec3 {
        self.pending_impulse
    }

    pub fn bounds(&self, transform: &Transform) -> BodyBounds {
        BodyBounds::from_local_box(transform, Vec3::ZERO, self.shape.local_half_extents())
    }

    /// Дистанция от точки до поверхности (0 внутри тела)
    pub fn distance_to_surface(&self, transform: &Transform, point: Vec3) -> f32 {
        let local = transform.rotation.inverse() * (point - transform.translation);
        match self.shape {
            SimShape::Ball { radius } => (local.length() - radius).max(0.0),
            SimShape::Cuboid { half_extents } => {
                (local.abs() - half_extents).max(Vec3::ZERO).length()
            }
        }
    }

    /// Дистанция вдоль луча до входа в тело (0 если origin внутри)
    pub fn ray_distance(&self, transform: &Transform, origin: Vec3, direction: Vec3) -> Option<f32> {
        let inverse = transform.rotation.inverse();
        let local_origin = inverse * (origin - transform.translation);
        let local_direction = inverse * direction;

        match self.shape {
            SimShape::Ball { radius } => ray_ball(local_origin, local_direction, radius),
            SimShape::Cuboid { half_extents } => {
                ray_cuboid(local_origin, local_direction, half_extents)
            }
        }
    }

    fn apply_pending_impulses(&mut self, rotation: Quat) {
        if self.mass <= 0.0 {
            self.pending_impulse = Vec3::ZERO;
            self.pending_torque_impulse = Vec3::ZERO;
            return;
        }

        self.linear_velocity += self.pending_impulse / self.mass;

        let inertia = self.shape.inertia(self.mass);
        if inertia.min_element() > 0.0 {
            let local_torque = rotation.inverse() * self.pending_torque_impulse;
            self.angular_velocity += rotation * (local_torque / inertia);
        }

        self.pending_impulse = Vec3::ZERO;
        self.pending_torque_impulse = Vec3::ZERO;
    }
}

fn ray_ball(origin: Vec3, direction: Vec3, radius: f32) -> Option<f32> {
    let c = origin.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = origin.dot(direction);
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    Some(-b - discriminant.sqrt())
}

/// Slab test против AABB [-half, half]
fn ray_cuboid(origin: Vec3, direction: Vec3, half_extents: Vec3) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let h = half_extents[axis];

        if d.abs() < f32::EPSILON {
            if o < -h || o > h {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (-h - o) * inv;
        let mut t1 = (h - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}

/// Глобальные параметры headless мира
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct HeadlessPhysicsSettings {
    /// Ускорение свободного падения (см/с², Y-up)
    pub gravity: Vec3,
}

impl Default for HeadlessPhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -980.0, 0.0),
        }
    }
}

impl HeadlessPhysicsSettings {
    pub fn zero_gravity() -> Self {
        Self { gravity: Vec3::ZERO }
    }
}

/// Backend поверх `SimBody`
pub struct HeadlessPhysics;

impl GravityGunBackend for HeadlessPhysics {
    fn cast_ray(
        world: &mut World,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        ignore: &[Entity],
    ) -> Option<ProbeHit> {
        let mut nearest: Option<ProbeHit> = None;

        for (entity, body, transform) in world.query::<(Entity, &SimBody, &Transform)>().iter(world) {
            if !body.is_dynamic() || ignore.contains(&entity) {
                continue;
            }

            let Some(distance) = body.ray_distance(transform, origin, direction) else {
                continue;
            };
            if distance > max_range {
                continue;
            }

            // При равной дистанции выигрывает меньший Entity (детерминизм)
            let closer = nearest.is_none_or(|hit| {
                distance < hit.distance || (distance == hit.distance && entity < hit.body)
            });
            if closer {
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
        world.get::<SimBody>(body)?;
        world.get::<Transform>(body).copied()
    }

    fn body_bounds(world: &World, body: Entity) -> Option<BodyBounds> {
        let sim = world.get::<SimBody>(body)?;
        let transform = world.get::<Transform>(body)?;
        Some(sim.bounds(transform))
    }

    fn distance_to_surface(world: &World, body: Entity, point: Vec3) -> Option<f32> {
        let sim = world.get::<SimBody>(body)?;
        let transform = world.get::<Transform>(body)?;
        Some(sim.distance_to_surface(transform, point))
    }

    fn velocity(world: &World, body: Entity) -> Option<BodyVelocity> {
        let sim = world.get::<SimBody>(body)?;
        Some(BodyVelocity {
            linear: sim.linear_velocity,
            angular: sim.angular_velocity,
        })
    }

    fn set_velocity(world: &mut World, body: Entity, velocity: BodyVelocity) {
        if let Some(mut sim) = world.get_mut::<SimBody>(body) {
            sim.linear_velocity = velocity.linear;
            sim.angular_velocity = velocity.angular;
        }
    }

    fn apply_impulse_at_point(world: &mut World, body: Entity, impulse: Vec3, point: Vec3) {
        let Some(center) = world.get::<Transform>(body).map(|t| t.translation) else {
            return;
        };
        let Some(mut sim) = world.get_mut::<SimBody>(body) else {
            return;
        };
        if !sim.is_dynamic() {
            return;
        }

        sim.pending_impulse += impulse;
        sim.pending_torque_impulse += (point - center).cross(impulse);
    }

    fn is_overlapping(world: &World, a: Entity, b: Entity) -> bool {
        let (Some(bounds_a), Some(bounds_b)) = (Self::body_bounds(world, a), Self::body_bounds(world, b)) else {
            return false;
        };
        bounds_a.overlaps(&bounds_b, CONTACT_SKIN)
    }
}

/// System: интеграция dynamic тел (explicit Euler)
pub fn integrate_sim_bodies(
    mut bodies: Query<(&mut SimBody, &mut Transform)>,
    settings: Res<HeadlessPhysicsSettings>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (mut body, mut transform) in bodies.iter_mut() {
        if !body.is_dynamic() {
            continue;
        }

        let rotation = transform.rotation;
        body.apply_pending_impulses(rotation);

        body.linear_velocity += settings.gravity * dt;
        if body.linear_damping > 0.0 {
            let linear_damping = body.linear_damping;
            body.linear_velocity *= 1.0 / (1.0 + dt * linear_damping);
        }

        transform.translation += body.linear_velocity * dt;
        transform.rotation =
            (Quat::from_scaled_axis(body.angular_velocity * dt) * transform.rotation).normalize();
    }
}

/// Plugin headless физики (ставит интеграцию после gun систем)
pub struct HeadlessPhysicsPlugin;

impl Plugin for HeadlessPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessPhysicsSettings>()
            .register_type::<SimBody>()
            .add_systems(FixedUpdate, integrate_sim_bodies.after(GravityGunSystems));
    }
}
