//! Physics handle — тянет схваченное тело к target pose
//!
//! Handle не телепортирует тело: каждый fixed step он выставляет скорости,
//! пропорциональные ошибке позы, а physics step сам разруливает коллизии.
//! Grab pivot хранится в local space тела, поэтому тело с pivot в центре
//! bounds висит предсказуемо даже при кривом origin меша.
//!
//! Владелец handle — только `ObjectGrabber` того же gun entity.

use bevy::prelude::*;

use super::{BodyVelocity, GravityGunBackend};

/// Grab attachment gun'а
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicsHandle {
    grabbed: Option<Entity>,

    /// Pivot в local space тела
    local_pivot: Vec3,

    /// inverse(pivot rotation) * body rotation на момент захвата
    rotation_offset: Quat,

    target_position: Vec3,
    target_rotation: Quat,

    /// Скорость схождения позиции (1/сек)
    pub linear_stiffness: f32,

    /// Скорость схождения ориентации (1/сек)
    pub angular_stiffness: f32,
}

impl Default for PhysicsHandle {
    fn default() -> Self {
        Self {
            grabbed: None,
            local_pivot: Vec3::ZERO,
            rotation_offset: Quat::IDENTITY,
            target_position: Vec3::ZERO,
            target_rotation: Quat::IDENTITY,
            linear_stiffness: 20.0,
            angular_stiffness: 20.0,
        }
    }
}

impl PhysicsHandle {
    pub fn grabbed(&self) -> Option<Entity> {
        self.grabbed
    }

    pub fn is_holding(&self) -> bool {
        self.grabbed.is_some()
    }

    /// Прикрепить тело: pivot (world) + ориентация pivot'а.
    /// Target pose сразу равен текущей позе pivot'а (без рывка).
    pub fn grab(&mut self, body: Entity, body_pose: &Transform, pivot: Vec3, pivot_rotation: Quat) {
        self.grabbed = Some(body);
        self.local_pivot = body_pose.rotation.inverse() * (pivot - body_pose.translation);
        self.rotation_offset = pivot_rotation.inverse() * body_pose.rotation;
        self.target_position = pivot;
        self.target_rotation = pivot_rotation;
    }

    /// Отцепить тело, вернуть его (None если ничего не держали)
    pub fn release(&mut self) -> Option<Entity> {
        self.grabbed.take()
    }

    pub fn set_target(&mut self, position: Vec3, rotation: Quat) {
        self.target_position = position;
        self.target_rotation = rotation;
    }

    pub fn target(&self) -> (Vec3, Quat) {
        (self.target_position, self.target_rotation)
    }

    /// Поза тела, при которой pivot стоит в target с target ориентацией
    pub fn desired_body_pose(&self) -> Transform {
        let rotation = (self.target_rotation * self.rotation_offset).normalize();
        let translation = self.target_position - rotation * self.local_pivot;
        Transform::from_translation(translation).with_rotation(rotation)
    }

    /// Скорости, которые сводят `current` к desired pose (не быстрее чем за один step)
    pub fn drive_velocity(&self, current: &Transform, dt: f32) -> BodyVelocity {
        let desired = self.desired_body_pose();
        let max_rate = if dt > 0.0 { 1.0 / dt } else { 0.0 };

        let linear = (desired.translation - current.translation)
            * self.linear_stiffness.min(max_rate);

        let mut delta = desired.rotation * current.rotation.inverse();
        // Кратчайший путь (q и -q — одна ориентация)
        if delta.w < 0.0 {
            delta = -delta;
        }
        let angular = delta.to_scaled_axis() * self.angular_stiffness.min(max_rate);

        BodyVelocity { linear, angular }
    }
}

/// System: handle drive для всех gun'ов, которые что-то держат
///
/// Despawned тело пропускаем — grabber заметит это на своём тике и отпустит.
pub fn drive_physics_handles<B: GravityGunBackend>(world: &mut World) {
    let dt = world.resource::<Time<Fixed>>().delta_secs();

    let handles: Vec<PhysicsHandle> = world
        .query::<&PhysicsHandle>()
        .iter(world)
        .filter(|handle| handle.is_holding())
        .copied()
        .collect();

    for handle in handles {
        let Some(body) = handle.grabbed() else {
            continue;
        };
        let Some(pose) = B::body_pose(world, body) else {
            continue;
        };

        let velocity = handle.drive_velocity(&pose, dt);
        B::set_velocity(world, body, velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_keeps_body_in_place() {
        let body_pose = Transform::from_xyz(10.0, 0.0, 0.0)
            .with_rotation(Quat::from_rotation_y(0.7));
        let pivot = Vec3::new(10.0, 1.0, 0.0);

        let mut handle = PhysicsHandle::default();
        handle.grab(Entity::from_raw(3), &body_pose, pivot, body_pose.rotation);

        let desired = handle.desired_body_pose();
        assert!((desired.translation - body_pose.translation).length() < 1e-4);
        assert!(desired.rotation.angle_between(body_pose.rotation) < 1e-4);

        let velocity = handle.drive_velocity(&body_pose, 1.0 / 64.0);
        assert!(velocity.linear.length() < 1e-2);
        assert!(velocity.angular.length() < 1e-2);
    }

    #[test]
    fn test_pivot_offset_follows_target() {
        let body_pose = Transform::IDENTITY;
        let mut handle = PhysicsHandle::default();
        // Pivot на 1 выше origin тела
        handle.grab(Entity::from_raw(3), &body_pose, Vec3::Y, Quat::IDENTITY);
        handle.set_target(Vec3::new(5.0, 1.0, 0.0), Quat::IDENTITY);

        let desired = handle.desired_body_pose();
        assert!((desired.translation - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_drive_never_overshoots_one_step() {
        let mut handle = PhysicsHandle {
            linear_stiffness: 1000.0,
            ..default()
        };
        handle.grab(Entity::from_raw(3), &Transform::IDENTITY, Vec3::ZERO, Quat::IDENTITY);
        handle.set_target(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);

        let dt = 0.25;
        let velocity = handle.drive_velocity(&Transform::IDENTITY, dt);
        // stiffness ограничен 1/dt → ровно одна дистанция за шаг
        assert!((velocity.linear * dt - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_release_returns_body_once() {
        let mut handle = PhysicsHandle::default();
        let body = Entity::from_raw(9);
        handle.grab(body, &Transform::IDENTITY, Vec3::ZERO, Quat::IDENTITY);

        assert_eq!(handle.release(), Some(body));
        assert_eq!(handle.release(), None);
        assert!(!handle.is_holding());
    }
}
