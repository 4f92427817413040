//! Viewpoint — откуда и куда смотрит игрок
//!
//! Camera/input слой (движок, клиент, тестовый скрипт) пишет `Viewpoint`
//! на controlling agent каждый кадр. Gun читает его заново на каждом тике,
//! между тиками ничего не кэширует.

use bevy::prelude::*;

/// Позиция и ориентация камеры controlling agent'а
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct Viewpoint {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Viewpoint {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Viewpoint в `position`, смотрящий на `target`
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let transform = Transform::from_translation(position).looking_at(target, Vec3::Y);
        Self {
            position,
            rotation: transform.rotation,
        }
    }

    /// Направление взгляда (Bevy convention: forward = -Z)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Точка на луче взгляда
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.position + self.forward() * distance
    }
}

/// Чей `Viewpoint` использует gun
///
/// Default = `Entity::PLACEHOLDER` → viewpoint не найден → операции gun
/// тихо прерываются, пока source не назначен.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ViewpointSource(pub Entity);

impl Default for ViewpointSource {
    fn default() -> Self {
        Self(Entity::PLACEHOLDER)
    }
}

/// Свежий viewpoint для gun (None = source не задан / despawned / без Viewpoint)
pub fn sample_viewpoint(world: &World, gun: Entity) -> Option<Viewpoint> {
    let source = world.get::<ViewpointSource>(gun)?;
    world.get::<Viewpoint>(source.0).copied()
}

/// Носитель gun (attach-parent). None = gun не экипирован.
pub fn attach_parent(world: &World, gun: Entity) -> Option<Entity> {
    world.get::<ChildOf>(gun).map(|child_of| child_of.0)
}
