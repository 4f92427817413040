//! Grab notifications (observer events)
//!
//! Стреляются синхронно через `World::trigger` — все observers отработали
//! до возврата из операции gun. UI (crosshair, звук) подписывается через
//! `app.add_observer(...)`.

use bevy::prelude::*;

/// Почему объект отпущен
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ReleaseReason {
    /// Игрок отпустил (toggle)
    Manual,
    /// Отпущен, чтобы сразу бросить
    Launched,
    /// Ближайшая точка объекта дальше force-release дистанции
    TooFar,
    /// Gun больше не на носителе (убран в кобуру)
    Unequipped,
    /// Носитель пересекается с объектом (стоит на нём)
    SelfOverlap,
    /// Объект despawned или потерял collision shape
    TargetLost,
}

/// Event: gun схватил объект
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectGrabbed {
    pub gun: Entity,
    pub object: Entity,
}

/// Event: gun отпустил объект (ровно один раз на каждый захват)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectReleased {
    pub gun: Entity,
    pub object: Entity,
    pub reason: ReleaseReason,
}

/// Event: изменилось "есть ли что схватить под прицелом"
///
/// Стреляет только на переходе, не каждый тик.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanGrabChanged {
    pub gun: Entity,
    pub can_grab: bool,
}
