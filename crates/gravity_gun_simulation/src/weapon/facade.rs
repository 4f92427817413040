//! GravityGun — маршрутизация команд игрока

use bevy::prelude::*;

use crate::error::{GrabRejection, LaunchRejection};
use crate::grab::{release_held, toggle_grab, GrabToggle, ObjectGrabber, ReleaseReason};
use crate::launch::{launch_by_probe, launch_from_viewport, ObjectLauncher};
use crate::logger::log;
use crate::physics::{GravityGunBackend, PhysicsHandle};
use crate::settings::GravityGunSettings;
use crate::shared::ViewpointSource;

/// Marker gravity gun (Required: grabber + launcher + handle)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(ObjectGrabber, ObjectLauncher, PhysicsHandle, ViewpointSource)]
pub struct GravityGun;

/// Команда игрока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum GunCommand {
    /// Схватить / отпустить
    Grab,
    /// Бросить (удерживаемый или тот, что под прицелом)
    Launch,
}

/// Event: ввод игрока для конкретного gun
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GunInput {
    pub gun: Entity,
    pub command: GunCommand,
}

impl GunInput {
    pub fn grab(gun: Entity) -> Self {
        Self { gun, command: GunCommand::Grab }
    }

    pub fn launch(gun: Entity) -> Self {
        Self { gun, command: GunCommand::Launch }
    }
}

/// Spawn gun в руках `carrier` (viewpoint берётся с него же)
pub fn spawn_gravity_gun(world: &mut World, carrier: Entity, settings: GravityGunSettings) -> Entity {
    world
        .spawn((
            GravityGun,
            ObjectGrabber::new(settings.grabber),
            ObjectLauncher::new(settings.launcher),
            ViewpointSource(carrier),
            ChildOf(carrier),
        ))
        .id()
}

/// Grab input → toggle
pub fn try_grab<B: GravityGunBackend>(world: &mut World, gun: Entity) -> Result<GrabToggle, GrabRejection> {
    toggle_grab::<B>(world, gun)
}

/// Launch input
///
/// Держим объект → отпускаем (`Launched`) и бросаем его же из позиции взгляда.
/// Ничего не держим → бросок по лучу.
pub fn try_launch<B: GravityGunBackend>(world: &mut World, gun: Entity) -> Result<Entity, LaunchRejection> {
    if let Some(object) = release_held::<B>(world, gun, ReleaseReason::Launched) {
        return launch_from_viewport::<B>(world, gun, object);
    }

    launch_by_probe::<B>(world, gun)
}

/// System: исполнить накопленные `GunInput` (в порядке прихода)
///
/// Отказы (cooldown, промах, overlap) — нормальный исход, только логируем.
pub fn execute_gun_inputs<B: GravityGunBackend>(world: &mut World) {
    let Some(mut events) = world.get_resource_mut::<Events<GunInput>>() else {
        return;
    };
    let inputs: Vec<GunInput> = events.drain().collect();

    for input in inputs {
        match input.command {
            GunCommand::Grab => {
                if let Err(rejection) = try_grab::<B>(world, input.gun) {
                    log(&format!("Grab rejected (gun {:?}): {}", input.gun, rejection));
                }
            }
            GunCommand::Launch => {
                if let Err(rejection) = try_launch::<B>(world, input.gun) {
                    log(&format!("Launch rejected (gun {:?}): {}", input.gun, rejection));
                }
            }
        }
    }
}
