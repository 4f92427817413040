//! ObjectLauncher — cooldown + импульс вдоль взгляда

use bevy::prelude::*;

use super::events::{LaunchFailed, LaunchSucceeded};
use crate::error::LaunchRejection;
use crate::logger::log;
use crate::physics::{BodyVelocity, GravityGunBackend};
use crate::probe::probe_from_viewpoint;
use crate::scheduling::{schedule_next_step, NextStepTask};
use crate::settings::LauncherSettings;
use crate::shared::{sample_viewpoint, simulation_time};

/// Launch state gun'а
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ObjectLauncher {
    settings: LauncherSettings,

    /// Время последнего броска (секунды fixed clock)
    last_launch_time: f32,
}

impl Default for ObjectLauncher {
    fn default() -> Self {
        Self::new(LauncherSettings::default())
    }
}

impl ObjectLauncher {
    pub fn new(settings: LauncherSettings) -> Self {
        Self {
            settings,
            last_launch_time: 0.0,
        }
    }

    pub fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    pub fn last_launch_time(&self) -> f32 {
        self.last_launch_time
    }

    /// Cooldown прошёл (строго больше — бросок ровно на границе ещё рано)
    pub fn can_launch(&self, now: f32) -> bool {
        now > self.last_launch_time + self.settings.launch_cooldown
    }

    pub fn cooldown_remaining(&self, now: f32) -> f32 {
        (self.last_launch_time + self.settings.launch_cooldown - now).max(0.0)
    }
}

/// Отложенная нормализация скорости после броска
///
/// Держит только `Entity` — если тело despawned до следующего шага, ничего не делаем.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchVelocityAdjustment {
    pub target: Entity,
    pub direction: Vec3,
    pub minimum_speed: f32,
    pub maximum_speed: f32,
}

impl LaunchVelocityAdjustment {
    /// Скорость вдоль `direction` с модулем `clamp(speed, min, max)`
    ///
    /// Угловая скорость не трогается.
    pub fn adjusted(&self, velocity: BodyVelocity) -> BodyVelocity {
        let speed = velocity
            .linear
            .length()
            .max(self.minimum_speed)
            .min(self.maximum_speed);

        BodyVelocity {
            linear: self.direction.normalize_or_zero() * speed,
            angular: velocity.angular,
        }
    }

    pub fn apply<B: GravityGunBackend>(self, world: &mut World) {
        let Some(velocity) = B::velocity(world, self.target) else {
            return;
        };
        B::set_velocity(world, self.target, self.adjusted(velocity));
    }
}

/// Бросить конкретное тело из позиции взгляда
pub fn launch_from_viewport<B: GravityGunBackend>(
    world: &mut World,
    gun: Entity,
    target: Entity,
) -> Result<Entity, LaunchRejection> {
    check_cooldown(world, gun)?;
    let view = sample_viewpoint(world, gun).ok_or(LaunchRejection::MissingViewpoint)?;

    apply_launch_impulse::<B>(world, gun, target, view.position)
}

/// Найти тело лучом на `hit_range` и бросить (импульс в точке попадания)
///
/// Промах → `LaunchFailed`.
pub fn launch_by_probe<B: GravityGunBackend>(
    world: &mut World,
    gun: Entity,
) -> Result<Entity, LaunchRejection> {
    let settings = check_cooldown(world, gun)?;
    let view = sample_viewpoint(world, gun).ok_or(LaunchRejection::MissingViewpoint)?;

    let Some(hit) = probe_from_viewpoint::<B>(world, gun, &view, settings.hit_range) else {
        log(&format!("💨 Launch probe missed (gun {:?})", gun));
        world.trigger(LaunchFailed { gun });
        return Err(LaunchRejection::NothingInRange);
    };

    apply_launch_impulse::<B>(world, gun, hit.body, hit.point)
}

/// Импульс `forward * linear_launch_force` в точке `origin`
///
/// Cooldown проверяется ещё раз: функция публичная и может вызываться в обход
/// `launch_*`.
pub fn apply_launch_impulse<B: GravityGunBackend>(
    world: &mut World,
    gun: Entity,
    target: Entity,
    origin: Vec3,
) -> Result<Entity, LaunchRejection> {
    let settings = check_cooldown(world, gun)?;
    let view = sample_viewpoint(world, gun).ok_or(LaunchRejection::MissingViewpoint)?;

    if B::body_pose(world, target).is_none() {
        return Err(LaunchRejection::TargetLost(target));
    }

    let direction = view.forward();
    B::apply_impulse_at_point(world, target, direction * settings.linear_launch_force, origin);

    if settings.clamp_launch_speed {
        schedule_next_step(
            world,
            NextStepTask::AdjustLaunchVelocity(LaunchVelocityAdjustment {
                target,
                direction,
                minimum_speed: settings.minimum_launch_speed,
                maximum_speed: settings.maximum_launch_speed,
            }),
        );
    }

    let now = simulation_time(world);
    if let Some(mut launcher) = world.get_mut::<ObjectLauncher>(gun) {
        launcher.last_launch_time = now;
    }

    log(&format!("🚀 Launched {:?} (gun {:?}, t={:.3})", target, gun, now));
    world.trigger(LaunchSucceeded { gun, object: target });

    Ok(target)
}

fn check_cooldown(world: &World, gun: Entity) -> Result<LauncherSettings, LaunchRejection> {
    let launcher = world
        .get::<ObjectLauncher>(gun)
        .ok_or(LaunchRejection::MissingLauncher)?;
    let now = simulation_time(world);

    if !launcher.can_launch(now) {
        return Err(LaunchRejection::Cooldown {
            remaining: launcher.cooldown_remaining(now),
        });
    }
    Ok(launcher.settings)
}
