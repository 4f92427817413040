//! ObjectGrabber — state захвата на gun entity
//!
//! Компонент хранит только "память" захвата (дистанция, ориентация, cooldown,
//! что под прицелом). Какое тело держим — знает `PhysicsHandle` того же entity.

use bevy::prelude::*;

use crate::physics::BodyVelocity;
use crate::settings::GrabberSettings;

/// Grab state gun'а
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ObjectGrabber {
    /// Settings с уже применённой коррекцией force-release
    settings: GrabberSettings,

    /// Что было под прицелом на последнем Idle тике (во время удержания не обновляется)
    aimed: Option<Entity>,

    /// Дистанция view → объект на момент захвата (≤ maximum_hover_distance)
    initial_grab_distance: f32,

    /// inverse(view rotation) * object rotation на момент захвата
    initial_relative_rotation: Quat,

    last_release_time: f32,

    /// Начальный CanGrabChanged(false) уже отправлен
    announced: bool,
}

impl Default for ObjectGrabber {
    fn default() -> Self {
        Self::new(GrabberSettings::default())
    }
}

impl ObjectGrabber {
    pub fn new(settings: GrabberSettings) -> Self {
        Self {
            settings: settings.effective(),
            aimed: None,
            initial_grab_distance: 0.0,
            initial_relative_rotation: Quat::IDENTITY,
            last_release_time: 0.0,
            announced: false,
        }
    }

    pub fn settings(&self) -> &GrabberSettings {
        &self.settings
    }

    pub fn aimed(&self) -> Option<Entity> {
        self.aimed
    }

    pub fn initial_grab_distance(&self) -> f32 {
        self.initial_grab_distance
    }

    pub fn initial_relative_rotation(&self) -> Quat {
        self.initial_relative_rotation
    }

    pub fn last_release_time(&self) -> f32 {
        self.last_release_time
    }

    /// Cooldown после последнего release прошёл
    pub fn has_reloaded(&self, now: f32) -> bool {
        now > self.last_release_time + self.settings.grab_cooldown
    }

    pub fn cooldown_remaining(&self, now: f32) -> f32 {
        (self.last_release_time + self.settings.grab_cooldown - now).max(0.0)
    }

    /// Прицел не сбрасывается: после release переход считается от него
    pub(crate) fn begin_hold(&mut self, relative_rotation: Quat, grab_distance: f32) {
        self.initial_relative_rotation = relative_rotation;
        self.initial_grab_distance = grab_distance;
    }

    pub(crate) fn record_release(&mut self, now: f32) {
        self.last_release_time = now;
    }

    /// true только при первом вызове
    pub(crate) fn take_announcement(&mut self) -> bool {
        !std::mem::replace(&mut self.announced, true)
    }

    /// Обновить прицел. Some(can_grab) — только если "есть цель / нет цели" переключилось.
    ///
    /// Смена одной цели на другую — не переход.
    pub(crate) fn update_aim(&mut self, hit: Option<Entity>) -> Option<bool> {
        let changed = self.aimed.is_some() != hit.is_some();
        self.aimed = hit;
        changed.then_some(hit.is_some())
    }
}

/// Дистанция удержания вдоль взгляда
///
/// Смещение центра относительно ближайшей точки сохраняется, поэтому крупный
/// объект висит дальше мелкого при той же дистанции захвата.
pub fn hover_distance(distance_to_center: f32, distance_to_closest: f32, initial_grab_distance: f32) -> f32 {
    (distance_to_center - distance_to_closest) + initial_grab_distance
}

/// Скорость тела при release, срезанная до `max_speed`
///
/// None — скорость в пределах, трогать не надо. Угловая масштабируется тем же
/// коэффициентом, что и линейная.
pub fn clamp_release_velocity(velocity: BodyVelocity, max_speed: f32) -> Option<BodyVelocity> {
    let speed = velocity.linear.length();
    if speed <= max_speed {
        return None;
    }

    Some(BodyVelocity {
        linear: velocity.linear / speed * max_speed,
        angular: velocity.angular / speed * max_speed,
    })
}
