//! Tunables gravity gun (grabber + launcher)
//!
//! Значения по умолчанию — в мировых единицах оригинальной игры (сантиметры).
//! Settings иммутабельны после создания контроллера: `ObjectGrabber::new`
//! применяет коррекцию force-release дистанции один раз.
//!
//! Формат файла (все поля опциональны, отсутствующие = default):
//! ```json
//! { "grabber": { "grab_range": 950.0 }, "launcher": { "hit_range": 650.0 } }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SettingsError;

/// Запас сверх grab range, до которого поднимается force-release дистанция
pub const FORCE_RELEASE_MARGIN: f32 = 5.0;

/// Настройки захвата
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct GrabberSettings {
    /// Максимальная дистанция, с которой можно схватить объект
    pub grab_range: f32,

    /// Дистанция от игрока до ближайшей точки объекта при удержании (верхняя граница)
    pub maximum_hover_distance: f32,

    /// Максимальная линейная скорость объекта при отпускании
    pub max_release_velocity: f32,

    /// Cooldown между захватами (секунды)
    pub grab_cooldown: f32,

    /// Дальше этой дистанции объект отпускается принудительно.
    /// Если меньше grab range — поднимается до grab range + FORCE_RELEASE_MARGIN.
    pub force_release_distance: f32,
}

impl Default for GrabberSettings {
    fn default() -> Self {
        Self {
            grab_range: 950.0,
            maximum_hover_distance: 300.0,
            max_release_velocity: 900.0,
            grab_cooldown: 0.25,
            force_release_distance: 800.0,
        }
    }
}

impl GrabberSettings {
    /// Settings с применённой коррекцией force-release дистанции
    pub fn effective(self) -> Self {
        let mut settings = self;
        if settings.force_release_distance < settings.grab_range {
            settings.force_release_distance = settings.grab_range + FORCE_RELEASE_MARGIN;
        }
        settings
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        non_negative("grabber.grab_range", self.grab_range)?;
        non_negative("grabber.maximum_hover_distance", self.maximum_hover_distance)?;
        non_negative("grabber.max_release_velocity", self.max_release_velocity)?;
        non_negative("grabber.grab_cooldown", self.grab_cooldown)?;
        non_negative("grabber.force_release_distance", self.force_release_distance)
    }
}

/// Настройки броска
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct LauncherSettings {
    /// Величина линейного импульса
    pub linear_launch_force: f32,

    /// Нижняя граница скорости после броска (тяжёлые объекты тоже летят).
    /// Работает только при `clamp_launch_speed`.
    pub minimum_launch_speed: f32,

    /// Верхняя граница скорости после броска (лёгкие объекты не улетают в космос).
    /// Работает только при `clamp_launch_speed`.
    pub maximum_launch_speed: f32,

    /// Нормализовать скорость на следующем шаге после импульса
    pub clamp_launch_speed: bool,

    /// Дальность probe для броска без захвата
    pub hit_range: f32,

    /// Cooldown между бросками (секунды)
    pub launch_cooldown: f32,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            linear_launch_force: 750_000.0,
            minimum_launch_speed: 1400.0,
            maximum_launch_speed: 4200.0,
            clamp_launch_speed: true,
            hit_range: 650.0,
            launch_cooldown: 0.3,
        }
    }
}

impl LauncherSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        non_negative("launcher.linear_launch_force", self.linear_launch_force)?;
        non_negative("launcher.minimum_launch_speed", self.minimum_launch_speed)?;
        non_negative("launcher.maximum_launch_speed", self.maximum_launch_speed)?;
        non_negative("launcher.hit_range", self.hit_range)?;
        non_negative("launcher.launch_cooldown", self.launch_cooldown)?;

        if self.minimum_launch_speed > self.maximum_launch_speed {
            return Err(SettingsError::Invalid {
                field: "launcher.minimum_launch_speed",
                reason: "must not exceed maximum_launch_speed",
            });
        }
        Ok(())
    }
}

/// Полный набор tunables одного gravity gun
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct GravityGunSettings {
    pub grabber: GrabberSettings,
    pub launcher: LauncherSettings,
}

impl GravityGunSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.grabber.validate()?;
        self.launcher.validate()
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Invalid {
            field,
            reason: "must be a finite non-negative number",
        })
    }
}
