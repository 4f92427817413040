//! Ошибки gravity gun
//!
//! Rejection-типы — это ожидаемые исходы (cooldown, промах, overlap),
//! facade их только логирует. `SettingsError` — настоящая ошибка загрузки.

use bevy::prelude::Entity;

/// Почему grab не состоялся
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GrabRejection {
    #[error("grab cooldown: {remaining:.3}s remaining")]
    Cooldown { remaining: f32 },
    #[error("already holding {0:?}")]
    AlreadyHolding(Entity),
    #[error("gun has no grabber/handle")]
    MissingGrabber,
    #[error("no viewpoint available")]
    MissingViewpoint,
    #[error("nothing grabbable in range")]
    NothingInRange,
    #[error("carrier is overlapping {0:?}")]
    SelfOverlap(Entity),
    #[error("target {0:?} no longer exists")]
    TargetLost(Entity),
}

/// Почему launch не состоялся
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LaunchRejection {
    #[error("launch cooldown: {remaining:.3}s remaining")]
    Cooldown { remaining: f32 },
    #[error("gun has no launcher")]
    MissingLauncher,
    #[error("no viewpoint available")]
    MissingViewpoint,
    #[error("nothing launchable in range")]
    NothingInRange,
    #[error("target {0:?} no longer exists")]
    TargetLost(Entity),
}

/// Ошибки загрузки/валидации settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
