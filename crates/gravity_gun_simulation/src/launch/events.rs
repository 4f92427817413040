//! Launch notifications (observer events, синхронно через `World::trigger`)

use bevy::prelude::*;

/// Event: импульс приложен
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchSucceeded {
    pub gun: Entity,
    pub object: Entity,
}

/// Event: бросок без захвата никуда не попал
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchFailed {
    pub gun: Entity,
}
