//! Gravity Gun Simulation Core
//!
//! ECS-симуляция gravity gun на Bevy 0.16: захват объекта лучом, удержание
//! перед камерой через physics handle, бросок импульсом.
//!
//! Слои:
//! - gun логика (grab / launch / weapon) — не знает, какой физический движок снизу
//! - `GravityGunBackend` — seam к физике (`HeadlessPhysics` для тестов, `RapierBackend`)
//!
//! Всё работает в FixedUpdate (64Hz) exclusive системами, порядок внутри шага:
//! next-step tasks → gun inputs → grabber ticks → handle drive → physics step.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::marker::PhantomData;
use std::time::Duration;

// Публичные модули
pub mod error;
pub mod grab;
pub mod launch;
pub mod logger;
pub mod physics;
pub mod probe;
pub mod scheduling;
pub mod settings;
pub mod shared;
pub mod weapon;

// Re-export основных типов
pub use error::{GrabRejection, LaunchRejection, SettingsError};
pub use grab::{
    attempt_grab, held_object, release_held, toggle_grab, CanGrabChanged, GrabToggle, ObjectGrabbed,
    ObjectGrabber, ObjectReleased, ReleaseReason,
};
pub use launch::{launch_by_probe, launch_from_viewport, LaunchFailed, LaunchSucceeded, ObjectLauncher};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{
    GravityGunBackend, HeadlessPhysics, HeadlessPhysicsPlugin, HeadlessPhysicsSettings, PhysicsHandle,
    RapierBackend, RapierGravityGunPlugin, SimBody, SimBodyKind, SimShape,
};
pub use settings::{GrabberSettings, GravityGunSettings, LauncherSettings};
pub use shared::{Viewpoint, ViewpointSource};
pub use weapon::{spawn_gravity_gun, try_grab, try_launch, GravityGun, GunCommand, GunInput};

/// Частота fixed step (Hz)
pub const FIXED_HZ: f64 = 64.0;

/// Все gun системы (для ordering относительно физики)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GravityGunSystems;

/// Gravity gun plugin поверх конкретного physics backend
///
/// Сам физику не добавляет: для headless — `HeadlessPhysicsPlugin`,
/// для rapier — `RapierGravityGunPlugin` (оборачивает этот plugin).
pub struct GravityGunPlugin<B: GravityGunBackend>(PhantomData<fn() -> B>);

impl<B: GravityGunBackend> Default for GravityGunPlugin<B> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<B: GravityGunBackend> Plugin for GravityGunPlugin<B> {
    fn build(&self, app: &mut App) {
        app.init_resource::<scheduling::NextStepTasks>()
            .add_event::<GunInput>()
            .register_type::<GravityGun>()
            .register_type::<ObjectGrabber>()
            .register_type::<ObjectLauncher>()
            .register_type::<PhysicsHandle>()
            .register_type::<Viewpoint>()
            .register_type::<ViewpointSource>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: отложенное с прошлого шага (нормализация скорости броска)
                scheduling::run_next_step_tasks::<B>,
                // Фаза 2: команды игрока
                weapon::execute_gun_inputs::<B>,
                // Фаза 3: aim / hold / forced release
                grab::tick_grabbers::<B>,
                // Фаза 4: handle тянет объект к target pose
                physics::drive_physics_handles::<B>,
            )
                .chain()
                .in_set(GravityGunSystems),
        );
    }
}

/// Seeded RNG для расстановки сцен (props, скрипты)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается ровно на один fixed step за `app.update()`
/// (первый update — нулевой delta, fixed step не выполняется).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / FIXED_HZ,
        )));

    app
}

/// Байтовый snapshot всех `T` (Entity index + Debug), упорядочен по Entity
///
/// Годится только для сравнения прогонов между собой.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut rows: Vec<(u32, String)> = query
        .iter(world)
        .map(|(entity, component)| (entity.index(), format!("{:?}", component)))
        .collect();
    rows.sort_by_key(|(index, _)| *index);

    rows.into_iter()
        .flat_map(|(index, debug)| index.to_le_bytes().into_iter().chain(debug.into_bytes()))
        .collect()
}
