//! Gravity gun integration test
//!
//! Полный headless App (FixedUpdate 64Hz, headless физика, без гравитации):
//! команды идут через `GunInput`, всё остальное делают системы plugin'а.
//!
//! Проверяем:
//! - принудительный release, когда объект уехал дальше force-release дистанции
//! - CanGrabChanged ровно один раз на каждый переход прицела
//! - нормализация скорости броска на следующем шаге

use bevy::prelude::*;
use gravity_gun_simulation::*;

/// Всё, что пришло через observers
#[derive(Resource, Default)]
struct Recorded {
    grabbed: Vec<Entity>,
    released: Vec<ReleaseReason>,
    can_grab: Vec<bool>,
    launched: Vec<Entity>,
}

struct Scene {
    app: App,
    player: Entity,
    gun: Entity,
}

impl Scene {
    /// Игрок в origin смотрит в -Z
    fn new(settings: GravityGunSettings) -> Self {
        let mut app = create_headless_app(42);
        app.add_plugins((HeadlessPhysicsPlugin, GravityGunPlugin::<HeadlessPhysics>::default()))
            .insert_resource(HeadlessPhysicsSettings::zero_gravity())
            .init_resource::<Recorded>()
            .add_observer(|trigger: Trigger<ObjectGrabbed>, mut rec: ResMut<Recorded>| {
                rec.grabbed.push(trigger.event().object);
            })
            .add_observer(|trigger: Trigger<ObjectReleased>, mut rec: ResMut<Recorded>| {
                rec.released.push(trigger.event().reason);
            })
            .add_observer(|trigger: Trigger<CanGrabChanged>, mut rec: ResMut<Recorded>| {
                rec.can_grab.push(trigger.event().can_grab);
            })
            .add_observer(|trigger: Trigger<LaunchSucceeded>, mut rec: ResMut<Recorded>| {
                rec.launched.push(trigger.event().object);
            });

        let world = app.world_mut();
        let player = world.spawn(Viewpoint::new(Vec3::ZERO, Quat::IDENTITY)).id();
        let gun = spawn_gravity_gun(world, player, settings);

        Self { app, player, gun }
    }

    fn spawn_crate(&mut self, position: Vec3, mass: f32) -> Entity {
        self.app
            .world_mut()
            .spawn((
                SimBody::dynamic(SimShape::Cuboid { half_extents: Vec3::splat(25.0) }, mass),
                Transform::from_translation(position),
            ))
            .id()
    }

    /// Каждый update (кроме самого первого) = ровно один fixed step
    fn step(&mut self, updates: usize) {
        for _ in 0..updates {
            self.app.update();
        }
    }

    /// Прогрев: первый update нулевой + cooldown'ы (0.25 / 0.3 сек) истекли
    fn warm_up(&mut self) {
        self.step(30);
    }

    fn input(&mut self, input: GunInput) {
        self.app.world_mut().send_event(input);
        self.step(1);
    }

    fn teleport(&mut self, body: Entity, position: Vec3) {
        if let Some(mut transform) = self.app.world_mut().get_mut::<Transform>(body) {
            transform.translation = position;
        }
        if let Some(mut sim) = self.app.world_mut().get_mut::<SimBody>(body) {
            sim.linear_velocity = Vec3::ZERO;
        }
    }

    fn velocity(&self, body: Entity) -> Vec3 {
        self.app
            .world()
            .get::<SimBody>(body)
            .map(|sim| sim.linear_velocity)
            .unwrap_or_default()
    }

    fn held(&self) -> Option<Entity> {
        held_object(self.app.world(), self.gun)
    }

    fn recorded(&self) -> &Recorded {
        self.app.world().resource::<Recorded>()
    }
}

/// Test: объект уехал дальше force-release (500 поднят до 950 + 5) → release TooFar
#[test]
fn test_forced_release_beyond_corrected_distance() {
    let settings = GravityGunSettings {
        grabber: GrabberSettings {
            grab_range: 950.0,
            force_release_distance: 500.0,
            ..default()
        },
        ..default()
    };
    let mut scene = Scene::new(settings);
    let target = scene.spawn_crate(Vec3::new(0.0, 0.0, -400.0), 10.0);
    scene.warm_up();

    scene.input(GunInput::grab(scene.gun));
    assert_eq!(scene.held(), Some(target));
    assert_eq!(scene.recorded().grabbed, vec![target]);

    // Держим: handle подтягивает объект к hover точке
    scene.step(20);
    assert_eq!(scene.held(), Some(target));
    let z = scene.app.world().get::<Transform>(target).map(|t| t.translation.z);
    assert!(z.is_some_and(|z| (z + 325.0).abs() < 5.0), "hover z = {:?}", z);

    // Ближайшая точка на 950 — в пределах 955
    scene.teleport(target, Vec3::new(0.0, 0.0, -975.0));
    scene.step(1);
    assert_eq!(scene.held(), Some(target));

    // Ближайшая точка на 960 — отпускаем на ближайшем тике
    scene.teleport(target, Vec3::new(0.0, 0.0, -985.0));
    scene.step(1);
    assert_eq!(scene.held(), None);
    assert_eq!(scene.recorded().released, vec![ReleaseReason::TooFar]);

    // Дальше тишина
    scene.step(10);
    assert_eq!(scene.recorded().released.len(), 1);
}

/// Test: CanGrabChanged только на переходах, не каждый тик
#[test]
fn test_can_grab_changes_once_per_transition() {
    let mut scene = Scene::new(GravityGunSettings::default());
    scene.warm_up();
    // Начальное состояние — ничего под прицелом
    assert_eq!(scene.recorded().can_grab, vec![false]);

    let target = scene.spawn_crate(Vec3::new(0.0, 0.0, -500.0), 10.0);
    scene.step(10);
    assert_eq!(scene.recorded().can_grab, vec![false, true]);

    // Отвернулись
    let player = scene.player;
    scene
        .app
        .world_mut()
        .entity_mut(player)
        .insert(Viewpoint::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 500.0)));
    scene.step(10);
    assert_eq!(scene.recorded().can_grab, vec![false, true, false]);

    // Повернулись обратно
    scene
        .app
        .world_mut()
        .entity_mut(player)
        .insert(Viewpoint::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -500.0)));
    scene.step(10);
    assert_eq!(scene.recorded().can_grab, vec![false, true, false, true]);
    assert!(scene.recorded().grabbed.is_empty());
    assert!(scene.app.world().get_entity(target).is_ok());
}

/// Бросок по лучу тела массы `mass`: (скорость сразу после импульса, скорость шагом позже)
fn launch_velocities(mass: f32) -> (Vec3, Vec3) {
    let mut scene = Scene::new(GravityGunSettings::default());
    let target = scene.spawn_crate(Vec3::new(0.0, 0.0, -300.0), mass);
    scene.warm_up();

    scene.input(GunInput::launch(scene.gun));
    assert_eq!(scene.recorded().launched, vec![target]);
    let raw = scene.velocity(target);

    scene.step(1);
    (raw, scene.velocity(target))
}

/// Test: 750000 / 125 = 6000 → срез до 4200 на следующем шаге
#[test]
fn test_launch_speed_capped_next_step() {
    let (raw, adjusted) = launch_velocities(125.0);
    assert!((raw - Vec3::new(0.0, 0.0, -6000.0)).length() < 1e-1, "raw {:?}", raw);
    assert!((adjusted - Vec3::new(0.0, 0.0, -4200.0)).length() < 1e-1, "adjusted {:?}", adjusted);
}

/// Test: 750000 / 1500 = 500 → поднят до 1400
#[test]
fn test_launch_speed_raised_to_minimum() {
    let (_, adjusted) = launch_velocities(1500.0);
    assert!((adjusted - Vec3::new(0.0, 0.0, -1400.0)).length() < 1e-1, "adjusted {:?}", adjusted);
}

/// Test: 750000 / 375 = 2000 → в диапазоне, не меняется
#[test]
fn test_launch_speed_in_range_kept() {
    let (_, adjusted) = launch_velocities(375.0);
    assert!((adjusted - Vec3::new(0.0, 0.0, -2000.0)).length() < 1e-1, "adjusted {:?}", adjusted);
}

/// Test: grab → launch удерживаемого (release с причиной Launched, потом бросок)
#[test]
fn test_launch_held_object() {
    let mut scene = Scene::new(GravityGunSettings::default());
    let target = scene.spawn_crate(Vec3::new(0.0, 0.0, -250.0), 125.0);
    scene.warm_up();

    scene.input(GunInput::grab(scene.gun));
    scene.step(5);
    scene.input(GunInput::launch(scene.gun));
    scene.step(1);

    assert_eq!(scene.held(), None);
    assert_eq!(scene.recorded().released, vec![ReleaseReason::Launched]);
    assert_eq!(scene.recorded().launched, vec![target]);
    assert!(scene.velocity(target).z < -4000.0);
}
