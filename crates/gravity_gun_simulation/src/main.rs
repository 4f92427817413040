//! Headless демо gravity gun
//!
//! Игрок в origin, перед ним разбросаны ящики (seeded RNG). Скрипт:
//! схватить → повести камерой → бросить → бросок по лучу без захвата.
//!
//! Использование: `gravity_gun_simulation [settings.json]`

use bevy::prelude::*;
use rand::Rng;

use gravity_gun_simulation::{
    create_headless_app, held_object, log_error, log_info, spawn_gravity_gun, CanGrabChanged, DeterministicRng,
    GravityGunPlugin, GravityGunSettings, GunInput, HeadlessPhysics, HeadlessPhysicsPlugin,
    HeadlessPhysicsSettings, LaunchFailed, LaunchSucceeded, ObjectGrabbed, ObjectReleased, SimBody,
    SimShape, SettingsError, Viewpoint, FIXED_HZ,
};

const SEED: u64 = 42;
const PROP_COUNT: usize = 8;
const TICK_COUNT: usize = 300;

/// Минимальный прогрев перед первым grab
const WARM_UP_TICKS: usize = 30;

fn main() {
    if let Err(error) = run() {
        log_error(&format!("Simulation aborted: {}", error));
        std::process::exit(1);
    }
}

fn run() -> Result<(), SettingsError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => GravityGunSettings::load(&path)?,
        None => GravityGunSettings::default(),
    };

    log_info(&format!("Starting gravity gun headless simulation (seed: {})", SEED));
    let mut demo = Demo::new(settings);
    let last_tick = demo.script.grab_tick + TICK_COUNT;

    for tick in 0..last_tick {
        demo.step(tick);

        if tick % 100 == 0 {
            let entity_count = demo.app.world().entities().len();
            log_info(&format!("Tick {}: {} entities", tick, entity_count));
        }
    }

    log_info("Simulation complete!");
    Ok(())
}

struct Demo {
    app: App,
    player: Entity,
    gun: Entity,
    script: DemoScript,
}

impl Demo {
    fn new(settings: GravityGunSettings) -> Self {
        let mut app = create_headless_app(SEED);
        app.add_plugins((HeadlessPhysicsPlugin, GravityGunPlugin::<HeadlessPhysics>::default()))
            .insert_resource(HeadlessPhysicsSettings::zero_gravity())
            .add_observer(|trigger: Trigger<ObjectGrabbed>| {
                log_info(&format!("🧲 grabbed {:?}", trigger.event().object));
            })
            .add_observer(|trigger: Trigger<ObjectReleased>| {
                let event = trigger.event();
                log_info(&format!("🫳 released {:?} ({:?})", event.object, event.reason));
            })
            .add_observer(|trigger: Trigger<CanGrabChanged>| {
                log_info(&format!("🎯 can grab: {}", trigger.event().can_grab));
            })
            .add_observer(|trigger: Trigger<LaunchSucceeded>| {
                log_info(&format!("🚀 launched {:?}", trigger.event().object));
            })
            .add_observer(|_trigger: Trigger<LaunchFailed>| {
                log_info("💨 launch missed");
            });

        let script = DemoScript::new(&settings);
        let world = app.world_mut();
        let player = world
            .spawn(Viewpoint::new(Vec3::new(0.0, 170.0, 0.0), Quat::IDENTITY))
            .id();
        let gun = spawn_gravity_gun(world, player, settings);
        scatter_props(world);

        Self { app, player, gun, script }
    }

    /// Ввод скрипта на этот тик + один `app.update()`
    fn step(&mut self, tick: usize) {
        self.script.apply(self.app.world_mut(), self.player, self.gun, tick);
        self.app.update();
    }
}

/// Тайминги скрипта, отсчёт от первого grab
struct DemoScript {
    grab_tick: usize,
}

impl DemoScript {
    /// Grab только после стартовых cooldown'ов (они идут от t=0)
    fn new(settings: &GravityGunSettings) -> Self {
        let cooldown = settings.grabber.grab_cooldown.max(settings.launcher.launch_cooldown);
        let cooldown_ticks = (f64::from(cooldown) * FIXED_HZ).ceil() as usize + 2;
        Self {
            grab_tick: cooldown_ticks.max(WARM_UP_TICKS),
        }
    }

    fn apply(&self, world: &mut World, player: Entity, gun: Entity, tick: usize) {
        let Some(offset) = tick.checked_sub(self.grab_tick) else {
            return;
        };

        match offset {
            0 => {
                world.send_event(GunInput::grab(gun));
            }
            // Ведём камерой вправо, объект следует
            10..=70 => {
                if let Some(mut view) = world.get_mut::<Viewpoint>(player) {
                    view.rotation = Quat::from_rotation_y(-0.01) * view.rotation;
                }
            }
            110 => {
                world.send_event(GunInput::launch(gun));
            }
            // Поворот обратно и бросок по лучу
            190 => {
                if let Some(mut view) = world.get_mut::<Viewpoint>(player) {
                    view.rotation = Quat::IDENTITY;
                }
            }
            250 => {
                world.send_event(GunInput::launch(gun));
            }
            _ => {}
        }
    }
}

/// Ящики перед игроком: первый точно по центру прицела, остальные случайно
fn scatter_props(world: &mut World) {
    let mut positions = vec![Vec3::new(0.0, 170.0, -400.0)];
    {
        let mut rng = world.resource_mut::<DeterministicRng>();
        for _ in 1..PROP_COUNT {
            positions.push(Vec3::new(
                rng.rng.gen_range(-600.0..600.0),
                170.0,
                rng.rng.gen_range(-900.0..-200.0),
            ));
        }
    }

    for position in positions {
        world.spawn((
            SimBody::dynamic(SimShape::Cuboid { half_extents: Vec3::splat(25.0) }, 15.0),
            Transform::from_translation(position),
        ));
    }
}
