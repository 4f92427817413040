//! Tests for launch controller.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;

    use crate::error::LaunchRejection;
    use crate::launch::{
        launch_by_probe, launch_from_viewport, LaunchFailed, LaunchSucceeded,
        LaunchVelocityAdjustment, ObjectLauncher,
    };
    use crate::physics::{BodyVelocity, HeadlessPhysics, SimBody, SimShape};
    use crate::scheduling::NextStepTasks;
    use crate::settings::LauncherSettings;
    use crate::shared::{Viewpoint, ViewpointSource};

    #[derive(Resource, Default)]
    struct Seen {
        succeeded: Vec<Entity>,
        failed: usize,
    }

    /// Мир: игрок в origin смотрит в -Z, gun в руке, часы на t=1.0
    fn launch_world(settings: LauncherSettings) -> (World, Entity) {
        let mut world = World::new();
        let mut time = Time::<Fixed>::default();
        time.advance_by(Duration::from_secs(1));
        world.insert_resource(time);
        world.init_resource::<Seen>();

        world.add_observer(|trigger: Trigger<LaunchSucceeded>, mut seen: ResMut<Seen>| {
            seen.succeeded.push(trigger.event().object);
        });
        world.add_observer(|_trigger: Trigger<LaunchFailed>, mut seen: ResMut<Seen>| {
            seen.failed += 1;
        });

        let player = world.spawn(Viewpoint::new(Vec3::ZERO, Quat::IDENTITY)).id();
        let gun = world
            .spawn((ObjectLauncher::new(settings), ViewpointSource(player), ChildOf(player)))
            .id();
        (world, gun)
    }

    fn spawn_crate(world: &mut World, position: Vec3) -> Entity {
        world
            .spawn((
                SimBody::dynamic(SimShape::Cuboid { half_extents: Vec3::splat(25.0) }, 10.0),
                Transform::from_translation(position),
            ))
            .id()
    }

    fn adjustment(minimum_speed: f32, maximum_speed: f32) -> LaunchVelocityAdjustment {
        LaunchVelocityAdjustment {
            target: Entity::PLACEHOLDER,
            direction: Vec3::NEG_Z,
            minimum_speed,
            maximum_speed,
        }
    }

    #[test]
    fn test_launch_cooldown_boundary() {
        let launcher = ObjectLauncher::default();
        // Ровно на границе — ещё рано
        assert!(!launcher.can_launch(0.3));
        assert!(launcher.can_launch(0.31));
        assert!((launcher.cooldown_remaining(0.1) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_normalization_bounds() {
        let clamp = adjustment(1400.0, 4200.0);

        // Медленный → поднят до минимума, направление = направление броска
        let slow = clamp.adjusted(BodyVelocity {
            linear: Vec3::new(300.0, 400.0, 0.0),
            angular: Vec3::Y,
        });
        assert!((slow.linear - Vec3::new(0.0, 0.0, -1400.0)).length() < 1e-2);
        assert_eq!(slow.angular, Vec3::Y);

        // Быстрый → срезан до максимума
        let fast = clamp.adjusted(BodyVelocity {
            linear: Vec3::new(0.0, 0.0, -6000.0),
            angular: Vec3::ZERO,
        });
        assert!((fast.linear.length() - 4200.0).abs() < 1e-2);

        // В диапазоне → модуль сохранён, но направление выправлено
        let mid = clamp.adjusted(BodyVelocity {
            linear: Vec3::new(0.0, 2000.0, 0.0),
            angular: Vec3::ZERO,
        });
        assert!((mid.linear - Vec3::new(0.0, 0.0, -2000.0)).length() < 1e-2);
    }

    #[test]
    fn test_launch_by_probe_hits_body() {
        let (mut world, gun) = launch_world(LauncherSettings::default());
        let target = spawn_crate(&mut world, Vec3::new(0.0, 0.0, -300.0));

        let launched = launch_by_probe::<HeadlessPhysics>(&mut world, gun).expect("crate in range");
        assert_eq!(launched, target);

        let impulse = world.get::<SimBody>(target).map(|b| b.pending_impulse());
        assert_eq!(impulse, Some(Vec3::new(0.0, 0.0, -750_000.0)));
        assert_eq!(world.resource::<NextStepTasks>().len(), 1);
        assert_eq!(world.resource::<Seen>().succeeded, vec![target]);
        assert_eq!(world.get::<ObjectLauncher>(gun).map(|l| l.last_launch_time()), Some(1.0));
    }

    #[test]
    fn test_second_launch_in_cooldown_rejected() {
        let (mut world, gun) = launch_world(LauncherSettings::default());
        spawn_crate(&mut world, Vec3::new(0.0, 0.0, -300.0));

        assert!(launch_by_probe::<HeadlessPhysics>(&mut world, gun).is_ok());
        let second = launch_by_probe::<HeadlessPhysics>(&mut world, gun);
        assert!(matches!(second, Err(LaunchRejection::Cooldown { .. })));
        assert_eq!(world.resource::<Seen>().succeeded.len(), 1);
    }

    #[test]
    fn test_probe_miss_fires_launch_failed() {
        let (mut world, gun) = launch_world(LauncherSettings::default());
        // За пределами hit_range (650)
        spawn_crate(&mut world, Vec3::new(0.0, 0.0, -900.0));

        let result = launch_by_probe::<HeadlessPhysics>(&mut world, gun);
        assert_eq!(result, Err(LaunchRejection::NothingInRange));
        assert_eq!(world.resource::<Seen>().failed, 1);
        // Промах не расходует cooldown
        assert_eq!(world.get::<ObjectLauncher>(gun).map(|l| l.last_launch_time()), Some(0.0));
    }

    #[test]
    fn test_no_adjustment_when_clamp_disabled() {
        let settings = LauncherSettings {
            clamp_launch_speed: false,
            ..default()
        };
        let (mut world, gun) = launch_world(settings);
        let target = spawn_crate(&mut world, Vec3::new(50.0, 0.0, -2000.0));

        // Цель вне hit_range, но from_viewport луч не нужен
        assert_eq!(launch_from_viewport::<HeadlessPhysics>(&mut world, gun, target), Ok(target));
        assert!(world.get_resource::<NextStepTasks>().is_none_or(|tasks| tasks.is_empty()));
    }

    #[test]
    fn test_launch_despawned_target() {
        let (mut world, gun) = launch_world(LauncherSettings::default());
        let target = spawn_crate(&mut world, Vec3::new(0.0, 0.0, -300.0));
        world.despawn(target);

        let result = launch_from_viewport::<HeadlessPhysics>(&mut world, gun, target);
        assert_eq!(result, Err(LaunchRejection::TargetLost(target)));
        assert!(world.resource::<Seen>().succeeded.is_empty());
    }
}
