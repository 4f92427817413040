//! Tests for gravity gun facade.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;

    use crate::grab::{held_object, GrabToggle, ObjectGrabber, ObjectReleased, ReleaseReason};
    use crate::launch::ObjectLauncher;
    use crate::physics::{HeadlessPhysics, PhysicsHandle, SimBody, SimShape};
    use crate::settings::GravityGunSettings;
    use crate::shared::{Viewpoint, ViewpointSource};
    use crate::weapon::*;

    #[derive(Resource, Default)]
    struct Released(Vec<ReleaseReason>);

    fn gun_world() -> (World, Entity, Entity) {
        let mut world = World::new();
        let mut time = Time::<Fixed>::default();
        time.advance_by(Duration::from_secs(1));
        world.insert_resource(time);
        world.init_resource::<Events<GunInput>>();
        world.init_resource::<Released>();
        world.add_observer(|trigger: Trigger<ObjectReleased>, mut released: ResMut<Released>| {
            released.0.push(trigger.event().reason);
        });

        let player = world.spawn(Viewpoint::new(Vec3::ZERO, Quat::IDENTITY)).id();
        let gun = spawn_gravity_gun(&mut world, player, GravityGunSettings::default());

        let target = world
            .spawn((
                SimBody::dynamic(SimShape::Ball { radius: 30.0 }, 20.0),
                Transform::from_xyz(0.0, 0.0, -250.0),
            ))
            .id();

        (world, gun, target)
    }

    fn pending_impulse(world: &World, body: Entity) -> Vec3 {
        world.get::<SimBody>(body).map(|b| b.pending_impulse()).unwrap_or_default()
    }

    #[test]
    fn test_gravity_gun_requires_components() {
        let mut world = World::new();
        let gun = world.spawn(GravityGun).id();

        assert!(world.get::<ObjectGrabber>(gun).is_some());
        assert!(world.get::<ObjectLauncher>(gun).is_some());
        assert!(world.get::<PhysicsHandle>(gun).is_some());
        assert_eq!(world.get::<ViewpointSource>(gun), Some(&ViewpointSource(Entity::PLACEHOLDER)));
    }

    #[test]
    fn test_try_launch_without_hold_uses_probe() {
        let (mut world, gun, target) = gun_world();

        assert_eq!(try_launch::<HeadlessPhysics>(&mut world, gun), Ok(target));
        assert_eq!(pending_impulse(&world, target), Vec3::new(0.0, 0.0, -750_000.0));
        assert!(world.resource::<Released>().0.is_empty());
    }

    #[test]
    fn test_try_launch_releases_held_object_first() {
        let (mut world, gun, target) = gun_world();

        assert_eq!(try_grab::<HeadlessPhysics>(&mut world, gun), Ok(GrabToggle::Grabbed(target)));
        assert_eq!(try_launch::<HeadlessPhysics>(&mut world, gun), Ok(target));

        assert_eq!(held_object(&world, gun), None);
        assert_eq!(world.resource::<Released>().0, vec![ReleaseReason::Launched]);
        assert_eq!(pending_impulse(&world, target), Vec3::new(0.0, 0.0, -750_000.0));
    }

    #[test]
    fn test_inputs_execute_in_arrival_order() {
        let (mut world, gun, target) = gun_world();

        world.send_event(GunInput::grab(gun));
        world.send_event(GunInput::launch(gun));
        execute_gun_inputs::<HeadlessPhysics>(&mut world);

        // Grab → Launch: схватили, потом отпустили броском
        assert_eq!(world.resource::<Released>().0, vec![ReleaseReason::Launched]);
        assert_ne!(pending_impulse(&world, target), Vec3::ZERO);

        // Очередь вычерпана — повторный прогон ничего не делает
        execute_gun_inputs::<HeadlessPhysics>(&mut world);
        assert_eq!(world.resource::<Released>().0.len(), 1);
    }

    #[test]
    fn test_rejected_input_is_ignored() {
        let (mut world, gun, target) = gun_world();
        world.despawn(target);

        world.send_event(GunInput::grab(gun));
        execute_gun_inputs::<HeadlessPhysics>(&mut world);

        assert_eq!(held_object(&world, gun), None);
    }
}
