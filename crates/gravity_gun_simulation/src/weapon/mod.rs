//! Weapon domain — gravity gun как оружие игрока
//!
//! Facade над grab + launch: две команды игрока (grab / launch) приходят
//! buffered events `GunInput` и исполняются внутри fixed step в порядке прихода.

pub mod facade;

#[cfg(test)]
mod weapon_tests;

pub use facade::{
    execute_gun_inputs, spawn_gravity_gun, try_grab, try_launch, GravityGun, GunCommand, GunInput,
};
