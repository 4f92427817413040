//! Next-step tasks — одноразовые задачи на следующий fixed step
//!
//! Не общий таймер: задача, поставленная на шаге N, выполняется ровно один
//! раз в начале шага N+1 и выбрасывается. Задачи держат только `Entity`
//! (weak handle) и тихо ничего не делают, если entity уже despawned.

use bevy::prelude::*;

use crate::launch::LaunchVelocityAdjustment;
use crate::physics::GravityGunBackend;

/// Одноразовая задача
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextStepTask {
    /// Нормализация скорости после броска (импульс виден только через step)
    AdjustLaunchVelocity(LaunchVelocityAdjustment),
}

impl NextStepTask {
    fn run<B: GravityGunBackend>(self, world: &mut World) {
        match self {
            NextStepTask::AdjustLaunchVelocity(adjustment) => adjustment.apply::<B>(world),
        }
    }
}

/// Очередь задач на следующий step
#[derive(Resource, Debug, Default)]
pub struct NextStepTasks {
    queued: Vec<NextStepTask>,
}

impl NextStepTasks {
    pub fn schedule(&mut self, task: NextStepTask) {
        self.queued.push(task);
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    fn take(&mut self) -> Vec<NextStepTask> {
        std::mem::take(&mut self.queued)
    }
}

/// Поставить задачу (создаёт очередь, если её ещё нет)
pub fn schedule_next_step(world: &mut World, task: NextStepTask) {
    world.get_resource_or_init::<NextStepTasks>().schedule(task);
}

/// System: выполнить всё, что поставлено на прошлом шаге
///
/// Запускается первой в `GravityGunSystems`. Задачи, поставленные во время
/// выполнения, попадут уже на следующий шаг.
pub fn run_next_step_tasks<B: GravityGunBackend>(world: &mut World) {
    let Some(mut queue) = world.get_resource_mut::<NextStepTasks>() else {
        return;
    };
    let tasks = queue.take();

    for task in tasks {
        task.run::<B>(world);
    }
}
