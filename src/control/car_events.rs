//! 轿厢事件
//!
//! 每台轿厢同一时刻至多有一个待处理的状态事件。

use super::elevator_world::ElevatorWorld;
use crate::building::CarId;
use crate::error::SimResult;
use crate::sim::{Event, Simulator, World};

fn elevator_world(world: &mut dyn World) -> &mut ElevatorWorld {
    world
        .as_any_mut()
        .downcast_mut::<ElevatorWorld>()
        .expect("world must be ElevatorWorld")
}

/// 事件：空闲轿厢的停靠队列变为非空，重新评估状态。
#[derive(Debug)]
pub struct CarWake {
    pub car: CarId,
}

impl Event for CarWake {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) -> SimResult<()> {
        let CarWake { car } = *self;
        elevator_world(world).on_wake(car, sim)
    }
}

/// 事件：运行中的轿厢到达 `floor`。
#[derive(Debug)]
pub struct CarArrive {
    pub car: CarId,
    pub floor: u32,
}

impl Event for CarArrive {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) -> SimResult<()> {
        let CarArrive { car, floor } = *self;
        elevator_world(world).on_arrive(car, floor, sim)
    }
}

/// 事件：停靠时间结束，关门。
#[derive(Debug)]
pub struct DoorsClose {
    pub car: CarId,
}

impl Event for DoorsClose {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) -> SimResult<()> {
        let DoorsClose { car } = *self;
        elevator_world(world).on_doors_close(car, sim)
    }
}
