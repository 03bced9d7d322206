//! 控制层
//!
//! 事件定义与电梯仿真世界：把呼叫、派梯、轿厢状态迁移串成事件链。

mod call_arrival;
mod car_events;
mod elevator_world;

pub use call_arrival::CallArrival;
pub use car_events::{CarArrive, CarWake, DoorsClose};
pub use elevator_world::ElevatorWorld;
