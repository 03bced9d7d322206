//! 楼宇模型
//!
//! 楼层、电梯组、轿厢状态机与乘客呼叫。

mod bank;
#[allow(clippy::module_inception)]
mod building;
mod call;
mod car;
mod id;

pub use bank::Bank;
pub use building::Building;
pub use call::{Call, CallPhase};
pub use car::{CarState, Direction, ElevatorCar};
pub use id::{BankId, CallId, CarId};
