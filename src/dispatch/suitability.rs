//! "Nearest Elevator" 适合度打分
//!
//! N 为组内楼层数，d 为轿厢到呼叫楼层的距离：
//! - 轿厢正在驶离呼叫楼层：1
//! - 轿厢空闲，或驶向呼叫楼层且方向与乘客一致：N + 2 - d
//! - 驶向呼叫楼层但方向相反：N + 1 - d

use crate::building::{Bank, CarId, Direction, ElevatorCar};
use crate::sim::SimTime;

pub(super) fn score(car: &ElevatorCar, origin: u32, wanted: Direction, n: f64, now: SimTime) -> f64 {
    let pos = car.position_at(now);
    let target = origin as f64;
    let d = (pos - target).abs();
    let moving_away = match car.direction() {
        Direction::Up => target < pos,
        Direction::Down => target > pos,
        Direction::Idle => false,
    };
    if moving_away && d > 0.0 {
        1.0
    } else if car.direction() == wanted || car.direction() == Direction::Idle {
        n + 2.0 - d
    } else {
        n + 1.0 - d
    }
}

pub(super) fn assign(
    origin: u32,
    wanted: Direction,
    bank: &Bank,
    cars: &[ElevatorCar],
    now: SimTime,
) -> CarId {
    let n = bank.floor_count() as f64;
    bank.cars
        .iter()
        .map(|&id| (score(&cars[id.0], origin, wanted, n, now), id))
        // 分数高者胜；同分取 id 小者
        .max_by(|a, b| a.0.total_cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, id)| id)
        .expect("bank has at least one car")
}
