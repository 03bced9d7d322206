use crate::building::{Bank, CarId, ElevatorCar};
use crate::sim::SimTime;

/// 距离最小者胜；非空闲轿厢（运行中或开门中）加 `moving_penalty`。
pub(super) fn assign(
    origin: u32,
    bank: &Bank,
    cars: &[ElevatorCar],
    now: SimTime,
    moving_penalty: f64,
) -> CarId {
    bank.cars
        .iter()
        .map(|&id| {
            let car = &cars[id.0];
            let mut score = (car.position_at(now) - origin as f64).abs();
            if !car.is_idle() {
                score += moving_penalty;
            }
            (score, id)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, id)| id)
        .expect("bank has at least one car")
}
