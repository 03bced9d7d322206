use crate::building::{Bank, CarId};
use crate::sim::SimRng;

/// 均匀随机；单台轿厢的组不消耗随机数。
pub(super) fn assign(bank: &Bank, rng: &mut SimRng) -> CarId {
    match bank.cars.as_slice() {
        [only] => *only,
        cars => cars[rng.gen_range(0..cars.len())],
    }
}
