//! 派梯器
//!
//! `Dispatcher::assign(call, bank)` 依据当前策略为呼叫挑选本组内的一台轿厢。
//! 随机策略使用本次运行派生出的派梯子流，因此同一种子下结果可复现。

mod nearest;
mod policy;
mod random;
mod suitability;

pub use policy::{BankSelection, CallMode, DEFAULT_MOVING_PENALTY, DispatchPolicy, PolicyKind};

use crate::building::{Bank, BankId, Call, CarId, ElevatorCar};
use crate::sim::{SimRng, SimTime};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    policy: DispatchPolicy,
    rng: SimRng,
}

impl Dispatcher {
    pub fn new(policy: DispatchPolicy, rng: SimRng) -> Self {
        Self { policy, rng }
    }

    /// 按 `selection` 从候选组（已按服务范围从窄到宽排好）中选出要呼叫的组。
    /// 只有一个候选时不消耗随机数。
    pub fn select_banks(
        &mut self,
        selection: BankSelection,
        candidates: Vec<BankId>,
    ) -> Vec<BankId> {
        assert!(!candidates.is_empty(), "no bank to call");
        match selection {
            BankSelection::Narrowest => vec![candidates[0]],
            BankSelection::All => candidates,
            BankSelection::Random => match candidates.as_slice() {
                [only] => vec![*only],
                banks => vec![banks[self.rng.gen_range(0..banks.len())]],
            },
        }
    }

    /// 为 `call` 在 `bank` 中选一台轿厢。结果一定属于该组，否则视为逻辑缺陷直接断言。
    #[tracing::instrument(skip_all, fields(call = call.id.0, bank = bank.tag, policy = %self.policy.kind()))]
    pub fn assign(
        &mut self,
        call: &Call,
        bank: &Bank,
        cars: &[ElevatorCar],
        now: SimTime,
    ) -> CarId {
        assert!(
            call.banks.contains(&bank.id),
            "{:?} routed to the wrong bank",
            call.id
        );
        assert!(!bank.cars.is_empty(), "bank {} has no cars", bank.tag);

        let car = match self.policy {
            DispatchPolicy::Nearest { moving_penalty } => {
                nearest::assign(call.origin, bank, cars, now, moving_penalty)
            }
            DispatchPolicy::Random => random::assign(bank, &mut self.rng),
            DispatchPolicy::Suitability => {
                suitability::assign(call.origin, call.direction(), bank, cars, now)
            }
        };

        assert!(bank.owns(car), "{car:?} is outside bank {}", bank.tag);
        debug!(car = car.0, "指派轿厢");
        car
    }
}
