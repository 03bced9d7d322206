//! 楼宇
//!
//! 单次运行的根对象：持有所有电梯组、轿厢与呼叫（按下标寻址的 arena），
//! 并负责把呼叫路由到正确的电梯组。

use super::bank::Bank;
use super::call::{Call, CallPhase};
use super::car::ElevatorCar;
use super::id::{BankId, CallId, CarId};
use crate::sim::{BuildingSpec, SimTime};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Building {
    floor_count: u32,
    banks: Vec<Bank>,
    cars: Vec<ElevatorCar>,
    calls: Vec<Call>,
    /// 每层尚未上车的呼叫
    waiting: Vec<Vec<CallId>>,
}

impl Building {
    /// 按（已校验的）配置搭建楼宇
    pub fn from_spec(spec: &BuildingSpec) -> Self {
        let mut banks = Vec::with_capacity(spec.banks.len());
        let mut cars = Vec::new();
        for bank_spec in &spec.banks {
            let bank_id = BankId(banks.len());
            let floors = bank_spec.served(spec.floor_count);
            let start = bank_spec.start_floor.unwrap_or(floors.lowest);
            let floor_time = SimTime::from_secs_f64(1.0 / bank_spec.speed);
            let mut ids = Vec::with_capacity(bank_spec.car_count as usize);
            for _ in 0..bank_spec.car_count {
                let id = CarId(cars.len());
                cars.push(ElevatorCar::new(
                    id,
                    bank_id,
                    start,
                    bank_spec.capacity(),
                    floors,
                    floor_time,
                ));
                ids.push(id);
            }
            debug!(bank = bank_spec.id, cars = ids.len(), ?floors, "电梯组就绪");
            banks.push(Bank {
                id: bank_id,
                tag: bank_spec.id,
                cars: ids,
                floors,
                dwell: bank_spec.dwell,
            });
        }
        Self {
            floor_count: spec.floor_count,
            banks,
            cars,
            calls: Vec::new(),
            waiting: vec![Vec::new(); spec.floor_count as usize],
        }
    }

    pub fn floor_count(&self) -> u32 {
        self.floor_count
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn bank(&self, id: BankId) -> &Bank {
        &self.banks[id.0]
    }

    pub fn cars(&self) -> &[ElevatorCar] {
        &self.cars
    }

    pub fn car(&self, id: CarId) -> &ElevatorCar {
        &self.cars[id.0]
    }

    pub fn car_mut(&mut self, id: CarId) -> &mut ElevatorCar {
        &mut self.cars[id.0]
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn call(&self, id: CallId) -> &Call {
        &self.calls[id.0]
    }

    pub fn call_mut(&mut self, id: CallId) -> &mut Call {
        &mut self.calls[id.0]
    }

    /// 能服务该行程的所有电梯组，服务范围最窄者在前，其次组号最小。与派梯策略无关。
    pub fn serving_banks(&self, origin: u32, destination: u32) -> Vec<BankId> {
        let mut banks: Vec<&Bank> = self
            .banks
            .iter()
            .filter(|b| b.serves(origin, destination))
            .collect();
        banks.sort_by_key(|b| (b.floors.span(), b.id));
        banks.into_iter().map(|b| b.id).collect()
    }

    /// 首选组（`serving_banks` 的第一个）
    pub fn route(&self, origin: u32, destination: u32) -> Option<BankId> {
        self.serving_banks(origin, destination).first().copied()
    }

    /// 登记一个新呼叫并加入出发层的等候队列
    pub fn add_call(
        &mut self,
        banks: Vec<BankId>,
        origin: u32,
        destination: u32,
        now: SimTime,
    ) -> CallId {
        let id = CallId(self.calls.len());
        self.calls.push(Call::new(id, banks, origin, destination, now));
        self.waiting[origin as usize].push(id);
        id
    }

    /// 在 `floor` 等候、可以登上 `car` 的呼叫（按呼叫顺序）。
    ///
    /// 已指派的呼叫只能登上被指派的轿厢；未指派的（广播模式或多组呼叫）可以登上
    /// 任一被呼叫组的任意轿厢。
    pub fn boardable_at(&self, floor: u32, car: CarId) -> Vec<CallId> {
        let bank = self.cars[car.0].bank;
        self.waiting[floor as usize]
            .iter()
            .copied()
            .filter(|&c| {
                let call = &self.calls[c.0];
                call.banks.contains(&bank) && call.assigned_car.is_none_or(|a| a == car)
            })
            .collect()
    }

    pub(crate) fn mark_boarded(&mut self, call: CallId, car: CarId, now: SimTime) {
        let floor = self.calls[call.0].origin as usize;
        self.waiting[floor].retain(|&c| c != call);
        let c = &mut self.calls[call.0];
        c.bank = self.cars[car.0].bank;
        c.stamp_board(car, now);
    }

    /// 尚未完成的呼叫数
    pub fn unfinished_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| c.phase() != CallPhase::Done)
            .count()
    }
}
