//! 乘客呼叫
//!
//! 一次呼叫从到达发生器产生，被派梯器指派轿厢，被轿厢打上上车/下车时间，
//! 下车后归档为 `TripRecord`。

use super::car::Direction;
use super::id::{BankId, CallId, CarId};
use crate::sim::SimTime;

/// 呼叫所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Waiting,
    Riding,
    Done,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub id: CallId,
    /// 实际服务的组：上车前是首选候选组，上车后是所乘轿厢的组
    pub bank: BankId,
    /// 乘客呼叫了的组
    pub banks: Vec<BankId>,
    pub origin: u32,
    pub destination: u32,
    pub request_time: SimTime,
    pub assigned_car: Option<CarId>,
    pub board_time: Option<SimTime>,
    pub alight_time: Option<SimTime>,
    /// 因满载被留下的次数
    pub left_behind: u32,
}

impl Call {
    pub fn new(
        id: CallId,
        banks: Vec<BankId>,
        origin: u32,
        destination: u32,
        request_time: SimTime,
    ) -> Self {
        assert_ne!(origin, destination, "call {id:?} goes nowhere");
        let bank = *banks.first().expect("call needs at least one bank");
        Self {
            id,
            bank,
            banks,
            origin,
            destination,
            request_time,
            assigned_car: None,
            board_time: None,
            alight_time: None,
            left_behind: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::toward(self.origin, self.destination)
    }

    pub fn phase(&self) -> CallPhase {
        match (self.board_time, self.alight_time) {
            (None, _) => CallPhase::Waiting,
            (Some(_), None) => CallPhase::Riding,
            (Some(_), Some(_)) => CallPhase::Done,
        }
    }

    pub(crate) fn stamp_board(&mut self, car: CarId, now: SimTime) {
        assert_eq!(self.phase(), CallPhase::Waiting, "{:?} boarded twice", self.id);
        debug_assert!(now >= self.request_time);
        self.assigned_car = Some(car);
        self.board_time = Some(now);
    }

    pub(crate) fn stamp_alight(&mut self, now: SimTime) {
        assert_eq!(self.phase(), CallPhase::Riding, "{:?} alighted while not riding", self.id);
        debug_assert!(self.board_time.is_some_and(|b| now >= b));
        self.alight_time = Some(now);
    }
}
