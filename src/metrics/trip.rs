use serde::{Deserialize, Serialize};

use crate::building::{Call, Direction};
use crate::dispatch::PolicyKind;
use crate::sim::SimTime;

/// 一次完成的行程（不可变快照）。所有时间字段都是纳秒。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub call_id: usize,
    /// 配置中的组号
    pub bank: u32,
    pub car: usize,
    pub origin: u32,
    pub destination: u32,
    pub direction: Direction,
    /// 行程跨越的楼层数
    pub distance: u32,
    pub request_time: SimTime,
    pub board_time: SimTime,
    pub alight_time: SimTime,
    /// 候梯时间 = 上车 - 呼叫
    pub wait_time: SimTime,
    /// 乘梯时间 = 下车 - 上车
    pub transit_time: SimTime,
    pub left_behind: u32,
    pub dispatch_policy: PolicyKind,
}

impl TripRecord {
    /// 由已完成的呼叫生成记录。
    ///
    /// # Panics
    /// 呼叫尚未完成时 panic。
    pub fn from_call(call: &Call, bank_tag: u32, policy: PolicyKind) -> Self {
        let (Some(car), Some(board), Some(alight)) =
            (call.assigned_car, call.board_time, call.alight_time)
        else {
            panic!("{:?} archived before completion", call.id);
        };
        assert!(call.request_time <= board && board <= alight);
        Self {
            call_id: call.id.0,
            bank: bank_tag,
            car: car.0,
            origin: call.origin,
            destination: call.destination,
            direction: call.direction(),
            distance: call.origin.abs_diff(call.destination),
            request_time: call.request_time,
            board_time: board,
            alight_time: alight,
            wait_time: board.since(call.request_time),
            transit_time: alight.since(board),
            left_behind: call.left_behind,
            dispatch_policy: policy,
        }
    }

    pub fn wait_secs(&self) -> f64 {
        self.wait_time.as_secs_f64()
    }

    pub fn transit_secs(&self) -> f64 {
        self.transit_time.as_secs_f64()
    }
}
