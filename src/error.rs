//! 错误类型
//!
//! `ConfigError`：输入配置非法，在调度任何事件之前报告。
//! `SimError`：运行期不可恢复的错误（以及可恢复的 `CapacityExceeded`，由上车逻辑自行处理）。
//! 派梯越界、重复停靠等逻辑缺陷不走错误通道，直接断言。

use crate::building::{BankId, CarId};
use crate::sim::SimTime;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("building must have at least two floors, got {0}")]
    TooFewFloors(u32),

    #[error("building has no elevator banks")]
    NoBanks,

    #[error("bank id {0} is declared more than once")]
    DuplicateBank(u32),

    #[error("bank {0} has zero cars")]
    ZeroCars(u32),

    #[error("bank {bank}: car capacity must be at least 1")]
    ZeroCapacity { bank: u32 },

    #[error("bank {bank}: speed must be positive and finite, got {speed}")]
    InvalidSpeed { bank: u32, speed: f64 },

    #[error("bank {bank}: invalid dwell time ({reason})")]
    InvalidDwell { bank: u32, reason: String },

    #[error("{what} floor {floor} is outside building (floor_count {floor_count})")]
    FloorOutOfRange {
        what: &'static str,
        floor: u32,
        floor_count: u32,
    },

    #[error("bank {bank}: floor range {lowest}..={highest} is empty or has a single floor")]
    InvalidFloorRange { bank: u32, lowest: u32, highest: u32 },

    #[error("arrival rate for floor {floor} must be finite and non-negative, got {rate}")]
    InvalidRate { floor: u32, rate: f64 },

    #[error("expected {expected} per-floor rates, got {got}")]
    RateCountMismatch { expected: usize, got: usize },

    #[error("invalid destination weights: {0}")]
    InvalidWeights(String),

    #[error("no bank serves trips from floor {origin} to floor {destination}")]
    UnservedTrip { origin: u32, destination: u32 },

    #[error("invalid call trace: {0}")]
    InvalidTrace(String),

    #[error("moving penalty must be finite and non-negative, got {0}")]
    InvalidPenalty(f64),

    #[error("run horizon must be positive and finite, got {0}")]
    InvalidHorizon(f64),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("event scheduled in the past: now={now:?}, at={at:?}")]
    TemporalOrdering { now: SimTime, at: SimTime },

    #[error("{car:?} in {bank:?} is full (capacity {capacity})")]
    CapacityExceeded {
        bank: BankId,
        car: CarId,
        capacity: u32,
    },

    #[error("run stopped at horizon with {pending} unfinished calls")]
    Truncated { pending: usize },
}

pub type SimResult<T> = Result<T, SimError>;
