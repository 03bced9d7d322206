//! 轿厢状态机
//!
//! 状态：`Idle -> Moving -> DoorOpen -> (Idle | Moving)`。
//! 轿厢逐层移动（每经过一层一个到达事件），因此运行途中新加入的停靠也能被顺路服务。
//! 这里只维护状态与停靠队列；事件的调度由 `control` 负责。

use serde::{Deserialize, Serialize};

use super::id::{BankId, CallId, CarId};
use crate::error::{SimError, SimResult};
use crate::sim::{FloorRange, SimTime};

/// 运行方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    /// 从 `from` 指向 `to` 的方向
    pub fn toward(from: u32, to: u32) -> Direction {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Idle,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
            Direction::Idle => 0.0,
        }
    }
}

/// 轿厢状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarState {
    Idle,
    Moving,
    DoorOpen,
}

#[derive(Debug, Clone)]
pub struct ElevatorCar {
    pub id: CarId,
    pub bank: BankId,
    /// 最近一次到达（或当前停靠）的楼层
    floor: u32,
    direction: Direction,
    state: CarState,
    /// 按加入顺序排列、去重的停靠楼层
    stops: Vec<u32>,
    riders: Vec<CallId>,
    capacity: u32,
    served: FloorRange,
    /// 驶过一层所需时间
    floor_time: SimTime,
    /// 离开 `floor` 的时刻（仅 `Moving` 时有意义）
    departed_at: SimTime,
    wake_pending: bool,
}

impl ElevatorCar {
    pub fn new(
        id: CarId,
        bank: BankId,
        start_floor: u32,
        capacity: u32,
        served: FloorRange,
        floor_time: SimTime,
    ) -> Self {
        assert!(served.contains(start_floor), "{id:?} starts outside its bank");
        Self {
            id,
            bank,
            floor: start_floor,
            direction: Direction::Idle,
            state: CarState::Idle,
            stops: Vec::new(),
            riders: Vec::new(),
            capacity,
            served,
            floor_time,
            departed_at: SimTime::ZERO,
            wake_pending: false,
        }
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    pub fn stops(&self) -> &[u32] {
        &self.stops
    }

    pub fn riders(&self) -> &[CallId] {
        &self.riders
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.riders.len() >= self.capacity as usize
    }

    pub fn is_idle(&self) -> bool {
        self.state == CarState::Idle
    }

    /// 行驶 `distance` 层所需时间
    pub fn travel_time(&self, distance: u32) -> SimTime {
        self.floor_time.times(distance as u64)
    }

    /// 实数楼层位置：运行中按离开上一层后的时间插值。
    pub fn position_at(&self, now: SimTime) -> f64 {
        let base = self.floor as f64;
        if self.state != CarState::Moving || self.floor_time == SimTime::ZERO {
            return base;
        }
        let frac = (now.since(self.departed_at).0 as f64 / self.floor_time.0 as f64).min(1.0);
        base + self.direction.sign() * frac
    }

    /// 下一步将要到达的楼层（仅 `Moving` 时有意义）
    pub fn next_floor(&self) -> u32 {
        match self.direction {
            Direction::Up => self.floor + 1,
            Direction::Down => self.floor - 1,
            Direction::Idle => self.floor,
        }
    }

    pub fn has_stop(&self, floor: u32) -> bool {
        self.stops.contains(&floor)
    }

    /// 加入停靠；已存在则返回 `false`。
    pub fn request_stop(&mut self, floor: u32) -> bool {
        assert!(
            self.served.contains(floor),
            "{:?} asked to stop at unserved floor {floor}",
            self.id
        );
        if self.has_stop(floor) {
            return false;
        }
        self.stops.push(floor);
        true
    }

    /// 空闲且没有待处理的唤醒事件时返回 `true`，并标记已唤醒。
    pub(crate) fn claim_wake(&mut self) -> bool {
        if self.state != CarState::Idle || self.wake_pending {
            return false;
        }
        self.wake_pending = true;
        true
    }

    pub(crate) fn clear_wake(&mut self) {
        self.wake_pending = false;
    }

    /// 扫描式选向：当前方向上还有停靠就继续；否则掉头；都没有则空闲。
    /// 空闲轿厢朝最近的停靠出发（距离相同时取先加入的）。当前楼层不参与判断。
    pub fn choose_direction(&self) -> Direction {
        let floor = self.floor;
        let above = self.stops.iter().any(|&s| s > floor);
        let below = self.stops.iter().any(|&s| s < floor);
        match self.direction {
            Direction::Up if above => Direction::Up,
            Direction::Down if below => Direction::Down,
            Direction::Up | Direction::Down => {
                if above {
                    Direction::Up
                } else if below {
                    Direction::Down
                } else {
                    Direction::Idle
                }
            }
            Direction::Idle => self
                .stops
                .iter()
                .filter(|&&s| s != floor)
                .min_by_key(|&&s| s.abs_diff(floor))
                .map(|&s| Direction::toward(floor, s))
                .unwrap_or(Direction::Idle),
        }
    }

    /// `Idle/DoorOpen -> Moving`
    pub(crate) fn depart(&mut self, direction: Direction, now: SimTime) {
        assert_ne!(self.state, CarState::Moving, "{:?} departed twice", self.id);
        assert_ne!(direction, Direction::Idle);
        self.state = CarState::Moving;
        self.direction = direction;
        self.departed_at = now;
        let next = self.next_floor();
        assert!(
            self.served.contains(next),
            "{:?} would leave its bank range heading to {next}",
            self.id
        );
    }

    /// 运行中到达下一层。
    pub(crate) fn arrive(&mut self, floor: u32, now: SimTime) {
        assert_eq!(self.state, CarState::Moving, "{:?} arrived while not moving", self.id);
        assert_eq!(floor, self.next_floor(), "{:?} skipped a floor", self.id);
        self.floor = floor;
        self.departed_at = now;
    }

    /// `Idle/Moving -> DoorOpen`，并移除当前楼层的停靠。
    pub(crate) fn open_doors(&mut self) {
        assert_ne!(self.state, CarState::DoorOpen, "{:?} doors already open", self.id);
        self.state = CarState::DoorOpen;
        let before = self.stops.len();
        self.stops.retain(|&s| s != self.floor);
        assert!(before - self.stops.len() <= 1, "{:?} duplicate stop", self.id);
    }

    /// `DoorOpen -> Idle | Moving`；返回新方向（`Idle` 表示停下）。
    pub(crate) fn close_doors(&mut self, now: SimTime) -> Direction {
        assert_eq!(self.state, CarState::DoorOpen, "{:?} doors not open", self.id);
        let dir = self.choose_direction();
        if dir == Direction::Idle {
            self.state = CarState::Idle;
            self.direction = Direction::Idle;
        } else {
            self.depart(dir, now);
        }
        dir
    }

    /// 上车；满载时返回可恢复的 `CapacityExceeded`。
    pub(crate) fn board(&mut self, call: CallId) -> SimResult<()> {
        assert_eq!(self.state, CarState::DoorOpen, "{:?} boarding with doors shut", self.id);
        if self.is_full() {
            return Err(SimError::CapacityExceeded {
                bank: self.bank,
                car: self.id,
                capacity: self.capacity,
            });
        }
        self.riders.push(call);
        Ok(())
    }

    pub(crate) fn alight(&mut self, call: CallId) {
        assert_eq!(self.state, CarState::DoorOpen, "{:?} alighting with doors shut", self.id);
        let before = self.riders.len();
        self.riders.retain(|&c| c != call);
        assert_eq!(before, self.riders.len() + 1, "{call:?} was not riding {:?}", self.id);
    }
}
