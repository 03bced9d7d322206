//! 电梯仿真世界
//!
//! 持有楼宇、派梯器、指标收集器和本次运行的客流；事件处理器通过 downcast 拿到它，
//! 再调用这里的 `on_*` 方法完成状态迁移与后续事件的调度。

use std::any::Any;

use super::call_arrival::CallArrival;
use super::car_events::{CarArrive, CarWake, DoorsClose};
use crate::building::{Building, CallId, CallPhase, CarId, CarState, Direction};
use crate::dispatch::{BankSelection, CallMode, Dispatcher};
use crate::error::{SimError, SimResult};
use crate::metrics::MetricsCollector;
use crate::sim::{DwellSpec, ScenarioSpec, SimRng, SimTime, Simulator, Stream, World};
use crate::traffic::CallRequest;
use tracing::{debug, info, trace};

pub struct ElevatorWorld {
    pub building: Building,
    pub dispatcher: Dispatcher,
    pub metrics: MetricsCollector,
    call_mode: CallMode,
    bank_selection: BankSelection,
    trace: Vec<CallRequest>,
    dwell_rng: SimRng,
    /// 因满载被留下、等该轿厢关门后重新派梯的呼叫
    left_behind: Vec<(CarId, CallId)>,
}

impl World for ElevatorWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ElevatorWorld {
    /// 用已校验的场景和预生成的客流构造世界
    pub fn new(spec: &ScenarioSpec, trace: Vec<CallRequest>) -> Self {
        let seed = spec.arrival.seed;
        Self {
            building: Building::from_spec(&spec.building),
            dispatcher: Dispatcher::new(
                spec.dispatch_policy,
                SimRng::stream(seed, Stream::Dispatch),
            ),
            metrics: MetricsCollector::new(spec.dispatch_policy.kind()),
            call_mode: spec.call_mode,
            bank_selection: spec.bank_selection,
            trace,
            dwell_rng: SimRng::stream(seed, Stream::Dwell),
            left_behind: Vec::new(),
        }
    }

    /// 调度第一个到达事件；之后每个到达事件负责调度下一个。
    pub fn start(&self, sim: &mut Simulator) -> SimResult<()> {
        if let Some(first) = self.trace.first() {
            sim.schedule(first.at, CallArrival { idx: 0 })?;
        }
        Ok(())
    }

    pub(crate) fn request(&self, idx: usize) -> Option<CallRequest> {
        self.trace.get(idx).copied()
    }

    /// 新呼叫：选出要呼叫的电梯组、登记并派梯。
    #[tracing::instrument(skip(self, sim), fields(now = %sim.now()))]
    pub(crate) fn on_call(&mut self, req: CallRequest, sim: &mut Simulator) -> SimResult<()> {
        let candidates = self.building.serving_banks(req.origin, req.destination);
        if candidates.is_empty() {
            panic!(
                "no bank serves {} -> {}; scenario was not validated",
                req.origin, req.destination
            );
        }
        let banks = self.dispatcher.select_banks(self.bank_selection, candidates);
        let call = self
            .building
            .add_call(banks, req.origin, req.destination, sim.now());
        debug!(call = call.0, banks = ?self.building.call(call).banks, "📞 新呼叫");
        self.dispatch(call, sim)
    }

    /// 在每个被呼叫的组里派梯。只呼叫了一个组时按单车模式锁定轿厢；
    /// 呼叫了多个组时不锁定，先开门的轿厢接走乘客，目的层等上车后再加入。
    fn dispatch(&mut self, call: CallId, sim: &mut Simulator) -> SimResult<()> {
        let now = sim.now();
        let (banks, origin, destination) = {
            let c = self.building.call(call);
            (c.banks.clone(), c.origin, c.destination)
        };
        let pinned = banks.len() == 1;
        for bank in banks {
            if self.building.call(call).phase() != CallPhase::Waiting {
                break;
            }
            match self.call_mode {
                CallMode::SingleCar => {
                    let car = self.dispatcher.assign(
                        self.building.call(call),
                        self.building.bank(bank),
                        self.building.cars(),
                        now,
                    );
                    if pinned {
                        self.building.call_mut(call).assigned_car = Some(car);
                    }
                    if self.doors_open_at(car, origin) {
                        self.board_waiting(car, sim)?;
                        continue;
                    }
                    let c = self.building.car_mut(car);
                    c.request_stop(origin);
                    if pinned {
                        c.request_stop(destination);
                    }
                    self.wake(car, sim)?;
                }
                CallMode::BankBroadcast => {
                    self.building.call_mut(call).assigned_car = None;
                    let cars = self.building.bank(bank).cars.clone();
                    for car in cars {
                        if self.building.call(call).phase() != CallPhase::Waiting {
                            break;
                        }
                        if self.doors_open_at(car, origin) {
                            self.board_waiting(car, sim)?;
                        } else {
                            self.building.car_mut(car).request_stop(origin);
                            self.wake(car, sim)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn doors_open_at(&self, car: CarId, floor: u32) -> bool {
        let c = self.building.car(car);
        c.state() == CarState::DoorOpen && c.floor() == floor
    }

    fn wake(&mut self, car: CarId, sim: &mut Simulator) -> SimResult<()> {
        if self.building.car_mut(car).claim_wake() {
            trace!(car = car.0, "唤醒空闲轿厢");
            sim.schedule(sim.now(), CarWake { car })?;
        }
        Ok(())
    }

    /// `Idle -> DoorOpen`（停靠就在当前层）或 `Idle -> Moving`
    pub(crate) fn on_wake(&mut self, car: CarId, sim: &mut Simulator) -> SimResult<()> {
        let c = self.building.car_mut(car);
        c.clear_wake();
        assert_eq!(c.state(), CarState::Idle, "{car:?} woken while busy");
        if c.has_stop(c.floor()) {
            return self.open_doors(car, sim);
        }
        let dir = c.choose_direction();
        if dir == Direction::Idle {
            return Ok(());
        }
        c.depart(dir, sim.now());
        self.schedule_next_floor(car, sim)
    }

    fn schedule_next_floor(&mut self, car: CarId, sim: &mut Simulator) -> SimResult<()> {
        let c = self.building.car(car);
        let floor = c.next_floor();
        sim.schedule_in(c.travel_time(1), CarArrive { car, floor })
    }

    /// 运行中到达一层：有停靠就开门，否则继续前进。
    pub(crate) fn on_arrive(
        &mut self,
        car: CarId,
        floor: u32,
        sim: &mut Simulator,
    ) -> SimResult<()> {
        let c = self.building.car_mut(car);
        c.arrive(floor, sim.now());
        trace!(car = car.0, floor, "经过楼层");
        if c.has_stop(floor) {
            return self.open_doors(car, sim);
        }
        // 停靠只会在开门时被移除，所以前方必然还有停靠
        assert_eq!(
            c.choose_direction(),
            c.direction(),
            "{car:?} lost its stops mid-shaft"
        );
        self.schedule_next_floor(car, sim)
    }

    /// `-> DoorOpen`：先下后上，然后按停靠时长调度关门。
    fn open_doors(&mut self, car: CarId, sim: &mut Simulator) -> SimResult<()> {
        let now = sim.now();
        let (floor, bank) = {
            let c = self.building.car_mut(car);
            c.open_doors();
            (c.floor(), c.bank)
        };
        debug!(car = car.0, floor, %now, "🚪 开门");

        let alighting: Vec<CallId> = self
            .building
            .car(car)
            .riders()
            .iter()
            .copied()
            .filter(|&r| self.building.call(r).destination == floor)
            .collect();
        let bank_tag = self.building.bank(bank).tag;
        for call in alighting {
            self.building.car_mut(car).alight(call);
            self.building.call_mut(call).stamp_alight(now);
            self.metrics.record(self.building.call(call), bank_tag);
        }

        self.board_waiting(car, sim)?;

        let spec = self.building.bank(bank).dwell;
        let dwell = self.sample_dwell(spec);
        sim.schedule_in(dwell, DoorsClose { car })
    }

    /// 当前开门楼层的等候者按呼叫顺序上车；满载则留下，等关门后重新派梯。
    fn board_waiting(&mut self, car: CarId, sim: &mut Simulator) -> SimResult<()> {
        let now = sim.now();
        let floor = self.building.car(car).floor();
        for call in self.building.boardable_at(floor, car) {
            match self.building.car_mut(car).board(call) {
                Ok(()) => {
                    self.building.mark_boarded(call, car, now);
                    let destination = self.building.call(call).destination;
                    self.building.car_mut(car).request_stop(destination);
                    trace!(call = call.0, car = car.0, "上车");
                }
                Err(SimError::CapacityExceeded { capacity, .. }) => {
                    info!(call = call.0, car = car.0, capacity, "满载，乘客等待下一趟");
                    let c = self.building.call_mut(call);
                    c.left_behind += 1;
                    c.assigned_car = None;
                    if !self.left_behind.contains(&(car, call)) {
                        self.left_behind.push((car, call));
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// `DoorOpen -> Idle | Moving`，随后为被留下的乘客重新派梯。
    pub(crate) fn on_doors_close(&mut self, car: CarId, sim: &mut Simulator) -> SimResult<()> {
        let dir = self.building.car_mut(car).close_doors(sim.now());
        debug!(car = car.0, ?dir, "关门");
        if dir != Direction::Idle {
            self.schedule_next_floor(car, sim)?;
        } else if !self.building.car(car).stops().is_empty() {
            // 只剩当前层的停靠：重新开门
            self.wake(car, sim)?;
        }

        let (mine, rest): (Vec<_>, Vec<_>) =
            self.left_behind.drain(..).partition(|(c, _)| *c == car);
        self.left_behind = rest;
        for (_, call) in mine {
            if self.building.call(call).phase() == CallPhase::Waiting {
                self.dispatch(call, sim)?;
            }
        }
        Ok(())
    }

    fn sample_dwell(&mut self, dwell: DwellSpec) -> SimTime {
        match dwell {
            DwellSpec::Fixed { secs } => SimTime::from_secs_f64(secs),
            DwellSpec::Uniform { min_secs, max_secs } if min_secs < max_secs => {
                SimTime::from_secs_f64(self.dwell_rng.gen_range(min_secs..=max_secs))
            }
            DwellSpec::Uniform { min_secs, .. } => SimTime::from_secs_f64(min_secs),
        }
    }
}
