//! 运行编排
//!
//! 校验场景 → 生成客流 → 搭建世界 → 跑事件循环 → 交出完整的行程记录。
//! 一次运行要么完整结束，要么以错误中止；不会返回被截断的结果。

mod batch;

pub use batch::{run_batch, run_paired};

use serde::Serialize;
use tracing::info;

use crate::control::ElevatorWorld;
use crate::dispatch::PolicyKind;
use crate::error::{ConfigError, SimError, SimResult};
use crate::metrics::TripRecord;
use crate::sim::{ScenarioSpec, SimTime, Simulator};
use crate::traffic::{ArrivalGenerator, CallRequest};

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub name: Option<String>,
    pub policy: PolicyKind,
    pub seed: u64,
    /// 生成的呼叫数
    pub calls: usize,
    /// 执行的事件数
    pub events: u64,
    pub final_time: SimTime,
    pub records: Vec<TripRecord>,
}

/// 运行一个场景。
#[tracing::instrument(skip(spec), fields(name = ?spec.name, policy = %spec.dispatch_policy.kind(), seed = spec.arrival.seed))]
pub fn run_scenario(spec: &ScenarioSpec) -> SimResult<RunReport> {
    spec.validate()?;

    let horizon = SimTime::from_secs_f64(spec.run_horizon_secs);
    let trace = ArrivalGenerator::from_spec(&spec.arrival, spec.building.floor_count)?
        .generate(horizon);
    execute(spec, trace)
}

/// 用外部给定的客流运行（忽略场景里的到达参数，只用它的种子派生派梯/停靠子流）。
pub fn run_trace(spec: &ScenarioSpec, trace: Vec<CallRequest>) -> SimResult<RunReport> {
    spec.validate()?;
    check_trace(spec, &trace)?;
    execute(spec, trace)
}

fn check_trace(spec: &ScenarioSpec, trace: &[CallRequest]) -> Result<(), ConfigError> {
    let floor_count = spec.building.floor_count;
    let horizon = SimTime::from_secs_f64(spec.run_horizon_secs);
    let mut last = SimTime::ZERO;
    for req in trace {
        for floor in [req.origin, req.destination] {
            if floor >= floor_count {
                return Err(ConfigError::FloorOutOfRange {
                    what: "call",
                    floor,
                    floor_count,
                });
            }
        }
        if req.origin == req.destination {
            return Err(ConfigError::InvalidTrace(format!(
                "call at {} goes from floor {} to itself",
                req.at, req.origin
            )));
        }
        let served = spec.building.banks.iter().any(|b| {
            let r = b.served(floor_count);
            r.contains(req.origin) && r.contains(req.destination)
        });
        if !served {
            return Err(ConfigError::UnservedTrip {
                origin: req.origin,
                destination: req.destination,
            });
        }
        if req.at < last || req.at >= horizon {
            return Err(ConfigError::InvalidTrace(format!(
                "call at {} is out of order or beyond the horizon",
                req.at
            )));
        }
        last = req.at;
    }
    Ok(())
}

fn execute(spec: &ScenarioSpec, trace: Vec<CallRequest>) -> SimResult<RunReport> {
    let horizon = SimTime::from_secs_f64(spec.run_horizon_secs);
    let calls = trace.len();

    let mut world = ElevatorWorld::new(spec, trace);
    let mut sim = Simulator::default();
    world.start(&mut sim)?;

    let stats = if spec.drain {
        sim.run(&mut world)?
    } else {
        sim.run_until(horizon, &mut world)?
    };

    let pending = world.building.unfinished_calls();
    if pending > 0 {
        return Err(SimError::Truncated { pending });
    }

    info!(
        calls,
        events = stats.events,
        final_time = %stats.final_time,
        "🏁 运行完成"
    );
    Ok(RunReport {
        name: spec.name.clone(),
        policy: spec.dispatch_policy.kind(),
        seed: spec.arrival.seed,
        calls,
        events: stats.events,
        final_time: stats.final_time,
        records: world.metrics.finalize(),
    })
}
