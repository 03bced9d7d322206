//! 多次运行
//!
//! 每次运行各自拥有楼宇、仿真器与随机源，互不共享可变状态，因此可以并行
//! （启用 `parallel` feature 时使用 rayon）。

use super::{RunReport, run_scenario};
use crate::dispatch::DispatchPolicy;
use crate::error::SimResult;
use crate::sim::ScenarioSpec;

fn with(spec: &ScenarioSpec, seed: u64, policy: DispatchPolicy) -> ScenarioSpec {
    let mut s = spec.clone();
    s.arrival.seed = seed;
    s.dispatch_policy = policy;
    s
}

/// 同一客流（同一种子）下依次比较多个策略，结果顺序与 `policies` 一致。
pub fn run_paired(spec: &ScenarioSpec, policies: &[DispatchPolicy]) -> SimResult<Vec<RunReport>> {
    run_batch(spec, &[spec.arrival.seed], policies)
}

/// 对每个 (种子, 策略) 组合各跑一次；结果按种子优先、策略其次排列。任一运行失败即整体失败。
pub fn run_batch(
    spec: &ScenarioSpec,
    seeds: &[u64],
    policies: &[DispatchPolicy],
) -> SimResult<Vec<RunReport>> {
    let jobs: Vec<ScenarioSpec> = seeds
        .iter()
        .flat_map(|&seed| policies.iter().map(move |&p| with(spec, seed, p)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let reports = jobs.iter().map(run_scenario).collect();

    #[cfg(feature = "parallel")]
    let reports = {
        use rayon::prelude::*;
        jobs.par_iter().map(run_scenario).collect()
    };

    reports
}
