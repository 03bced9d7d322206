//! 乘客到达发生器
//!
//! 每层独立的泊松过程：到达间隔服从以该层到达率为参数的指数分布；
//! 目的层按给定出发层的条件分布抽取。整段客流（截止到 horizon）在运行开始前一次生成，
//! 只消耗客流子流，因此与派梯策略、事件处理顺序无关。

use rand::distributions::WeightedIndex;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::sim::{ArrivalSpec, SimRng, SimTime, Stream};

/// 一个待发生的呼叫
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub at: SimTime,
    pub origin: u32,
    pub destination: u32,
}

struct FloorSource {
    floor: u32,
    gaps: Exp<f64>,
    destinations: WeightedIndex<f64>,
}

pub struct ArrivalGenerator {
    sources: Vec<FloorSource>,
    rng: SimRng,
}

impl ArrivalGenerator {
    pub fn from_spec(spec: &ArrivalSpec, floor_count: u32) -> Result<Self, ConfigError> {
        let mut sources = Vec::new();
        for floor in 0..floor_count {
            let rate = spec.rates.rate_for(floor);
            if rate == 0.0 {
                continue;
            }
            let gaps = Exp::new(rate).map_err(|_| ConfigError::InvalidRate { floor, rate })?;
            let weights = spec.destinations.conditional_weights(floor, floor_count);
            let destinations = WeightedIndex::new(&weights).map_err(|e| {
                ConfigError::InvalidWeights(format!("destinations from floor {floor}: {e}"))
            })?;
            sources.push(FloorSource {
                floor,
                gaps,
                destinations,
            });
        }
        Ok(Self {
            sources,
            rng: SimRng::stream(spec.seed, Stream::Traffic),
        })
    }

    /// 生成 `[0, horizon)` 内的全部呼叫，按 (时间, 出发层) 排序。
    #[tracing::instrument(skip(self))]
    pub fn generate(&mut self, horizon: SimTime) -> Vec<CallRequest> {
        let horizon_secs = horizon.as_secs_f64();
        let mut out = Vec::new();
        for src in &self.sources {
            let mut t = 0.0_f64;
            let before = out.len();
            loop {
                t += src.gaps.sample(self.rng.inner());
                if t >= horizon_secs {
                    break;
                }
                let destination = src.destinations.sample(self.rng.inner()) as u32;
                debug_assert_ne!(destination, src.floor);
                out.push(CallRequest {
                    at: SimTime::from_secs_f64(t),
                    origin: src.floor,
                    destination,
                });
            }
            debug!(floor = src.floor, calls = out.len() - before, "楼层客流已生成");
        }
        out.sort_by_key(|r| (r.at, r.origin));
        info!(calls = out.len(), "客流生成完成");
        out
    }
}
