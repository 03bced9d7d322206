//! 场景配置
//!
//! 一次仿真运行消费的结构化配置：楼宇几何、电梯组、客流参数、派梯策略、运行时长与随机种子。
//! 配置通过 `validate` 先行校验，任何事件被调度之前就以 `ConfigError` 失败。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::dispatch::{BankSelection, CallMode, DispatchPolicy};
use crate::error::ConfigError;

const DEFAULT_CAPACITY: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub building: BuildingSpec,
    pub arrival: ArrivalSpec,
    pub dispatch_policy: DispatchPolicy,
    #[serde(default)]
    pub call_mode: CallMode,
    /// 多个组都能服务某次行程时向哪些组呼梯
    #[serde(default)]
    pub bank_selection: BankSelection,
    /// 到达截止时间（秒）：不会有呼叫在此之后产生
    pub run_horizon_secs: f64,
    /// 到达截止后是否继续运行直到所有行程完成
    #[serde(default = "default_drain")]
    pub drain: bool,
}

fn default_drain() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingSpec {
    pub floor_count: u32,
    pub banks: Vec<BankSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSpec {
    pub id: u32,
    pub car_count: u32,
    /// 运行速度（楼层/秒）
    pub speed: f64,
    pub dwell: DwellSpec,
    /// 服务楼层范围；缺省为整栋楼
    #[serde(default)]
    pub floors: Option<FloorRange>,
    #[serde(default)]
    pub capacity: Option<u32>,
    /// 所有轿厢的初始楼层；缺省为服务范围的最低层
    #[serde(default)]
    pub start_floor: Option<u32>,
}

impl BankSpec {
    pub fn served(&self, floor_count: u32) -> FloorRange {
        self.floors.unwrap_or(FloorRange {
            lowest: 0,
            highest: floor_count.saturating_sub(1),
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity.unwrap_or(DEFAULT_CAPACITY)
    }
}

/// 闭区间楼层范围 `lowest..=highest`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorRange {
    pub lowest: u32,
    pub highest: u32,
}

impl FloorRange {
    pub fn contains(&self, floor: u32) -> bool {
        (self.lowest..=self.highest).contains(&floor)
    }

    pub fn span(&self) -> u32 {
        self.highest - self.lowest
    }
}

/// 开门停靠时长
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DwellSpec {
    Fixed { secs: f64 },
    Uniform { min_secs: f64, max_secs: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrivalSpec {
    pub rates: FloorRates,
    #[serde(default)]
    pub destinations: DestinationSpec,
    pub seed: u64,
}

/// 各楼层的呼叫到达率（次/秒）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FloorRates {
    Uniform { rate: f64 },
    PerFloor { rates: Vec<f64> },
}

impl FloorRates {
    pub fn rate_for(&self, floor: u32) -> f64 {
        match self {
            FloorRates::Uniform { rate } => *rate,
            FloorRates::PerFloor { rates } => rates.get(floor as usize).copied().unwrap_or(0.0),
        }
    }
}

/// 给定出发层时目的层的条件分布
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DestinationSpec {
    #[default]
    Uniform,
    /// 按楼层热度加权（出发层自身权重为零）
    Popularity { weights: Vec<f64> },
    /// 大堂主导：非大堂出发时以 `lobby_share` 的概率去大堂，其余均分到别的楼层
    LobbyHeavy {
        #[serde(default)]
        lobby: u32,
        lobby_share: f64,
    },
    /// 完整条件矩阵 `weights[origin][destination]`
    Matrix { weights: Vec<Vec<f64>> },
}

impl DestinationSpec {
    /// 出发层为 `origin` 时各目的层的未归一化权重；`origin` 处恒为零。
    pub fn conditional_weights(&self, origin: u32, floor_count: u32) -> Vec<f64> {
        let n = floor_count as usize;
        let o = origin as usize;
        let mut w = match self {
            DestinationSpec::Uniform => vec![1.0; n],
            DestinationSpec::Popularity { weights } => {
                (0..n).map(|f| weights.get(f).copied().unwrap_or(0.0)).collect()
            }
            DestinationSpec::LobbyHeavy { lobby, lobby_share } => {
                let lobby = *lobby as usize;
                if o == lobby {
                    vec![1.0; n]
                } else {
                    let others = n.saturating_sub(2);
                    let mut w = vec![0.0; n];
                    if others == 0 {
                        w[lobby] = 1.0;
                    } else {
                        let rest = (1.0 - lobby_share) / others as f64;
                        for (f, x) in w.iter_mut().enumerate() {
                            *x = if f == lobby { *lobby_share } else { rest };
                        }
                    }
                    w
                }
            }
            DestinationSpec::Matrix { weights } => weights
                .get(o)
                .map(|row| (0..n).map(|f| row.get(f).copied().unwrap_or(0.0)).collect())
                .unwrap_or_else(|| vec![0.0; n]),
        };
        if let Some(x) = w.get_mut(o) {
            *x = 0.0;
        }
        w
    }

    fn validate(&self, floor_count: u32) -> Result<(), ConfigError> {
        let n = floor_count as usize;
        let check = |what: &str, ws: &[f64]| -> Result<(), ConfigError> {
            if ws.len() != n {
                return Err(ConfigError::InvalidWeights(format!(
                    "{what} has {} entries, expected {n}",
                    ws.len()
                )));
            }
            if let Some(bad) = ws.iter().find(|x| !x.is_finite() || **x < 0.0) {
                return Err(ConfigError::InvalidWeights(format!(
                    "{what} contains {bad}"
                )));
            }
            Ok(())
        };
        match self {
            DestinationSpec::Uniform => Ok(()),
            DestinationSpec::Popularity { weights } => check("popularity", weights),
            DestinationSpec::LobbyHeavy { lobby, lobby_share } => {
                if *lobby >= floor_count {
                    return Err(ConfigError::FloorOutOfRange {
                        what: "lobby",
                        floor: *lobby,
                        floor_count,
                    });
                }
                if !(0.0..=1.0).contains(lobby_share) {
                    return Err(ConfigError::InvalidWeights(format!(
                        "lobby_share must be within [0, 1], got {lobby_share}"
                    )));
                }
                Ok(())
            }
            DestinationSpec::Matrix { weights } => {
                if weights.len() != n {
                    return Err(ConfigError::InvalidWeights(format!(
                        "matrix has {} rows, expected {n}",
                        weights.len()
                    )));
                }
                weights
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, row)| check(&format!("matrix row {i}"), row))
            }
        }
    }
}

impl DwellSpec {
    fn validate(&self, bank: u32) -> Result<(), ConfigError> {
        let ok = |x: f64| x.is_finite() && x >= 0.0;
        match *self {
            DwellSpec::Fixed { secs } if !ok(secs) => Err(ConfigError::InvalidDwell {
                bank,
                reason: format!("secs = {secs}"),
            }),
            DwellSpec::Uniform { min_secs, max_secs }
                if !ok(min_secs) || !ok(max_secs) || min_secs > max_secs =>
            {
                Err(ConfigError::InvalidDwell {
                    bank,
                    reason: format!("min_secs = {min_secs}, max_secs = {max_secs}"),
                })
            }
            _ => Ok(()),
        }
    }
}

impl ScenarioSpec {
    /// 校验配置；第一个错误即返回。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floor_count = self.building.floor_count;
        if floor_count < 2 {
            return Err(ConfigError::TooFewFloors(floor_count));
        }
        if self.building.banks.is_empty() {
            return Err(ConfigError::NoBanks);
        }
        if !self.run_horizon_secs.is_finite() || self.run_horizon_secs <= 0.0 {
            return Err(ConfigError::InvalidHorizon(self.run_horizon_secs));
        }
        if let DispatchPolicy::Nearest { moving_penalty } = self.dispatch_policy {
            if !moving_penalty.is_finite() || moving_penalty < 0.0 {
                return Err(ConfigError::InvalidPenalty(moving_penalty));
            }
        }

        let mut seen = HashSet::new();
        for bank in &self.building.banks {
            if !seen.insert(bank.id) {
                return Err(ConfigError::DuplicateBank(bank.id));
            }
            if bank.car_count == 0 {
                return Err(ConfigError::ZeroCars(bank.id));
            }
            if bank.capacity() == 0 {
                return Err(ConfigError::ZeroCapacity { bank: bank.id });
            }
            if !bank.speed.is_finite() || bank.speed <= 0.0 {
                return Err(ConfigError::InvalidSpeed {
                    bank: bank.id,
                    speed: bank.speed,
                });
            }
            bank.dwell.validate(bank.id)?;

            let range = bank.served(floor_count);
            if range.highest >= floor_count {
                return Err(ConfigError::FloorOutOfRange {
                    what: "bank range",
                    floor: range.highest,
                    floor_count,
                });
            }
            if range.lowest >= range.highest {
                return Err(ConfigError::InvalidFloorRange {
                    bank: bank.id,
                    lowest: range.lowest,
                    highest: range.highest,
                });
            }
            if let Some(start) = bank.start_floor {
                if !range.contains(start) {
                    return Err(ConfigError::FloorOutOfRange {
                        what: "start",
                        floor: start,
                        floor_count,
                    });
                }
            }
        }

        let arrival = &self.arrival;
        if let FloorRates::PerFloor { rates } = &arrival.rates {
            if rates.len() != floor_count as usize {
                return Err(ConfigError::RateCountMismatch {
                    expected: floor_count as usize,
                    got: rates.len(),
                });
            }
        }
        for floor in 0..floor_count {
            let rate = arrival.rates.rate_for(floor);
            if !rate.is_finite() || rate < 0.0 {
                return Err(ConfigError::InvalidRate { floor, rate });
            }
        }
        arrival.destinations.validate(floor_count)?;

        // 每个可能出现的 (出发, 目的) 组合都必须有电梯组能服务
        for origin in 0..floor_count {
            if arrival.rates.rate_for(origin) == 0.0 {
                continue;
            }
            let weights = arrival.destinations.conditional_weights(origin, floor_count);
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(ConfigError::InvalidWeights(format!(
                    "floor {origin} has a positive rate but no destination"
                )));
            }
            for (destination, w) in (0..floor_count).zip(&weights) {
                if *w <= 0.0 {
                    continue;
                }
                let served = self.building.banks.iter().any(|b| {
                    let r = b.served(floor_count);
                    r.contains(origin) && r.contains(destination)
                });
                if !served {
                    return Err(ConfigError::UnservedTrip {
                        origin,
                        destination,
                    });
                }
            }
        }
        Ok(())
    }
}
