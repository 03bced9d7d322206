//! 派梯策略与呼叫模式
//!
//! 策略是带标签的枚举，每个变体对应一个独立的分配函数；选择哪种策略是显式参数，而不是运行时多态。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 运行中轿厢在最近轿厢策略里的默认距离惩罚（楼层）
pub const DEFAULT_MOVING_PENALTY: f64 = 2.0;

fn default_moving_penalty() -> f64 {
    DEFAULT_MOVING_PENALTY
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// 最近空闲轿厢：距离 + 非空闲惩罚，最小者胜，id 小者优先。
    ///
    /// 运行中与开门停靠中的轿厢都算非空闲，都要加 `moving_penalty`。
    Nearest {
        #[serde(default = "default_moving_penalty")]
        moving_penalty: f64,
    },
    /// 在组内均匀随机选一台，不看轿厢状态（对照基线）
    Random,
    /// 经典"适合度"最近轿厢算法：同向驶来 > 反向驶来 > 驶离
    Suitability,
}

impl DispatchPolicy {
    pub fn nearest() -> Self {
        DispatchPolicy::Nearest {
            moving_penalty: DEFAULT_MOVING_PENALTY,
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            DispatchPolicy::Nearest { .. } => PolicyKind::Nearest,
            DispatchPolicy::Random => PolicyKind::Random,
            DispatchPolicy::Suitability => PolicyKind::Suitability,
        }
    }
}

impl FromStr for DispatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(DispatchPolicy::nearest()),
            "random" => Ok(DispatchPolicy::Random),
            "suitability" => Ok(DispatchPolicy::Suitability),
            other => Err(format!(
                "unknown policy '{other}' (expected nearest, random or suitability)"
            )),
        }
    }
}

/// 策略名（写入行程记录）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Nearest,
    Random,
    Suitability,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicyKind::Nearest => "nearest",
            PolicyKind::Random => "random",
            PolicyKind::Suitability => "suitability",
        };
        f.write_str(s)
    }
}

/// 厅外呼梯如何落到轿厢上
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallMode {
    /// 由策略挑一台轿厢，出发层与目的层都加入它的停靠队列
    #[default]
    SingleCar,
    /// 组内所有轿厢都停出发层，先到且有空位的那台接走乘客
    BankBroadcast,
}

/// 乘客向哪些电梯组呼梯（只在多个组都能服务该行程时有区别）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankSelection {
    /// 服务范围最窄的组，其次组号最小
    #[default]
    Narrowest,
    /// 所有能服务的组都呼叫，先到且有空位的轿厢接走乘客
    All,
    /// 从能服务的组里均匀随机选一个（派梯子流）
    Random,
}

impl FromStr for BankSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "narrowest" => Ok(BankSelection::Narrowest),
            "all" => Ok(BankSelection::All),
            "random" => Ok(BankSelection::Random),
            other => Err(format!(
                "unknown bank selection '{other}' (expected narrowest, all or random)"
            )),
        }
    }
}
