//! 标识符类型
//!
//! 轿厢、电梯组与呼叫都存放在按下标寻址的 Vec 中，标识符就是下标。

use serde::{Deserialize, Serialize};

/// 轿厢标识符（全楼唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CarId(pub usize);

/// 电梯组标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BankId(pub usize);

/// 呼叫标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CallId(pub usize);
