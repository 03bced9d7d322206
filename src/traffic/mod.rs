//! 客流
//!
//! 乘客呼叫的随机生成。

mod arrival;

pub use arrival::{ArrivalGenerator, CallRequest};
