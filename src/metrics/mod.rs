//! 行程指标
//!
//! 每个完成的呼叫生成一条 `TripRecord`：候梯时间（呼叫到上车）与乘梯时间（上车到下车）。

mod collector;
mod summary;
mod trip;

pub use collector::MetricsCollector;
pub use summary::TripSummary;
pub use trip::TripRecord;
