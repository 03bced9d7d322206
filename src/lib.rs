pub mod building;
pub mod control;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod run;
pub mod sim;
pub mod traffic;

pub use error::{ConfigError, SimError, SimResult};

#[cfg(test)]
mod test;
