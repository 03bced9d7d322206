//! 电梯组
//!
//! 一组服务同一楼层范围、作为整体派梯的轿厢。组只持有轿厢 id，轿厢本体存放在 `Building` 中。

use super::id::{BankId, CarId};
use crate::sim::{DwellSpec, FloorRange};

#[derive(Debug, Clone)]
pub struct Bank {
    pub id: BankId,
    /// 配置中的组号
    pub tag: u32,
    pub cars: Vec<CarId>,
    pub floors: FloorRange,
    pub dwell: DwellSpec,
}

impl Bank {
    pub fn serves(&self, origin: u32, destination: u32) -> bool {
        self.floors.contains(origin) && self.floors.contains(destination)
    }

    pub fn owns(&self, car: CarId) -> bool {
        self.cars.contains(&car)
    }

    /// 服务范围内的楼层数
    pub fn floor_count(&self) -> u32 {
        self.floors.span() + 1
    }
}
