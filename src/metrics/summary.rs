use serde::Serialize;

use super::trip::TripRecord;

/// 驱动程序输出用的简单汇总（秒）。正式统计交给外部分析工具。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TripSummary {
    pub trips: usize,
    pub mean_wait: f64,
    pub p95_wait: f64,
    pub max_wait: f64,
    pub mean_transit: f64,
    pub max_transit: f64,
}

impl TripSummary {
    pub fn from_records(records: &[TripRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let n = records.len() as f64;
        let mut waits: Vec<f64> = records.iter().map(TripRecord::wait_secs).collect();
        waits.sort_by(f64::total_cmp);
        let transits = records.iter().map(TripRecord::transit_secs);

        // 最近秩法
        let rank = ((0.95 * n).ceil() as usize).clamp(1, waits.len());
        Self {
            trips: records.len(),
            mean_wait: waits.iter().sum::<f64>() / n,
            p95_wait: waits[rank - 1],
            max_wait: waits[waits.len() - 1],
            mean_transit: transits.clone().sum::<f64>() / n,
            max_transit: transits.fold(0.0, f64::max),
        }
    }
}
