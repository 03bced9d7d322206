use super::trip::TripRecord;
use crate::building::Call;
use crate::dispatch::PolicyKind;
use tracing::info;

/// 行程记录收集器：只追加，运行结束后交出只读序列。
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    policy: PolicyKind,
    records: Vec<TripRecord>,
}

impl MetricsCollector {
    pub fn new(policy: PolicyKind) -> Self {
        Self {
            policy,
            records: Vec::new(),
        }
    }

    /// 归档一个刚下车的呼叫，并输出一条结构化日志。
    pub fn record(&mut self, call: &Call, bank_tag: u32) {
        let rec = TripRecord::from_call(call, bank_tag, self.policy);
        info!(
            target: "elevsim_rs::trip",
            call_id = rec.call_id,
            bank = rec.bank,
            car = rec.car,
            origin = rec.origin,
            destination = rec.destination,
            wait_s = rec.wait_secs(),
            transit_s = rec.transit_secs(),
            left_behind = rec.left_behind,
            policy = %rec.dispatch_policy,
            "trip"
        );
        self.records.push(rec);
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finalize(self) -> Vec<TripRecord> {
        self.records
    }
}
