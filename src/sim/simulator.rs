//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间与事件队列。

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use crate::error::{SimError, SimResult};
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 一次 `run`/`run_until` 的执行统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub events: u64,
    pub final_time: SimTime,
}

/// 事件驱动仿真器：维护当前时间与事件队列。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    processed: u64,
    q: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 队列中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 累计已执行事件数
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// 队首事件的触发时间
    pub fn peek_time(&self) -> Option<SimTime> {
        self.q.peek().map(|item| item.at)
    }

    /// 调度事件在指定时间执行；`at` 早于当前时间时拒绝。
    #[tracing::instrument(skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) -> SimResult<()> {
        if at < self.now {
            return Err(SimError::TemporalOrdering { now: self.now, at });
        }
        let seq = self.next_seq;
        trace!(now = ?self.now, seq, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });

        debug!(queue_size = self.q.len(), "事件已加入队列");
        Ok(())
    }

    /// 相对当前时间延迟 `delay` 调度
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) -> SimResult<()> {
        self.schedule(self.now.saturating_add(delay), ev)
    }

    /// 弹出最早的事件并把当前时间推进到它的触发时间；队列为空时返回 `None`。
    pub fn advance(&mut self) -> Option<ScheduledEvent> {
        let item = self.q.pop()?;
        assert!(item.at >= self.now, "event queue went backwards");
        self.now = item.at;
        self.processed = self.processed.wrapping_add(1);
        Some(item)
    }

    fn step(&mut self, world: &mut dyn World) -> SimResult<bool> {
        let Some(item) = self.advance() else {
            return Ok(false);
        };
        trace!(
            now = ?self.now,
            seq = item.seq,
            remaining_queue = self.q.len(),
            "执行事件"
        );
        item.ev.execute(self, world)?;
        world.on_tick(self);
        Ok(true)
    }

    /// 运行直到事件队列为空或到达 `until`（恰好在 `until` 的事件也会执行）。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) -> SimResult<RunStats> {
        let start = self.processed;
        while let Some(at) = self.peek_time() {
            if at > until {
                break;
            }
            self.step(world)?;
        }
        self.now = self.now.max(until);
        Ok(RunStats {
            events: self.processed - start,
            final_time: self.now,
        })
    }

    /// 运行所有事件直到队列为空。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) -> SimResult<RunStats> {
        debug!(now = ?self.now, queue_size = self.q.len(), "▶️  开始运行仿真");

        let start = self.processed;
        while self.step(world)? {}

        let stats = RunStats {
            events: self.processed - start,
            final_time: self.now,
        };
        info!(
            total_events = stats.events,
            final_time = %stats.final_time,
            "✅ 事件队列已清空"
        );
        Ok(stats)
    }
}
