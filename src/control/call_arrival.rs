//! 呼叫到达事件

use super::elevator_world::ElevatorWorld;
use crate::error::SimResult;
use crate::sim::{Event, Simulator, World};

/// 事件：客流中第 `idx` 个呼叫发生；处理完后调度下一个。
#[derive(Debug)]
pub struct CallArrival {
    pub idx: usize,
}

impl Event for CallArrival {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) -> SimResult<()> {
        let CallArrival { idx } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<ElevatorWorld>()
            .expect("world must be ElevatorWorld");
        let req = w.request(idx).expect("arrival index within trace");
        w.on_call(req, sim)?;
        if let Some(next) = w.request(idx + 1) {
            sim.schedule(next.at, CallArrival { idx: idx + 1 })?;
        }
        Ok(())
    }
}
