//! 单次运行的随机数源
//!
//! 每次运行持有一个根种子生成器，从中派生互不干扰的子流（到达、派梯、停靠时长）。
//! 子流之间没有共享状态，因此随机派梯的抽样不会扰动乘客到达序列：
//! 同一种子下，不同派梯策略看到的是完全相同的客流。

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64 位黄金分割常数，用于种子混合。
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// 子流编号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Traffic = 1,
    Dispatch = 2,
    Dwell = 3,
}

/// 显式持有、按值传递的随机数生成器（不使用任何进程级全局状态）。
#[derive(Debug, Clone)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// 从根种子直接派生某个子流。与调用顺序无关：同一 `(seed, stream)` 总是得到同一序列。
    pub fn stream(seed: u64, stream: Stream) -> SimRng {
        let mut root = SimRng::new(seed);
        root.child(stream as u64)
    }

    /// 派生子生成器
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
