//! 帧时间
//!
//! 定义离散仿真帧号及帧与墙钟时长之间的换算。

use serde::{Deserialize, Serialize};

/// 仿真帧号：每次 tick 加一，只由驱动方推进。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Frame(pub u64);

impl Frame {
    pub const ZERO: Frame = Frame(0);

    /// `frames` 帧之后的帧号（饱和加法）。
    pub fn after(self, frames: u64) -> Frame {
        Frame(self.0.saturating_add(frames))
    }

    pub fn next(self) -> Frame {
        self.after(1)
    }

    /// 距离 `later` 还有多少帧；`later` 已过去时为 0。
    pub fn frames_until(self, later: Frame) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

/// 帧间隔（毫秒）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInterval {
    ms: u64,
}

impl TickInterval {
    pub const DEFAULT_MS: u64 = 50;

    /// 间隔至少 1ms。
    pub fn from_millis(ms: u64) -> TickInterval {
        TickInterval { ms: ms.max(1) }
    }

    pub fn as_millis(self) -> u64 {
        self.ms
    }

    /// 毫秒换算成（小数）帧数，不做取整。
    pub fn frames_in_millis(self, ms: f64) -> f64 {
        ms / self.ms as f64
    }

    pub fn frames_in_secs(self, secs: f64) -> f64 {
        self.frames_in_millis(secs * 1_000.0)
    }

    /// 覆盖 `ms` 所需的整帧数（向上取整，至少 1 帧）。
    pub fn frames_covering(self, ms: u64) -> u64 {
        ms.div_ceil(self.ms).max(1)
    }
}

impl Default for TickInterval {
    fn default() -> Self {
        TickInterval::from_millis(Self::DEFAULT_MS)
    }
}
